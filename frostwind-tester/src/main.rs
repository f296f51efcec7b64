mod logic;
mod util;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use frostwind_game::{GameTables, RulesConfig};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use logic::{CampaignRun, Strategy, run_campaigns};
use util::{resolve_seeds, split_csv};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for a terminal
    Console,
    /// Machine-readable campaign summaries
    Json,
    /// Tables for pasting into an issue or PR
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "frostwind-tester", version)]
#[command(about = "Headless Frostwind campaigns with invariant checks after every step")]
struct Args {
    /// Seeds to run (comma-separated; decimal, 0x hex, or a..=b)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Days to simulate per campaign
    #[arg(long, default_value_t = 60)]
    days: u32,

    /// Player policy driving the campaign
    #[arg(long, value_enum, default_value_t = Strategy::Cautious)]
    policy: Strategy,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON file overriding balance rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let start_time = Instant::now();
    let seeds = resolve_seeds(&split_csv(&args.seeds))?;
    let tables = GameTables::load_from_static().context("loading game tables")?;
    let rules = load_rules(args.rules.as_deref())?;

    if args.verbose {
        println!(
            "🧪 {} policy, {} days, seeds {:?}",
            args.policy.label().bright_white(),
            args.days,
            seeds
        );
    }

    let runs = run_campaigns(&tables, &rules, &seeds, args.policy, args.days);
    if args.verbose {
        for run in &runs {
            let mark = if run.passed() { "✅".green() } else { "❌".red() };
            println!("  {mark} seed {} finished on day {}", run.seed, run.final_day);
        }
    }

    write_reports(&args, &runs, start_time)?;

    if runs.iter().any(|run| !run.passed()) {
        eprintln!("{}", "❌ Invariant violations detected".red().bold());
        std::process::exit(1);
    }

    Ok(())
}

fn announce_banner() {
    println!("{}", "❄️ Frostwind Campaign Tester".bright_cyan().bold());
    println!("{}", "============================".cyan());
}

fn load_rules(path: Option<&Path>) -> Result<RulesConfig> {
    let Some(path) = path else {
        return Ok(RulesConfig::default_config());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    RulesConfig::from_json(&json).with_context(|| format!("invalid rules in {}", path.display()))
}

fn write_reports(args: &Args, runs: &[CampaignRun], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, runs)?,
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, runs)?;
        }
        ReportFormat::Console => {
            logic::reports::generate_console_report(
                &mut output_target,
                runs,
                start_time.elapsed(),
            )?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
