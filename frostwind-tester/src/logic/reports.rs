use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::CampaignRun;

#[allow(clippy::cast_precision_loss)]
fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn passed_count(runs: &[CampaignRun]) -> usize {
    runs.iter().filter(|run| run.passed()).count()
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    runs: &[CampaignRun],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Campaign Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let passed = passed_count(runs);
    let failed = runs.len() - passed;
    writeln!(out, "Total campaigns: {}", runs.len())?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", failed.to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", percentage(passed, runs.len()))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for run in runs {
        let status = if run.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} seed {}",
            status,
            run.strategy.label().bold(),
            run.seed
        )?;
        writeln!(
            out,
            "   Day {} | Gold {} | Reputation {} | Soldiers {} | Commanders {}",
            run.final_day, run.gold, run.reputation, run.soldiers, run.commanders
        )?;
        writeln!(
            out,
            "   Battles {} ({} won) | Territories {} | Events {}",
            run.battles, run.victories, run.territories_owned, run.events_resolved
        )?;
        writeln!(
            out,
            "   Commands {} ({} refused) | RNG draws {} | {:?}",
            run.commands_issued, run.commands_rejected, run.rng_draws, run.duration
        )?;
        if !run.violations.is_empty() {
            writeln!(out, "   Violations:")?;
            for violation in &run.violations {
                writeln!(out, "     • {}", violation.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, runs: &[CampaignRun]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(runs)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    runs: &[CampaignRun],
) -> Result<()> {
    writeln!(out, "# Frostwind Campaign Results\n")?;

    let passed = passed_count(runs);
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total campaigns**: {}", runs.len())?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", runs.len() - passed)?;
    writeln!(
        out,
        "- **Success rate**: {:.1}%\n",
        percentage(passed, runs.len())
    )?;

    writeln!(out, "## Campaigns\n")?;
    writeln!(
        out,
        "| Status | Policy | Seed | Day | Gold | Soldiers | Battles | Won | Territories |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|")?;
    for run in runs {
        let status = if run.passed() { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            status,
            run.strategy,
            run.seed,
            run.final_day,
            run.gold,
            run.soldiers,
            run.battles,
            run.victories,
            run.territories_owned
        )?;
    }

    let failing: Vec<_> = runs.iter().filter(|run| !run.passed()).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Violations\n")?;
        for run in failing {
            writeln!(out, "### {} seed {}\n", run.strategy, run.seed)?;
            for violation in &run.violations {
                writeln!(out, "- {violation}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
