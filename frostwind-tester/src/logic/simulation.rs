use std::time::{Duration, Instant};

use frostwind_game::{
    Command, CommandOutcome, GameSession, GameTables, RulesConfig, TerritoryStatus,
};
use serde::Serialize;

use crate::logic::invariants::{InvariantChecker, Step};
use crate::logic::policy::{PlayerPolicy, Strategy};

/// Commands a policy may issue before the day is forced to end.
const MAX_COMMANDS_PER_DAY: usize = 12;

/// Configuration for one simulated campaign.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: Strategy,
    pub days: u32,
    pub rules: RulesConfig,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(seed: u64, strategy: Strategy) -> Self {
        Self {
            seed,
            strategy,
            days: 60,
            rules: RulesConfig::default_config(),
        }
    }

    #[must_use]
    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }
}

/// Summary of a finished campaign.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignRun {
    pub seed: u64,
    pub strategy: Strategy,
    pub final_day: u32,
    pub gold: i64,
    pub reputation: i64,
    pub soldiers: i64,
    pub commanders: usize,
    pub territories_owned: usize,
    pub battles: u32,
    pub victories: u32,
    pub events_resolved: u32,
    pub commands_issued: u32,
    pub commands_rejected: u32,
    pub rng_draws: u64,
    pub violations: Vec<String>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl CampaignRun {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Drives a session day by day with a policy, checking invariants after
/// every step.
pub struct CampaignRunner {
    session: GameSession,
    policy: Box<dyn PlayerPolicy>,
    checker: InvariantChecker,
    config: SimulationConfig,
    run: Tally,
}

#[derive(Debug, Default)]
struct Tally {
    battles: u32,
    victories: u32,
    events_resolved: u32,
    commands_issued: u32,
    commands_rejected: u32,
    violations: Vec<String>,
}

impl CampaignRunner {
    #[must_use]
    pub fn new(tables: &GameTables, config: SimulationConfig) -> Self {
        let session = GameSession::new(config.seed, tables.clone(), config.rules.clone());
        let checker = InvariantChecker::new(&session);
        Self {
            session,
            policy: config.strategy.create_policy(),
            checker,
            config,
            run: Tally::default(),
        }
    }

    /// Play every configured day and summarize.
    #[must_use]
    pub fn run(mut self) -> CampaignRun {
        let start = Instant::now();
        log::info!(
            "campaign seed {} with {} policy for {} days",
            self.config.seed,
            self.policy.name(),
            self.config.days
        );
        for _ in 0..self.config.days {
            self.play_day();
        }
        self.finish(start.elapsed())
    }

    fn play_day(&mut self) {
        for _ in 0..MAX_COMMANDS_PER_DAY {
            let Some(command) = self.policy.next_command(&self.session) else {
                break;
            };
            if !self.issue(command) {
                break;
            }
        }
        self.resolve_event();

        let previous_day = self.session.state().day;
        let outcome = self.session.advance_day();
        self.run.battles += u32::try_from(outcome.battle_results.len()).unwrap_or(u32::MAX);
        self.run.victories += u32::try_from(
            outcome
                .battle_results
                .iter()
                .filter(|result| result.victory)
                .count(),
        )
        .unwrap_or(u32::MAX);
        self.record(Step::AdvanceDay { previous_day });
        let _ = self.session.acknowledge_battle_result();
    }

    /// Dispatch one command; `false` when the engine refused it.
    fn issue(&mut self, command: Command) -> bool {
        self.run.commands_issued += 1;
        match self.session.dispatch(command) {
            Ok(outcome) => {
                let step = if matches!(outcome, CommandOutcome::Recruited { .. }) {
                    Step::Recruit
                } else {
                    Step::Other
                };
                self.record(step);
                true
            }
            Err(err) => {
                log::debug!("{} policy command refused: {err}", self.policy.name());
                self.run.commands_rejected += 1;
                self.record(Step::Other);
                false
            }
        }
    }

    fn resolve_event(&mut self) {
        let state = self.session.state();
        let Some(event) = state
            .current_event
            .as_deref()
            .and_then(|id| self.session.tables().event(id))
        else {
            return;
        };
        let index = self.policy.pick_event_choice(state, event);
        if self.issue(Command::ChooseEvent { index }) {
            self.run.events_resolved += 1;
        }
    }

    fn record(&mut self, step: Step) {
        let day = self.session.state().day;
        for violation in self.checker.check(&self.session, step) {
            log::warn!("seed {} day {day}: {violation}", self.config.seed);
            self.run
                .violations
                .push(format!("day {day}: {violation}"));
        }
    }

    fn finish(self, duration: Duration) -> CampaignRun {
        let stats = self.session.stats();
        let state = self.session.state();
        CampaignRun {
            seed: self.config.seed,
            strategy: self.config.strategy,
            final_day: state.day,
            gold: state.gold,
            reputation: state.reputation,
            soldiers: stats.total_soldiers,
            commanders: state.commanders.len(),
            territories_owned: state
                .territories
                .values()
                .filter(|status| **status == TerritoryStatus::Owned)
                .count(),
            battles: self.run.battles,
            victories: self.run.victories,
            events_resolved: self.run.events_resolved,
            commands_issued: self.run.commands_issued,
            commands_rejected: self.run.commands_rejected,
            rng_draws: self.session.rng_draws(),
            violations: self.run.violations,
            duration,
        }
    }
}

/// Run every seed under `strategy`.
#[must_use]
pub fn run_campaigns(
    tables: &GameTables,
    rules: &RulesConfig,
    seeds: &[u64],
    strategy: Strategy,
    days: u32,
) -> Vec<CampaignRun> {
    seeds
        .iter()
        .map(|&seed| {
            let config = SimulationConfig::new(seed, strategy)
                .with_days(days)
                .with_rules(rules.clone());
            CampaignRunner::new(tables, config).run()
        })
        .collect()
}
