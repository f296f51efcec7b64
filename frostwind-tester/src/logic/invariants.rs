use std::collections::{BTreeMap, HashSet};

use frostwind_game::missions::{WIN_CHANCE_CEILING, WIN_CHANCE_FLOOR};
use frostwind_game::{GameSession, TerritoryStatus, UnitStatus};

/// Which checks apply after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A recruitment order was accepted.
    Recruit,
    /// A day was advanced from `previous_day`.
    AdvanceDay { previous_day: u32 },
    Other,
}

/// Watches one session and reports every broken rule it sees.
#[derive(Debug, Clone)]
pub struct InvariantChecker {
    territories: BTreeMap<String, TerritoryStatus>,
}

const fn rank(status: TerritoryStatus) -> u8 {
    match status {
        TerritoryStatus::Locked => 0,
        TerritoryStatus::Available => 1,
        TerritoryStatus::Owned => 2,
    }
}

impl InvariantChecker {
    #[must_use]
    pub fn new(session: &GameSession) -> Self {
        Self {
            territories: session.state().territories.clone(),
        }
    }

    /// Check `session` after `step`; violations come back as readable messages.
    pub fn check(&mut self, session: &GameSession, step: Step) -> Vec<String> {
        let state = session.state();
        let stats = session.stats();
        let mut violations = Vec::new();

        // Event grants bypass the cap; only recruitment is bound by it.
        if step == Step::Recruit {
            if stats.total_soldiers > stats.max_population {
                violations.push(format!(
                    "population {} exceeds cap {}",
                    stats.total_soldiers, stats.max_population
                ));
            }
            if state.recruited_today > stats.daily_recruit_cap {
                violations.push(format!(
                    "recruited {} today against a quota of {}",
                    state.recruited_today, stats.daily_recruit_cap
                ));
            }
        }

        if let Step::AdvanceDay { previous_day } = step {
            if state.day != previous_day.saturating_add(1) {
                violations.push(format!(
                    "day moved from {previous_day} to {} in one tick",
                    state.day
                ));
            }
            if state.recruited_today != 0 {
                violations.push(format!(
                    "recruitment counter not reset ({})",
                    state.recruited_today
                ));
            }
        }

        violations.extend(
            state
                .units
                .iter()
                .filter(|unit| unit.count == 0)
                .map(|unit| format!("{} has no soldiers left", unit.id)),
        );

        for (id, status) in &state.territories {
            let before = self
                .territories
                .get(id)
                .copied()
                .unwrap_or(TerritoryStatus::Locked);
            if rank(*status) < rank(before) {
                violations.push(format!("territory {id} regressed from {before:?} to {status:?}"));
            }
        }
        self.territories.clone_from(&state.territories);

        let mut committed = HashSet::new();
        for mission in &state.active_missions {
            if !(WIN_CHANCE_FLOOR..=WIN_CHANCE_CEILING).contains(&mission.win_chance) {
                violations.push(format!(
                    "{} has win chance {} outside bounds",
                    mission.id, mission.win_chance
                ));
            }
            for id in &mission.deployed_unit_ids {
                if !committed.insert(*id) {
                    violations.push(format!("{id} is committed to two missions"));
                }
            }
        }
        for unit in &state.units {
            let deployed = unit.status == UnitStatus::Deployed;
            if deployed != committed.contains(&unit.id) {
                violations.push(format!(
                    "{} is {:?} but mission membership says otherwise",
                    unit.id, unit.status
                ));
            }
        }

        violations
    }
}
