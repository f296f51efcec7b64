use std::fmt;

use clap::ValueEnum;
use frostwind_game::data::UnitArchetype;
use frostwind_game::{
    BuildingKind, Command, EventDef, EventEffect, GameSession, GameState, Quest, TerritoryStatus,
    UnitId, UnitKind, buildings, campaign, missions,
};
use serde::Serialize;

/// Gold a cautious commander never spends below.
const CAUTIOUS_RESERVE: i64 = 2_000;
/// Largest single recruitment order a cautious commander places.
const CAUTIOUS_BATCH: u32 = 25;
const CAUTIOUS_MIN_CHANCE: f64 = 0.85;
const AGGRESSIVE_MIN_CHANCE: f64 = 0.5;
const AGGRESSIVE_ASSAULT_CHANCE: f64 = 0.6;

/// Policy interface for automated play.
pub trait PlayerPolicy {
    /// Name used in reports and debug output.
    fn name(&self) -> &'static str;

    /// Next command to issue today, or `None` to end the day.
    fn next_command(&mut self, session: &GameSession) -> Option<Command>;

    /// Option to take on a pending event.
    fn pick_event_choice(&mut self, state: &GameState, event: &EventDef) -> usize;
}

/// Built-in play strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Keep a gold reserve, recruit infantry, only take near-certain quests
    Cautious,
    /// Spend freely, hire commanders, push the campaign map
    Aggressive,
    /// Never issue a command; only days pass
    Idle,
}

impl Strategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Aggressive => "Aggressive",
            Self::Idle => "Idle",
        }
    }

    #[must_use]
    pub fn create_policy(self) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Idle => Box::new(IdlePolicy),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CautiousPolicy;
struct AggressivePolicy;
struct IdlePolicy;

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn next_command(&mut self, session: &GameSession) -> Option<Command> {
        let state = session.state();
        if let Some(archetype) = session.tables().archetype(UnitKind::Infantry) {
            let quantity = recruit_budget(session, archetype, CAUTIOUS_RESERVE).min(CAUTIOUS_BATCH);
            if quantity > 0 {
                return Some(Command::Recruit {
                    kind: archetype.kind,
                    quantity,
                });
            }
        }

        let idle = idle_units(state);
        if !idle.is_empty() {
            let best = state
                .daily_quests
                .iter()
                .map(|quest| (quest, missions::estimate_win_chance(state, quest, &idle)))
                .filter(|(_, chance)| *chance >= CAUTIOUS_MIN_CHANCE)
                .max_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((quest, _)) = best {
                return Some(Command::DeployEstimated {
                    quest: quest.clone(),
                    unit_ids: idle,
                });
            }
        }

        buildings::next_upgrade_cost(state, session.tables(), BuildingKind::Market)
            .filter(|cost| state.gold >= cost * 3)
            .map(|_| Command::UpgradeBuilding {
                kind: BuildingKind::Market,
            })
    }

    fn pick_event_choice(&mut self, _state: &GameState, event: &EventDef) -> usize {
        best_choice(event, |effects| effect_sum(effects, gold_delta))
    }
}

impl PlayerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn next_command(&mut self, session: &GameSession) -> Option<Command> {
        let state = session.state();
        let tables = session.tables();

        let strongest = tables
            .archetypes
            .iter()
            .filter(|archetype| archetype.cost <= state.gold)
            .max_by_key(|archetype| archetype.attributes.power);
        if let Some(archetype) = strongest {
            let quantity = recruit_budget(session, archetype, 0);
            if quantity > 0 {
                return Some(Command::Recruit {
                    kind: archetype.kind,
                    quantity,
                });
            }
        }

        let idle = idle_units(state);
        if !idle.is_empty() {
            if let Some(quest) = winnable_assault(session, &idle) {
                return Some(Command::DeployEstimated {
                    quest,
                    unit_ids: idle,
                });
            }
            let richest = state
                .daily_quests
                .iter()
                .filter(|quest| {
                    missions::estimate_win_chance(state, quest, &idle) >= AGGRESSIVE_MIN_CHANCE
                })
                .max_by_key(|quest| quest.reward_gold);
            if let Some(quest) = richest {
                return Some(Command::DeployEstimated {
                    quest: quest.clone(),
                    unit_ids: idle,
                });
            }
        }

        if let Some(commander) = state.tavern.iter().find(|c| c.cost * 2 <= state.gold) {
            return Some(Command::HireCommander { id: commander.id });
        }

        buildings::next_upgrade_cost(state, tables, BuildingKind::Barracks)
            .filter(|cost| state.gold >= cost * 2)
            .map(|_| Command::UpgradeBuilding {
                kind: BuildingKind::Barracks,
            })
    }

    fn pick_event_choice(&mut self, _state: &GameState, event: &EventDef) -> usize {
        best_choice(event, |effects| {
            effect_sum(effects, reputation_delta) + effect_sum(effects, granted_soldiers)
        })
    }
}

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "Idle"
    }

    fn next_command(&mut self, _session: &GameSession) -> Option<Command> {
        None
    }

    fn pick_event_choice(&mut self, _state: &GameState, event: &EventDef) -> usize {
        best_choice(event, |effects| -i64::try_from(effects.len()).unwrap_or(i64::MAX))
    }
}

fn idle_units(state: &GameState) -> Vec<UnitId> {
    state
        .units
        .iter()
        .filter(|unit| unit.is_idle())
        .map(|unit| unit.id)
        .collect()
}

/// Largest order that fits the quota, the barracks and the treasury above `reserve`.
fn recruit_budget(session: &GameSession, archetype: &UnitArchetype, reserve: i64) -> u32 {
    let state = session.state();
    let stats = session.stats();
    let quota = stats.daily_recruit_cap.saturating_sub(state.recruited_today);
    let room = u32::try_from((stats.max_population - stats.total_soldiers).max(0))
        .unwrap_or(u32::MAX);
    let affordable = u32::try_from(((state.gold - reserve) / archetype.cost.max(1)).max(0))
        .unwrap_or(u32::MAX);
    quota.min(room).min(affordable)
}

fn winnable_assault(session: &GameSession, idle: &[UnitId]) -> Option<Quest> {
    let state = session.state();
    state
        .territories
        .iter()
        .filter(|(_, status)| **status == TerritoryStatus::Available)
        .filter_map(|(id, _)| campaign::attack_quest(state, session.tables(), id).ok())
        .find(|quest| {
            missions::estimate_win_chance(state, quest, idle) >= AGGRESSIVE_ASSAULT_CHANCE
        })
}

fn best_choice(event: &EventDef, score: impl Fn(&[EventEffect]) -> i64) -> usize {
    event
        .choices
        .iter()
        .enumerate()
        .map(|(idx, choice)| (idx, score(&choice.effects)))
        .fold(None, |best: Option<(usize, i64)>, candidate| match best {
            Some((_, top)) if top >= candidate.1 => best,
            _ => Some(candidate),
        })
        .map_or(0, |(idx, _)| idx)
}

fn effect_sum(effects: &[EventEffect], value: fn(&EventEffect) -> i64) -> i64 {
    effects.iter().map(value).sum()
}

const fn gold_delta(effect: &EventEffect) -> i64 {
    match effect {
        EventEffect::Gold { amount } => *amount,
        _ => 0,
    }
}

const fn reputation_delta(effect: &EventEffect) -> i64 {
    match effect {
        EventEffect::Reputation { amount } => *amount,
        _ => 0,
    }
}

fn granted_soldiers(effect: &EventEffect) -> i64 {
    match effect {
        EventEffect::GrantUnit { count, .. } => i64::from(*count),
        _ => 0,
    }
}
