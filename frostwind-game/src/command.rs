//! Player commands, their outcomes and rejections.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    LOG_CAMPAIGN_UNAVAILABLE, LOG_CAMPAIGN_UNDER_ATTACK, LOG_COMMANDER_NOT_IN_TAVERN,
    LOG_DEPLOY_NO_IDLE_UNITS, LOG_EVENT_INVALID_CHOICE, LOG_EVENT_NONE_PENDING,
    LOG_GOLD_INSUFFICIENT, LOG_MERGE_REJECTED, LOG_RECRUIT_DAILY_QUOTA,
    LOG_RECRUIT_INVALID_QUANTITY, LOG_RECRUIT_POPULATION_CAP, LOG_UNKNOWN_ARCHETYPE,
    LOG_UNKNOWN_BUILDING,
};
use crate::data::{BuildingKind, Quality, UnitKind};
use crate::state::{BattleResult, Commander, CommanderId, MissionId, Quest, UnitId};
use crate::turn::DayOutcome;

/// Why a command was refused. State is untouched whenever one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("Recruitment needs a positive quantity.")]
    InvalidQuantity,
    #[error("Barracks are full: {requested} recruits requested, room for {available}.")]
    PopulationCap { requested: u32, available: i64 },
    #[error("Daily recruitment quota reached: {requested} requested, {remaining} left today.")]
    DailyQuota { requested: u32, remaining: u32 },
    #[error("Not enough gold: {needed} needed, {available} in the treasury.")]
    InsufficientGold { needed: i64, available: i64 },
    #[error("No configuration for unit type {0}.")]
    UnknownArchetype(UnitKind),
    #[error("No configuration for building {0}.")]
    UnknownBuilding(BuildingKind),
    #[error("Units cannot be merged: {0}.")]
    MergeRejected(&'static str),
    #[error("None of the selected units are ready to deploy.")]
    NoIdleUnits,
    #[error("Territory {0} cannot be attacked right now.")]
    CampaignUnavailable(String),
    #[error("An attack on {0} is already under way.")]
    CampaignUnderAttack(String),
    #[error("Commander {0} is not in the tavern.")]
    CommanderNotInTavern(CommanderId),
    #[error("There is no event awaiting a decision.")]
    NoPendingEvent,
    #[error("Choice {index} does not exist ({available} options).")]
    InvalidEventChoice { index: usize, available: usize },
}

impl CommandError {
    /// Stable log key recorded alongside the warning.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::InvalidQuantity => LOG_RECRUIT_INVALID_QUANTITY,
            Self::PopulationCap { .. } => LOG_RECRUIT_POPULATION_CAP,
            Self::DailyQuota { .. } => LOG_RECRUIT_DAILY_QUOTA,
            Self::InsufficientGold { .. } => LOG_GOLD_INSUFFICIENT,
            Self::UnknownArchetype(_) => LOG_UNKNOWN_ARCHETYPE,
            Self::UnknownBuilding(_) => LOG_UNKNOWN_BUILDING,
            Self::MergeRejected(_) => LOG_MERGE_REJECTED,
            Self::NoIdleUnits => LOG_DEPLOY_NO_IDLE_UNITS,
            Self::CampaignUnavailable(_) => LOG_CAMPAIGN_UNAVAILABLE,
            Self::CampaignUnderAttack(_) => LOG_CAMPAIGN_UNDER_ATTACK,
            Self::CommanderNotInTavern(_) => LOG_COMMANDER_NOT_IN_TAVERN,
            Self::NoPendingEvent => LOG_EVENT_NONE_PENDING,
            Self::InvalidEventChoice { .. } => LOG_EVENT_INVALID_CHOICE,
        }
    }

    /// Merge failures stay out of the player log.
    #[must_use]
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::MergeRejected(_))
    }
}

/// Everything a collaborator can ask the engine to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Recruit {
        kind: UnitKind,
        quantity: u32,
    },
    AdvanceDay,
    Deploy {
        quest: Quest,
        unit_ids: Vec<UnitId>,
        win_chance: f64,
    },
    DeployEstimated {
        quest: Quest,
        unit_ids: Vec<UnitId>,
    },
    AttackTerritory {
        territory: String,
    },
    MergeUnits {
        unit_ids: Vec<UnitId>,
    },
    UpgradeBuilding {
        kind: BuildingKind,
    },
    HireCommander {
        id: CommanderId,
    },
    ChooseEvent {
        index: usize,
    },
    AcknowledgeBattleResult,
    SetGold {
        amount: i64,
    },
    SetPopulationCapModifier {
        amount: i64,
    },
    ResetGame,
    RefreshTavern,
}

/// Successful command results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    Recruited {
        unit: UnitId,
        quality: Quality,
    },
    DayAdvanced(DayOutcome),
    Deployed {
        mission: MissionId,
        win_chance: f64,
    },
    CampaignQuest(Quest),
    Merged {
        unit: UnitId,
    },
    Upgraded {
        kind: BuildingKind,
        level: u32,
    },
    Hired(Commander),
    EventResolved {
        event: String,
    },
    Acknowledged {
        result: Option<BattleResult>,
    },
    TavernRefreshed,
    Applied,
}
