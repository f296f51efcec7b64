use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use crate::constants::{LOG_WELCOME, UNIT_STARTING_MORALE, UNIT_STARTING_STAMINA};
use crate::data::{
    Attributes, BuildingKind, Difficulty, GameTables, Quality, QuestTemplate, Rarity, StatBias,
    UnitKind,
};
use crate::rules::RulesConfig;

macro_rules! entity_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }
    };
}

entity_id!(UnitId, "unit");
entity_id!(CommanderId, "cmd");
entity_id!(MissionId, "mission");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Idle,
    Training,
    Deployed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub archetype: UnitKind,
    pub name: String,
    pub count: u32,
    pub quality: Quality,
    pub status: UnitStatus,
    pub training_days_left: u32,
    pub attributes: Attributes,
    pub morale: u32,
    pub stamina: u32,
}

impl Unit {
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.status, UnitStatus::Idle)
    }

    #[must_use]
    pub const fn is_training(&self) -> bool {
        matches!(self.status, UnitStatus::Training)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommanderStats {
    pub command: u32,
    pub valor: u32,
    pub strategy: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commander {
    pub id: CommanderId,
    pub name: String,
    pub title: String,
    pub rarity: Rarity,
    pub cost: i64,
    pub level: u32,
    pub stats: CommanderStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerritoryStatus {
    Locked,
    Available,
    Owned,
}

/// A job on the board, or a campaign attack when `territory` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub required_power: i64,
    pub reward_gold: i64,
    pub duration: u32,
    pub danger_level: u32,
    #[serde(default)]
    pub bias: Option<StatBias>,
    #[serde(default)]
    pub territory: Option<String>,
}

impl Quest {
    #[must_use]
    pub fn from_template(
        id: String,
        template: &QuestTemplate,
        required_power: i64,
        bias: Option<StatBias>,
    ) -> Self {
        Self {
            id,
            title: template.title.clone(),
            difficulty: template.difficulty,
            required_power,
            reward_gold: template.reward_gold,
            duration: template.duration,
            danger_level: template.danger_level,
            bias,
            territory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveMission {
    pub id: MissionId,
    pub quest: Quest,
    pub deployed_unit_ids: Vec<UnitId>,
    pub start_day: u32,
    pub arrival_day: u32,
    pub win_chance: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loss {
    pub unit_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleResult {
    pub quest_title: String,
    pub victory: bool,
    pub reward_gold: i64,
    pub losses: Vec<Loss>,
    #[serde(default)]
    pub territory_conquered: Option<String>,
    #[serde(default)]
    pub territories_unlocked: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub day: u32,
    pub key: String,
    pub message: String,
    pub level: LogLevel,
}

/// Root aggregate for one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub day: u32,
    pub gold: i64,
    pub reputation: i64,
    pub units: Vec<Unit>,
    pub commanders: Vec<Commander>,
    pub tavern: Vec<Commander>,
    pub buildings: BTreeMap<BuildingKind, u32>,
    pub territories: BTreeMap<String, TerritoryStatus>,
    pub active_missions: Vec<ActiveMission>,
    pub daily_quests: Vec<Quest>,
    pub current_event: Option<String>,
    pub last_battle_result: Option<BattleResult>,
    pub recruited_today: u32,
    pub last_tavern_refresh_day: u32,
    pub logs: VecDeque<LogEntry>,
    pub completed_quests: u32,
    pub population_cap_modifier: i64,
    pub next_id: u64,
    #[serde(skip, default = "GameState::default_log_capacity")]
    log_capacity: usize,
}

impl GameState {
    const fn default_log_capacity() -> usize {
        crate::constants::LOG_CAPACITY
    }

    /// Fresh day-one state: start territory open, opening quests posted,
    /// empty tavern (the session fills it on first run).
    #[must_use]
    pub fn initial(tables: &GameTables, rules: &RulesConfig) -> Self {
        let start = tables.start_territory().map(|t| t.id.as_str());
        let territories = tables
            .territories
            .iter()
            .map(|t| {
                let status = if Some(t.id.as_str()) == start {
                    TerritoryStatus::Available
                } else {
                    TerritoryStatus::Locked
                };
                (t.id.clone(), status)
            })
            .collect();

        let daily_quests = tables
            .quests
            .opening
            .iter()
            .enumerate()
            .filter_map(|(idx, opening)| {
                let template = tables.quests.templates.get(opening.template)?;
                Some(Quest::from_template(
                    format!("q_opening_{idx}"),
                    template,
                    opening.required_power,
                    template.bias,
                ))
            })
            .collect();

        let mut state = Self {
            day: 1,
            gold: rules.initial_gold,
            reputation: 0,
            units: Vec::new(),
            commanders: Vec::new(),
            tavern: Vec::new(),
            buildings: BuildingKind::ALL.into_iter().map(|kind| (kind, 0)).collect(),
            territories,
            active_missions: Vec::new(),
            daily_quests,
            current_event: None,
            last_battle_result: None,
            recruited_today: 0,
            last_tavern_refresh_day: 1,
            logs: VecDeque::new(),
            completed_quests: 0,
            population_cap_modifier: 0,
            next_id: 1,
            log_capacity: rules.log_capacity,
        };
        state.push_log(
            LOG_WELCOME,
            "Welcome, Commander. Frostwind awaits your orders.",
            LogLevel::Info,
        );
        state
    }

    /// Allocate the next entity id.
    pub fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Prepend a log entry, dropping the oldest past the capacity.
    pub fn push_log(&mut self, key: &str, message: impl Into<String>, level: LogLevel) {
        let id = self.allocate_id();
        self.logs.push_front(LogEntry {
            id,
            day: self.day,
            key: key.to_string(),
            message: message.into(),
            level,
        });
        self.logs.truncate(self.log_capacity.max(1));
    }

    /// Override the log cap, trimming immediately.
    pub fn set_log_capacity(&mut self, capacity: usize) {
        self.log_capacity = capacity.max(1);
        self.logs.truncate(self.log_capacity);
    }

    #[must_use]
    pub fn building_level(&self, kind: BuildingKind) -> u32 {
        self.buildings.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn territory_status(&self, id: &str) -> Option<TerritoryStatus> {
        self.territories.get(id).copied()
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    /// Mint a unit with fresh id and reserved fields at their defaults.
    pub fn spawn_unit(
        &mut self,
        archetype: UnitKind,
        name: String,
        count: u32,
        quality: Quality,
        attributes: Attributes,
    ) -> UnitId {
        let id = UnitId(self.allocate_id());
        self.units.push(Unit {
            id,
            archetype,
            name,
            count,
            quality,
            status: UnitStatus::Idle,
            training_days_left: 0,
            attributes,
            morale: UNIT_STARTING_MORALE,
            stamina: UNIT_STARTING_STAMINA,
        });
        id
    }

    /// Most recent log key, handy for assertions and summaries.
    #[must_use]
    pub fn last_log_key(&self) -> Option<&str> {
        self.logs.front().map(|entry| entry.key.as_str())
    }
}
