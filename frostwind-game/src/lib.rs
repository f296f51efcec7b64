//! Frostwind Game Engine
//!
//! Turn-based command simulation: recruit and train an army, send it on
//! quests, grow the keep's economy and push across the campaign map. The
//! crate owns state and rules only; rendering and input live elsewhere.

pub mod buildings;
pub mod campaign;
pub mod command;
pub mod constants;
pub mod data;
pub mod events;
pub mod missions;
pub mod numbers;
pub mod quests;
pub mod recruitment;
pub mod rng;
pub mod rules;
pub mod session;
pub mod state;
pub mod stats;
pub mod tavern;
pub mod training;
pub mod turn;

// Re-export commonly used types
pub use command::{Command, CommandError, CommandOutcome};
pub use data::{
    Attributes, BuildingKind, ConfigError, Difficulty, EventDef, EventEffect, GameTables, Quality,
    Rarity, StatBias, TableSources, Territory, UnitKind,
};
pub use missions::win_chance;
pub use recruitment::scale_label;
pub use rng::RngBundle;
pub use rules::RulesConfig;
pub use session::GameSession;
pub use state::{
    ActiveMission, BattleResult, Commander, CommanderId, CommanderStats, GameState, LogEntry,
    LogLevel, Loss, MissionId, Quest, TerritoryStatus, Unit, UnitId, UnitStatus,
};
pub use stats::{ArmyStats, DerivedStats};
pub use turn::DayOutcome;

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the static tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a table cannot be read, parsed or validated.
    fn load_tables(&self) -> Result<GameTables, Self::Error>;

    /// Load balance rules, falling back to defaults when none are configured.
    ///
    /// # Errors
    ///
    /// Returns an error if configured rules cannot be parsed or are out of range.
    fn load_rules(&self) -> Result<RulesConfig, Self::Error>;
}

/// Loader for the tables compiled into the crate, with optional rule overrides.
#[derive(Debug, Clone, Default)]
pub struct StaticDataLoader {
    rules_json: Option<String>,
}

impl StaticDataLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules_json: None }
    }

    /// Use `json` as a partial override of the default rules.
    #[must_use]
    pub fn with_rules_json(mut self, json: impl Into<String>) -> Self {
        self.rules_json = Some(json.into());
        self
    }
}

impl DataLoader for StaticDataLoader {
    type Error = ConfigError;

    fn load_tables(&self) -> Result<GameTables, Self::Error> {
        GameTables::load_from_static()
    }

    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        self.rules_json
            .as_deref()
            .map_or_else(|| Ok(RulesConfig::default_config()), RulesConfig::from_json)
    }
}

/// Main game engine for managing game instances
pub struct GameEngine<L: DataLoader> {
    data_loader: L,
}

impl<L: DataLoader> GameEngine<L> {
    /// Create a new game engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Start a new campaign with the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the tables or rules cannot be loaded.
    pub fn create_session(&self, seed: u64) -> Result<GameSession, L::Error> {
        let tables = self.data_loader.load_tables()?;
        let rules = self.data_loader.load_rules()?;
        log::info!("starting campaign with seed {seed}");
        Ok(GameSession::new(seed, tables, rules))
    }

    /// Start a campaign, replaying `commands` before handing the session back.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or a scripted command is rejected.
    pub fn replay(&self, seed: u64, commands: &[Command]) -> Result<GameSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let mut session = self.create_session(seed).map_err(Into::into)?;
        for (step, command) in commands.iter().enumerate() {
            session
                .dispatch(command.clone())
                .map_err(|err| anyhow::anyhow!("command {step} rejected: {err}"))?;
        }
        Ok(session)
    }
}
