//! The engine object collaborators hold: state, tables, rules and RNG in one place.
use crate::buildings;
use crate::campaign;
use crate::command::{Command, CommandError, CommandOutcome};
use crate::data::{BuildingKind, GameTables, Quality, UnitKind};
use crate::events;
use crate::missions;
use crate::recruitment;
use crate::rng::RngBundle;
use crate::rules::RulesConfig;
use crate::state::{
    BattleResult, Commander, CommanderId, GameState, LogLevel, MissionId, Quest, UnitId,
};
use crate::stats::DerivedStats;
use crate::tavern;
use crate::turn::{self, DayOutcome};

/// One running campaign. All mutation goes through its commands.
#[derive(Debug, Clone)]
pub struct GameSession {
    seed: u64,
    tables: GameTables,
    rules: RulesConfig,
    rngs: RngBundle,
    state: GameState,
}

impl GameSession {
    /// Start a campaign on day one with a stocked tavern.
    #[must_use]
    pub fn new(seed: u64, tables: GameTables, rules: RulesConfig) -> Self {
        let state = Self::fresh_state(&tables, &rules);
        let mut session = Self {
            seed,
            tables,
            rules,
            rngs: RngBundle::from_user_seed(seed),
            state,
        };
        session.stock_tavern();
        session
    }

    fn fresh_state(tables: &GameTables, rules: &RulesConfig) -> GameState {
        let mut state = GameState::initial(tables, rules);
        state.set_log_capacity(rules.log_capacity);
        state
    }

    fn stock_tavern(&mut self) {
        if tavern::refresh_due(&self.state, &self.rules) {
            tavern::refresh(
                &mut self.state,
                &self.tables,
                &self.rules,
                self.rngs.tavern(),
            );
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn tables(&self) -> &GameTables {
        &self.tables
    }

    #[must_use]
    pub const fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Derived values for the current state.
    #[must_use]
    pub fn stats(&self) -> DerivedStats {
        DerivedStats::compute(&self.state, &self.tables, &self.rules)
    }

    /// Total random draws consumed so far.
    #[must_use]
    pub const fn rng_draws(&self) -> u64 {
        self.rngs.total_draws()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    fn settle<T>(&mut self, result: Result<T, CommandError>) -> Result<T, CommandError> {
        if let Err(err) = &result {
            if err.is_silent() {
                log::debug!("command ignored: {err}");
            } else {
                log::warn!("command rejected on day {}: {err}", self.state.day);
                self.state
                    .push_log(err.key(), err.to_string(), LogLevel::Warning);
            }
        }
        result
    }

    /// # Errors
    ///
    /// See [`recruitment::recruit`].
    pub fn recruit(
        &mut self,
        kind: UnitKind,
        quantity: u32,
    ) -> Result<(UnitId, Quality), CommandError> {
        let result = recruitment::recruit(
            &mut self.state,
            &self.tables,
            &self.rules,
            self.rngs.recruitment(),
            kind,
            quantity,
        );
        self.settle(result)
    }

    pub fn advance_day(&mut self) -> DayOutcome {
        turn::advance_day(&mut self.state, &self.tables, &self.rules, &mut self.rngs)
    }

    /// Deploy with a caller-supplied win chance.
    ///
    /// # Errors
    ///
    /// See [`missions::deploy`].
    pub fn deploy(
        &mut self,
        quest: Quest,
        unit_ids: &[UnitId],
        win_chance: f64,
    ) -> Result<MissionId, CommandError> {
        let result = missions::deploy(&mut self.state, quest, unit_ids, win_chance);
        self.settle(result)
    }

    /// Deploy with the win chance the engine estimates for the selection.
    ///
    /// # Errors
    ///
    /// See [`missions::deploy`].
    pub fn deploy_estimated(
        &mut self,
        quest: Quest,
        unit_ids: &[UnitId],
    ) -> Result<(MissionId, f64), CommandError> {
        let chance = self.estimate_win_chance(&quest, unit_ids);
        self.deploy(quest, unit_ids, chance).map(|id| (id, chance))
    }

    #[must_use]
    pub fn estimate_win_chance(&self, quest: &Quest, unit_ids: &[UnitId]) -> f64 {
        missions::estimate_win_chance(&self.state, quest, unit_ids)
    }

    /// Build the assault quest for a campaign territory.
    ///
    /// # Errors
    ///
    /// See [`campaign::attack_quest`].
    pub fn attack_quest(&mut self, territory: &str) -> Result<Quest, CommandError> {
        let result = campaign::attack_quest(&self.state, &self.tables, territory);
        self.settle(result)
    }

    /// # Errors
    ///
    /// Returns [`CommandError::MergeRejected`]; it is never written to the player log.
    pub fn merge_units(&mut self, unit_ids: &[UnitId]) -> Result<UnitId, CommandError> {
        let result = recruitment::merge_units(&mut self.state, &self.tables, unit_ids);
        self.settle(result)
    }

    /// # Errors
    ///
    /// See [`buildings::upgrade`].
    pub fn upgrade_building(&mut self, kind: BuildingKind) -> Result<u32, CommandError> {
        let result = buildings::upgrade(&mut self.state, &self.tables, kind);
        self.settle(result)
    }

    /// # Errors
    ///
    /// See [`tavern::hire`].
    pub fn hire_commander(&mut self, id: CommanderId) -> Result<Commander, CommandError> {
        let result = tavern::hire(&mut self.state, id);
        self.settle(result)
    }

    /// # Errors
    ///
    /// See [`events::choose`].
    pub fn choose_event(&mut self, index: usize) -> Result<String, CommandError> {
        let result = events::choose(&mut self.state, &self.tables, &self.rules, index);
        self.settle(result)
    }

    /// Clear and return the stored battle report.
    pub fn acknowledge_battle_result(&mut self) -> Option<BattleResult> {
        self.state.last_battle_result.take()
    }

    pub fn set_gold(&mut self, amount: i64) {
        log::debug!("gold overridden: {} -> {amount}", self.state.gold);
        self.state.gold = amount;
    }

    pub fn set_population_cap_modifier(&mut self, amount: i64) {
        log::debug!("population cap modifier set to {amount}");
        self.state.population_cap_modifier = amount;
    }

    /// Back to day one with the RNG reseeded from the session seed.
    pub fn reset_game(&mut self) {
        log::info!("resetting campaign (seed {})", self.seed);
        self.rngs = RngBundle::from_user_seed(self.seed);
        self.state = Self::fresh_state(&self.tables, &self.rules);
        self.stock_tavern();
    }

    /// Force a new tavern pool regardless of the refresh timer.
    pub fn refresh_tavern(&mut self) {
        tavern::refresh(
            &mut self.state,
            &self.tables,
            &self.rules,
            self.rngs.tavern(),
        );
    }

    /// Run a command through the matching method.
    ///
    /// # Errors
    ///
    /// Propagates the command's rejection; the state is unchanged when one is returned.
    pub fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        let outcome = match command {
            Command::Recruit { kind, quantity } => {
                let (unit, quality) = self.recruit(kind, quantity)?;
                CommandOutcome::Recruited { unit, quality }
            }
            Command::AdvanceDay => CommandOutcome::DayAdvanced(self.advance_day()),
            Command::Deploy {
                quest,
                unit_ids,
                win_chance,
            } => {
                let mission = self.deploy(quest, &unit_ids, win_chance)?;
                let win_chance = self
                    .state
                    .active_missions
                    .iter()
                    .find(|m| m.id == mission)
                    .map_or(win_chance, |m| m.win_chance);
                CommandOutcome::Deployed {
                    mission,
                    win_chance,
                }
            }
            Command::DeployEstimated { quest, unit_ids } => {
                let (mission, win_chance) = self.deploy_estimated(quest, &unit_ids)?;
                CommandOutcome::Deployed {
                    mission,
                    win_chance,
                }
            }
            Command::AttackTerritory { territory } => {
                CommandOutcome::CampaignQuest(self.attack_quest(&territory)?)
            }
            Command::MergeUnits { unit_ids } => CommandOutcome::Merged {
                unit: self.merge_units(&unit_ids)?,
            },
            Command::UpgradeBuilding { kind } => CommandOutcome::Upgraded {
                kind,
                level: self.upgrade_building(kind)?,
            },
            Command::HireCommander { id } => CommandOutcome::Hired(self.hire_commander(id)?),
            Command::ChooseEvent { index } => CommandOutcome::EventResolved {
                event: self.choose_event(index)?,
            },
            Command::AcknowledgeBattleResult => CommandOutcome::Acknowledged {
                result: self.acknowledge_battle_result(),
            },
            Command::SetGold { amount } => {
                self.set_gold(amount);
                CommandOutcome::Applied
            }
            Command::SetPopulationCapModifier { amount } => {
                self.set_population_cap_modifier(amount);
                CommandOutcome::Applied
            }
            Command::ResetGame => {
                self.reset_game();
                CommandOutcome::Applied
            }
            Command::RefreshTavern => {
                self.refresh_tavern();
                CommandOutcome::TavernRefreshed
            }
        };
        Ok(outcome)
    }
}
