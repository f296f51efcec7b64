//! Centralized balance and tuning constants for Frostwind game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Knobs a deployment may want to retune live in [`crate::rules::RulesConfig`]
//! and default to the values below; the combat and quality math is fixed here.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_WELCOME: &str = "log.welcome";
pub(crate) const LOG_RECRUIT_SUCCESS: &str = "log.recruit.success";
pub(crate) const LOG_RECRUIT_INVALID_QUANTITY: &str = "log.recruit.invalid-quantity";
pub(crate) const LOG_RECRUIT_POPULATION_CAP: &str = "log.recruit.population-cap";
pub(crate) const LOG_RECRUIT_DAILY_QUOTA: &str = "log.recruit.daily-quota";
pub(crate) const LOG_GOLD_INSUFFICIENT: &str = "log.gold.insufficient";
pub(crate) const LOG_UNITS_MERGED: &str = "log.units.merged";
pub(crate) const LOG_MERGE_REJECTED: &str = "log.units.merge-rejected";
pub(crate) const LOG_TRAINING_COMPLETE: &str = "log.training.complete";
pub(crate) const LOG_DEPLOY: &str = "log.deploy";
pub(crate) const LOG_DEPLOY_NO_IDLE_UNITS: &str = "log.deploy.no-idle-units";
pub(crate) const LOG_CAMPAIGN_UNAVAILABLE: &str = "log.campaign.unavailable";
pub(crate) const LOG_CAMPAIGN_UNDER_ATTACK: &str = "log.campaign.under-attack";
pub(crate) const LOG_BATTLE_VICTORY: &str = "log.battle.victory";
pub(crate) const LOG_BATTLE_DEFEAT: &str = "log.battle.defeat";
pub(crate) const LOG_TERRITORY_CONQUERED: &str = "log.territory.conquered";
pub(crate) const LOG_ECONOMY_DEFICIT: &str = "log.economy.deficit";
pub(crate) const LOG_BUILDING_UPGRADED: &str = "log.building.upgraded";
pub(crate) const LOG_COMMANDER_HIRED: &str = "log.commander.hired";
pub(crate) const LOG_COMMANDER_NOT_IN_TAVERN: &str = "log.commander.not-in-tavern";
pub(crate) const LOG_TAVERN_REFRESHED: &str = "log.tavern.refreshed";
pub(crate) const LOG_EVENT_TRIGGERED: &str = "log.event.triggered";
pub(crate) const LOG_EVENT_RESOLVED: &str = "log.event.resolved";
pub(crate) const LOG_EVENT_INVALID_CHOICE: &str = "log.event.invalid-choice";
pub(crate) const LOG_EVENT_NONE_PENDING: &str = "log.event.none-pending";
pub(crate) const LOG_UNKNOWN_ARCHETYPE: &str = "log.config.unknown-archetype";
pub(crate) const LOG_UNKNOWN_BUILDING: &str = "log.config.unknown-building";

// Economy defaults ---------------------------------------------------------
pub(crate) const INITIAL_GOLD: i64 = 10_000;
pub(crate) const BASE_POPULATION_CAP: i64 = 200;
pub(crate) const BARRACKS_POP_PER_LEVEL: i64 = 100;
pub(crate) const COMMAND_POP_PER_POINT: i64 = 10;
pub(crate) const DAILY_RECRUIT_FRACTION: f64 = 0.1;
pub(crate) const MARKET_INCOME_PER_LEVEL: i64 = 150;
pub(crate) const REPUTATION_PER_DANGER: i64 = 10;
pub(crate) const LOG_CAPACITY: usize = 50;

// Training -----------------------------------------------------------------
pub(crate) const TRAINING_DAYS: u32 = 3;
pub(crate) const TRAINING_POWER_FACTOR: f64 = 0.6;
pub(crate) const VALOR_POWER_BONUS: f64 = 0.05;
pub(crate) const UNIT_STARTING_MORALE: u32 = 100;
pub(crate) const UNIT_STARTING_STAMINA: u32 = 100;

// Quality roll -------------------------------------------------------------
pub(crate) const ELITE_ROLL_THRESHOLD: f64 = 0.95;
pub(crate) const VETERAN_ROLL_THRESHOLD: f64 = 0.70;
pub(crate) const ROOKIE_MULTIPLIER: f64 = 1.0;
pub(crate) const VETERAN_MULTIPLIER: f64 = 1.2;
pub(crate) const ELITE_MULTIPLIER: f64 = 1.5;

// Win chance ---------------------------------------------------------------
pub(crate) const WIN_CHANCE_BASE: f64 = 0.3;
pub(crate) const WIN_CHANCE_RATIO_WEIGHT: f64 = 0.4;
pub const WIN_CHANCE_FLOOR: f64 = 0.05;
pub(crate) const WIN_CHANCE_BASE_CEILING: f64 = 0.95;
pub const WIN_CHANCE_CEILING: f64 = 0.99;
pub(crate) const BIAS_TRIGGER_WEIGHT: f64 = 1.0;
pub(crate) const BIAS_ABSENT_FACTOR: f64 = 0.5;
pub(crate) const BIAS_WEAK_FACTOR: f64 = 0.8;
pub(crate) const BIAS_WEAK_RATIO: f64 = 0.2;
pub(crate) const BIAS_MET_BONUS: f64 = 0.10;

// Battle losses ------------------------------------------------------------
pub(crate) const VICTORY_LOSS_FRACTION: f64 = 0.05;
pub(crate) const DEFEAT_LOSS_FRACTION: f64 = 0.15;
pub(crate) const HOSPITAL_LOSS_REDUCTION: f64 = 0.01;
pub(crate) const MIN_LOSS_FRACTION: f64 = 0.01;
pub(crate) const LOSS_JITTER_MIN: f64 = 0.5;
pub(crate) const LOSS_JITTER_MAX: f64 = 1.5;

// Campaign -----------------------------------------------------------------
pub(crate) const CAMPAIGN_DURATION: u32 = 1;
pub(crate) const CAMPAIGN_DANGER: u32 = 3;

// Quest board --------------------------------------------------------------
pub(crate) const QUEST_COUNT_MIN: usize = 3;
pub(crate) const QUEST_COUNT_MAX: usize = 10;
pub(crate) const QUEST_SOLDIERS_PER_EXTRA: i64 = 50;
pub(crate) const QUEST_COUNT_BONUS: i64 = 2;
pub(crate) const QUEST_BASE_POWER: f64 = 300.0;
pub(crate) const QUEST_DAY_SCALING: f64 = 100.0;
pub(crate) const QUEST_VARIANCE_MIN: f64 = 0.8;
pub(crate) const QUEST_VARIANCE_SPAN: f64 = 0.4;
pub(crate) const QUEST_BIAS_KEEP_CHANCE: f64 = 0.2;

// Tavern -------------------------------------------------------------------
pub(crate) const TAVERN_SIZE: usize = 3;
pub(crate) const TAVERN_REFRESH_DAYS: u32 = 3;
pub(crate) const COMMANDER_BASE_COST: i64 = 1_000;

// Events -------------------------------------------------------------------
pub(crate) const EVENT_DAILY_CHANCE: f64 = 0.15;
