//! Tunable balance rules.
//!
//! Every field defaults to the value in [`crate::constants`], so a JSON
//! override only needs to name the knobs it changes.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BARRACKS_POP_PER_LEVEL, BASE_POPULATION_CAP, COMMAND_POP_PER_POINT, COMMANDER_BASE_COST,
    DAILY_RECRUIT_FRACTION, EVENT_DAILY_CHANCE, INITIAL_GOLD, LOG_CAPACITY,
    MARKET_INCOME_PER_LEVEL, REPUTATION_PER_DANGER, TAVERN_REFRESH_DAYS, TAVERN_SIZE,
    TRAINING_DAYS, TRAINING_POWER_FACTOR, VALOR_POWER_BONUS,
};
use crate::data::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_initial_gold")]
    pub initial_gold: i64,
    #[serde(default = "RulesConfig::default_base_population_cap")]
    pub base_population_cap: i64,
    #[serde(default = "RulesConfig::default_barracks_pop_per_level")]
    pub barracks_pop_per_level: i64,
    #[serde(default = "RulesConfig::default_command_pop_per_point")]
    pub command_pop_per_point: i64,
    #[serde(default = "RulesConfig::default_daily_recruit_fraction")]
    pub daily_recruit_fraction: f64,
    #[serde(default = "RulesConfig::default_market_income_per_level")]
    pub market_income_per_level: i64,
    #[serde(default = "RulesConfig::default_reputation_per_danger")]
    pub reputation_per_danger: i64,
    #[serde(default = "RulesConfig::default_training_days")]
    pub training_days: u32,
    #[serde(default = "RulesConfig::default_training_power_factor")]
    pub training_power_factor: f64,
    #[serde(default = "RulesConfig::default_valor_power_bonus")]
    pub valor_power_bonus: f64,
    #[serde(default = "RulesConfig::default_tavern_size")]
    pub tavern_size: usize,
    #[serde(default = "RulesConfig::default_tavern_refresh_days")]
    pub tavern_refresh_days: u32,
    #[serde(default = "RulesConfig::default_commander_base_cost")]
    pub commander_base_cost: i64,
    #[serde(default = "RulesConfig::default_event_chance")]
    pub event_chance: f64,
    #[serde(default = "RulesConfig::default_log_capacity")]
    pub log_capacity: usize,
}

impl RulesConfig {
    const fn default_initial_gold() -> i64 {
        INITIAL_GOLD
    }

    const fn default_base_population_cap() -> i64 {
        BASE_POPULATION_CAP
    }

    const fn default_barracks_pop_per_level() -> i64 {
        BARRACKS_POP_PER_LEVEL
    }

    const fn default_command_pop_per_point() -> i64 {
        COMMAND_POP_PER_POINT
    }

    const fn default_daily_recruit_fraction() -> f64 {
        DAILY_RECRUIT_FRACTION
    }

    const fn default_market_income_per_level() -> i64 {
        MARKET_INCOME_PER_LEVEL
    }

    const fn default_reputation_per_danger() -> i64 {
        REPUTATION_PER_DANGER
    }

    const fn default_training_days() -> u32 {
        TRAINING_DAYS
    }

    const fn default_training_power_factor() -> f64 {
        TRAINING_POWER_FACTOR
    }

    const fn default_valor_power_bonus() -> f64 {
        VALOR_POWER_BONUS
    }

    const fn default_tavern_size() -> usize {
        TAVERN_SIZE
    }

    const fn default_tavern_refresh_days() -> u32 {
        TAVERN_REFRESH_DAYS
    }

    const fn default_commander_base_cost() -> i64 {
        COMMANDER_BASE_COST
    }

    const fn default_event_chance() -> f64 {
        EVENT_DAILY_CHANCE
    }

    const fn default_log_capacity() -> usize {
        LOG_CAPACITY
    }

    /// Get default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Load rules from a JSON override.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: Self = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            table: "rules",
            source,
        })?;
        rules.validate()?;
        Ok(rules)
    }

    /// Reject values that would break simulation invariants.
    ///
    /// # Errors
    ///
    /// Returns the first field found outside its accepted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_population_cap < 0 {
            return Err(invalid(
                "base_population_cap",
                "non-negative",
                self.base_population_cap,
            ));
        }
        if !(0.0..=1.0).contains(&self.daily_recruit_fraction) {
            return Err(invalid(
                "daily_recruit_fraction",
                "between 0 and 1",
                self.daily_recruit_fraction,
            ));
        }
        if !(0.0..=1.0).contains(&self.training_power_factor) {
            return Err(invalid(
                "training_power_factor",
                "between 0 and 1",
                self.training_power_factor,
            ));
        }
        if !(0.0..=1.0).contains(&self.event_chance) {
            return Err(invalid("event_chance", "between 0 and 1", self.event_chance));
        }
        if self.valor_power_bonus < 0.0 {
            return Err(invalid(
                "valor_power_bonus",
                "non-negative",
                self.valor_power_bonus,
            ));
        }
        if self.tavern_size == 0 {
            return Err(invalid("tavern_size", "at least 1", self.tavern_size));
        }
        if self.tavern_refresh_days == 0 {
            return Err(invalid(
                "tavern_refresh_days",
                "at least 1",
                self.tavern_refresh_days,
            ));
        }
        if self.log_capacity == 0 {
            return Err(invalid("log_capacity", "at least 1", self.log_capacity));
        }
        if self.commander_base_cost < 0 {
            return Err(invalid(
                "commander_base_cost",
                "non-negative",
                self.commander_base_cost,
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, expected: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidRule {
        field,
        expected,
        value: value.to_string(),
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            initial_gold: Self::default_initial_gold(),
            base_population_cap: Self::default_base_population_cap(),
            barracks_pop_per_level: Self::default_barracks_pop_per_level(),
            command_pop_per_point: Self::default_command_pop_per_point(),
            daily_recruit_fraction: Self::default_daily_recruit_fraction(),
            market_income_per_level: Self::default_market_income_per_level(),
            reputation_per_danger: Self::default_reputation_per_danger(),
            training_days: Self::default_training_days(),
            training_power_factor: Self::default_training_power_factor(),
            valor_power_bonus: Self::default_valor_power_bonus(),
            tavern_size: Self::default_tavern_size(),
            tavern_refresh_days: Self::default_tavern_refresh_days(),
            commander_base_cost: Self::default_commander_base_cost(),
            event_chance: Self::default_event_chance(),
            log_capacity: Self::default_log_capacity(),
        }
    }
}
