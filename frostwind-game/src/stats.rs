//! Derived values recomputed from state on every read.
use serde::{Deserialize, Serialize};

use crate::data::{BuildingKind, GameTables};
use crate::numbers::{floor_f64_to_i64, i64_to_f64, u32_to_f64};
use crate::rules::RulesConfig;
use crate::state::{CommanderStats, GameState, TerritoryStatus, Unit, UnitStatus};

/// Army-wide attribute totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArmyStats {
    pub power: i64,
    pub mobility: f64,
    pub range: f64,
    pub magic: f64,
}

/// Snapshot of every derived value the presentation layer reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedStats {
    pub total_soldiers: i64,
    pub max_population: i64,
    pub daily_recruit_cap: u32,
    pub army: ArmyStats,
    pub daily_income: i64,
    pub daily_maintenance: i64,
    pub commanders: CommanderStats,
}

impl DerivedStats {
    #[must_use]
    pub fn compute(state: &GameState, tables: &GameTables, rules: &RulesConfig) -> Self {
        Self {
            total_soldiers: total_soldiers(state),
            max_population: max_population(state, tables, rules),
            daily_recruit_cap: daily_recruit_cap(state, tables, rules),
            army: army_stats(state, rules),
            daily_income: daily_income(state, tables, rules),
            daily_maintenance: daily_maintenance(state, tables),
            commanders: commander_totals(state),
        }
    }
}

#[must_use]
pub fn total_soldiers(state: &GameState) -> i64 {
    state.units.iter().map(|unit| i64::from(unit.count)).sum()
}

#[must_use]
pub fn commander_totals(state: &GameState) -> CommanderStats {
    state
        .commanders
        .iter()
        .fold(CommanderStats::default(), |acc, commander| CommanderStats {
            command: acc.command.saturating_add(commander.stats.command),
            valor: acc.valor.saturating_add(commander.stats.valor),
            strategy: acc.strategy.saturating_add(commander.stats.strategy),
        })
}

fn owned_territories<'a>(
    state: &'a GameState,
    tables: &'a GameTables,
) -> impl Iterator<Item = &'a crate::data::Territory> + 'a {
    state
        .territories
        .iter()
        .filter(|(_, status)| matches!(status, TerritoryStatus::Owned))
        .filter_map(|(id, _)| tables.territory(id))
}

#[must_use]
pub fn max_population(state: &GameState, tables: &GameTables, rules: &RulesConfig) -> i64 {
    let barracks = i64::from(state.building_level(BuildingKind::Barracks));
    let command = i64::from(commander_totals(state).command);
    let territory_cap: i64 = owned_territories(state, tables)
        .map(|t| t.passive_pop_cap)
        .sum();
    rules.base_population_cap
        + barracks * rules.barracks_pop_per_level
        + command * rules.command_pop_per_point
        + territory_cap
        + state.population_cap_modifier
}

#[must_use]
pub fn daily_recruit_cap(state: &GameState, tables: &GameTables, rules: &RulesConfig) -> u32 {
    let cap = max_population(state, tables, rules);
    crate::numbers::floor_f64_to_u32(i64_to_f64(cap) * rules.daily_recruit_fraction)
}

fn readiness_factor(unit: &Unit, rules: &RulesConfig) -> f64 {
    if matches!(unit.status, UnitStatus::Training) {
        rules.training_power_factor
    } else {
        1.0
    }
}

/// Whole-army totals, training units at reduced weight and power boosted by valor.
#[must_use]
pub fn army_stats(state: &GameState, rules: &RulesConfig) -> ArmyStats {
    let mut power = 0.0;
    let mut mobility = 0.0;
    let mut range = 0.0;
    let mut magic = 0.0;
    for unit in &state.units {
        let weight = u32_to_f64(unit.count) * readiness_factor(unit, rules);
        power += i64_to_f64(unit.attributes.power) * weight;
        mobility += i64_to_f64(unit.attributes.mobility) * weight;
        range += i64_to_f64(unit.attributes.range) * weight;
        magic += i64_to_f64(unit.attributes.magic) * weight;
    }
    let valor = u32_to_f64(commander_totals(state).valor);
    ArmyStats {
        power: floor_f64_to_i64(power * (1.0 + valor * rules.valor_power_bonus)),
        mobility,
        range,
        magic,
    }
}

/// Raw attribute sums for a selection of units, as used by the win-chance model.
#[must_use]
pub fn selection_stats<'a>(units: impl IntoIterator<Item = &'a Unit>) -> ArmyStats {
    units
        .into_iter()
        .fold(ArmyStats::default(), |acc, unit| {
            let count = i64::from(unit.count);
            ArmyStats {
                power: acc.power + unit.attributes.power * count,
                mobility: acc.mobility + i64_to_f64(unit.attributes.mobility * count),
                range: acc.range + i64_to_f64(unit.attributes.range * count),
                magic: acc.magic + i64_to_f64(unit.attributes.magic * count),
            }
        })
}

#[must_use]
pub fn daily_maintenance(state: &GameState, tables: &GameTables) -> i64 {
    state
        .units
        .iter()
        .map(|unit| {
            tables
                .archetype(unit.archetype)
                .map_or(0, |arch| arch.maintenance * i64::from(unit.count))
        })
        .sum()
}

#[must_use]
pub fn daily_income(state: &GameState, tables: &GameTables, rules: &RulesConfig) -> i64 {
    let market = i64::from(state.building_level(BuildingKind::Market));
    let territory_income: i64 = owned_territories(state, tables)
        .map(|t| t.passive_income)
        .sum();
    market * rules.market_income_per_level + territory_income
}
