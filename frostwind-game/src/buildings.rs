use crate::command::CommandError;
use crate::constants::LOG_BUILDING_UPGRADED;
use crate::data::{BuildingKind, GameTables};
use crate::state::{GameState, LogLevel};

/// Gold needed for the next level of `kind`.
#[must_use]
pub fn next_upgrade_cost(
    state: &GameState,
    tables: &GameTables,
    kind: BuildingKind,
) -> Option<i64> {
    tables
        .building(kind)
        .map(|building| building.upgrade_cost(state.building_level(kind)))
}

/// Raise `kind` by one level.
///
/// # Errors
///
/// Rejects the upgrade when the treasury cannot cover the cost.
pub fn upgrade(
    state: &mut GameState,
    tables: &GameTables,
    kind: BuildingKind,
) -> Result<u32, CommandError> {
    let building = tables
        .building(kind)
        .ok_or(CommandError::UnknownBuilding(kind))?;
    let level = state.building_level(kind);
    let cost = building.upgrade_cost(level);
    if state.gold < cost {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.gold,
        });
    }
    state.gold -= cost;
    let next = level + 1;
    state.buildings.insert(kind, next);
    state.push_log(
        LOG_BUILDING_UPGRADED,
        format!("{} upgraded to level {next} for {cost} gold.", building.name),
        LogLevel::Success,
    );
    Ok(next)
}
