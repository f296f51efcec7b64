//! Territory ownership and unlock propagation over the campaign graph.
use crate::command::CommandError;
use crate::constants::{CAMPAIGN_DANGER, CAMPAIGN_DURATION, LOG_TERRITORY_CONQUERED};
use crate::data::GameTables;
use crate::state::{GameState, LogLevel, Quest, TerritoryStatus};

/// Whether a mission against `territory` is already in flight.
#[must_use]
pub fn under_attack(state: &GameState, territory: &str) -> bool {
    state
        .active_missions
        .iter()
        .any(|mission| mission.quest.territory.as_deref() == Some(territory))
}

/// Build the one-day assault quest for an available territory.
///
/// # Errors
///
/// Rejects territories that are unknown, locked, already owned, or already
/// targeted by an active mission.
pub fn attack_quest(
    state: &GameState,
    tables: &GameTables,
    territory_id: &str,
) -> Result<Quest, CommandError> {
    let territory = tables
        .territory(territory_id)
        .ok_or_else(|| CommandError::CampaignUnavailable(territory_id.to_string()))?;
    if state.territory_status(territory_id) != Some(TerritoryStatus::Available) {
        return Err(CommandError::CampaignUnavailable(territory.name.clone()));
    }
    if under_attack(state, territory_id) {
        return Err(CommandError::CampaignUnderAttack(territory.name.clone()));
    }
    Ok(Quest {
        id: territory.id.clone(),
        title: format!("Reclaim {}", territory.name),
        difficulty: territory.difficulty,
        required_power: territory.required_power,
        reward_gold: territory.reward_gold,
        duration: CAMPAIGN_DURATION,
        danger_level: CAMPAIGN_DANGER,
        bias: territory.combat_bias,
        territory: Some(territory.id.clone()),
    })
}

/// Mark `territory_id` owned and open its locked successors.
///
/// Returns the ids that moved from locked to available.
pub fn conquer(state: &mut GameState, tables: &GameTables, territory_id: &str) -> Vec<String> {
    let Some(territory) = tables.territory(territory_id) else {
        log::warn!("conquest of unknown territory {territory_id} ignored");
        return Vec::new();
    };
    state
        .territories
        .insert(territory.id.clone(), TerritoryStatus::Owned);

    let mut unlocked = Vec::new();
    for next in &territory.unlocks {
        match state.territories.get_mut(next) {
            Some(status) if *status == TerritoryStatus::Locked => {
                *status = TerritoryStatus::Available;
                unlocked.push(next.clone());
            }
            _ => {}
        }
    }

    let opened = unlocked
        .iter()
        .filter_map(|id| tables.territory(id).map(|t| t.name.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let message = if opened.is_empty() {
        format!("{} is now under our banner.", territory.name)
    } else {
        format!(
            "{} is now under our banner. New fronts open: {opened}.",
            territory.name
        )
    };
    state.push_log(LOG_TERRITORY_CONQUERED, message, LogLevel::Success);
    log::info!("territory {territory_id} conquered, unlocked {unlocked:?}");
    unlocked
}
