//! Random encounters with branching choices.
use rand::Rng;

use crate::command::CommandError;
use crate::constants::{LOG_EVENT_RESOLVED, LOG_EVENT_TRIGGERED};
use crate::data::{EventEffect, GameTables};
use crate::rules::RulesConfig;
use crate::state::{GameState, LogLevel, UnitStatus};

/// Roll for a new event unless one is already waiting on the player.
pub fn maybe_trigger<R: Rng + ?Sized>(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
) -> Option<String> {
    if state.current_event.is_some() || tables.events.is_empty() {
        return None;
    }
    if rng.random::<f64>() >= rules.event_chance {
        return None;
    }
    let event = &tables.events[rng.random_range(0..tables.events.len())];
    state.current_event = Some(event.id.clone());
    state.push_log(
        LOG_EVENT_TRIGGERED,
        format!("{}: {}", event.title, event.description),
        LogLevel::Warning,
    );
    log::info!("event {} triggered on day {}", event.id, state.day);
    Some(event.id.clone())
}

/// Apply choice `index` of the pending event and clear it.
///
/// # Errors
///
/// Rejects the call when nothing is pending or the index is out of range.
pub fn choose(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    index: usize,
) -> Result<String, CommandError> {
    let event = state
        .current_event
        .as_deref()
        .and_then(|id| tables.event(id))
        .ok_or(CommandError::NoPendingEvent)?;
    let choice = event
        .choices
        .get(index)
        .ok_or(CommandError::InvalidEventChoice {
            index,
            available: event.choices.len(),
        })?;

    for effect in &choice.effects {
        apply_effect(state, rules, effect);
    }
    state.current_event = None;
    state.push_log(
        LOG_EVENT_RESOLVED,
        format!("{}: {}", event.title, choice.label),
        LogLevel::Info,
    );
    Ok(event.id.clone())
}

fn apply_effect(state: &mut GameState, rules: &RulesConfig, effect: &EventEffect) {
    match effect {
        EventEffect::Gold { amount } => state.gold += amount,
        EventEffect::Reputation { amount } => state.reputation += amount,
        EventEffect::GrantUnit {
            archetype,
            name,
            count,
            quality,
            attributes,
            morale,
            stamina,
        } => {
            let id = state.spawn_unit(*archetype, name.clone(), *count, *quality, *attributes);
            if let Some(unit) = state.units.iter_mut().find(|unit| unit.id == id) {
                unit.status = UnitStatus::Training;
                unit.training_days_left = rules.training_days;
                unit.morale = *morale;
                unit.stamina = *stamina;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(deprecated)]

    use super::*;
    use rand::rngs::mock::StepRng;

    fn setup() -> (GameState, GameTables, RulesConfig) {
        let tables = GameTables::load_from_static().unwrap();
        let rules = RulesConfig::default();
        let state = GameState::initial(&tables, &rules);
        (state, tables, rules)
    }

    #[test]
    fn low_roll_triggers_and_pending_event_blocks_another() {
        let (mut state, tables, rules) = setup();
        let mut rng = StepRng::new(0, 0);
        let id = maybe_trigger(&mut state, &tables, &rules, &mut rng).unwrap();
        assert_eq!(id, "evt_refugees");
        assert_eq!(state.current_event.as_deref(), Some("evt_refugees"));
        assert!(maybe_trigger(&mut state, &tables, &rules, &mut rng).is_none());
    }

    #[test]
    fn high_roll_triggers_nothing() {
        let (mut state, tables, rules) = setup();
        let mut rng = StepRng::new(u64::MAX, 0);
        assert!(maybe_trigger(&mut state, &tables, &rules, &mut rng).is_none());
        assert!(state.current_event.is_none());
    }

    #[test]
    fn accepting_refugees_grants_militia() {
        let (mut state, tables, rules) = setup();
        state.current_event = Some("evt_refugees".into());
        choose(&mut state, &tables, &rules, 0).unwrap();
        assert_eq!(state.gold, 9_800);
        assert_eq!(state.reputation, 10);
        assert!(state.current_event.is_none());
        let militia = &state.units[0];
        assert_eq!(militia.name, "Volunteer Militia");
        assert_eq!(militia.count, 20);
        assert_eq!(militia.status, UnitStatus::Training);
        assert_eq!(militia.training_days_left, 3);
        assert_eq!(militia.attributes.power, 5);
        assert_eq!(militia.morale, 80);
    }

    #[test]
    fn invalid_choices_change_nothing() {
        let (mut state, tables, rules) = setup();
        assert_eq!(
            choose(&mut state, &tables, &rules, 0),
            Err(CommandError::NoPendingEvent)
        );
        state.current_event = Some("evt_festival".into());
        let before = state.clone();
        assert_eq!(
            choose(&mut state, &tables, &rules, 2),
            Err(CommandError::InvalidEventChoice {
                index: 2,
                available: 2
            })
        );
        assert_eq!(state, before);
    }
}
