//! The daily tick. Every rule that depends on the calendar runs here, in a
//! fixed order, so a day always resolves the same way for the same seed.
use serde::{Deserialize, Serialize};

use crate::constants::LOG_ECONOMY_DEFICIT;
use crate::data::GameTables;
use crate::events::maybe_trigger;
use crate::missions::resolve_arrivals;
use crate::quests::generate_daily_quests;
use crate::rng::RngBundle;
use crate::rules::RulesConfig;
use crate::state::{BattleResult, GameState, LogLevel, UnitId};
use crate::stats::{daily_income, daily_maintenance, total_soldiers};
use crate::tavern;
use crate::training::progress_training;

/// What happened while advancing one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayOutcome {
    /// The day the state is now on.
    pub day: u32,
    pub battle_results: Vec<BattleResult>,
    pub triggered_event: Option<String>,
    pub income: i64,
    pub maintenance: i64,
    /// Net treasury change across the whole tick, battle rewards included.
    pub gold_delta: i64,
    pub units_ready: Vec<UnitId>,
    pub tavern_refreshed: bool,
}

/// Advance the calendar by one day.
///
/// Order: missions arriving on the new day, upkeep and income, training,
/// a fresh quest board for the day being closed, a possible event, the
/// recruit quota reset, the day counter, then the tavern check against the
/// new day.
pub fn advance_day(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rngs: &mut RngBundle,
) -> DayOutcome {
    let entering = state.day.saturating_add(1);
    let opening_gold = state.gold;

    let battle_results = resolve_arrivals(state, tables, rules, rngs.combat(), entering);

    let maintenance = daily_maintenance(state, tables);
    let income = daily_income(state, tables, rules);
    state.gold += income - maintenance;
    if state.gold < 0 {
        let gold = state.gold;
        state.push_log(
            LOG_ECONOMY_DEFICIT,
            format!("The treasury is in debt ({gold} gold). Upkeep is outpacing income."),
            LogLevel::Danger,
        );
    }

    let units_ready = progress_training(state);

    let soldiers = total_soldiers(state);
    state.daily_quests = generate_daily_quests(tables, rngs.quests(), state.day, soldiers);

    let triggered_event = maybe_trigger(state, tables, rules, rngs.events());

    state.recruited_today = 0;
    state.day = entering;

    let tavern_refreshed = tavern::refresh_due(state, rules);
    if tavern_refreshed {
        tavern::refresh(state, tables, rules, rngs.tavern());
    }

    let outcome = DayOutcome {
        day: state.day,
        battle_results,
        triggered_event,
        income,
        maintenance,
        gold_delta: state.gold - opening_gold,
        units_ready,
        tavern_refreshed,
    };
    log::debug!(
        "day {} begins: gold {} ({:+}), {} battles, event {:?}",
        outcome.day,
        state.gold,
        outcome.gold_delta,
        outcome.battle_results.len(),
        outcome.triggered_event
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Quality, UnitKind};
    use crate::missions::deploy;
    use crate::state::UnitStatus;

    fn setup() -> (GameState, GameTables, RulesConfig, RngBundle) {
        let tables = GameTables::load_from_static().unwrap();
        let rules = RulesConfig {
            event_chance: 0.0,
            ..RulesConfig::default()
        };
        let state = GameState::initial(&tables, &rules);
        (state, tables, rules, RngBundle::from_user_seed(42))
    }

    #[test]
    fn day_advances_with_upkeep_and_fresh_board() {
        let (mut state, tables, rules, mut rngs) = setup();
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        state.spawn_unit(UnitKind::Infantry, "x".into(), 100, Quality::Rookie, attrs);
        state.recruited_today = 15;

        let outcome = advance_day(&mut state, &tables, &rules, &mut rngs);
        assert_eq!(outcome.day, 2);
        assert_eq!(state.day, 2);
        assert_eq!(outcome.maintenance, 200);
        assert_eq!(outcome.gold_delta, -200);
        assert_eq!(state.gold, 9_800);
        assert_eq!(state.recruited_today, 0);
        assert_eq!(state.daily_quests.len(), 4);
        assert!(state.daily_quests.iter().all(|q| q.id.starts_with("dq_1_")));
        assert!(outcome.tavern_refreshed);
        assert_eq!(state.tavern.len(), 3);
        assert!(outcome.triggered_event.is_none());
    }

    #[test]
    fn quest_board_is_keyed_to_the_day_before_the_increment() {
        let (mut state, tables, rules, mut rngs) = setup();
        for expected in 1..=3u32 {
            assert_eq!(state.day, expected);
            advance_day(&mut state, &tables, &rules, &mut rngs);
            let prefix = format!("dq_{expected}_");
            assert!(
                state.daily_quests.iter().all(|q| q.id.starts_with(&prefix)),
                "day {expected}: {:?}",
                state.daily_quests.iter().map(|q| &q.id).collect::<Vec<_>>()
            );
        }
        assert_eq!(state.day, 4);
    }

    #[test]
    fn deficit_is_logged_and_gold_goes_negative() {
        let (mut state, tables, rules, mut rngs) = setup();
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        state.spawn_unit(UnitKind::Infantry, "x".into(), 100, Quality::Rookie, attrs);
        state.gold = 50;
        advance_day(&mut state, &tables, &rules, &mut rngs);
        assert_eq!(state.gold, -150);
        assert!(state.logs.iter().any(|l| l.key == LOG_ECONOMY_DEFICIT));
    }

    #[test]
    fn missions_resolve_on_the_day_they_arrive() {
        let (mut state, tables, rules, mut rngs) = setup();
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        let id = state.spawn_unit(UnitKind::Infantry, "x".into(), 50, Quality::Rookie, attrs);
        let quest = state.daily_quests[0].clone();
        deploy(&mut state, quest, &[id], 0.5).unwrap();

        let outcome = advance_day(&mut state, &tables, &rules, &mut rngs);
        assert_eq!(outcome.battle_results.len(), 1);
        assert!(state.active_missions.is_empty());
        assert!(
            state
                .unit(id)
                .is_none_or(|unit| unit.status == UnitStatus::Idle)
        );
        assert_eq!(
            state.last_battle_result.as_ref(),
            outcome.battle_results.last()
        );
    }

    #[test]
    fn tavern_waits_three_days_between_refreshes() {
        let (mut state, tables, rules, mut rngs) = setup();
        assert!(advance_day(&mut state, &tables, &rules, &mut rngs).tavern_refreshed);
        assert!(!advance_day(&mut state, &tables, &rules, &mut rngs).tavern_refreshed);
        assert!(!advance_day(&mut state, &tables, &rules, &mut rngs).tavern_refreshed);
        assert!(advance_day(&mut state, &tables, &rules, &mut rngs).tavern_refreshed);
        assert_eq!(state.last_tavern_refresh_day, 5);
    }
}
