use std::collections::{BTreeMap, HashSet};

use frostwind_game::missions::{WIN_CHANCE_CEILING, WIN_CHANCE_FLOOR};
use frostwind_game::{
    BuildingKind, GameSession, GameState, GameTables, RulesConfig, TerritoryStatus, UnitKind,
    UnitStatus,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Recruit(usize, u32),
    Advance,
    Deploy(usize),
    Attack,
    Merge,
    Upgrade(usize),
    Hire(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..UnitKind::ALL.len(), 0..40u32).prop_map(|(kind, qty)| Op::Recruit(kind, qty)),
        Just(Op::Advance),
        Just(Op::Advance),
        (0..10usize).prop_map(Op::Deploy),
        Just(Op::Attack),
        Just(Op::Merge),
        (0..BuildingKind::ALL.len()).prop_map(Op::Upgrade),
        (0..3usize).prop_map(Op::Hire),
    ]
}

fn idle_ids(state: &GameState) -> Vec<frostwind_game::UnitId> {
    state
        .units
        .iter()
        .filter(|unit| unit.status == UnitStatus::Idle)
        .map(|unit| unit.id)
        .collect()
}

fn apply(session: &mut GameSession, op: &Op) {
    match *op {
        Op::Recruit(kind, qty) => {
            let _ = session.recruit(UnitKind::ALL[kind], qty);
        }
        Op::Advance => {
            session.advance_day();
        }
        Op::Deploy(idx) => {
            let quests = &session.state().daily_quests;
            if quests.is_empty() {
                return;
            }
            let quest = quests[idx % quests.len()].clone();
            let ids = idle_ids(session.state());
            let _ = session.deploy_estimated(quest, &ids);
        }
        Op::Attack => {
            let available: Vec<String> = session
                .state()
                .territories
                .iter()
                .filter(|(_, status)| **status == TerritoryStatus::Available)
                .map(|(id, _)| id.clone())
                .collect();
            for territory in available {
                if let Ok(quest) = session.attack_quest(&territory) {
                    let ids = idle_ids(session.state());
                    let _ = session.deploy(quest, &ids, 0.9);
                    break;
                }
            }
        }
        Op::Merge => {
            let ids = idle_ids(session.state());
            let _ = session.merge_units(&ids[..ids.len().min(2)]);
        }
        Op::Upgrade(kind) => {
            let _ = session.upgrade_building(BuildingKind::ALL[kind]);
        }
        Op::Hire(idx) => {
            if let Some(id) = session.state().tavern.get(idx).map(|c| c.id) {
                let _ = session.hire_commander(id);
            }
        }
    }
}

const fn rank(status: TerritoryStatus) -> u8 {
    match status {
        TerritoryStatus::Locked => 0,
        TerritoryStatus::Available => 1,
        TerritoryStatus::Owned => 2,
    }
}

fn check_invariants(
    session: &GameSession,
    previous: &BTreeMap<String, TerritoryStatus>,
) -> Result<(), TestCaseError> {
    let state = session.state();
    let stats = session.stats();

    prop_assert!(stats.total_soldiers <= stats.max_population);
    prop_assert!(state.recruited_today <= stats.daily_recruit_cap);
    prop_assert!(state.units.iter().all(|unit| unit.count > 0));
    prop_assert!(state.logs.len() <= 50);

    for (id, status) in &state.territories {
        let before = previous.get(id).copied().unwrap_or(TerritoryStatus::Locked);
        prop_assert!(rank(*status) >= rank(before), "{id} regressed");
    }

    let mut committed = HashSet::new();
    for mission in &state.active_missions {
        prop_assert!((WIN_CHANCE_FLOOR..=WIN_CHANCE_CEILING).contains(&mission.win_chance));
        prop_assert!(mission.arrival_day > state.day);
        for id in &mission.deployed_unit_ids {
            prop_assert!(committed.insert(*id), "{id} in two missions");
            if let Some(unit) = state.unit(*id) {
                prop_assert_eq!(unit.status, UnitStatus::Deployed);
            }
        }
    }
    for unit in &state.units {
        if unit.status == UnitStatus::Deployed {
            prop_assert!(committed.contains(&unit.id));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_reachable_states_hold_invariants(
        seed in any::<u64>(),
        ops in prop::collection::vec(op_strategy(), 1..80),
    ) {
        let rules = RulesConfig {
            event_chance: 0.0,
            ..RulesConfig::default()
        };
        let mut session = GameSession::new(seed, GameTables::load_from_static().unwrap(), rules);
        let mut previous = session.state().territories.clone();
        for op in &ops {
            let day_before = session.state().day;
            apply(&mut session, op);
            if matches!(op, Op::Advance) {
                prop_assert_eq!(session.state().day, day_before + 1);
                prop_assert_eq!(session.state().recruited_today, 0);
            }
            check_invariants(&session, &previous)?;
            previous = session.state().territories.clone();
        }
    }

    #[test]
    fn prop_rejected_recruits_leave_state_untouched(
        seed in any::<u64>(),
        kind in 0..UnitKind::ALL.len(),
        qty in 0..400u32,
    ) {
        let mut session = GameSession::new(
            seed,
            GameTables::load_from_static().unwrap(),
            RulesConfig::default(),
        );
        let before = session.state().clone();
        if session.recruit(UnitKind::ALL[kind], qty).is_err() {
            let after = session.state();
            prop_assert_eq!(after.gold, before.gold);
            prop_assert_eq!(&after.units, &before.units);
            prop_assert_eq!(after.recruited_today, before.recruited_today);
            prop_assert_eq!(after.logs.len(), before.logs.len() + 1);
        }
    }
}
