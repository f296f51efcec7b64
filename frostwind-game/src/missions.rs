//! Deploying units on quests and resolving missions when they arrive.
use rand::Rng;

use crate::campaign::{conquer, under_attack};
use crate::command::CommandError;
use crate::constants::{
    BIAS_ABSENT_FACTOR, BIAS_MET_BONUS, BIAS_TRIGGER_WEIGHT, BIAS_WEAK_FACTOR, BIAS_WEAK_RATIO,
    DEFEAT_LOSS_FRACTION, HOSPITAL_LOSS_REDUCTION, LOG_BATTLE_DEFEAT, LOG_BATTLE_VICTORY,
    LOG_DEPLOY, LOSS_JITTER_MAX, LOSS_JITTER_MIN, MIN_LOSS_FRACTION, VICTORY_LOSS_FRACTION,
    WIN_CHANCE_BASE, WIN_CHANCE_BASE_CEILING, WIN_CHANCE_RATIO_WEIGHT,
};
use crate::data::{BuildingKind, GameTables};
use crate::numbers::{ceil_f64_to_i64, i64_to_f64, saturating_i64_to_u32, u32_to_f64};
use crate::rules::RulesConfig;
use crate::state::{
    ActiveMission, BattleResult, GameState, LogLevel, Loss, MissionId, Quest, TerritoryStatus,
    Unit, UnitId, UnitStatus,
};
use crate::stats::{ArmyStats, selection_stats};

pub use crate::constants::{WIN_CHANCE_CEILING, WIN_CHANCE_FLOOR};

/// Probability that `selected` wins `quest`, always within `[0.05, 0.99]`.
#[must_use]
pub fn win_chance(selected: &ArmyStats, quest: &Quest) -> f64 {
    let power = i64_to_f64(selected.power);
    let required = i64_to_f64(quest.required_power.max(1));
    let mut chance = (WIN_CHANCE_BASE + power / required * WIN_CHANCE_RATIO_WEIGHT)
        .clamp(WIN_CHANCE_FLOOR, WIN_CHANCE_BASE_CEILING);

    if let Some(bias) = quest.bias {
        let demands = [
            (bias.mobility, selected.mobility),
            (bias.range, selected.range),
            (bias.magic, selected.magic),
        ];
        for (weight, value) in demands {
            if !weight.is_some_and(|w| w > BIAS_TRIGGER_WEIGHT) {
                continue;
            }
            if value <= 0.0 {
                chance *= BIAS_ABSENT_FACTOR;
            } else if value < power * BIAS_WEAK_RATIO {
                chance *= BIAS_WEAK_FACTOR;
            } else {
                chance += BIAS_MET_BONUS;
            }
        }
    }
    clamp_win_chance(chance)
}

fn clamp_win_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        return WIN_CHANCE_FLOOR;
    }
    chance.clamp(WIN_CHANCE_FLOOR, WIN_CHANCE_CEILING)
}

/// Existing idle units among `ids`, in request order and without repeats.
fn ready_selection(state: &GameState, ids: &[UnitId]) -> Vec<UnitId> {
    let mut ready: Vec<UnitId> = Vec::with_capacity(ids.len());
    for id in ids {
        if ready.contains(id) {
            continue;
        }
        if state.unit(*id).is_some_and(Unit::is_idle) {
            ready.push(*id);
        }
    }
    ready
}

/// Win chance for the deployable part of a selection.
#[must_use]
pub fn estimate_win_chance(state: &GameState, quest: &Quest, ids: &[UnitId]) -> f64 {
    let ready = ready_selection(state, ids);
    let stats = selection_stats(state.units.iter().filter(|unit| ready.contains(&unit.id)));
    win_chance(&stats, quest)
}

/// Commit idle units to `quest` with a fixed win chance.
///
/// Stale ids (missing, training or already deployed units) are dropped.
///
/// # Errors
///
/// Rejects the deploy when no selected unit is ready, or when a campaign
/// target is no longer available or already under attack.
pub fn deploy(
    state: &mut GameState,
    quest: Quest,
    ids: &[UnitId],
    win_chance: f64,
) -> Result<MissionId, CommandError> {
    let ready = ready_selection(state, ids);
    if ready.is_empty() {
        return Err(CommandError::NoIdleUnits);
    }
    if let Some(territory) = quest.territory.as_deref() {
        if state.territory_status(territory) != Some(TerritoryStatus::Available) {
            return Err(CommandError::CampaignUnavailable(territory.to_string()));
        }
        if under_attack(state, territory) {
            return Err(CommandError::CampaignUnderAttack(territory.to_string()));
        }
    }

    for unit in state
        .units
        .iter_mut()
        .filter(|unit| ready.contains(&unit.id))
    {
        unit.status = UnitStatus::Deployed;
    }
    state.daily_quests.retain(|posted| posted.id != quest.id);

    let id = MissionId(state.allocate_id());
    let arrival_day = state.day.saturating_add(quest.duration);
    let chance = clamp_win_chance(win_chance);
    state.push_log(
        LOG_DEPLOY,
        format!(
            "{} units marched out for {}, expected to arrive on day {arrival_day}.",
            ready.len(),
            quest.title
        ),
        LogLevel::Info,
    );
    log::debug!(
        "deployed {} units on {} ({id}, win chance {chance:.2})",
        ready.len(),
        quest.id
    );
    state.active_missions.push(ActiveMission {
        id,
        quest,
        deployed_unit_ids: ready,
        start_day: state.day,
        arrival_day,
        win_chance: chance,
    });
    Ok(id)
}

/// Share of a unit lost in one battle before rounding.
#[must_use]
pub fn casualty_fraction(victory: bool, hospital_level: u32, jitter: f64) -> f64 {
    let base = if victory {
        VICTORY_LOSS_FRACTION
    } else {
        DEFEAT_LOSS_FRACTION
    };
    let reduced =
        (base - u32_to_f64(hospital_level) * HOSPITAL_LOSS_REDUCTION).max(MIN_LOSS_FRACTION);
    reduced * jitter
}

/// Soldiers lost from a unit of `count`, rounded up and never more than the unit.
#[must_use]
pub fn casualties(count: u32, fraction: f64) -> u32 {
    let lost = saturating_i64_to_u32(ceil_f64_to_i64(u32_to_f64(count) * fraction));
    lost.min(count)
}

/// Resolve every mission arriving on or before `arrival_day`.
///
/// Results come back in mission order; the last is also kept as
/// `last_battle_result`.
pub fn resolve_arrivals<R: Rng + ?Sized>(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
    arrival_day: u32,
) -> Vec<BattleResult> {
    let (arrived, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut state.active_missions)
        .into_iter()
        .partition(|mission| mission.arrival_day <= arrival_day);
    state.active_missions = pending;

    let mut results = Vec::with_capacity(arrived.len());
    for mission in arrived {
        let result = resolve_mission(state, tables, rules, rng, mission);
        state.last_battle_result = Some(result.clone());
        results.push(result);
    }
    results
}

fn resolve_mission<R: Rng + ?Sized>(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
    mission: ActiveMission,
) -> BattleResult {
    let victory = rng.random::<f64>() < mission.win_chance;
    let hospital = state.building_level(BuildingKind::Hospital);

    let mut losses = Vec::new();
    for unit in state
        .units
        .iter_mut()
        .filter(|unit| mission.deployed_unit_ids.contains(&unit.id))
    {
        unit.status = UnitStatus::Idle;
        if unit.count == 0 {
            continue;
        }
        let jitter = rng.random_range(LOSS_JITTER_MIN..LOSS_JITTER_MAX);
        let lost = casualties(unit.count, casualty_fraction(victory, hospital, jitter));
        if lost > 0 {
            losses.push(Loss {
                unit_name: unit.name.clone(),
                count: lost,
            });
            unit.count -= lost;
        }
    }
    state.units.retain(|unit| unit.count > 0);

    let quest = mission.quest;
    let mut territory_conquered = None;
    let mut territories_unlocked = Vec::new();
    let fallen: u32 = losses.iter().map(|loss| loss.count).sum();
    if victory {
        state.gold += quest.reward_gold;
        state.reputation += i64::from(quest.danger_level) * rules.reputation_per_danger;
        state.completed_quests += 1;
        state.push_log(
            LOG_BATTLE_VICTORY,
            format!(
                "Victory at {}! {} gold earned, {fallen} soldiers fell.",
                quest.title, quest.reward_gold
            ),
            LogLevel::Success,
        );
        if let Some(territory) = quest.territory.as_deref() {
            territories_unlocked = conquer(state, tables, territory);
            territory_conquered = Some(territory.to_string());
        }
    } else {
        state.push_log(
            LOG_BATTLE_DEFEAT,
            format!(
                "Defeat at {}. {fallen} soldiers fell in the retreat.",
                quest.title
            ),
            LogLevel::Danger,
        );
    }
    log::info!(
        "mission {} resolved: victory={victory} losses={fallen}",
        mission.id
    );

    BattleResult {
        quest_title: quest.title,
        victory,
        reward_gold: if victory { quest.reward_gold } else { 0 },
        losses,
        territory_conquered,
        territories_unlocked,
    }
}

#[cfg(test)]
mod tests {
    #![allow(deprecated)]

    use super::*;
    use crate::data::{Difficulty, Quality, StatBias, UnitKind};
    use rand::rngs::mock::StepRng;

    fn setup() -> (GameState, GameTables, RulesConfig) {
        let tables = GameTables::load_from_static().unwrap();
        let rules = RulesConfig::default();
        let state = GameState::initial(&tables, &rules);
        (state, tables, rules)
    }

    fn quest(required_power: i64, bias: Option<StatBias>) -> Quest {
        Quest {
            id: "dq_test".into(),
            title: "Test Quest".into(),
            difficulty: Difficulty::E,
            required_power,
            reward_gold: 800,
            duration: 1,
            danger_level: 2,
            bias,
            territory: None,
        }
    }

    fn stats(power: i64, mobility: f64) -> ArmyStats {
        ArmyStats {
            power,
            mobility,
            range: 0.0,
            magic: 0.0,
        }
    }

    fn idle_infantry(state: &mut GameState, tables: &GameTables, count: u32) -> UnitId {
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        state.spawn_unit(
            UnitKind::Infantry,
            "Rookie Infantry Squad".into(),
            count,
            Quality::Rookie,
            attrs,
        )
    }

    #[test]
    fn even_match_without_bias_is_seventy_percent() {
        let chance = win_chance(&stats(1_000, 0.0), &quest(1_000, None));
        assert!((chance - 0.70).abs() < 1e-9);
    }

    #[test]
    fn bias_penalties_and_bonus() {
        let mobility = Some(StatBias {
            mobility: Some(2.0),
            ..StatBias::default()
        });
        let absent = win_chance(&stats(1_000, 0.0), &quest(1_000, mobility));
        assert!((absent - 0.35).abs() < 1e-9);
        let weak = win_chance(&stats(1_000, 100.0), &quest(1_000, mobility));
        assert!((weak - 0.56).abs() < 1e-9);
        let met = win_chance(&stats(1_000, 500.0), &quest(1_000, mobility));
        assert!((met - 0.80).abs() < 1e-9);

        let soft = Some(StatBias {
            mobility: Some(1.0),
            ..StatBias::default()
        });
        let ignored = win_chance(&stats(1_000, 0.0), &quest(1_000, soft));
        assert!((ignored - 0.70).abs() < 1e-9);
    }

    #[test]
    fn win_chance_stays_in_bounds() {
        let floor = win_chance(&stats(0, 0.0), &quest(10_000, None));
        assert!((floor - 0.30).abs() < 1e-9);
        let all_bias = Some(StatBias {
            mobility: Some(2.0),
            range: Some(2.0),
            magic: Some(2.0),
            power: None,
        });
        let crushed = win_chance(&stats(0, 0.0), &quest(10_000, all_bias));
        assert!((crushed - WIN_CHANCE_FLOOR).abs() < 1e-9);
        let capped = win_chance(
            &ArmyStats {
                power: 100_000,
                mobility: 1e9,
                range: 1e9,
                magic: 1e9,
            },
            &quest(10, all_bias),
        );
        assert!((capped - WIN_CHANCE_CEILING).abs() < 1e-9);
    }

    #[test]
    fn deploy_filters_stale_ids_and_schedules_arrival() {
        let (mut state, tables, _rules) = setup();
        let ready = idle_infantry(&mut state, &tables, 20);
        let training = idle_infantry(&mut state, &tables, 20);
        state.units[1].status = UnitStatus::Training;
        let posted = state.daily_quests[0].clone();

        let mission = deploy(
            &mut state,
            posted.clone(),
            &[ready, training, UnitId(4_242), ready],
            1.5,
        )
        .unwrap();
        let active = &state.active_missions[0];
        assert_eq!(active.id, mission);
        assert_eq!(active.deployed_unit_ids, vec![ready]);
        assert_eq!(active.arrival_day, 2);
        assert!((active.win_chance - WIN_CHANCE_CEILING).abs() < 1e-9);
        assert_eq!(state.unit(ready).unwrap().status, UnitStatus::Deployed);
        assert_eq!(state.unit(training).unwrap().status, UnitStatus::Training);
        assert!(state.daily_quests.iter().all(|q| q.id != posted.id));

        let before = state.clone();
        assert_eq!(
            deploy(&mut state, posted, &[ready, training], 0.5),
            Err(CommandError::NoIdleUnits)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn casualties_round_up_and_respect_hospital_floor() {
        assert!((casualty_fraction(true, 0, 1.0) - 0.05).abs() < 1e-9);
        assert!((casualty_fraction(false, 2, 1.0) - 0.13).abs() < 1e-9);
        assert!((casualty_fraction(true, 10, 1.0) - 0.01).abs() < 1e-9);
        assert_eq!(casualties(20, 0.025), 1);
        assert_eq!(casualties(3, 2.0), 3);
        assert_eq!(casualties(0, 0.5), 0);
    }

    #[test]
    fn victory_pays_out_and_returns_units_idle() {
        let (mut state, tables, rules) = setup();
        let id = idle_infantry(&mut state, &tables, 100);
        let gold = state.gold;
        deploy(&mut state, quest(1_000, None), &[id], 0.9).unwrap();

        // every draw is zero: the victory roll passes, jitter sits at its minimum
        let mut rng = StepRng::new(0, 0);
        let results = resolve_arrivals(&mut state, &tables, &rules, &mut rng, 2);
        assert_eq!(results.len(), 1);
        let result = &results[0];
        assert!(result.victory);
        assert_eq!(result.reward_gold, 800);
        assert_eq!(state.gold, gold + 800);
        assert_eq!(state.reputation, 20);
        assert_eq!(state.completed_quests, 1);

        let lost: u32 = result.losses.iter().map(|l| l.count).sum();
        assert_eq!(lost, 3);
        let unit = state.unit(id).unwrap();
        assert_eq!(unit.count, 97);
        assert_eq!(unit.status, UnitStatus::Idle);
        assert!(state.active_missions.is_empty());
        assert_eq!(state.last_battle_result.as_ref(), Some(result));
    }

    #[test]
    fn defeat_pays_nothing_and_wiped_units_are_removed() {
        let (mut state, tables, rules) = setup();
        let id = idle_infantry(&mut state, &tables, 1);
        let gold = state.gold;
        deploy(&mut state, quest(1_000, None), &[id], 0.05).unwrap();

        let mut rng = StepRng::new(u64::MAX, 0);
        let results = resolve_arrivals(&mut state, &tables, &rules, &mut rng, 2);
        assert!(!results[0].victory);
        assert_eq!(results[0].reward_gold, 0);
        assert_eq!(results[0].losses[0].count, 1);
        assert_eq!(state.gold, gold);
        assert!(state.unit(id).is_none());
        assert_eq!(state.last_log_key(), Some(LOG_BATTLE_DEFEAT));
    }

    #[test]
    fn missions_wait_for_their_arrival_day() {
        let (mut state, tables, rules) = setup();
        let id = idle_infantry(&mut state, &tables, 10);
        let mut long = quest(100, None);
        long.duration = 3;
        deploy(&mut state, long, &[id], 0.5).unwrap();
        let mut rng = StepRng::new(0, 0);
        assert!(resolve_arrivals(&mut state, &tables, &rules, &mut rng, 3).is_empty());
        assert_eq!(resolve_arrivals(&mut state, &tables, &rules, &mut rng, 4).len(), 1);
    }
}
