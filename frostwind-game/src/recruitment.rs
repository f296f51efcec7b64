//! Raising new units and folding idle ones together.
use rand::Rng;

use crate::command::CommandError;
use crate::constants::{
    ELITE_ROLL_THRESHOLD, LOG_RECRUIT_SUCCESS, LOG_UNITS_MERGED, VETERAN_ROLL_THRESHOLD,
};
use crate::data::{GameTables, Quality, UnitKind};
use crate::rules::RulesConfig;
use crate::state::{GameState, LogLevel, UnitId, UnitStatus};
use crate::stats::{daily_recruit_cap, max_population, total_soldiers};

/// Formation label for a headcount.
#[must_use]
pub const fn scale_label(count: u32) -> &'static str {
    match count {
        0..=20 => "Squad",
        21..=50 => "Team",
        51..=100 => "Platoon",
        101..=250 => "Company",
        251..=500 => "Battalion",
        501..=1_000 => "Regiment",
        1_001..=2_500 => "Brigade",
        2_501..=5_000 => "Division",
        5_001..=10_000 => "Corps",
        _ => "Army Group",
    }
}

#[must_use]
pub fn unit_name(quality: Quality, archetype_name: &str, count: u32) -> String {
    format!("{} {} {}", quality.label(), archetype_name, scale_label(count))
}

/// Draw a quality grade: 5% Elite, 25% Veteran, otherwise Rookie.
pub fn roll_quality<R: Rng + ?Sized>(rng: &mut R) -> Quality {
    let roll: f64 = rng.random();
    if roll > ELITE_ROLL_THRESHOLD {
        Quality::Elite
    } else if roll > VETERAN_ROLL_THRESHOLD {
        Quality::Veteran
    } else {
        Quality::Rookie
    }
}

/// Recruit `quantity` soldiers of `kind` into a fresh training unit.
///
/// # Errors
///
/// Rejects a zero quantity, then population, daily quota and gold in that
/// order. Nothing changes on rejection.
pub fn recruit<R: Rng + ?Sized>(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
    kind: UnitKind,
    quantity: u32,
) -> Result<(UnitId, Quality), CommandError> {
    if quantity == 0 {
        return Err(CommandError::InvalidQuantity);
    }
    let archetype = tables
        .archetype(kind)
        .ok_or(CommandError::UnknownArchetype(kind))?;

    let room = max_population(state, tables, rules) - total_soldiers(state);
    if i64::from(quantity) > room {
        return Err(CommandError::PopulationCap {
            requested: quantity,
            available: room.max(0),
        });
    }

    let quota = daily_recruit_cap(state, tables, rules);
    let remaining = quota.saturating_sub(state.recruited_today);
    if quantity > remaining {
        return Err(CommandError::DailyQuota {
            requested: quantity,
            remaining,
        });
    }

    let cost = archetype.cost * i64::from(quantity);
    if state.gold < cost {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.gold,
        });
    }

    let quality = roll_quality(rng);
    let name = unit_name(quality, &archetype.name, quantity);
    state.gold -= cost;
    let id = state.spawn_unit(
        kind,
        name.clone(),
        quantity,
        quality,
        archetype.attributes.scaled(quality.multiplier()),
    );
    if let Some(unit) = state.units.iter_mut().find(|unit| unit.id == id) {
        unit.status = UnitStatus::Training;
        unit.training_days_left = rules.training_days;
    }
    state.recruited_today += quantity;
    state.push_log(
        LOG_RECRUIT_SUCCESS,
        format!("Recruited {name} ({quantity} soldiers) for {cost} gold."),
        LogLevel::Success,
    );
    log::debug!("recruited {quantity} {kind} as {quality:?} ({id})");
    Ok((id, quality))
}

/// Fold two or more idle units of one archetype into a single unit.
///
/// The largest unit's quality, attributes, morale and stamina carry over.
///
/// # Errors
///
/// Returns [`CommandError::MergeRejected`] when fewer than two units match,
/// any is not idle, or archetypes differ.
pub fn merge_units(
    state: &mut GameState,
    tables: &GameTables,
    ids: &[UnitId],
) -> Result<UnitId, CommandError> {
    let targets: Vec<_> = state
        .units
        .iter()
        .filter(|unit| ids.contains(&unit.id))
        .collect();
    if targets.len() < 2 {
        return Err(CommandError::MergeRejected("select at least two units"));
    }
    if !targets.iter().all(|unit| unit.is_idle()) {
        return Err(CommandError::MergeRejected("every unit must be idle"));
    }
    let kind = targets[0].archetype;
    if targets.iter().any(|unit| unit.archetype != kind) {
        return Err(CommandError::MergeRejected("unit types differ"));
    }

    let total: u32 = targets
        .iter()
        .fold(0u32, |acc, unit| acc.saturating_add(unit.count));
    let merged = targets.len();
    let mut primary = targets[0];
    for unit in &targets {
        if unit.count > primary.count {
            primary = unit;
        }
    }
    let mut combined = primary.clone();

    let archetype_name = tables
        .archetype(kind)
        .map_or_else(|| kind.to_string(), |arch| arch.name.clone());
    combined.name = unit_name(combined.quality, &archetype_name, total);
    combined.count = total;
    combined.status = UnitStatus::Idle;
    combined.training_days_left = 0;
    combined.id = UnitId(state.allocate_id());
    let id = combined.id;

    state.units.retain(|unit| !ids.contains(&unit.id));
    let message = format!(
        "Merged {merged} units into {} ({total} soldiers).",
        combined.name
    );
    state.units.push(combined);
    state.push_log(LOG_UNITS_MERGED, message, LogLevel::Info);
    Ok(id)
}

#[cfg(test)]
mod tests {
    #![allow(deprecated)]

    use super::*;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha20Rng;
    use rand::SeedableRng;

    fn setup() -> (GameState, GameTables, RulesConfig) {
        let tables = GameTables::load_from_static().unwrap();
        let rules = RulesConfig::default();
        let state = GameState::initial(&tables, &rules);
        (state, tables, rules)
    }

    #[test]
    fn scale_labels_follow_headcount() {
        assert_eq!(scale_label(1), "Squad");
        assert_eq!(scale_label(20), "Squad");
        assert_eq!(scale_label(21), "Team");
        assert_eq!(scale_label(250), "Company");
        assert_eq!(scale_label(10_000), "Corps");
        assert_eq!(scale_label(10_001), "Army Group");
    }

    #[test]
    fn quality_roll_thresholds() {
        let mut low = StepRng::new(0, 0);
        assert_eq!(roll_quality(&mut low), Quality::Rookie);
        let mut high = StepRng::new(u64::MAX, 0);
        assert_eq!(roll_quality(&mut high), Quality::Elite);
    }

    #[test]
    fn recruit_deducts_gold_and_starts_training() {
        let (mut state, tables, rules) = setup();
        let mut rng = StepRng::new(0, 0);
        let (id, quality) =
            recruit(&mut state, &tables, &rules, &mut rng, UnitKind::Infantry, 20).unwrap();
        assert_eq!(quality, Quality::Rookie);
        assert_eq!(state.gold, 9_000);
        assert_eq!(state.recruited_today, 20);
        let unit = state.unit(id).unwrap();
        assert_eq!(unit.count, 20);
        assert_eq!(unit.status, UnitStatus::Training);
        assert_eq!(unit.training_days_left, 3);
        assert_eq!(unit.name, "Rookie Infantry Squad");
        assert_eq!(state.last_log_key(), Some(LOG_RECRUIT_SUCCESS));
    }

    #[test]
    fn rejections_follow_precondition_order() {
        let (mut state, tables, rules) = setup();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        assert_eq!(
            recruit(&mut state, &tables, &rules, &mut rng, UnitKind::Infantry, 0),
            Err(CommandError::InvalidQuantity)
        );
        assert!(matches!(
            recruit(&mut state, &tables, &rules, &mut rng, UnitKind::Infantry, 201),
            Err(CommandError::PopulationCap { .. })
        ));
        assert!(matches!(
            recruit(&mut state, &tables, &rules, &mut rng, UnitKind::Infantry, 21),
            Err(CommandError::DailyQuota { remaining: 20, .. })
        ));
        state.gold = 100;
        assert!(matches!(
            recruit(&mut state, &tables, &rules, &mut rng, UnitKind::Infantry, 10),
            Err(CommandError::InsufficientGold { needed: 500, .. })
        ));
        assert!(state.units.is_empty());
        assert_eq!(state.gold, 100);
        assert_eq!(state.recruited_today, 0);
    }

    #[test]
    fn merge_keeps_largest_unit_traits() {
        let (mut state, tables, _rules) = setup();
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        let small = state.spawn_unit(UnitKind::Infantry, "a".into(), 10, Quality::Rookie, attrs);
        let big = state.spawn_unit(
            UnitKind::Infantry,
            "b".into(),
            30,
            Quality::Veteran,
            attrs.scaled(1.2),
        );
        state.units[1].morale = 70;
        let merged = merge_units(&mut state, &tables, &[small, big]).unwrap();
        assert_eq!(state.units.len(), 1);
        let unit = state.unit(merged).unwrap();
        assert_eq!(unit.count, 40);
        assert_eq!(unit.quality, Quality::Veteran);
        assert_eq!(unit.morale, 70);
        assert_eq!(unit.name, "Veteran Infantry Team");
        assert_ne!(merged, small);
        assert_ne!(merged, big);
    }

    #[test]
    fn merge_rejects_mixed_or_busy_units() {
        let (mut state, tables, _rules) = setup();
        let attrs = tables.archetype(UnitKind::Infantry).unwrap().attributes;
        let a = state.spawn_unit(UnitKind::Infantry, "a".into(), 10, Quality::Rookie, attrs);
        let b = state.spawn_unit(UnitKind::Scout, "b".into(), 10, Quality::Rookie, attrs);
        let c = state.spawn_unit(UnitKind::Infantry, "c".into(), 10, Quality::Rookie, attrs);
        state.units[2].status = UnitStatus::Training;
        let before = state.clone();

        assert!(merge_units(&mut state, &tables, &[a]).is_err());
        assert!(merge_units(&mut state, &tables, &[a, b]).is_err());
        assert!(merge_units(&mut state, &tables, &[a, c]).is_err());
        assert_eq!(state, before);
    }
}
