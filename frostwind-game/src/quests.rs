//! Daily quest board.
use rand::Rng;

use crate::constants::{
    QUEST_BASE_POWER, QUEST_BIAS_KEEP_CHANCE, QUEST_COUNT_BONUS, QUEST_COUNT_MAX, QUEST_COUNT_MIN,
    QUEST_DAY_SCALING, QUEST_SOLDIERS_PER_EXTRA, QUEST_VARIANCE_MIN, QUEST_VARIANCE_SPAN,
};
use crate::data::GameTables;
use crate::numbers::{floor_f64_to_i64, u32_to_f64};
use crate::state::Quest;

/// Number of quests posted for an army of `total_soldiers`.
#[must_use]
pub fn quest_count(total_soldiers: i64) -> usize {
    let wanted = total_soldiers.max(0) / QUEST_SOLDIERS_PER_EXTRA + QUEST_COUNT_BONUS;
    usize::try_from(wanted)
        .unwrap_or(QUEST_COUNT_MAX)
        .clamp(QUEST_COUNT_MIN, QUEST_COUNT_MAX)
}

/// Roll a fresh board for `day`, scaling difficulty with the calendar.
pub fn generate_daily_quests<R: Rng + ?Sized>(
    tables: &GameTables,
    rng: &mut R,
    day: u32,
    total_soldiers: i64,
) -> Vec<Quest> {
    let templates = &tables.quests.templates;
    if templates.is_empty() {
        return Vec::new();
    }
    let day_scale = 1.0 + u32_to_f64(day) / QUEST_DAY_SCALING;
    (0..quest_count(total_soldiers))
        .map(|idx| {
            let template = &templates[rng.random_range(0..templates.len())];
            let variance = QUEST_VARIANCE_MIN + QUEST_VARIANCE_SPAN * rng.random::<f64>();
            let required_power = floor_f64_to_i64(
                QUEST_BASE_POWER * template.difficulty.power_multiplier() * day_scale * variance,
            );
            let bias = if rng.random_bool(QUEST_BIAS_KEEP_CHANCE) {
                template.bias
            } else {
                None
            };
            Quest::from_template(format!("dq_{day}_{idx}"), template, required_power, bias)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn board_size_tracks_army() {
        assert_eq!(quest_count(0), 3);
        assert_eq!(quest_count(49), 3);
        assert_eq!(quest_count(100), 4);
        assert_eq!(quest_count(300), 8);
        assert_eq!(quest_count(5_000), 10);
    }

    #[test]
    fn generated_quests_are_scaled_and_identified() {
        let tables = GameTables::load_from_static().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let quests = generate_daily_quests(&tables, &mut rng, 50, 120);
        assert_eq!(quests.len(), 4);
        for (idx, quest) in quests.iter().enumerate() {
            assert_eq!(quest.id, format!("dq_50_{idx}"));
            let template = tables
                .quests
                .templates
                .iter()
                .find(|t| t.title == quest.title)
                .unwrap();
            let nominal = 300.0 * template.difficulty.power_multiplier() * 1.5;
            let power = quest.required_power as f64;
            assert!(power >= (nominal * 0.8).floor() - 1.0, "{power} vs {nominal}");
            assert!(power <= nominal * 1.2, "{power} vs {nominal}");
            assert!(quest.bias.is_none() || quest.bias == template.bias);
            assert!(quest.territory.is_none());
        }
    }

    #[test]
    fn same_seed_same_board() {
        let tables = GameTables::load_from_static().unwrap();
        let a = generate_daily_quests(&tables, &mut ChaCha20Rng::seed_from_u64(5), 3, 0);
        let b = generate_daily_quests(&tables, &mut ChaCha20Rng::seed_from_u64(5), 3, 0);
        assert_eq!(a, b);
    }
}
