//! Commander lottery: weighted rarity draws, periodic refresh and hiring.
use rand::Rng;

use crate::command::CommandError;
use crate::constants::{LOG_COMMANDER_HIRED, LOG_TAVERN_REFRESHED};
use crate::data::{GameTables, RarityTier};
use crate::numbers::{floor_f64_to_i64, i64_to_f64};
use crate::rules::RulesConfig;
use crate::state::{Commander, CommanderId, CommanderStats, GameState, LogLevel};

/// Pick a tier by cumulative weight; falls back to the last tier on rounding.
pub fn roll_tier<'a, R: Rng + ?Sized>(
    tiers: &'a [RarityTier],
    rng: &mut R,
) -> Option<&'a RarityTier> {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for tier in tiers {
        cumulative += tier.weight;
        if roll < cumulative {
            return Some(tier);
        }
    }
    tiers.last()
}

fn pick<'a, R: Rng + ?Sized>(items: &'a [String], rng: &mut R) -> &'a str {
    if items.is_empty() {
        return "";
    }
    &items[rng.random_range(0..items.len())]
}

/// Draw one commander. Returns `None` only for an empty tier table.
pub fn generate_commander<R: Rng + ?Sized>(
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
    id: CommanderId,
) -> Option<Commander> {
    let pool = &tables.commanders;
    let tier = roll_tier(&pool.tiers, rng)?;
    let (low, high) = (tier.min_stat, tier.max_stat.max(tier.min_stat));
    let stats = CommanderStats {
        command: rng.random_range(low..=high),
        valor: rng.random_range(low..=high),
        strategy: rng.random_range(low..=high),
    };
    let name = pick(&pool.names, rng).to_string();
    let title = pick(&pool.titles, rng).to_string();
    Some(Commander {
        id,
        name,
        title,
        rarity: tier.rarity,
        cost: floor_f64_to_i64(i64_to_f64(rules.commander_base_cost) * tier.cost_multiplier),
        level: 1,
        stats,
    })
}

/// The pool turns over every few days, or immediately when it is empty.
#[must_use]
pub fn refresh_due(state: &GameState, rules: &RulesConfig) -> bool {
    state.tavern.is_empty()
        || state.day.saturating_sub(state.last_tavern_refresh_day) >= rules.tavern_refresh_days
}

/// Replace the whole pool with fresh candidates.
pub fn refresh<R: Rng + ?Sized>(
    state: &mut GameState,
    tables: &GameTables,
    rules: &RulesConfig,
    rng: &mut R,
) {
    let mut pool = Vec::with_capacity(rules.tavern_size);
    for _ in 0..rules.tavern_size {
        let id = CommanderId(state.allocate_id());
        if let Some(commander) = generate_commander(tables, rules, rng, id) {
            pool.push(commander);
        }
    }
    state.tavern = pool;
    state.last_tavern_refresh_day = state.day;
    state.push_log(
        LOG_TAVERN_REFRESHED,
        "New faces have arrived at the tavern.",
        LogLevel::Info,
    );
    log::debug!("tavern refreshed on day {}", state.day);
}

/// Move a commander from the tavern into service.
///
/// # Errors
///
/// Rejects ids not in the pool and hires the treasury cannot cover.
pub fn hire(state: &mut GameState, id: CommanderId) -> Result<Commander, CommandError> {
    let idx = state
        .tavern
        .iter()
        .position(|commander| commander.id == id)
        .ok_or(CommandError::CommanderNotInTavern(id))?;
    let cost = state.tavern[idx].cost;
    if state.gold < cost {
        return Err(CommandError::InsufficientGold {
            needed: cost,
            available: state.gold,
        });
    }
    state.gold -= cost;
    let commander = state.tavern.remove(idx);
    state.commanders.push(commander.clone());
    state.push_log(
        LOG_COMMANDER_HIRED,
        format!(
            "{} \"{}\" ({}) joins your command.",
            commander.name, commander.title, commander.rarity
        ),
        LogLevel::Success,
    );
    Ok(commander)
}

#[cfg(test)]
mod tests {
    #![allow(deprecated)]

    use super::*;
    use crate::data::Rarity;
    use rand::SeedableRng;
    use rand::rngs::mock::StepRng;
    use rand_chacha::ChaCha20Rng;

    fn setup() -> (GameState, GameTables, RulesConfig) {
        let tables = GameTables::load_from_static().unwrap();
        let rules = RulesConfig::default();
        let state = GameState::initial(&tables, &rules);
        (state, tables, rules)
    }

    #[test]
    fn tier_roll_is_cumulative() {
        let tables = GameTables::load_from_static().unwrap();
        let tiers = &tables.commanders.tiers;
        assert_eq!(
            roll_tier(tiers, &mut StepRng::new(0, 0)).unwrap().rarity,
            Rarity::N
        );
        assert_eq!(
            roll_tier(tiers, &mut StepRng::new(u64::MAX, 0)).unwrap().rarity,
            Rarity::Ssr
        );
    }

    #[test]
    fn commanders_respect_tier_bounds() {
        let (_state, tables, rules) = setup();
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        for n in 0..200 {
            let commander = generate_commander(&tables, &rules, &mut rng, CommanderId(n)).unwrap();
            let tier = tables
                .commanders
                .tiers
                .iter()
                .find(|t| t.rarity == commander.rarity)
                .unwrap();
            for stat in [
                commander.stats.command,
                commander.stats.valor,
                commander.stats.strategy,
            ] {
                assert!((tier.min_stat..=tier.max_stat).contains(&stat));
            }
            assert_eq!(commander.level, 1);
            assert_eq!(commander.cost, (1_000.0 * tier.cost_multiplier) as i64);
            assert!(tables.commanders.names.contains(&commander.name));
        }
    }

    #[test]
    fn refresh_replaces_pool_when_due() {
        let (mut state, tables, rules) = setup();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        assert!(refresh_due(&state, &rules));
        refresh(&mut state, &tables, &rules, &mut rng);
        assert_eq!(state.tavern.len(), 3);
        assert!(!refresh_due(&state, &rules));
        state.day = 3;
        assert!(!refresh_due(&state, &rules));
        state.day = 4;
        assert!(refresh_due(&state, &rules));
        let old: Vec<_> = state.tavern.iter().map(|c| c.id).collect();
        refresh(&mut state, &tables, &rules, &mut rng);
        assert!(state.tavern.iter().all(|c| !old.contains(&c.id)));
        assert_eq!(state.last_tavern_refresh_day, 4);
    }

    #[test]
    fn hiring_moves_commander_and_charges_gold() {
        let (mut state, tables, rules) = setup();
        refresh(&mut state, &tables, &rules, &mut ChaCha20Rng::seed_from_u64(8));
        let candidate = state.tavern[0].clone();
        state.gold = candidate.cost;
        let hired = hire(&mut state, candidate.id).unwrap();
        assert_eq!(hired, candidate);
        assert_eq!(state.gold, 0);
        assert_eq!(state.tavern.len(), 2);
        assert_eq!(state.commanders, vec![candidate.clone()]);

        assert_eq!(
            hire(&mut state, candidate.id),
            Err(CommandError::CommanderNotInTavern(candidate.id))
        );
        let next = state.tavern[0].id;
        assert!(matches!(
            hire(&mut state, next),
            Err(CommandError::InsufficientGold { available: 0, .. })
        ));
        assert_eq!(state.tavern.len(), 2);
    }
}
