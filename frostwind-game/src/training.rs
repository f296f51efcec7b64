use crate::constants::LOG_TRAINING_COMPLETE;
use crate::state::{GameState, LogLevel, UnitId, UnitStatus};

/// Count one day off every training unit; finished units become idle.
///
/// Returns the ids that completed training this tick.
pub fn progress_training(state: &mut GameState) -> Vec<UnitId> {
    let mut finished = Vec::new();
    for unit in state.units.iter_mut().filter(|unit| unit.is_training()) {
        unit.training_days_left = unit.training_days_left.saturating_sub(1);
        if unit.training_days_left == 0 {
            unit.status = UnitStatus::Idle;
            finished.push((unit.id, unit.name.clone()));
        }
    }
    for (_, name) in &finished {
        state.push_log(
            LOG_TRAINING_COMPLETE,
            format!("{name} has finished training and is ready for orders."),
            LogLevel::Info,
        );
    }
    finished.into_iter().map(|(id, _)| id).collect()
}
