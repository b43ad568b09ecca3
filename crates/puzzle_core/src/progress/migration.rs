use super::state::{ProgressState, STATE_VERSION};

/// Bring a loaded state up to the current version and repair values that
/// would break engine invariants.
pub fn migrate_state(mut state: ProgressState, max_level: u32) -> ProgressState {
    let original_version = state.version;

    if state.version == 0 {
        state = migrate_v0_to_v1(state);
    } else if state.version > STATE_VERSION {
        log::warn!("Loading state from future version {} (current: {})", state.version, STATE_VERSION);
    }
    state.version = STATE_VERSION;

    repair(&mut state, max_level);

    if original_version != STATE_VERSION {
        log::info!("Migrated state from version {} to {}", original_version, STATE_VERSION);
    }
    state
}

/// Legacy blobs kept no `finished` flag and used a looser completion count.
fn migrate_v0_to_v1(mut state: ProgressState) -> ProgressState {
    log::info!("Migrating state from version 0 to 1");

    if !state.finished && state.completed_level_set.iter().any(|&l| l >= state.current_level) {
        let next = state.completed_level_set.iter().max().map_or(1, |&l| l.saturating_add(1));
        log::warn!("Current level {} already completed, moving to {}", state.current_level, next);
        state.current_level = next;
    }
    state
}

fn repair(state: &mut ProgressState, max_level: u32) {
    if state.current_level == 0 {
        state.current_level = 1;
    }
    if state.current_level > max_level {
        log::warn!("Current level {} beyond last level {}, capping", state.current_level, max_level);
        state.current_level = max_level;
        state.finished = true;
    }

    if !state.balance.is_finite() || state.balance < 0.0 {
        log::warn!("Clamping invalid balance {} to 0", state.balance);
        state.balance = 0.0;
    }
    if !state.total_earned.is_finite() || state.total_earned < 0.0 {
        state.total_earned = 0.0;
    }

    state.completed_level_set.retain(|&l| (1..=max_level).contains(&l));
    let actual = state.completed_level_set.len() as u32;
    if state.levels_completed_count != actual {
        state.levels_completed_count = actual;
    }

    if let Some(pending) = state.pending_reward {
        let in_range = (1..=max_level).contains(&pending.level);
        if !in_range || !pending.amount.is_finite() || pending.amount <= 0.0 {
            log::warn!("Dropping unusable pending reward for level {}", pending.level);
            state.pending_reward = None;
        }
    }
}

/// Whether a stored state predates the current format
pub fn needs_migration(state: &ProgressState) -> bool {
    state.version < STATE_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::state::PendingReward;

    #[test]
    fn test_current_version_is_untouched() {
        let state = ProgressState::new();
        let migrated = migrate_state(state.clone(), 3200);
        assert_eq!(migrated, state);
    }

    #[test]
    fn test_legacy_count_recomputed_from_set() {
        let mut state = ProgressState::new();
        state.version = 0;
        state.current_level = 3;
        state.completed_level_set.extend([1, 2]);
        state.levels_completed_count = 5;

        assert!(needs_migration(&state));
        let migrated = migrate_state(state, 3200);
        assert_eq!(migrated.version, STATE_VERSION);
        assert_eq!(migrated.levels_completed_count, 2);
        assert_eq!(migrated.current_level, 3);
    }

    #[test]
    fn test_legacy_current_level_behind_completions() {
        let mut state = ProgressState::new();
        state.version = 0;
        state.current_level = 2;
        state.completed_level_set.extend([1, 2, 3]);

        let migrated = migrate_state(state, 3200);
        assert_eq!(migrated.current_level, 4);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let mut state = ProgressState::new();
        state.current_level = 5000;
        state.balance = -4.0;
        state.pending_reward = Some(PendingReward { level: 9000, amount: 1.0 });
        state.completed_level_set.insert(0);

        let migrated = migrate_state(state, 3200);
        assert_eq!(migrated.current_level, 3200);
        assert!(migrated.finished);
        assert_eq!(migrated.balance, 0.0);
        assert!(migrated.pending_reward.is_none());
        assert!(migrated.completed_level_set.is_empty());
    }
}
