use super::state::ProgressState;
use crate::localization::{Locale, MessageCatalog};
use serde::{Deserialize, Serialize};

/// Read-only summary derived from [`ProgressState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub current_level: u32,
    pub max_level: u32,
    pub balance: f64,
    pub total_earned: f64,
    pub levels_completed_count: u32,
    pub ads_watched_count: u32,
    pub progress_percentage: u32,
    pub average_attempts: f64,
    pub pending_reward: Option<f64>,
    pub finished: bool,
    pub orders_placed: usize,
}

impl ProgressStats {
    pub fn from_state(state: &ProgressState, max_level: u32) -> Self {
        Self {
            current_level: state.current_level,
            max_level,
            balance: state.balance,
            total_earned: state.total_earned,
            levels_completed_count: state.levels_completed_count,
            ads_watched_count: state.ads_watched_count,
            progress_percentage: progress_percentage(state.levels_completed_count, max_level),
            average_attempts: average_attempts(state),
            pending_reward: state.pending_reward.map(|p| p.amount),
            finished: state.finished,
            orders_placed: state.orders.len(),
        }
    }
}

/// `round(completed / max * 100)`
pub fn progress_percentage(completed: u32, max_level: u32) -> u32 {
    if max_level == 0 {
        return 0;
    }
    ((completed as f64 / max_level as f64) * 100.0).round() as u32
}

/// Mean attempts over levels that have any, to one decimal place.
pub fn average_attempts(state: &ProgressState) -> f64 {
    if state.attempts_by_level.is_empty() {
        return 0.0;
    }
    let sum: u32 = state.attempts_by_level.values().sum();
    let mean = sum as f64 / state.attempts_by_level.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Difficulty badge ("🟢 Easy" .. "🟣 Master") for a tier.
pub fn difficulty_badge(catalog: &MessageCatalog, tier: u8, locale: Locale) -> String {
    if !(1..=5).contains(&tier) {
        return "⚪ ?".to_string();
    }
    catalog.format(locale, &format!("badge-{}", tier), None)
}
