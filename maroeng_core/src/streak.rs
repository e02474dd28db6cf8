//! Consecutive-day streak tracking

use chrono::NaiveDate;

use crate::state::AppState;

/// Record a completed session on `today`. Finishing twice on the same day changes nothing.
pub fn mark_session_finished(mut state: AppState, today: NaiveDate) -> AppState {
    let streak = match state.last_finished_session_date {
        None => 1,
        Some(last) => {
            let gap = today.signed_duration_since(last).num_days();
            match gap {
                1 => state.streak.saturating_add(1),
                g if g > 1 => 1,
                _ => return state,
            }
        }
    };

    tracing::debug!(streak, %today, "Session finished");
    state.streak = streak;
    state.last_finished_session_date = Some(today);
    state
}
