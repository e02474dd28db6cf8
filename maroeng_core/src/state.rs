//! Learner state: per-frame review records plus streak and settings

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Course;
use crate::error::{CoreError, Result};

pub const DEFAULT_DAILY_NEW_COUNT: usize = 36;

/// Feedback given after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Grade {
    Again = 0,
    Hard = 1,
    Good = 2,
    Easy = 3,
}

impl Grade {
    pub const ALL: [Grade; 4] = [Grade::Again, Grade::Hard, Grade::Good, Grade::Easy];
}

impl TryFrom<i64> for Grade {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Grade::Again),
            1 => Ok(Grade::Hard),
            2 => Ok(Grade::Good),
            3 => Ok(Grade::Easy),
            other => Err(CoreError::InvalidGrade(other)),
        }
    }
}

impl TryFrom<u8> for Grade {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self> {
        Grade::try_from(i64::from(value))
    }
}

impl From<Grade> for i64 {
    fn from(grade: Grade) -> Self {
        grade as i64
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Grade::Again => "Again",
            Grade::Hard => "Hard",
            Grade::Good => "Good",
            Grade::Easy => "Easy",
        };
        f.write_str(name)
    }
}

/// Latest review outcome for one frame; replaced wholesale on every answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: i64,
    pub ease: Grade,
    pub interval: u32,
    pub due_date: DateTime<Utc>,
    pub lapses: u32,
    pub last_seen: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due_date <= now
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub progress: BTreeMap<i64, ReviewRecord>,
    pub streak: u32,
    pub last_finished_session_date: Option<NaiveDate>,
    pub daily_new_count: usize,
    pub use_typing: bool,
    pub active_course: Course,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            progress: BTreeMap::new(),
            streak: 0,
            last_finished_session_date: None,
            daily_new_count: DEFAULT_DAILY_NEW_COUNT,
            use_typing: true,
            active_course: Course::Core,
        }
    }
}

impl AppState {
    pub fn record(&self, id: i64) -> Option<&ReviewRecord> {
        self.progress.get(&id)
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(count) = settings.daily_new_count {
            self.daily_new_count = count;
        }
        if let Some(use_typing) = settings.use_typing {
            self.use_typing = use_typing;
        }
        if let Some(course) = settings.active_course {
            self.active_course = course;
        }
        self
    }

    /// Clears every review record together with the streak; settings survive.
    pub fn reset_progress(self) -> Self {
        Self {
            progress: BTreeMap::new(),
            streak: 0,
            last_finished_session_date: None,
            ..self
        }
    }
}

/// State as found in storage: any field may be missing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedState {
    pub progress: Option<BTreeMap<i64, ReviewRecord>>,
    pub streak: Option<u32>,
    pub last_finished_session_date: Option<NaiveDate>,
    pub daily_new_count: Option<usize>,
    pub use_typing: Option<bool>,
    pub active_course: Option<Course>,
}

impl PersistedState {
    pub fn into_state(self) -> AppState {
        self.merge_over(AppState::default())
    }

    /// Stored fields win; everything missing comes from `defaults`.
    pub fn merge_over(self, defaults: AppState) -> AppState {
        AppState {
            progress: self.progress.unwrap_or(defaults.progress),
            streak: self.streak.unwrap_or(defaults.streak),
            last_finished_session_date: self
                .last_finished_session_date
                .or(defaults.last_finished_session_date),
            daily_new_count: self.daily_new_count.unwrap_or(defaults.daily_new_count),
            use_typing: self.use_typing.unwrap_or(defaults.use_typing),
            active_course: self.active_course.unwrap_or(defaults.active_course),
        }
    }
}

/// User-editable settings; `None` leaves the current value alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub daily_new_count: Option<usize>,
    pub use_typing: Option<bool>,
    pub active_course: Option<Course>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_rejects_out_of_range_values() {
        assert_eq!(Grade::try_from(2_i64).unwrap(), Grade::Good);
        assert!(matches!(Grade::try_from(4_i64), Err(CoreError::InvalidGrade(4))));
        assert!(matches!(Grade::try_from(-1_i64), Err(CoreError::InvalidGrade(-1))));
    }

    #[test]
    fn partial_blob_merges_over_defaults() {
        let blob = r#"{"streak": 5, "activeCourse": "Level 2"}"#;
        let state = serde_json::from_str::<PersistedState>(blob).unwrap().into_state();

        assert_eq!(state.streak, 5);
        assert_eq!(state.active_course, Course::Level2);
        assert_eq!(state.daily_new_count, DEFAULT_DAILY_NEW_COUNT);
        assert!(state.use_typing);
        assert!(state.progress.is_empty());
        assert!(state.last_finished_session_date.is_none());
    }

    #[test]
    fn serialized_state_reads_back() {
        let mut state = AppState::default();
        let now: DateTime<Utc> = "2024-01-01T10:00:00Z".parse().unwrap();
        state.progress.insert(5, ReviewRecord {
            id: 5,
            ease: Grade::Good,
            interval: 2,
            due_date: now,
            lapses: 0,
            last_seen: now,
        });
        state.last_finished_session_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"dueDate\""));
        let back = serde_json::from_str::<PersistedState>(&json).unwrap().into_state();
        assert_eq!(back, state);
    }

    #[test]
    fn settings_do_not_touch_progress_or_streak() {
        let mut state = AppState::default();
        state.streak = 3;
        let settings = Settings {
            daily_new_count: Some(20),
            use_typing: Some(false),
            active_course: None,
        };
        let state = state.with_settings(&settings);

        assert_eq!(state.daily_new_count, 20);
        assert!(!state.use_typing);
        assert_eq!(state.active_course, Course::Core);
        assert_eq!(state.streak, 3);
    }

    #[test]
    fn reset_keeps_settings() {
        let mut state = AppState::default();
        state.streak = 7;
        state.daily_new_count = 40;
        state.last_finished_session_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        let state = state.reset_progress();

        assert_eq!(state.streak, 0);
        assert!(state.last_finished_session_date.is_none());
        assert_eq!(state.daily_new_count, 40);
    }
}
