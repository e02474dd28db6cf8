//! Interval scheduling: turns a grade into the next review record

use chrono::{DateTime, Days, Utc};

use crate::catalog::Catalog;
use crate::error::{CoreError, Result};
use crate::state::{AppState, Grade, ReviewRecord};

const HARD_FACTOR: f64 = 1.2;
const GOOD_FACTOR: f64 = 2.0;
const EASY_FACTOR: f64 = 2.5;

/// Days until the next review given the previous interval (`None` for a first exposure).
pub fn next_interval(prior: Option<u32>, grade: Grade) -> u32 {
    match (prior, grade) {
        (_, Grade::Again) => 0,
        (None, Grade::Hard) => 1,
        (None, Grade::Good) => 2,
        (None, Grade::Easy) => 4,
        (Some(0), Grade::Hard | Grade::Good) => 1,
        (Some(0), Grade::Easy) => 4,
        (Some(k), Grade::Hard) => scale(k, HARD_FACTOR).max(1),
        (Some(k), Grade::Good) => scale(k, GOOD_FACTOR),
        (Some(k), Grade::Easy) => scale(k, EASY_FACTOR),
    }
}

fn scale(interval: u32, factor: f64) -> u32 {
    (f64::from(interval) * factor).round() as u32
}

/// Build the record that replaces `prior` after answering with `grade` at `now`.
pub fn schedule(id: i64, prior: Option<&ReviewRecord>, grade: Grade, now: DateTime<Utc>) -> ReviewRecord {
    let interval = next_interval(prior.map(|r| r.interval), grade);

    let mut lapses = prior.map_or(0, |r| r.lapses);
    if prior.is_some() && grade == Grade::Again {
        lapses = lapses.saturating_add(1);
    }

    // Calendar-day arithmetic; saturates instead of overflowing past the supported range.
    let due_date = now
        .checked_add_days(Days::new(u64::from(interval)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    ReviewRecord {
        id,
        ease: grade,
        interval,
        due_date,
        lapses,
        last_seen: now,
    }
}

/// Apply one graded answer to the state. Unknown frames are rejected rather than recorded.
pub fn record_answer(
    mut state: AppState,
    catalog: &Catalog,
    frame_id: i64,
    grade: Grade,
    now: DateTime<Utc>,
) -> Result<AppState> {
    if !catalog.contains(frame_id) {
        return Err(CoreError::UnknownFrame(frame_id));
    }

    let record = schedule(frame_id, state.progress.get(&frame_id), grade, now);
    tracing::debug!(
        frame_id,
        grade = %grade,
        interval = record.interval,
        lapses = record.lapses,
        "Answer recorded"
    );
    state.progress.insert(frame_id, record);
    Ok(state)
}

/// Same as [`record_answer`] for a raw grade coming from outside the crate.
pub fn record_raw_answer(
    state: AppState,
    catalog: &Catalog,
    frame_id: i64,
    grade: i64,
    now: DateTime<Utc>,
) -> Result<AppState> {
    let grade = Grade::try_from(grade)?;
    record_answer(state, catalog, frame_id, grade, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::frame;

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(
            vec![frame(5, "Core", "I guess", "Наверное"), frame(6, "Core", "I mean", "То есть")],
            vec![],
        )
        .unwrap()
    }

    fn prior(interval: u32, lapses: u32) -> ReviewRecord {
        let t = at("2024-01-01T00:00:00Z");
        ReviewRecord { id: 5, ease: Grade::Good, interval, due_date: t, lapses, last_seen: t }
    }

    #[test]
    fn first_exposure_intervals() {
        assert_eq!(next_interval(None, Grade::Again), 0);
        assert_eq!(next_interval(None, Grade::Hard), 1);
        assert_eq!(next_interval(None, Grade::Good), 2);
        assert_eq!(next_interval(None, Grade::Easy), 4);
    }

    #[test]
    fn relearning_intervals() {
        assert_eq!(next_interval(Some(0), Grade::Again), 0);
        assert_eq!(next_interval(Some(0), Grade::Hard), 1);
        assert_eq!(next_interval(Some(0), Grade::Good), 1);
        assert_eq!(next_interval(Some(0), Grade::Easy), 4);
    }

    #[test]
    fn growth_intervals() {
        assert_eq!(next_interval(Some(10), Grade::Hard), 12);
        assert_eq!(next_interval(Some(1), Grade::Hard), 1);
        assert_eq!(next_interval(Some(10), Grade::Good), 20);
        assert_eq!(next_interval(Some(10), Grade::Easy), 25);
        assert_eq!(next_interval(Some(3), Grade::Easy), 8);
        assert_eq!(next_interval(Some(10), Grade::Again), 0);
    }

    #[test]
    fn good_on_new_frame_matches_worked_example() {
        let now = at("2024-01-01T00:00:00Z");
        let state = record_answer(AppState::default(), &catalog(), 5, Grade::Good, now).unwrap();
        let record = state.record(5).unwrap();

        assert_eq!(record.interval, 2);
        assert_eq!(record.due_date, at("2024-01-03T00:00:00Z"));
        assert_eq!(record.ease, Grade::Good);
        assert_eq!(record.lapses, 0);
        assert_eq!(record.last_seen, now);
    }

    #[test]
    fn again_on_new_frame_is_due_immediately_without_lapse() {
        let now = at("2024-01-01T09:30:00Z");
        let state = record_answer(AppState::default(), &catalog(), 5, Grade::Again, now).unwrap();
        let record = state.record(5).unwrap();

        assert_eq!(record.interval, 0);
        assert_eq!(record.lapses, 0);
        assert!(record.is_due(now));
    }

    #[test]
    fn again_on_scheduled_frame_counts_a_lapse() {
        let record = schedule(5, Some(&prior(10, 2)), Grade::Again, at("2024-02-01T00:00:00Z"));
        assert_eq!(record.interval, 0);
        assert_eq!(record.lapses, 3);
    }

    #[test]
    fn lapse_count_saturates() {
        let record = schedule(5, Some(&prior(3, u32::MAX)), Grade::Again, at("2024-02-01T00:00:00Z"));
        assert_eq!(record.lapses, u32::MAX);
    }

    #[test]
    fn due_date_rolls_over_month_and_year() {
        let record = schedule(5, Some(&prior(10, 0)), Grade::Easy, at("2023-12-20T12:00:00Z"));
        assert_eq!(record.interval, 25);
        assert_eq!(record.due_date, at("2024-01-14T12:00:00Z"));
    }

    #[test]
    fn only_the_answered_frame_changes() {
        let now = at("2024-01-01T00:00:00Z");
        let state = record_answer(AppState::default(), &catalog(), 6, Grade::Easy, now).unwrap();
        let state = record_answer(state, &catalog(), 5, Grade::Hard, now).unwrap();

        assert_eq!(state.record(6).unwrap().interval, 4);
        assert_eq!(state.record(5).unwrap().interval, 1);
    }

    #[test]
    fn unknown_frame_is_rejected() {
        let now = at("2024-01-01T00:00:00Z");
        let err = record_answer(AppState::default(), &catalog(), 77, Grade::Good, now);
        assert!(matches!(err, Err(CoreError::UnknownFrame(77))));
    }

    #[test]
    fn raw_grade_out_of_range_is_rejected() {
        let now = at("2024-01-01T00:00:00Z");
        let err = record_raw_answer(AppState::default(), &catalog(), 5, 4, now);
        assert!(matches!(err, Err(CoreError::InvalidGrade(4))));
    }
}
