//! Python bindings. Every call opens the database, applies one step and saves.

use chrono::Utc;
use pyo3::prelude::*;

use crate::catalog::{Catalog, Course, Frame};
use crate::config::Config;
use crate::db::{self, StateStore};
use crate::distractors::{self, QuizQuestion, DEFAULT_OPTION_COUNT};
use crate::import;
use crate::logging;
use crate::queue;
use crate::scheduler;
use crate::state::{AppState, Settings};
use crate::stats::{self, CourseStats};
use crate::streak;
use crate::typing::{self, MatchResult};

fn open_store(db_path: Option<&str>) -> PyResult<StateStore> {
    let config = Config::from_env();
    let path = db_path.map(str::to_string).unwrap_or_else(|| config.db_path.clone());
    let defaults = AppState {
        daily_new_count: config.default_daily_new_count,
        ..AppState::default()
    };
    let store = StateStore::open(&path)?.with_defaults(defaults);
    Ok(store)
}

fn parse_course(course: Option<&str>, fallback: Course) -> PyResult<Course> {
    Ok(course.map(str::parse::<Course>).transpose()?.unwrap_or(fallback))
}

// ============= Setup =============

#[pyfunction]
pub fn init_logging() {
    logging::init_tracing(&Config::from_env().log_config());
}

#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn init_database(db_path: Option<&str>) -> PyResult<()> {
    open_store(db_path).map(|_| ())
}

#[pyfunction]
#[pyo3(signature = (file_path, db_path=None))]
pub fn import_catalog(file_path: &str, db_path: Option<&str>) -> PyResult<usize> {
    let imported = import::parse_catalog_file(file_path)?;
    let mut store = open_store(db_path)?;
    let mut frames = imported.core;
    frames.extend(imported.level2);
    Ok(db::save_frames(store.connection_mut(), &frames)?)
}

#[pyfunction]
#[pyo3(signature = (primary_path, secondary_path, db_path=None))]
pub fn import_catalog_json(primary_path: &str, secondary_path: &str, db_path: Option<&str>) -> PyResult<usize> {
    let catalog = Catalog::from_json_files(primary_path, secondary_path)?;
    let mut store = open_store(db_path)?;
    Ok(db::save_frames(store.connection_mut(), catalog.frames())?)
}

// ============= Session =============

#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn get_today_queue(db_path: Option<&str>) -> PyResult<(Vec<Frame>, Vec<Frame>)> {
    let store = open_store(db_path)?;
    let state = store.load()?;
    let catalog = store.catalog()?;
    let due = queue::build_queue(&state, &catalog, Utc::now(), &mut rand::thread_rng());
    Ok((due.new_items, due.review_items))
}

/// Today's session as `(frame, mode)` pairs, mode being "quiz", "flip" or "type".
#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn get_session(db_path: Option<&str>) -> PyResult<Vec<(Frame, String)>> {
    let store = open_store(db_path)?;
    let state = store.load()?;
    let catalog = store.catalog()?;
    let mut rng = rand::thread_rng();

    let due = queue::build_queue(&state, &catalog, Utc::now(), &mut rng);
    Ok(queue::compose_session(&due, state.use_typing, &mut rng)
        .into_iter()
        .map(|item| (item.frame, item.mode.as_str().to_string()))
        .collect())
}

#[pyfunction]
#[pyo3(signature = (frame_id, grade, db_path=None))]
pub fn record_answer(frame_id: i64, grade: i64, db_path: Option<&str>) -> PyResult<()> {
    let store = open_store(db_path)?;
    let catalog = store.catalog()?;
    store.update(|state| scheduler::record_raw_answer(state, &catalog, frame_id, grade, Utc::now()))?;
    Ok(())
}

/// Returns the streak after recording today's session.
#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn mark_session_finished(db_path: Option<&str>) -> PyResult<u32> {
    let store = open_store(db_path)?;
    let today = Utc::now().date_naive();
    let state = store.update(|state| Ok(streak::mark_session_finished(state, today)))?;
    Ok(state.streak)
}

#[pyfunction]
#[pyo3(signature = (infinity_course=None, db_path=None))]
pub fn infinity_queue(infinity_course: Option<&str>, db_path: Option<&str>) -> PyResult<Vec<Frame>> {
    let store = open_store(db_path)?;
    let state = store.load()?;
    let course = parse_course(infinity_course, state.active_course)?;
    Ok(queue::infinite_queue(&store.catalog()?, course, &mut rand::thread_rng()))
}

// ============= Questions =============

#[pyfunction]
#[pyo3(signature = (frame_id, count=None, db_path=None))]
pub fn generate_question(frame_id: i64, count: Option<usize>, db_path: Option<&str>) -> PyResult<QuizQuestion> {
    let store = open_store(db_path)?;
    let catalog = store.catalog()?;
    let target = catalog.require(frame_id)?;
    Ok(distractors::build_question(
        &catalog,
        target,
        count.unwrap_or(DEFAULT_OPTION_COUNT),
        &mut rand::thread_rng(),
    )?)
}

#[pyfunction]
#[pyo3(signature = (user_input, expected, threshold=None))]
pub fn check_answer(user_input: &str, expected: &str, threshold: Option<f64>) -> MatchResult {
    let threshold = threshold.unwrap_or_else(|| Config::from_env().typing_threshold);
    typing::check_answer(user_input, expected, threshold)
}

#[pyfunction]
#[pyo3(signature = (frame_id, db_path=None))]
pub fn typing_hint(frame_id: i64, db_path: Option<&str>) -> PyResult<String> {
    let store = open_store(db_path)?;
    let catalog = store.catalog()?;
    Ok(typing::typing_hint(catalog.require(frame_id)?))
}

// ============= Settings & stats =============

#[pyfunction]
#[pyo3(signature = (daily_new_count=None, use_typing=None, active_course=None, db_path=None))]
pub fn update_settings(
    daily_new_count: Option<usize>,
    use_typing: Option<bool>,
    active_course: Option<&str>,
    db_path: Option<&str>,
) -> PyResult<()> {
    let active_course = active_course.map(str::parse::<Course>).transpose()?;
    let settings = Settings { daily_new_count, use_typing, active_course };
    let store = open_store(db_path)?;
    store.update(|state| Ok(state.with_settings(&settings)))?;
    Ok(())
}

#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn reset_progress(db_path: Option<&str>) -> PyResult<()> {
    let store = open_store(db_path)?;
    store.update(|state| Ok(state.reset_progress()))?;
    tracing::info!("Progress reset");
    Ok(())
}

#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn get_stats(db_path: Option<&str>) -> PyResult<CourseStats> {
    let store = open_store(db_path)?;
    Ok(stats::course_stats(&store.load()?, &store.catalog()?))
}

/// `(streak, last finished date as YYYY-MM-DD, 14-day calendar)`
#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn get_streak(db_path: Option<&str>) -> PyResult<(u32, Option<String>, Vec<bool>)> {
    let store = open_store(db_path)?;
    let state = store.load()?;
    Ok((
        state.streak,
        state.last_finished_session_date.map(|d| d.to_string()),
        stats::streak_calendar(state.streak),
    ))
}

/// `(low, high)` minutes for today's queue
#[pyfunction]
#[pyo3(signature = (db_path=None))]
pub fn estimate_session(db_path: Option<&str>) -> PyResult<(usize, usize)> {
    let (new_items, review_items) = get_today_queue(db_path)?;
    Ok(queue::estimate_minutes(new_items.len() + review_items.len()))
}

pub fn register(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Setup
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_function(wrap_pyfunction!(init_database, m)?)?;
    m.add_function(wrap_pyfunction!(import_catalog, m)?)?;
    m.add_function(wrap_pyfunction!(import_catalog_json, m)?)?;

    // Session
    m.add_function(wrap_pyfunction!(get_today_queue, m)?)?;
    m.add_function(wrap_pyfunction!(get_session, m)?)?;
    m.add_function(wrap_pyfunction!(record_answer, m)?)?;
    m.add_function(wrap_pyfunction!(mark_session_finished, m)?)?;
    m.add_function(wrap_pyfunction!(infinity_queue, m)?)?;

    // Questions
    m.add_function(wrap_pyfunction!(generate_question, m)?)?;
    m.add_function(wrap_pyfunction!(check_answer, m)?)?;
    m.add_function(wrap_pyfunction!(typing_hint, m)?)?;

    // Settings & stats
    m.add_function(wrap_pyfunction!(update_settings, m)?)?;
    m.add_function(wrap_pyfunction!(reset_progress, m)?)?;
    m.add_function(wrap_pyfunction!(get_stats, m)?)?;
    m.add_function(wrap_pyfunction!(get_streak, m)?)?;
    m.add_function(wrap_pyfunction!(estimate_session, m)?)?;

    // Register classes
    m.add_class::<Frame>()?;
    m.add_class::<QuizQuestion>()?;
    m.add_class::<MatchResult>()?;
    m.add_class::<CourseStats>()?;
    m.add_class::<stats::BlockStats>()?;

    Ok(())
}
