//! Maroeng Core - spaced-repetition engine for the phrase trainer
//!
//! Decides which frames are due, schedules the next review after each graded answer,
//! tracks the daily streak and builds multiple-choice options. Every engine function takes
//! the learner state explicitly and returns the next state; randomness is injected.

pub mod catalog;
pub mod config;
pub mod db;
pub mod distractors;
pub mod error;
pub mod import;
pub mod logging;
pub mod queue;
pub mod scheduler;
pub mod similarity;
pub mod state;
pub mod stats;
pub mod streak;
pub mod typing;

#[cfg(feature = "python")]
mod bindings;

pub use catalog::{Catalog, Course, Frame, COURSE_THRESHOLD};
pub use db::{init_database, load_catalog, load_state, save_frames, save_state, StateStore};
pub use distractors::{answer_index, build_question, generate_options, QuizQuestion, DEFAULT_OPTION_COUNT};
pub use error::{CoreError, Result};
pub use queue::{build_queue, compose_session, infinite_queue, CardMode, DrillScore, DueQueue, SessionItem};
pub use scheduler::{next_interval, record_answer, record_raw_answer};
pub use state::{AppState, Grade, PersistedState, ReviewRecord, Settings};
pub use stats::{course_stats, BlockStats, CourseStats};
pub use streak::mark_session_finished;
pub use typing::{check_answer, MatchResult};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Maroeng Core Python Module
#[cfg(feature = "python")]
#[pymodule]
fn maroeng_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    bindings::register(m)
}
