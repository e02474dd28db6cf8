//! Progress statistics for the active course

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::Serialize;

use crate::catalog::{Catalog, Course};
use crate::state::AppState;

/// Frames with this many lapses or more are not counted as learned.
pub const LEECH_LAPSES: u32 = 5;
pub const CALENDAR_DAYS: usize = 14;

/// Per-category totals
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub block: String,
    pub total: usize,
    pub learned: usize,
}

#[cfg(feature = "python")]
#[pymethods]
impl BlockStats {
    fn __repr__(&self) -> String {
        format!("BlockStats(block='{}', learned={}/{})", self.block, self.learned, self.total)
    }
}

/// Summary of a course's progress
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseStats {
    pub course: String,
    pub total_frames: usize,
    pub seen: usize,
    pub learned: usize,
    pub progress_percent: u32,
    pub blocks: Vec<BlockStats>,
}

#[cfg(feature = "python")]
#[pymethods]
impl CourseStats {
    fn __repr__(&self) -> String {
        format!("CourseStats(course='{}', seen={}, learned={}, progress={}%)",
                self.course, self.seen, self.learned, self.progress_percent)
    }
}

/// Catalog frames of `course` that have a record at all.
/// Records left behind by frames no longer in the catalog are ignored.
pub fn total_seen(state: &AppState, catalog: &Catalog, course: Course) -> usize {
    state
        .progress
        .keys()
        .filter(|&&id| course.contains(id) && catalog.contains(id))
        .count()
}

/// Catalog frames of `course` currently scheduled ahead and not chronically failed.
pub fn total_learned(state: &AppState, catalog: &Catalog, course: Course) -> usize {
    state
        .progress
        .values()
        .filter(|r| course.contains(r.id) && catalog.contains(r.id))
        .filter(|r| r.lapses < LEECH_LAPSES && r.interval > 0)
        .count()
}

/// Block breakdown in catalog order; a frame counts as learned once its interval is positive.
pub fn block_stats(state: &AppState, catalog: &Catalog, course: Course) -> Vec<BlockStats> {
    let mut blocks: Vec<BlockStats> = catalog
        .blocks(course)
        .into_iter()
        .map(|block| BlockStats { block: block.to_string(), total: 0, learned: 0 })
        .collect();

    for frame in catalog.course_frames(course) {
        let Some(entry) = blocks.iter_mut().find(|b| b.block == frame.block) else {
            continue;
        };
        entry.total += 1;
        if state.record(frame.id).is_some_and(|r| r.interval > 0) {
            entry.learned += 1;
        }
    }

    blocks
}

pub fn course_stats(state: &AppState, catalog: &Catalog) -> CourseStats {
    let course = state.active_course;
    let total_frames = catalog.course_len(course);
    let seen = total_seen(state, catalog, course);
    let progress_percent = if total_frames > 0 {
        ((seen as f64 / total_frames as f64) * 100.0).round() as u32
    } else {
        0
    };

    CourseStats {
        course: course.label().to_string(),
        total_frames,
        seen,
        learned: total_learned(state, catalog, course),
        progress_percent,
        blocks: block_stats(state, catalog, course),
    }
}

/// Two-week activity strip: the first `streak` days are lit.
pub fn streak_calendar(streak: u32) -> Vec<bool> {
    let active = (streak as usize).min(CALENDAR_DAYS);
    (0..CALENDAR_DAYS).map(|day| day < active).collect()
}
