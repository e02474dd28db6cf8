//! Due-queue building, session composition and the endless drill queue

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::catalog::{Catalog, Course, Frame};
use crate::state::AppState;

/// What today's session should contain
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueQueue {
    pub new_items: Vec<Frame>,
    pub review_items: Vec<Frame>,
}

impl DueQueue {
    pub fn total(&self) -> usize {
        self.new_items.len() + self.review_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Unseen frames (shuffled, capped at the daily quota) and every frame due at `now`, for the active course.
pub fn build_queue<R: Rng + ?Sized>(state: &AppState, catalog: &Catalog, now: DateTime<Utc>, rng: &mut R) -> DueQueue {
    let course = state.active_course;

    let mut new_items: Vec<Frame> = catalog
        .course_frames(course)
        .filter(|f| !state.progress.contains_key(&f.id))
        .cloned()
        .collect();
    new_items.shuffle(rng);
    new_items.truncate(state.daily_new_count);

    let review_items: Vec<Frame> = catalog
        .course_frames(course)
        .filter(|f| state.record(f.id).is_some_and(|r| r.is_due(now)))
        .cloned()
        .collect();

    tracing::debug!(
        course = %course,
        new = new_items.len(),
        review = review_items.len(),
        "Queue built"
    );

    DueQueue { new_items, review_items }
}

/// Every frame of `course` in a fresh random order; rebuild once exhausted.
pub fn infinite_queue<R: Rng + ?Sized>(catalog: &Catalog, course: Course, rng: &mut R) -> Vec<Frame> {
    let mut frames: Vec<Frame> = catalog.course_frames(course).cloned().collect();
    frames.shuffle(rng);
    frames
}

/// Running score of one infinity drill; survives queue rebuilds between rounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrillScore {
    pub correct: u32,
    pub total: u32,
}

impl DrillScore {
    pub fn record(&mut self, correct: bool) {
        self.total = self.total.saturating_add(1);
        if correct {
            self.correct = self.correct.saturating_add(1);
        }
    }

    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (f64::from(self.correct) / f64::from(self.total) * 100.0).round() as u32
    }

    /// Full passes through a queue of `queue_len` frames.
    pub fn rounds_completed(&self, queue_len: usize) -> usize {
        if queue_len == 0 {
            0
        } else {
            self.total as usize / queue_len
        }
    }
}

/// How a card is presented during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardMode {
    Quiz,
    Flip,
    Type,
}

impl CardMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CardMode::Quiz => "quiz",
            CardMode::Flip => "flip",
            CardMode::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionItem {
    pub frame: Frame,
    pub mode: CardMode,
}

fn review_mode<R: Rng + ?Sized>(use_typing: bool, rng: &mut R) -> CardMode {
    let r: f64 = rng.gen();
    if use_typing && r > 0.7 {
        CardMode::Type
    } else if r > 0.5 {
        CardMode::Quiz
    } else {
        CardMode::Flip
    }
}

/// Turn a due queue into an ordered session. New frames are always asked as quizzes.
pub fn compose_session<R: Rng + ?Sized>(queue: &DueQueue, use_typing: bool, rng: &mut R) -> Vec<SessionItem> {
    let mut items: Vec<SessionItem> = queue
        .new_items
        .iter()
        .map(|frame| SessionItem { frame: frame.clone(), mode: CardMode::Quiz })
        .collect();

    for frame in &queue.review_items {
        let mode = review_mode(use_typing, rng);
        items.push(SessionItem { frame: frame.clone(), mode });
    }

    items.shuffle(rng);
    items
}

/// Rough session length in minutes as `(low, high)`.
pub fn estimate_minutes(total_cards: usize) -> (usize, usize) {
    let total = total_cards as f64;
    let low = ((total * 0.8).round() as usize).max(1);
    let high = ((total * 1.2).round() as usize).max(3);
    (low, high)
}
