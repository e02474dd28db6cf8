//! Multiple-choice option generation

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::{Catalog, Frame};
use crate::error::{CoreError, Result};
use crate::similarity;

pub const DEFAULT_OPTION_COUNT: usize = 4;
/// Curated wrong answers are used only when a frame has at least this many.
pub const MIN_CURATED: usize = 3;
/// Size of the best-scoring pool the algorithmic distractors are drawn from.
pub const TOP_TIER: usize = 12;

/// A quiz prompt with its shuffled options
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone)]
pub struct QuizQuestion {
    pub frame_id: i64,
    pub prompt: String,
    pub options: Vec<Frame>,
    pub correct_index: usize,
}

#[cfg(feature = "python")]
#[pymethods]
impl QuizQuestion {
    fn __repr__(&self) -> String {
        format!("QuizQuestion(frame_id={}, options={}, prompt='{}...')",
                self.frame_id, self.options.len(), &self.prompt.chars().take(40).collect::<String>())
    }
}

/// Wrap curated wrong-answer strings as placeholder frames with negative ids.
fn curated_options<R: Rng + ?Sized>(target: &Frame, curated: &[String], take: usize, rng: &mut R) -> Vec<Frame> {
    let mut texts: Vec<&String> = curated.iter().collect();
    texts.shuffle(rng);

    texts
        .into_iter()
        .take(take)
        .enumerate()
        .map(|(i, text)| Frame {
            id: -(i as i64 + 1),
            block: target.block.clone(),
            text_en: String::new(),
            hint_ru: text.clone(),
            distractors: None,
        })
        .collect()
}

/// Pick confusable frames from the target's own course.
fn similar_options<R: Rng + ?Sized>(catalog: &Catalog, target: &Frame, take: usize, rng: &mut R) -> Vec<Frame> {
    let mut scored: Vec<(i32, &Frame)> = catalog
        .course_frames(target.course())
        .filter(|f| f.id != target.id)
        .map(|f| (similarity::score(target, f), f))
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(TOP_TIER);
    scored.shuffle(rng);

    scored.into_iter().take(take).map(|(_, f)| f.clone()).collect()
}

/// Build `count` options, exactly one of which is `target`. Returns fewer when the pool is too small.
pub fn generate_options<R: Rng + ?Sized>(
    catalog: &Catalog,
    target: &Frame,
    count: usize,
    rng: &mut R,
) -> Vec<Frame> {
    if count == 0 {
        return Vec::new();
    }
    let wanted = count - 1;

    let distractors = match target.curated_distractors(MIN_CURATED) {
        Some(curated) => curated_options(target, curated, wanted, rng),
        None => similar_options(catalog, target, wanted, rng),
    };

    if distractors.len() < wanted {
        tracing::debug!(
            frame_id = target.id,
            found = distractors.len(),
            wanted,
            "Distractor pool smaller than requested"
        );
    }

    let mut options = Vec::with_capacity(distractors.len() + 1);
    options.push(target.clone());
    options.extend(distractors);
    options.shuffle(rng);
    options
}

/// Position of the correct option, if present.
pub fn answer_index(options: &[Frame], target_id: i64) -> Option<usize> {
    options.iter().position(|f| f.id == target_id)
}

/// Assemble a full quiz question for one frame. `count` must be at least 1.
pub fn build_question<R: Rng + ?Sized>(
    catalog: &Catalog,
    target: &Frame,
    count: usize,
    rng: &mut R,
) -> Result<QuizQuestion> {
    if count == 0 {
        return Err(CoreError::InvalidOptionCount(count));
    }
    let options = generate_options(catalog, target, count, rng);
    let correct_index = answer_index(&options, target.id).ok_or(CoreError::UnknownFrame(target.id))?;

    Ok(QuizQuestion {
        frame_id: target.id,
        prompt: target.text_en.clone(),
        options,
        correct_index,
    })
}
