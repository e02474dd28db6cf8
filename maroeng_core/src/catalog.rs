//! Frame catalog: the immutable set of learnable phrases, split into two courses by id

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Ids below this value belong to the Core course, ids at or above it to Level 2.
pub const COURSE_THRESHOLD: i64 = 1000;

/// A single learnable prompt/translation pair
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: i64,
    pub block: String,
    pub text_en: String,
    pub hint_ru: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distractors: Option<Vec<String>>,
}

impl Frame {
    pub fn course(&self) -> Course {
        Course::of(self.id)
    }

    /// Curated wrong answers, if the frame carries at least `min` of them.
    pub fn curated_distractors(&self, min: usize) -> Option<&[String]> {
        self.distractors
            .as_deref()
            .filter(|d| d.len() >= min)
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl Frame {
    fn __repr__(&self) -> String {
        format!("Frame(id={}, block='{}', text_en='{}')",
                self.id, self.block, self.text_en)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Course {
    #[default]
    #[serde(rename = "Core Challenge", alias = "core")]
    Core,
    #[serde(rename = "Level 2", alias = "level2")]
    Level2,
}

impl Course {
    pub const ALL: [Course; 2] = [Course::Core, Course::Level2];

    /// Course membership is decided by id range alone.
    pub fn of(id: i64) -> Self {
        if id < COURSE_THRESHOLD {
            Course::Core
        } else {
            Course::Level2
        }
    }

    pub fn contains(self, id: i64) -> bool {
        Course::of(id) == self
    }

    pub fn label(self) -> &'static str {
        match self {
            Course::Core => "Core Challenge",
            Course::Level2 => "Level 2",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Course {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "core" | "core challenge" => Ok(Course::Core),
            "level2" | "level 2" | "level_2" => Ok(Course::Level2),
            _ => Err(CoreError::UnknownCourse(s.to_string())),
        }
    }
}

/// Both course lists merged into one collection addressable by id
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    frames: Vec<Frame>,
    index: BTreeMap<i64, usize>,
}

impl Catalog {
    /// Merge the primary and secondary lists, keeping their order.
    pub fn new(primary: Vec<Frame>, secondary: Vec<Frame>) -> Result<Self> {
        let mut frames = primary;
        frames.extend(secondary);

        let mut index = BTreeMap::new();
        for (pos, frame) in frames.iter().enumerate() {
            if frame.id < 0 {
                return Err(CoreError::InvalidCatalog(format!("negative frame id {}", frame.id)));
            }
            if index.insert(frame.id, pos).is_some() {
                return Err(CoreError::InvalidCatalog(format!("duplicate frame id {}", frame.id)));
            }
        }

        Ok(Self { frames, index })
    }

    pub fn from_json_str(primary: &str, secondary: &str) -> Result<Self> {
        let primary: Vec<Frame> = serde_json::from_str(primary)?;
        let secondary: Vec<Frame> = serde_json::from_str(secondary)?;
        Self::new(primary, secondary)
    }

    pub fn from_json_files(primary: impl AsRef<Path>, secondary: impl AsRef<Path>) -> Result<Self> {
        let primary = std::fs::read_to_string(primary)?;
        let secondary = std::fs::read_to_string(secondary)?;
        let catalog = Self::from_json_str(&primary, &secondary)?;
        tracing::info!(frames = catalog.len(), "Catalog loaded from JSON");
        Ok(catalog)
    }

    pub fn get(&self, id: i64) -> Option<&Frame> {
        self.index.get(&id).map(|&pos| &self.frames[pos])
    }

    pub fn require(&self, id: i64) -> Result<&Frame> {
        self.get(id).ok_or(CoreError::UnknownFrame(id))
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn course_frames(&self, course: Course) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter().filter(move |f| course.contains(f.id))
    }

    pub fn course_len(&self, course: Course) -> usize {
        self.course_frames(course).count()
    }

    /// Category tags in order of first appearance within a course.
    pub fn blocks(&self, course: Course) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.course_frames(course)
            .map(|f| f.block.as_str())
            .filter(|b| seen.insert(*b))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
