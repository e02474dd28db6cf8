//! Typed-answer checking for the typing review mode

use std::collections::HashMap;

#[cfg(feature = "python")]
use pyo3::prelude::*;

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::catalog::Frame;
use crate::state::Grade;

pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Outcome of comparing a typed phrase against the expected one
#[cfg_attr(feature = "python", pyclass(get_all))]
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub is_correct: bool,
    pub similarity_score: f64,
    pub feedback: String,
    /// Words of the expected phrase the learner left out or misspelled, in phrase order
    pub missing_words: Vec<String>,
}

impl MatchResult {
    /// Grade to pre-select for the learner: exact is Good, accepted is Hard, otherwise Again.
    pub fn suggested_grade(&self) -> Grade {
        if !self.is_correct {
            Grade::Again
        } else if self.similarity_score >= 1.0 {
            Grade::Good
        } else {
            Grade::Hard
        }
    }
}

#[cfg(feature = "python")]
#[pymethods]
impl MatchResult {
    /// Suggested grade as 0..=3
    fn grade(&self) -> i64 {
        self.suggested_grade().into()
    }

    fn __repr__(&self) -> String {
        format!("MatchResult(is_correct={}, score={:.2}, feedback='{}')",
                self.is_correct, self.similarity_score, self.feedback)
    }
}

/// Lowercased words with surrounding punctuation stripped; apostrophes inside words stay.
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'').to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Expected words not covered by the typed ones, counting repeats.
fn missing_words(typed: &[String], expected: &[String]) -> Vec<String> {
    let mut available: HashMap<&str, usize> = HashMap::new();
    for word in typed {
        *available.entry(word.as_str()).or_default() += 1;
    }

    expected
        .iter()
        .filter(|word| match available.get_mut(word.as_str()) {
            Some(n) if *n > 0 => {
                *n -= 1;
                false
            }
            _ => true,
        })
        .cloned()
        .collect()
}

/// Compare what the learner typed with the frame's English text.
/// Case, spacing and punctuation are ignored; the score is a blend of edit distance and Jaro-Winkler.
pub fn check_answer(input: &str, expected: &str, threshold: f64) -> MatchResult {
    let typed = words(input);
    let wanted = words(expected);
    let missing = missing_words(&typed, &wanted);

    let typed_joined = typed.join(" ");
    let wanted_joined = wanted.join(" ");

    if typed_joined == wanted_joined {
        return MatchResult {
            is_correct: true,
            similarity_score: 1.0,
            feedback: "Perfect!".to_string(),
            missing_words: Vec::new(),
        };
    }

    let similarity = normalized_levenshtein(&typed_joined, &wanted_joined) * 0.4
        + jaro_winkler(&typed_joined, &wanted_joined) * 0.6;
    let is_correct = similarity >= threshold;

    let feedback = match (is_correct, missing.is_empty()) {
        (true, true) => "Close enough! Mind the word order.".to_string(),
        (true, false) => format!("Close enough! Check: {}", missing.join(", ")),
        (false, _) if missing.len() < wanted.len() => {
            format!("Not quite. Missing: {}. Expected: '{}'", missing.join(", "), expected)
        }
        (false, _) => format!("Incorrect. Expected: '{}'", expected),
    };

    MatchResult {
        is_correct,
        similarity_score: similarity,
        feedback,
        missing_words: missing,
    }
}

/// First two words of the phrase, used to nudge the learner.
pub fn typing_hint(frame: &Frame) -> String {
    let words: Vec<&str> = frame.text_en.split(' ').take(2).collect();
    format!("{} ", words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::frame;

    #[test]
    fn exact_match_ignores_case_spacing_and_punctuation() {
        let result = check_answer("  how   are YOU ", "How are you?", DEFAULT_THRESHOLD);
        assert!(result.is_correct);
        assert_eq!(result.similarity_score, 1.0);
        assert_eq!(result.suggested_grade(), Grade::Good);
    }

    #[test]
    fn small_typo_names_the_word() {
        let result = check_answer("I would like to ordr", "I would like to order", DEFAULT_THRESHOLD);
        assert!(result.is_correct);
        assert!(result.similarity_score < 1.0);
        assert_eq!(result.missing_words, vec!["order".to_string()]);
        assert!(result.feedback.contains("order"));
        assert_eq!(result.suggested_grade(), Grade::Hard);
    }

    #[test]
    fn partial_phrase_lists_missing_words() {
        let result = check_answer("I would like", "I would like to order", 0.95);
        assert!(!result.is_correct);
        assert_eq!(result.missing_words, vec!["to".to_string(), "order".to_string()]);
        assert!(result.feedback.starts_with("Not quite. Missing: to, order."));
    }

    #[test]
    fn repeated_words_are_counted() {
        let result = check_answer("so", "so so", 0.99);
        assert_eq!(result.missing_words, vec!["so".to_string()]);
    }

    #[test]
    fn unrelated_answer_is_rejected() {
        let result = check_answer("zzz", "I would like to order", DEFAULT_THRESHOLD);
        assert!(!result.is_correct);
        assert!(result.feedback.starts_with("Incorrect."));
        assert!(result.feedback.contains("I would like to order"));
        assert_eq!(result.suggested_grade(), Grade::Again);
    }

    #[test]
    fn apostrophes_survive_normalization() {
        assert_eq!(words("\"Don't,\" she said."), vec!["don't", "she", "said"]);
    }

    #[test]
    fn hint_is_first_two_words() {
        let f = frame(1, "Core", "Could you say that again", "ru");
        assert_eq!(typing_hint(&f), "Could you ");
    }
}
