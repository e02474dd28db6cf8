//! Confusability scoring between two frames, used to rank algorithmic distractors

use std::collections::HashSet;

use crate::catalog::Frame;

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "i", "it", "to", "of", "in", "is", "are", "was", "be", "and", "not",
];

fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

fn is_content_word(token: &str) -> bool {
    token.chars().count() > 2 && !STOP_WORDS.contains(&token)
}

fn same_prefix(a: &[String], b: &[String], n: usize) -> bool {
    a.len() >= n && b.len() >= n && a[..n] == b[..n]
}

/// Higher means `candidate` is easier to mistake for `target`.
pub fn score(target: &Frame, candidate: &Frame) -> i32 {
    let target_tokens = tokens(&target.text_en);
    let candidate_tokens = tokens(&candidate.text_en);
    let mut total = 0;

    if same_prefix(&target_tokens, &candidate_tokens, 1) {
        total += 5;
    }
    if same_prefix(&target_tokens, &candidate_tokens, 2) {
        total += 8;
    }
    if same_prefix(&target_tokens, &candidate_tokens, 3) {
        total += 12;
    }

    if target.block == candidate.block {
        total += 3;
    }

    let candidate_words: HashSet<&str> = candidate_tokens
        .iter()
        .map(String::as_str)
        .filter(|t| is_content_word(t))
        .collect();
    let shared = target_tokens
        .iter()
        .filter(|t| is_content_word(t) && candidate_words.contains(t.as_str()))
        .count();
    total += 2 * shared as i32;

    if target_tokens.len().abs_diff(candidate_tokens.len()) <= 2 {
        total += 2;
    }

    total
}
