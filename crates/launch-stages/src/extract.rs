//! Heuristic text extraction for the research and sentiment stages.
//!
//! Both functions are pure and collaborator-free. They are heuristics, not
//! parsers: the rules below are fixed so results are reproducible.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Maximum competitors taken from a task
pub const MAX_COMPETITORS: usize = 3;

/// Maximum keywords taken from a task
pub const MAX_KEYWORDS: usize = 3;

const COMPETITOR_TRIGGERS: [&str; 4] = ["vs", "versus", "competitor", "competitors"];

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "vs",
        "versus",
    ]
    .into_iter()
    .collect()
});

/// Competitor names mentioned in a task.
///
/// The token after a trigger word (`vs`, `versus`, `competitor`,
/// `competitors`) is a competitor, as is the token after any `and` that is
/// not the first token. With no match the first token is used. At most
/// [`MAX_COMPETITORS`] names are returned, in discovery order, duplicates kept.
pub fn extract_competitors(task: &str) -> Vec<String> {
    let words: Vec<&str> = task.split_whitespace().collect();
    let mut competitors = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let lowered = word.to_lowercase();
        let Some(next) = words.get(i + 1) else {
            continue;
        };
        if COMPETITOR_TRIGGERS.contains(&lowered.as_str()) {
            competitors.push(next.to_string());
        } else if lowered == "and" && i > 0 {
            competitors.push(next.to_string());
        }
    }

    if competitors.is_empty() {
        if let Some(first) = words.first() {
            competitors.push(first.to_string());
        }
    }

    competitors.truncate(MAX_COMPETITORS);
    competitors
}

/// Lowercased search keywords from a task: stop words and tokens of two
/// characters or fewer are dropped, the first [`MAX_KEYWORDS`] are kept.
pub fn extract_keywords(task: &str) -> Vec<String> {
    task.to_lowercase()
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(*w) && w.chars().count() > 2)
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// First `max` characters of a text
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
