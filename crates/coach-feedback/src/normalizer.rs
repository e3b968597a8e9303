//! Reduce raw model output to at most three clean sentences.

use std::sync::LazyLock;

use regex::Regex;

/// Sentences kept in normalized feedback.
const MAX_SENTENCES: usize = 3;

/// Fewer sentences than this is a normalization failure.
const MIN_SENTENCES: usize = 2;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Numbered, bulleted or quoted list marker at the start of a line.
static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:\d+[.)]|[-*•>])[ \t]+").expect("valid list marker regex")
});

/// Split on runs of `.`, `!` or `?`, trimming and dropping empty fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Strip markdown decoration models like to wrap answers in.
///
/// List markers are removed from every line so that `1.` or `-` never
/// counts as a sentence of its own.
fn strip_decoration(text: &str) -> String {
    let mut text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // Drop an optional language tag on the fence line.
        text = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);
    }
    text = text.trim_end().trim_end_matches("```");

    LIST_MARKER
        .replace_all(text, "")
        .lines()
        .map(|line| line.trim().trim_matches('"').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalize a raw response.
///
/// Returns `None` for missing input or fewer than two sentences. Otherwise
/// returns the first three sentences, whitespace-collapsed, each terminated
/// with a period and joined by single spaces.
pub fn normalize(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }

    let stripped = strip_decoration(raw);
    let sentences = split_sentences(&stripped);
    if sentences.len() < MIN_SENTENCES {
        return None;
    }

    let normalized = sentences
        .into_iter()
        .take(MAX_SENTENCES)
        .map(|s| {
            let mut sentence = WHITESPACE_RUN.replace_all(s, " ").into_owned();
            if !sentence.ends_with(['.', '!', '?']) {
                sentence.push('.');
            }
            sentence
        })
        .collect::<Vec<_>>()
        .join(" ");

    Some(normalized)
}
