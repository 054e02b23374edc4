use crate::model::Severity;

pub const CRITICAL_KEYWORDS: &[&str] = &[
    "immediate",
    "immediately",
    "stop driving",
    "dangerous",
    "critical",
    "severe",
    "emergency",
    "safety risk",
    "do not drive",
    "tow",
    "pull over",
    "serious damage",
    "engine damage",
    "unsafe",
    "risk of",
    "fire",
    "overheat",
    "overheating",
    "failure imminent",
];

pub const WARNING_KEYWORDS: &[&str] = &[
    "attention",
    "monitor",
    "soon",
    "potential",
    "recommend",
    "check",
    "abnormal",
    "unusual",
    "service",
    "maintenance",
    "should be",
    "may cause",
    "could lead",
    "inspect",
    "schedule",
    "not normal",
    "elevated",
    "low",
    "high",
    "outside range",
    "concern",
    "issue",
    "problem",
];

pub const NORMAL_KEYWORDS: &[&str] = &[
    "normal",
    "healthy",
    "good",
    "optimal",
    "within range",
    "no issues",
    "no problems",
    "functioning properly",
    "working correctly",
    "satisfactory",
    "acceptable",
    "fine",
    "okay",
    "no concern",
    "no fault",
    "no error",
];

/// Phrases that, found shortly before a critical keyword, cancel it.
pub const NEGATIONS: &[&str] = &[
    "not ",
    "no ",
    "isn't ",
    "aren't ",
    "wasn't ",
    "weren't ",
    "don't ",
    "doesn't ",
    "didn't ",
    "won't ",
    "wouldn't ",
    "can't ",
    "cannot ",
    "couldn't ",
    "shouldn't ",
];

/// Characters inspected before the first occurrence of each critical keyword.
pub const NEGATION_WINDOW: usize = 20;

/// Keyword hit counts for one text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordCounts {
    /// Critical keywords whose first occurrence is not negated.
    pub critical: usize,
    pub warning: usize,
    pub normal: usize,
}

/// Count keyword hits. Matching is case-insensitive substring matching.
pub fn count_keywords(text: &str) -> KeywordCounts {
    let lower = text.to_lowercase();
    KeywordCounts {
        critical: CRITICAL_KEYWORDS
            .iter()
            .filter(|kw| counts_unnegated(&lower, kw))
            .count(),
        warning: WARNING_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count(),
        normal: NORMAL_KEYWORDS
            .iter()
            .filter(|kw| lower.contains(*kw))
            .count(),
    }
}

/// Find the first occurrence of `keyword` and look back a bounded window for a negation.
///
/// Only the first occurrence decides: if it is negated, the keyword does not count.
fn counts_unnegated(lower: &str, keyword: &str) -> bool {
    match lower.find(keyword) {
        Some(pos) => {
            let window = preceding_chars(lower, pos, NEGATION_WINDOW);
            !NEGATIONS.iter().any(|neg| window.contains(neg))
        }
        None => false,
    }
}

/// The up-to-`n` characters ending at byte offset `end`.
fn preceding_chars(s: &str, end: usize, n: usize) -> &str {
    let head = &s[..end];
    let start = head
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(end);
    &head[start..]
}

/// Decide a severity from keyword counts. Rules are checked in order.
pub fn decide(counts: KeywordCounts) -> Severity {
    let KeywordCounts {
        critical: c,
        warning: w,
        normal: n,
    } = counts;

    if c >= 2 {
        Severity::Critical
    } else if c >= 1 && w >= 2 && n < 2 {
        Severity::Critical
    } else if n >= 3 && n > w {
        Severity::Normal
    } else if w >= 3 || (w >= 2 && n < w) {
        Severity::Warning
    } else if n > w {
        Severity::Normal
    } else if w >= 2 {
        Severity::Warning
    } else {
        Severity::Normal
    }
}

/// Score the severity of free-form text, such as a generated explanation.
pub fn score(text: &str) -> Severity {
    let counts = count_keywords(text);
    let severity = decide(counts);
    tracing::debug!(
        critical = counts.critical,
        warning = counts.warning,
        normal = counts.normal,
        %severity,
        "scored response text"
    );
    severity
}
