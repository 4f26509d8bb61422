// ➕➖ Action Extractor - keyword + amount → signed points delta
// Closed keyword vocabulary, looked up in a table rather than cascading contains checks

use crate::text::char_len;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ============================================================================
// ACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Award points
    Add,

    /// Deduct points
    Subtract,
}

impl ActionKind {
    /// Apply this action's sign to an unsigned amount
    pub fn apply(&self, amount: i64) -> i64 {
        match self {
            ActionKind::Add => amount,
            ActionKind::Subtract => -amount,
        }
    }
}

/// Keyword → action. Lookups use the lowercased keyword.
///
/// "给" ("give") is the default add keyword: "给萱萱100分".
pub const ACTION_KEYWORDS: [(&str, ActionKind); 11] = [
    ("加", ActionKind::Add),
    ("奖励", ActionKind::Add),
    ("赠送", ActionKind::Add),
    ("给", ActionKind::Add),
    ("plus", ActionKind::Add),
    ("jiā", ActionKind::Add),
    ("扣", ActionKind::Subtract),
    ("减", ActionKind::Subtract),
    ("罚", ActionKind::Subtract),
    ("minus", ActionKind::Subtract),
    // Pinyin of 扣, so it deducts like 扣 does
    ("kòu", ActionKind::Subtract),
];

/// Unit words that may trail the amount
pub const UNIT_WORDS: [&str; 3] = ["积分", "分", "点"];

static KEYWORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = ACTION_KEYWORDS
        .iter()
        .map(|(keyword, _)| regex::escape(keyword))
        .collect();
    Regex::new(&format!("(?i){}", alternatives.join("|"))).unwrap()
});

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    let units: Vec<String> = UNIT_WORDS.iter().map(|unit| regex::escape(unit)).collect();
    Regex::new(&format!(r"^\s*([0-9]+)(?:\s*(?:{}))?", units.join("|"))).unwrap()
});

/// Look up a keyword as matched in the text (any case)
pub fn action_for_keyword(keyword: &str) -> Option<ActionKind> {
    let lowered = keyword.to_lowercase();
    ACTION_KEYWORDS
        .iter()
        .find(|(k, _)| *k == lowered)
        .map(|(_, kind)| *kind)
}

// ============================================================================
// ACTION MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionMatch {
    pub kind: ActionKind,

    /// Keyword exactly as it appeared in the text
    pub keyword: String,

    /// Unsigned amount from the digit run
    pub amount: i64,

    /// Full span: keyword, anything allowed between, digits and unit
    pub matched_text: String,

    /// Char offset of the span in the normalized text.
    /// Normalization is char-for-char, so it is also the offset in the utterance.
    pub char_start: usize,

    /// Span length in chars
    pub char_len: usize,
}

impl ActionMatch {
    pub fn points_delta(&self) -> i64 {
        self.kind.apply(self.amount)
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Find the first keyword followed by an amount
///
/// Between keyword and digits there may be whitespace and, once, the text
/// that identified the child ("扣闹闹50分"). Returns None when no keyword
/// is followed by digits, or when the digit run overflows.
pub fn extract_action(normalized_text: &str, identifier_span: &str) -> Option<ActionMatch> {
    let (keyword_match, kind, digits, consumed) = KEYWORD_RE.find_iter(normalized_text).find_map(|keyword_match| {
        // Case folding in the regex is wider than to_lowercase ("pluſ"), so skip what the table lacks
        let kind = action_for_keyword(keyword_match.as_str())?;
        let tail = &normalized_text[keyword_match.end()..];
        amount_after_keyword(tail, identifier_span)
            .map(|(digits, consumed)| (keyword_match, kind, digits, consumed))
    })?;

    let keyword = keyword_match.as_str();
    let amount = match digits.parse::<i64>() {
        Ok(amount) => amount,
        Err(e) => {
            tracing::debug!(digits = %digits, error = %e, "amount does not fit");
            return None;
        }
    };

    let matched_text = &normalized_text[keyword_match.start()..keyword_match.end() + consumed];
    tracing::debug!(keyword = %keyword, amount, matched = %matched_text, "action keyword match");

    Some(ActionMatch {
        kind,
        keyword: keyword.to_string(),
        amount,
        matched_text: matched_text.to_string(),
        char_start: char_len(&normalized_text[..keyword_match.start()]),
        char_len: char_len(matched_text),
    })
}

/// Digits right after a keyword, and how many bytes of `tail` the amount (and unit) used
fn amount_after_keyword<'t>(tail: &'t str, identifier_span: &str) -> Option<(&'t str, usize)> {
    if let Some(caps) = AMOUNT_RE.captures(tail) {
        return Some((caps.get(1)?.as_str(), caps.get(0)?.end()));
    }

    let rest = strip_identifier(tail, identifier_span)?;
    let caps = AMOUNT_RE.captures(rest)?;
    let consumed = (tail.len() - rest.len()) + caps.get(0)?.end();
    Some((caps.get(1)?.as_str(), consumed))
}

/// `tail` after optional whitespace and the identifier span, if the span is there
fn strip_identifier<'t>(tail: &'t str, identifier_span: &str) -> Option<&'t str> {
    let span = identifier_span.trim();
    if span.is_empty() {
        return None;
    }
    tail.trim_start().strip_prefix(span)
}

// ============================================================================
// TESTS
// ============================================================================
