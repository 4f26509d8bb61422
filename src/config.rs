// ⚙️ Parser Configuration - thresholds and fallback reasons as data

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_POSITIVE_REASON: &str = "表现不错";
pub const DEFAULT_NEGATIVE_REASON: &str = "需要改进";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Identifiers up to this many chars count as "short" (default: 2)
    pub short_identifier_max_len: usize,

    /// Max edit distance accepted for short identifiers (default: 1)
    ///
    /// One wrong char in a two-char name is already a different word,
    /// so the budget is tighter than for longer names.
    pub short_identifier_threshold: usize,

    /// Max edit distance accepted for longer identifiers (default: 2)
    pub long_identifier_threshold: usize,

    /// Reason used when nothing descriptive is left and points were added
    pub positive_default_reason: String,

    /// Reason used when nothing descriptive is left and points were deducted
    pub negative_default_reason: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            short_identifier_max_len: 2,
            short_identifier_threshold: 1,
            long_identifier_threshold: 2,
            positive_default_reason: DEFAULT_POSITIVE_REASON.to_string(),
            negative_default_reason: DEFAULT_NEGATIVE_REASON.to_string(),
        }
    }
}

impl ParserConfig {
    /// Load config from JSON file. Missing fields keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read parser config: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse parser config JSON")
    }

    /// Edit distance budget for an identifier of `len` chars
    pub fn fuzzy_threshold(&self, len: usize) -> usize {
        if len <= self.short_identifier_max_len {
            self.short_identifier_threshold
        } else {
            self.long_identifier_threshold
        }
    }

    /// Fallback reason for a delta of the given sign
    ///
    /// A blank configured reason falls back to the built-in one, so a
    /// successful parse never carries an empty reason.
    pub fn default_reason(&self, points_delta: i64) -> &str {
        let (configured, builtin) = if points_delta > 0 {
            (&self.positive_default_reason, DEFAULT_POSITIVE_REASON)
        } else {
            (&self.negative_default_reason, DEFAULT_NEGATIVE_REASON)
        };

        match configured.trim() {
            "" => builtin,
            reason => reason,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
