// 🔍 Entity Resolver - Which child is the utterance about?
// Two strategies: Exact Match first, Fuzzy Match (edit distance) second

use crate::config::ParserConfig;
use crate::entities::Child;
use crate::text::levenshtein_chars;
use serde::{Deserialize, Serialize};

// ============================================================================
// MATCH STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrategy {
    /// An identifier appears verbatim in the text
    ExactMatch,

    /// A window of the text is within the edit distance budget of an identifier
    FuzzyMatch,
}

// ============================================================================
// ENTITY MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EntityMatch<'c> {
    /// The resolved child (borrowed from the caller's registry)
    pub child: &'c Child,

    /// The text that was taken as evidence for the child.
    /// Under fuzzy matching this is the window of the utterance, not the identifier.
    pub matched_text: String,

    /// Edit distance between identifier and matched text (0 for exact)
    pub distance: usize,

    /// Which strategy found the child
    pub strategy: MatchStrategy,
}

/// A fuzzy window that cleared its threshold, before the winner is picked
#[derive(Debug, Clone, Copy)]
struct FuzzyCandidate<'c> {
    child: &'c Child,
    start: usize,
    len: usize,
    distance: usize,
}

// ============================================================================
// ENTITY RESOLVER
// ============================================================================

pub struct EntityResolver<'a> {
    config: &'a ParserConfig,
}

impl<'a> EntityResolver<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        EntityResolver { config }
    }

    /// Resolve the child an already punctuation-normalized text refers to
    ///
    /// Exact containment wins outright; fuzzy matching only runs when no
    /// identifier appears verbatim.
    pub fn resolve<'c>(&self, normalized_text: &str, children: &'c [Child]) -> Option<EntityMatch<'c>> {
        if let Some(m) = self.exact_match(normalized_text, children) {
            tracing::debug!(child_id = %m.child.id, identifier = %m.matched_text, "exact identifier match");
            return Some(m);
        }

        let fuzzy = self.fuzzy_match(normalized_text, children);
        match &fuzzy {
            Some(m) => tracing::debug!(
                child_id = %m.child.id,
                window = %m.matched_text,
                distance = m.distance,
                "fuzzy identifier match"
            ),
            None => tracing::debug!("no identifier within threshold"),
        }
        fuzzy
    }

    /// Strategy 1: Exact Match
    /// Children in registry order, identifiers in [name, ...aliases] order, first hit wins
    fn exact_match<'c>(&self, normalized_text: &str, children: &'c [Child]) -> Option<EntityMatch<'c>> {
        children.iter().find_map(|child| {
            child
                .identifiers()
                .find(|identifier| normalized_text.contains(*identifier))
                .map(|identifier| EntityMatch {
                    child,
                    matched_text: identifier.to_string(),
                    distance: 0,
                    strategy: MatchStrategy::ExactMatch,
                })
        })
    }

    /// Strategy 2: Fuzzy Match
    /// Lowest distance over every child, identifier, offset and window size.
    /// Ties keep the candidate seen first.
    fn fuzzy_match<'c>(&self, normalized_text: &str, children: &'c [Child]) -> Option<EntityMatch<'c>> {
        let text: Vec<char> = normalized_text.chars().collect();

        let best = children
            .iter()
            .flat_map(|child| child.identifiers().map(move |identifier| (child, identifier)))
            .flat_map(|(child, identifier)| self.window_candidates(&text, child, identifier))
            .fold(None, |best: Option<FuzzyCandidate<'c>>, candidate| match best {
                Some(current) if current.distance <= candidate.distance => Some(current),
                _ => Some(candidate),
            })?;

        Some(EntityMatch {
            child: best.child,
            matched_text: text[best.start..best.start + best.len].iter().collect(),
            distance: best.distance,
            strategy: MatchStrategy::FuzzyMatch,
        })
    }

    /// Every window of `text` within threshold of `identifier`, in evaluation order
    ///
    /// At each offset the windows are tried at the identifier's length, one
    /// shorter, then one longer. Empty windows and windows past the end are skipped.
    fn window_candidates<'c>(&self, text: &[char], child: &'c Child, identifier: &str) -> Vec<FuzzyCandidate<'c>> {
        let id_chars: Vec<char> = identifier.chars().collect();
        let id_len = id_chars.len();
        let threshold = self.config.fuzzy_threshold(id_len);

        let mut candidates = Vec::new();
        for start in 0..text.len() {
            let window_lens = [Some(id_len), id_len.checked_sub(1), Some(id_len + 1)];

            for len in window_lens.into_iter().flatten() {
                if len == 0 || start + len > text.len() {
                    continue;
                }

                let distance = levenshtein_chars(&id_chars, &text[start..start + len]);
                if distance <= threshold {
                    candidates.push(FuzzyCandidate { child, start, len, distance });
                }
            }
        }

        candidates
    }
}

// ============================================================================
// TESTS
// ============================================================================
