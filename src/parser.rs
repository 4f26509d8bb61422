// 🗣️ Command Parser - utterance + children → point command
// Pipeline: Entity Resolver → Action Extractor → Reason Synthesizer
//
// Pure and stateless: no I/O, nothing retained between calls, inputs never mutated.

use crate::action::extract_action;
use crate::config::ParserConfig;
use crate::entities::Child;
use crate::reason::{synthesize_reason, ConsumedSpans};
use crate::resolver::{EntityResolver, MatchStrategy};
use crate::text::{char_slice, normalize_punctuation};
use serde::{Deserialize, Serialize};

// ============================================================================
// CORE TYPES
// ============================================================================

/// PointCommand - a fully parsed point adjustment
///
/// Only built when a child AND a nonzero amount were found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCommand {
    pub child_id: String,
    pub canonical_name: String,

    /// Signed, never zero
    pub points_delta: i64,

    /// Never empty
    pub reason: String,

    /// Text taken as evidence for the child (diagnostic)
    pub matched_text: String,

    /// How the child was recognized (diagnostic)
    pub match_strategy: MatchStrategy,

    /// The utterance exactly as received
    pub original_text: String,
}

/// Why an utterance did not produce a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No identifier found, exact or within the fuzzy threshold
    #[error("no registered child recognized in utterance")]
    NameNotFound,

    /// Child found, but no keyword + amount (or the amount was zero)
    #[error("no point amount recognized in utterance")]
    NoAmountSpecified,
}

/// ParseFailure - a value, never a panic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{kind}")]
pub struct ParseFailure {
    pub kind: FailureKind,

    /// Set when the child was resolved but a later stage failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
}

impl ParseFailure {
    pub fn name_not_found() -> Self {
        ParseFailure {
            kind: FailureKind::NameNotFound,
            canonical_name: None,
        }
    }

    pub fn no_amount(canonical_name: impl Into<String>) -> Self {
        ParseFailure {
            kind: FailureKind::NoAmountSpecified,
            canonical_name: Some(canonical_name.into()),
        }
    }

    /// Prompt for the caregiver, suitable for display or speech
    pub fn message(&self) -> String {
        match (&self.kind, &self.canonical_name) {
            (FailureKind::NameNotFound, _) => "未识别到名字（可以试试说\"给小萱...\"）".to_string(),
            (FailureKind::NoAmountSpecified, Some(name)) => format!("听到了{}，但未识别到分值变化", name),
            (FailureKind::NoAmountSpecified, None) => "未识别到分值变化".to_string(),
        }
    }
}

// ============================================================================
// COMMAND PARSER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CommandParser {
    config: ParserConfig,
}

impl CommandParser {
    /// Create parser with default thresholds and reasons
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        CommandParser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one utterance against an ordered list of children
    ///
    /// Children order is resolution priority. Empty utterances and empty
    /// registries end in `NameNotFound`.
    pub fn parse(&self, utterance: &str, children: &[Child]) -> Result<PointCommand, ParseFailure> {
        let normalized_text = normalize_punctuation(utterance);

        // 1. Who?
        let entity = EntityResolver::new(&self.config)
            .resolve(&normalized_text, children)
            .ok_or_else(ParseFailure::name_not_found)?;
        let child = entity.child;

        // 2. How many points, which direction?
        let action = extract_action(&normalized_text, &entity.matched_text)
            .ok_or_else(|| ParseFailure::no_amount(&child.name))?;
        let points_delta = action.points_delta();
        if points_delta == 0 {
            tracing::debug!(child_id = %child.id, "zero delta is not a command");
            return Err(ParseFailure::no_amount(&child.name));
        }

        // 3. Why?
        let action_span = char_slice(utterance, action.char_start, action.char_len);
        let spans = ConsumedSpans {
            canonical_name: &child.name,
            identifier_span: &entity.matched_text,
            action_span: &action_span,
            aliases: &child.aliases,
        };
        let reason = synthesize_reason(utterance, &spans, points_delta, &self.config);

        Ok(PointCommand {
            child_id: child.id.clone(),
            canonical_name: child.name.clone(),
            points_delta,
            reason,
            matched_text: entity.matched_text,
            match_strategy: entity.strategy,
            original_text: utterance.to_string(),
        })
    }
}

/// Parse with default configuration - the single entry point most callers need
pub fn parse_command(utterance: &str, children: &[Child]) -> Result<PointCommand, ParseFailure> {
    CommandParser::new().parse(utterance, children)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn children() -> Vec<Child> {
        vec![
            Child::with_id("1", "萱萱").with_aliases(["小萱", "宣宣"]),
            Child::with_id("2", "闹闹").with_aliases(["小闹"]),
        ]
    }

    // ========================================================================
    // END-TO-END SCENARIOS
    // ========================================================================

    #[test]
    fn test_award_with_because_reason() {
        let cmd = parse_command("给萱萱加100分因为她学会了跳绳", &children()).unwrap();

        assert_eq!(cmd.child_id, "1");
        assert_eq!(cmd.canonical_name, "萱萱");
        assert_eq!(cmd.points_delta, 100);
        assert_eq!(cmd.reason, "她学会了跳绳");
        assert_eq!(cmd.matched_text, "萱萱");
        assert_eq!(cmd.match_strategy, MatchStrategy::ExactMatch);
        assert_eq!(cmd.original_text, "给萱萱加100分因为她学会了跳绳");
    }

    #[test]
    fn test_deduct_with_trailing_reason() {
        let cmd = parse_command("扣闹闹50分吃饭不好好", &children()).unwrap();

        assert_eq!(cmd.child_id, "2");
        assert_eq!(cmd.points_delta, -50);
        assert_eq!(cmd.reason, "吃饭不好好");
    }

    #[test]
    fn test_alias_with_default_reason() {
        let cmd = parse_command("给小萱加10分", &children()).unwrap();

        assert_eq!(cmd.child_id, "1");
        assert_eq!(cmd.canonical_name, "萱萱");
        assert_eq!(cmd.points_delta, 10);
        assert_eq!(cmd.reason, "表现不错");
        assert_eq!(cmd.matched_text, "小萱");
    }

    #[test]
    fn test_unknown_name() {
        let err = parse_command("给圈圈加10分", &children()).unwrap_err();

        assert_eq!(err.kind, FailureKind::NameNotFound);
        assert_eq!(err.canonical_name, None);
    }

    #[test]
    fn test_name_without_amount() {
        let err = parse_command("萱萱在唱歌", &children()).unwrap_err();

        assert_eq!(err.kind, FailureKind::NoAmountSpecified);
        assert_eq!(err.canonical_name, Some("萱萱".to_string()));
    }

    // ========================================================================
    // EDGE CASES
    // ========================================================================

    #[test]
    fn test_negative_default_reason() {
        let cmd = parse_command("闹闹扣5分", &children()).unwrap();

        assert_eq!(cmd.points_delta, -5);
        assert_eq!(cmd.reason, "需要改进");
    }

    #[test]
    fn test_zero_amount_is_no_amount() {
        let err = parse_command("给萱萱加0分", &children()).unwrap_err();

        assert_eq!(err.kind, FailureKind::NoAmountSpecified);
        assert_eq!(err.canonical_name, Some("萱萱".to_string()));
    }

    #[test]
    fn test_empty_inputs_are_name_not_found() {
        assert_eq!(parse_command("", &children()).unwrap_err().kind, FailureKind::NameNotFound);
        assert_eq!(parse_command("给萱萱加10分", &[]).unwrap_err().kind, FailureKind::NameNotFound);
        assert_eq!(parse_command("？！。，", &children()).unwrap_err().kind, FailureKind::NameNotFound);
    }

    #[test]
    fn test_punctuation_between_keyword_and_amount() {
        let cmd = parse_command("萱萱加，20分！今天自己穿衣服。", &children()).unwrap();

        assert_eq!(cmd.points_delta, 20);
        assert_eq!(cmd.reason, "今天自己穿衣服");
    }

    #[test]
    fn test_fuzzy_name_from_transcription_noise() {
        let cmd = parse_command("萱圈加10分因为按时睡觉", &children()).unwrap();

        assert_eq!(cmd.child_id, "1");
        assert_eq!(cmd.match_strategy, MatchStrategy::FuzzyMatch);
        assert_eq!(cmd.matched_text, "萱圈");
        assert_eq!(cmd.reason, "按时睡觉");
    }

    #[test]
    fn test_give_keyword_directly_before_amount() {
        let cmd = parse_command("给闹闹20分，因为收拾了玩具", &children()).unwrap();

        assert_eq!(cmd.child_id, "2");
        assert_eq!(cmd.points_delta, 20);
        assert_eq!(cmd.reason, "收拾了玩具");
    }

    #[test]
    fn test_english_keywords() {
        let children = vec![Child::with_id("t", "Tom")];
        let cmd = parse_command("Tom minus 3 for shouting", &children).unwrap();

        assert_eq!(cmd.points_delta, -3);
        assert_eq!(cmd.reason, "for shouting");
    }

    #[test]
    fn test_custom_config_changes_threshold() {
        let parser = CommandParser::with_config(ParserConfig {
            short_identifier_threshold: 2,
            ..ParserConfig::default()
        });

        let cmd = parser.parse("给圈圈加10分", &children()).unwrap();
        assert_eq!(cmd.child_id, "1");
        assert_eq!(parser.config().short_identifier_threshold, 2);
    }

    #[test]
    fn test_blank_configured_reason_never_empty() {
        let parser = CommandParser::with_config(ParserConfig {
            positive_default_reason: String::new(),
            ..ParserConfig::default()
        });

        let cmd = parser.parse("给萱萱加10分", &children()).unwrap();
        assert_eq!(cmd.reason, "表现不错");
    }

    #[test]
    fn test_unknown_folded_keyword_does_not_hide_later_action() {
        let cmd = parse_command("萱萱pluſ5分 加10分", &children()).unwrap();

        assert_eq!(cmd.child_id, "1");
        assert_eq!(cmd.points_delta, 10);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(ParseFailure::name_not_found().message(), "未识别到名字（可以试试说\"给小萱...\"）");
        assert_eq!(ParseFailure::no_amount("萱萱").message(), "听到了萱萱，但未识别到分值变化");
        assert_eq!(
            ParseFailure::no_amount("萱萱").to_string(),
            "no point amount recognized in utterance"
        );
    }

    #[test]
    fn test_failure_serializes_snake_case() {
        let json = serde_json::to_value(ParseFailure::no_amount("闹闹")).unwrap();

        assert_eq!(json["kind"], "no_amount_specified");
        assert_eq!(json["canonical_name"], "闹闹");

        let json = serde_json::to_value(ParseFailure::name_not_found()).unwrap();
        assert!(json.get("canonical_name").is_none());
    }

    #[test]
    fn test_inputs_not_mutated() {
        let children = children();
        let before = children.clone();

        let _ = parse_command("给萱萱加100分", &children);
        assert_eq!(children, before);
    }

    // ========================================================================
    // PROPERTIES
    // ========================================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_is_deterministic(utterance in "\\PC{0,24}") {
                let children = children();
                let first = parse_command(&utterance, &children);
                let second = parse_command(&utterance, &children);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn subtract_keywords_yield_negative_delta(
                keyword in prop::sample::select(vec!["扣", "减", "罚", "minus"]),
                amount in 1i64..100_000,
            ) {
                let utterance = format!("闹闹{}{}分", keyword, amount);
                let cmd = parse_command(&utterance, &children()).unwrap();
                prop_assert_eq!(cmd.points_delta, -amount);
            }

            #[test]
            fn add_keywords_yield_positive_delta(
                keyword in prop::sample::select(vec!["加", "奖励", "赠送", "plus"]),
                amount in 1i64..100_000,
            ) {
                let utterance = format!("萱萱{}{}分", keyword, amount);
                let cmd = parse_command(&utterance, &children()).unwrap();
                prop_assert_eq!(cmd.points_delta, amount);
            }

            #[test]
            fn successful_reason_never_empty(
                reason in "[a-z一-龥]{0,8}",
                amount in 1i64..1000,
            ) {
                let utterance = format!("萱萱加{}分{}", amount, reason);
                let cmd = parse_command(&utterance, &children()).unwrap();
                prop_assert!(!cmd.reason.is_empty());
            }
        }

        #[test]
        fn two_char_threshold_boundary() {
            let children = vec![Child::with_id("1", "萱萱")];

            // One edit from some window: matches
            let cmd = parse_command("萱x加10分", &children).unwrap();
            assert_eq!(cmd.child_id, "1");

            // Every window at least two edits away: no match
            let err = parse_command("xy加10分", &children).unwrap_err();
            assert_eq!(err.kind, FailureKind::NameNotFound);
        }
    }
}
