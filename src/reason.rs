// 📝 Reason Synthesizer - whatever is left of the utterance becomes the reason
//
// "给萱萱加100分因为她学会了跳绳" → "她学会了跳绳"

use crate::config::ParserConfig;
use crate::text::{normalize_punctuation, remove_first};

/// "to": "给萱萱..." addresses the child, it is not part of the reason
pub const ADDRESS_PARTICLE: &str = "给";

/// "because": dropped once from the front of the reason
pub const LEADING_CONNECTIVE: &str = "因为";

/// Everything the earlier stages consumed from the utterance
#[derive(Debug, Clone, Copy)]
pub struct ConsumedSpans<'a> {
    /// Canonical name of the resolved child
    pub canonical_name: &'a str,

    /// Text that resolved the child (may differ from the name under fuzzy matching)
    pub identifier_span: &'a str,

    /// Keyword + amount + unit span from the action extractor
    pub action_span: &'a str,

    /// Aliases of the resolved child
    pub aliases: &'a [String],
}

/// Build the reason from the original utterance
///
/// The action span goes first: it can embed the identifier ("扣闹闹50分").
/// Each removal drops the first occurrence only.
pub fn synthesize_reason(
    utterance: &str,
    spans: &ConsumedSpans<'_>,
    points_delta: i64,
    config: &ParserConfig,
) -> String {
    let mut remainder = remove_first(utterance, spans.action_span);
    remainder = remove_identifier(&remainder, spans.canonical_name);
    remainder = remove_identifier(&remainder, spans.identifier_span);
    for alias in spans.aliases {
        remainder = remove_identifier(&remainder, alias);
    }

    let normalized = normalize_punctuation(&remainder);
    let reason = strip_connective(normalized.trim());
    if reason.is_empty() {
        tracing::debug!(points_delta, "no descriptive text left, using default reason");
        return config.default_reason(points_delta).to_string();
    }

    reason.to_string()
}

/// Remove an identifier, together with the "给" right before it when present
fn remove_identifier(text: &str, identifier: &str) -> String {
    if identifier.is_empty() {
        return text.to_string();
    }

    let addressed = format!("{}{}", ADDRESS_PARTICLE, identifier);
    if text.contains(&addressed) {
        remove_first(text, &addressed)
    } else {
        remove_first(text, identifier)
    }
}

fn strip_connective(reason: &str) -> &str {
    reason
        .strip_prefix(LEADING_CONNECTIVE)
        .map(str::trim)
        .unwrap_or(reason)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(utterance: &str, name: &str, span: &str, action: &str, aliases: &[String], delta: i64) -> String {
        let spans = ConsumedSpans {
            canonical_name: name,
            identifier_span: span,
            action_span: action,
            aliases,
        };
        synthesize_reason(utterance, &spans, delta, &ParserConfig::default())
    }

    fn aliases(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_reason_after_because() {
        let r = reason("给萱萱加100分因为她学会了跳绳", "萱萱", "萱萱", "加100分", &aliases(&["小萱"]), 100);
        assert_eq!(r, "她学会了跳绳");
    }

    #[test]
    fn test_reason_with_identifier_inside_action() {
        let r = reason("扣闹闹50分吃饭不好好", "闹闹", "闹闹", "扣闹闹50分", &aliases(&["小闹"]), -50);
        assert_eq!(r, "吃饭不好好");
    }

    #[test]
    fn test_default_positive_reason() {
        let r = reason("给小萱加10分", "萱萱", "小萱", "加10分", &aliases(&["小萱", "宣宣"]), 10);
        assert_eq!(r, "表现不错");
    }

    #[test]
    fn test_default_negative_reason() {
        let r = reason("闹闹，扣5分！", "闹闹", "闹闹", "扣5分", &[], -5);
        assert_eq!(r, "需要改进");
    }

    #[test]
    fn test_only_connective_left_falls_back() {
        let r = reason("给萱萱加10分因为", "萱萱", "萱萱", "加10分", &[], 10);
        assert_eq!(r, "表现不错");
    }

    #[test]
    fn test_punctuation_becomes_space_and_is_trimmed() {
        let r = reason("萱萱加10分，今天很乖，还帮忙做饭。", "萱萱", "萱萱", "加10分", &[], 10);
        assert_eq!(r, "今天很乖 还帮忙做饭");
    }

    #[test]
    fn test_fuzzy_span_removed() {
        // Speech-to-text heard "萱圈"; the window is removed, not just the name
        let r = reason("萱圈加10分因为按时睡觉", "萱萱", "萱圈", "加10分", &[], 10);
        assert_eq!(r, "按时睡觉");
    }

    #[test]
    fn test_give_inside_reason_kept() {
        // "给" not directly before an identifier belongs to the reason
        let r = reason("萱萱加10分因为给妹妹让玩具", "萱萱", "萱萱", "加10分", &[], 10);
        assert_eq!(r, "给妹妹让玩具");
    }

    #[test]
    fn test_custom_default_reasons() {
        let config = ParserConfig {
            negative_default_reason: "下次加油".to_string(),
            ..ParserConfig::default()
        };
        let spans = ConsumedSpans {
            canonical_name: "闹闹",
            identifier_span: "闹闹",
            action_span: "扣闹闹5分",
            aliases: &[],
        };

        assert_eq!(synthesize_reason("扣闹闹5分", &spans, -5, &config), "下次加油");
    }
}
