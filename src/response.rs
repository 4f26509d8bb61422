// 📦 Parse Response - JSON envelope for the CLI and the HTTP API

use crate::parser::{FailureKind, ParseFailure, PointCommand};
use crate::resolver::MatchStrategy;
use serde::{Deserialize, Serialize};

/// Tagged union the outer surfaces hand to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ParseResponse {
    Success {
        entity_id: String,
        canonical_name: String,
        points_delta: i64,
        reason: String,
        matched_text: String,
        match_strategy: MatchStrategy,
        original_text: String,
    },
    Failure {
        kind: FailureKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        canonical_name: Option<String>,
        /// Prompt for the caregiver
        message: String,
    },
}

impl ParseResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, ParseResponse::Success { .. })
    }
}

impl From<PointCommand> for ParseResponse {
    fn from(cmd: PointCommand) -> Self {
        ParseResponse::Success {
            entity_id: cmd.child_id,
            canonical_name: cmd.canonical_name,
            points_delta: cmd.points_delta,
            reason: cmd.reason,
            matched_text: cmd.matched_text,
            match_strategy: cmd.match_strategy,
            original_text: cmd.original_text,
        }
    }
}

impl From<ParseFailure> for ParseResponse {
    fn from(failure: ParseFailure) -> Self {
        let message = failure.message();
        ParseResponse::Failure {
            kind: failure.kind,
            canonical_name: failure.canonical_name,
            message,
        }
    }
}

impl From<Result<PointCommand, ParseFailure>> for ParseResponse {
    fn from(result: Result<PointCommand, ParseFailure>) -> Self {
        match result {
            Ok(cmd) => cmd.into(),
            Err(failure) => failure.into(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
