//! Response payloads for the QA surface
//!
//! `QaResult` is the normal response: the judge's verdict, the
//! conversation turns, and the citation list. `QaErrorResponse` is the
//! distinct failure shape for infrastructure errors. A quality failure
//! (judge says the answer is evasive) is a normal `QaResult` with
//! `success = false`, never an error response.

use serde::{Deserialize, Serialize};

use crate::passage::Citation;

/// Role tag for a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Assistant,
}

/// One conversation turn in the response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Successful pipeline response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResult {
    /// Judge verdict: false means the answer was evasive or off-topic
    pub success: bool,
    /// Question then answer, in order
    pub messages: Vec<ChatTurn>,
    /// Deduplicated citations in fused-ranking order
    pub citations: Vec<Citation>,
}

/// Failure shape for infrastructure errors
///
/// Echoes the question so callers can correlate; citations are always
/// empty because no trustworthy retrieval completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaErrorResponse {
    /// Always false
    pub success: bool,
    /// Human-readable error message
    pub error: String,
    /// The question turn, echoed back
    pub messages: Vec<ChatTurn>,
    /// Always empty
    pub citations: Vec<Citation>,
}

impl QaErrorResponse {
    pub fn new(question: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            messages: vec![ChatTurn::human(question)],
            citations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_serialization() {
        let result = QaResult {
            success: true,
            messages: vec![ChatTurn::human("q"), ChatTurn::assistant("a")],
            citations: vec![Citation {
                title: "policy.pdf".to_string(),
                page: Some(12),
            }],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["messages"][0]["role"], "human");
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["citations"][0]["title"], "policy.pdf");
        assert_eq!(json["citations"][0]["page"], 12);
    }

    #[test]
    fn test_error_response_shape() {
        let err = QaErrorResponse::new("what is covered?", "index unreachable");
        assert!(!err.success);
        assert_eq!(err.messages.len(), 1);
        assert_eq!(err.messages[0].role, TurnRole::Human);
        assert!(err.citations.is_empty());
    }
}
