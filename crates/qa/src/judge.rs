//! Answer-quality judgment
//!
//! A second chat call classifies the question/answer pair as successful
//! or evasive. The verdict is requested as a JSON object with a single
//! boolean field; anything unparsable resolves to failure (fail-closed).
//! An empty answer short-circuits to failure without a model call.

use std::sync::Arc;

use serde::Deserialize;

use docqa_core::{ChatModel, Result};

/// System instruction for the judge call
pub const JUDGE_INSTRUCTION: &str = "You are an answer-quality judge. Given a question and an \
answer, decide whether the answer succeeds. Any self-referential hedge (for example \"I don't \
know\", \"no information\", \"the context does not say\") or a non-responsive, off-topic answer \
is a failure. Output only a JSON object with a single boolean field named \"success\".";

/// Parsed verdict from the judge model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JudgeVerdict {
    pub success: bool,
}

impl JudgeVerdict {
    pub const FAILURE: Self = Self { success: false };
}

/// Answer judge
pub struct AnswerJudge {
    chat: Arc<dyn ChatModel>,
    temperature: f32,
}

impl AnswerJudge {
    pub fn new(chat: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { chat, temperature }
    }

    /// Judge a question/answer pair
    ///
    /// Model transport errors propagate; a malformed verdict does not.
    pub async fn judge(&self, question: &str, answer: &str) -> Result<JudgeVerdict> {
        if answer.trim().is_empty() {
            tracing::debug!("empty answer, skipping judge call");
            return Ok(JudgeVerdict::FAILURE);
        }

        let user = format!(
            "Question:\n{}\n\nAnswer:\n{}\n\nOutput JSON only:\n{{\n  \"success\": <true|false>\n}}\n",
            question, answer
        );

        let raw = self
            .chat
            .complete(JUDGE_INSTRUCTION, &user, self.temperature)
            .await?;

        Ok(parse_verdict(&raw))
    }
}

/// Parse the judge's structured output, fail-closed
///
/// Accepts a bare JSON object or one wrapped in a markdown code fence.
/// Malformed syntax, a missing field, or a non-boolean value all
/// resolve to failure.
fn parse_verdict(raw: &str) -> JudgeVerdict {
    #[derive(Deserialize)]
    struct Wire {
        success: bool,
    }

    let cleaned = strip_code_fence(raw.trim());

    match serde_json::from_str::<Wire>(cleaned) {
        Ok(wire) => JudgeVerdict {
            success: wire.success,
        },
        Err(err) => {
            tracing::warn!(error = %err, "unparsable judge verdict, treating as failure");
            JudgeVerdict::FAILURE
        }
    }
}

/// Unwrap a ```json ... ``` fence if present
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(stripped) = rest.strip_suffix("```") else {
        return text;
    };
    // drop the language tag on the opening fence line
    match stripped.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => stripped.trim(),
    }
}
