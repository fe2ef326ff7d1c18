//! Grounded answer generation
//!
//! One chat call with a fixed grounding instruction and a low sampling
//! temperature. The generator never judges its own output; that is the
//! judge's job, on a separate call with a separate objective.

use std::sync::Arc;

use docqa_core::{ChatModel, Result};

/// System instruction restricting the model to the supplied context
pub const GROUNDING_INSTRUCTION: &str = "You answer questions using only evidence found in the \
supplied context. Be concise and accurate. If the context does not contain the answer, say that \
you do not know. Never put source or citation markers in the answer body.";

/// Answer generator
pub struct AnswerGenerator {
    chat: Arc<dyn ChatModel>,
    temperature: f32,
}

impl AnswerGenerator {
    pub fn new(chat: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { chat, temperature }
    }

    /// Generate an answer constrained to the assembled context
    ///
    /// An empty context is passed through unchanged; the grounding
    /// instruction then steers the model toward an "I don't know"
    /// answer, which the judge fails downstream.
    pub async fn generate(&self, question: &str, context: &str) -> Result<String> {
        let user = format!("Question:\n{}\n\nContext:\n{}\n", question, context);

        let answer = self
            .chat
            .complete(GROUNDING_INSTRUCTION, &user, self.temperature)
            .await?;

        tracing::debug!(
            model = self.chat.model_name(),
            answer_chars = answer.len(),
            "answer generated"
        );

        Ok(answer)
    }
}
