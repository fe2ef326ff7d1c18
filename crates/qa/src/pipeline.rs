//! Pipeline orchestrator
//!
//! One request/response cycle: retrieve -> assemble -> generate ->
//! judge -> shape the payload. Stages are explicit and sequential; each
//! is independently testable with stub capabilities.

use std::sync::Arc;

use docqa_core::{
    ChatModel, ChatTurn, PassageRetriever, QaErrorResponse, QaResult, Result,
};
use docqa_config::constants::{models, retrieval};
use docqa_config::Settings;

use crate::context::{build_citations, build_context};
use crate::generator::AnswerGenerator;
use crate::judge::AnswerJudge;

/// Pipeline tuning
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fused passages fed to the context assembler
    pub top_k: usize,
    /// Sampling temperature for answer generation
    pub generation_temperature: f32,
    /// Sampling temperature for the judge call
    pub judge_temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_k: retrieval::DEFAULT_TOP_K,
            generation_temperature: models::GENERATION_TEMPERATURE,
            judge_temperature: models::JUDGE_TEMPERATURE,
        }
    }
}

impl From<&Settings> for PipelineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            top_k: settings.retrieval.top_k,
            generation_temperature: settings.models.generation_temperature,
            judge_temperature: settings.models.judge_temperature,
        }
    }
}

/// The QA pipeline
///
/// Holds long-lived capability handles; everything per-request is
/// constructed fresh inside `answer` and dropped with the response.
pub struct QaPipeline {
    retriever: Arc<dyn PassageRetriever>,
    generator: AnswerGenerator,
    judge: AnswerJudge,
    top_k: usize,
}

impl QaPipeline {
    pub fn new(
        retriever: Arc<dyn PassageRetriever>,
        chat: Arc<dyn ChatModel>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever,
            generator: AnswerGenerator::new(Arc::clone(&chat), config.generation_temperature),
            judge: AnswerJudge::new(chat, config.judge_temperature),
            top_k: config.top_k,
        }
    }

    /// Answer a question
    ///
    /// Infrastructure errors (retrieval, model calls) return `Err`. A
    /// judge verdict of failure is an `Ok` result with
    /// `success = false` - a quality outcome, not an error.
    pub async fn answer(&self, question: &str) -> Result<QaResult> {
        let passages = self.retriever.retrieve(question, self.top_k).await?;

        let context = build_context(&passages);
        let citations = build_citations(&passages);

        let answer = self.generator.generate(question, &context).await?;
        let verdict = self.judge.judge(question, &answer).await?;

        tracing::info!(
            success = verdict.success,
            passages = passages.len(),
            citations = citations.len(),
            "question answered"
        );

        Ok(QaResult {
            success: verdict.success,
            messages: vec![ChatTurn::human(question), ChatTurn::assistant(answer)],
            citations,
        })
    }

    /// Answer a question, shaping infrastructure errors into the
    /// transport-level failure payload
    pub async fn answer_report(&self, question: &str) -> std::result::Result<QaResult, QaErrorResponse> {
        self.answer(question).await.map_err(|err| {
            tracing::error!(error = %err, "pipeline failed");
            QaErrorResponse::new(question, err.to_string())
        })
    }
}
