//! Integration tests for the QA pipeline (retrieve -> generate -> judge)
//!
//! All capabilities are stubbed so every stage boundary can be asserted:
//! call counts, error propagation, and the separation of quality
//! failures from infrastructure failures.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docqa_core::{ChatModel, Error, Passage, PassageRetriever, Result, TurnRole};
use docqa_qa::{PipelineConfig, QaPipeline};

/// Retriever stub returning a fixed fused ranking
struct FixedRetriever {
    passages: Vec<Passage>,
}

#[async_trait]
impl PassageRetriever for FixedRetriever {
    async fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<Passage>> {
        Ok(self.passages.iter().take(top_k).cloned().collect())
    }
}

/// Retriever stub that always fails
struct BrokenRetriever;

#[async_trait]
impl PassageRetriever for BrokenRetriever {
    async fn retrieve(&self, _query: &str, _top_k: usize) -> Result<Vec<Passage>> {
        Err(Error::Retrieval("index unreachable".to_string()))
    }
}

/// Chat stub replaying scripted responses in call order
struct ScriptedChat {
    responses: Mutex<Vec<String>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedChat {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().rev().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, system: &str, user: &str, _temperature: f32) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), user.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| Error::Llm("no scripted response left".to_string()))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn corpus() -> Vec<Passage> {
    vec![
        Passage::new("c1", "The family rider extends coverage to siblings.")
            .with_source("/docs/policy_A.pdf")
            .with_page(12),
        Passage::new("c2", "Premiums depend on declared driver history.")
            .with_source("/docs/policy_B.pdf")
            .with_page(3),
        // duplicate (title, page) of c1, must not yield a second citation
        Passage::new("c3", "Sibling coverage requires prior registration.")
            .with_source("/archive/policy_A.pdf")
            .with_page(12),
    ]
}

/// Happy path: grounded answer, positive verdict, deduplicated citations
#[tokio::test]
async fn test_answer_success() {
    let retriever = Arc::new(FixedRetriever { passages: corpus() });
    let chat = ScriptedChat::new(&[
        "Siblings are covered once registered.",
        r#"{"success": true}"#,
    ]);

    let pipeline = QaPipeline::new(retriever, chat.clone(), PipelineConfig::default());
    let result = pipeline.answer("Are siblings covered?").await.unwrap();

    assert!(result.success);
    assert_eq!(result.messages.len(), 2);
    assert_eq!(result.messages[0].role, TurnRole::Human);
    assert_eq!(result.messages[0].content, "Are siblings covered?");
    assert_eq!(result.messages[1].role, TurnRole::Assistant);
    assert_eq!(result.messages[1].content, "Siblings are covered once registered.");

    // c1 and c3 share (policy_A.pdf, 12)
    assert_eq!(result.citations.len(), 2);
    assert_eq!(result.citations[0].title, "policy_A.pdf");
    assert_eq!(result.citations[0].page, Some(12));
    assert_eq!(result.citations[1].title, "policy_B.pdf");

    // one generation call, one judge call
    assert_eq!(chat.call_count(), 2);
}

/// The generator sees the assembled context inside its user prompt
#[tokio::test]
async fn test_context_reaches_generator() {
    let retriever = Arc::new(FixedRetriever { passages: corpus() });
    let chat = ScriptedChat::new(&["answer", r#"{"success": true}"#]);

    let pipeline = QaPipeline::new(retriever, chat.clone(), PipelineConfig::default());
    pipeline.answer("q").await.unwrap();

    let prompts = chat.prompts.lock().unwrap();
    let (_, generator_user) = &prompts[0];
    assert!(generator_user.contains("[1] (policy_A.pdf, p.12)"));
    assert!(generator_user.contains("The family rider extends coverage to siblings."));

    let (_, judge_user) = &prompts[1];
    assert!(judge_user.contains("Answer:\nanswer"));
}

/// No retrieval hits: the generator still runs with an empty context,
/// and an "I don't know" answer is a quality failure, not an error
#[tokio::test]
async fn test_empty_context_yields_quality_failure() {
    let retriever = Arc::new(FixedRetriever { passages: vec![] });
    let chat = ScriptedChat::new(&[
        "I don't know based on the provided context.",
        r#"{"success": false}"#,
    ]);

    let pipeline = QaPipeline::new(retriever, chat.clone(), PipelineConfig::default());
    let result = pipeline.answer("Anything?").await.unwrap();

    assert!(!result.success);
    assert!(result.citations.is_empty());
    assert_eq!(chat.call_count(), 2);

    let prompts = chat.prompts.lock().unwrap();
    let (_, generator_user) = &prompts[0];
    assert!(generator_user.contains("Context:\n\n"));
}

/// An empty completion fails without a second model call
#[tokio::test]
async fn test_empty_answer_skips_judge_call() {
    let retriever = Arc::new(FixedRetriever { passages: corpus() });
    let chat = ScriptedChat::new(&["   "]);

    let pipeline = QaPipeline::new(retriever, chat.clone(), PipelineConfig::default());
    let result = pipeline.answer("q").await.unwrap();

    assert!(!result.success);
    assert_eq!(chat.call_count(), 1);
}

/// A malformed judge verdict fails closed instead of erroring
#[tokio::test]
async fn test_unparsable_verdict_fails_closed() {
    let retriever = Arc::new(FixedRetriever { passages: corpus() });
    let chat = ScriptedChat::new(&["a fluent answer", "definitely yes!"]);

    let pipeline = QaPipeline::new(retriever, chat.clone(), PipelineConfig::default());
    let result = pipeline.answer("q").await.unwrap();

    assert!(!result.success);
    assert_eq!(result.messages[1].content, "a fluent answer");
}

/// Retrieval failure is a pipeline error, never a success=false result
#[tokio::test]
async fn test_retrieval_error_propagates() {
    let chat = ScriptedChat::new(&[]);
    let pipeline = QaPipeline::new(Arc::new(BrokenRetriever), chat.clone(), PipelineConfig::default());

    let err = pipeline.answer("q").await.unwrap_err();
    assert!(matches!(err, Error::Retrieval(_)));
    assert_eq!(chat.call_count(), 0);

    // the transport-facing shape echoes the question with empty citations
    let report = pipeline.answer_report("q").await.unwrap_err();
    assert!(!report.success);
    assert!(report.error.contains("index unreachable"));
    assert_eq!(report.messages.len(), 1);
    assert_eq!(report.messages[0].content, "q");
    assert!(report.citations.is_empty());
}

/// Generation failure is a pipeline error as well
#[tokio::test]
async fn test_generation_error_propagates() {
    let retriever = Arc::new(FixedRetriever { passages: corpus() });
    // no scripted responses: the first chat call errors
    let chat = ScriptedChat::new(&[]);

    let pipeline = QaPipeline::new(retriever, chat, PipelineConfig::default());
    let err = pipeline.answer("q").await.unwrap_err();
    assert!(matches!(err, Error::Llm(_)));
}
