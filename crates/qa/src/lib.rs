//! Question answering over a private document corpus
//!
//! Sequences hybrid retrieval, context assembly, grounded answer
//! generation, and an independent answer-quality judgment into one
//! request/response cycle:
//!
//! ```text
//! question -> retrieve (lexical + semantic, fused) -> context + citations
//!          -> generate (grounded) -> judge (fail-closed) -> QaResult
//! ```
//!
//! Infrastructure errors surface as `Err`; a judge verdict of "evasive"
//! is a normal `Ok` result carrying `success = false`.

pub mod context;
pub mod generator;
pub mod judge;
pub mod pipeline;
pub mod service;

pub use context::{build_citations, build_context, source_title};
pub use generator::AnswerGenerator;
pub use judge::{AnswerJudge, JudgeVerdict};
pub use pipeline::{PipelineConfig, QaPipeline};
pub use service::QaService;
