//! Retrieval data model
//!
//! A `Passage` is the unit of text returned by the lexical and semantic
//! adapters. Identity is the `id` field: the same id from both adapters
//! refers to the same stored chunk and is merged during fusion, never
//! duplicated.

use serde::{Deserialize, Serialize};

/// A retrieved unit of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    /// Unique identifier of the stored chunk
    pub id: String,
    /// Body text
    pub content: String,
    /// Originating document (usually a file path)
    pub source: Option<String>,
    /// Page number within the source document
    pub page: Option<u32>,
    /// BM25 relevance score; 0.0 when absent from lexical results
    #[serde(default)]
    pub lexical_score: f32,
    /// Vector similarity score; 0.0 when absent from semantic results
    #[serde(default)]
    pub semantic_score: f32,
}

impl Passage {
    /// Create a passage with no scores attached
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            source: None,
            page: None,
            lexical_score: 0.0,
            semantic_score: 0.0,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// A deduplicated reference derived from a passage
///
/// Uniqueness key is `(title, page)`; the citation builder drops later
/// duplicates and preserves first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    /// Display title: source basename for path-like sources, the source
    /// verbatim otherwise, `"unknown"` when absent
    pub title: String,
    /// Page number, if the source chunk carried one
    pub page: Option<u32>,
}
