//! Context assembly and citation building
//!
//! Pure functions of the fused ranking: deterministic, order-preserving,
//! no model or index access.

use std::collections::HashSet;
use std::path::Path;

use docqa_core::{Citation, Passage};

/// Display title for a passage source
///
/// Path-like sources reduce to their final component; other sources are
/// shown verbatim; a missing source becomes `"unknown"`.
pub fn source_title(source: Option<&str>) -> String {
    match source {
        None => "unknown".to_string(),
        Some(s) => Path::new(s)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| s.to_string()),
    }
}

/// Render fused passages into one prompt-ready context string
///
/// Each block is a header `[i] (title[, p.page])` followed by the
/// trimmed body; blocks are separated by a blank line. An empty body
/// yields an empty block, not an error.
pub fn build_context(passages: &[Passage]) -> String {
    let blocks: Vec<String> = passages
        .iter()
        .enumerate()
        .map(|(i, passage)| {
            let title = source_title(passage.source.as_deref());
            let header = match passage.page {
                Some(page) => format!("[{}] ({}, p.{})", i + 1, title, page),
                None => format!("[{}] ({})", i + 1, title),
            };
            format!("{}\n{}", header, passage.content.trim())
        })
        .collect();

    blocks.join("\n\n")
}

/// Deduplicated citations in fused-ranking order
///
/// Uniqueness key is `(title, page)`; later duplicates are dropped.
pub fn build_citations(passages: &[Passage]) -> Vec<Citation> {
    let mut seen: HashSet<(String, Option<u32>)> = HashSet::new();
    let mut citations = Vec::new();

    for passage in passages {
        let title = source_title(passage.source.as_deref());
        let key = (title.clone(), passage.page);
        if seen.insert(key) {
            citations.push(Citation {
                title,
                page: passage.page,
            });
        }
    }

    citations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_resolution() {
        assert_eq!(
            source_title(Some("/docs/policy_A.pdf")),
            "policy_A.pdf"
        );
        assert_eq!(source_title(Some("terms.md")), "terms.md");
        assert_eq!(source_title(Some("faq entry 12")), "faq entry 12");
        assert_eq!(source_title(None), "unknown");
    }

    #[test]
    fn test_context_format() {
        let passages = vec![
            Passage::new("1", "  First body.  ")
                .with_source("/docs/policy_A.pdf")
                .with_page(12),
            Passage::new("2", "Second body."),
        ];

        let context = build_context(&passages);
        assert_eq!(
            context,
            "[1] (policy_A.pdf, p.12)\nFirst body.\n\n[2] (unknown)\nSecond body."
        );
    }

    #[test]
    fn test_empty_body_renders_empty_block() {
        let passages = vec![Passage::new("1", "   ").with_source("a.txt")];
        assert_eq!(build_context(&passages), "[1] (a.txt)\n");
    }

    #[test]
    fn test_empty_ranking_yields_empty_context() {
        assert_eq!(build_context(&[]), "");
        assert!(build_citations(&[]).is_empty());
    }

    #[test]
    fn test_citation_dedup_preserves_first_occurrence() {
        let passages = vec![
            Passage::new("1", "a").with_source("/x/report.pdf").with_page(3),
            Passage::new("2", "b").with_source("/y/other.pdf").with_page(1),
            // same (title, page) as the first entry, different directory
            Passage::new("3", "c").with_source("/z/report.pdf").with_page(3),
            // same title, different page: kept
            Passage::new("4", "d").with_source("/x/report.pdf").with_page(4),
        ];

        let citations = build_citations(&passages);
        assert_eq!(citations.len(), 3);
        assert_eq!(citations[0].title, "report.pdf");
        assert_eq!(citations[0].page, Some(3));
        assert_eq!(citations[1].title, "other.pdf");
        assert_eq!(citations[2].page, Some(4));
    }

    #[test]
    fn test_citation_page_distinguishes_missing_page() {
        let passages = vec![
            Passage::new("1", "a").with_source("doc.pdf").with_page(1),
            Passage::new("2", "b").with_source("doc.pdf"),
        ];
        assert_eq!(build_citations(&passages).len(), 2);
    }
}
