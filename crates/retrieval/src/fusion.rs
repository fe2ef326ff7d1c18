//! Reciprocal Rank Fusion
//!
//! Merges the lexical and semantic candidate lists into one ranking.
//! Each list contributes `1/(k + rank + 1)` per item; contributions
//! accumulate additively keyed by passage id. The semantic record
//! supersedes the lexical record for a shared id (its payload fields
//! are authoritative) while the lexical score already seen is kept.
//!
//! Ties between equal fused scores resolve by accumulation order:
//! the lexical list is accumulated first, and the sort is stable, so a
//! first-seen passage keeps its position ahead of an equal later one.

use std::cmp::Ordering;
use std::collections::HashMap;

use docqa_core::Passage;
use docqa_config::constants::retrieval;

/// Fusion parameters
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// RRF damping constant
    pub rrf_k: f64,
    /// Number of fused passages to return
    pub top_k: usize,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            rrf_k: retrieval::RRF_K,
            top_k: retrieval::DEFAULT_TOP_K,
        }
    }
}

/// Fuse two ranked candidate lists
///
/// Both-empty input returns empty. When exactly one list is empty the
/// other is returned truncated to `top_k` with no score accumulation.
pub fn fuse(lexical: Vec<Passage>, semantic: Vec<Passage>, config: &FusionConfig) -> Vec<Passage> {
    if lexical.is_empty() && semantic.is_empty() {
        return Vec::new();
    }
    if semantic.is_empty() {
        return truncate(lexical, config.top_k);
    }
    if lexical.is_empty() {
        return truncate(semantic, config.top_k);
    }

    // Insertion-ordered entries back the stable tie-break
    let mut entries: Vec<(Passage, f64)> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for (rank, passage) in lexical.into_iter().enumerate() {
        let contribution = 1.0 / (config.rrf_k + rank as f64 + 1.0);
        match by_id.get(&passage.id) {
            Some(&i) => entries[i].1 += contribution,
            None => {
                by_id.insert(passage.id.clone(), entries.len());
                entries.push((passage, contribution));
            }
        }
    }

    for (rank, passage) in semantic.into_iter().enumerate() {
        let contribution = 1.0 / (config.rrf_k + rank as f64 + 1.0);
        match by_id.get(&passage.id) {
            Some(&i) => {
                // Semantic payload wins; keep the lexical score it earned
                let lexical_score = entries[i].0.lexical_score;
                let mut merged = passage;
                merged.lexical_score = lexical_score;
                entries[i].0 = merged;
                entries[i].1 += contribution;
            }
            None => {
                by_id.insert(passage.id.clone(), entries.len());
                entries.push((passage, contribution));
            }
        }
    }

    // Stable descending sort: equal scores keep accumulation order
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    entries
        .into_iter()
        .take(config.top_k)
        .map(|(passage, _)| passage)
        .collect()
}

fn truncate(mut passages: Vec<Passage>, top_k: usize) -> Vec<Passage> {
    passages.truncate(top_k);
    passages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> Passage {
        Passage::new(id, format!("content of {}", id))
    }

    fn config(top_k: usize) -> FusionConfig {
        FusionConfig {
            rrf_k: 60.0,
            top_k,
        }
    }

    #[test]
    fn test_both_empty() {
        assert!(fuse(vec![], vec![], &config(5)).is_empty());
    }

    #[test]
    fn test_one_empty_passes_through_truncated() {
        let lexical = vec![p("a"), p("b"), p("c")];
        let fused = fuse(lexical, vec![], &config(2));
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].id, "a");
        assert_eq!(fused[1].id, "b");

        let semantic = vec![p("x"), p("y")];
        let fused = fuse(vec![], semantic, &config(5));
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].id, "x");
    }

    #[test]
    fn test_shared_id_scores_additively() {
        // "b" appears in both lists and must outrank either solo entry
        let lexical = vec![p("a"), p("b")];
        let semantic = vec![p("b"), p("c")];
        let fused = fuse(lexical, semantic, &config(3));

        assert_eq!(fused.len(), 3);
        assert_eq!(fused[0].id, "b");
    }

    #[test]
    fn test_semantic_record_supersedes_but_keeps_lexical_score() {
        let mut from_lexical = p("b").with_source("/stale/path.pdf");
        from_lexical.lexical_score = 7.5;

        let mut from_semantic = p("b").with_source("/fresh/path.pdf").with_page(2);
        from_semantic.semantic_score = 0.93;

        let fused = fuse(vec![from_lexical], vec![from_semantic], &config(1));
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].source.as_deref(), Some("/fresh/path.pdf"));
        assert_eq!(fused[0].page, Some(2));
        assert_eq!(fused[0].lexical_score, 7.5);
        assert_eq!(fused[0].semantic_score, 0.93);
    }

    #[test]
    fn test_missing_scores_default_to_zero() {
        let mut lexical_only = p("a");
        lexical_only.lexical_score = 3.0;
        let mut semantic_only = p("b");
        semantic_only.semantic_score = 0.8;

        let fused = fuse(vec![lexical_only], vec![semantic_only], &config(2));
        let a = fused.iter().find(|x| x.id == "a").unwrap();
        let b = fused.iter().find(|x| x.id == "b").unwrap();
        assert_eq!(a.semantic_score, 0.0);
        assert_eq!(b.lexical_score, 0.0);
    }

    #[test]
    fn test_tie_break_is_stable_by_accumulation_order() {
        // lexical [A,B,C], semantic [B,A,D], k=60:
        //   A = 1/61 + 1/62, B = 1/62 + 1/61  -> exact tie
        //   C = 1/63, D = 1/63                -> exact tie
        // A was accumulated before B, C before D; top_k=3 keeps D out.
        let lexical = vec![p("A"), p("B"), p("C")];
        let semantic = vec![p("B"), p("A"), p("D")];

        let fused = fuse(lexical, semantic, &config(3));
        let order: Vec<&str> = fused.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);

        // With room for all four, D trails C for the same reason
        let lexical = vec![p("A"), p("B"), p("C")];
        let semantic = vec![p("B"), p("A"), p("D")];
        let fused = fuse(lexical, semantic, &config(4));
        let order: Vec<&str> = fused.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_top_k_truncation() {
        let lexical = vec![p("a"), p("b"), p("c"), p("d")];
        let semantic = vec![p("c"), p("e")];
        let fused = fuse(lexical, semantic, &config(2));
        assert_eq!(fused.len(), 2);
        assert_eq!(fused[0].id, "c");
    }
}
