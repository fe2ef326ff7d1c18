//! Lexical search using Tantivy (BM25)
//!
//! Keyword adapter for hybrid retrieval. Queries are parsed against the
//! body field only; hits carry their BM25 score in `lexical_score`.

use parking_lot::RwLock;
use std::path::Path;
use tantivy::{
    collector::TopDocs,
    query::{BooleanQuery, Occur, Query, QueryParser, TermQuery},
    schema::{
        Field, IndexRecordOption, OwnedValue, Schema, TextFieldIndexing, TextOptions, STORED,
        STRING,
    },
    tokenizer::{Language, LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, TextAnalyzer},
    Index, IndexReader, IndexWriter, TantivyDocument, Term,
};

use docqa_core::Passage;

use crate::vector_store::SearchFilter;
use crate::RetrievalError;

/// Lexical index configuration
#[derive(Debug, Clone)]
pub struct LexicalConfig {
    /// Index path (RAM index if None)
    pub index_path: Option<String>,
    /// Enable English stemming
    pub stemming: bool,
}

impl Default for LexicalConfig {
    fn default() -> Self {
        Self {
            index_path: None,
            stemming: true,
        }
    }
}

/// BM25 index over document chunks
pub struct LexicalIndex {
    index: Index,
    reader: IndexReader,
    writer: RwLock<Option<IndexWriter>>,
    id_field: Field,
    body_field: Field,
    source_field: Field,
    page_field: Field,
}

impl LexicalIndex {
    /// Open or create the index
    pub fn new(config: LexicalConfig) -> Result<Self, RetrievalError> {
        let mut schema_builder = Schema::builder();

        let text_options = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer("body_analyzer")
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let id_field = schema_builder.add_text_field("id", STRING | STORED);
        let body_field = schema_builder.add_text_field("body", text_options);
        let source_field = schema_builder.add_text_field("source", STRING | STORED);
        let page_field = schema_builder.add_u64_field("page", STORED);

        let schema = schema_builder.build();

        let index = if let Some(ref path) = config.index_path {
            let dir = tantivy::directory::MmapDirectory::open(Path::new(path))
                .map_err(|e| RetrievalError::Index(e.to_string()))?;
            Index::open_or_create(dir, schema)
                .map_err(|e| RetrievalError::Index(e.to_string()))?
        } else {
            Index::create_in_ram(schema)
        };

        index
            .tokenizers()
            .register("body_analyzer", Self::build_tokenizer(&config));

        let reader = index
            .reader()
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        tracing::info!(
            on_disk = config.index_path.is_some(),
            stemming = config.stemming,
            "lexical index opened"
        );

        Ok(Self {
            index,
            reader,
            writer: RwLock::new(Some(writer)),
            id_field,
            body_field,
            source_field,
            page_field,
        })
    }

    fn build_tokenizer(config: &LexicalConfig) -> TextAnalyzer {
        let base = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(100))
            .filter(LowerCaser);

        if config.stemming {
            base.filter(Stemmer::new(Language::English)).build()
        } else {
            base.build()
        }
    }

    /// Index passages (used by ingestion tooling and tests)
    pub fn index_passages(&self, passages: &[Passage]) -> Result<(), RetrievalError> {
        let mut writer = self.writer.write();
        let writer = writer
            .as_mut()
            .ok_or_else(|| RetrievalError::Index("Writer not available".to_string()))?;

        for passage in passages {
            let mut doc = TantivyDocument::default();

            doc.add_text(self.id_field, &passage.id);
            doc.add_text(self.body_field, &passage.content);
            if let Some(ref source) = passage.source {
                doc.add_text(self.source_field, source);
            }
            if let Some(page) = passage.page {
                doc.add_u64(self.page_field, page as u64);
            }

            writer
                .add_document(doc)
                .map_err(|e| RetrievalError::Index(e.to_string()))?;
        }

        writer
            .commit()
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        self.reader
            .reload()
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        Ok(())
    }

    /// Search using BM25, restricted to the body field
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        filter: Option<&SearchFilter>,
    ) -> Result<Vec<Passage>, RetrievalError> {
        let searcher = self.reader.searcher();
        let query_parser = QueryParser::for_index(&self.index, vec![self.body_field]);

        let parsed = query_parser
            .parse_query(query)
            .map_err(|e| RetrievalError::Search(e.to_string()))?;

        let query: Box<dyn Query> = match filter.and_then(|f| f.source.as_deref()) {
            Some(source) => {
                let source_query = TermQuery::new(
                    Term::from_field_text(self.source_field, source),
                    IndexRecordOption::Basic,
                );
                Box::new(BooleanQuery::new(vec![
                    (Occur::Must, parsed),
                    (Occur::Must, Box::new(source_query)),
                ]))
            }
            None => parsed,
        };

        let top_docs = searcher
            .search(&query, &TopDocs::with_limit(limit))
            .map_err(|e| RetrievalError::Search(e.to_string()))?;

        let mut results = Vec::with_capacity(top_docs.len());

        for (score, doc_address) in top_docs {
            let doc: TantivyDocument = searcher
                .doc(doc_address)
                .map_err(|e| RetrievalError::Search(e.to_string()))?;

            let id = doc
                .get_first(self.id_field)
                .and_then(|v| match v {
                    OwnedValue::Str(s) => Some(s.as_str()),
                    _ => None,
                })
                .unwrap_or("")
                .to_string();

            let content = doc
                .get_first(self.body_field)
                .and_then(|v| match v {
                    OwnedValue::Str(s) => Some(s.as_str()),
                    _ => None,
                })
                .unwrap_or("")
                .to_string();

            let source = doc.get_first(self.source_field).and_then(|v| match v {
                OwnedValue::Str(s) => Some(s.clone()),
                _ => None,
            });

            let page = doc.get_first(self.page_field).and_then(|v| match v {
                OwnedValue::U64(n) => Some(*n as u32),
                _ => None,
            });

            results.push(Passage {
                id,
                content,
                source,
                page,
                lexical_score: score,
                semantic_score: 0.0,
            });
        }

        Ok(results)
    }

    /// Delete passages by id
    pub fn delete(&self, ids: &[String]) -> Result<(), RetrievalError> {
        let mut writer = self.writer.write();
        let writer = writer
            .as_mut()
            .ok_or_else(|| RetrievalError::Index("Writer not available".to_string()))?;

        for id in ids {
            writer.delete_term(Term::from_field_text(self.id_field, id));
        }

        writer
            .commit()
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        self.reader
            .reload()
            .map_err(|e| RetrievalError::Index(e.to_string()))?;

        Ok(())
    }

    /// Number of indexed passages
    pub fn doc_count(&self) -> u64 {
        self.reader.searcher().num_docs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_passages() -> Vec<Passage> {
        vec![
            Passage::new("1", "The family driver rider limits coverage to listed relatives")
                .with_source("/docs/policy_a.pdf")
                .with_page(4),
            Passage::new("2", "Premiums are calculated from vehicle value and driver history")
                .with_source("/docs/policy_b.pdf")
                .with_page(9),
        ]
    }

    #[test]
    fn test_create_empty() {
        let index = LexicalIndex::new(LexicalConfig::default()).unwrap();
        assert_eq!(index.doc_count(), 0);
    }

    #[test]
    fn test_index_and_search() {
        let index = LexicalIndex::new(LexicalConfig::default()).unwrap();
        index.index_passages(&seed_passages()).unwrap();
        assert_eq!(index.doc_count(), 2);

        let results = index.search("family coverage", 10, None).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "1");
        assert!(results[0].lexical_score > 0.0);
        assert_eq!(results[0].semantic_score, 0.0);
        assert_eq!(results[0].page, Some(4));
    }

    #[test]
    fn test_source_filter() {
        let index = LexicalIndex::new(LexicalConfig::default()).unwrap();
        index.index_passages(&seed_passages()).unwrap();

        let filter = SearchFilter::new().source("/docs/policy_b.pdf");
        let results = index.search("driver", 10, Some(&filter)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "2");
    }

    #[test]
    fn test_on_disk_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = LexicalConfig {
            index_path: Some(dir.path().to_string_lossy().to_string()),
            stemming: true,
        };
        let index = LexicalIndex::new(config).unwrap();
        index.index_passages(&seed_passages()).unwrap();
        assert_eq!(index.doc_count(), 2);
    }

    #[test]
    fn test_delete() {
        let index = LexicalIndex::new(LexicalConfig::default()).unwrap();
        index.index_passages(&seed_passages()).unwrap();

        index.delete(&["1".to_string()]).unwrap();
        assert_eq!(index.doc_count(), 1);
    }
}
