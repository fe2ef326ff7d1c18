//! Centralized constants for the QA pipeline
//!
//! Single source of truth for default values used across the codebase.
//! Settings sections default from these so a bare environment still
//! yields a working local configuration.

/// Retrieval and fusion defaults
pub mod retrieval {
    /// Final number of fused passages handed to the context assembler
    pub const DEFAULT_TOP_K: usize = 5;

    /// Standard RRF damping constant
    pub const RRF_K: f64 = 60.0;

    /// ANN candidate pool width (must stay >= the adapter limit)
    pub const CANDIDATE_POOL: usize = 800;

    /// Each adapter over-fetches `top_k * OVERFETCH_FACTOR` candidates
    /// so fusion has enough material to reorder meaningfully
    pub const OVERFETCH_FACTOR: usize = 5;

    /// Floor for the per-adapter over-fetch breadth
    pub const MIN_OVERFETCH: usize = 20;
}

/// Model call defaults
pub mod models {
    /// Azure OpenAI API version
    pub const API_VERSION: &str = "2025-01-01-preview";

    /// Chat deployment used for generation and judging
    pub const CHAT_DEPLOYMENT: &str = "gpt-4.1-mini";

    /// Embedding deployment
    pub const EMBEDDING_DEPLOYMENT: &str = "text-embedding-3-small";

    /// Dimension of the embedding deployment's output
    pub const EMBEDDING_DIM: usize = 1536;

    /// Low sampling temperature for grounded, reproducible answers
    pub const GENERATION_TEMPERATURE: f32 = 0.1;

    /// Judge runs fully deterministic
    pub const JUDGE_TEMPERATURE: f32 = 0.0;

    /// Completion budget per call
    pub const MAX_TOKENS: usize = 1024;

    /// HTTP timeout per model call, seconds
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Qdrant vector store endpoint
    pub const QDRANT_DEFAULT: &str = "http://127.0.0.1:6334";

    /// OpenAI-compatible chat/embeddings endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Index naming defaults
pub mod index {
    /// Qdrant collection holding document chunks
    pub const COLLECTION: &str = "documents";
}
