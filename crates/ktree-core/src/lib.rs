//! Knowledge Tree Core Library
//!
//! Grows a prerequisite graph of concepts, starting from curated axioms:
//! - Domain model (concepts, domains, `REQUIRES` edges)
//! - Forward and backward expansion passes and the orchestrator that alternates them
//! - Minimum viable graph (MVG) path reconstruction
//! - LLM integration (OpenRouter-compatible API) with usage tracking
//! - Extraction adapters (Wikipedia, trusted web sources, citations)
//! - Storage (in-memory and SQLite)
//! - Curated seed definitions

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod llm;
pub mod seeds;
pub mod storage;

pub use error::{Error, ErrorKind, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::concept::{Concept, ConceptRepository, Domain};
    pub use crate::domain::generator::{GenerationResult, GeneratorDeps, Orchestrator, PassResult};
    pub use crate::domain::mvg::{MvgResult, MvgService};
    pub use crate::error::{Error, Result};
    pub use crate::llm::{LlmClient, TextBackend};
}

#[cfg(test)]
mod config_tests;
