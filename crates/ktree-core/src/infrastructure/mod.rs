//! Infrastructure layer
//!
//! Concrete stores and extraction adapters behind the domain traits.

pub mod extractors;
mod memory;
mod sqlite;

pub use extractors::{
    CitationEnricher, SearchHit, WebSearchExtractor, WikipediaExtractor, build_chain,
    build_enrichers,
};
pub use memory::InMemoryConceptStore;
pub use sqlite::SqliteConceptRepository;
