//! Extraction adapters normalize external lookups into one record shape

mod chain;
mod record;

pub use chain::{ConceptExtractor, ExtractorChain, ResourceEnricher};
pub use record::{ExtractedConcept, SourceType};
