//! Concept domain module
//!
//! - **Concept**: a node in the knowledge graph (axiom or derived definition)
//! - **Domain**: the fixed set of top-level categories
//! - **ConceptRepository**: the storage contract every store implements

mod entity;
mod repository;

pub use entity::{Concept, Domain, generate_concept_id, slugify};
pub use repository::{ConceptRepository, GraphStats};
