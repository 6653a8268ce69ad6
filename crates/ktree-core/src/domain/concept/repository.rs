//! Repository trait for concept graph persistence
//!
//! Pass engines and the MVG reconstructor depend only on this trait, so any
//! backing store (in-memory, SQLite) can be bound at the edge.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

use super::entity::{Concept, Domain};

/// Counts describing the current graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub concepts: u64,
    pub requires_edges: u64,
    pub axioms: u64,
    pub by_domain: BTreeMap<Domain, u64>,
}

/// Storage contract for concepts and `REQUIRES` edges
///
/// Lookups by name are case-insensitive in every implementation shipped with
/// this crate. Callers still compare names themselves before creating, and
/// nothing serializes a check-then-create sequence: two concurrent writers can
/// both create a concept with the same name.
#[async_trait]
pub trait ConceptRepository: Send + Sync {
    // ========== Lookups ==========

    /// Find a concept by name, ignoring case
    async fn get_by_name(&self, name: &str) -> Result<Option<Concept>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<Concept>>;

    /// All axioms in a domain
    async fn get_axioms(&self, domain: Domain) -> Result<Vec<Concept>>;

    /// Concepts whose complexity lies in `[min, max]`
    async fn get_by_complexity_range(&self, domain: Domain, min: u32, max: u32) -> Result<Vec<Concept>>;

    /// Concepts at or above `min_level`
    async fn get_complex_concepts(&self, domain: Domain, min_level: u32) -> Result<Vec<Concept>>;

    /// Non-axiom concepts that have no outgoing `REQUIRES` edge yet
    async fn get_incomplete_concepts(&self, domain: Domain) -> Result<Vec<Concept>>;

    async fn get_by_domain(&self, domain: Domain) -> Result<Vec<Concept>>;

    /// Direct prerequisites of a concept
    async fn get_prerequisites(&self, concept_id: &str) -> Result<Vec<Concept>>;

    // ========== Mutations ==========

    /// Persist a new concept, returning it as stored
    ///
    /// Rejects concepts that fail [`Concept::validate`] and duplicate ids.
    async fn create(&self, concept: Concept) -> Result<Concept>;

    /// Record that `dependent_id` requires `prerequisite_id`; repeated calls are no-ops
    async fn add_requires(&self, dependent_id: &str, prerequisite_id: &str) -> Result<()>;

    // ========== Statistics ==========

    async fn stats(&self) -> Result<GraphStats>;
}
