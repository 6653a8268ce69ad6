//! In-process concept store for dry runs and tests

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::concept::{Concept, ConceptRepository, Domain, GraphStats};
use crate::error::{Error, Result};

#[derive(Default)]
struct Graph {
    /// Insertion order is the order every listing returns
    concepts: Vec<Concept>,
    by_id: HashMap<String, usize>,
    /// Lowercased name to the first concept stored under it
    by_name: HashMap<String, usize>,
    edges: Vec<(String, String)>,
    edge_set: HashSet<(String, String)>,
}

impl Graph {
    fn filtered(&self, domain: Domain, keep: impl Fn(&Concept) -> bool) -> Vec<Concept> {
        self.concepts
            .iter()
            .filter(|c| c.domain == domain && keep(c))
            .cloned()
            .collect()
    }

    fn has_outgoing(&self, id: &str) -> bool {
        self.edges.iter().any(|(dependent, _)| dependent == id)
    }
}

/// A [`ConceptRepository`] held entirely in memory
#[derive(Default)]
pub struct InMemoryConceptStore {
    graph: RwLock<Graph>,
}

impl InMemoryConceptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.graph.read().await.concepts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every stored concept in insertion order
    pub async fn all(&self) -> Vec<Concept> {
        self.graph.read().await.concepts.clone()
    }

    /// Every `(dependent, prerequisite)` edge in insertion order
    pub async fn edges(&self) -> Vec<(String, String)> {
        self.graph.read().await.edges.clone()
    }
}

#[async_trait]
impl ConceptRepository for InMemoryConceptStore {
    // ========== Lookups ==========

    async fn get_by_name(&self, name: &str) -> Result<Option<Concept>> {
        let graph = self.graph.read().await;
        let key = name.trim().to_lowercase();
        Ok(graph.by_name.get(&key).map(|&i| graph.concepts[i].clone()))
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph.by_id.get(id).map(|&i| graph.concepts[i].clone()))
    }

    async fn get_axioms(&self, domain: Domain) -> Result<Vec<Concept>> {
        Ok(self.graph.read().await.filtered(domain, |c| c.is_axiom))
    }

    async fn get_by_complexity_range(&self, domain: Domain, min: u32, max: u32) -> Result<Vec<Concept>> {
        Ok(self
            .graph
            .read()
            .await
            .filtered(domain, |c| (min..=max).contains(&c.complexity_level)))
    }

    async fn get_complex_concepts(&self, domain: Domain, min_level: u32) -> Result<Vec<Concept>> {
        Ok(self
            .graph
            .read()
            .await
            .filtered(domain, |c| c.complexity_level >= min_level))
    }

    async fn get_incomplete_concepts(&self, domain: Domain) -> Result<Vec<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph.filtered(domain, |c| !c.is_axiom && !graph.has_outgoing(&c.id)))
    }

    async fn get_by_domain(&self, domain: Domain) -> Result<Vec<Concept>> {
        Ok(self.graph.read().await.filtered(domain, |_| true))
    }

    async fn get_prerequisites(&self, concept_id: &str) -> Result<Vec<Concept>> {
        let graph = self.graph.read().await;
        Ok(graph
            .edges
            .iter()
            .filter(|(dependent, _)| dependent == concept_id)
            .filter_map(|(_, prerequisite)| graph.by_id.get(prerequisite))
            .map(|&i| graph.concepts[i].clone())
            .collect())
    }

    // ========== Mutations ==========

    async fn create(&self, concept: Concept) -> Result<Concept> {
        concept.validate()?;

        let mut graph = self.graph.write().await;
        if graph.by_id.contains_key(&concept.id) {
            return Err(Error::InvalidConcept(format!(
                "a concept with id {} already exists",
                concept.id
            )));
        }

        let index = graph.concepts.len();
        graph.by_id.insert(concept.id.clone(), index);
        graph
            .by_name
            .entry(concept.name.trim().to_lowercase())
            .or_insert(index);
        graph.concepts.push(concept.clone());

        debug!(concept_id = %concept.id, name = %concept.name, "Concept stored");
        Ok(concept)
    }

    async fn add_requires(&self, dependent_id: &str, prerequisite_id: &str) -> Result<()> {
        if dependent_id == prerequisite_id {
            return Err(Error::InvalidInput(format!(
                "concept {} cannot require itself",
                dependent_id
            )));
        }

        let mut graph = self.graph.write().await;
        for id in [dependent_id, prerequisite_id] {
            if !graph.by_id.contains_key(id) {
                return Err(Error::ConceptNotFound(id.to_string()));
            }
        }

        let edge = (dependent_id.to_string(), prerequisite_id.to_string());
        if graph.edge_set.insert(edge.clone()) {
            graph.edges.push(edge);
        }
        Ok(())
    }

    // ========== Statistics ==========

    async fn stats(&self) -> Result<GraphStats> {
        let graph = self.graph.read().await;
        let mut by_domain = BTreeMap::new();
        for concept in &graph.concepts {
            *by_domain.entry(concept.domain).or_insert(0) += 1;
        }

        Ok(GraphStats {
            concepts: graph.concepts.len() as u64,
            requires_edges: graph.edges.len() as u64,
            axioms: graph.concepts.iter().filter(|c| c.is_axiom).count() as u64,
            by_domain,
        })
    }
}
