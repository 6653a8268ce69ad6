//! Forward pass - expand from axioms toward more complex concepts

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::domain::concept::{Concept, ConceptRepository, Domain};
use crate::error::Result;

use super::heuristics::forward_candidates;
use super::pass::{ExpansionPass, PassDirection, PassResult};
use super::synthesis::ConceptSynthesizer;

/// Maximum seed concepts per domain
pub const MAX_SEEDS: usize = 20;

/// Grows the graph outward from axioms and low-complexity concepts
///
/// Each new concept sits one level above the seed it was mined from and is
/// linked as requiring that seed.
pub struct ForwardPassEngine {
    store: Arc<dyn ConceptRepository>,
    synthesizer: ConceptSynthesizer,
    max_complexity: u32,
    rng: StdRng,
}

impl ForwardPassEngine {
    pub fn new(
        store: Arc<dyn ConceptRepository>,
        synthesizer: ConceptSynthesizer,
        max_complexity: u32,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            synthesizer,
            max_complexity,
            rng,
        }
    }

    /// Run one forward pass with an explicit seed complexity ceiling
    pub async fn execute(&mut self, domains: &[Domain], target_count: usize, max_complexity: u32) -> PassResult {
        let mut result = PassResult::new(PassDirection::Forward);

        info!(target = target_count, max_complexity, "Starting forward pass");

        'domains: for &domain in domains {
            if result.concepts_added >= target_count {
                break;
            }

            let seeds = match self.gather_seeds(domain, max_complexity).await {
                Ok(seeds) => seeds,
                Err(e) => {
                    warn!(domain = %domain, error = %e, "Failed to load seed concepts");
                    result.errors.push(format!("Failed to load seeds in {}: {}", domain, e));
                    continue;
                }
            };
            debug!(domain = %domain, seeds = seeds.len(), "Gathered seed concepts");

            for seed in &seeds {
                for term in forward_candidates(seed) {
                    if result.concepts_added >= target_count {
                        break 'domains;
                    }
                    self.process_candidate(&term, seed, &mut result).await;
                }
            }
        }

        info!(
            added = result.concepts_added,
            skipped = result.concepts_skipped,
            errors = result.errors.len(),
            "Forward pass complete"
        );
        result
    }

    /// Axioms first, then shuffled concepts in `[1, max_complexity]`, capped
    async fn gather_seeds(&mut self, domain: Domain, max_complexity: u32) -> Result<Vec<Concept>> {
        let mut seeds = self.store.get_axioms(domain).await?;

        if seeds.len() < MAX_SEEDS && max_complexity >= 1 {
            let mut extra = self
                .store
                .get_by_complexity_range(domain, 1, max_complexity)
                .await?;
            extra.shuffle(&mut self.rng);

            let mut seen: HashSet<String> = seeds.iter().map(|s| s.id.clone()).collect();
            seeds.extend(extra.into_iter().filter(|c| seen.insert(c.id.clone())));
        }

        seeds.truncate(MAX_SEEDS);
        Ok(seeds)
    }

    async fn process_candidate(&self, term: &str, seed: &Concept, result: &mut PassResult) {
        let domain = seed.domain;

        match self.store.get_by_name(term).await {
            Ok(Some(existing)) if existing.has_name(term) => {
                debug!(term = %term, "Concept already exists, skipping");
                result.concepts_skipped += 1;
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(term = %term, domain = %domain, error = %e, "Lookup failed");
                result
                    .errors
                    .push(format!("Failed to look up '{}' in {}: {}", term, domain, e));
                return;
            }
        }

        let concept = match self
            .synthesizer
            .synthesize(term, domain, &seed.subfield, seed.complexity_level + 1)
            .await
        {
            Ok(concept) => concept,
            Err(e) => {
                warn!(term = %term, domain = %domain, error = %e, "Failed to synthesize concept");
                result
                    .errors
                    .push(format!("Failed to create '{}' in {}: {}", term, domain, e));
                return;
            }
        };

        let created = match self.store.create(concept).await {
            Ok(created) => created,
            Err(e) => {
                warn!(term = %term, domain = %domain, error = %e, "Failed to store concept");
                result
                    .errors
                    .push(format!("Failed to create '{}' in {}: {}", term, domain, e));
                return;
            }
        };
        result.concepts_added += 1;
        info!(term = %term, domain = %domain, level = created.complexity_level, seed = %seed.name, "Added concept");

        if let Err(e) = self.store.add_requires(&created.id, &seed.id).await {
            warn!(term = %term, seed = %seed.name, error = %e, "Failed to link concept to seed");
            result.errors.push(format!(
                "Failed to link '{}' to '{}' in {}: {}",
                term, seed.name, domain, e
            ));
        }
    }
}

#[async_trait]
impl ExpansionPass for ForwardPassEngine {
    fn direction(&self) -> PassDirection {
        PassDirection::Forward
    }

    async fn run(&mut self, domains: &[Domain], target: usize) -> PassResult {
        let max_complexity = self.max_complexity;
        self.execute(domains, target, max_complexity).await
    }
}
