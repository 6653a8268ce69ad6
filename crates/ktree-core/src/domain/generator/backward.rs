//! Backward pass - trace missing prerequisites of complex concepts

use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use crate::domain::concept::{Concept, ConceptRepository, Domain};
use crate::error::Result;
use crate::llm::TextBackend;

use super::heuristics::{
    MAX_BACKWARD_CANDIDATES, MIN_PATTERN_PREREQUISITES, dedupe_candidates, parse_term_list,
    pattern_prerequisites,
};
use super::pass::{ExpansionPass, PassDirection, PassResult};
use super::synthesis::ConceptSynthesizer;

/// Maximum trace-back targets per domain
pub const MAX_TARGETS: usize = 20;

/// Fills in prerequisites below complex or incomplete concepts
///
/// Existing prerequisites are linked; missing ones are created one level
/// below the dependent concept (never below level 1) and then linked.
pub struct BackwardPassEngine {
    store: Arc<dyn ConceptRepository>,
    backend: Arc<dyn TextBackend>,
    synthesizer: ConceptSynthesizer,
    min_complexity: u32,
    rng: StdRng,
}

impl BackwardPassEngine {
    pub fn new(
        store: Arc<dyn ConceptRepository>,
        backend: Arc<dyn TextBackend>,
        synthesizer: ConceptSynthesizer,
        min_complexity: u32,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            backend,
            synthesizer,
            min_complexity,
            rng,
        }
    }

    /// Run one backward pass with an explicit target complexity floor
    pub async fn execute(&mut self, domains: &[Domain], target_count: usize, min_complexity: u32) -> PassResult {
        let mut result = PassResult::new(PassDirection::Backward);

        info!(target = target_count, min_complexity, "Starting backward pass");

        'domains: for &domain in domains {
            if result.concepts_added >= target_count {
                break;
            }

            let targets = match self.gather_targets(domain, min_complexity).await {
                Ok(targets) => targets,
                Err(e) => {
                    warn!(domain = %domain, error = %e, "Failed to load trace-back targets");
                    result.errors.push(format!("Failed to load targets in {}: {}", domain, e));
                    continue;
                }
            };
            debug!(domain = %domain, targets = targets.len(), "Gathered trace-back targets");

            for target in &targets {
                if result.concepts_added >= target_count {
                    break 'domains;
                }

                let prerequisites = self.find_prerequisites(target, &mut result.errors).await;
                for name in prerequisites {
                    if result.concepts_added >= target_count {
                        break 'domains;
                    }
                    self.process_prerequisite(&name, target, &mut result).await;
                }
            }
        }

        info!(
            added = result.concepts_added,
            skipped = result.concepts_skipped,
            linked = result.prerequisites_linked,
            errors = result.errors.len(),
            "Backward pass complete"
        );
        result
    }

    /// Incomplete concepts if the store reports any, else shuffled complex ones
    async fn gather_targets(&mut self, domain: Domain, min_complexity: u32) -> Result<Vec<Concept>> {
        let mut targets = self.store.get_incomplete_concepts(domain).await?;

        if targets.is_empty() {
            targets = self.store.get_complex_concepts(domain, min_complexity).await?;
            targets.shuffle(&mut self.rng);
        }

        targets.truncate(MAX_TARGETS);
        Ok(targets)
    }

    /// Pattern-matched prerequisites, topped up by the backend when sparse
    pub async fn find_prerequisites(&self, target: &Concept, errors: &mut Vec<String>) -> Vec<String> {
        let mut candidates = pattern_prerequisites(target);

        if candidates.len() < MIN_PATTERN_PREREQUISITES {
            let prompt = prerequisite_prompt(target);
            match self.backend.complete(&prompt).await {
                Ok(text) => candidates.extend(parse_term_list(&text)),
                Err(e) => {
                    warn!(concept = %target.name, error = %e, "Failed to suggest prerequisites");
                    errors.push(format!(
                        "Failed to suggest prerequisites for '{}' in {}: {}",
                        target.name, target.domain, e
                    ));
                }
            }
        }

        dedupe_candidates(candidates, &target.name, MAX_BACKWARD_CANDIDATES)
    }

    async fn process_prerequisite(&self, name: &str, target: &Concept, result: &mut PassResult) {
        let domain = target.domain;

        match self.store.get_by_name(name).await {
            Ok(Some(existing)) if existing.has_name(name) => {
                if existing.id == target.id {
                    return;
                }
                result.concepts_skipped += 1;
                match self.store.add_requires(&target.id, &existing.id).await {
                    Ok(()) => {
                        result.prerequisites_linked += 1;
                        debug!(concept = %target.name, prerequisite = %existing.name, "Linked existing prerequisite");
                    }
                    Err(e) => {
                        warn!(concept = %target.name, prerequisite = %name, error = %e, "Failed to link prerequisite");
                        result.errors.push(format!(
                            "Failed to link '{}' to '{}' in {}: {}",
                            target.name, name, domain, e
                        ));
                    }
                }
                return;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(term = %name, domain = %domain, error = %e, "Lookup failed");
                result
                    .errors
                    .push(format!("Failed to look up '{}' in {}: {}", name, domain, e));
                return;
            }
        }

        let level = target.complexity_level.saturating_sub(1).max(1);
        let concept = match self
            .synthesizer
            .synthesize(name, domain, &target.subfield, level)
            .await
        {
            Ok(concept) => concept,
            Err(e) => {
                warn!(term = %name, domain = %domain, error = %e, "Failed to synthesize prerequisite");
                result
                    .errors
                    .push(format!("Failed to create prerequisite '{}' in {}: {}", name, domain, e));
                return;
            }
        };

        let created = match self.store.create(concept).await {
            Ok(created) => created,
            Err(e) => {
                warn!(term = %name, domain = %domain, error = %e, "Failed to store prerequisite");
                result
                    .errors
                    .push(format!("Failed to create prerequisite '{}' in {}: {}", name, domain, e));
                return;
            }
        };
        result.concepts_added += 1;
        info!(term = %name, domain = %domain, level, dependent = %target.name, "Added prerequisite");

        match self.store.add_requires(&target.id, &created.id).await {
            Ok(()) => result.prerequisites_linked += 1,
            Err(e) => {
                warn!(concept = %target.name, prerequisite = %name, error = %e, "Failed to link prerequisite");
                result.errors.push(format!(
                    "Failed to link '{}' to '{}' in {}: {}",
                    target.name, name, domain, e
                ));
            }
        }
    }
}

fn prerequisite_prompt(target: &Concept) -> String {
    format!(
        "List the 3-5 most essential prerequisite concepts someone must understand \
         before learning \"{name}\" in the domain {domain}.\n\n\
         Definition:\n{definition}\n\n\
         Return ONLY a comma-separated list of concept names, most fundamental first, \
         with no numbering or explanation.",
        name = target.name,
        domain = target.domain,
        definition = target.definition_md,
    )
}

#[async_trait]
impl ExpansionPass for BackwardPassEngine {
    fn direction(&self) -> PassDirection {
        PassDirection::Backward
    }

    async fn run(&mut self, domains: &[Domain], target: usize) -> PassResult {
        let min_complexity = self.min_complexity;
        self.execute(domains, target, min_complexity).await
    }
}
