//! Orchestrator - strictly alternating forward/backward passes

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::domain::concept::{ConceptRepository, Domain};
use crate::domain::extraction::{ExtractorChain, ResourceEnricher};
use crate::error::Result;
use crate::llm::TextBackend;

use super::backward::BackwardPassEngine;
use super::formatter::DefinitionFormatter;
use super::forward::ForwardPassEngine;
use super::pass::{ExpansionPass, PassDirection, PassResult};
use super::synthesis::ConceptSynthesizer;

/// Whether a run reached its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Completed,
    /// The iteration cap hit before the target was reached
    Stalled,
}

/// Aggregated outcome of an orchestrator run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub total_concepts_added: usize,
    pub forward_concepts: usize,
    pub backward_concepts: usize,
    pub total_passes: usize,
    pub forward_passes: usize,
    pub backward_passes: usize,
    pub iterations: usize,
    pub target_terms: usize,
    pub all_errors: Vec<String>,
    pub status: GenerationStatus,
    pub success: bool,
    #[serde(skip)]
    error_threshold: usize,
}

impl GenerationResult {
    fn new(target_terms: usize, error_threshold: usize) -> Self {
        Self {
            total_concepts_added: 0,
            forward_concepts: 0,
            backward_concepts: 0,
            total_passes: 0,
            forward_passes: 0,
            backward_passes: 0,
            iterations: 0,
            target_terms,
            all_errors: Vec::new(),
            status: GenerationStatus::Completed,
            success: false,
            error_threshold,
        }
    }

    /// Diagnostic signal: something was added and errors stayed under the threshold
    pub fn success(&self) -> bool {
        self.total_concepts_added > 0 && self.all_errors.len() < self.error_threshold
    }

    fn absorb(&mut self, pass: PassResult) {
        self.total_passes += 1;
        self.total_concepts_added += pass.concepts_added;
        match pass.direction {
            PassDirection::Forward => {
                self.forward_passes += 1;
                self.forward_concepts += pass.concepts_added;
            }
            PassDirection::Backward => {
                self.backward_passes += 1;
                self.backward_concepts += pass.concepts_added;
            }
        }
        self.all_errors.extend(pass.errors);
    }
}

/// Collaborators shared by both pass engines
#[derive(Clone)]
pub struct GeneratorDeps {
    pub store: Arc<dyn ConceptRepository>,
    pub backend: Arc<dyn TextBackend>,
    pub extractors: ExtractorChain,
    pub enrichers: Vec<Arc<dyn ResourceEnricher>>,
}

/// Drives alternating passes in fixed-size batches until a target is reached
///
/// Direction flips after every pass whatever it produced. Only the
/// iteration cap stops a run whose passes keep adding nothing.
pub struct Orchestrator {
    forward: Box<dyn ExpansionPass + Send>,
    backward: Box<dyn ExpansionPass + Send>,
    config: GeneratorConfig,
}

impl Orchestrator {
    pub fn new(
        forward: Box<dyn ExpansionPass + Send>,
        backward: Box<dyn ExpansionPass + Send>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            forward,
            backward,
            config,
        }
    }

    /// Wire real forward/backward engines from shared collaborators
    pub fn from_deps(deps: GeneratorDeps, config: GeneratorConfig) -> Self {
        let formatter = DefinitionFormatter::new(deps.backend.clone());
        let synthesizer = ConceptSynthesizer::new(deps.extractors, deps.enrichers, formatter);

        let (forward_rng, backward_rng) = match config.rng_seed {
            Some(seed) => (
                StdRng::seed_from_u64(seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (StdRng::from_entropy(), StdRng::from_entropy()),
        };

        let forward = ForwardPassEngine::new(
            deps.store.clone(),
            synthesizer.clone(),
            config.forward_max_complexity,
            forward_rng,
        );
        let backward = BackwardPassEngine::new(
            deps.store,
            deps.backend,
            synthesizer,
            config.backward_min_complexity,
            backward_rng,
        );

        Self::new(Box::new(forward), Box::new(backward), config)
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Concepts requested per pass: `max(1, floor(target * pass_ratio))`
    pub fn batch_size(&self, target_terms: usize) -> usize {
        ((target_terms as f64 * self.config.pass_ratio).floor() as usize).max(1)
    }

    pub async fn run(&mut self, target_terms: usize, domains: &[Domain]) -> GenerationResult {
        let mut result = GenerationResult::new(target_terms, self.config.error_threshold);
        let batch_size = self.batch_size(target_terms);
        let mut direction = PassDirection::Forward;
        let mut current = 0;

        info!(
            target = target_terms,
            batch_size,
            domains = ?domains,
            "Starting generation"
        );

        while current < target_terms && result.iterations < self.config.max_iterations {
            let request = batch_size.min(target_terms - current);
            let pass = match direction {
                PassDirection::Forward => self.forward.run(domains, request).await,
                PassDirection::Backward => self.backward.run(domains, request).await,
            };

            let added = pass.concepts_added;
            current += added;
            result.iterations += 1;
            result.absorb(pass);

            info!(
                pass = %direction,
                added,
                total = current,
                target = target_terms,
                iteration = result.iterations,
                "Pass finished"
            );
            if added == 0 {
                warn!(pass = %direction, iteration = result.iterations, "Pass added no concepts");
            }

            direction = direction.flipped();
        }

        if current < target_terms {
            result.status = GenerationStatus::Stalled;
            warn!(
                added = current,
                target = target_terms,
                iterations = result.iterations,
                "Iteration cap reached before target"
            );
        }
        result.success = result.success();

        info!(
            added = result.total_concepts_added,
            passes = result.total_passes,
            errors = result.all_errors.len(),
            status = ?result.status,
            "Generation finished"
        );
        result
    }

    /// Run exactly one pass of the named direction, bypassing alternation
    pub async fn run_single_pass(&mut self, pass_type: &str, target: usize, domains: &[Domain]) -> Result<PassResult> {
        let direction: PassDirection = pass_type.parse()?;
        let result = match direction {
            PassDirection::Forward => self.forward.run(domains, target).await,
            PassDirection::Backward => self.backward.run(domains, target).await,
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed yield and records every request it receives
    struct ScriptedPass {
        direction: PassDirection,
        added: usize,
        log: Arc<Mutex<Vec<(PassDirection, usize)>>>,
    }

    #[async_trait]
    impl ExpansionPass for ScriptedPass {
        fn direction(&self) -> PassDirection {
            self.direction
        }

        async fn run(&mut self, _domains: &[Domain], target: usize) -> PassResult {
            self.log.lock().unwrap().push((self.direction, target));
            let mut result = PassResult::new(self.direction);
            result.concepts_added = self.added.min(target);
            result
        }
    }

    fn orchestrator(
        forward_yield: usize,
        backward_yield: usize,
        config: GeneratorConfig,
    ) -> (Orchestrator, Arc<Mutex<Vec<(PassDirection, usize)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let forward = ScriptedPass {
            direction: PassDirection::Forward,
            added: forward_yield,
            log: log.clone(),
        };
        let backward = ScriptedPass {
            direction: PassDirection::Backward,
            added: backward_yield,
            log: log.clone(),
        };
        (
            Orchestrator::new(Box::new(forward), Box::new(backward), config),
            log,
        )
    }

    #[test]
    fn test_batch_size() {
        let (orch, _) = orchestrator(0, 0, GeneratorConfig::default());
        assert_eq!(orch.batch_size(50), 5);
        assert_eq!(orch.batch_size(5), 1);
        assert_eq!(orch.batch_size(0), 1);
    }

    #[tokio::test]
    async fn test_half_ratio_scenario() {
        let config = GeneratorConfig {
            pass_ratio: 0.5,
            ..GeneratorConfig::default()
        };
        let (mut orch, log) = orchestrator(1, 1, config);

        let result = orch.run(4, &[Domain::Math]).await;

        let log = log.lock().unwrap().clone();
        assert_eq!(
            log,
            [
                (PassDirection::Forward, 2),
                (PassDirection::Backward, 2),
                (PassDirection::Forward, 2),
                (PassDirection::Backward, 2),
            ]
        );
        assert_eq!(result.total_concepts_added, 4);
        assert_eq!(result.forward_passes, 2);
        assert_eq!(result.backward_passes, 2);
        assert_eq!(result.status, GenerationStatus::Completed);
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_requests_shrink_to_remaining() {
        let config = GeneratorConfig {
            pass_ratio: 0.5,
            ..GeneratorConfig::default()
        };
        let (mut orch, log) = orchestrator(5, 5, config);

        let result = orch.run(10, &[Domain::Math]).await;

        assert_eq!(result.total_concepts_added, 10);
        assert_eq!(
            log.lock().unwrap().clone(),
            [(PassDirection::Forward, 5), (PassDirection::Backward, 5)]
        );
    }

    #[tokio::test]
    async fn test_zero_yield_terminates_at_iteration_cap() {
        let config = GeneratorConfig {
            max_iterations: 7,
            ..GeneratorConfig::default()
        };
        let (mut orch, log) = orchestrator(0, 0, config);

        let result = orch.run(10, &[Domain::Math]).await;

        assert_eq!(result.iterations, 7);
        assert_eq!(result.total_passes, 7);
        assert_eq!(result.forward_passes, 4);
        assert_eq!(result.backward_passes, 3);
        assert_eq!(result.status, GenerationStatus::Stalled);
        assert!(!result.success);

        let log = log.lock().unwrap().clone();
        for pair in log.windows(2) {
            assert_ne!(pair[0].0, pair[1].0, "passes must alternate");
        }
        assert_eq!(log[0].0, PassDirection::Forward);
    }

    #[tokio::test]
    async fn test_alternation_ignores_pass_yield() {
        let (mut orch, log) = orchestrator(0, 3, GeneratorConfig::default());

        let result = orch.run(6, &[Domain::Physics]).await;

        assert_eq!(result.total_concepts_added, 6);
        assert_eq!(result.forward_concepts, 0);
        assert_eq!(result.backward_concepts, 6);
        let directions: Vec<_> = log.lock().unwrap().iter().map(|(d, _)| *d).collect();
        assert_eq!(
            directions,
            [
                PassDirection::Forward,
                PassDirection::Backward,
                PassDirection::Forward,
                PassDirection::Backward,
                PassDirection::Forward,
                PassDirection::Backward,
                PassDirection::Forward,
                PassDirection::Backward,
                PassDirection::Forward,
                PassDirection::Backward,
                PassDirection::Forward,
                PassDirection::Backward,
            ]
        );
    }

    #[tokio::test]
    async fn test_single_pass() {
        let (mut orch, log) = orchestrator(3, 2, GeneratorConfig::default());

        let forward = orch.run_single_pass("forward", 3, &[Domain::Math]).await.unwrap();
        assert_eq!(forward.direction, PassDirection::Forward);
        assert_eq!(forward.concepts_added, 3);

        let backward = orch.run_single_pass("backward", 2, &[Domain::Math]).await.unwrap();
        assert_eq!(backward.concepts_added, 2);

        assert!(orch.run_single_pass("invalid", 1, &[Domain::Math]).await.is_err());
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_success_flag() {
        let mut result = GenerationResult::new(50, 20);
        result.total_concepts_added = 50;
        assert!(result.success());

        result.all_errors = vec!["Error".to_string(); 25];
        assert!(!result.success());

        let empty = GenerationResult::new(50, 20);
        assert!(!empty.success());
    }
}
