use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::concept::{Concept, ConceptRepository, Domain};
use crate::error::{Error, Result};
use crate::llm::TextBackend;

/// One step of a learning path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MvgNode {
    pub name: String,
    pub description: String,
    pub is_axiom: bool,
    /// Id of the stored concept with the same name, if one exists
    pub concept_id: Option<String>,
}

impl MvgNode {
    /// Whether this step is not yet a concept in the graph
    pub fn is_virtual(&self) -> bool {
        self.concept_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MvgResult {
    pub target: String,
    pub domain: Domain,
    /// Ordered from the most fundamental step to the target
    pub path: Vec<MvgNode>,
    pub explanation: String,
}

#[derive(Debug, Deserialize)]
struct RawPath {
    #[serde(default)]
    path: Vec<RawStep>,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    is_axiom: bool,
}

pub struct MvgService {
    backend: Arc<dyn TextBackend>,
    store: Arc<dyn ConceptRepository>,
}

impl MvgService {
    pub fn new(backend: Arc<dyn TextBackend>, store: Arc<dyn ConceptRepository>) -> Self {
        Self { backend, store }
    }

    /// Reconstruct the minimal path to `target` within `domain`
    ///
    /// Backend failures propagate unchanged. A reply that is not the expected
    /// JSON object becomes [`Error::InvalidLlmResponse`].
    pub async fn generate(&self, target: &str, domain: Domain) -> Result<MvgResult> {
        let prompt = mvg_prompt(target, domain);
        let generation = self.backend.generate(&prompt).await?;
        debug!(
            target = %target,
            input_tokens = generation.input_tokens,
            output_tokens = generation.output_tokens,
            "Received MVG response"
        );

        let raw = parse_path(&generation.text)?;
        let known = self.domain_concepts(domain).await;

        let path: Vec<MvgNode> = raw
            .path
            .into_iter()
            .map(|step| {
                let concept_id = known
                    .iter()
                    .find(|c| c.has_name(&step.name))
                    .map(|c| c.id.clone());
                MvgNode {
                    name: step.name,
                    description: step.description,
                    is_axiom: step.is_axiom,
                    concept_id,
                }
            })
            .collect();

        info!(
            target = %target,
            domain = %domain,
            steps = path.len(),
            linked = path.iter().filter(|n| !n.is_virtual()).count(),
            "Reconstructed learning path"
        );

        Ok(MvgResult {
            target: target.to_string(),
            domain,
            path,
            explanation: raw.explanation,
        })
    }

    /// A failing store leaves every step unlinked rather than failing the call
    async fn domain_concepts(&self, domain: Domain) -> Vec<Concept> {
        match self.store.get_by_domain(domain).await {
            Ok(concepts) => concepts,
            Err(e) => {
                warn!(domain = %domain, error = %e, "Concept lookup failed; path left unlinked");
                Vec::new()
            }
        }
    }
}

fn mvg_prompt(target: &str, domain: Domain) -> String {
    format!(
        r#"You are a knowledge graph expert. Given a target concept, identify the MINIMUM set of prerequisite concepts needed to understand it, starting from foundational axioms.

Target concept: {target}
Domain: {domain}

Rules:
1. Start from the most fundamental axioms or definitions
2. Include ONLY concepts that are DIRECTLY required to understand the target
3. Order concepts from most fundamental to the target
4. Keep the path as SHORT as possible while being complete

Return a JSON object with this exact structure:
{{
  "path": [
    {{"name": "concept name", "description": "brief description", "is_axiom": true}}
  ],
  "explanation": "why this path is minimal"
}}

Return ONLY the JSON, no other text."#
    )
}

/// Remove one surrounding ``` or ```json fence
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

fn parse_path(text: &str) -> Result<RawPath> {
    serde_json::from_str(strip_code_fence(text)).map_err(|e| {
        Error::InvalidLlmResponse(format!("Failed to parse learning path as JSON: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryConceptStore;
    use crate::llm::Generation;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedBackend {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl FixedBackend {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextBackend for FixedBackend {
        async fn generate(&self, prompt: &str) -> Result<Generation> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(Generation::new(text.clone())),
                Err(_) => Err(Error::EmptyGeneration),
            }
        }
    }

    const DERIVATIVE_PATH: &str = r#"{
        "path": [
            {"name": "Set", "description": "A collection of objects", "is_axiom": true},
            {"name": "Function", "description": "A mapping between sets"},
            {"name": "Limit", "description": "The value a function approaches"},
            {"name": "Derivative", "description": "Rate of change"}
        ],
        "explanation": "The minimal path from set theory to derivatives."
    }"#;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[tokio::test]
    async fn test_generate_links_existing_concepts() {
        let store = Arc::new(InMemoryConceptStore::new());
        let set = store
            .create(Concept::new("set", Domain::Math, "set_theory").as_axiom())
            .await
            .unwrap();
        store
            .create(Concept::new("Limit", Domain::Physics, "mechanics").with_complexity(2))
            .await
            .unwrap();

        let backend = FixedBackend::ok(DERIVATIVE_PATH);
        let service = MvgService::new(backend.clone(), store);

        let result = service.generate("Derivative", Domain::Math).await.unwrap();

        assert_eq!(result.target, "Derivative");
        assert_eq!(result.domain, Domain::Math);
        assert_eq!(result.path.len(), 4);
        assert_eq!(result.path[0].concept_id.as_deref(), Some(set.id.as_str()));
        assert!(result.path[0].is_axiom);
        // A same-named concept in another domain does not match
        assert!(result.path[2].is_virtual());
        assert!(!result.path[3].is_axiom);
        assert!(result.explanation.to_lowercase().contains("minimal path"));

        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Target concept: Derivative"));
        assert!(prompts[0].contains("Domain: MATH"));
    }

    #[tokio::test]
    async fn test_generate_accepts_fenced_reply() {
        let store = Arc::new(InMemoryConceptStore::new());
        let backend = FixedBackend::ok(
            "```json\n{\"path\":[{\"name\":\"Set\",\"description\":\"d\",\"is_axiom\":true}],\"explanation\":\"e\"}\n```",
        );
        let service = MvgService::new(backend, store);

        let result = service.generate("Set", Domain::Math).await.unwrap();
        assert_eq!(result.path.len(), 1);
        assert_eq!(result.path[0].name, "Set");
        assert_eq!(result.path[0].description, "d");
        assert!(result.path[0].is_axiom);
        assert!(result.path[0].is_virtual());
        assert_eq!(result.explanation, "e");
    }

    #[tokio::test]
    async fn test_invalid_json_is_validation_error() {
        let store = Arc::new(InMemoryConceptStore::new());
        let service = MvgService::new(FixedBackend::ok("not json at all"), store);

        let err = service.generate("Set", Domain::Math).await.unwrap_err();
        assert!(matches!(err, Error::InvalidLlmResponse(_)));
    }

    #[tokio::test]
    async fn test_backend_failure_propagates() {
        let store = Arc::new(InMemoryConceptStore::new());
        let backend = Arc::new(FixedBackend {
            reply: Err(Error::EmptyGeneration),
            prompts: Mutex::new(Vec::new()),
        });
        let service = MvgService::new(backend, store);

        let err = service.generate("Set", Domain::Math).await.unwrap_err();
        assert!(matches!(err, Error::EmptyGeneration));
    }

    #[tokio::test]
    async fn test_missing_fields_default() {
        let store = Arc::new(InMemoryConceptStore::new());
        let service = MvgService::new(FixedBackend::ok(r#"{"path": [{"name": "Set"}]}"#), store);

        let result = service.generate("Set", Domain::Math).await.unwrap();
        assert_eq!(result.path[0].description, "");
        assert!(!result.path[0].is_axiom);
        assert_eq!(result.explanation, "");
    }
}
