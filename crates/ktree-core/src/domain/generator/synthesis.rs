//! The concept creation step shared by both pass engines

use std::sync::Arc;

use tracing::debug;

use crate::domain::concept::{Concept, Domain};
use crate::domain::extraction::{ExtractorChain, ResourceEnricher};
use crate::error::Result;

use super::formatter::{DefinitionFormatter, RawConceptData};

/// Extract, enrich and format a new concept for a term
///
/// The concept is returned unsaved; the caller decides its place in the
/// graph and persists it.
#[derive(Clone)]
pub struct ConceptSynthesizer {
    extractors: ExtractorChain,
    enrichers: Vec<Arc<dyn ResourceEnricher>>,
    formatter: DefinitionFormatter,
}

impl ConceptSynthesizer {
    pub fn new(
        extractors: ExtractorChain,
        enrichers: Vec<Arc<dyn ResourceEnricher>>,
        formatter: DefinitionFormatter,
    ) -> Self {
        Self {
            extractors,
            enrichers,
            formatter,
        }
    }

    pub async fn synthesize(
        &self,
        term: &str,
        domain: Domain,
        subfield: &str,
        complexity_level: u32,
    ) -> Result<Concept> {
        let term = term.trim();
        let mut extracted = self.extractors.extract_or_bare(term, domain, subfield).await;

        for enricher in &self.enrichers {
            enricher.enrich(&mut extracted).await?;
        }

        // Sources may report a canonical title; the card is headed by the requested term
        let mut raw = RawConceptData::from(&extracted);
        raw.name = term.to_string();
        let definition = self.formatter.format(&raw).await?;

        debug!(
            term = %term,
            domain = %domain,
            source = ?extracted.source_type,
            level = complexity_level,
            "Synthesized concept"
        );

        // Keep the requested name so later case-insensitive lookups find it
        Ok(Concept::new(term, domain, subfield)
            .with_definition(definition)
            .with_complexity(complexity_level)
            .with_related(extracted.related_terms)
            .with_resources(extracted.books, extracted.papers, extracted.articles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::{ConceptExtractor, ExtractedConcept, SourceType};
    use crate::llm::{Generation, TextBackend};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers every term with a record under the source's canonical title
    struct CanonicalTitleSource;

    #[async_trait]
    impl ConceptExtractor for CanonicalTitleSource {
        fn name(&self) -> &str {
            "canonical"
        }

        async fn can_extract(&self, _term: &str) -> bool {
            true
        }

        async fn extract(
            &self,
            _term: &str,
            domain: Domain,
            subfield: &str,
        ) -> Result<Option<ExtractedConcept>> {
            let mut record = ExtractedConcept::new(
                "Set (mathematics)",
                "A set is a collection of distinct objects.",
                domain,
                subfield,
                SourceType::Wikipedia,
            );
            record.related_terms = vec!["Element".to_string()];
            Ok(Some(record))
        }
    }

    #[derive(Default)]
    struct PromptLog {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextBackend for PromptLog {
        async fn generate(&self, prompt: &str) -> Result<Generation> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(Generation::new("A **Set** is a collection $S$ of distinct objects."))
        }
    }

    #[tokio::test]
    async fn test_card_is_headed_by_requested_term() {
        let backend = Arc::new(PromptLog::default());
        let synthesizer = ConceptSynthesizer::new(
            ExtractorChain::new().with(Arc::new(CanonicalTitleSource)),
            Vec::new(),
            DefinitionFormatter::new(backend.clone()),
        );

        let concept = synthesizer
            .synthesize(" Set ", Domain::Math, "set_theory", 1)
            .await
            .unwrap();

        assert_eq!(concept.name, "Set");
        assert!(concept.definition_md.starts_with("## Set\n\n"));
        assert!(!concept.definition_md.contains("Set (mathematics)"));
        assert_eq!(concept.related_concepts, ["Element"]);

        let prompts = backend.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Concept: Set\n"));
    }
}
