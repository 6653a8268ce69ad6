//! Extraction adapter contracts and the ordered adapter chain

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::concept::Domain;
use crate::error::Result;

use super::record::ExtractedConcept;

/// Normalizes one external source into an [`ExtractedConcept`]
#[async_trait]
pub trait ConceptExtractor: Send + Sync {
    /// Short adapter name used in logs
    fn name(&self) -> &str;

    /// Whether this adapter should be tried for `term`
    async fn can_extract(&self, term: &str) -> bool;

    /// Look the term up; `Ok(None)` means the source had nothing
    async fn extract(&self, term: &str, domain: Domain, subfield: &str) -> Result<Option<ExtractedConcept>>;
}

/// Adds citation hints (books, papers, articles) to an extracted record
#[async_trait]
pub trait ResourceEnricher: Send + Sync {
    async fn enrich(&self, concept: &mut ExtractedConcept) -> Result<()>;
}

/// Ordered list of adapters; the first one that produces data wins
#[derive(Clone, Default)]
pub struct ExtractorChain {
    extractors: Vec<Arc<dyn ConceptExtractor>>,
}

impl ExtractorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, extractor: Arc<dyn ConceptExtractor>) -> Self {
        self.extractors.push(extractor);
        self
    }

    pub fn push(&mut self, extractor: Arc<dyn ConceptExtractor>) {
        self.extractors.push(extractor);
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }

    /// Names of the configured adapters, in order
    pub fn names(&self) -> Vec<String> {
        self.extractors.iter().map(|e| e.name().to_string()).collect()
    }

    /// Extract from the first capable adapter, or fall back to a bare record
    ///
    /// Adapter errors are logged and treated like "nothing found" so a flaky
    /// source never blocks the rest of the chain.
    pub async fn extract_or_bare(&self, term: &str, domain: Domain, subfield: &str) -> ExtractedConcept {
        for extractor in &self.extractors {
            if !extractor.can_extract(term).await {
                continue;
            }

            match extractor.extract(term, domain, subfield).await {
                Ok(Some(found)) => {
                    debug!(term = %term, source = extractor.name(), "Extracted concept");
                    return found;
                }
                Ok(None) => {
                    debug!(term = %term, source = extractor.name(), "Source had no data");
                }
                Err(e) => {
                    warn!(term = %term, source = extractor.name(), error = %e, "Extractor failed");
                }
            }
        }

        ExtractedConcept::bare(term, domain, subfield)
    }
}

impl std::fmt::Debug for ExtractorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorChain")
            .field("extractors", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::SourceType;
    use crate::error::Error;

    struct Fixed {
        name: &'static str,
        capable: bool,
        outcome: fn(&str, Domain, &str) -> Result<Option<ExtractedConcept>>,
    }

    #[async_trait]
    impl ConceptExtractor for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        async fn can_extract(&self, _term: &str) -> bool {
            self.capable
        }

        async fn extract(&self, term: &str, domain: Domain, subfield: &str) -> Result<Option<ExtractedConcept>> {
            (self.outcome)(term, domain, subfield)
        }
    }

    fn found(term: &str, domain: Domain, subfield: &str) -> Result<Option<ExtractedConcept>> {
        Ok(Some(ExtractedConcept::new(
            term,
            "found",
            domain,
            subfield,
            SourceType::Other,
        )))
    }

    #[tokio::test]
    async fn test_first_producing_adapter_wins() {
        let chain = ExtractorChain::new()
            .with(Arc::new(Fixed {
                name: "incapable",
                capable: false,
                outcome: |_, _, _| panic!("must not be called"),
            }))
            .with(Arc::new(Fixed {
                name: "empty",
                capable: true,
                outcome: |_, _, _| Ok(None),
            }))
            .with(Arc::new(Fixed {
                name: "broken",
                capable: true,
                outcome: |_, _, _| Err(Error::ExtractionFailed("timeout".to_string())),
            }))
            .with(Arc::new(Fixed {
                name: "good",
                capable: true,
                outcome: found,
            }));

        let record = chain.extract_or_bare("Set", Domain::Math, "set_theory").await;
        assert_eq!(record.raw_definition, "found");
        assert_eq!(chain.names(), ["incapable", "empty", "broken", "good"]);
    }

    #[tokio::test]
    async fn test_empty_chain_yields_bare_record() {
        let chain = ExtractorChain::new();
        let record = chain.extract_or_bare("Obscure Term", Domain::Physics, "general").await;
        assert!(record.is_bare());
        assert_eq!(record.name, "Obscure Term");
        assert_eq!(record.domain, Domain::Physics);
    }
}
