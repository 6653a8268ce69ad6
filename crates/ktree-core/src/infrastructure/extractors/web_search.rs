//! Trusted-source fallback adapter
//!
//! Builds reference entries from the URL patterns of well-known reference
//! works instead of calling a search service. The snippets are placeholders,
//! so the definition formatter ends up writing the definition itself.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::concept::Domain;
use crate::domain::extraction::{ConceptExtractor, ExtractedConcept, SourceType};
use crate::error::Result;

const MAX_ARTICLES: usize = 5;

/// One reference-work entry for a term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Default)]
pub struct WebSearchExtractor;

impl WebSearchExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Reference entries for `term`, most specific source first
    pub fn search(&self, term: &str, domain: Domain) -> Vec<SearchHit> {
        let term = term.trim();
        if term.is_empty() {
            return Vec::new();
        }
        let lower = term.to_lowercase();
        let mut hits = Vec::new();

        if domain == Domain::Math {
            hits.push(SearchHit {
                url: format!("https://mathworld.wolfram.com/{}.html", term.replace(' ', "")),
                title: format!("{} -- from Wolfram MathWorld", term),
                snippet: format!("See the MathWorld entry for {}.", term),
            });
        }

        hits.push(SearchHit {
            url: format!("https://encyclopediaofmath.org/wiki/{}", lower.replace(' ', "_")),
            title: format!("{} - Encyclopedia of Mathematics", term),
            snippet: format!("Encyclopedia of Mathematics article on {}.", term),
        });

        hits.push(SearchHit {
            url: format!("https://plato.stanford.edu/entries/{}/", lower.replace(' ', "-")),
            title: format!("{} (Stanford Encyclopedia of Philosophy)", term),
            snippet: format!("Stanford Encyclopedia entry on {}.", term),
        });

        hits
    }
}

#[async_trait]
impl ConceptExtractor for WebSearchExtractor {
    fn name(&self) -> &str {
        "web_search"
    }

    async fn can_extract(&self, term: &str) -> bool {
        !term.trim().is_empty()
    }

    async fn extract(&self, term: &str, domain: Domain, subfield: &str) -> Result<Option<ExtractedConcept>> {
        let hits = self.search(term, domain);
        let Some(first) = hits.first() else {
            return Ok(None);
        };

        let mut record = ExtractedConcept::new(
            term.trim(),
            first.snippet.clone(),
            domain,
            subfield,
            SourceType::WebSearch,
        );
        record.source_url = Some(first.url.clone());
        for hit in hits.iter().take(MAX_ARTICLES) {
            record.add_article(hit.url.clone());
        }
        Ok(Some(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_math_terms_lead_with_mathworld() {
        let hits = WebSearchExtractor::new().search("Vector Space", Domain::Math);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].url, "https://mathworld.wolfram.com/VectorSpace.html");
        assert_eq!(hits[1].url, "https://encyclopediaofmath.org/wiki/vector_space");
        assert_eq!(hits[2].url, "https://plato.stanford.edu/entries/vector-space/");
    }

    #[test]
    fn test_other_domains_skip_mathworld() {
        let hits = WebSearchExtractor::new().search("Entropy", Domain::Physics);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].url.contains("encyclopediaofmath.org"));
    }

    #[tokio::test]
    async fn test_extract_uses_first_hit() {
        let record = WebSearchExtractor::new()
            .extract("Group", Domain::Math, "algebra")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.source_type, SourceType::WebSearch);
        assert_eq!(record.raw_definition, "See the MathWorld entry for Group.");
        assert_eq!(record.source_url.as_deref(), Some("https://mathworld.wolfram.com/Group.html"));
        assert_eq!(record.articles.len(), 3);
    }

    #[tokio::test]
    async fn test_blank_term_has_nothing() {
        let extractor = WebSearchExtractor::new();
        assert!(!extractor.can_extract("  ").await);
        assert!(extractor.extract(" ", Domain::Cs, "general").await.unwrap().is_none());
    }
}
