//! Deterministic citation hints for extracted concepts

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::domain::concept::Domain;
use crate::domain::extraction::{ExtractedConcept, ResourceEnricher};
use crate::error::{Error, Result};

const OPEN_LIBRARY_SEARCH: &str = "https://openlibrary.org/search";
const ARXIV_SEARCH: &str = "https://arxiv.org/search/";

/// Appends Open Library and arXiv search links for the concept name
///
/// Books come from Open Library with the domain as a subject hint; papers
/// come from arXiv's full-text search. Existing entries are kept.
#[derive(Debug, Clone, Default)]
pub struct CitationEnricher;

impl CitationEnricher {
    pub fn new() -> Self {
        Self
    }

    pub fn book_search_url(&self, term: &str, domain: Domain) -> Result<String> {
        let url = Url::parse_with_params(
            OPEN_LIBRARY_SEARCH,
            &[("q", term.trim()), ("subject", subject(domain))],
        )
        .map_err(|e| Error::ExtractionFailed(format!("invalid book search URL: {}", e)))?;
        Ok(url.into())
    }

    pub fn paper_search_url(&self, term: &str) -> Result<String> {
        let url = Url::parse_with_params(
            ARXIV_SEARCH,
            &[("query", term.trim()), ("searchtype", "all")],
        )
        .map_err(|e| Error::ExtractionFailed(format!("invalid paper search URL: {}", e)))?;
        Ok(url.into())
    }
}

fn subject(domain: Domain) -> &'static str {
    match domain {
        Domain::Math => "mathematics",
        Domain::Physics => "physics",
        Domain::Chemistry => "chemistry",
        Domain::Biology => "biology",
        Domain::Cs => "computer science",
    }
}

#[async_trait]
impl ResourceEnricher for CitationEnricher {
    async fn enrich(&self, concept: &mut ExtractedConcept) -> Result<()> {
        if concept.name.trim().is_empty() {
            return Ok(());
        }

        concept.add_book(self.book_search_url(&concept.name, concept.domain)?);
        concept.add_paper(self.paper_search_url(&concept.name)?);

        debug!(term = %concept.name, "Citation hints attached");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enrich_adds_each_citation_once() {
        let enricher = CitationEnricher::new();
        let mut record = ExtractedConcept::bare("Group Theory", Domain::Math, "algebra");

        enricher.enrich(&mut record).await.unwrap();
        enricher.enrich(&mut record).await.unwrap();

        assert_eq!(
            record.books,
            ["https://openlibrary.org/search?q=Group+Theory&subject=mathematics"]
        );
        assert_eq!(
            record.papers,
            ["https://arxiv.org/search/?query=Group+Theory&searchtype=all"]
        );
    }

    #[tokio::test]
    async fn test_existing_resources_are_kept() {
        let enricher = CitationEnricher::new();
        let mut record = ExtractedConcept::bare("Cell", Domain::Biology, "cell_biology");
        record.add_book("Molecular Biology of the Cell - Alberts");

        enricher.enrich(&mut record).await.unwrap();

        assert_eq!(record.books.len(), 2);
        assert_eq!(record.books[0], "Molecular Biology of the Cell - Alberts");
        assert!(record.books[1].contains("subject=biology"));
    }

    #[test]
    fn test_query_is_encoded() {
        let url = CitationEnricher::new()
            .book_search_url("Gödel & Escher", Domain::Cs)
            .unwrap();
        assert!(url.contains("q=G%C3%B6del+%26+Escher"));
        assert!(url.contains("subject=computer+science"));
    }
}
