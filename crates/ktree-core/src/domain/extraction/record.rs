//! The uniform record every extraction adapter produces

use serde::{Deserialize, Serialize};

use crate::domain::concept::Domain;

/// Where an extracted record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Wikipedia,
    WebSearch,
    /// No adapter produced data; only name/domain/subfield are known
    Bare,
    Other,
}

/// Raw concept data before formatting
///
/// `raw_definition` may be informal or empty; the definition formatter turns
/// it into Markdown with notation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedConcept {
    pub name: String,
    pub raw_definition: String,
    pub domain: Domain,
    pub subfield: String,
    pub source_url: Option<String>,
    pub source_type: SourceType,
    #[serde(default)]
    pub notations: Vec<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub related_terms: Vec<String>,
    /// TeX fragments found verbatim in the source
    #[serde(default)]
    pub latex_fragments: Vec<String>,
    #[serde(default)]
    pub books: Vec<String>,
    #[serde(default)]
    pub papers: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
}

impl ExtractedConcept {
    pub fn new(
        name: impl Into<String>,
        raw_definition: impl Into<String>,
        domain: Domain,
        subfield: impl Into<String>,
        source_type: SourceType,
    ) -> Self {
        Self {
            name: name.into(),
            raw_definition: raw_definition.into(),
            domain,
            subfield: subfield.into(),
            source_url: None,
            source_type,
            notations: Vec::new(),
            examples: Vec::new(),
            related_terms: Vec::new(),
            latex_fragments: Vec::new(),
            books: Vec::new(),
            papers: Vec::new(),
            articles: Vec::new(),
        }
    }

    /// A shell carrying only name, domain and subfield
    pub fn bare(name: impl Into<String>, domain: Domain, subfield: impl Into<String>) -> Self {
        Self::new(name, "", domain, subfield, SourceType::Bare)
    }

    pub fn is_bare(&self) -> bool {
        self.source_type == SourceType::Bare
    }

    pub fn add_book(&mut self, book: impl Into<String>) {
        push_unique(&mut self.books, book.into());
    }

    pub fn add_paper(&mut self, paper: impl Into<String>) {
        push_unique(&mut self.papers, paper.into());
    }

    pub fn add_article(&mut self, article: impl Into<String>) {
        push_unique(&mut self.articles, article.into());
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_record() {
        let record = ExtractedConcept::bare("Hilbert Space", Domain::Math, "analysis");
        assert!(record.is_bare());
        assert!(record.raw_definition.is_empty());
        assert!(record.source_url.is_none());
        assert_eq!(record.subfield, "analysis");
    }

    #[test]
    fn test_resources_are_deduplicated() {
        let mut record = ExtractedConcept::bare("Set", Domain::Math, "set_theory");
        record.add_book("Naive Set Theory - Halmos");
        record.add_book("Naive Set Theory - Halmos");
        record.add_article("https://en.wikipedia.org/wiki/Set_(mathematics)");
        assert_eq!(record.books.len(), 1);
        assert_eq!(record.articles.len(), 1);
    }
}
