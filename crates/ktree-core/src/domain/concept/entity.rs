//! Concept nodes and knowledge domains

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Top-level knowledge category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Domain {
    Math,
    Physics,
    Chemistry,
    Biology,
    Cs,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "MATH",
            Self::Physics => "PHYSICS",
            Self::Chemistry => "CHEMISTRY",
            Self::Biology => "BIOLOGY",
            Self::Cs => "CS",
        }
    }

    pub fn all() -> &'static [Domain] {
        &[
            Self::Math,
            Self::Physics,
            Self::Chemistry,
            Self::Biology,
            Self::Cs,
        ]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "MATH" | "MATHEMATICS" => Ok(Self::Math),
            "PHYSICS" => Ok(Self::Physics),
            "CHEMISTRY" => Ok(Self::Chemistry),
            "BIOLOGY" => Ok(Self::Biology),
            "CS" | "COMPUTER_SCIENCE" => Ok(Self::Cs),
            _ => Err(Error::InvalidDomain(s.to_string())),
        }
    }
}

/// A node in the knowledge graph
///
/// Concepts are created by seed loading (verified, fixed complexity) or by a
/// pass engine (unverified, complexity derived from the concept that
/// triggered it). An axiom always sits at complexity level 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub id: String,
    pub name: String,
    /// Markdown definition with embedded LaTeX
    pub definition_md: String,
    pub domain: Domain,
    pub subfield: String,
    pub complexity_level: u32,
    #[serde(default)]
    pub books: Vec<String>,
    #[serde(default)]
    pub papers: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
    /// Names of concepts this one points toward
    #[serde(default)]
    pub related_concepts: Vec<String>,
    pub is_axiom: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Concept {
    /// Create an unverified level-0 concept with a generated id
    pub fn new(name: impl Into<String>, domain: Domain, subfield: impl Into<String>) -> Self {
        let name = name.into();
        let subfield = subfield.into();
        let id = generate_concept_id(domain, &subfield, &name);

        Self {
            id,
            name,
            definition_md: String::new(),
            domain,
            subfield,
            complexity_level: 0,
            books: Vec::new(),
            papers: Vec::new(),
            articles: Vec::new(),
            related_concepts: Vec::new(),
            is_axiom: false,
            is_verified: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_definition(mut self, definition_md: impl Into<String>) -> Self {
        self.definition_md = definition_md.into();
        self
    }

    pub fn with_complexity(mut self, level: u32) -> Self {
        self.complexity_level = level;
        self
    }

    pub fn with_related(mut self, related: Vec<String>) -> Self {
        self.related_concepts = related;
        self
    }

    pub fn with_resources(
        mut self,
        books: Vec<String>,
        papers: Vec<String>,
        articles: Vec<String>,
    ) -> Self {
        self.books = books;
        self.papers = papers;
        self.articles = articles;
        self
    }

    /// Mark as an axiom; also pins the complexity level to 0
    pub fn as_axiom(mut self) -> Self {
        self.is_axiom = true;
        self.complexity_level = 0;
        self
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }

    /// Check the invariants a store must enforce before persisting
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::InvalidConcept("concept id is empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(Error::InvalidConcept(format!(
                "concept {} has an empty name",
                self.id
            )));
        }
        if self.is_axiom && self.complexity_level != 0 {
            return Err(Error::InvalidConcept(format!(
                "axiom '{}' must have complexity level 0, got {}",
                self.name, self.complexity_level
            )));
        }
        Ok(())
    }

    /// Case-insensitive name comparison
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Build a concept id: `{domain}-{subfield}-{slug}-{suffix}`
///
/// The slug keeps ids readable; the random suffix avoids collisions between
/// same-named concepts.
pub fn generate_concept_id(domain: Domain, subfield: &str, name: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}-{}",
        domain.as_str().to_lowercase(),
        slugify(subfield, 32),
        slugify(name, 20),
        &suffix[..8]
    )
}

/// Lowercase, hyphen-separated ASCII slug truncated to `max_len` characters
pub fn slugify(text: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_dash = true;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if c == '_' {
            slug.push('_');
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    let truncated: String = slug.chars().take(max_len).collect();
    let trimmed = truncated.trim_matches('-');
    if trimmed.is_empty() {
        "concept".to_string()
    } else {
        trimmed.to_string()
    }
}
