//! SQLite implementation of the ConceptRepository
//!
//! List columns are stored as JSON arrays. Name lookups go through the
//! `name_key` column, the Unicode-lowercased trimmed name.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, warn};

use crate::domain::concept::{Concept, ConceptRepository, Domain, GraphStats};
use crate::error::{Error, Result};
use crate::storage::migrations::name_key;

const CONCEPT_COLUMNS: &str = "id, name, definition_md, domain, subfield, complexity_level, \
     books, papers, articles, related_concepts, is_axiom, is_verified, created_at";

#[derive(Clone)]
pub struct SqliteConceptRepository {
    pool: SqlitePool,
}

impl SqliteConceptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn query_concepts(&self, where_clause: &str, binds: &[SqlValue<'_>]) -> Result<Vec<Concept>> {
        let sql = format!(
            "SELECT {} FROM concepts WHERE {} ORDER BY rowid",
            CONCEPT_COLUMNS, where_clause
        );
        let mut query = sqlx::query_as::<_, ConceptRow>(&sql);
        for bind in binds {
            query = match *bind {
                SqlValue::Text(text) => query.bind(text),
                SqlValue::Int(value) => query.bind(value),
            };
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(ConceptRow::into_concept).collect()
    }

    async fn exists(&self, id: &str) -> Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM concepts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

enum SqlValue<'a> {
    Text(&'a str),
    Int(i64),
}

fn to_json(values: &[String]) -> Result<String> {
    Ok(serde_json::to_string(values)?)
}

#[async_trait]
impl ConceptRepository for SqliteConceptRepository {
    // ========== Lookups ==========

    async fn get_by_name(&self, name: &str) -> Result<Option<Concept>> {
        let sql = format!(
            "SELECT {} FROM concepts WHERE name_key = ? ORDER BY rowid LIMIT 1",
            CONCEPT_COLUMNS
        );
        let row: Option<ConceptRow> = sqlx::query_as(&sql)
            .bind(name_key(name))
            .fetch_optional(&self.pool)
            .await?;

        row.map(ConceptRow::into_concept).transpose()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Concept>> {
        let sql = format!("SELECT {} FROM concepts WHERE id = ?", CONCEPT_COLUMNS);
        let row: Option<ConceptRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(ConceptRow::into_concept).transpose()
    }

    async fn get_axioms(&self, domain: Domain) -> Result<Vec<Concept>> {
        self.query_concepts(
            "domain = ? AND is_axiom = 1",
            &[SqlValue::Text(domain.as_str())],
        )
        .await
    }

    async fn get_by_complexity_range(&self, domain: Domain, min: u32, max: u32) -> Result<Vec<Concept>> {
        self.query_concepts(
            "domain = ? AND complexity_level BETWEEN ? AND ?",
            &[
                SqlValue::Text(domain.as_str()),
                SqlValue::Int(i64::from(min)),
                SqlValue::Int(i64::from(max)),
            ],
        )
        .await
    }

    async fn get_complex_concepts(&self, domain: Domain, min_level: u32) -> Result<Vec<Concept>> {
        self.query_concepts(
            "domain = ? AND complexity_level >= ?",
            &[SqlValue::Text(domain.as_str()), SqlValue::Int(i64::from(min_level))],
        )
        .await
    }

    async fn get_incomplete_concepts(&self, domain: Domain) -> Result<Vec<Concept>> {
        self.query_concepts(
            "domain = ? AND is_axiom = 0 \
             AND NOT EXISTS (SELECT 1 FROM requires r WHERE r.dependent_id = concepts.id)",
            &[SqlValue::Text(domain.as_str())],
        )
        .await
    }

    async fn get_by_domain(&self, domain: Domain) -> Result<Vec<Concept>> {
        self.query_concepts("domain = ?", &[SqlValue::Text(domain.as_str())])
            .await
    }

    async fn get_prerequisites(&self, concept_id: &str) -> Result<Vec<Concept>> {
        self.query_concepts(
            "id IN (SELECT prerequisite_id FROM requires WHERE dependent_id = ?)",
            &[SqlValue::Text(concept_id)],
        )
        .await
    }

    // ========== Mutations ==========

    async fn create(&self, concept: Concept) -> Result<Concept> {
        concept.validate()?;

        if self.exists(&concept.id).await? {
            return Err(Error::InvalidConcept(format!(
                "a concept with id {} already exists",
                concept.id
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO concepts (
                id, name, name_key, definition_md, domain, subfield, complexity_level,
                books, papers, articles, related_concepts, is_axiom, is_verified, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&concept.id)
        .bind(&concept.name)
        .bind(name_key(&concept.name))
        .bind(&concept.definition_md)
        .bind(concept.domain.as_str())
        .bind(&concept.subfield)
        .bind(i64::from(concept.complexity_level))
        .bind(to_json(&concept.books)?)
        .bind(to_json(&concept.papers)?)
        .bind(to_json(&concept.articles)?)
        .bind(to_json(&concept.related_concepts)?)
        .bind(concept.is_axiom)
        .bind(concept.is_verified)
        .bind(concept.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(concept_id = %concept.id, name = %concept.name, "Concept stored");
        Ok(concept)
    }

    async fn add_requires(&self, dependent_id: &str, prerequisite_id: &str) -> Result<()> {
        if dependent_id == prerequisite_id {
            return Err(Error::InvalidInput(format!(
                "concept {} cannot require itself",
                dependent_id
            )));
        }
        for id in [dependent_id, prerequisite_id] {
            if !self.exists(id).await? {
                return Err(Error::ConceptNotFound(id.to_string()));
            }
        }

        sqlx::query("INSERT OR IGNORE INTO requires (dependent_id, prerequisite_id) VALUES (?, ?)")
            .bind(dependent_id)
            .bind(prerequisite_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // ========== Statistics ==========

    async fn stats(&self) -> Result<GraphStats> {
        let (concepts, axioms): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(is_axiom), 0) FROM concepts")
                .fetch_one(&self.pool)
                .await?;
        let (requires_edges,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM requires")
            .fetch_one(&self.pool)
            .await?;

        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT domain, COUNT(*) FROM concepts GROUP BY domain")
                .fetch_all(&self.pool)
                .await?;

        let mut by_domain = BTreeMap::new();
        for (domain, count) in rows {
            by_domain.insert(domain.parse::<Domain>()?, count as u64);
        }

        Ok(GraphStats {
            concepts: concepts as u64,
            requires_edges: requires_edges as u64,
            axioms: axioms as u64,
            by_domain,
        })
    }
}

// ========== Row Types ==========

#[derive(Debug, FromRow)]
struct ConceptRow {
    id: String,
    name: String,
    definition_md: String,
    domain: String,
    subfield: String,
    complexity_level: i64,
    books: String,
    papers: String,
    articles: String,
    related_concepts: String,
    is_axiom: bool,
    is_verified: bool,
    created_at: String,
}

impl ConceptRow {
    fn into_concept(self) -> Result<Concept> {
        let domain: Domain = self.domain.parse()?;
        let complexity_level = u32::try_from(self.complexity_level).map_err(|_| {
            Error::InvalidConcept(format!(
                "concept {} has invalid complexity {}",
                self.id, self.complexity_level
            ))
        })?;

        Ok(Concept {
            books: parse_list(&self.id, "books", &self.books),
            papers: parse_list(&self.id, "papers", &self.papers),
            articles: parse_list(&self.id, "articles", &self.articles),
            related_concepts: parse_list(&self.id, "related_concepts", &self.related_concepts),
            created_at: parse_timestamp(&self.created_at),
            id: self.id,
            name: self.name,
            definition_md: self.definition_md,
            domain,
            subfield: self.subfield,
            complexity_level,
            is_axiom: self.is_axiom,
            is_verified: self.is_verified,
        })
    }
}

fn parse_list(id: &str, column: &str, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(concept_id = %id, column, error = %e, "Malformed list column, treating as empty");
        Vec::new()
    })
}

/// RFC 3339 as written by `create`, or SQLite's `CURRENT_TIMESTAMP` format
fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc()))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> SqliteConceptRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        run_migrations(&pool).await.unwrap();
        SqliteConceptRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_and_round_trip_fields() {
        let repo = setup_test_db().await;

        let concept = Concept::new("Function", Domain::Math, "set_theory")
            .with_definition("## Function\n\nA relation $f \\subseteq A \\times B$.")
            .with_complexity(2)
            .with_related(vec!["Bijection".to_string()])
            .with_resources(
                vec!["Naive Set Theory".to_string()],
                vec![],
                vec!["https://en.wikipedia.org/wiki/Function_(mathematics)".to_string()],
            );
        let created = repo.create(concept.clone()).await.unwrap();

        let loaded = repo.get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "Function");
        assert_eq!(loaded.domain, Domain::Math);
        assert_eq!(loaded.complexity_level, 2);
        assert_eq!(loaded.related_concepts, ["Bijection"]);
        assert_eq!(loaded.books, ["Naive Set Theory"]);
        assert_eq!(loaded.articles.len(), 1);
        assert_eq!(loaded.definition_md, concept.definition_md);
        assert!(!loaded.is_axiom);
    }

    #[tokio::test]
    async fn test_name_lookup_ignores_case() {
        let repo = setup_test_db().await;
        repo.create(Concept::new("Cartesian Product", Domain::Math, "set_theory").with_complexity(1))
            .await
            .unwrap();

        let found = repo.get_by_name("cartesian PRODUCT").await.unwrap();
        assert!(found.is_some());
        assert!(repo.get_by_name("Product").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_lookup_folds_non_ascii_case() {
        let repo = setup_test_db().await;
        let etale = repo
            .create(Concept::new("Étale Morphism", Domain::Math, "algebraic_geometry").with_complexity(2))
            .await
            .unwrap();

        let found = repo.get_by_name(" étale morphism ").await.unwrap().unwrap();
        assert_eq!(found.id, etale.id);
        assert_eq!(found.name, "Étale Morphism");
        assert!(repo.get_by_name("Étale").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_invalid_axioms() {
        let repo = setup_test_db().await;
        let set = Concept::new("Set", Domain::Math, "set_theory").as_axiom();
        repo.create(set.clone()).await.unwrap();

        assert!(matches!(repo.create(set).await, Err(Error::InvalidConcept(_))));

        let bad = Concept::new("Union", Domain::Math, "set_theory")
            .as_axiom()
            .with_complexity(2);
        assert!(matches!(repo.create(bad).await, Err(Error::InvalidConcept(_))));
    }

    #[tokio::test]
    async fn test_requires_merge_and_incomplete() {
        let repo = setup_test_db().await;
        let set = repo
            .create(Concept::new("Set", Domain::Math, "set_theory").as_axiom())
            .await
            .unwrap();
        let relation = repo
            .create(Concept::new("Relation", Domain::Math, "set_theory").with_complexity(1))
            .await
            .unwrap();
        let function = repo
            .create(Concept::new("Function", Domain::Math, "set_theory").with_complexity(2))
            .await
            .unwrap();

        repo.add_requires(&relation.id, &set.id).await.unwrap();
        repo.add_requires(&relation.id, &set.id).await.unwrap();

        let prereqs = repo.get_prerequisites(&relation.id).await.unwrap();
        assert_eq!(prereqs.len(), 1);
        assert_eq!(prereqs[0].id, set.id);

        let incomplete = repo.get_incomplete_concepts(Domain::Math).await.unwrap();
        assert_eq!(incomplete.len(), 1);
        assert_eq!(incomplete[0].id, function.id);

        assert!(matches!(
            repo.add_requires(&function.id, "nope").await,
            Err(Error::ConceptNotFound(_))
        ));

        let stats = repo.stats().await.unwrap();
        assert_eq!(stats.concepts, 3);
        assert_eq!(stats.requires_edges, 1);
        assert_eq!(stats.axioms, 1);
        assert_eq!(stats.by_domain.get(&Domain::Math), Some(&3));
    }

    #[tokio::test]
    async fn test_range_queries_keep_insertion_order() {
        let repo = setup_test_db().await;
        for (name, level) in [("Set", 0), ("Relation", 1), ("Function", 2), ("Group", 4)] {
            let concept = Concept::new(name, Domain::Math, "algebra").with_complexity(level);
            let concept = if level == 0 { concept.as_axiom() } else { concept };
            repo.create(concept).await.unwrap();
        }

        let names = |cs: Vec<Concept>| cs.into_iter().map(|c| c.name).collect::<Vec<_>>();

        assert_eq!(names(repo.get_axioms(Domain::Math).await.unwrap()), ["Set"]);
        assert_eq!(
            names(repo.get_by_complexity_range(Domain::Math, 1, 3).await.unwrap()),
            ["Relation", "Function"]
        );
        assert_eq!(
            names(repo.get_complex_concepts(Domain::Math, 2).await.unwrap()),
            ["Function", "Group"]
        );
        assert!(repo.get_by_domain(Domain::Cs).await.unwrap().is_empty());
    }
}
