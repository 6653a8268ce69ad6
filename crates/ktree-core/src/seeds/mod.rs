//! Curated seed concepts
//!
//! Each domain ships a small set of verified axioms and early definitions that
//! give the forward pass something to grow from. Seeds are loaded once; a seed
//! whose name already exists in the store is left alone.

mod math;
mod sciences;

use tracing::{debug, info};

use crate::domain::concept::{Concept, ConceptRepository, Domain, slugify};
use crate::error::Result;

/// A hand-written concept definition
#[derive(Debug, Clone, Copy)]
pub struct SeedDefinition {
    pub name: &'static str,
    pub subfield: &'static str,
    pub complexity_level: u32,
    pub is_axiom: bool,
    pub definition_md: &'static str,
    pub books: &'static [&'static str],
    /// Names of seeds in the same domain this one builds on
    pub prerequisites: &'static [&'static str],
}

impl SeedDefinition {
    pub fn to_concept(&self, domain: Domain) -> Concept {
        let concept = Concept::new(self.name, domain, self.subfield)
            .with_id(seed_id(domain, self.name))
            .with_definition(self.definition_md)
            .with_complexity(self.complexity_level)
            .with_resources(
                self.books.iter().map(|b| b.to_string()).collect(),
                Vec::new(),
                Vec::new(),
            )
            .verified();

        if self.is_axiom {
            concept.as_axiom()
        } else {
            concept
        }
    }
}

pub fn seeds_for(domain: Domain) -> &'static [SeedDefinition] {
    match domain {
        Domain::Math => math::SEEDS,
        Domain::Physics => sciences::PHYSICS,
        Domain::Chemistry => sciences::CHEMISTRY,
        Domain::Biology => sciences::BIOLOGY,
        Domain::Cs => sciences::CS,
    }
}

/// Stable id for a seed: `{domain}-seed-{slug}`
pub fn seed_id(domain: Domain, name: &str) -> String {
    format!("{}-seed-{}", domain.as_str().to_lowercase(), slugify(name, 64))
}

/// Create missing seeds for `domains`, then link their prerequisites
///
/// Returns the number of seeds created. Prerequisite edges are added for
/// every seed whose prerequisite exists, including seeds loaded earlier.
pub async fn load_seed_definitions(store: &dyn ConceptRepository, domains: &[Domain]) -> Result<usize> {
    let mut loaded = 0;

    for &domain in domains {
        let seeds = seeds_for(domain);
        info!(domain = %domain, count = seeds.len(), "Loading seed definitions");

        for seed in seeds {
            if store.get_by_name(seed.name).await?.is_some() {
                debug!(name = seed.name, "Seed already exists, skipping");
                continue;
            }
            store.create(seed.to_concept(domain)).await?;
            loaded += 1;
        }

        for seed in seeds {
            let Some(dependent) = store.get_by_name(seed.name).await? else {
                continue;
            };
            for prerequisite in seed.prerequisites {
                match store.get_by_name(prerequisite).await? {
                    Some(required) if required.id != dependent.id => {
                        store.add_requires(&dependent.id, &required.id).await?;
                    }
                    _ => debug!(name = seed.name, prerequisite, "Seed prerequisite not found"),
                }
            }
        }
    }

    info!(loaded, "Seed definitions loaded");
    Ok(loaded)
}
