//! Bidirectional graph generation
//!
//! Forward passes mine related terms from low-complexity seeds and add them
//! one level up. Backward passes trace prerequisites of complex concepts and
//! add them one level down. The [`Orchestrator`] alternates the two in
//! fixed-size batches until a target count is reached.
//!
//! ```text
//!   axioms ──forward──▶ level n+1 concepts
//!                              │
//!   missing prereqs ◀─backward─┘
//! ```

mod backward;
mod formatter;
mod forward;
pub mod heuristics;
mod orchestrator;
mod pass;
mod synthesis;

pub use backward::BackwardPassEngine;
pub use formatter::{DefinitionFormatter, RawConceptData};
pub use forward::ForwardPassEngine;
pub use orchestrator::{GenerationResult, GenerationStatus, GeneratorDeps, Orchestrator};
pub use pass::{ExpansionPass, PassDirection, PassResult};
pub use synthesis::ConceptSynthesizer;
