//! Minimum viable graph (MVG) reconstruction
//!
//! Asks the generative backend for the shortest axiom-to-target learning path
//! and annotates each step with the id of a matching stored concept, if any.
//! The store is only read; unmatched steps stay virtual.

mod service;

pub use service::{MvgNode, MvgResult, MvgService};
