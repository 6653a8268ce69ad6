//! Domain layer
//!
//! Concept model, extraction contracts, the generator engines and the MVG
//! reconstructor. Nothing here knows about HTTP or SQL.

pub mod concept;
pub mod extraction;
pub mod generator;
pub mod mvg;
