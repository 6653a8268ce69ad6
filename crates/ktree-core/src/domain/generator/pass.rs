//! Pass results and the seam the orchestrator drives

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::concept::Domain;
use crate::error::{Error, Result};

/// Direction of an expansion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PassDirection {
    /// Axioms toward more complex concepts
    Forward,
    /// Complex concepts toward their missing prerequisites
    Backward,
}

impl PassDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "forward",
            Self::Backward => "backward",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

impl fmt::Display for PassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "forward" => Ok(Self::Forward),
            "backward" => Ok(Self::Backward),
            _ => Err(Error::InvalidPassType(s.to_string())),
        }
    }
}

/// Outcome of one pass; never persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassResult {
    pub direction: PassDirection,
    pub concepts_added: usize,
    /// Candidates that already existed in the store
    pub concepts_skipped: usize,
    /// `REQUIRES` edges created or merged (backward passes)
    pub prerequisites_linked: usize,
    pub errors: Vec<String>,
}

impl PassResult {
    pub fn new(direction: PassDirection) -> Self {
        Self {
            direction,
            concepts_added: 0,
            concepts_skipped: 0,
            prerequisites_linked: 0,
            errors: Vec::new(),
        }
    }
}

/// One expansion engine, as seen by the orchestrator
#[async_trait]
pub trait ExpansionPass: Send {
    fn direction(&self) -> PassDirection;

    /// Add up to `target` new concepts across `domains`
    ///
    /// Per-candidate failures land in [`PassResult::errors`]; the pass itself
    /// never fails.
    async fn run(&mut self, domains: &[Domain], target: usize) -> PassResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parsing() {
        assert_eq!("forward".parse::<PassDirection>().unwrap(), PassDirection::Forward);
        assert_eq!("BACKWARD".parse::<PassDirection>().unwrap(), PassDirection::Backward);
        assert!(matches!(
            "sideways".parse::<PassDirection>(),
            Err(Error::InvalidPassType(_))
        ));
    }

    #[test]
    fn test_flipped() {
        assert_eq!(PassDirection::Forward.flipped(), PassDirection::Backward);
        assert_eq!(PassDirection::Backward.flipped(), PassDirection::Forward);
    }
}
