//! Error types for the Knowledge Tree

use thiserror::Error;

/// Result type alias using the Knowledge Tree's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Knowledge Tree error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Validation errors (E001-E099)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown domain '{0}'. Valid domains: MATH, PHYSICS, CHEMISTRY, BIOLOGY, CS.")]
    InvalidDomain(String),

    #[error("Unknown pass type '{0}'. Use `forward` or `backward`.")]
    InvalidPassType(String),

    #[error("Failed to parse LLM response: {0}")]
    InvalidLlmResponse(String),

    #[error("Invalid concept: {0}")]
    InvalidConcept(String),

    // Backend errors (E100-E199)
    #[error("Network error: {0}. Check your internet connection.")]
    NetworkError(#[from] reqwest::Error),

    #[error("LLM API error: {0}")]
    LLMError(String),

    #[error("Rate limited. Waiting {0} seconds before retry.")]
    RateLimited(u64),

    #[error("No text response from the generative backend")]
    EmptyGeneration,

    #[error("No suitable model found: {0}")]
    NoSuitableModel(String),

    #[error("Token budget exceeded ({0}/{1} tokens). Raise it with `ktree config set llm.token_budget <n>`.")]
    TokenBudgetExceeded(u64, u64),

    // Storage errors (E200-E299)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Concept '{0}' not found.")]
    ConceptNotFound(String),

    // Extraction errors (E300-E399)
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Generic errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Broad classification of an error, used by callers deciding how to react
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input from the caller or a malformed backend payload; never retried
    Validation,
    /// Generative backend or transport failure
    Backend,
    /// Concept store failure
    Storage,
    /// Extraction adapter failure
    Extraction,
    /// Configuration problem
    Config,
    /// Anything else
    Other,
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "E001",
            Self::InvalidDomain(_) => "E002",
            Self::InvalidPassType(_) => "E003",
            Self::InvalidLlmResponse(_) => "E004",
            Self::InvalidConcept(_) => "E005",
            Self::NetworkError(_) => "E100",
            Self::LLMError(_) => "E101",
            Self::RateLimited(_) => "E102",
            Self::EmptyGeneration => "E103",
            Self::NoSuitableModel(_) => "E104",
            Self::TokenBudgetExceeded(..) => "E105",
            Self::DatabaseError(_) => "E200",
            Self::ConceptNotFound(_) => "E201",
            Self::ExtractionFailed(_) => "E300",
            Self::ConfigError(_) => "E600",
            Self::Serialization(_) | Self::Other(_) | Self::Io(_) => "E9999",
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_)
            | Self::InvalidDomain(_)
            | Self::InvalidPassType(_)
            | Self::InvalidLlmResponse(_)
            | Self::InvalidConcept(_) => ErrorKind::Validation,
            Self::NetworkError(_)
            | Self::LLMError(_)
            | Self::RateLimited(_)
            | Self::EmptyGeneration
            | Self::NoSuitableModel(_)
            | Self::TokenBudgetExceeded(..) => ErrorKind::Backend,
            Self::DatabaseError(_) | Self::ConceptNotFound(_) => ErrorKind::Storage,
            Self::ExtractionFailed(_) => ErrorKind::Extraction,
            Self::ConfigError(_) => ErrorKind::Config,
            Self::Serialization(_) | Self::Other(_) | Self::Io(_) => ErrorKind::Other,
        }
    }

    /// Whether this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::InvalidDomain(_) => Some("Use one of: MATH, PHYSICS, CHEMISTRY, BIOLOGY, CS".to_string()),
            Self::InvalidPassType(_) => Some("ktree pass forward".to_string()),
            Self::NetworkError(_) => Some("Check internet connection".to_string()),
            Self::LLMError(msg) if is_auth_failure(msg) => {
                Some("Set KTREE_API_KEY or OPENROUTER_API_KEY".to_string())
            }
            Self::TokenBudgetExceeded(_, budget) => Some(format!(
                "ktree config set llm.token_budget {}",
                budget.saturating_mul(2)
            )),
            Self::ConfigError(_) => Some("ktree config list".to_string()),
            _ => None,
        }
    }
}

/// Missing or rejected credentials, as reported by the LLM client
fn is_auth_failure(message: &str) -> bool {
    message.starts_with("Unauthorized") || message.contains("API key")
}
