//! Centralized error types for the Strata workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Prefixes the message with the name of the failing operation,
    /// keeping the variant.
    pub fn context(self, op: impl std::fmt::Display) -> Self {
        match self {
            Self::Provider(m) => Self::Provider(format!("{op}: {m}")),
            Self::Cache(m) => Self::Cache(format!("{op}: {m}")),
            Self::Serialization(m) => Self::Serialization(format!("{op}: {m}")),
            Self::InvalidInput(m) => Self::InvalidInput(format!("{op}: {m}")),
            Self::Config(m) => Self::Config(format!("{op}: {m}")),
            Self::Internal(m) => Self::Internal(format!("{op}: {m}")),
        }
    }

    pub fn is_cache(&self) -> bool {
        matches!(self, Self::Cache(_))
    }
}

impl From<serde_json::Error> for StrataError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}

pub type StrataResult<T> = Result<T, StrataError>;
