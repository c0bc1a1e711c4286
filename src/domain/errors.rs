//! Error taxonomy for the domain layer.
//!
//! Stores surface `Persistence` immediately without partial cache mutation;
//! the use case propagates the first failure to its caller and performs no
//! further steps. Every variant renders as a message the calling UI can
//! display without leaking internal field names.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The referenced entity does not exist, or is archived/inactive.
    #[error("{entity} was not found")]
    NotFound { entity: &'static str },

    /// The request broke a business rule; the message says which one.
    #[error("{0}")]
    Validation(String),

    /// The underlying repository write or read failed.
    #[error("your changes could not be saved")]
    Persistence(#[source] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str) -> Self {
        DomainError::NotFound { entity }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn persistence(source: anyhow::Error) -> Self {
        DomainError::Persistence(source)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DomainError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}
