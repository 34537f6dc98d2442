//! Error types for declarations and host calls.

use thiserror::Error;

/// Errors reported by a host entry point.
///
/// The SDK never retries or recovers from these; they propagate to the
/// caller exactly as the host produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host refused the registration payload.
    #[error("content type {identifier:?} rejected: {reason}")]
    Rejected { identifier: String, reason: String },

    /// A type with this identifier already exists in the host registry.
    #[error("content type {0:?} is already registered")]
    AlreadyRegistered(String),
}

impl HostError {
    pub fn rejected(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while building or registering a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// The declaration input is unusable, e.g. it has no name.
    #[error("invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// The host rejected the registration.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type alias using DeclarationError.
pub type DeclarationResult<T> = Result<T, DeclarationError>;
