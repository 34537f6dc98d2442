//! Kernel error types.

use thiserror::Error;
use tipo_sdk::{DeclarationError, HostError};

/// Kernel errors.
#[derive(Debug, Error)]
pub enum KernelError {
    /// One or more content types failed to register during boot.
    #[error("{} content type registration(s) failed: {}", .0.len(), join(.0))]
    Registration(Vec<HostError>),

    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    #[error("unknown content type: {0}")]
    UnknownType(String),
}

fn join(errors: &[HostError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type alias using KernelError.
pub type KernelResult<T> = Result<T, KernelError>;
