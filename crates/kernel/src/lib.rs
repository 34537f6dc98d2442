//! Tipo Kernel Library
//!
//! A reference host for content type declarations: tap registry, content
//! type registry, item store, and translation catalog. The `tipo` binary
//! drives it from a manifest file.

pub mod config;
pub mod content;
pub mod error;
pub mod manifest;
pub mod state;
pub mod tap;

pub use error::{KernelError, KernelResult};
pub use state::{BootReport, Kernel};
