//! Tipo SDK
//!
//! Declare custom content types for a host CMS. A [`Declaration`] derives
//! its identifier and display labels from a name, builds the registration
//! payload, and registers itself through the host traits in [`host`] when
//! the host initializes.

pub mod declaration;
pub mod error;
pub mod host;
pub mod types;
pub mod words;

pub use declaration::{
    Declaration, DeclarationBuilder, DeclarationConfig, ICON_FONT_HREF, declare_all, icon_font_hook,
};
pub use error::{DeclarationError, DeclarationResult, HostError};

// Re-export serde_json so declaration crates can build options without
// depending on it directly.
#[doc(hidden)]
pub use serde_json;

pub mod prelude {
    pub use crate::declaration::*;
    pub use crate::error::*;
    pub use crate::host::*;
    pub use crate::types::*;
    pub use crate::words::*;
}
