//! Translation catalog.
//!
//! A flat table of source string → translated string, loaded from TOML:
//!
//! ```toml
//! "Add New Movie Review" = "Nuova recensione"
//! "Movie Reviews" = "Recensioni"
//! ```
//!
//! Strings missing from the table are returned unchanged.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tipo_sdk::host::Translator;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    strings: HashMap<String, String>,
}

impl Catalog {
    /// An empty catalog; every lookup passes through.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read translations file: {}", path.display()))?;

        Self::parse_str(&content)
            .with_context(|| format!("failed to parse translations at {}", path.display()))
    }

    /// Parse a catalog from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self> {
        let strings: HashMap<String, String> =
            toml::from_str(content).context("translations must be a table of strings")?;
        Ok(Self { strings })
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl Translator for Catalog {
    fn translate(&self, text: &str) -> String {
        self.strings
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_strings() {
        let catalog = Catalog::parse_str(
            r#"
            "Movie Reviews" = "Recensioni"
            "Add New Movie Review" = "Nuova recensione"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.translate("Movie Reviews"), "Recensioni");
        assert_eq!(catalog.translate("Edit Movie Review"), "Edit Movie Review");
    }

    #[test]
    fn empty_catalog_passes_through() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert_eq!(catalog.translate("Books"), "Books");
    }

    #[test]
    fn rejects_non_string_values() {
        assert!(Catalog::parse_str("count = 3").is_err());
    }
}
