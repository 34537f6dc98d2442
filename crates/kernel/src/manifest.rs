//! Parser for content type manifest files.
//!
//! A manifest lists content type declarations and, optionally, seed items:
//!
//! ```toml
//! [[content_type]]
//! name = "Movie Review"
//! icon = "f008"
//!
//! [content_type.labels]
//! singular = "Review"
//!
//! [content_type.options]
//! menu_position = 5
//!
//! [[content_type.help]]
//! context = "edit"
//! message = "Write the review body below the title."
//!
//! [[item]]
//! item_type = "movie_review"
//! title = "Alien"
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;
use tipo_sdk::{Declaration, DeclarationConfig, DeclarationResult};

use crate::content::CreateItem;

/// A parsed manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Content type declarations, in file order.
    #[serde(default, rename = "content_type")]
    pub content_types: Vec<DeclarationConfig>,

    /// Items to seed the item store with.
    #[serde(default, rename = "item")]
    pub items: Vec<SeedItem>,
}

/// An item listed in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedItem {
    pub item_type: String,
    pub title: String,
    /// Publication status (default: 1, published).
    #[serde(default = "default_status")]
    pub status: i32,
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,
}

fn default_status() -> i32 {
    1
}

impl From<SeedItem> for CreateItem {
    fn from(seed: SeedItem) -> Self {
        CreateItem {
            status: seed.status,
            fields: seed.fields,
            ..CreateItem::new(seed.item_type, seed.title)
        }
    }
}

impl Manifest {
    /// Parse a manifest file from the given path.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest file: {}", path.display()))?;

        Self::parse_str(&content, path)
    }

    /// Parse a manifest from a TOML string.
    pub fn parse_str(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse manifest TOML at {}", path.display()))
    }

    /// Build the declarations listed in the manifest.
    ///
    /// Fails on the first invalid declaration.
    pub fn declarations(&self) -> DeclarationResult<Vec<Arc<Declaration>>> {
        self.content_types
            .iter()
            .cloned()
            .map(|config| Declaration::from_config(config).map(Arc::new))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tipo_sdk::DeclarationError;
    use tipo_sdk::types::HelpEntry;

    const MANIFEST: &str = r#"
[[content_type]]
name = "Movie Review"
icon = "f008"

[content_type.labels]
singular = "Review"

[content_type.options]
menu_position = 5
taxonomies = ["genre"]

[[content_type.help]]
message = "All reviews."

[[content_type.help]]
context = "edit"
message = "Write the review body below the title."

[[content_type]]
name = "book"

[[item]]
item_type = "movie_review"
title = "Alien"

[[item]]
item_type = "book"
title = "Dune"
status = 0
fields = { isbn = "978-0441013593" }
"#;

    #[test]
    fn parses_declarations_and_items() {
        let manifest = Manifest::parse_str(MANIFEST, Path::new("test.toml")).unwrap();
        assert_eq!(manifest.content_types.len(), 2);
        assert_eq!(manifest.items.len(), 2);

        let decls = manifest.declarations().unwrap();
        let review = &decls[0];
        assert_eq!(review.identifier(), "movie_review");
        assert_eq!(review.labels().singular, "Review");
        assert_eq!(review.labels().plural, "Reviews");
        assert_eq!(review.icon(), Some("f008"));
        assert_eq!(review.options()["menu_position"], json!(5));
        assert_eq!(review.options()["taxonomies"], json!(["genre"]));
        assert_eq!(
            review.help(),
            &[
                HelpEntry::new("All reviews."),
                HelpEntry::in_context("edit", "Write the review body below the title."),
            ]
        );

        assert_eq!(decls[1].identifier(), "book");
        assert_eq!(decls[1].labels().plural, "Books");
    }

    #[test]
    fn seed_items_default_to_published() {
        let manifest = Manifest::parse_str(MANIFEST, Path::new("test.toml")).unwrap();
        let alien: CreateItem = manifest.items[0].clone().into();
        assert_eq!(alien.status, 1);

        let dune: CreateItem = manifest.items[1].clone().into();
        assert_eq!(dune.status, 0);
        assert_eq!(dune.fields["isbn"], json!("978-0441013593"));
    }

    #[test]
    fn missing_name_is_invalid_declaration() {
        let manifest = Manifest::parse_str(
            "[[content_type]]\nicon = \"f008\"\n",
            Path::new("test.toml"),
        )
        .unwrap();
        assert!(matches!(
            manifest.declarations(),
            Err(DeclarationError::InvalidDeclaration(_))
        ));
    }

    #[test]
    fn empty_manifest() {
        let manifest = Manifest::parse_str("", Path::new("test.toml")).unwrap();
        assert!(manifest.content_types.is_empty());
        assert!(manifest.declarations().unwrap().is_empty());
    }

    #[test]
    fn reports_path_on_parse_error() {
        let err = Manifest::parse_str("[[content_type]\n", Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }
}
