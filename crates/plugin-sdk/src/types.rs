//! Core types shared between declarations and the host.
//!
//! Payloads are JSON objects so hosts can pass them through to their own
//! storage untouched. Merging is always shallow: a caller-supplied key
//! replaces the default of the same name wholesale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Free-form option object passed through to the host.
pub type OptionMap = serde_json::Map<String, serde_json::Value>;

/// Display labels a caller may supply for a content type.
///
/// Any label left as `None` is derived when the declaration is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default)]
    pub menu: Option<String>,
}

impl Labels {
    pub fn singular(mut self, label: impl Into<String>) -> Self {
        self.singular = Some(label.into());
        self
    }

    pub fn plural(mut self, label: impl Into<String>) -> Self {
        self.plural = Some(label.into());
        self
    }

    pub fn menu(mut self, label: impl Into<String>) -> Self {
        self.menu = Some(label.into());
        self
    }
}

/// Fully resolved display labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedLabels {
    pub singular: String,
    pub plural: String,
    pub menu: String,
}

/// One contextual help message.
///
/// Without a context the message applies to the screen whose id equals the
/// content type identifier; with one it applies to `"{context}-{identifier}"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpEntry {
    #[serde(default)]
    pub context: Option<String>,
    pub message: String,
}

impl HelpEntry {
    /// Help shown on the type's own screen.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            context: None,
            message: message.into(),
        }
    }

    /// Help shown on the `{context}-{identifier}` screen.
    pub fn in_context(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            message: message.into(),
        }
    }

    /// Screen id this entry targets for the given identifier.
    pub fn screen_id(&self, identifier: &str) -> String {
        match &self.context {
            Some(context) => format!("{context}-{identifier}"),
            None => identifier.to_string(),
        }
    }
}

/// Admin screen context passed to screen hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    /// Screen id, e.g. `"movie_review"` or `"edit-movie_review"`.
    pub id: String,

    /// Content type being edited on this screen, if any.
    #[serde(default)]
    pub item_type: Option<String>,
}

impl Screen {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: None,
        }
    }

    pub fn editing(mut self, item_type: impl Into<String>) -> Self {
        self.item_type = Some(item_type.into());
        self
    }
}

/// Shallow merge: every key in `overrides` replaces the key in `defaults`.
///
/// Nested objects are not merged; an override of `labels` replaces the whole
/// default label block.
pub fn merge_shallow(mut defaults: OptionMap, overrides: &OptionMap) -> OptionMap {
    for (key, value) in overrides {
        defaults.insert(key.clone(), value.clone());
    }
    defaults
}

/// The merged object handed to [`TypeRegistry::register_type`](crate::host::TypeRegistry::register_type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationPayload(OptionMap);

impl RegistrationPayload {
    pub fn new(options: OptionMap) -> Self {
        Self(options)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// A string from the `labels` sub-object, if present.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.0
            .get("labels")
            .and_then(|labels| labels.get(key))
            .and_then(|v| v.as_str())
    }

    pub fn as_map(&self) -> &OptionMap {
        &self.0
    }
}

/// The merged query handed to [`ItemSource::fetch_items`](crate::host::ItemSource::fetch_items).
///
/// Default keys: `per_page` (`-1` = unbounded), `item_type`, `status`,
/// `order_by`, `order`. Hosts are free to accept more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryPayload(OptionMap);

impl QueryPayload {
    pub fn new(query: OptionMap) -> Self {
        Self(query)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// A string-valued query key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    /// An integer-valued query key.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(|v| v.as_i64())
    }

    pub fn as_map(&self) -> &OptionMap {
        &self.0
    }
}

/// A content item as returned by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier (UUIDv7, time-sortable).
    pub id: Uuid,

    /// Content type identifier (e.g., "movie_review").
    pub item_type: String,

    /// Item title.
    pub title: String,

    /// Dynamic fields as key-value pairs.
    #[serde(default)]
    pub fields: HashMap<String, serde_json::Value>,

    /// Publication status (0 = unpublished, 1 = published).
    pub status: i32,

    /// Author user ID.
    pub author_id: Uuid,

    /// Unix timestamp when created.
    pub created: i64,

    /// Unix timestamp when last changed.
    pub changed: i64,
}

impl ContentItem {
    /// Get a field value as a specific type.
    pub fn get_field<T: for<'de> Deserialize<'de>>(&self, name: &str) -> Option<T> {
        self.fields
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn is_published(&self) -> bool {
        self.status == 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> OptionMap {
        match value {
            serde_json::Value::Object(m) => m,
            _ => OptionMap::new(),
        }
    }

    #[test]
    fn merge_shallow_caller_wins() {
        let merged = merge_shallow(
            map(json!({"menu_position": 20, "public": true})),
            &map(json!({"menu_position": 5})),
        );
        assert_eq!(merged["menu_position"], json!(5));
        assert_eq!(merged["public"], json!(true));
    }

    #[test]
    fn merge_shallow_replaces_nested_objects() {
        let merged = merge_shallow(
            map(json!({"rewrite": {"slug": "movie-review", "with_front": true}})),
            &map(json!({"rewrite": {"slug": "reviews"}})),
        );
        assert_eq!(merged["rewrite"], json!({"slug": "reviews"}));
    }

    #[test]
    fn help_entry_screen_ids() {
        assert_eq!(HelpEntry::new("A").screen_id("movie_review"), "movie_review");
        assert_eq!(
            HelpEntry::in_context("edit", "B").screen_id("movie_review"),
            "edit-movie_review"
        );
    }

    #[test]
    fn help_entry_context_is_optional_in_serde() {
        let entry: HelpEntry = serde_json::from_value(json!({"message": "A"})).unwrap();
        assert_eq!(entry, HelpEntry::new("A"));
    }

    #[test]
    fn registration_payload_label_lookup() {
        let payload = RegistrationPayload::new(map(json!({"labels": {"name": "Movies"}})));
        assert_eq!(payload.label("name"), Some("Movies"));
        assert_eq!(payload.label("menu_name"), None);
    }

    #[test]
    fn content_item_fields_and_status() {
        let mut item = ContentItem {
            id: Uuid::nil(),
            item_type: "person".into(),
            title: "Ridley Scott".into(),
            fields: HashMap::from([("born".to_string(), json!(1937))]),
            status: 1,
            author_id: Uuid::nil(),
            created: 0,
            changed: 0,
        };

        assert_eq!(item.get_field::<i64>("born"), Some(1937));
        assert_eq!(item.get_field::<String>("born"), None);
        assert_eq!(item.get_field::<i64>("died"), None);
        assert!(item.is_published());

        item.status = 0;
        assert!(!item.is_published());
    }
}
