//! Content type registry.
//!
//! Holds the content types registered by declarations during boot. Types
//! live in memory for the lifetime of the kernel.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use serde_json::Value;
use tipo_sdk::HostError;
use tipo_sdk::host::TypeRegistry;
use tipo_sdk::types::RegistrationPayload;
use tracing::info;

/// A content type as stored by the registry.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredType {
    /// Machine identifier.
    pub identifier: String,
    /// Payload exactly as submitted.
    pub payload: RegistrationPayload,
    /// When the type was registered.
    pub registered_at: DateTime<Utc>,
}

impl RegisteredType {
    /// Plural display label, falling back to the identifier.
    pub fn label(&self) -> &str {
        self.payload.label("name").unwrap_or(self.identifier.as_str())
    }

    /// Menu position, or `i64::MAX` when the payload has none.
    pub fn menu_position(&self) -> i64 {
        self.payload
            .get("menu_position")
            .and_then(Value::as_i64)
            .unwrap_or(i64::MAX)
    }
}

/// Registry of content types.
///
/// Cheap to clone; clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    inner: Arc<DashMap<String, RegisteredType>>,
}

impl ContentTypeRegistry {
    /// Create a new, empty content type registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a content type by identifier.
    pub fn get(&self, identifier: &str) -> Option<RegisteredType> {
        self.inner.get(identifier).map(|r| r.clone())
    }

    /// List all content types ordered by menu position, then identifier.
    pub fn list(&self) -> Vec<RegisteredType> {
        let mut types: Vec<RegisteredType> =
            self.inner.iter().map(|r| r.value().clone()).collect();
        types.sort_by(|a, b| {
            a.menu_position()
                .cmp(&b.menu_position())
                .then_with(|| a.identifier.cmp(&b.identifier))
        });
        types
    }

    /// List content type identifiers, sorted.
    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Check if a content type exists.
    pub fn exists(&self, identifier: &str) -> bool {
        self.inner.contains_key(identifier)
    }

    /// Get the number of registered content types.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Check the shape of the keys the kernel relies on.
fn validate(identifier: &str, payload: &RegistrationPayload) -> Result<(), HostError> {
    if identifier.is_empty() {
        return Err(HostError::rejected(identifier, "identifier is empty"));
    }

    if payload.get("labels").is_some_and(|labels| !labels.is_object()) {
        return Err(HostError::rejected(identifier, "labels must be an object"));
    }

    if let Some(position) = payload.get("menu_position").filter(|p| !p.is_i64()) {
        return Err(HostError::rejected(
            identifier,
            format!("menu_position must be an integer, got {position}"),
        ));
    }

    if let Some(supports) = payload.get("supports") {
        let all_strings = supports
            .as_array()
            .is_some_and(|features| features.iter().all(Value::is_string));
        if !all_strings {
            return Err(HostError::rejected(
                identifier,
                "supports must be an array of strings",
            ));
        }
    }

    Ok(())
}

impl TypeRegistry for ContentTypeRegistry {
    fn type_exists(&self, identifier: &str) -> bool {
        self.exists(identifier)
    }

    fn register_type(
        &self,
        identifier: &str,
        payload: RegistrationPayload,
    ) -> Result<(), HostError> {
        validate(identifier, &payload)?;

        match self.inner.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(HostError::AlreadyRegistered(identifier.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(RegisteredType {
                    identifier: identifier.to_string(),
                    payload,
                    registered_at: Utc::now(),
                });
                info!(type_name = %identifier, "registered content type");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use tipo_sdk::types::OptionMap;

    fn payload(value: Value) -> RegistrationPayload {
        let map: OptionMap = serde_json::from_value(value).unwrap();
        RegistrationPayload::new(map)
    }

    #[test]
    fn register_and_lookup() {
        let registry = ContentTypeRegistry::new();
        assert!(registry.is_empty());

        registry
            .register_type(
                "movie_review",
                payload(json!({"labels": {"name": "Movie Reviews"}, "menu_position": 5})),
            )
            .unwrap();

        assert!(registry.type_exists("movie_review"));
        assert_eq!(registry.len(), 1);
        let registered = registry.get("movie_review").unwrap();
        assert_eq!(registered.label(), "Movie Reviews");
        assert_eq!(registered.menu_position(), 5);
    }

    #[test]
    fn duplicate_identifier_rejected() {
        let registry = ContentTypeRegistry::new();
        registry.register_type("book", payload(json!({}))).unwrap();

        let err = registry.register_type("book", payload(json!({}))).unwrap_err();
        assert_eq!(err, HostError::AlreadyRegistered("book".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn malformed_payloads_rejected() {
        let registry = ContentTypeRegistry::new();

        for bad in [
            json!({"labels": "Books"}),
            json!({"menu_position": "top"}),
            json!({"menu_position": 2.5}),
            json!({"supports": "title"}),
            json!({"supports": ["title", 3]}),
        ] {
            let err = registry.register_type("book", payload(bad.clone())).unwrap_err();
            assert!(matches!(err, HostError::Rejected { .. }), "accepted {bad}");
        }

        assert!(registry.register_type("", payload(json!({}))).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn list_orders_by_menu_position() {
        let registry = ContentTypeRegistry::new();
        registry
            .register_type("zebra", payload(json!({"menu_position": 1})))
            .unwrap();
        registry
            .register_type("apple", payload(json!({"menu_position": 20})))
            .unwrap();
        registry.register_type("mango", payload(json!({}))).unwrap();
        registry
            .register_type("banana", payload(json!({"menu_position": 20})))
            .unwrap();

        let order: Vec<String> = registry.list().into_iter().map(|t| t.identifier).collect();
        assert_eq!(order, vec!["zebra", "apple", "banana", "mango"]);
        assert_eq!(registry.type_names(), vec!["apple", "banana", "mango", "zebra"]);
    }

    #[test]
    fn clones_share_storage() {
        let registry = ContentTypeRegistry::new();
        let clone = registry.clone();
        registry.register_type("book", payload(json!({}))).unwrap();
        assert!(clone.exists("book"));
    }
}
