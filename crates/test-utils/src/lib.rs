//! Tipo test utilities.
//!
//! Helpers for integration testing: a recording host, item builders, and
//! sample declarations.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value as JsonValue;
use tipo_sdk::HostError;
use tipo_sdk::host::{
    HeadCallback, HelpCallback, Host, InitCallback, ItemSource, Lifecycle, Router,
    TitleCallback, Translator, TypeRegistry,
};
use tipo_sdk::types::{ContentItem, QueryPayload, RegistrationPayload, Screen};
use uuid::Uuid;

/// Create a test item with default values.
pub fn test_item(item_type: &str, title: &str) -> TestItem {
    TestItem {
        id: Uuid::now_v7(),
        item_type: item_type.to_string(),
        title: title.to_string(),
        author_id: Uuid::nil(),
        status: 1,
        fields: HashMap::new(),
        created: 0,
    }
}

/// A test item builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestItem {
    pub id: Uuid,
    pub item_type: String,
    pub title: String,
    pub author_id: Uuid,
    pub status: i32,
    pub fields: HashMap<String, JsonValue>,
    pub created: i64,
}

impl TestItem {
    /// Set as unpublished.
    pub fn unpublished(mut self) -> Self {
        self.status = 0;
        self
    }

    /// Set the creation timestamp (also used as the changed timestamp).
    pub fn created_at(mut self, timestamp: i64) -> Self {
        self.created = timestamp;
        self
    }

    /// Add a single field.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Add a text field.
    pub fn with_text_field(self, name: &str, value: &str, format: &str) -> Self {
        self.with_field(
            name,
            serde_json::json!({
                "value": value,
                "format": format
            }),
        )
    }

    pub fn build(self) -> ContentItem {
        ContentItem {
            id: self.id,
            item_type: self.item_type,
            title: self.title,
            fields: self.fields,
            status: self.status,
            author_id: self.author_id,
            created: self.created,
            changed: self.created,
        }
    }
}

/// A host that records every call made to it.
///
/// `type_exists` reflects earlier successful `register_type` calls, so a
/// declaration can be driven through its whole lifecycle. Items are returned
/// from `fetch_items` as given, ignoring the query.
#[derive(Default)]
pub struct RecordingHost {
    base_url: String,
    items: Vec<ContentItem>,
    existing: Vec<String>,
    reject: Option<String>,
    translations: HashMap<String, String>,
    registered: Mutex<Vec<(String, RegistrationPayload)>>,
    queries: Mutex<Vec<QueryPayload>>,
    init: Mutex<Vec<InitCallback>>,
    help: Mutex<Vec<HelpCallback>>,
    head: Mutex<Vec<HeadCallback>>,
    title: Mutex<Vec<TitleCallback>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            ..Self::default()
        }
    }

    /// Base URL returned by `Router::base_url`, as given.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Items returned by every fetch.
    pub fn with_items(mut self, items: Vec<ContentItem>) -> Self {
        self.items = items;
        self
    }

    /// Pretend a type was registered before the test started.
    pub fn with_existing_type(mut self, identifier: &str) -> Self {
        self.existing.push(identifier.to_string());
        self
    }

    /// Reject every registration with this reason.
    pub fn rejecting(mut self, reason: &str) -> Self {
        self.reject = Some(reason.to_string());
        self
    }

    /// Translate `from` to `to`; other strings pass through.
    pub fn with_translation(mut self, from: &str, to: &str) -> Self {
        self.translations.insert(from.to_string(), to.to_string());
        self
    }

    /// Number of `register_type` calls that succeeded.
    pub fn register_calls(&self) -> usize {
        self.registered.lock().map(|r| r.len()).unwrap_or_default()
    }

    /// Payload registered for an identifier, if any.
    pub fn payload(&self, identifier: &str) -> Option<RegistrationPayload> {
        self.registered.lock().ok().and_then(|registered| {
            registered
                .iter()
                .find(|(id, _)| id == identifier)
                .map(|(_, payload)| payload.clone())
        })
    }

    /// Every query passed to `fetch_items`, in call order.
    pub fn queries(&self) -> Vec<QueryPayload> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Run and drop every pending init callback.
    pub fn run_init(&self) -> Vec<Result<(), HostError>> {
        let callbacks: Vec<InitCallback> = match self.init.lock() {
            Ok(mut init) => init.drain(..).collect(),
            Err(_) => return Vec::new(),
        };
        let host: &dyn Host = self;
        callbacks.into_iter().map(|callback| callback(host)).collect()
    }

    pub fn init_count(&self) -> usize {
        self.init.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn help_count(&self) -> usize {
        self.help.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn head_count(&self) -> usize {
        self.head.lock().map(|c| c.len()).unwrap_or_default()
    }

    pub fn title_count(&self) -> usize {
        self.title.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Fold help through every attached help callback.
    pub fn help_for(&self, default_help: &str, screen: &Screen) -> String {
        match self.help.lock() {
            Ok(help) => help
                .iter()
                .fold(default_help.to_string(), |acc, callback| callback(acc, screen)),
            Err(_) => default_help.to_string(),
        }
    }

    /// Concatenate every attached head callback.
    pub fn head_markup(&self) -> String {
        match self.head.lock() {
            Ok(head) => head.iter().map(|callback| callback()).collect(),
            Err(_) => String::new(),
        }
    }

    /// Fold the title placeholder through every attached title callback.
    pub fn title_for(&self, default: &str, screen: &Screen) -> String {
        match self.title.lock() {
            Ok(title) => title
                .iter()
                .fold(default.to_string(), |acc, callback| callback(acc, screen)),
            Err(_) => default.to_string(),
        }
    }
}

impl TypeRegistry for RecordingHost {
    fn type_exists(&self, identifier: &str) -> bool {
        self.existing.iter().any(|id| id == identifier)
            || self
                .registered
                .lock()
                .map(|r| r.iter().any(|(id, _)| id == identifier))
                .unwrap_or_default()
    }

    fn register_type(
        &self,
        identifier: &str,
        payload: RegistrationPayload,
    ) -> Result<(), HostError> {
        if let Some(reason) = &self.reject {
            return Err(HostError::rejected(identifier, reason.clone()));
        }
        if let Ok(mut registered) = self.registered.lock() {
            registered.push((identifier.to_string(), payload));
        }
        Ok(())
    }
}

impl ItemSource for RecordingHost {
    fn fetch_items(&self, query: &QueryPayload) -> Vec<ContentItem> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.items.clone()
    }
}

impl Router for RecordingHost {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

impl Translator for RecordingHost {
    fn translate(&self, text: &str) -> String {
        self.translations
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }
}

impl Lifecycle for RecordingHost {
    fn on_init(&self, callback: InitCallback) {
        if let Ok(mut init) = self.init.lock() {
            init.push(callback);
        }
    }

    fn on_help_screen(&self, callback: HelpCallback) {
        if let Ok(mut help) = self.help.lock() {
            help.push(callback);
        }
    }

    fn on_admin_head(&self, callback: HeadCallback) {
        if let Ok(mut head) = self.head.lock() {
            head.push(callback);
        }
    }

    fn on_title_placeholder(&self, callback: TitleCallback) {
        if let Ok(mut title) = self.title.lock() {
            title.push(callback);
        }
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{key}', got: {value}"
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{needle}'\nActual: {haystack}"
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{needle}'\nActual: {haystack}"
        );
    }
}

/// Declaration fixtures.
pub mod declarations {
    use tipo_sdk::types::{HelpEntry, Labels};
    use tipo_sdk::{Declaration, DeclarationResult};

    /// `movie_review` with every label derived.
    pub fn movie_review() -> DeclarationResult<Declaration> {
        Declaration::new("movie_review")
    }

    /// `movie_review` with help on its list and edit screens and an icon.
    pub fn movie_review_with_help() -> DeclarationResult<Declaration> {
        Declaration::builder("Movie Review")
            .icon("f008")
            .help(HelpEntry::new("A"))
            .help(HelpEntry::in_context("edit", "B"))
            .build()
    }

    /// `person` with an irregular plural supplied by the caller.
    pub fn person() -> DeclarationResult<Declaration> {
        Declaration::builder("person")
            .labels(Labels::default().plural("People"))
            .option("menu_position", 5)
            .build()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use tipo_sdk::Declaration;
    use tipo_sdk::types::OptionMap;

    #[test]
    fn test_item_builder() {
        let item = test_item("movie_review", "Alien")
            .unpublished()
            .created_at(100)
            .with_text_field("body", "In space", "plain_text")
            .build();

        assert_eq!(item.item_type, "movie_review");
        assert_eq!(item.title, "Alien");
        assert_eq!(item.status, 0);
        assert_eq!(item.created, 100);
        assert_eq!(item.changed, 100);
        assert!(item.fields.contains_key("body"));
    }

    #[test]
    fn recording_host_tracks_registrations() {
        let host = RecordingHost::new();
        let decl = Arc::new(declarations::movie_review().unwrap());

        decl.declare(&host, &host);
        assert_eq!(host.init_count(), 1);
        assert_eq!(host.title_count(), 1);

        let results = host.run_init();
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(host.register_calls(), 1);
        assert!(host.type_exists("movie_review"));
        assert!(host.payload("movie_review").is_some());
        assert_eq!(host.init_count(), 0);
    }

    #[test]
    fn recording_host_records_queries() {
        let host = RecordingHost::new().with_items(vec![test_item("book", "Dune").build()]);
        let decl = Declaration::new("book").unwrap();

        assert_eq!(decl.list(&host, &OptionMap::new()).len(), 1);
        assert_eq!(host.queries().len(), 1);
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"name": "test", "value": 42});
        assert::has_key(&json, "name");
        assert::has_key(&json, "value");

        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}
