//! In-memory item store.
//!
//! Answers the query payloads built by declarations. Recognized query keys:
//!
//! | key | values | default |
//! |-----|--------|---------|
//! | `item_type` | content type identifier | any type |
//! | `status` | `"published"`, `"unpublished"`, `"any"` | `"any"` |
//! | `order_by` | `"title"`, `"created"`, `"changed"`, `"id"` | insertion order |
//! | `order` | `"ASC"`, `"DESC"` (case-insensitive) | `"ASC"` |
//! | `per_page` | page size, `-1` for unbounded | unbounded |
//! | `offset` | items to skip | `0` |
//!
//! Unknown keys are ignored.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;
use tipo_sdk::host::ItemSource;
use tipo_sdk::types::{ContentItem, QueryPayload};
use tracing::debug;
use uuid::Uuid;

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub item_type: String,
    pub title: String,
    pub status: i32,
    pub author_id: Uuid,
    pub fields: HashMap<String, serde_json::Value>,
}

impl CreateItem {
    /// A published item with no fields and the nil author.
    pub fn new(item_type: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            title: title.into(),
            status: 1,
            author_id: Uuid::nil(),
            fields: HashMap::new(),
        }
    }
}

/// Store of content items, kept in insertion order.
#[derive(Debug, Default)]
pub struct ItemStore {
    items: RwLock<Vec<ContentItem>>,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new item, stamping id and timestamps.
    pub fn create(&self, input: CreateItem) -> ContentItem {
        let now = Utc::now().timestamp();
        let item = ContentItem {
            id: Uuid::now_v7(),
            item_type: input.item_type,
            title: input.title,
            fields: input.fields,
            status: input.status,
            author_id: input.author_id,
            created: now,
            changed: now,
        };
        self.insert(item.clone());
        item
    }

    /// Store an existing item as is.
    pub fn insert(&self, item: ContentItem) {
        debug!(id = %item.id, item_type = %item.item_type, "item stored");
        self.items.write().push(item);
    }

    pub fn get(&self, id: Uuid) -> Option<ContentItem> {
        self.items.read().iter().find(|item| item.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Run a query against the store.
    pub fn query(&self, query: &QueryPayload) -> Vec<ContentItem> {
        let status = query.get_str("status").unwrap_or("any");
        let mut items: Vec<ContentItem> = self
            .items
            .read()
            .iter()
            .filter(|item| {
                query
                    .get_str("item_type")
                    .is_none_or(|wanted| item.item_type == wanted)
            })
            .filter(|item| match status {
                "published" => item.is_published(),
                "unpublished" => !item.is_published(),
                _ => true,
            })
            .cloned()
            .collect();

        if let Some(order_by) = query.get_str("order_by") {
            let descending = query
                .get_str("order")
                .is_some_and(|order| order.eq_ignore_ascii_case("DESC"));

            match comparator(order_by) {
                Some(cmp) if descending => items.sort_by(|a, b| cmp(b, a)),
                Some(cmp) => items.sort_by(cmp),
                None => debug!(order_by, "unknown order_by, keeping insertion order"),
            }
        }

        let offset = query
            .get_i64("offset")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        let per_page = query
            .get_i64("per_page")
            .and_then(|n| usize::try_from(n).ok());

        let page = items.into_iter().skip(offset);
        match per_page {
            Some(limit) => page.take(limit).collect(),
            None => page.collect(),
        }
    }
}

type ItemComparator = fn(&ContentItem, &ContentItem) -> Ordering;

fn by_title(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.title.cmp(&b.title)
}

fn by_created(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.created.cmp(&b.created)
}

fn by_changed(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.changed.cmp(&b.changed)
}

fn by_id(a: &ContentItem, b: &ContentItem) -> Ordering {
    a.id.cmp(&b.id)
}

fn comparator(order_by: &str) -> Option<ItemComparator> {
    let cmp: ItemComparator = match order_by {
        "title" => by_title,
        "created" => by_created,
        "changed" => by_changed,
        "id" => by_id,
        _ => return None,
    };
    Some(cmp)
}

impl ItemSource for ItemStore {
    fn fetch_items(&self, query: &QueryPayload) -> Vec<ContentItem> {
        self.query(query)
    }
}
