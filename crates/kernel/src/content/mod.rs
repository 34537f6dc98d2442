//! Content management module.
//!
//! This module provides:
//! - ContentTypeRegistry: Content types registered by declarations
//! - ItemStore: Items answered to declaration queries
//! - Catalog: Translation table used for display labels

mod catalog;
mod item_store;
mod type_registry;

pub use catalog::Catalog;
pub use item_store::{CreateItem, ItemStore};
pub use type_registry::{ContentTypeRegistry, RegisteredType};
