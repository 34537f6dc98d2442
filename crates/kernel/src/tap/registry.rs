//! Tap registry - holds the handlers attached to each tap.
//!
//! Every tap keeps its handlers ordered by weight (lower = higher priority,
//! called first). Handlers with equal weight keep their attachment order.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tipo_sdk::host::{HeadCallback, HelpCallback, InitCallback, TitleCallback};

/// Runs once while the kernel boots.
pub const TAP_INIT: &str = "tap_init";
/// Filters contextual help on admin screens.
pub const TAP_CONTEXTUAL_HELP: &str = "tap_contextual_help";
/// Contributes markup to the admin page head.
pub const TAP_ADMIN_HEAD: &str = "tap_admin_head";
/// Filters the title placeholder on edit screens.
pub const TAP_ENTER_TITLE_HERE: &str = "tap_enter_title_here";

/// Known tap names.
pub const KNOWN_TAPS: &[&str] = &[
    TAP_INIT,
    TAP_CONTEXTUAL_HELP,
    TAP_ADMIN_HEAD,
    TAP_ENTER_TITLE_HERE,
];

/// Weight used when a handler does not ask for one.
pub const DEFAULT_WEIGHT: i32 = 10;

/// A registered tap handler with its priority.
#[derive(Clone)]
pub struct TapHandler<F> {
    /// Weight for ordering (lower = higher priority).
    pub weight: i32,
    pub callback: F,
}

impl<F> std::fmt::Debug for TapHandler<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapHandler")
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}

/// Insert keeping the list sorted by weight, after existing equal weights.
fn insert_weighted<F>(handlers: &mut Vec<TapHandler<F>>, weight: i32, callback: F) {
    let at = handlers.partition_point(|h| h.weight <= weight);
    handlers.insert(at, TapHandler { weight, callback });
}

/// Registry mapping taps to ordered handlers.
///
/// Init handlers sit behind a `Mutex` because running them consumes them.
/// Filter handlers are shared so a dispatch can snapshot the list and call
/// them with no lock held; a handler may attach further handlers.
#[derive(Debug, Default)]
pub struct TapRegistry {
    init: Mutex<Vec<TapHandler<InitCallback>>>,
    help: RwLock<Vec<TapHandler<Arc<HelpCallback>>>>,
    head: RwLock<Vec<TapHandler<Arc<HeadCallback>>>>,
    title: RwLock<Vec<TapHandler<Arc<TitleCallback>>>>,
}

impl TapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_init(&self, weight: i32, callback: InitCallback) {
        insert_weighted(&mut self.init.lock(), weight, callback);
    }

    pub fn add_help(&self, weight: i32, callback: HelpCallback) {
        insert_weighted(&mut self.help.write(), weight, Arc::new(callback));
    }

    pub fn add_head(&self, weight: i32, callback: HeadCallback) {
        insert_weighted(&mut self.head.write(), weight, Arc::new(callback));
    }

    pub fn add_title(&self, weight: i32, callback: TitleCallback) {
        insert_weighted(&mut self.title.write(), weight, Arc::new(callback));
    }

    /// Remove and return every pending init handler, in weight order.
    pub(crate) fn take_init(&self) -> Vec<TapHandler<InitCallback>> {
        std::mem::take(&mut *self.init.lock())
    }

    /// Snapshot of the help handlers, in weight order.
    pub(crate) fn help_handlers(&self) -> Vec<TapHandler<Arc<HelpCallback>>> {
        self.help.read().clone()
    }

    pub(crate) fn head_handlers(&self) -> Vec<TapHandler<Arc<HeadCallback>>> {
        self.head.read().clone()
    }

    pub(crate) fn title_handlers(&self) -> Vec<TapHandler<Arc<TitleCallback>>> {
        self.title.read().clone()
    }

    /// Get the count of handlers for a tap.
    ///
    /// Init handlers are only counted until they have run.
    pub fn handler_count(&self, tap_name: &str) -> usize {
        match tap_name {
            TAP_INIT => self.init.lock().len(),
            TAP_CONTEXTUAL_HELP => self.help.read().len(),
            TAP_ADMIN_HEAD => self.head.read().len(),
            TAP_ENTER_TITLE_HERE => self.title.read().len(),
            _ => 0,
        }
    }

    /// Check if any handler is attached to a tap.
    pub fn has_tap(&self, tap_name: &str) -> bool {
        self.handler_count(tap_name) > 0
    }

    /// Names of taps that currently have handlers.
    pub fn tap_names(&self) -> Vec<&'static str> {
        KNOWN_TAPS
            .iter()
            .copied()
            .filter(|tap| self.has_tap(tap))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tipo_sdk::host::Host;
    use tipo_sdk::types::Screen;

    fn help(tag: &'static str) -> HelpCallback {
        Box::new(move |default: String, _: &Screen| format!("{default}{tag}"))
    }

    #[test]
    fn empty_registry_has_no_taps() {
        let registry = TapRegistry::new();
        for tap in KNOWN_TAPS {
            assert!(!registry.has_tap(tap));
        }
        assert!(registry.tap_names().is_empty());
        assert_eq!(registry.handler_count("nonexistent_tap"), 0);
    }

    #[test]
    fn handlers_sorted_by_weight_then_order() {
        let registry = TapRegistry::new();
        registry.add_help(10, help("b"));
        registry.add_help(-5, help("a"));
        registry.add_help(10, help("c"));
        registry.add_help(20, help("d"));

        let handlers = registry.help_handlers();
        let weights: Vec<i32> = handlers.iter().map(|h| h.weight).collect();
        assert_eq!(weights, vec![-5, 10, 10, 20]);

        let screen = Screen::new("x");
        let folded = handlers
            .iter()
            .fold(String::new(), |acc, h| (*h.callback)(acc, &screen));
        assert_eq!(folded, "abcd");
    }

    #[test]
    fn take_init_drains() {
        let registry = TapRegistry::new();
        registry.add_init(DEFAULT_WEIGHT, Box::new(|_: &dyn Host| Ok(())));
        registry.add_init(DEFAULT_WEIGHT, Box::new(|_: &dyn Host| Ok(())));
        assert_eq!(registry.handler_count(TAP_INIT), 2);

        assert_eq!(registry.take_init().len(), 2);
        assert_eq!(registry.handler_count(TAP_INIT), 0);
        assert!(registry.take_init().is_empty());
    }

    #[test]
    fn tap_names_lists_attached_taps() {
        let registry = TapRegistry::new();
        registry.add_head(DEFAULT_WEIGHT, Box::new(String::new));
        assert_eq!(registry.tap_names(), vec![TAP_ADMIN_HEAD]);
    }

    #[test]
    fn snapshot_ignores_later_handlers() {
        let registry = TapRegistry::new();
        registry.add_help(DEFAULT_WEIGHT, help("a"));
        let snapshot = registry.help_handlers();

        registry.add_help(DEFAULT_WEIGHT, help("b"));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.handler_count(TAP_CONTEXTUAL_HELP), 2);
    }
}
