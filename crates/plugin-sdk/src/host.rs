//! Interfaces a host platform provides to declarations.
//!
//! Declarations never reach for global state: every registry, hook, and
//! lookup they need is handed to them through these traits. All methods take
//! `&self`; hosts use interior mutability where they record state.

use crate::error::HostError;
use crate::types::{ContentItem, QueryPayload, RegistrationPayload, Screen};

/// Callback run once while the host initializes.
pub type InitCallback = Box<dyn FnOnce(&dyn Host) -> Result<(), HostError> + Send>;

/// Filter over the contextual help shown on an admin screen.
pub type HelpCallback = Box<dyn Fn(String, &Screen) -> String + Send + Sync>;

/// Markup injected into the admin `<head>`.
pub type HeadCallback = Box<dyn Fn() -> String + Send + Sync>;

/// Filter over the title field placeholder shown on an edit screen.
pub type TitleCallback = Box<dyn Fn(String, &Screen) -> String + Send + Sync>;

/// The host's content type registry.
pub trait TypeRegistry {
    /// Whether a content type with this identifier is already registered.
    fn type_exists(&self, identifier: &str) -> bool;

    /// Register a content type.
    ///
    /// # Errors
    ///
    /// Returns the host's rejection if the payload is malformed or the
    /// identifier is taken.
    fn register_type(
        &self,
        identifier: &str,
        payload: RegistrationPayload,
    ) -> Result<(), HostError>;
}

/// Host lifecycle hook points.
pub trait Lifecycle {
    /// Run `callback` once during host initialization.
    fn on_init(&self, callback: InitCallback);

    /// Filter contextual help on admin screens.
    fn on_help_screen(&self, callback: HelpCallback);

    /// Inject markup into the admin page head.
    fn on_admin_head(&self, callback: HeadCallback);

    /// Filter the title placeholder on edit screens.
    fn on_title_placeholder(&self, callback: TitleCallback);
}

/// The host's item query entry point.
pub trait ItemSource {
    /// Fetch every item matching the query, in the order the query asks for.
    fn fetch_items(&self, query: &QueryPayload) -> Vec<ContentItem>;
}

/// The host's routing information.
pub trait Router {
    /// Site base URL, e.g. `https://example.com`.
    fn base_url(&self) -> String;
}

/// The host's localization function.
pub trait Translator {
    /// Translate a display string. Hosts without localization return it as is.
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// A translator that returns every string unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translator for Identity {}

/// Everything an init callback may need from the host.
pub trait Host: TypeRegistry + ItemSource + Router + Translator {}

impl<T> Host for T where T: TypeRegistry + ItemSource + Router + Translator + ?Sized {}
