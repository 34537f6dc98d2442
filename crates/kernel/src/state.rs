//! Kernel state shared by every caller.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tipo_sdk::host::{
    HeadCallback, HelpCallback, InitCallback, ItemSource, Lifecycle, Router, TitleCallback,
    Translator, TypeRegistry,
};
use tipo_sdk::types::{ContentItem, QueryPayload, RegistrationPayload, Screen};
use tipo_sdk::{Declaration, HostError, declare_all, icon_font_hook};
use tracing::{debug, info};

use crate::config::{Config, normalize_site_url};
use crate::content::{Catalog, ContentTypeRegistry, CreateItem, ItemStore};
use crate::error::{KernelError, KernelResult};
use crate::manifest::Manifest;
use crate::tap::{DEFAULT_WEIGHT, TapDispatcher, TapRegistry};

/// Summary of a boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootReport {
    /// Declarations that attached hooks.
    pub declared: usize,
    /// Init handlers that ran.
    pub initialized: usize,
}

/// Shared kernel state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct Kernel {
    inner: Arc<KernelInner>,
}

struct KernelInner {
    /// Site base URL without a trailing slash.
    base_url: String,

    /// Content type registry.
    content_types: ContentTypeRegistry,

    /// Item store.
    items: ItemStore,

    /// Translation catalog.
    catalog: Catalog,

    /// Tap registry.
    tap_registry: Arc<TapRegistry>,

    /// Tap dispatcher.
    tap_dispatcher: TapDispatcher,
}

impl Kernel {
    /// Create a kernel with an empty registry, store, and catalog.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_catalog(base_url, Catalog::empty())
    }

    pub fn with_catalog(base_url: impl Into<String>, catalog: Catalog) -> Self {
        let tap_registry = Arc::new(TapRegistry::new());
        let tap_dispatcher = TapDispatcher::new(Arc::clone(&tap_registry));

        Self {
            inner: Arc::new(KernelInner {
                base_url: base_url.into(),
                content_types: ContentTypeRegistry::new(),
                items: ItemStore::new(),
                catalog,
                tap_registry,
                tap_dispatcher,
            }),
        }
    }

    /// Build a kernel from configuration, loading translations and linking
    /// the icon font if configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = match &config.translations_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::empty(),
        };
        let base_url = normalize_site_url(&config.site_url)?;

        info!(
            site_url = %base_url,
            translations = catalog.len(),
            "kernel configured"
        );
        let kernel = Self::with_catalog(base_url, catalog);
        if let Some(href) = &config.icon_font_href {
            icon_font_hook(&kernel, href);
        }
        Ok(kernel)
    }

    /// Get the content type registry.
    pub fn content_types(&self) -> &ContentTypeRegistry {
        &self.inner.content_types
    }

    /// Get the item store.
    pub fn items(&self) -> &ItemStore {
        &self.inner.items
    }

    /// Get the tap registry.
    pub fn tap_registry(&self) -> &Arc<TapRegistry> {
        &self.inner.tap_registry
    }

    /// Get the tap dispatcher.
    pub fn tap_dispatcher(&self) -> &TapDispatcher {
        &self.inner.tap_dispatcher
    }

    /// Attach the declarations' hooks, then run the init tap.
    ///
    /// Safe to call again: types registered by an earlier boot are skipped.
    ///
    /// # Errors
    ///
    /// [`KernelError::Registration`] when any content type was rejected.
    /// Types that registered successfully stay registered.
    pub fn boot(&self, declarations: &[Arc<Declaration>]) -> KernelResult<BootReport> {
        let declared = declare_all(declarations, self, self);
        let report = self.inner.tap_dispatcher.run_init(self);

        info!(
            declarations = declarations.len(),
            declared,
            content_types = self.inner.content_types.len(),
            "kernel booted"
        );

        if !report.is_ok() {
            return Err(KernelError::Registration(report.errors));
        }

        Ok(BootReport {
            declared,
            initialized: report.ran,
        })
    }

    /// Build a manifest's declarations, boot them, and seed its items.
    ///
    /// Items are only seeded for types this call registered, so booting the
    /// same manifest again adds nothing. Items for other types are skipped.
    pub fn boot_manifest(&self, manifest: &Manifest) -> KernelResult<Vec<Arc<Declaration>>> {
        let declarations = manifest.declarations()?;
        let fresh: HashSet<String> = declarations
            .iter()
            .map(|decl| decl.identifier().to_string())
            .filter(|id| !self.inner.content_types.exists(id))
            .collect();

        let booted = self.boot(&declarations);

        for seed in &manifest.items {
            let registered_now =
                fresh.contains(&seed.item_type) && self.inner.content_types.exists(&seed.item_type);
            if registered_now {
                self.inner.items.create(CreateItem::from(seed.clone()));
            } else {
                debug!(item_type = %seed.item_type, title = %seed.title, "seed item skipped");
            }
        }

        booted?;
        Ok(declarations)
    }

    /// Contextual help for an admin screen.
    pub fn contextual_help(&self, default_help: impl Into<String>, screen: &Screen) -> String {
        self.inner
            .tap_dispatcher
            .contextual_help(default_help.into(), screen)
    }

    /// Markup for the admin page head.
    pub fn admin_head(&self) -> String {
        self.inner.tap_dispatcher.admin_head()
    }

    /// Title placeholder for an edit screen.
    pub fn title_placeholder(&self, default: impl Into<String>, screen: &Screen) -> String {
        self.inner
            .tap_dispatcher
            .title_placeholder(default.into(), screen)
    }
}

impl TypeRegistry for Kernel {
    fn type_exists(&self, identifier: &str) -> bool {
        self.inner.content_types.type_exists(identifier)
    }

    fn register_type(
        &self,
        identifier: &str,
        payload: RegistrationPayload,
    ) -> Result<(), HostError> {
        self.inner.content_types.register_type(identifier, payload)
    }
}

impl ItemSource for Kernel {
    fn fetch_items(&self, query: &QueryPayload) -> Vec<ContentItem> {
        self.inner.items.fetch_items(query)
    }
}

impl Router for Kernel {
    fn base_url(&self) -> String {
        self.inner.base_url.clone()
    }
}

impl Translator for Kernel {
    fn translate(&self, text: &str) -> String {
        self.inner.catalog.translate(text)
    }
}

impl Lifecycle for Kernel {
    fn on_init(&self, callback: InitCallback) {
        self.inner.tap_registry.add_init(DEFAULT_WEIGHT, callback);
    }

    fn on_help_screen(&self, callback: HelpCallback) {
        self.inner.tap_registry.add_help(DEFAULT_WEIGHT, callback);
    }

    fn on_admin_head(&self, callback: HeadCallback) {
        self.inner.tap_registry.add_head(DEFAULT_WEIGHT, callback);
    }

    fn on_title_placeholder(&self, callback: TitleCallback) {
        self.inner.tap_registry.add_title(DEFAULT_WEIGHT, callback);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::tap::TAP_INIT;

    #[test]
    fn boot_registers_and_drains_init() {
        let kernel = Kernel::new("https://example.com");
        let decl = Arc::new(Declaration::new("movie_review").unwrap());

        let report = kernel.boot(&[decl]).unwrap();
        assert_eq!(
            report,
            BootReport {
                declared: 1,
                initialized: 1
            }
        );
        assert!(kernel.content_types().exists("movie_review"));
        assert!(!kernel.tap_registry().has_tap(TAP_INIT));
    }

    #[test]
    fn second_boot_is_a_no_op() {
        let kernel = Kernel::new("https://example.com");
        let decl = Arc::new(Declaration::new("movie_review").unwrap());

        kernel.boot(&[Arc::clone(&decl)]).unwrap();
        let report = kernel.boot(&[decl]).unwrap();
        assert_eq!(report, BootReport::default());
        assert_eq!(kernel.content_types().len(), 1);
    }

    #[test]
    fn boot_reports_rejected_types() {
        let kernel = Kernel::new("https://example.com");
        let good = Arc::new(Declaration::new("book").unwrap());
        let bad = Arc::new(
            Declaration::builder("film")
                .option("labels", "Films")
                .build()
                .unwrap(),
        );

        let err = kernel.boot(&[good, bad]).unwrap_err();
        match err {
            KernelError::Registration(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
        assert!(kernel.content_types().exists("book"));
        assert!(!kernel.content_types().exists("film"));
    }

    #[test]
    fn from_config_links_icon_font_once() {
        let config = Config {
            site_url: "https://example.com".into(),
            manifest_path: "content_types.toml".into(),
            translations_path: None,
            icon_font_href: Some("/static/icons.css".into()),
        };
        let kernel = Kernel::from_config(&config).unwrap();
        let decl = Arc::new(Declaration::builder("book").icon("f02d").build().unwrap());
        kernel.boot(&[Arc::clone(&decl)]).unwrap();
        kernel.boot(&[decl]).unwrap();

        let head = kernel.admin_head();
        assert_eq!(
            head.matches(r#"<link href="/static/icons.css" rel="stylesheet">"#)
                .count(),
            1
        );
        assert_eq!(head.matches(".menu-icon-book").count(), 1);
    }

    #[test]
    fn from_config_without_icon_font() {
        let config = Config {
            site_url: "https://example.com".into(),
            manifest_path: "content_types.toml".into(),
            translations_path: None,
            icon_font_href: None,
        };
        let kernel = Kernel::from_config(&config).unwrap();
        assert_eq!(kernel.admin_head(), "");
    }

    #[test]
    fn boot_manifest_twice_seeds_once() {
        let manifest = Manifest::parse_str(
            "[[content_type]]\nname = \"book\"\n\n\
             [[item]]\nitem_type = \"book\"\ntitle = \"Dune\"\n\n\
             [[item]]\nitem_type = \"film\"\ntitle = \"Alien\"\n",
            std::path::Path::new("test.toml"),
        )
        .unwrap();
        let kernel = Kernel::new("https://example.com");

        kernel.boot_manifest(&manifest).unwrap();
        assert_eq!(kernel.items().len(), 1);

        kernel.boot_manifest(&manifest).unwrap();
        assert_eq!(kernel.items().len(), 1);
    }

    #[test]
    fn labels_go_through_catalog() {
        let catalog = Catalog::parse_str(r#""Books" = "Libri""#).unwrap();
        let kernel = Kernel::with_catalog("https://example.com", catalog);
        kernel
            .boot(&[Arc::new(Declaration::new("book").unwrap())])
            .unwrap();

        let registered = kernel.content_types().get("book").unwrap();
        assert_eq!(registered.label(), "Libri");
        assert_eq!(registered.payload.label("singular_name"), Some("Book"));
    }
}
