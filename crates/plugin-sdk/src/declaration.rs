//! Content type declarations.
//!
//! A [`Declaration`] is built once from a name plus optional labels, options,
//! icon, and help text. Building derives the identifier and any missing
//! labels; after that the declaration is immutable. [`Declaration::declare`]
//! attaches its hooks to the host, and the init hook registers the type the
//! first time the host starts up.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{DeclarationError, DeclarationResult, HostError};
use crate::host::{Host, ItemSource, Lifecycle, Router, Translator, TypeRegistry};
use crate::types::{
    ContentItem, HelpEntry, Labels, OptionMap, QueryPayload, RegistrationPayload,
    ResolvedLabels, Screen, merge_shallow,
};
use crate::words::{normalize, pluralize, slugify, title_case};

/// Menu position used when the caller does not set `menu_position`.
pub const DEFAULT_MENU_POSITION: i64 = 20;

/// Features a content type supports unless the caller sets `supports`.
pub const DEFAULT_SUPPORTS: &[&str] = &["title", "editor", "thumbnail", "revisions"];

/// Icon font stylesheet that renders the glyph codes used as icons.
pub const ICON_FONT_HREF: &str =
    "//cdnjs.cloudflare.com/ajax/libs/font-awesome/4.0.3/css/font-awesome.min.css";

/// Declaration input as it appears in configuration files.
///
/// `name` is optional here only so a missing name can be reported as
/// [`DeclarationError::InvalidDeclaration`] instead of a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub options: OptionMap,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub help: Vec<HelpEntry>,
}

/// Builder for [`Declaration`].
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    config: DeclarationConfig,
}

impl DeclarationBuilder {
    pub fn labels(mut self, labels: Labels) -> Self {
        self.config.labels = labels;
        self
    }

    /// Set one registration option, overriding the built-in default.
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.options.insert(key.into(), value.into());
        self
    }

    /// Replace all registration options.
    pub fn options(mut self, options: OptionMap) -> Self {
        self.config.options = options;
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.config.icon = Some(icon.into());
        self
    }

    /// Append a help entry. Order matters: later matches win.
    pub fn help(mut self, entry: HelpEntry) -> Self {
        self.config.help.push(entry);
        self
    }

    pub fn build(self) -> DeclarationResult<Declaration> {
        Declaration::from_config(self.config)
    }
}

/// A declared content type.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    raw_name: String,
    identifier: String,
    labels: ResolvedLabels,
    options: OptionMap,
    icon: Option<String>,
    help: Vec<HelpEntry>,
}

impl Declaration {
    /// Declare a type with nothing but a name.
    pub fn new(name: impl Into<String>) -> DeclarationResult<Self> {
        Self::builder(name).build()
    }

    pub fn builder(name: impl Into<String>) -> DeclarationBuilder {
        DeclarationBuilder {
            config: DeclarationConfig {
                name: Some(name.into()),
                ..DeclarationConfig::default()
            },
        }
    }

    /// Build a declaration from configuration input.
    ///
    /// # Errors
    ///
    /// [`DeclarationError::InvalidDeclaration`] when the name is missing or
    /// blank.
    pub fn from_config(config: DeclarationConfig) -> DeclarationResult<Self> {
        let raw_name = config
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                DeclarationError::InvalidDeclaration("a content type needs a name".into())
            })?;

        let identifier = normalize(&raw_name);
        let labels = resolve_labels(&identifier, config.labels);

        // An empty icon means "no icon".
        let icon = config.icon.filter(|i| !i.is_empty());

        Ok(Self {
            raw_name,
            identifier,
            labels,
            options: config.options,
            icon,
            help: config.help,
        })
    }

    /// The name as the caller wrote it.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    /// The normalized machine identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn labels(&self) -> &ResolvedLabels {
        &self.labels
    }

    /// Caller-supplied registration options.
    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn help(&self) -> &[HelpEntry] {
        &self.help
    }

    /// URL path segment for this type.
    pub fn slug(&self) -> String {
        slugify(&self.identifier)
    }

    /// The label block of the registration payload, translated.
    pub fn label_block<T: Translator + ?Sized>(&self, translator: &T) -> Value {
        let singular = &self.labels.singular;
        let plural = &self.labels.plural;
        let t = |text: &str| Value::String(translator.translate(text));

        json!({
            "name": t(plural),
            "singular_name": t(singular),
            "menu_name": t(&self.labels.menu),
            "add_new_item": t(&format!("Add New {singular}")),
            "edit_item": t(&format!("Edit {singular}")),
            "new_item": t(&format!("New {singular}")),
            "all_items": t(&format!("All {plural}")),
            "view_item": t(&format!("View {singular}")),
            "search_items": t(&format!("Search {plural}")),
            "not_found": t(&format!("No {plural} found")),
            "not_found_in_trash": t(&format!("No {plural} found in Trash")),
        })
    }

    /// Build the payload handed to the host registry.
    ///
    /// Built-in defaults are shallow-overridden by the caller's options.
    pub fn registration_payload<T: Translator + ?Sized>(
        &self,
        translator: &T,
    ) -> RegistrationPayload {
        let mut defaults = OptionMap::new();
        defaults.insert("has_archive".into(), Value::Bool(true));
        defaults.insert("labels".into(), self.label_block(translator));
        defaults.insert("menu_icon".into(), Value::Null);
        defaults.insert("menu_position".into(), json!(DEFAULT_MENU_POSITION));
        defaults.insert("public".into(), Value::Bool(true));
        defaults.insert("rewrite".into(), json!({ "slug": self.slug() }));
        defaults.insert("supports".into(), json!(DEFAULT_SUPPORTS));

        RegistrationPayload::new(merge_shallow(defaults, &self.options))
    }

    /// Register the type unless the host already knows it.
    ///
    /// Returns `Ok(true)` when this call registered the type.
    ///
    /// # Errors
    ///
    /// Propagates the host's rejection unchanged.
    pub fn register_if_absent<H>(&self, host: &H) -> Result<bool, HostError>
    where
        H: TypeRegistry + Translator + ?Sized,
    {
        if host.type_exists(&self.identifier) {
            return Ok(false);
        }

        let payload = self.registration_payload(host);
        host.register_type(&self.identifier, payload)?;
        Ok(true)
    }

    /// Attach this declaration's hooks to the host.
    ///
    /// Nothing is attached when the type already exists. Otherwise an init
    /// hook registers the type, and help, icon style, and title placeholder
    /// hooks are attached as the declaration calls for them. Returns whether
    /// hooks were attached.
    pub fn declare<L, R>(self: &Arc<Self>, lifecycle: &L, registry: &R) -> bool
    where
        L: Lifecycle + ?Sized,
        R: TypeRegistry + ?Sized,
    {
        if registry.type_exists(&self.identifier) {
            debug!(type_name = %self.identifier, "content type exists, skipping hooks");
            return false;
        }

        let decl = Arc::clone(self);
        lifecycle.on_init(Box::new(move |host: &dyn Host| {
            decl.register_if_absent(host).map(|_| ())
        }));

        if !self.help.is_empty() {
            let decl = Arc::clone(self);
            lifecycle.on_help_screen(Box::new(move |default: String, screen: &Screen| {
                decl.resolve_help(default, &screen.id)
            }));
        }

        if self.icon.is_some() {
            let decl = Arc::clone(self);
            lifecycle.on_admin_head(Box::new(move || decl.icon_style().unwrap_or_default()));
        }

        let decl = Arc::clone(self);
        lifecycle.on_title_placeholder(Box::new(move |default: String, screen: &Screen| {
            decl.title_placeholder(default, screen)
        }));

        debug!(
            type_name = %self.identifier,
            help = self.help.len(),
            icon = self.icon.is_some(),
            "content type hooks attached"
        );
        true
    }

    /// Pick the help message for a screen.
    ///
    /// Every entry whose screen id matches overwrites the previous match, so
    /// the last matching entry wins. Without a match `default_help` is
    /// returned unchanged.
    pub fn resolve_help(&self, default_help: String, screen_id: &str) -> String {
        let mut help = default_help;
        for entry in &self.help {
            if entry.screen_id(&self.identifier) == screen_id {
                help = entry.message.clone();
            }
        }
        help
    }

    /// Title placeholder for this type's edit screen.
    pub fn title_placeholder(&self, default: String, screen: &Screen) -> String {
        if screen.item_type.as_deref() == Some(self.identifier.as_str()) {
            format!("Enter {} Title Here", self.labels.singular)
        } else {
            default
        }
    }

    /// Admin stylesheet that shows the icon glyph on this type's menu entry.
    ///
    /// The icon lands inside a quoted CSS string, so quotes, backslashes,
    /// `<` and line breaks in it are written as CSS hex escapes.
    pub fn icon_style(&self) -> Option<String> {
        let icon = escape_css_string(self.icon.as_deref()?);
        let menu_class: String = self.identifier.chars().filter(|c| *c != ' ').collect();

        Some(format!(
            "<style rel=\"stylesheet\" media=\"screen\">\n\
             \x20 #adminmenu .menu-icon-{menu_class} div.wp-menu-image:before {{\n\
             \x20   content: '\\{icon}';\n\
             \x20 }}\n\
             </style>\n"
        ))
    }

    /// Build the query for listing items of this type.
    pub fn query_payload(&self, overrides: &OptionMap) -> QueryPayload {
        let mut defaults = OptionMap::new();
        defaults.insert("per_page".into(), json!(-1));
        defaults.insert("order_by".into(), json!("title"));
        defaults.insert("order".into(), json!("ASC"));
        defaults.insert("item_type".into(), json!(self.identifier));
        defaults.insert("status".into(), json!("published"));

        QueryPayload::new(merge_shallow(defaults, overrides))
    }

    /// List the items of this type.
    pub fn list<S: ItemSource + ?Sized>(&self, source: &S, overrides: &OptionMap) -> Vec<ContentItem> {
        source.fetch_items(&self.query_payload(overrides))
    }

    /// Fetch the first matching item, or `None` when nothing matches.
    pub fn single<S: ItemSource + ?Sized>(
        &self,
        source: &S,
        overrides: &OptionMap,
    ) -> Option<ContentItem> {
        self.list(source, overrides).into_iter().next()
    }

    /// Archive URL for this type, with `path` appended after the slug.
    pub fn archive_url<R: Router + ?Sized>(&self, router: &R, path: &str) -> String {
        let base = router.base_url();
        format!("{}/{}/{path}", base.trim_end_matches('/'), self.slug())
    }
}

/// Fill in missing labels: singular from the identifier, plural from the
/// singular, menu from the plural.
fn resolve_labels(identifier: &str, supplied: Labels) -> ResolvedLabels {
    let singular = supplied.singular.unwrap_or_else(|| title_case(identifier));
    let plural = supplied.plural.unwrap_or_else(|| pluralize(&singular));
    let menu = supplied.menu.unwrap_or_else(|| plural.clone());

    ResolvedLabels {
        singular,
        plural,
        menu,
    }
}

/// Write `value` so it can sit inside a single-quoted CSS string.
fn escape_css_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' | '"' | '\\' | '<' | '\n' | '\r' | '\u{c}' => {
                out.push_str(&format!("\\{:x} ", u32::from(c)));
            }
            _ => out.push(c),
        }
    }
    out
}

/// Attach hooks for every declaration at startup.
///
/// A declaration whose identifier already appeared earlier in the batch is
/// skipped. Returns the number of declarations that attached hooks.
pub fn declare_all<L, R>(declarations: &[Arc<Declaration>], lifecycle: &L, registry: &R) -> usize
where
    L: Lifecycle + ?Sized,
    R: TypeRegistry + ?Sized,
{
    let mut seen = HashSet::new();
    let mut declared = 0;
    for decl in declarations {
        if !seen.insert(decl.identifier()) {
            debug!(type_name = %decl.identifier(), "content type declared twice, skipping");
            continue;
        }
        if decl.declare(lifecycle, registry) {
            declared += 1;
        }
    }
    declared
}

/// Attach an admin head handler that links the icon font stylesheet.
///
/// Call once per host; every call attaches another link.
pub fn icon_font_hook<L: Lifecycle + ?Sized>(lifecycle: &L, href: &str) {
    let link = format!(
        "<link href=\"{}\" rel=\"stylesheet\">\n",
        href.replace('&', "&amp;").replace('"', "&quot;")
    );
    lifecycle.on_admin_head(Box::new(move || link.clone()));
}
