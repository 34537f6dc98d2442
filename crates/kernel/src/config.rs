//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tipo_sdk::ICON_FONT_HREF;
use url::Url;

/// Kernel configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Public site URL used for archive links (default: http://localhost:3000).
    pub site_url: String,

    /// Path to the content type manifest (default: ./content_types.toml).
    pub manifest_path: PathBuf,

    /// Optional path to a translation table.
    pub translations_path: Option<PathBuf>,

    /// Icon font stylesheet linked from the admin head (default: Font
    /// Awesome 4 on cdnjs). An empty `ICON_FONT_HREF` disables the link.
    pub icon_font_href: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let site_url =
            lookup("SITE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());
        let site_url = normalize_site_url(&site_url)?;

        let manifest_path = lookup("MANIFEST_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./content_types.toml"));

        let translations_path = lookup("TRANSLATIONS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let icon_font_href = match lookup("ICON_FONT_HREF") {
            Some(href) if href.trim().is_empty() => None,
            Some(href) => Some(href),
            None => Some(ICON_FONT_HREF.to_string()),
        };

        Ok(Self {
            site_url,
            manifest_path,
            translations_path,
            icon_font_href,
        })
    }
}

/// Validate a site URL and strip its trailing slash.
pub fn normalize_site_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw).with_context(|| format!("SITE_URL must be a valid URL: {raw}"))?;
    if url.cannot_be_a_base() {
        anyhow::bail!("SITE_URL must be a base URL: {raw}");
    }
    Ok(raw.trim_end_matches('/').to_string())
}
