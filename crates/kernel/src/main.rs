//! Tipo CLI
//!
//! Boots the kernel from a content type manifest and inspects the result.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tipo_kernel::Kernel;
use tipo_kernel::config::Config;
use tipo_kernel::error::KernelError;
use tipo_kernel::manifest::Manifest;
use tipo_sdk::Declaration;
use tipo_sdk::types::{OptionMap, Screen};
use tipo_sdk::words::normalize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "tipo", version, about = "Declare and inspect custom content types")]
struct Cli {
    /// Content type manifest (overrides MANIFEST_PATH).
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// Site base URL (overrides SITE_URL).
    #[arg(long, global = true)]
    site_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every registered content type with its payload.
    Types,

    /// List the published items of a content type.
    Items {
        /// Content type name or identifier.
        content_type: String,

        /// Print only the first item (or null).
        #[arg(long)]
        single: bool,

        /// Query overrides as a JSON object, e.g. '{"order": "DESC"}'.
        #[arg(long)]
        query: Option<String>,
    },

    /// Print the archive URL of a content type.
    Url {
        content_type: String,

        /// Path appended after the type's slug.
        #[arg(default_value = "")]
        path: String,
    },

    /// Print the contextual help shown on an admin screen.
    Help {
        screen_id: String,

        /// Help shown when no declaration matches.
        #[arg(long, default_value = "")]
        default: String,
    },

    /// Print the markup injected into the admin head.
    Head,

    /// Print the title placeholder on a content type's edit screen.
    Title {
        content_type: String,

        #[arg(long, default_value = "Add title")]
        default: String,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(path) = cli.manifest {
        config.manifest_path = path;
    }
    if let Some(url) = cli.site_url {
        config.site_url = url;
    }

    let kernel = Kernel::from_config(&config).context("failed to initialize kernel")?;
    let manifest = Manifest::parse(&config.manifest_path)?;
    let declarations = kernel
        .boot_manifest(&manifest)
        .context("failed to boot content types")?;

    info!(
        content_types = kernel.content_types().len(),
        items = kernel.items().len(),
        "manifest loaded"
    );

    match cli.command {
        Command::Types => print_json(&kernel.content_types().list())?,
        Command::Items {
            content_type,
            single,
            query,
        } => {
            let decl = find(&declarations, &content_type)?;
            let overrides = parse_query(query.as_deref())?;
            if single {
                print_json(&decl.single(&kernel, &overrides))?;
            } else {
                print_json(&decl.list(&kernel, &overrides))?;
            }
        }
        Command::Url { content_type, path } => {
            let decl = find(&declarations, &content_type)?;
            println!("{}", decl.archive_url(&kernel, &path));
        }
        Command::Help { screen_id, default } => {
            println!("{}", kernel.contextual_help(default, &Screen::new(screen_id)));
        }
        Command::Head => print!("{}", kernel.admin_head()),
        Command::Title {
            content_type,
            default,
        } => {
            let decl = find(&declarations, &content_type)?;
            let screen = Screen::new(decl.identifier()).editing(decl.identifier());
            println!("{}", kernel.title_placeholder(default, &screen));
        }
    }

    Ok(())
}

/// Find a declaration by raw name or identifier.
fn find<'a>(declarations: &'a [Arc<Declaration>], name: &str) -> Result<&'a Declaration> {
    let identifier = normalize(name);
    declarations
        .iter()
        .find(|decl| decl.identifier() == identifier)
        .map(|decl| decl.as_ref())
        .ok_or_else(|| KernelError::UnknownType(identifier).into())
}

fn parse_query(raw: Option<&str>) -> Result<OptionMap> {
    match raw {
        Some(json) => serde_json::from_str(json).context("--query must be a JSON object"),
        None => Ok(OptionMap::new()),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
