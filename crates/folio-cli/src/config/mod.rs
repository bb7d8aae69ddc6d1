//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── build: BuildArgs
//! │   ├── notion: NotionConfig   # API credentials, database, properties
//! │   └── build: BuildConfig     # Output, cache, seed, concurrency
//! └── serve: ServerConfig        # Host, port, shutdown, directory
//! ```
//!
//! Every flag has an environment variable fallback, listed by `--help`.

mod server;

use std::process;

use clap::{Args, Parser, Subcommand};
use folio_notion::reqwest::NotionConfig;
use folio_runtime::engine::BuildConfig;
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Parsed command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio")]
#[command(about = "Static site generator for Notion databases")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Build HTML pages from the configured database.
    Build(BuildArgs),
    /// Serve a built site over HTTP.
    Serve(ServerConfig),
}

/// Arguments of `folio build`.
#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
    /// Notion API configuration.
    #[command(flatten)]
    pub notion: NotionConfig,

    /// Build configuration.
    #[command(flatten)]
    pub build: BuildConfig,
}

impl Cli {
    /// Reads `.env` when the `dotenv` feature is on, then parses arguments.
    ///
    /// The file is loaded first so clap's `env` fallbacks can see it.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("folio: ignoring unreadable .env: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Installs a formatting subscriber filtered by `RUST_LOG`, `info` if unset.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    /// Logs the selected command and its settings. The Notion secret is never
    /// logged.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Starting folio"
        );

        match &self.command {
            Command::Build(args) => args.log(),
            Command::Serve(config) => config.log(),
        }
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl BuildArgs {
    fn log(&self) {
        let Self { notion, build } = self;
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            database_id = %notion.database_id,
            api_url = %notion.api_url,
            notion_version = %notion.notion_version,
            output_dir = %build.output_dir.display(),
            cache_dir = %build.cache_dir.display(),
            no_cache = build.no_cache,
            strict = build.strict,
            seed_configured = build.seed.is_some(),
            concurrency = build.concurrency,
            "Build configuration"
        );
    }
}
