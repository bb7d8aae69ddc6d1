#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod build;
mod config;
mod server;

use std::process::ExitCode;

use crate::config::{Cli, Command};

pub const TRACING_TARGET_STARTUP: &str = "folio_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "folio_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "folio_cli::config";
pub const TRACING_TARGET_BUILD: &str = "folio_cli::build";

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => {
            tracing::debug!(target: TRACING_TARGET_SHUTDOWN, "Exiting");
            ExitCode::SUCCESS
        }
        Err(error) => {
            if tracing::enabled!(tracing::Level::ERROR) {
                tracing::error!(target: TRACING_TARGET_SHUTDOWN, error = %error, "Exiting with error");
            } else {
                eprintln!("folio: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    Cli::init_tracing();
    cli.log();

    match cli.command {
        Command::Build(args) => build::run(args).await,
        Command::Serve(config) => {
            config.validate()?;
            Ok(server::serve(config).await?)
        }
    }
}
