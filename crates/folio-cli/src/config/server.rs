//! Static file server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, bail};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Lowest port that can be bound without elevated privileges.
const MIN_PORT: u16 = 1024;

/// Accepted drain timeouts, in seconds.
const SHUTDOWN_TIMEOUT_SECS: RangeInclusive<u64> = 1..=300;

/// Configuration of `folio serve`.
///
/// Every option can also come from the environment: `HOST`, `PORT`,
/// `SHUTDOWN_TIMEOUT` and `SERVE_DIR`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Interface to listen on.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on, at least 1024.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Seconds in-flight requests get to finish after a shutdown signal.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,

    /// Output directory of a previous `folio build`.
    #[arg(long, env = "SERVE_DIR", default_value = "build")]
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_dir() -> PathBuf {
    PathBuf::from("build")
}

impl ServerConfig {
    /// Checks the port, the drain timeout and that the site directory exists.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < MIN_PORT {
            bail!("port {} requires elevated privileges, pick {MIN_PORT} or above", self.port);
        }
        if !SHUTDOWN_TIMEOUT_SECS.contains(&self.shutdown_timeout) {
            bail!(
                "shutdown timeout must be {}-{} seconds, got {}",
                SHUTDOWN_TIMEOUT_SECS.start(),
                SHUTDOWN_TIMEOUT_SECS.end(),
                self.shutdown_timeout
            );
        }
        if !self.dir.is_dir() {
            bail!(
                "nothing to serve at {}, run `folio build` first",
                self.dir.display()
            );
        }
        Ok(())
    }

    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns whether the host is `0.0.0.0` or `::`.
    pub fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %self.server_addr(),
            shutdown_timeout_secs = self.shutdown_timeout,
            dir = %self.dir.display(),
            "Serve configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            shutdown_timeout: 30,
            dir: default_dir(),
        }
    }
}
