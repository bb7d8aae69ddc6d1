//! Build configuration.

use std::path::PathBuf;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, BuildResult};

/// Default number of concurrent upstream requests and document preparations.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Configuration for a site build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "config", derive(Args))]
pub struct BuildConfig {
    /// Directory the HTML pages are written to
    #[cfg_attr(
        feature = "config",
        arg(long = "output-dir", env = "OUTPUT_DIR", default_value = "build")
    )]
    #[builder(default = "PathBuf::from(\"build\")")]
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory holding document snapshots
    #[cfg_attr(
        feature = "config",
        arg(long = "cache-dir", env = "CACHE_DIR", default_value = ".cache")
    )]
    #[builder(default = "PathBuf::from(\".cache\")")]
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Rebuild every document, ignoring stored snapshots
    #[cfg_attr(feature = "config", arg(long = "no-cache", env = "NO_CACHE"))]
    #[builder(default)]
    #[serde(default)]
    pub no_cache: bool,

    /// Fail the build when any document fails
    #[cfg_attr(feature = "config", arg(long = "strict", env = "STRICT"))]
    #[builder(default)]
    #[serde(default)]
    pub strict: bool,

    /// Seed for synthetic node ids, defaults to the current git revision
    #[cfg_attr(feature = "config", arg(long = "seed", env = "BUILD_SEED"))]
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub seed: Option<String>,

    /// Maximum number of concurrent upstream requests
    #[cfg_attr(
        feature = "config",
        arg(long = "concurrency", env = "CONCURRENCY", default_value = "8")
    )]
    #[builder(default = "DEFAULT_CONCURRENCY")]
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".cache")
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl BuildConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(concurrency) = self.concurrency
            && concurrency == 0
        {
            return Err("concurrency must be at least 1".into());
        }
        if let Some(output_dir) = &self.output_dir
            && output_dir.as_os_str().is_empty()
        {
            return Err("output_dir must not be empty".into());
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            cache_dir: default_cache_dir(),
            no_cache: false,
            strict: false,
            seed: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl BuildConfig {
    /// Returns a builder.
    pub fn builder() -> BuildConfigBuilder {
        BuildConfigBuilder::default()
    }

    /// Checks a configuration that did not go through the builder.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Configuration`] for a zero concurrency or an
    /// empty output directory.
    pub fn validate(&self) -> BuildResult<()> {
        if self.concurrency == 0 {
            return Err(BuildError::Configuration(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(BuildError::Configuration(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}
