//! Output files.

use std::path::{Component, Path, PathBuf};

use super::TRACING_TARGET;
use crate::error::{BuildError, BuildResult};

/// Writes rendered pages below an output directory.
#[derive(Debug, Clone)]
pub struct PageWriter {
    root: PathBuf,
}

impl PageWriter {
    /// Creates a writer for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates the output directory.
    pub async fn prepare(&self) -> BuildResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| BuildError::Output {
                path: self.root.clone(),
                source,
            })
    }

    /// Maps an output name to a path below the output directory.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnsafeOutputName`] for empty or absolute names
    /// and names containing `..`.
    pub fn path_for(&self, output_name: &str) -> BuildResult<PathBuf> {
        let relative = Path::new(output_name);
        let safe = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if output_name.is_empty() || !safe {
            return Err(BuildError::UnsafeOutputName(output_name.to_owned()));
        }

        Ok(self.root.join(relative))
    }

    /// Writes one page and returns its path.
    pub async fn write(&self, output_name: &str, html: &str) -> BuildResult<PathBuf> {
        let path = self.path_for(output_name)?;
        let io_error = |source| BuildError::Output {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&path, html).await.map_err(io_error)?;

        tracing::debug!(
            target: TRACING_TARGET,
            path = %path.display(),
            size = html.len(),
            "Wrote page"
        );

        Ok(path)
    }
}
