//! Per-build shared state.

use folio_core::IdGenerator;
use folio_render::BacklinkGraph;

use crate::error::{BuildError, BuildResult};

/// Mutable state shared by every document of one build.
///
/// Owned by the [`SiteBuilder`](super::SiteBuilder) for the duration of a
/// build and dropped afterwards.
#[derive(Debug)]
pub struct BuildContext {
    ids: IdGenerator,
    backlinks: BacklinkGraph,
}

impl BuildContext {
    /// Creates the context for a build seeded with `seed`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Seed`] for an empty seed.
    pub fn new(seed: impl Into<String>) -> BuildResult<Self> {
        let ids = IdGenerator::new(seed).map_err(|e| BuildError::Seed(e.to_string()))?;
        Ok(Self {
            ids,
            backlinks: BacklinkGraph::new(),
        })
    }

    /// Returns the generator for synthetic node ids.
    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Returns the backlink graph.
    pub fn backlinks(&self) -> &BacklinkGraph {
        &self.backlinks
    }
}
