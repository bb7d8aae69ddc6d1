//! Prelude module for convenient imports.
//!
//! ```rust
//! use folio_runtime::prelude::*;
//! ```

pub use crate::engine::{
    BuildConfig, BuildConfigBuilder, BuildContext, BuildReport, DocumentOutcome, DocumentReport,
    PageWriter, SiteBuilder, TreeAssembler,
};
pub use crate::error::{BuildError, BuildResult};
pub use crate::seed::resolve_seed;
