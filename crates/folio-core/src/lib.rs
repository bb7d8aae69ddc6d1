#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

/// Tracing target for block model conversions and grouping.
pub const TRACING_TARGET: &str = "folio_core";

mod error;
mod id;

pub mod group;
pub mod model;
pub mod prelude;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use id::{IdGenerator, NodeId};
