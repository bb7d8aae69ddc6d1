#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod backlinks;
mod date;
mod escape;
mod html;
mod index;
mod shell;

pub use backlinks::{BacklinkGraph, Backlinks};
pub use date::relative_date;
pub use escape::escape_html;
pub use html::{RenderedDocument, Renderer};
pub use index::{DocumentIndex, IndexEntry};
pub use shell::{DEFAULT_EMOJI, render_page};

/// Tracing target for rendering.
pub const TRACING_TARGET: &str = "folio_render";
