//! Paginated responses.

use folio_core::model::{DocumentMeta, RawNode};
use folio_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items of this page, in upstream order.
    #[serde(rename = "results")]
    pub items: Vec<T>,
    /// Whether more pages follow.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor of the next page.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A page of child nodes.
pub type ChildrenPage = Page<RawNode>;

/// A page of document metadata.
pub type DocumentPage = Page<DocumentMeta>;

impl<T> Page<T> {
    /// Creates the final page of a listing.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            has_more: false,
            next_cursor: None,
        }
    }

    /// Creates a page followed by the page at `cursor`.
    pub fn partial(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            has_more: true,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Maps the items of this page.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_more: self.has_more,
            next_cursor: self.next_cursor,
        }
    }

    /// Splits the page into its items and the cursor to continue from.
    ///
    /// # Errors
    ///
    /// Returns an invalid response error if the page claims more results
    /// but carries no cursor.
    pub fn into_parts(self) -> Result<(Vec<T>, Option<String>)> {
        match (self.has_more, self.next_cursor) {
            (false, _) => Ok((self.items, None)),
            (true, Some(cursor)) => Ok((self.items, Some(cursor))),
            (true, None) => Err(Error::invalid_response()
                .with_message("page reports more results but has no next cursor")),
        }
    }
}
