//! Inline rich text.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// A single run of inline content.
///
/// Mirrors the upstream shape (`{"type": "text", "text": {...}, ...}`) so the
/// same type deserializes from the API and from cached snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichText {
    /// Plain or annotated text, optionally linked.
    Text {
        text: TextContent,
        #[serde(default)]
        annotations: Annotations,
    },
    /// A mention of a page, a date, or something we do not model.
    Mention {
        mention: Mention,
        #[serde(default)]
        annotations: Annotations,
        #[serde(default)]
        plain_text: String,
    },
    /// An inline equation.
    Equation {
        equation: Equation,
        #[serde(default)]
        annotations: Annotations,
    },
    /// Any other inline type.
    #[serde(other)]
    Unknown,
}

impl RichText {
    /// Creates an unannotated text run.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::Text {
            text: TextContent {
                content: content.into(),
                link: None,
            },
            annotations: Annotations::default(),
        }
    }

    /// Creates a text run linking to `url`.
    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Text {
            text: TextContent {
                content: content.into(),
                link: Some(Link { url: url.into() }),
            },
            annotations: Annotations::default(),
        }
    }

    /// Creates a page mention.
    pub fn page_mention(id: NodeId) -> Self {
        Self::Mention {
            mention: Mention::Page {
                page: PageReference { id },
            },
            annotations: Annotations::default(),
            plain_text: String::new(),
        }
    }

    /// Creates a date mention.
    pub fn date_mention(start: impl Into<String>) -> Self {
        Self::Mention {
            mention: Mention::Date {
                date: DateMention {
                    start: start.into(),
                    end: None,
                },
            },
            annotations: Annotations::default(),
            plain_text: String::new(),
        }
    }

    /// Returns the raw text content, or an empty string for non-text runs.
    pub fn content(&self) -> &str {
        match self {
            Self::Text { text, .. } => &text.content,
            Self::Mention { plain_text, .. } => plain_text,
            Self::Equation { equation, .. } => &equation.expression,
            Self::Unknown => "",
        }
    }
}

/// Concatenates the textual content of a rich text sequence.
pub fn concatenate(texts: &[RichText]) -> String {
    texts.iter().map(RichText::content).collect()
}

/// Text payload of a [`RichText::Text`] run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default)]
    pub link: Option<Link>,
}

/// A hyperlink target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// Inline formatting flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

/// What a mention points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mention {
    Page {
        page: PageReference,
    },
    Date {
        date: DateMention,
    },
    #[serde(other)]
    Unknown,
}

/// Reference to another page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    pub id: NodeId,
}

/// A date or date range; `start` is an ISO 8601 date or datetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMention {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
}

/// TeX source of an equation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    pub expression: String,
}
