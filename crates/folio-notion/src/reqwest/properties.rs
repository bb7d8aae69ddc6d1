//! Database rows as returned by the query endpoint.

use std::collections::HashMap;

use folio_core::NodeId;
use folio_core::model::{DocumentMeta, RichText, concatenate};
use jiff::Timestamp;
use serde::Deserialize;

/// A database row.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPage {
    pub id: NodeId,
    pub last_edited_time: Timestamp,
    #[serde(default)]
    pub icon: Option<RawIcon>,
    #[serde(default)]
    pub properties: HashMap<String, RawProperty>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum RawIcon {
    Emoji {
        emoji: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum RawProperty {
    Title {
        title: Vec<RichText>,
    },
    RichText {
        rich_text: Vec<RichText>,
    },
    #[serde(other)]
    Other,
}

impl RawProperty {
    fn text(&self) -> Option<String> {
        match self {
            Self::Title { title } => Some(concatenate(title)),
            Self::RichText { rich_text } => Some(concatenate(rich_text)),
            Self::Other => None,
        }
    }
}

impl RawPage {
    /// Extracts document metadata using the configured property names.
    ///
    /// A missing or blank file name property falls back to the default
    /// output name derived from the id.
    pub fn into_meta(self, title_property: &str, filename_property: &str) -> DocumentMeta {
        let title = self
            .properties
            .get(title_property)
            .and_then(RawProperty::text)
            .unwrap_or_default();

        let output_name = self
            .properties
            .get(filename_property)
            .and_then(RawProperty::text)
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DocumentMeta::default_output_name(&self.id));

        let emoji = match self.icon {
            Some(RawIcon::Emoji { emoji }) => Some(emoji),
            Some(RawIcon::Other) | None => None,
        };

        DocumentMeta {
            id: self.id,
            title,
            output_name,
            last_modified: self.last_edited_time,
            emoji,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(properties: serde_json::Value) -> RawPage {
        serde_json::from_value(json!({
            "object": "page",
            "id": "c3d85220-62aa-457a-b414-90c5e9929790",
            "last_edited_time": "2024-03-01T10:00:00.000Z",
            "icon": { "type": "emoji", "emoji": "🌟" },
            "properties": properties
        }))
        .unwrap()
    }

    #[test]
    fn test_meta_from_properties() {
        let page = row(json!({
            "Name": { "id": "title", "type": "title",
                      "title": [{ "type": "text", "text": { "content": "Home" } }] },
            "Filename": { "id": "abc", "type": "rich_text",
                          "rich_text": [{ "type": "text", "text": { "content": "index.html" } }] },
            "Tags": { "id": "def", "type": "multi_select", "multi_select": [] }
        }));

        let meta = page.into_meta("Name", "Filename");
        assert_eq!(meta.title, "Home");
        assert_eq!(meta.output_name, "index.html");
        assert_eq!(meta.emoji.as_deref(), Some("🌟"));
        assert_eq!(
            meta.last_modified,
            "2024-03-01T10:00:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[test]
    fn test_blank_filename_falls_back_to_id() {
        let page = row(json!({
            "Name": { "type": "title", "title": [] },
            "Filename": { "type": "rich_text", "rich_text": [] }
        }));

        let meta = page.into_meta("Name", "Filename");
        assert_eq!(meta.output_name, "c3d85220.html");
        assert_eq!(meta.title, "");
    }

    #[test]
    fn test_non_emoji_icon_is_ignored() {
        let page: RawPage = serde_json::from_value(json!({
            "id": "c3d85220-62aa-457a-b414-90c5e9929790",
            "last_edited_time": "2024-03-01T10:00:00.000Z",
            "icon": { "type": "external", "external": { "url": "https://example.com/i.png" } },
            "properties": {}
        }))
        .unwrap();

        assert!(page.into_meta("Name", "Filename").emoji.is_none());
    }
}
