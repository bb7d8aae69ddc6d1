//! The page shell around rendered bodies.

use folio_core::NodeId;

use crate::backlinks::Backlinks;
use crate::escape::escape_html;
use crate::html::{link_to, placeholder};
use crate::index::{DocumentIndex, IndexEntry};

/// Icon used when a document has none.
pub const DEFAULT_EMOJI: &str = "💡";

/// Wraps a rendered body into a complete HTML page.
///
/// The footer lists every document referencing `page`, once each, in id
/// order. It is omitted when there are none.
pub fn render_page(
    page: &IndexEntry,
    body: &str,
    backlinks: &Backlinks,
    index: &DocumentIndex,
) -> String {
    let title = escape_html(&page.title);
    let favicon = favicon(page.emoji.as_deref().unwrap_or(DEFAULT_EMOJI));

    let heading = match &page.emoji {
        Some(emoji) => format!(
            r#"<div class="title-row"><span class="emoji heading-icon">{}</span><h1>{title}</h1></div>"#,
            escape_html(emoji)
        ),
        None => format!("<h1>{title}</h1>"),
    };

    let footer = footer(&page.id, backlinks, index);

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title}</title>
  <link rel="icon" href="{favicon}">
  <meta property="og:title" content="{title}">
</head>
<body>
  <main>
    <header><a href="/">Home</a></header>
    {heading}
    {body}
    {footer}
  </main>
</body>
</html>
"#
    )
}

/// Inline SVG favicon drawing an emoji.
fn favicon(emoji: &str) -> String {
    let svg = format!(
        "<svg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 100 100'><text y='.9em' font-size='90'>{}</text></svg>",
        escape_html(emoji)
    );
    format!("data:image/svg+xml,{}", svg.replace('#', "%23").replace('"', "%22"))
}

fn footer(target: &NodeId, backlinks: &Backlinks, index: &DocumentIndex) -> String {
    let items: Vec<_> = backlinks
        .sources(target)
        .map(|source| match index.resolve(source) {
            Some(entry) => format!("<li>{}</li>", link_to(entry, None)),
            None => format!("<li>{}</li>", placeholder(source)),
        })
        .collect();

    if items.is_empty() {
        return String::new();
    }

    format!(
        "<footer><label>mentioned in</label><ul>{}</ul></footer>",
        items.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use folio_core::model::{Document, DocumentMeta};
    use jiff::Timestamp;

    use super::*;
    use crate::backlinks::BacklinkGraph;

    const A: &str = "aaaaaaaa-0000-0000-0000-000000000000";
    const B: &str = "bbbbbbbb-0000-0000-0000-000000000000";
    const C: &str = "cccccccc-0000-0000-0000-000000000000";

    fn index() -> DocumentIndex {
        let documents = [
            Document::new(DocumentMeta::new(A, "Alpha", Timestamp::UNIX_EPOCH), Vec::new()),
            Document::new(
                DocumentMeta::new(B, "Beta", Timestamp::UNIX_EPOCH).with_emoji("🌟"),
                Vec::new(),
            ),
            Document::new(DocumentMeta::new(C, "Gamma", Timestamp::UNIX_EPOCH), Vec::new()),
        ];
        DocumentIndex::from_documents(&documents)
    }

    #[tokio::test]
    async fn test_footer_lists_distinct_sorted_sources() {
        let index = index();
        let graph = BacklinkGraph::new();
        graph.record(&NodeId::new(C), &NodeId::new(A)).await;
        graph.record(&NodeId::new(B), &NodeId::new(A)).await;
        graph.record(&NodeId::new(C), &NodeId::new(A)).await;
        let backlinks = graph.snapshot().await;

        let page = index.resolve(&NodeId::new(A)).unwrap();
        let html = render_page(page, "<p>body</p>", &backlinks, &index);

        assert!(html.contains("<label>mentioned in</label>"));
        let beta = html.find("Beta").unwrap();
        let gamma = html.find("Gamma").unwrap();
        assert!(beta < gamma);
        assert_eq!(html.matches("Gamma</a>").count(), 1);
    }

    #[test]
    fn test_page_without_backlinks_has_no_footer() {
        let index = index();
        let page = index.resolve(&NodeId::new(C)).unwrap();

        let html = render_page(page, "<p>body</p>", &Backlinks::default(), &index);

        assert!(!html.contains("<footer>"));
        assert!(html.contains("<title>Gamma</title>"));
        assert!(html.contains("<h1>Gamma</h1>"));
        assert!(html.contains(DEFAULT_EMOJI));
    }

    #[test]
    fn test_page_with_emoji_has_title_row() {
        let index = index();
        let page = index.resolve(&NodeId::new(B)).unwrap();

        let html = render_page(page, "", &Backlinks::default(), &index);

        assert!(html.contains(r#"<div class="title-row">"#));
        assert!(html.contains("<text y='.9em' font-size='90'>🌟</text>"));
    }
}
