//! Block tree to HTML.

use folio_core::NodeId;
use folio_core::model::{
    Annotations, Block, BlockKind, Document, FileSource, Mention, RichText, concatenate,
};
use jiff::civil::Date;

use crate::TRACING_TARGET;
use crate::date::relative_date;
use crate::escape::escape_html;
use crate::index::{DocumentIndex, IndexEntry};

/// A rendered document body and the references it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub id: NodeId,
    pub body: String,
    /// Known documents referenced by the body, once per occurrence.
    pub references: Vec<NodeId>,
}

/// Renders grouped block trees against a complete [`DocumentIndex`].
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    index: &'a DocumentIndex,
    today: Date,
}

impl<'a> Renderer<'a> {
    /// Creates a renderer. `today` anchors relative dates.
    pub fn new(index: &'a DocumentIndex, today: Date) -> Self {
        Self { index, today }
    }

    /// Renders the body of a document.
    pub fn render_document(&self, document: &Document) -> RenderedDocument {
        let mut context = RenderContext {
            index: self.index,
            today: self.today,
            source: &document.meta.id,
            references: Vec::new(),
        };

        let body = context.blocks(&document.blocks);

        tracing::debug!(
            target: TRACING_TARGET,
            doc_id = %document.meta.id,
            references = context.references.len(),
            size = body.len(),
            "Rendered document"
        );

        RenderedDocument {
            id: document.meta.id.clone(),
            body,
            references: context.references,
        }
    }
}

/// Renders a link to an indexed document.
///
/// `title_html` replaces the document title; it must already be escaped.
pub(crate) fn link_to(entry: &IndexEntry, title_html: Option<&str>) -> String {
    let title = match title_html {
        Some(title) => title.to_owned(),
        None => escape_html(&entry.title),
    };
    let href = escape_html(&entry.output_name);

    match &entry.emoji {
        Some(emoji) => format!(
            r#"<a href="/{href}" class="with-emoji"><span class="emoji">{}</span>{title}</a>"#,
            escape_html(emoji)
        ),
        None => format!(r#"<a href="/{href}">{title}</a>"#),
    }
}

/// Placeholder emitted for references to unknown documents.
pub(crate) fn placeholder(id: &NodeId) -> String {
    format!("[{}]", escape_html(id.as_str()))
}

/// HTML element id of a block.
fn element_id(block: &Block) -> String {
    format!("b{}", block.id.short())
}

/// State of one document render.
struct RenderContext<'a> {
    index: &'a DocumentIndex,
    today: Date,
    source: &'a NodeId,
    references: Vec<NodeId>,
}

impl RenderContext<'_> {
    fn blocks(&mut self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.block(block))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block(&mut self, block: &Block) -> String {
        let id = element_id(block);
        let children = self.blocks(&block.children);

        let rendered = match &block.kind {
            BlockKind::BulletedList => return format!(r#"<ul id="{id}">{children}</ul>"#),
            BlockKind::NumberedList => return format!(r#"<ol id="{id}">{children}</ol>"#),
            BlockKind::BulletedListItem(text) | BlockKind::NumberedListItem(text) => {
                return format!(
                    r#"<li id="{id}"><div class="list-item">{}</div>{children}</li>"#,
                    self.rich_text(&text.rich_text)
                );
            }
            BlockKind::Toggle(text) => {
                return format!(
                    r#"<details id="{id}"><summary>{}</summary>{children}</details>"#,
                    self.rich_text(&text.rich_text)
                );
            }
            BlockKind::Quote(text) => {
                return format!(
                    r#"<blockquote id="{id}"><p>{}</p>{children}</blockquote>"#,
                    self.rich_text(&text.rich_text)
                );
            }
            BlockKind::Paragraph(text) => {
                format!(r#"<p id="{id}">{}</p>"#, self.rich_text(&text.rich_text))
            }
            BlockKind::Heading1(text) => {
                format!(r#"<h1 id="{id}">{}</h1>"#, self.rich_text(&text.rich_text))
            }
            BlockKind::Heading2(text) => {
                format!(r#"<h2 id="{id}">{}</h2>"#, self.rich_text(&text.rich_text))
            }
            BlockKind::Heading3(text) => {
                format!(r#"<h3 id="{id}">{}</h3>"#, self.rich_text(&text.rich_text))
            }
            BlockKind::Code(code) => {
                let language = code.language.to_lowercase();
                let class = language.split_whitespace().collect::<Vec<_>>().join("-");
                format!(
                    r#"<pre id="{id}"><code class="language-{}">{}</code></pre>"#,
                    escape_html(&class),
                    escape_html(&concatenate(&code.rich_text))
                )
            }
            BlockKind::Equation(equation) => format!(
                r#"<div id="{id}" class="equation">\[{}\]</div>"#,
                escape_html(&equation.expression)
            ),
            BlockKind::Image(image) => {
                let alt = escape_html(&concatenate(&image.caption));
                let src = escape_html(image.source.url());
                if matches!(image.source, FileSource::File { .. }) {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        block_id = %block.id,
                        "Linking hosted image by its expiring URL"
                    );
                }
                format!(
                    r#"<figure id="{id}"><img alt="{alt}" src="{src}"><figcaption>{}</figcaption></figure>"#,
                    self.rich_text(&image.caption)
                )
            }
            BlockKind::ToDo(todo) => format!(
                r#"<div id="{id}"><label><input type="checkbox" onclick="return false"{}> {}</label></div>"#,
                if todo.checked { " checked" } else { "" },
                self.rich_text(&todo.rich_text)
            ),
            BlockKind::Divider => format!(r#"<hr id="{id}" />"#),
            BlockKind::Unsupported => {
                format!(r#"<div id="{id}" class="unsupported">[unsupported]</div>"#)
            }
            BlockKind::Unknown(unknown) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    doc_id = %self.source,
                    block_id = %block.id,
                    block_type = %unknown.name,
                    "Rendering unsupported block marker"
                );
                format!(
                    r#"<div id="{id}" class="unsupported">[unsupported: {}]</div>"#,
                    escape_html(&unknown.name)
                )
            }
        };

        if children.is_empty() {
            rendered
        } else {
            format!(r#"{rendered}<div class="children">{children}</div>"#)
        }
    }

    fn rich_text(&mut self, texts: &[RichText]) -> String {
        texts.iter().map(|text| self.inline(text)).collect()
    }

    fn inline(&mut self, text: &RichText) -> String {
        match text {
            RichText::Text { text, annotations } => {
                let content = annotate(escape_html(&text.content), annotations);
                match &text.link {
                    Some(link) => self.link(&link.url, content),
                    None => content,
                }
            }
            RichText::Mention {
                mention,
                annotations,
                plain_text,
            } => match mention {
                Mention::Page { page } => self.reference(&page.id, None),
                Mention::Date { date } => {
                    let formatted = relative_date(&date.start, self.today)
                        .unwrap_or_else(|| date.start.clone());
                    annotate(escape_html(&formatted), annotations)
                }
                Mention::Unknown => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        doc_id = %self.source,
                        "Unrecognized mention, using its plain text"
                    );
                    annotate(escape_html(plain_text), annotations)
                }
            },
            RichText::Equation {
                equation,
                annotations,
            } => annotate(
                format!(
                    r#"<span class="equation">\({}\)</span>"#,
                    escape_html(&equation.expression)
                ),
                annotations,
            ),
            RichText::Unknown => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    doc_id = %self.source,
                    "Skipping unrecognized inline text"
                );
                String::new()
            }
        }
    }

    /// Renders a hyperlink; relative links to document ids become references.
    fn link(&mut self, url: &str, content: String) -> String {
        if let Some(target) = url.strip_prefix('/') {
            let target = target
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            if let Some(id) = NodeId::parse(target) {
                return self.reference(&id, Some(&content));
            }
        }

        format!(r#"<a href="{}">{content}</a>"#, escape_html(url))
    }

    /// Resolves a reference to another document, recording it if known.
    fn reference(&mut self, target: &NodeId, title_html: Option<&str>) -> String {
        match self.index.resolve(target) {
            Some(entry) => {
                self.references.push(target.clone());
                link_to(entry, title_html)
            }
            None => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    doc_id = %self.source,
                    target_id = %target,
                    "Reference to unknown document"
                );
                placeholder(target)
            }
        }
    }
}

fn annotate(mut content: String, annotations: &Annotations) -> String {
    if annotations.bold {
        content = format!("<strong>{content}</strong>");
    }
    if annotations.italic {
        content = format!("<em>{content}</em>");
    }
    if annotations.underline {
        content = format!("<u>{content}</u>");
    }
    if annotations.strikethrough {
        content = format!("<s>{content}</s>");
    }
    if annotations.code {
        content = format!("<code>{content}</code>");
    }
    content
}

#[cfg(test)]
mod tests {
    use folio_core::IdGenerator;
    use folio_core::group::Grouper;
    use folio_core::model::{
        CodeBlock, DocumentMeta, EquationBlock, FileUrl, ImageBlock, TextBlock, ToDoBlock,
        UnknownBlock,
    };
    use jiff::Timestamp;
    use jiff::civil::date;

    use super::*;

    const SOURCE: &str = "11111111-1111-1111-1111-111111111111";
    const TARGET: &str = "c3d85220-62aa-457a-b414-90c5e9929790";
    const MISSING: &str = "99999999-9999-9999-9999-999999999999";

    fn index() -> DocumentIndex {
        let documents = [
            Document::new(
                DocumentMeta::new(SOURCE, "Source", Timestamp::UNIX_EPOCH),
                Vec::new(),
            ),
            Document::new(
                DocumentMeta::new(TARGET, "Target <page>", Timestamp::UNIX_EPOCH)
                    .with_output_name("target.html")
                    .with_emoji("🌟"),
                Vec::new(),
            ),
        ];
        DocumentIndex::from_documents(&documents)
    }

    fn render(blocks: Vec<Block>) -> RenderedDocument {
        let index = index();
        let renderer = Renderer::new(&index, date(2024, 3, 10));
        let document = Document::new(
            DocumentMeta::new(SOURCE, "Source", Timestamp::UNIX_EPOCH),
            blocks,
        );
        renderer.render_document(&document)
    }

    fn paragraph(id: &str, texts: Vec<RichText>) -> Block {
        Block::new(id, BlockKind::Paragraph(TextBlock::new(texts)))
    }

    #[test]
    fn test_paragraph_is_escaped_with_element_id() {
        let rendered = render(vec![paragraph(
            "abcdef12-0000-0000-0000-000000000000",
            vec![RichText::plain("a < b & c")],
        )]);
        assert_eq!(rendered.body, r#"<p id="babcdef12">a &lt; b &amp; c</p>"#);
        assert!(rendered.references.is_empty());
    }

    #[test]
    fn test_annotations_nest() {
        let text = RichText::Text {
            text: folio_core::model::TextContent {
                content: "x".into(),
                link: None,
            },
            annotations: Annotations {
                bold: true,
                code: true,
                ..Annotations::default()
            },
        };
        let rendered = render(vec![paragraph("p", vec![text])]);
        assert!(rendered.body.contains("<code><strong>x</strong></code>"));
    }

    #[test]
    fn test_page_mention_links_and_records() {
        let rendered = render(vec![paragraph(
            "p",
            vec![RichText::page_mention(NodeId::new(TARGET))],
        )]);

        assert!(rendered.body.contains(r#"<a href="/target.html" class="with-emoji">"#));
        assert!(rendered.body.contains("Target &lt;page&gt;"));
        assert_eq!(rendered.references, vec![NodeId::new(TARGET)]);
    }

    #[test]
    fn test_relative_link_uses_own_text() {
        let rendered = render(vec![paragraph(
            "p",
            vec![RichText::link("see here", "/c3d8522062aa457ab41490c5e9929790#section")],
        )]);

        assert!(rendered.body.contains("see here</a>"));
        assert!(!rendered.body.contains("Target &lt;page&gt;"));
        assert_eq!(rendered.references, vec![NodeId::new(TARGET)]);
    }

    #[test]
    fn test_each_occurrence_is_reported() {
        let mention = RichText::page_mention(NodeId::new(TARGET));
        let rendered = render(vec![
            paragraph("p1", vec![mention.clone(), mention.clone()]),
            paragraph("p2", vec![mention]),
        ]);
        assert_eq!(rendered.references.len(), 3);
    }

    #[test]
    fn test_unknown_target_is_a_placeholder() {
        let rendered = render(vec![paragraph(
            "p",
            vec![RichText::page_mention(NodeId::new(MISSING))],
        )]);

        assert!(rendered.body.contains(&format!("[{MISSING}]")));
        assert!(rendered.references.is_empty());
    }

    #[test]
    fn test_non_id_relative_link_stays_a_link() {
        let rendered = render(vec![paragraph("p", vec![RichText::link("about", "/about")])]);
        assert!(rendered.body.contains(r#"<a href="/about">about</a>"#));
        assert!(rendered.references.is_empty());
    }

    #[test]
    fn test_external_link_is_escaped() {
        let rendered = render(vec![paragraph(
            "p",
            vec![RichText::link("q", "https://example.com/?a=1&b=2")],
        )]);
        assert!(
            rendered
                .body
                .contains(r#"<a href="https://example.com/?a=1&amp;b=2">q</a>"#)
        );
    }

    #[test]
    fn test_date_mention_is_relative() {
        let rendered = render(vec![paragraph(
            "p",
            vec![RichText::date_mention("2024-03-11")],
        )]);
        assert!(rendered.body.contains(">Tomorrow</p>"));
    }

    #[test]
    fn test_grouped_lists() {
        let generator = IdGenerator::new("seed").unwrap();
        let blocks = Grouper::standard().apply(
            vec![
                Block::new("b1", BlockKind::BulletedListItem(TextBlock::plain("one"))),
                Block::new("b2", BlockKind::BulletedListItem(TextBlock::plain("two"))),
                Block::new("n1", BlockKind::NumberedListItem(TextBlock::plain("first"))),
            ],
            &generator,
        );

        let body = render(blocks).body;
        assert!(body.starts_with("<ul id=\"b"));
        assert!(body.contains(r#"<li id="bb1"><div class="list-item">one</div></li>"#));
        assert!(body.contains("<ol id=\"b"));
        assert_eq!(body.matches("<li ").count(), 3);
    }

    #[test]
    fn test_toggle_contains_children() {
        let toggle = Block::new("t", BlockKind::Toggle(TextBlock::plain("more")))
            .with_children(vec![paragraph("c", vec![RichText::plain("hidden")])]);

        let body = render(vec![toggle]).body;
        assert_eq!(
            body,
            r#"<details id="bt"><summary>more</summary><p id="bc">hidden</p></details>"#
        );
    }

    #[test]
    fn test_leaf_kinds_keep_children() {
        let parent = paragraph("p", vec![RichText::plain("parent")])
            .with_children(vec![paragraph("c", vec![RichText::plain("child")])]);

        let body = render(vec![parent]).body;
        assert!(body.contains(r#"<div class="children"><p id="bc">child</p></div>"#));
    }

    #[test]
    fn test_code_block() {
        let code = Block::new(
            "c",
            BlockKind::Code(CodeBlock {
                rich_text: vec![RichText::plain("if a < b {}")],
                language: "Plain Text".into(),
            }),
        );

        let body = render(vec![code]).body;
        assert_eq!(
            body,
            r#"<pre id="bc"><code class="language-plain-text">if a &lt; b {}</code></pre>"#
        );
    }

    #[test]
    fn test_remaining_kinds() {
        let blocks = vec![
            Block::new(
                "e",
                BlockKind::Equation(EquationBlock {
                    expression: "a<b".into(),
                }),
            ),
            Block::new(
                "i",
                BlockKind::Image(ImageBlock {
                    source: FileSource::External {
                        external: FileUrl {
                            url: "https://example.com/a.png".into(),
                        },
                    },
                    caption: vec![RichText::plain("cap")],
                }),
            ),
            Block::new(
                "t",
                BlockKind::ToDo(ToDoBlock {
                    rich_text: vec![RichText::plain("done")],
                    checked: true,
                }),
            ),
            Block::new("d", BlockKind::Divider),
            Block::new("u", BlockKind::Unsupported),
            Block::new(
                "x",
                BlockKind::Unknown(UnknownBlock {
                    name: "synced_block".into(),
                    payload: serde_json::Value::Null,
                }),
            ),
        ];

        let body = render(blocks).body;
        assert!(body.contains(r"\[a&lt;b\]"));
        assert!(body.contains(r#"<img alt="cap" src="https://example.com/a.png">"#));
        assert!(body.contains(" checked> done"));
        assert!(body.contains(r#"<hr id="bd" />"#));
        assert!(body.contains("[unsupported]"));
        assert!(body.contains("[unsupported: synced_block]"));
    }
}
