//! End-to-end site builds.

use std::collections::HashMap;
use std::time::Instant;

use folio_cache::{CacheDecision, CacheGate};
use folio_core::group::Grouper;
use folio_core::model::{Block, Document, DocumentMeta};
use folio_notion::StoreService;
use folio_render::{DocumentIndex, RenderedDocument, Renderer, render_page};
use futures::StreamExt;
use futures::future::join_all;
use futures::stream;
use jiff::Zoned;
use jiff::civil::Date;

use super::TRACING_TARGET;
use super::assembler::TreeAssembler;
use super::config::BuildConfig;
use super::context::BuildContext;
use super::report::{BuildReport, DocumentOutcome, DocumentReport};
use super::writer::PageWriter;
use crate::error::{BuildError, BuildResult};
use crate::seed::resolve_seed;

/// Content of a listed document after the fetch phase.
enum Fetched {
    Reused(Document),
    Assembled(DocumentMeta, Vec<Block>),
    Failed(DocumentMeta, BuildError),
}

/// A document ready for rendering.
struct Prepared {
    position: usize,
    document: Document,
    outcome: DocumentOutcome,
}

/// Builds a site from a document store.
///
/// A build runs in phases separated by barriers:
/// 1. list every document;
/// 2. prepare each document, reusing its snapshot or fetching and grouping
///    its tree;
/// 3. index all prepared documents;
/// 4. render every document, recording references;
/// 5. write the pages with their backlink footers.
///
/// Failures while preparing or writing a document are recorded in the
/// [`BuildReport`] and do not affect other documents.
#[derive(Debug, Clone)]
pub struct SiteBuilder {
    store: StoreService,
    gate: CacheGate,
    config: BuildConfig,
    grouper: Grouper,
    today: Option<Date>,
}

impl SiteBuilder {
    /// Creates a builder with the standard grouping passes.
    pub fn new(store: StoreService, gate: CacheGate, config: BuildConfig) -> Self {
        Self {
            store,
            gate,
            config,
            grouper: Grouper::standard(),
            today: None,
        }
    }

    /// Replaces the grouping passes.
    #[must_use]
    pub fn with_grouper(mut self, grouper: Grouper) -> Self {
        self.grouper = grouper;
        self
    }

    /// Fixes the date relative dates are rendered against.
    #[must_use]
    pub fn with_today(mut self, today: Date) -> Self {
        self.today = Some(today);
        self
    }

    /// Returns the build configuration.
    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Runs a complete build.
    ///
    /// # Errors
    ///
    /// Fails only when the build cannot start: invalid configuration, no
    /// seed, a failed document listing, or an output directory that cannot
    /// be created. Everything else is reported per document.
    pub async fn build(&self) -> BuildResult<BuildReport> {
        let started_at = Instant::now();
        self.config.validate()?;

        let seed = resolve_seed(self.config.seed.as_deref()).await?;
        let context = BuildContext::new(seed)?;

        let listed = self
            .store
            .list_all_documents()
            .await
            .map_err(BuildError::Listing)?;

        tracing::info!(
            target: TRACING_TARGET,
            documents = listed.len(),
            cache_disabled = self.gate.is_disabled(),
            concurrency = self.config.concurrency,
            "Starting build"
        );

        let (prepared, mut reports) = self.prepare(listed, &context).await;

        let index = DocumentIndex::from_documents(prepared.iter().map(|p| &p.document));

        let today = self.today.unwrap_or_else(|| Zoned::now().date());
        let rendered = self.render(&prepared, &index, today, &context).await;
        let backlinks = context.backlinks().snapshot().await;

        let writer = PageWriter::new(&self.config.output_dir);
        writer.prepare().await?;

        // Pages sharing an output name are written one after another in
        // listing order, so the last listed document wins.
        let written = stream::iter(by_output_name(prepared.into_iter().zip(rendered)))
            .map(|pages| {
                let writer = &writer;
                let index = &index;
                let backlinks = &backlinks;
                async move {
                    let mut reports = Vec::with_capacity(pages.len());
                    for (prepared, rendered) in pages {
                        let meta = &prepared.document.meta;
                        let result = match index.resolve(&meta.id) {
                            Some(entry) => {
                                let html = render_page(entry, &rendered.body, backlinks, index);
                                writer.write(&meta.output_name, &html).await
                            }
                            None => Err(BuildError::Internal(format!(
                                "document {} missing from index",
                                meta.id
                            ))),
                        };
                        reports.push(written_report(prepared, result));
                    }
                    reports
                }
            })
            .buffered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;

        reports.extend(written.into_iter().flatten());
        reports.sort_by_key(|(position, _)| *position);

        let report = BuildReport {
            documents: reports.into_iter().map(|(_, report)| report).collect(),
            references: context.backlinks().occurrence_count().await,
            strict: self.config.strict,
            elapsed: started_at.elapsed(),
        };

        tracing::info!(
            target: TRACING_TARGET,
            built = report.built(),
            reused = report.reused(),
            failed = report.failed(),
            references = report.references,
            synthetic_ids = context.ids().issued(),
            elapsed_ms = report.elapsed.as_millis(),
            "Build finished"
        );

        if report.failed() > 0 && !report.strict {
            tracing::warn!(
                target: TRACING_TARGET,
                failed = report.failed(),
                "Build completed with failed documents"
            );
        }

        Ok(report)
    }

    /// Prepares every listed document.
    ///
    /// Fetches run concurrently. Results are consumed in listing order so
    /// synthetic ids are allocated deterministically. Reused trees are
    /// regrouped as well, which gives them the ids an uncached build would.
    async fn prepare(
        &self,
        listed: Vec<DocumentMeta>,
        context: &BuildContext,
    ) -> (Vec<Prepared>, Vec<(usize, DocumentReport)>) {
        let assembler = TreeAssembler::new(self.store.clone(), self.config.concurrency);

        let fetched = stream::iter(listed)
            .map(|meta| self.fetch(&assembler, meta))
            .buffered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut prepared = Vec::with_capacity(fetched.len());
        let mut failures = Vec::new();

        for (position, fetched) in fetched.into_iter().enumerate() {
            match fetched {
                Fetched::Reused(Document { meta, blocks }) => {
                    let blocks = self.grouper.regroup(blocks, context.ids());
                    prepared.push(Prepared {
                        position,
                        document: Document::new(meta, blocks),
                        outcome: DocumentOutcome::Reused,
                    });
                }
                Fetched::Assembled(meta, blocks) => {
                    let blocks = self.grouper.apply(blocks, context.ids());
                    let document = Document::new(meta, blocks);
                    tracing::debug!(
                        target: TRACING_TARGET,
                        doc_id = %document.meta.id,
                        blocks = document.block_count(),
                        "Assembled document"
                    );
                    prepared.push(Prepared {
                        position,
                        document,
                        outcome: DocumentOutcome::Built,
                    });
                }
                Fetched::Failed(meta, error) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        doc_id = %meta.id,
                        error = %error,
                        retryable = error.is_retryable(),
                        "Document failed"
                    );
                    failures.push((position, failed_report(meta, &error)));
                }
            }
        }

        let built = prepared
            .iter()
            .filter(|p| p.outcome == DocumentOutcome::Built);
        join_all(built.map(|p| self.persist(&p.document))).await;

        (prepared, failures)
    }

    async fn fetch(&self, assembler: &TreeAssembler, meta: DocumentMeta) -> Fetched {
        match self.gate.decide(&meta).await {
            CacheDecision::Reuse(snapshot) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    doc_id = %meta.id,
                    "Reusing snapshot"
                );
                Fetched::Reused(snapshot.into_document(meta))
            }
            CacheDecision::Rebuild(reason) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    doc_id = %meta.id,
                    reason = %reason,
                    "Fetching document"
                );
                match assembler.assemble(&meta.id).await {
                    Ok(blocks) => Fetched::Assembled(meta, blocks),
                    Err(source) => {
                        let doc_id = meta.id.clone();
                        Fetched::Failed(meta, BuildError::Document { doc_id, source })
                    }
                }
            }
        }
    }

    async fn persist(&self, document: &Document) {
        if let Err(error) = self.gate.persist(document).await {
            tracing::warn!(
                target: TRACING_TARGET,
                doc_id = %document.meta.id,
                error = %error,
                "Failed to store snapshot"
            );
        }
    }

    /// Renders every document and records its references.
    async fn render(
        &self,
        prepared: &[Prepared],
        index: &DocumentIndex,
        today: Date,
        context: &BuildContext,
    ) -> Vec<RenderedDocument> {
        let renderer = Renderer::new(index, today);

        join_all(prepared.iter().map(|p| async move {
            let rendered = renderer.render_document(&p.document);
            context
                .backlinks()
                .record_all(&rendered.id, &rendered.references)
                .await;
            rendered
        }))
        .await
    }
}

/// Buckets pages by output name, keeping listing order within each bucket
/// and ordering buckets by first appearance.
fn by_output_name(
    pages: impl IntoIterator<Item = (Prepared, RenderedDocument)>,
) -> Vec<Vec<(Prepared, RenderedDocument)>> {
    let mut buckets: Vec<Vec<(Prepared, RenderedDocument)>> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();

    for (prepared, rendered) in pages {
        let name = prepared.document.meta.output_name.clone();
        match slots.get(&name) {
            Some(&slot) => {
                if let Some((previous, _)) = buckets[slot].last() {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        output = %name,
                        doc_id = %prepared.document.meta.id,
                        previous_id = %previous.document.meta.id,
                        "Output name used by more than one document"
                    );
                }
                buckets[slot].push((prepared, rendered));
            }
            None => {
                slots.insert(name, buckets.len());
                buckets.push(vec![(prepared, rendered)]);
            }
        }
    }

    buckets
}

fn failed_report(meta: DocumentMeta, error: &BuildError) -> DocumentReport {
    DocumentReport {
        id: meta.id,
        title: meta.title,
        output: None,
        outcome: DocumentOutcome::Failed(error.to_string()),
    }
}

fn written_report(
    prepared: Prepared,
    result: BuildResult<std::path::PathBuf>,
) -> (usize, DocumentReport) {
    let Prepared {
        position,
        document,
        outcome,
    } = prepared;

    let report = match result {
        Ok(path) => DocumentReport {
            id: document.meta.id,
            title: document.meta.title,
            output: Some(path),
            outcome,
        },
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                doc_id = %document.meta.id,
                error = %error,
                "Failed to write page"
            );
            failed_report(document.meta, &error)
        }
    };

    (position, report)
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use folio_cache::SnapshotStore;
    use folio_test::MockDocumentStore;
    use folio_test::fixtures::{bullet, meta, mention, paragraph, rich_paragraph};
    use jiff::civil::date;

    use super::*;

    fn site(store: &MockDocumentStore, gate: CacheGate, output: &Path, strict: bool) -> SiteBuilder {
        let config = BuildConfig::builder()
            .output_dir(output)
            .seed("abc")
            .strict(strict)
            .concurrency(4usize)
            .build()
            .unwrap();
        SiteBuilder::new(store.service(), gate, config).with_today(date(2024, 3, 1))
    }

    fn memory_gate() -> CacheGate {
        CacheGate::new(SnapshotStore::memory().unwrap(), false)
    }

    fn three_documents() -> MockDocumentStore {
        MockDocumentStore::new()
            .with_document(meta("x", "X", 0), vec![paragraph("x1", "from x")])
            .with_document(meta("y", "Y", 0), vec![paragraph("y1", "from y")])
            .with_document(meta("z", "Z", 0), vec![paragraph("z1", "from z")])
    }

    fn read(dir: &Path, name: &str) -> String {
        std::fs::read_to_string(dir.join(name)).unwrap()
    }

    #[tokio::test]
    async fn test_failing_document_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_documents().with_failure("x");

        let report = site(&store, memory_gate(), dir.path(), false)
            .build()
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.built(), 2);
        assert!(report.is_success());
        assert_eq!(report.documents[0].id.as_str(), "x");
        assert!(report.documents[0].outcome.is_failed());
        assert!(read(dir.path(), "y.html").contains("from y"));
        assert!(read(dir.path(), "z.html").contains("from z"));
        assert!(!dir.path().join("x.html").exists());
    }

    #[tokio::test]
    async fn test_strict_build_is_unsuccessful_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_documents().with_failure("y");

        let report = site(&store, memory_gate(), dir.path(), true)
            .build()
            .await
            .unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures().next().map(|d| d.id.as_str()), Some("y"));
    }

    #[tokio::test]
    async fn test_listing_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_documents().with_failing_listing();

        let result = site(&store, memory_gate(), dir.path(), false).build().await;

        assert!(matches!(result, Err(BuildError::Listing(_))));
    }

    #[tokio::test]
    async fn test_second_build_reuses_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_documents();
        let gate = memory_gate();

        let first = site(&store, gate.clone(), dir.path(), false)
            .build()
            .await
            .unwrap();
        let calls = store.children_calls();

        let second = site(&store, gate, dir.path(), false)
            .build()
            .await
            .unwrap();

        assert_eq!(first.built(), 3);
        assert_eq!(second.reused(), 3);
        assert_eq!(store.children_calls(), calls);
        assert!(read(dir.path(), "z.html").contains("from z"));
    }

    #[tokio::test]
    async fn test_disabled_cache_fetches_again() {
        let dir = tempfile::tempdir().unwrap();
        let store = three_documents();
        let snapshots = SnapshotStore::memory().unwrap();

        site(&store, CacheGate::new(snapshots.clone(), false), dir.path(), false)
            .build()
            .await
            .unwrap();
        let calls = store.children_calls();

        let report = site(&store, CacheGate::new(snapshots, true), dir.path(), false)
            .build()
            .await
            .unwrap();

        assert_eq!(report.built(), 3);
        assert_eq!(store.children_calls(), calls * 2);
    }

    #[tokio::test]
    async fn test_backlinks_are_collected_across_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = MockDocumentStore::new()
            .with_document(meta("x", "X", 0), vec![paragraph("x1", "target")])
            .with_document(
                meta("y", "Y", 0),
                vec![rich_paragraph("y1", vec![mention("x"), mention("x")])],
            )
            .with_document(
                meta("z", "Z", 0),
                vec![rich_paragraph("z1", vec![mention("x"), mention("nope")])],
            );

        let report = site(&store, memory_gate(), dir.path(), false)
            .build()
            .await
            .unwrap();

        assert_eq!(report.references, 3);

        let x = read(dir.path(), "x.html");
        assert!(x.contains("<label>mentioned in</label>"));
        assert!(x.contains(r#"<li><a href="/y.html">Y</a></li>"#));
        assert!(x.contains(r#"<li><a href="/z.html">Z</a></li>"#));

        let z = read(dir.path(), "z.html");
        assert!(z.contains(r#"<a href="/x.html">X</a>"#));
        assert!(z.contains("[nope]"));
        assert!(!z.contains("mentioned in"));
    }

    #[tokio::test]
    async fn test_group_ids_follow_listing_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = MockDocumentStore::new()
            .with_document(meta("x", "X", 0), vec![bullet("x1", "a"), bullet("x2", "b")])
            .with_document(meta("y", "Y", 0), vec![bullet("y1", "c")])
            .with_delay("x", Duration::from_millis(50));

        site(&store, memory_gate(), dir.path(), false)
            .build()
            .await
            .unwrap();

        // Seed "abc" issues dbfcfd0d-... first and 4bdd0bbf-... second.
        assert!(read(dir.path(), "x.html").contains(r#"<ul id="bdbfcfd0d">"#));
        assert!(read(dir.path(), "y.html").contains(r#"<ul id="b4bdd0bbf">"#));
    }

    #[tokio::test]
    async fn test_uncached_builds_are_deterministic() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let store = MockDocumentStore::new().with_document(
            meta("x", "X", 0),
            vec![bullet("a", "a"), paragraph("p", "p"), bullet("b", "b")],
        );

        for dir in [&first, &second] {
            let gate = CacheGate::new(SnapshotStore::memory().unwrap(), true);
            site(&store, gate, dir.path(), false).build().await.unwrap();
        }

        assert_eq!(read(first.path(), "x.html"), read(second.path(), "x.html"));
    }

    #[tokio::test]
    async fn test_last_listed_document_owns_a_shared_output() {
        let dir = tempfile::tempdir().unwrap();
        let store = MockDocumentStore::new()
            .with_document(
                meta("a", "A", 0).with_output_name("same.html"),
                vec![paragraph("a1", "from a")],
            )
            .with_document(
                meta("b", "B", 0).with_output_name("same.html"),
                vec![paragraph("b1", "from b")],
            );

        for _ in 0..5 {
            let report = site(&store, memory_gate(), dir.path(), false)
                .build()
                .await
                .unwrap();
            assert_eq!(report.failed(), 0);

            let page = read(dir.path(), "same.html");
            assert!(page.contains("from b"));
            assert!(!page.contains("from a"));
        }
    }

    #[tokio::test]
    async fn test_cached_build_matches_uncached_build() {
        let cached = tempfile::tempdir().unwrap();
        let uncached = tempfile::tempdir().unwrap();
        let gate = memory_gate();

        let before = MockDocumentStore::new()
            .with_document(meta("x", "X", 0), vec![bullet("x1", "a")])
            .with_document(meta("y", "Y", 0), vec![paragraph("y1", "b")]);
        site(&before, gate.clone(), cached.path(), false)
            .build()
            .await
            .unwrap();

        let after = MockDocumentStore::new()
            .with_document(meta("x", "X", 0), vec![bullet("x1", "a")])
            .with_document(meta("y", "Y", 10), vec![bullet("y1", "b")]);
        let report = site(&after, gate, cached.path(), false)
            .build()
            .await
            .unwrap();
        assert_eq!(report.reused(), 1);
        assert_eq!(report.built(), 1);

        let disabled = CacheGate::new(SnapshotStore::memory().unwrap(), true);
        site(&after, disabled, uncached.path(), false)
            .build()
            .await
            .unwrap();

        for name in ["x.html", "y.html"] {
            assert_eq!(read(cached.path(), name), read(uncached.path(), name));
        }
        assert!(read(cached.path(), "x.html").contains(r#"<ul id="bdbfcfd0d">"#));
        assert!(read(cached.path(), "y.html").contains(r#"<ul id="b4bdd0bbf">"#));
    }

    #[tokio::test]
    async fn test_unwritable_output_directory_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let occupied = dir.path().join("occupied");
        std::fs::write(&occupied, "not a directory").unwrap();

        let result = site(&three_documents(), memory_gate(), &occupied, false)
            .build()
            .await;

        assert!(matches!(result, Err(BuildError::Output { .. })));
    }
}
