//! The `build` subcommand.

use anyhow::{Context, bail};
use folio_cache::{CacheGate, SnapshotStore};
use folio_notion::reqwest::NotionClient;
use folio_runtime::engine::{BuildReport, SiteBuilder};

use crate::TRACING_TARGET_BUILD;
use crate::config::BuildArgs;

/// Builds the site and fails when a strict build had failed documents.
pub async fn run(args: BuildArgs) -> anyhow::Result<()> {
    let BuildArgs { notion, build } = args;

    build.validate().context("invalid build configuration")?;

    let client = NotionClient::new(notion).context("failed to create Notion client")?;
    let cache_dir = std::path::absolute(&build.cache_dir).context("invalid cache directory")?;
    let snapshots = SnapshotStore::fs(&cache_dir).with_context(|| {
        format!("failed to open snapshot cache at {}", cache_dir.display())
    })?;
    let gate = CacheGate::new(snapshots, build.no_cache);

    let builder = SiteBuilder::new(client.into_service(), gate, build);
    let report = builder.build().await.context("build failed")?;

    log_report(&report);

    if !report.is_success() {
        bail!("{} of {} documents failed", report.failed(), report.documents.len());
    }

    Ok(())
}

fn log_report(report: &BuildReport) {
    for failure in report.failures() {
        tracing::error!(
            target: TRACING_TARGET_BUILD,
            doc_id = %failure.id,
            title = %failure.title,
            outcome = ?failure.outcome,
            "Document was not built"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_BUILD,
        built = report.built(),
        reused = report.reused(),
        failed = report.failed(),
        elapsed_ms = report.elapsed.as_millis(),
        "Site written"
    );
}
