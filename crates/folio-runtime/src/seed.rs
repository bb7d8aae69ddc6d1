//! Build seed resolution.

use tokio::process::Command;

use crate::TRACING_TARGET;
use crate::error::{BuildError, BuildResult};

/// Resolves the seed for synthetic node ids.
///
/// A configured, non-blank seed wins. Otherwise the current git revision
/// (`git rev-parse HEAD`) is used, so rebuilding the same commit yields the
/// same ids.
///
/// # Errors
///
/// Returns [`BuildError::Seed`] when no seed is configured and git cannot
/// provide a revision.
pub async fn resolve_seed(configured: Option<&str>) -> BuildResult<String> {
    if let Some(seed) = configured.map(str::trim).filter(|seed| !seed.is_empty()) {
        tracing::debug!(target: TRACING_TARGET, "Using configured build seed");
        return Ok(seed.to_owned());
    }

    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .await
        .map_err(|e| BuildError::Seed(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        return Err(BuildError::Seed(format!(
            "git rev-parse HEAD exited with {}",
            output.status
        )));
    }

    let revision = parse_revision(&output.stdout)
        .ok_or_else(|| BuildError::Seed("git returned an empty revision".into()))?;

    tracing::debug!(target: TRACING_TARGET, revision = %revision, "Using git revision as build seed");
    Ok(revision)
}

fn parse_revision(stdout: &[u8]) -> Option<String> {
    let revision = String::from_utf8_lossy(stdout).trim().to_owned();
    (!revision.is_empty()).then_some(revision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_seed_wins() {
        let seed = resolve_seed(Some("  release-7 ")).await.unwrap();
        assert_eq!(seed, "release-7");
    }

    #[test]
    fn test_parse_revision() {
        assert_eq!(parse_revision(b"3f2c1e0\n").as_deref(), Some("3f2c1e0"));
        assert_eq!(parse_revision(b" \n"), None);
    }
}
