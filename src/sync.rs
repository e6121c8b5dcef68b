//! One sync run: read the document, catalog the sources, splice, publish.
//!
//! All reads and the whole splice happen before the single write, so any
//! failure leaves the document as it was.
use crate::catalog::SourceCatalog;
use crate::config::SyncConfig;
use crate::paths::SyncPaths;
use crate::publish::write_if_changed;
use crate::splice::{splice_document, SpliceSummary};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Rewrite the document when it changes.
    Write,
    /// Fail when the document would change; never write.
    Check,
}

#[derive(Debug)]
pub struct SyncReport {
    pub summary: SpliceSummary,
    pub changed: bool,
    pub written: bool,
}

pub fn run_sync(config: &SyncConfig, mode: SyncMode) -> Result<SyncReport> {
    let paths = SyncPaths::from_config(config);
    let document = read_document(paths.document(), mode)?;

    let catalog = SourceCatalog::scan(
        paths.source_root(),
        &config.source_extension,
        &config.comment_prefix,
    )?;
    if catalog.is_empty() {
        tracing::warn!(
            root = %paths.source_root().display(),
            extension = %config.source_extension,
            "no source files found"
        );
    } else {
        tracing::debug!(sources = catalog.len(), "catalog built");
    }

    let outcome = splice_document(&document, &catalog, &config.markup)
        .with_context(|| format!("sync {}", paths.document().display()))?;
    let changed = outcome.text != document;

    let written = match mode {
        SyncMode::Check if changed => {
            return Err(anyhow!(
                "{} is out of date ({} section(s) to refresh)",
                paths.document().display(),
                outcome.summary.matched.len()
            ));
        }
        SyncMode::Check => false,
        SyncMode::Write => write_if_changed(paths.document(), &document, &outcome.text)?,
    };

    tracing::info!(
        document = %paths.document().display(),
        matched = outcome.summary.matched.len(),
        unmatched = outcome.summary.unmatched,
        blocks_dropped = outcome.summary.blocks_dropped,
        changed,
        written,
        "sync complete"
    );
    Ok(SyncReport {
        summary: outcome.summary,
        changed,
        written,
    })
}

fn read_document(path: &Path, mode: SyncMode) -> Result<String> {
    let metadata =
        fs::metadata(path).with_context(|| format!("read document {}", path.display()))?;
    if mode == SyncMode::Write && metadata.permissions().readonly() {
        return Err(anyhow!("document {} is read-only", path.display()));
    }
    fs::read_to_string(path).with_context(|| format!("read document {}", path.display()))
}
