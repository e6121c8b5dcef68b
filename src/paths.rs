//! Typed paths for one sync run.
//!
//! The document and source root are resolved here, at the caller boundary, so
//! the transformer never derives locations on its own.
use crate::config::SyncConfig;
use std::path::{Path, PathBuf};

/// Source root relative to the document's directory when none is configured.
pub const DEFAULT_SOURCE_ROOT_REL: &str = "../../../../Tools/AutoLayout/src";

/// Resolved document and source-root locations.
#[derive(Debug, Clone)]
pub struct SyncPaths {
    document: PathBuf,
    source_root: PathBuf,
}

impl SyncPaths {
    /// Resolve locations from a validated config.
    pub fn from_config(config: &SyncConfig) -> Self {
        let document = config.document.clone();
        let source_root = match &config.source_root {
            Some(root) => root.clone(),
            None => document_dir(&document).join(DEFAULT_SOURCE_ROOT_REL),
        };
        Self {
            document,
            source_root,
        }
    }

    /// Return the document path that is read and rewritten.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Return the directory walked for source files.
    pub fn source_root(&self) -> &Path {
        &self.source_root
    }
}

fn document_dir(document: &Path) -> PathBuf {
    match document.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
