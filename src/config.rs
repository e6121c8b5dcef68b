//! Sync configuration helpers.
//!
//! Loads, validates, and merges the optional JSON config so the transformer
//! only ever sees fully-resolved settings.
use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_DOCUMENT: &str = "AutoLayout_sdd.tex";
pub const DEFAULT_SOURCE_EXTENSION: &str = ".m";
pub const DEFAULT_COMMENT_PREFIX: &str = "%";
pub const DEFAULT_BLOCK_BEGIN: &str = "\\begin{lstlisting}";
pub const DEFAULT_BLOCK_END: &str = "\\end{lstlisting}";
pub const DEFAULT_ESCAPE: char = '\\';

/// Document markup tokens recognized by the splice pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Markup {
    pub block_begin: String,
    pub block_end: String,
    pub escape: char,
}

impl Default for Markup {
    fn default() -> Self {
        Self {
            block_begin: DEFAULT_BLOCK_BEGIN.to_string(),
            block_end: DEFAULT_BLOCK_END.to_string(),
            escape: DEFAULT_ESCAPE,
        }
    }
}

impl Markup {
    /// Compile the section-name pattern: the text between the first `{` and
    /// the next `}`. A `}` ahead of the first `{` means no name.
    pub fn section_name_pattern(&self) -> Regex {
        Regex::new(r"^[^{}]*\{([^}]*)\}").expect("section name pattern")
    }
}

/// On-disk config layout (`protosync.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub schema_version: u32,
    pub document: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<PathBuf>,
    pub source_extension: String,
    pub comment_prefix: String,
    pub markup: Markup,
}

impl Default for SyncConfig {
    fn default() -> Self {
        default_config()
    }
}

/// Build the config used when no file or flag says otherwise.
pub fn default_config() -> SyncConfig {
    SyncConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        document: PathBuf::from(DEFAULT_DOCUMENT),
        source_root: None,
        source_extension: DEFAULT_SOURCE_EXTENSION.to_string(),
        comment_prefix: DEFAULT_COMMENT_PREFIX.to_string(),
        markup: Markup::default(),
    }
}

/// Render a pretty JSON config stub for `--print-config`.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Load a config file. Relative `document`/`source_root` entries resolve
/// against the config file's directory.
pub fn load_config(path: &Path) -> Result<SyncConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: SyncConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    if let Some(base) = path.parent() {
        if config.document.is_relative() {
            config.document = base.join(&config.document);
        }
        if let Some(root) = config.source_root.as_mut() {
            if root.is_relative() {
                *root = base.join(&*root);
            }
        }
    }
    Ok(config)
}

/// Reject configs the transformer cannot run with.
pub fn validate_config(config: &SyncConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.document.as_os_str().is_empty() {
        return Err(anyhow!("document must be non-empty"));
    }
    if config.source_extension.is_empty() {
        return Err(anyhow!("source_extension must be non-empty"));
    }
    if config.comment_prefix.is_empty() {
        return Err(anyhow!("comment_prefix must be non-empty"));
    }
    if config.markup.block_begin.trim().is_empty() || config.markup.block_end.trim().is_empty()
    {
        return Err(anyhow!("markup block_begin and block_end must be non-empty"));
    }
    if config.markup.block_begin == config.markup.block_end {
        return Err(anyhow!("markup block_begin and block_end must differ"));
    }
    Ok(())
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub document: Option<PathBuf>,
    pub source_root: Option<PathBuf>,
}

/// Merge file config (if any) with CLI overrides, then validate.
pub fn resolve_config(config_path: Option<&Path>, overrides: Overrides) -> Result<SyncConfig> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => default_config(),
    };
    if let Some(document) = overrides.document {
        config.document = document;
    }
    if let Some(root) = overrides.source_root {
        config.source_root = Some(root);
    }
    validate_config(&config)?;
    Ok(config)
}
