//! Source catalog: base name to path, built from one walk of the source root.
use crate::extract::{extract_block, ExtractedBlock};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Anything the splice pass can ask for a section's block.
pub trait BlockSource {
    /// Return the block for `name`, or `None` when no source carries that name.
    fn block_for(&self, name: &str) -> Result<Option<ExtractedBlock>>;
}

/// Source files under one root, keyed by base name without the extension.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    root: PathBuf,
    comment_prefix: String,
    entries: BTreeMap<String, PathBuf>,
}

impl SourceCatalog {
    /// Walk `root` and catalog every file whose name ends with `extension`.
    ///
    /// Walk order is sorted by path; when two files share a base name the
    /// later one replaces the earlier.
    pub fn scan(root: &Path, extension: &str, comment_prefix: &str) -> Result<Self> {
        let files = collect_files_recursive(root)
            .with_context(|| format!("scan source root {}", root.display()))?;
        let mut entries = BTreeMap::new();
        for file in files {
            let Some(name) = file.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            let Some(base) = name.strip_suffix(extension) else {
                continue;
            };
            let rel = file
                .strip_prefix(root)
                .context("strip source root prefix")?
                .to_path_buf();
            tracing::debug!(name = base, path = %rel.display(), "catalogued source");
            if let Some(previous) = entries.insert(base.to_string(), rel.clone()) {
                tracing::warn!(
                    name = base,
                    replaced = %previous.display(),
                    kept = %rel.display(),
                    "duplicate source base name"
                );
            }
        }
        Ok(Self {
            root: root.to_path_buf(),
            comment_prefix: comment_prefix.to_string(),
            entries,
        })
    }

    /// Return the catalogued path (relative to the root) for `name`.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlockSource for SourceCatalog {
    fn block_for(&self, name: &str) -> Result<Option<ExtractedBlock>> {
        let Some(rel) = self.get(name) else {
            return Ok(None);
        };
        let block = extract_block(&self.root.join(rel), &self.comment_prefix)?;
        Ok(Some(block))
    }
}

fn collect_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        // Directory symlinks are not followed; file symlinks are kept.
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            files.extend(collect_files_recursive(&path)?);
        } else if file_type.is_file() || (file_type.is_symlink() && path.is_file()) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent directory");
        }
        fs::write(path, contents.as_bytes()).expect("write file");
    }

    #[test]
    fn catalogs_only_matching_extension_recursively() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        write_file(&root.join("top.m"), "function top()\n");
        write_file(&root.join("nested/deep/inner.m"), "function inner()\n");
        write_file(&root.join("nested/notes.txt"), "not a script\n");
        write_file(&root.join("nested/data.mat"), "binary-ish\n");

        let catalog = SourceCatalog::scan(root, ".m", "%").expect("scan");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("top"), Some(Path::new("top.m")));
        assert_eq!(
            catalog.get("inner"),
            Some(Path::new("nested/deep/inner.m"))
        );
        assert!(catalog.get("notes").is_none());
        assert!(catalog.get("data").is_none());
    }

    #[test]
    fn duplicate_base_names_keep_last_in_sorted_order() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path();
        write_file(&root.join("a/dup.m"), "function a_dup()\n");
        write_file(&root.join("b/dup.m"), "function b_dup()\n");

        let catalog = SourceCatalog::scan(root, ".m", "%").expect("scan");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("dup"), Some(Path::new("b/dup.m")));

        let block = catalog
            .block_for("dup")
            .expect("extract")
            .expect("dup is catalogued");
        assert_eq!(block.prototype, "function b_dup()\n");
    }

    #[cfg(unix)]
    #[test]
    fn directory_symlinks_are_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().join("src");
        write_file(&root.join("pkg/foo.m"), "function foo()\n");
        symlink("..", root.join("pkg/up")).expect("link cycle");
        write_file(&dir.path().join("outside/bar.m"), "function bar()\n");
        symlink(dir.path().join("outside"), root.join("ext")).expect("link outside");
        symlink(root.join("pkg/foo.m"), root.join("alias.m")).expect("link file");

        let catalog = SourceCatalog::scan(&root, ".m", "%").expect("scan");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("foo"), Some(Path::new("pkg/foo.m")));
        assert_eq!(catalog.get("alias"), Some(Path::new("alias.m")));
        assert!(catalog.get("bar").is_none());
    }

    #[test]
    fn unknown_name_is_not_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let catalog = SourceCatalog::scan(dir.path(), ".m", "%").expect("scan");
        assert!(catalog.is_empty());
        assert!(catalog.block_for("missing").expect("lookup").is_none());
    }

    #[test]
    fn missing_root_fails() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let err = SourceCatalog::scan(&dir.path().join("nope"), ".m", "%")
            .expect_err("missing root");
        assert!(err.to_string().contains("scan source root"));
    }

    #[test]
    fn file_removed_after_scan_fails_at_extraction() {
        let dir = tempfile::tempdir().expect("create temp dir");
        write_file(&dir.path().join("gone.m"), "function gone()\n");
        let catalog = SourceCatalog::scan(dir.path(), ".m", "%").expect("scan");
        fs::remove_file(dir.path().join("gone.m")).expect("remove source");
        assert!(catalog.block_for("gone").is_err());
    }
}
