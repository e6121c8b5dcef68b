use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Replace `dest` with `text` through a temp file in the same directory, so
/// readers see either the old contents or the new ones. A symlinked `dest`
/// is resolved first so the link survives and its target is rewritten.
pub fn replace_file(dest: &Path, text: &str) -> Result<()> {
    let dest = &resolve_link(dest)?;
    let parent = parent_dir(dest);
    let mut tmp = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("create temp file in {}", parent.display()))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write {}", tmp.path().display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", tmp.path().display()))?;
    if let Ok(metadata) = fs::metadata(dest) {
        fs::set_permissions(tmp.path(), metadata.permissions())
            .with_context(|| format!("copy permissions of {}", dest.display()))?;
    }
    tmp.persist(dest)
        .map_err(|err| err.error)
        .with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

/// Write only when the contents differ. Returns whether a write happened.
pub fn write_if_changed(dest: &Path, original: &str, text: &str) -> Result<bool> {
    if original == text {
        return Ok(false);
    }
    replace_file(dest, text)?;
    Ok(true)
}

fn resolve_link(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => fs::canonicalize(path)
            .with_context(|| format!("resolve link {}", path.display())),
        _ => Ok(path.to_path_buf()),
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
