//! Prototype and leading-comment extraction from a single source file.
use anyhow::{anyhow, Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// First line of a source file plus the comment lines directly after it.
///
/// Every line keeps its terminator; a missing final `\n` is supplied so the
/// block can be spliced line-for-line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    pub prototype: String,
    pub comments: Vec<String>,
}

impl ExtractedBlock {
    /// Iterate the prototype followed by the comment lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.prototype.as_str()).chain(self.comments.iter().map(String::as_str))
    }
}

pub fn extract_block(path: &Path, comment_prefix: &str) -> Result<ExtractedBlock> {
    let file = File::open(path).with_context(|| format!("read source {}", path.display()))?;
    read_block(BufReader::new(file), comment_prefix)
        .with_context(|| format!("read source {}", path.display()))
}

fn read_block<R: BufRead>(mut reader: R, comment_prefix: &str) -> Result<ExtractedBlock> {
    let mut prototype = String::new();
    if reader.read_line(&mut prototype)? == 0 {
        return Err(anyhow!("source has no prototype line"));
    }
    terminate(&mut prototype);

    let mut comments = Vec::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 || !line.starts_with(comment_prefix) {
            break;
        }
        terminate(&mut line);
        comments.push(line);
    }
    Ok(ExtractedBlock {
        prototype,
        comments,
    })
}

fn terminate(line: &mut String) {
    if !line.ends_with('\n') {
        line.push('\n');
    }
}
