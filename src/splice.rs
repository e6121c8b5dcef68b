//! The document pass: drop old listing blocks, splice fresh ones under every
//! line whose `{name}` resolves to a source file.
//!
//! Lines are handled with their terminators attached so everything outside a
//! replaced block is copied byte-for-byte.
use crate::catalog::BlockSource;
use crate::config::Markup;
use crate::extract::ExtractedBlock;
use anyhow::Result;
use regex::Regex;

/// What one pass did to the document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SpliceSummary {
    /// Section names that received a block, in document order.
    pub matched: Vec<String>,
    /// Lines whose `{name}` did not resolve to a source.
    pub unmatched: usize,
    /// Begin markers dropped from the input.
    pub blocks_dropped: usize,
}

#[derive(Debug)]
pub struct SpliceOutcome {
    pub text: String,
    pub summary: SpliceSummary,
}

struct SpliceState<'a> {
    markup: &'a Markup,
    out: String,
    in_block: bool,
    summary: SpliceSummary,
}

impl<'a> SpliceState<'a> {
    fn new(markup: &'a Markup, capacity: usize) -> Self {
        Self {
            markup,
            out: String::with_capacity(capacity),
            in_block: false,
            summary: SpliceSummary::default(),
        }
    }

    /// Returns true when the line belongs to an old block and must not be
    /// copied.
    fn skip_block_line(&mut self, line: &str) -> bool {
        if line.starts_with(&self.markup.block_begin) {
            self.in_block = true;
            self.summary.blocks_dropped += 1;
            return true;
        }
        if line.starts_with(&self.markup.block_end) {
            self.in_block = false;
            return true;
        }
        self.in_block
    }

    fn push_block(&mut self, name: String, block: &ExtractedBlock) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.out.push_str(&self.markup.block_begin);
        self.out.push('\n');
        for line in block.lines() {
            self.out.push_str(line);
        }
        self.out.push_str(&self.markup.block_end);
        self.out.push('\n');
        self.summary.matched.push(name);
    }

    fn finish(self) -> SpliceOutcome {
        SpliceOutcome {
            text: self.out,
            summary: self.summary,
        }
    }
}

/// Rewrite `document`, pulling blocks from `source`.
///
/// Every copied line is a section candidate, not only `\subsection` lines.
/// A source that cannot be read aborts the pass.
pub fn splice_document<S: BlockSource>(
    document: &str,
    source: &S,
    markup: &Markup,
) -> Result<SpliceOutcome> {
    let pattern = markup.section_name_pattern();
    let mut state = SpliceState::new(markup, document.len());

    for line in document.split_inclusive('\n') {
        if state.skip_block_line(line) {
            continue;
        }
        state.out.push_str(line);

        let Some(name) = section_name(line, &pattern, markup.escape) else {
            continue;
        };
        match source.block_for(&name)? {
            Some(block) => {
                tracing::debug!(name = %name, "splicing prototype block");
                state.push_block(name, &block);
            }
            None => {
                tracing::debug!(name = %name, "no source for section");
                state.summary.unmatched += 1;
            }
        }
    }

    Ok(state.finish())
}

/// Text between the first `{` and the next `}`, with escape characters
/// removed. Empty names are ignored.
pub fn section_name(line: &str, pattern: &Regex, escape: char) -> Option<String> {
    let raw = pattern.captures(line)?.get(1)?.as_str();
    let name: String = raw.chars().filter(|ch| *ch != escape).collect();
    if name.is_empty() {
        return None;
    }
    Some(name)
}

#[cfg(test)]
#[path = "splice_tests.rs"]
mod tests;
