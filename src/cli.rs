//! CLI argument parsing.
//!
//! With no arguments the tool syncs `AutoLayout_sdd.tex` in the current
//! directory against `../../../../Tools/AutoLayout/src`.
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "protosync",
    version,
    about = "Copy source prototypes and leading comments into a LaTeX design document",
    after_help = "Examples:\n  protosync\n  protosync --document doc/tex/SDD/AutoLayout_sdd.tex --source-root Tools/AutoLayout/src\n  protosync --config protosync.json --check"
)]
pub struct RootArgs {
    /// Document to rewrite in place
    #[arg(long, value_name = "PATH")]
    pub document: Option<PathBuf>,

    /// Directory walked for source files (default: four levels above the
    /// document, then Tools/AutoLayout/src)
    #[arg(long, value_name = "DIR")]
    pub source_root: Option<PathBuf>,

    /// JSON config file; flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fail if the document is out of date instead of rewriting it
    #[arg(long)]
    pub check: bool,

    /// Print the default config as JSON and exit
    #[arg(long, conflicts_with_all = ["document", "source_root", "config", "check"])]
    pub print_config: bool,

    /// Log a run summary to stderr
    #[arg(long, short)]
    pub verbose: bool,
}
