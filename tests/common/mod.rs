//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const FOO_SOURCE: &str = "function foo(x)\n% does foo\n% twice\ny = 2*x;\n";

/// A throwaway repository laid out like the default document/source layout.
pub struct Workspace {
    pub dir: TempDir,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory the tool is run from when relying on the default layout.
    pub fn document_dir(&self) -> PathBuf {
        self.root().join("project/doc/tex/SDD")
    }

    pub fn document(&self) -> PathBuf {
        self.document_dir().join("AutoLayout_sdd.tex")
    }

    /// Source root reached from the document's default layout.
    pub fn source_root(&self) -> PathBuf {
        self.root().join("Tools/AutoLayout/src")
    }

    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent directory");
        }
        std::fs::write(&path, contents.as_bytes()).expect("write file");
        path
    }

    pub fn write_document(&self, contents: &str) {
        self.write("project/doc/tex/SDD/AutoLayout_sdd.tex", contents);
    }

    pub fn write_source(&self, rel: &str, contents: &str) {
        self.write(&format!("Tools/AutoLayout/src/{rel}"), contents);
    }

    pub fn read_document(&self) -> String {
        std::fs::read_to_string(self.document()).expect("read document")
    }
}

/// Run the binary from `cwd` with the given arguments.
pub fn run_protosync(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protosync"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run protosync")
}
