//! Common test fixtures for javadox integration tests

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary source/output tree for batch build tests
pub struct TestTree {
    root: TempDir,
}

impl TestTree {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Create a file (and its parent directories) under the tree root
    pub fn add_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.root.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, content).expect("write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.root.path().join(relative)).expect("read file")
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root.path().join(relative).exists()
    }
}
