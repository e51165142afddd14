//! Temporary workspaces holding network, catalogue and request files.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Triangle 1-2-3 with two-way sides of 100, 100 and 150 metres, plus an
/// isolated node 4.
pub(super) const TRIANGLE_NETWORK: &str = r#"{
  "nodes": [
    {"id": 1, "lat": 50.0, "lon": 4.0},
    {"id": 2, "lat": 50.0009, "lon": 4.0},
    {"id": 3, "lat": 50.0009, "lon": 4.0014},
    {"id": 4, "lat": 51.0, "lon": 5.0}
  ],
  "edges": [
    {"from": 1, "to": 2, "length": 100.0, "two_way": true,
     "geometry": [[4.0, 50.0], [4.0, 50.0005], [4.0, 50.0009]]},
    {"from": 2, "to": 3, "length": 100.0, "two_way": true},
    {"from": 1, "to": 3, "length": 150.0, "two_way": true}
  ]
}"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// A temporary directory addressed with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn triangle(&self) -> Utf8PathBuf {
        self.write("triangle.json", TRIANGLE_NETWORK)
    }
}
