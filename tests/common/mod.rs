#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch working directory for one CLI test.
pub struct PackWorkspace {
    _dir: TempDir,
    pub root: PathBuf,
}

impl PackWorkspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().to_path_buf();
        Self { _dir: dir, root }
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn read_json(&self, relative: &str) -> serde_json::Value {
        let text = fs::read_to_string(self.path(relative)).expect("read json");
        serde_json::from_str(&text).expect("parse json")
    }
}

/// `pack-tool` in `workspace` with a clean environment.
pub fn pack_tool(workspace: &PackWorkspace) -> Command {
    let mut cmd = Command::cargo_bin("pack-tool").expect("binary");
    cmd.current_dir(&workspace.root)
        .env_remove("PACK_TOOL_CONFIG")
        .env_remove("PACK_TOOL_PACKS_DIR")
        .env_remove("PACK_TOOL_LOG")
        .env_remove("RUST_LOG");
    cmd
}

pub fn import(workspace: &PackWorkspace, json: &str, pack: &str) -> Command {
    let mut cmd = pack_tool(workspace);
    cmd.args(["--import", "--json", json, "--pack", pack]);
    cmd
}

pub fn export(workspace: &PackWorkspace, json: &str, pack: &str) -> Command {
    let mut cmd = pack_tool(workspace);
    cmd.args(["--export", "--json", json, "--pack", pack]);
    cmd
}

pub fn store_keys(path: &Path) -> Vec<String> {
    let mut store = pack_lib::PackStore::open_for_read(path).expect("open store");
    store
        .records()
        .expect("records")
        .into_iter()
        .map(|record| record.key)
        .collect()
}
