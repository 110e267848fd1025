//! Test utilities for rockpack-lib.
//!
//! Builds throwaway rocks trees with installed packages, so the packing
//! pipeline can run against real directories.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::PackConfig;
use crate::consts::ROCK_MANIFEST_FILE;
use crate::tree::Tree;

pub const TEST_LUA_VERSION: &str = "5.4";
pub const TEST_ARCH: &str = "linux-x86_64";

/// A rocks tree in a temporary directory.
pub struct FakeTree {
  pub temp: TempDir,
  pub tree: Tree,
}

impl FakeTree {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let tree = Tree::new(temp.path(), TEST_LUA_VERSION);
    Self { temp, tree }
  }

  /// Create an install prefix holding `manifest` as its rock_manifest, plus
  /// the rockspec a real installation keeps next to it.
  pub fn install(&self, name: &str, version: &str, manifest: &str) -> PathBuf {
    let prefix = self.tree.install_dir(name, version);
    fs::create_dir_all(&prefix).unwrap();
    fs::write(prefix.join(ROCK_MANIFEST_FILE), manifest).unwrap();
    fs::write(
      prefix.join(format!("{}-{}.rockspec", name, version)),
      format!("package = {:?}\nversion = {:?}\n", name, version),
    )
    .unwrap();
    prefix
  }

  /// Register a version in the rocks directory without any files in it.
  pub fn install_bare(&self, name: &str, version: &str) -> PathBuf {
    let prefix = self.tree.install_dir(name, version);
    fs::create_dir_all(&prefix).unwrap();
    prefix
  }

  pub fn deploy_lua(&self, rel: &str, content: &str) -> PathBuf {
    write_file(&self.tree.deploy_lua_dir().join(rel), content.as_bytes())
  }

  pub fn deploy_lib(&self, rel: &str, content: &[u8]) -> PathBuf {
    write_file(&self.tree.deploy_lib_dir().join(rel), content)
  }

  pub fn deploy_bin(&self, rel: &str, content: &[u8]) -> PathBuf {
    write_file(&self.tree.deploy_bin_dir().join(rel), content)
  }
}

pub fn write_file(path: &Path, content: &[u8]) -> PathBuf {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
  path.to_path_buf()
}

/// Configuration searching `trees`, writing rocks to `out_dir` and staging
/// under `scratch_dir`.
pub fn test_config(trees: Vec<Tree>, out_dir: &Path, scratch_dir: &Path) -> PackConfig {
  PackConfig {
    trees,
    lua_version: TEST_LUA_VERSION.to_string(),
    arch: TEST_ARCH.to_string(),
    out_dir: out_dir.to_path_buf(),
    scratch_dir: scratch_dir.to_path_buf(),
  }
}

/// Names of the entries of a zip archive, sorted.
pub fn zip_entries(rock: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(fs::File::open(rock).unwrap()).unwrap();
  let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
  names.sort();
  names
}

/// Contents of one zip entry.
pub fn zip_read(rock: &Path, entry: &str) -> String {
  use std::io::Read;

  let mut archive = zip::ZipArchive::new(fs::File::open(rock).unwrap()).unwrap();
  let mut file = archive.by_name(entry).unwrap();
  let mut content = String::new();
  file.read_to_string(&mut content).unwrap();
  content
}

/// Whether a directory has no entries left.
pub fn is_empty_dir(dir: &Path) -> bool {
  fs::read_dir(dir).unwrap().next().is_none()
}
