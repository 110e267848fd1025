//! Shared test helpers for CLI integration tests.

use std::io::Read;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const LUA_VERSION: &str = "5.4";
pub const ARCH: &str = "linux-x86_64";

/// Isolated test environment.
///
/// Each test gets its own temporary directory with isolated user and system
/// trees, output and scratch paths.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  fn dir(&self, name: &str) -> PathBuf {
    let p = self.temp.path().join(name);
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// User rocks tree, searched first.
  pub fn user_tree(&self) -> PathBuf {
    self.dir("user")
  }

  /// System rocks tree, searched second.
  pub fn system_tree(&self) -> PathBuf {
    self.dir("system")
  }

  /// Where rocks are written.
  pub fn out_path(&self) -> PathBuf {
    self.dir("out")
  }

  /// Where staging directories are created.
  pub fn scratch_path(&self) -> PathBuf {
    self.dir("tmp")
  }

  /// Write a file relative to the temp directory.
  pub fn write_file(&self, relative_path: &str, content: &str) -> PathBuf {
    write(&self.temp.path().join(relative_path), content)
  }

  /// Install `name` `version` into `tree` with the given rock_manifest source.
  pub fn install(&self, tree: &Path, name: &str, version: &str, manifest: &str) -> PathBuf {
    let prefix = tree
      .join("lib/luarocks")
      .join(format!("rocks-{}", LUA_VERSION))
      .join(name)
      .join(version);
    write(&prefix.join("rock_manifest"), manifest);
    write(
      &prefix.join(format!("{}-{}.rockspec", name, version)),
      &format!("package = {:?}\nversion = {:?}\n", name, version),
    );
    prefix
  }

  /// Deploy a Lua module into `tree`.
  pub fn deploy_lua(&self, tree: &Path, relative_path: &str, content: &str) -> PathBuf {
    write(&tree.join("share/lua").join(LUA_VERSION).join(relative_path), content)
  }

  /// Get a pre-configured Command for the rockpack binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `ROCKPACK_USER_TREE` / `ROCKPACK_SYSTEM_TREE`: isolated rocks trees
  /// - `ROCKPACK_OUT_DIR`: isolated output directory
  /// - `ROCKPACK_TMPDIR`: isolated scratch directory
  /// - `ROCKPACK_ARCH` / `ROCKPACK_LUA_VERSION`: fixed, so rock names are stable
  pub fn rockpack_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("rockpack");
    cmd.env("ROCKPACK_USER_TREE", self.user_tree());
    cmd.env("ROCKPACK_SYSTEM_TREE", self.system_tree());
    cmd.env("ROCKPACK_OUT_DIR", self.out_path());
    cmd.env("ROCKPACK_TMPDIR", self.scratch_path());
    cmd.env("ROCKPACK_ARCH", ARCH);
    cmd.env("ROCKPACK_LUA_VERSION", LUA_VERSION);
    cmd.env_remove("RUST_LOG");
    cmd
  }

  /// Whether the scratch directory holds nothing.
  pub fn scratch_is_empty(&self) -> bool {
    std::fs::read_dir(self.scratch_path()).unwrap().next().is_none()
  }
}

fn write(path: &Path, content: &str) -> PathBuf {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).unwrap();
  }
  std::fs::write(path, content).unwrap();
  path.to_path_buf()
}

/// Sorted entry names of a rock.
pub fn rock_entries(rock: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(std::fs::File::open(rock).unwrap()).unwrap();
  let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
  names.sort();
  names
}

/// Contents of one entry of a rock.
pub fn rock_read(rock: &Path, entry: &str) -> String {
  let mut archive = zip::ZipArchive::new(std::fs::File::open(rock).unwrap()).unwrap();
  let mut file = archive.by_name(entry).unwrap();
  let mut content = String::new();
  file.read_to_string(&mut content).unwrap();
  content
}
