//! Packing configuration.
//!
//! Settings are read from the environment, each with a platform default:
//!
//! | Variable | Default |
//! |---|---|
//! | `ROCKPACK_USER_TREE` | `~/.luarocks` |
//! | `ROCKPACK_SYSTEM_TREE` | `/usr/local` |
//! | `ROCKPACK_LUA_VERSION` | `5.4` |
//! | `ROCKPACK_ARCH` | detected, e.g. `linux-x86_64` |
//! | `ROCKPACK_OUT_DIR` | current directory |
//! | `ROCKPACK_TMPDIR` | system temp directory |

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::DEFAULT_LUA_VERSION;
use crate::platform;
use crate::platform::paths::{default_system_tree, default_user_tree};
use crate::tree::Tree;

pub const USER_TREE_ENV: &str = "ROCKPACK_USER_TREE";
pub const SYSTEM_TREE_ENV: &str = "ROCKPACK_SYSTEM_TREE";
pub const LUA_VERSION_ENV: &str = "ROCKPACK_LUA_VERSION";
pub const ARCH_ENV: &str = "ROCKPACK_ARCH";
pub const OUT_DIR_ENV: &str = "ROCKPACK_OUT_DIR";
pub const TMPDIR_ENV: &str = "ROCKPACK_TMPDIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("unsupported platform {os}-{arch}; set ROCKPACK_ARCH to choose an arch tag")]
  UnsupportedPlatform { os: &'static str, arch: &'static str },

  #[error("cannot resolve output directory {path}: {source}")]
  OutDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Everything a packing operation needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
  /// Rocks trees searched for installed packages, in priority order.
  pub trees: Vec<Tree>,
  pub lua_version: String,
  /// Arch tag used for rocks that ship native code.
  pub arch: String,
  /// Absolute directory rocks are written to.
  pub out_dir: PathBuf,
  /// Directory under which staging and scratch directories are created.
  pub scratch_dir: PathBuf,
}

impl PackConfig {
  /// Load the configuration from the environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    let lua_version = env_string(LUA_VERSION_ENV).unwrap_or_else(|| DEFAULT_LUA_VERSION.to_string());

    let mut roots = Vec::new();
    if let Some(user) = env_path(USER_TREE_ENV).or_else(default_user_tree) {
      roots.push(user);
    }
    roots.push(env_path(SYSTEM_TREE_ENV).unwrap_or_else(default_system_tree));
    let trees = roots.into_iter().map(|root| Tree::new(root, lua_version.clone())).collect();

    let arch = match env_string(ARCH_ENV) {
      Some(arch) => arch,
      None => platform::arch_tag().ok_or(ConfigError::UnsupportedPlatform {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
      })?,
    };

    let out_dir = absolute(&env_path(OUT_DIR_ENV).unwrap_or_else(|| PathBuf::from(".")))?;
    let scratch_dir = env_path(TMPDIR_ENV).unwrap_or_else(std::env::temp_dir);

    Ok(Self {
      trees,
      lua_version,
      arch,
      out_dir,
      scratch_dir,
    })
  }

  /// Build a rocks tree for `root` using the configured Lua version.
  pub fn tree(&self, root: impl Into<PathBuf>) -> Tree {
    Tree::new(root, self.lua_version.clone())
  }

  /// Restrict the search to a single tree.
  pub fn with_tree(mut self, root: impl Into<PathBuf>) -> Self {
    self.trees = vec![self.tree(root)];
    self
  }

  /// Write rocks to `dir` instead of the configured output directory.
  pub fn with_out_dir(mut self, dir: &Path) -> Result<Self, ConfigError> {
    self.out_dir = absolute(dir)?;
    Ok(self)
  }
}

fn env_string(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_path(key: &str) -> Option<PathBuf> {
  env_string(key).map(PathBuf::from)
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
  std::path::absolute(path).map_err(|source| ConfigError::OutDir {
    path: path.to_path_buf(),
    source,
  })
}
