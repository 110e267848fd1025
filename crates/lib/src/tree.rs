//! Rocks tree layout.
//!
//! A rocks tree is a root directory holding installed packages. Each package
//! version gets an install prefix under the rocks directory, while its Lua
//! modules, native libraries and scripts are deployed into directories shared
//! by every installed package:
//!
//! ```text
//! <root>/
//! ├── bin/                              # deploy_bin_dir
//! ├── lib/lua/<lua>/                    # deploy_lib_dir
//! ├── lib/luarocks/rocks-<lua>/         # rocks_dir
//! │   └── <name>/<version>/             # install_dir (the prefix)
//! │       ├── rock_manifest
//! │       └── <name>-<version>.rockspec
//! └── share/lua/<lua>/                  # deploy_lua_dir
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::ROCK_MANIFEST_FILE;

/// A rocks tree rooted at a directory, for one Lua version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
  root: PathBuf,
  lua_version: String,
}

impl Tree {
  pub fn new(root: impl Into<PathBuf>, lua_version: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      lua_version: lua_version.into(),
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory holding one subdirectory per installed package.
  pub fn rocks_dir(&self) -> PathBuf {
    self
      .root
      .join("lib")
      .join("luarocks")
      .join(format!("rocks-{}", self.lua_version))
  }

  /// Install prefix of a package version.
  pub fn install_dir(&self, name: &str, version: &str) -> PathBuf {
    self.rocks_dir().join(name).join(version)
  }

  /// Path of the persisted file manifest of a package version.
  pub fn rock_manifest_file(&self, name: &str, version: &str) -> PathBuf {
    self.install_dir(name, version).join(ROCK_MANIFEST_FILE)
  }

  /// Shared directory for pure-Lua modules.
  pub fn deploy_lua_dir(&self) -> PathBuf {
    self.root.join("share").join("lua").join(&self.lua_version)
  }

  /// Shared directory for native modules.
  pub fn deploy_lib_dir(&self) -> PathBuf {
    self.root.join("lib").join("lua").join(&self.lua_version)
  }

  /// Shared directory for installed commands.
  pub fn deploy_bin_dir(&self) -> PathBuf {
    self.root.join("bin")
  }
}
