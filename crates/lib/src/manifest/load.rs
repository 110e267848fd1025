//! Loading `rock_manifest` files.
//!
//! The file is Lua source assigning a single global:
//!
//! ```lua
//! rock_manifest = {
//!   lua = {
//!     ["demo.lua"] = "0f5b4e...",
//!     demo = { ["util.lua"] = "9c1d2a..." },
//!   },
//!   ["demo-1.0-1.rockspec"] = "77ab30...",
//! }
//! ```
//!
//! It is evaluated in an empty environment, so it cannot reach any globals.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use thiserror::Error;
use tracing::debug;

use super::types::{ManifestEntry, ManifestTree, RockManifest};
use crate::tree::Tree;
use crate::util::fs::is_plain_name;

const MANIFEST_GLOBAL: &str = "rock_manifest";

#[derive(Debug, Error)]
pub enum ManifestError {
  /// The install prefix has no manifest: the tree was not written by a
  /// compatible package manager version.
  #[error("tree is not a rocks tree compatible with this version of rockpack: missing {path}")]
  Missing { path: PathBuf },

  #[error("failed to read rock manifest {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid rock manifest {path}: {message}")]
  Invalid { path: PathBuf, message: String },
}

/// Load the manifest of an installed package version.
pub fn load_rock_manifest(name: &str, version: &str, tree: &Tree) -> Result<RockManifest, ManifestError> {
  let path = tree.rock_manifest_file(name, version);
  let source = match fs::read_to_string(&path) {
    Ok(source) => source,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ManifestError::Missing { path }),
    Err(source) => return Err(ManifestError::Read { path, source }),
  };

  let manifest = parse_rock_manifest(&source, &path)?;
  debug!(path = %path.display(), "loaded rock manifest");
  Ok(manifest)
}

/// Parse manifest source. `path` is only used for chunk names and errors.
pub fn parse_rock_manifest(source: &str, path: &Path) -> Result<RockManifest, ManifestError> {
  let invalid = |message: String| ManifestError::Invalid {
    path: path.to_path_buf(),
    message,
  };

  let lua = Lua::new();
  let env = lua.create_table().map_err(|e| invalid(e.to_string()))?;
  lua
    .load(source)
    .set_name(format!("@{}", path.display()))
    .set_environment(env.clone())
    .exec()
    .map_err(|e| invalid(e.to_string()))?;

  let value: LuaValue = env.get(MANIFEST_GLOBAL).map_err(|e| invalid(e.to_string()))?;
  let table = match value {
    LuaValue::Table(table) => table,
    LuaValue::Nil => return Err(invalid(format!("`{}` is not defined", MANIFEST_GLOBAL))),
    other => {
      return Err(invalid(format!(
        "`{}` must be a table, got {}",
        MANIFEST_GLOBAL,
        other.type_name()
      )));
    }
  };

  let root = table_to_tree(&table, "").map_err(invalid)?;
  Ok(RockManifest::new(root))
}

fn table_to_tree(table: &LuaTable, at: &str) -> Result<ManifestTree, String> {
  let mut tree = ManifestTree::new();

  for pair in table.pairs::<LuaValue, LuaValue>() {
    let (key, value) = pair.map_err(|e| e.to_string())?;
    let name = match key {
      LuaValue::String(s) => s.to_str().map_err(|e| e.to_string())?.to_string(),
      other => return Err(format!("entry key in `{}` must be a string, got {}", at, other.type_name())),
    };
    if !is_plain_name(&name) {
      return Err(format!("entry `{}` in `{}` is not a plain file name", name, at));
    }

    let path = if at.is_empty() { name.clone() } else { format!("{}/{}", at, name) };
    let entry = match value {
      LuaValue::String(checksum) => ManifestEntry::File(checksum.to_str().map_err(|e| e.to_string())?.to_string()),
      LuaValue::Table(sub) => ManifestEntry::Dir(table_to_tree(&sub, &path)?),
      other => return Err(format!("entry `{}` must be a string or table, got {}", path, other.type_name())),
    };
    tree.insert(name, entry);
  }

  Ok(tree)
}
