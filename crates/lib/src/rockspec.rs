//! Build recipes (rockspecs).
//!
//! A rockspec is Lua source defining a few globals. Only what packing needs
//! is read:
//!
//! ```lua
//! package = "foo"
//! version = "2.0-1"
//! source = {
//!   url = "file:///home/me/foo",  -- or a path relative to the rockspec
//!   dir = "foo-2.0",              -- optional
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use mlua::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::names::has_revision;

#[derive(Debug, Error)]
pub enum RockspecError {
  #[error("cannot load remote rockspec {0}: only local files are supported")]
  Remote(String),

  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("{path}: {message}")]
  Lua { path: PathBuf, message: String },

  #[error("{path}: {message}")]
  Field { path: PathBuf, message: String },
}

/// Where a rockspec's sources come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RockSource {
  pub url: String,
  /// Directory name the sources unpack to.
  pub dir: Option<String>,
  /// Explicit file name for the fetched source.
  pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rockspec {
  /// Package name, lower-cased.
  pub name: String,
  /// Version including the revision (`2.0-1`).
  pub version: String,
  /// Absolute path of the rockspec file on disk.
  pub local_filename: PathBuf,
  pub source: RockSource,
}

impl Rockspec {
  /// Directory holding the rockspec; relative source URLs resolve from here.
  pub fn dir(&self) -> &Path {
    self.local_filename.parent().unwrap_or(Path::new("."))
  }
}

/// Load a rockspec from a local path or `file://` URL.
pub fn load_rockspec(path_or_url: &str) -> Result<Rockspec, RockspecError> {
  let path = match path_or_url.split_once("://") {
    Some(("file", rest)) => PathBuf::from(rest),
    Some(_) => return Err(RockspecError::Remote(path_or_url.to_string())),
    None => PathBuf::from(path_or_url),
  };

  let local_filename = dunce::canonicalize(&path).map_err(|source| RockspecError::Read {
    path: path.clone(),
    source,
  })?;
  let content = fs::read_to_string(&local_filename).map_err(|source| RockspecError::Read {
    path: local_filename.clone(),
    source,
  })?;

  let rockspec = parse_rockspec(&content, local_filename)?;
  debug!(name = %rockspec.name, version = %rockspec.version, "loaded rockspec");
  Ok(rockspec)
}

/// Evaluate rockspec source. `local_filename` is recorded as-is.
pub fn parse_rockspec(content: &str, local_filename: PathBuf) -> Result<Rockspec, RockspecError> {
  let lua_err = |e: LuaError| RockspecError::Lua {
    path: local_filename.clone(),
    message: e.to_string(),
  };
  let field_err = |message: String| RockspecError::Field {
    path: local_filename.clone(),
    message,
  };

  let lua = Lua::new();
  let env = lua.create_table().map_err(lua_err)?;
  lua
    .load(content)
    .set_name(format!("@{}", local_filename.display()))
    .set_environment(env.clone())
    .exec()
    .map_err(lua_err)?;

  let name: Option<String> = env
    .get("package")
    .map_err(|_| field_err("'package' must be a string".to_string()))?;
  let name = name.ok_or_else(|| field_err("missing 'package'".to_string()))?;
  let version: Option<String> = env
    .get("version")
    .map_err(|_| field_err("'version' must be a string".to_string()))?;
  let version = version.ok_or_else(|| field_err("missing 'version'".to_string()))?;
  if !has_revision(&version) {
    return Err(field_err(format!("version {} is not in version-revision format", version)));
  }

  let source: Option<LuaTable> = env
    .get("source")
    .map_err(|_| field_err("'source' must be a table".to_string()))?;
  let source = source.ok_or_else(|| field_err("missing 'source'".to_string()))?;
  let url: Option<String> = source
    .get("url")
    .map_err(|_| field_err("'source.url' must be a string".to_string()))?;
  let url = url.ok_or_else(|| field_err("missing 'source.url'".to_string()))?;
  let dir: Option<String> = source
    .get("dir")
    .map_err(|_| field_err("'source.dir' must be a string".to_string()))?;
  let file: Option<String> = source
    .get("file")
    .map_err(|_| field_err("'source.file' must be a string".to_string()))?;

  Ok(Rockspec {
    name: name.to_lowercase(),
    version,
    local_filename,
    source: RockSource { url, dir, file },
  })
}
