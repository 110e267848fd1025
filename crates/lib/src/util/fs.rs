//! Filesystem primitives for staging rocks.

use std::fs;
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// An I/O failure tied to the path it happened on.
#[derive(Debug, Error)]
#[error("{path}: {source}")]
pub struct FsError {
  pub path: PathBuf,
  #[source]
  pub source: io::Error,
}

impl FsError {
  pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Self {
      path: path.into(),
      source,
    }
  }
}

/// Copy a single file, creating the target's parent directory if needed.
///
/// Permissions are carried over, so native modules stay executable.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), FsError> {
  if let Some(parent) = dst.parent() {
    fs::create_dir_all(parent).map_err(|e| FsError::new(parent, e))?;
  }
  fs::copy(src, dst).map_err(|e| FsError::new(src, e))?;
  Ok(())
}

/// Copy everything below `src` into `dst`, which is created if missing.
pub fn copy_contents(src: &Path, dst: &Path) -> Result<(), FsError> {
  fs::create_dir_all(dst).map_err(|e| FsError::new(dst, e))?;

  for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(src).to_path_buf();
      FsError::new(path, io::Error::other(e))
    })?;
    let rel = entry
      .path()
      .strip_prefix(src)
      .map_err(|e| FsError::new(entry.path(), io::Error::other(e)))?;
    let target = dst.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).map_err(|e| FsError::new(&target, e))?;
    } else {
      fs::copy(entry.path(), &target).map_err(|e| FsError::new(entry.path(), e))?;
    }
  }

  Ok(())
}

/// List the entry names of a directory, sorted.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
  let mut names = Vec::new();
  for entry in fs::read_dir(dir).map_err(|e| FsError::new(dir, e))? {
    let entry = entry.map_err(|e| FsError::new(dir, e))?;
    names.push(PathBuf::from(entry.file_name()));
  }
  names.sort();
  Ok(names)
}

/// Remove a file, treating an already-missing file as success.
pub fn remove_file_if_exists(path: &Path) -> Result<(), FsError> {
  match fs::remove_file(path) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
    Err(e) => Err(FsError::new(path, e)),
  }
}

/// Whether a deployed command is a real executable rather than a script
/// wrapper.
///
/// Lua sources and anything starting with a `#!` line are scripts. Files
/// shorter than two bytes are binaries. A missing or unreadable file is not
/// a binary, so a command whose deployed copy is gone does not turn a
/// pure-Lua rock into a platform rock.
pub fn is_actual_binary(path: &Path) -> bool {
  if path.extension().is_some_and(|ext| ext == "lua") {
    return false;
  }
  let Ok(mut file) = fs::File::open(path) else {
    return false;
  };
  let mut head = [0u8; 2];
  match file.read_exact(&mut head) {
    Ok(()) => &head != b"#!",
    Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => true,
    Err(_) => false,
  }
}

/// A single normal path component: no separators, no `.`/`..`, not empty,
/// not absolute.
pub fn is_plain_name(name: &str) -> bool {
  if name.contains(['/', '\\']) {
    return false;
  }
  let mut components = Path::new(name).components();
  matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}

/// Scoped change of the process working directory.
///
/// The previous directory is restored when the guard is dropped, whichever
/// way the enclosing scope is left.
#[must_use = "the working directory is restored as soon as the guard is dropped"]
pub struct DirGuard {
  previous: PathBuf,
}

impl DirGuard {
  pub fn push(dir: &Path) -> Result<Self, FsError> {
    let previous = std::env::current_dir().map_err(|e| FsError::new(".", e))?;
    std::env::set_current_dir(dir).map_err(|e| FsError::new(dir, e))?;
    debug!(dir = %dir.display(), "entered directory");
    Ok(Self { previous })
  }
}

impl Drop for DirGuard {
  fn drop(&mut self) {
    if let Err(e) = std::env::set_current_dir(&self.previous) {
      warn!(dir = %self.previous.display(), error = %e, "failed to restore working directory");
    }
  }
}
