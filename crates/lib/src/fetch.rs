//! Source fetching for rockspecs.
//!
//! Fetching runs in "sources only" mode: the fetched file or directory is
//! placed in a scratch directory and never unpacked or built.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::rockspec::Rockspec;
use crate::util::fs::{FsError, copy_contents, copy_file, is_plain_name};

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("unsupported source protocol '{protocol}' in {url}")]
  UnsupportedProtocol { protocol: String, url: String },

  #[error("source {0} does not exist")]
  NotFound(PathBuf),

  #[error("source.{field} '{value}' must be a plain file name")]
  InvalidName { field: &'static str, value: String },

  #[error("failed to fetch {url}: {source}")]
  Copy {
    url: String,
    #[source]
    source: FsError,
  },
}

/// Fetched sources: `file` names an entry inside `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedSource {
  pub file: PathBuf,
  pub dir: PathBuf,
}

/// Retrieves the sources a rockspec points at.
pub trait Fetcher {
  /// Place the sources of `rockspec` inside `dest`, which already exists.
  fn fetch_sources(&self, rockspec: &Rockspec, dest: &Path) -> Result<FetchedSource, FetchError>;
}

/// Fetches sources from the local filesystem: plain paths (relative to the
/// rockspec) and `file://` URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFetcher;

impl LocalFetcher {
  /// Name of the fetched entry inside the destination: the rockspec's
  /// override if any, else the source's own base name.
  fn target_name(field: &'static str, wanted: Option<&String>, base_name: PathBuf) -> Result<PathBuf, FetchError> {
    match wanted {
      Some(name) if is_plain_name(name) => Ok(PathBuf::from(name)),
      Some(name) => Err(FetchError::InvalidName {
        field,
        value: name.clone(),
      }),
      None => Ok(base_name),
    }
  }

  fn resolve(rockspec: &Rockspec) -> Result<PathBuf, FetchError> {
    let url = &rockspec.source.url;
    let path = match url.split_once("://") {
      Some(("file", rest)) => PathBuf::from(rest),
      Some((protocol, _)) => {
        return Err(FetchError::UnsupportedProtocol {
          protocol: protocol.to_string(),
          url: url.clone(),
        });
      }
      None => PathBuf::from(url),
    };

    let path = if path.is_relative() { rockspec.dir().join(path) } else { path };
    if !path.exists() {
      return Err(FetchError::NotFound(path));
    }
    Ok(path)
  }
}

impl Fetcher for LocalFetcher {
  fn fetch_sources(&self, rockspec: &Rockspec, dest: &Path) -> Result<FetchedSource, FetchError> {
    let src = Self::resolve(rockspec)?;
    let copy_err = |source: FsError| FetchError::Copy {
      url: rockspec.source.url.clone(),
      source,
    };

    let base_name = src
      .file_name()
      .map(PathBuf::from)
      .ok_or_else(|| FetchError::NotFound(src.clone()))?;

    let file = if src.is_dir() {
      let name = Self::target_name("dir", rockspec.source.dir.as_ref(), base_name)?;
      copy_contents(&src, &dest.join(&name)).map_err(copy_err)?;
      name
    } else {
      let name = Self::target_name("file", rockspec.source.file.as_ref(), base_name)?;
      copy_file(&src, &dest.join(&name)).map_err(copy_err)?;
      name
    };

    info!(source = %src.display(), "fetched sources");
    Ok(FetchedSource {
      file,
      dir: dest.to_path_buf(),
    })
  }
}
