//! Rock packing.
//!
//! Two kinds of rock can be produced:
//! - **source rocks** (`<name>-<version>.src.rock`) bundle a rockspec with its
//!   fetched sources, see [`Packer::pack_source_rock`];
//! - **binary rocks** (`<name>-<version>.<arch>.rock`, or `.all.rock` for
//!   pure-Lua packages) rebuild an installed package from a rocks tree, see
//!   [`Packer::pack_installed_rock`].
//!
//! Every operation works in its own temporary directory, removed on every
//! exit path. The installed tree is only read.

mod build;
mod locate;
mod reconstruct;
mod source;
mod stage;

use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;
use tracing::info;

use crate::archive::{ArchiveError, Archiver, ZipArchiver};
use crate::config::PackConfig;
use crate::consts::{APP_NAME, ROCKSPEC_EXT};
use crate::fetch::{FetchError, Fetcher, LocalFetcher};
use crate::manifest::{ManifestError, load_rock_manifest};
use crate::names::split_name_version;
use crate::rockspec::RockspecError;
use crate::tree::Tree;
use crate::util::fs::FsError;

pub use locate::{Located, locate, resolve};
pub use reconstruct::reconstruct;
pub use stage::has_binaries;

#[derive(Debug, Error)]
pub enum PackError {
  #[error("'{0}' does not seem to be an installed rock")]
  NotFound(String),

  #[error("please specify which version of '{name}' to pack (installed: {})", .versions.join(", "))]
  AmbiguousVersion { name: String, versions: Vec<String> },

  #[error("expected version {0} in version-revision format")]
  MalformedVersion(String),

  #[error("{0}")]
  IncompatibleTree(#[from] ManifestError),

  #[error("error loading rockspec: {0}")]
  InvalidRockspec(#[from] RockspecError),

  #[error("{0}")]
  FetchFailed(#[from] FetchError),

  #[error("failed copying back file {path}: {source}")]
  CopyFailed {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed packing {target}: {source}")]
  ArchiveFailed {
    target: PathBuf,
    #[source]
    source: ArchiveError,
  },

  #[error("failed to create temporary directory in {dir}: {source}")]
  TempDirFailed {
    dir: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("cannot enter {path}: {source}")]
  ChangeDir {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

impl From<FsError> for PackError {
  fn from(err: FsError) -> Self {
    PackError::CopyFailed {
      path: err.path,
      source: err.source,
    }
  }
}

/// What a pack request refers to, decided once from the command argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackTarget {
  /// A rockspec path or `file://` URL: pack a source rock.
  Rockspec(String),
  /// An installed package: rebuild a binary or pure-Lua rock.
  Installed { name: String, version: Option<String> },
}

impl PackTarget {
  /// Classify a command argument.
  ///
  /// Anything ending in `.rockspec` is a recipe. Otherwise the argument is a
  /// package name, optionally written as `name@version`, which takes
  /// precedence over `version`.
  pub fn parse(arg: &str, version: Option<&str>) -> Self {
    if arg.ends_with(&format!(".{}", ROCKSPEC_EXT)) {
      return PackTarget::Rockspec(arg.to_string());
    }
    match split_name_version(arg) {
      Some((name, version)) => PackTarget::Installed {
        name: name.to_string(),
        version: Some(version.to_string()),
      },
      None => PackTarget::Installed {
        name: arg.to_string(),
        version: version.map(str::to_string),
      },
    }
  }
}

/// Produces rocks according to a [`PackConfig`].
pub struct Packer {
  config: PackConfig,
  archiver: Box<dyn Archiver>,
  fetcher: Box<dyn Fetcher>,
}

impl Packer {
  /// A packer writing zip archives and fetching local sources.
  pub fn new(config: PackConfig) -> Self {
    Self {
      config,
      archiver: Box::new(ZipArchiver),
      fetcher: Box::new(LocalFetcher),
    }
  }

  pub fn with_archiver(mut self, archiver: impl Archiver + 'static) -> Self {
    self.archiver = Box::new(archiver);
    self
  }

  pub fn with_fetcher(mut self, fetcher: impl Fetcher + 'static) -> Self {
    self.fetcher = Box::new(fetcher);
    self
  }

  pub fn config(&self) -> &PackConfig {
    &self.config
  }

  /// Pack whatever `target` refers to and return the rock's absolute path.
  pub fn pack(&self, target: &PackTarget) -> Result<PathBuf, PackError> {
    match target {
      PackTarget::Rockspec(path) => self.pack_source_rock(path),
      PackTarget::Installed { name, version } => self.pack_installed_rock(name, version.as_deref()),
    }
  }

  /// Rebuild an installed package from the configured trees.
  pub fn pack_installed_rock(&self, name: &str, version: Option<&str>) -> Result<PathBuf, PackError> {
    self.pack_installed_in(&self.config.trees, name, version)
  }

  /// Rebuild an installed package, searching only `trees`.
  pub fn pack_installed_in(&self, trees: &[Tree], name: &str, version: Option<&str>) -> Result<PathBuf, PackError> {
    let located = locate(trees, name, version)?;
    let manifest = load_rock_manifest(&located.name, &located.version, &located.tree)?;
    let rock = self.stage_and_archive(&located, &manifest)?;
    info!(rock = %rock.display(), "packed rock");
    Ok(rock)
  }

  /// Create a fresh directory under the scratch dir. It is removed when the
  /// returned guard drops.
  fn temp_dir(&self, kind: &str) -> Result<TempDir, PackError> {
    let dir = &self.config.scratch_dir;
    let temp_err = |source| PackError::TempDirFailed {
      dir: dir.clone(),
      source,
    };
    std::fs::create_dir_all(dir).map_err(temp_err)?;
    tempfile::Builder::new()
      .prefix(&format!("{}-{}-", APP_NAME, kind))
      .tempdir_in(dir)
      .map_err(temp_err)
  }

  /// Write `inputs` (relative to the working directory) into `rock_file`,
  /// replacing any previous rock of that name. The output directory is
  /// created if needed.
  fn write_rock(&self, rock_file: &Path, inputs: &[PathBuf]) -> Result<(), PackError> {
    let archive_err = |source| PackError::ArchiveFailed {
      target: rock_file.to_path_buf(),
      source,
    };
    if let Some(parent) = rock_file.parent() {
      std::fs::create_dir_all(parent).map_err(|source| {
        archive_err(ArchiveError::Io {
          path: parent.to_path_buf(),
          source,
        })
      })?;
    }
    crate::util::fs::remove_file_if_exists(rock_file)?;
    self.archiver.archive(rock_file, inputs).map_err(archive_err)
  }
}
