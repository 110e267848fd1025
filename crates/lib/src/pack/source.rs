//! Source rocks: a rockspec bundled with its fetched sources.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{PackError, Packer};
use crate::consts::SRC_ARCH;
use crate::names::rock_filename;
use crate::rockspec::load_rockspec;
use crate::util::fs::{DirGuard, copy_file};

impl Packer {
  /// Pack the rockspec at `path_or_url` together with its sources into
  /// `<name>-<version>.src.rock`.
  ///
  /// Sources are fetched without building anything. Archiving happens from
  /// inside the fetch directory, and the working directory is restored
  /// however the call ends.
  pub fn pack_source_rock(&self, path_or_url: &str) -> Result<PathBuf, PackError> {
    let rockspec = load_rockspec(path_or_url)?;

    let scratch = self.temp_dir("src")?;
    let fetched = self.fetcher.fetch_sources(&rockspec, scratch.path())?;
    debug!(file = %fetched.file.display(), dir = %fetched.dir.display(), "fetched sources");

    let rockspec_name = rockspec
      .local_filename
      .file_name()
      .map(PathBuf::from)
      .ok_or_else(|| PackError::CopyFailed {
        path: rockspec.local_filename.clone(),
        source: std::io::Error::other("rockspec path has no file name"),
      })?;
    let rock_file = self
      .config
      .out_dir
      .join(rock_filename(&rockspec.name, &rockspec.version, SRC_ARCH));

    {
      let _cwd = DirGuard::push(&fetched.dir).map_err(|e| PackError::ChangeDir {
        path: e.path,
        source: e.source,
      })?;
      copy_file(&rockspec.local_filename, Path::new(&rockspec_name))?;
      self.write_rock(&rock_file, &[rockspec_name, fetched.file])?;
    }

    info!(rock = %rock_file.display(), "packed source rock");
    Ok(rock_file)
  }
}
