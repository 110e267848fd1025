//! Rock archive writing.
//!
//! Rocks are zip files whose entries are paths relative to the directory
//! they were packed from.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("{path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("file name {} is not valid UTF-8", .0.display())]
  NonUtf8Name(PathBuf),
}

/// Writes rock archives.
pub trait Archiver {
  /// Create `target` from `inputs`, which are files or directories relative
  /// to the current working directory. Directories are added recursively.
  fn archive(&self, target: &Path, inputs: &[PathBuf]) -> Result<(), ArchiveError>;
}

/// Deflate-compressed zip archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
  fn archive(&self, target: &Path, inputs: &[PathBuf]) -> Result<(), ArchiveError> {
    let result = write_zip(target, inputs);
    if result.is_err() {
      // A half-written rock must not be left behind.
      let _ = fs::remove_file(target);
    }
    result
  }
}

fn write_zip(target: &Path, inputs: &[PathBuf]) -> Result<(), ArchiveError> {
  let file = File::create(target).map_err(|source| ArchiveError::Io {
    path: target.to_path_buf(),
    source,
  })?;
  let mut zip = ZipWriter::new(BufWriter::new(file));
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  let mut count = 0usize;
  for input in inputs {
    for entry in WalkDir::new(input).sort_by_file_name() {
      let entry = entry.map_err(|e| {
        let path = e.path().unwrap_or(input).to_path_buf();
        ArchiveError::Io {
          path,
          source: io::Error::other(e),
        }
      })?;
      let path = entry.path();
      let Some(name) = entry_name(path)? else {
        continue;
      };

      if entry.file_type().is_dir() {
        zip.add_directory(name, options)?;
      } else {
        let io_err = |source| ArchiveError::Io {
          path: path.to_path_buf(),
          source,
        };
        let mut src = File::open(path).map_err(io_err)?;
        zip.start_file(name, options.unix_permissions(file_mode(&src)))?;
        io::copy(&mut src, &mut zip).map_err(io_err)?;
        count += 1;
      }
    }
  }

  zip.finish()?;
  debug!(target = %target.display(), files = count, "wrote archive");
  Ok(())
}

/// Zip entry name for a relative path: `/`-separated, without `./`.
/// Names that are not valid UTF-8 are an error.
fn entry_name(path: &Path) -> Result<Option<String>, ArchiveError> {
  let mut parts = Vec::new();
  for component in path.components() {
    if let Component::Normal(part) = component {
      let part = part.to_str().ok_or_else(|| ArchiveError::NonUtf8Name(path.to_path_buf()))?;
      parts.push(part);
    }
  }
  Ok(if parts.is_empty() { None } else { Some(parts.join("/")) })
}

#[cfg(unix)]
fn file_mode(file: &File) -> u32 {
  use std::os::unix::fs::PermissionsExt;

  file.metadata().map(|m| m.permissions().mode() & 0o777).unwrap_or(0o644)
}

#[cfg(not(unix))]
fn file_mode(_file: &File) -> u32 {
  0o644
}
