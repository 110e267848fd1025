//! Naming rules for rocks and deployed files.

use std::path::{Path, PathBuf};

use crate::consts::ROCK_EXT;

/// Returns the `<name>-<version>` pair used in rock and prefix names.
pub fn name_version(name: &str, version: &str) -> String {
  format!("{}-{}", name, version)
}

/// Returns the rock filename `<name>-<version>.<arch>.rock`.
pub fn rock_filename(name: &str, version: &str, arch: &str) -> String {
  format!("{}.{}.{}", name_version(name, version), arch, ROCK_EXT)
}

/// Checks that a version carries a revision suffix (`1.0-1`, `scm-2`).
pub fn has_revision(version: &str) -> bool {
  match version.split_once('-') {
    Some((base, revision)) => {
      !base.is_empty() && !revision.is_empty() && revision.bytes().all(|b| b.is_ascii_digit())
    }
    None => false,
  }
}

/// Splits a `name@version` token.
///
/// Returns `None` when the token has no `@` or either side is empty.
pub fn split_name_version(token: &str) -> Option<(&str, &str)> {
  let (name, version) = token.split_once('@')?;
  if name.is_empty() || version.is_empty() {
    return None;
  }
  Some((name, version))
}

/// Returns the versioned variant of a deployed file.
///
/// When two versions of a package deploy the same path, the one that is not
/// active keeps its copy under a name prefixed with `<name>_<version>-`, in
/// the same directory (`prefix`). Dashes and dots of the pair are replaced by
/// underscores, so `demo 1.0-1` turns `init.lua` into `demo_1_0_1-init.lua`.
pub fn versioned_name(file: &Path, prefix: &Path, name: &str, version: &str) -> PathBuf {
  let rest = match file.strip_prefix(prefix) {
    Ok(rest) => rest,
    Err(_) => Path::new(file.file_name().unwrap_or(file.as_os_str())),
  };
  let rest = rest
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/");
  let token = format!("{}_{}", name, version).replace(['-', '.'], "_");
  prefix.join(format!("{}-{}", token, rest))
}
