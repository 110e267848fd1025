//! Finding the installation to pack.

use std::path::PathBuf;

use tracing::{debug, warn};

use super::PackError;
use crate::names::has_revision;
use crate::search::{Query, SearchResult, search};
use crate::tree::Tree;

/// An installed package version, resolved to one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
  pub name: String,
  pub version: String,
  pub tree: Tree,
  /// The install prefix, `<rocks_dir>/<name>/<version>`.
  pub prefix: PathBuf,
}

/// Resolve `name` (and optionally `version`) to a single installation in
/// `trees`.
pub fn locate(trees: &[Tree], name: &str, version: Option<&str>) -> Result<Located, PackError> {
  let query = Query::new(name, version).exact();
  let result = search(&query, trees);
  resolve(&result, trees, name, version)
}

/// Pick one installation out of search results.
///
/// Without a version the package must have exactly one installed version.
/// A requested version must carry its revision (`1.0-1`, not `1.0`). When
/// the same version is installed in several trees, the first tree in `trees`
/// order wins.
pub fn resolve(result: &SearchResult, trees: &[Tree], name: &str, version: Option<&str>) -> Result<Located, PackError> {
  let not_found = || PackError::NotFound(name.to_string());

  let versions = result.versions(name).filter(|v| !v.is_empty()).ok_or_else(not_found)?;

  let resolved = match version {
    Some(version) => version.to_string(),
    None if versions.len() > 1 => {
      return Err(PackError::AmbiguousVersion {
        name: name.to_string(),
        versions: versions.keys().cloned().collect(),
      });
    }
    None => versions.keys().next().cloned().ok_or_else(not_found)?,
  };
  if !has_revision(&resolved) {
    return Err(PackError::MalformedVersion(resolved));
  }
  let records = versions.get(&resolved).ok_or_else(not_found)?;

  let record = records.first().ok_or_else(not_found)?;
  if records.len() > 1 {
    let ignored: Vec<String> = records[1..].iter().map(|r| r.repo.display().to_string()).collect();
    warn!(
      package = %name,
      version = %resolved,
      using = %record.repo.display(),
      ignored = ?ignored,
      "package installed in several trees, using the first"
    );
  }

  let tree = trees
    .iter()
    .find(|t| t.root() == record.repo)
    .cloned()
    .ok_or_else(not_found)?;
  let prefix = tree.install_dir(name, &resolved);
  if !prefix.is_dir() {
    debug!(prefix = %prefix.display(), "indexed install prefix is missing");
    return Err(not_found());
  }

  Ok(Located {
    name: name.to_string(),
    version: resolved,
    tree,
    prefix,
  })
}
