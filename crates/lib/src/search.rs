//! Installed-package index.
//!
//! Packages are found by scanning the rocks directory of each tree: every
//! `<rocks_dir>/<name>/<version>/` directory is one installation.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, warn};

use crate::tree::Tree;

/// What to look for in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
  pub name: String,
  pub version: Option<String>,
  /// Match the name exactly instead of by substring.
  pub exact_name: bool,
}

impl Query {
  pub fn new(name: impl Into<String>, version: Option<&str>) -> Self {
    Self {
      name: name.into(),
      version: version.map(str::to_string),
      exact_name: false,
    }
  }

  pub fn exact(mut self) -> Self {
    self.exact_name = true;
    self
  }

  pub fn matches_name(&self, name: &str) -> bool {
    if self.exact_name {
      name == self.name
    } else {
      name.contains(&self.name)
    }
  }

  /// A version query matches the same string, or any revision of it: `1.0`
  /// matches `1.0-1` and `1.0-2`.
  pub fn matches_version(&self, version: &str) -> bool {
    match &self.version {
      None => true,
      Some(wanted) => {
        version == wanted
          || version
            .strip_prefix(wanted.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .is_some_and(|rev| !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()))
      }
    }
  }
}

/// One installation of a package version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallRecord {
  /// Root of the rocks tree holding the installation.
  pub repo: PathBuf,
}

/// Versions of one package, each with the trees it is installed in, in tree
/// priority order.
pub type VersionMap = BTreeMap<String, Vec<InstallRecord>>;

/// Search results keyed by package name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SearchResult(BTreeMap<String, VersionMap>);

impl SearchResult {
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn versions(&self, name: &str) -> Option<&VersionMap> {
    self.0.get(name)
  }

  pub fn add(&mut self, name: &str, version: &str, record: InstallRecord) {
    self
      .0
      .entry(name.to_string())
      .or_default()
      .entry(version.to_string())
      .or_default()
      .push(record);
  }
}

/// Search the given trees, in order, for installed packages matching `query`.
///
/// Trees or entries that cannot be read are skipped: a tree that does not
/// exist simply has nothing installed.
pub fn search(query: &Query, trees: &[Tree]) -> SearchResult {
  let mut result = SearchResult::default();

  for tree in trees {
    let rocks_dir = tree.rocks_dir();
    let Ok(packages) = fs::read_dir(&rocks_dir) else {
      debug!(dir = %rocks_dir.display(), "no rocks directory, skipping tree");
      continue;
    };

    for package in packages.flatten() {
      let name = package.file_name().to_string_lossy().to_string();
      if !package.path().is_dir() || !query.matches_name(&name) {
        continue;
      }

      let versions = match fs::read_dir(package.path()) {
        Ok(versions) => versions,
        Err(e) => {
          warn!(package = %name, error = %e, "cannot read package directory");
          continue;
        }
      };

      for version in versions.flatten() {
        let version_name = version.file_name().to_string_lossy().to_string();
        if version.path().is_dir() && query.matches_version(&version_name) {
          result.add(
            &name,
            &version_name,
            InstallRecord {
              repo: tree.root().to_path_buf(),
            },
          );
        }
      }
    }
  }

  result
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::FakeTree;

  #[test]
  fn version_query_ignores_revision() {
    let query = Query::new("demo", Some("1.0"));
    assert!(query.matches_version("1.0"));
    assert!(query.matches_version("1.0-1"));
    assert!(query.matches_version("1.0-12"));
    assert!(!query.matches_version("1.0.1-1"));
    assert!(!query.matches_version("1.0-rc1"));
    assert!(!query.matches_version("2.0-1"));
  }

  #[test]
  fn exact_name_disables_substring_match() {
    let loose = Query::new("json", None);
    assert!(loose.matches_name("lua-cjson"));
    let exact = Query::new("json", None).exact();
    assert!(!exact.matches_name("lua-cjson"));
    assert!(exact.matches_name("json"));
  }

  #[test]
  fn finds_all_versions_of_a_package() {
    let fake = FakeTree::new();
    fake.install_bare("demo", "1.0-1");
    fake.install_bare("demo", "2.0-1");
    fake.install_bare("other", "1.0-1");

    let result = search(&Query::new("demo", None).exact(), std::slice::from_ref(&fake.tree));

    let versions = result.versions("demo").unwrap();
    assert_eq!(versions.keys().collect::<Vec<_>>(), vec!["1.0-1", "2.0-1"]);
    assert!(result.versions("other").is_none());
  }

  #[test]
  fn records_keep_tree_order() {
    let user = FakeTree::new();
    let system = FakeTree::new();
    user.install_bare("demo", "1.0-1");
    system.install_bare("demo", "1.0-1");

    let result = search(
      &Query::new("demo", Some("1.0-1")).exact(),
      &[user.tree.clone(), system.tree.clone()],
    );

    let records = &result.versions("demo").unwrap()["1.0-1"];
    assert_eq!(
      records,
      &vec![
        InstallRecord {
          repo: user.tree.root().to_path_buf()
        },
        InstallRecord {
          repo: system.tree.root().to_path_buf()
        },
      ]
    );
  }

  #[test]
  fn missing_tree_yields_nothing() {
    let fake = FakeTree::new();
    let result = search(&Query::new("demo", None), std::slice::from_ref(&fake.tree));
    assert!(result.is_empty());
  }
}
