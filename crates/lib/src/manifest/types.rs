//! Rock manifest types.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

/// One entry of a manifest tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ManifestEntry {
  /// A deployed file, with the checksum recorded at install time.
  File(String),
  /// A directory of further entries.
  Dir(ManifestTree),
}

/// A directory level of a rock manifest, keyed by entry name.
///
/// Uses [`BTreeMap`] so walks over the tree are deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ManifestTree(BTreeMap<String, ManifestEntry>);

impl ManifestTree {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, name: impl Into<String>, entry: ManifestEntry) {
    self.0.insert(name.into(), entry);
  }

  /// Add a file entry and return the tree, for building manifests inline.
  pub fn with_file(mut self, name: impl Into<String>, checksum: impl Into<String>) -> Self {
    self.insert(name, ManifestEntry::File(checksum.into()));
    self
  }

  /// Add a directory entry and return the tree.
  pub fn with_dir(mut self, name: impl Into<String>, tree: ManifestTree) -> Self {
    self.insert(name, ManifestEntry::Dir(tree));
    self
  }

  pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
    self.0.get(name)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
    self.0.iter().map(|(name, entry)| (name.as_str(), entry))
  }

  /// Relative paths of every file below this level.
  pub fn leaf_paths(&self) -> Vec<PathBuf> {
    let mut out = Vec::new();
    collect_leaves(self, PathBuf::new(), &mut out);
    out
  }
}

fn collect_leaves(tree: &ManifestTree, base: PathBuf, out: &mut Vec<PathBuf>) {
  for (name, entry) in tree.iter() {
    let path = base.join(name);
    match entry {
      ManifestEntry::File(_) => out.push(path),
      ManifestEntry::Dir(sub) => collect_leaves(sub, path, out),
    }
  }
}

/// The file manifest of one installed package version.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RockManifest {
  root: ManifestTree,
}

impl RockManifest {
  pub fn new(root: ManifestTree) -> Self {
    Self { root }
  }

  pub fn root(&self) -> &ManifestTree {
    &self.root
  }

  /// A top-level directory entry, if present.
  pub fn subtree(&self, name: &str) -> Option<&ManifestTree> {
    match self.root.get(name) {
      Some(ManifestEntry::Dir(tree)) => Some(tree),
      _ => None,
    }
  }

  /// Native modules, deployed under the tree's lib directory.
  pub fn lib(&self) -> Option<&ManifestTree> {
    self.subtree("lib")
  }

  /// Lua modules, deployed under the tree's lua directory.
  pub fn lua(&self) -> Option<&ManifestTree> {
    self.subtree("lua")
  }

  /// Commands, deployed under the tree's bin directory.
  pub fn bin(&self) -> Option<&ManifestTree> {
    self.subtree("bin")
  }
}
