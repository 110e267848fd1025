//! Build into a throwaway tree, then pack the result.

use std::path::PathBuf;

use tracing::info;

use super::{PackError, Packer};
use crate::names::split_name_version;
use crate::tree::Tree;

impl Packer {
  /// Run `build` against a fresh temporary rocks tree and pack what it
  /// installed there.
  ///
  /// `build` is expected to install `name` into the tree it is given. Its
  /// error is returned as-is and nothing is packed. `name` may be written as
  /// `name@version`, in which case `version` is ignored. The temporary tree
  /// is removed however the call ends, and the configured trees are never
  /// searched.
  pub fn build_then_pack<F, E>(&self, name: &str, version: Option<&str>, build: F) -> Result<PathBuf, E>
  where
    F: FnOnce(&Tree) -> Result<(), E>,
    E: From<PackError>,
  {
    let root = self.temp_dir("build")?;
    let tree = self.config.tree(root.path());
    info!(tree = %tree.root().display(), "building into temporary tree");

    build(&tree)?;

    let (name, version) = match split_name_version(name) {
      Some((name, version)) => (name, Some(version)),
      None => (name, version),
    };
    Ok(self.pack_installed_in(std::slice::from_ref(&tree), name, version)?)
  }
}
