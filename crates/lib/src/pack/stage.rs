//! Staging an installed package and archiving it as a binary rock.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Located, PackError, Packer, reconstruct};
use crate::consts::ALL_ARCH;
use crate::manifest::{RockManifest, load_rock_manifest};
use crate::names::{rock_filename, versioned_name};
use crate::tree::Tree;
use crate::util::fs::{DirGuard, copy_contents, is_actual_binary, list_dir};

impl Packer {
  /// Assemble the rock contents of `located` in a staging directory and
  /// archive them into the output directory.
  ///
  /// The install prefix is copied as-is, then the `lib` and `lua` files are
  /// copied back from the tree's deploy directories. The rock is tagged
  /// `all` when it ships no native code at all.
  pub fn stage_and_archive(&self, located: &Located, manifest: &RockManifest) -> Result<PathBuf, PackError> {
    let Located {
      name,
      version,
      tree,
      prefix,
    } = located;

    let staging = self.temp_dir("pack")?;
    let root = staging.path();
    debug!(staging = %root.display(), prefix = %prefix.display(), "staging installed rock");

    copy_contents(prefix, root)?;

    let mut is_binary = false;
    if let Some(lib) = manifest.lib() {
      reconstruct(lib, &tree.deploy_lib_dir(), &root.join("lib"), name, version)?;
      is_binary = true;
    }
    if let Some(lua) = manifest.lua() {
      reconstruct(lua, &tree.deploy_lua_dir(), &root.join("lua"), name, version)?;
    }

    let arch = if !is_binary && !has_binaries(name, version, tree) {
      ALL_ARCH
    } else {
      self.config.arch.as_str()
    };
    let rock_file = self.config.out_dir.join(rock_filename(name, version, arch));

    {
      let _cwd = DirGuard::push(root).map_err(|e| PackError::ChangeDir {
        path: e.path,
        source: e.source,
      })?;
      let inputs = list_dir(Path::new("."))?;
      self.write_rock(&rock_file, &inputs)?;
    }

    info!(rock = %rock_file.display(), arch, "archived installed rock");
    Ok(rock_file)
  }
}

/// Whether the installed package deploys any command that is a real
/// executable, as opposed to a Lua script or `#!` wrapper.
///
/// A manifest that cannot be loaded counts as shipping no binaries.
pub fn has_binaries(name: &str, version: &str, tree: &Tree) -> bool {
  let Ok(manifest) = load_rock_manifest(name, version, tree) else {
    return false;
  };
  let Some(bin) = manifest.bin() else {
    return false;
  };

  let bin_dir = tree.deploy_bin_dir();
  bin.leaf_paths().iter().any(|leaf| {
    let plain = bin_dir.join(leaf);
    let versioned = versioned_name(&plain, &bin_dir, name, version);
    let file = if versioned.is_file() { versioned } else { plain };
    is_actual_binary(&file)
  })
}
