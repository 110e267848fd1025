//! Copying deployed files back into a staging tree.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::PackError;
use crate::manifest::{ManifestEntry, ManifestTree};
use crate::names::versioned_name;
use crate::util::fs::copy_file;

/// Rebuild the files listed in `subtree` from `deploy_root` into
/// `staging_root`.
///
/// Directory entries recurse with the matching sub-directories. For a file
/// entry the versioned variant (kept when another version of the package
/// owns the plain name) is copied if it exists, otherwise the plain file.
/// The first failed copy aborts the whole reconstruction.
pub fn reconstruct(
  subtree: &ManifestTree,
  deploy_root: &Path,
  staging_root: &Path,
  name: &str,
  version: &str,
) -> Result<(), PackError> {
  fs::create_dir_all(staging_root).map_err(|source| PackError::CopyFailed {
    path: staging_root.to_path_buf(),
    source,
  })?;

  for (entry, node) in subtree.iter() {
    let source = deploy_root.join(entry);
    let target = staging_root.join(entry);

    match node {
      ManifestEntry::Dir(sub) => reconstruct(sub, &source, &target, name, version)?,
      ManifestEntry::File(_) => {
        let versioned = versioned_name(&source, deploy_root, name, version);
        let from = if versioned.is_file() { versioned } else { source };
        debug!(from = %from.display(), to = %target.display(), "copying back");
        copy_file(&from, &target)?;
      }
    }
  }

  Ok(())
}
