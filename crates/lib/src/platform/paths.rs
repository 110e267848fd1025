//! Default locations of rocks trees.

use std::path::PathBuf;

use crate::consts::USER_TREE_DIR;

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("USERPROFILE").map(PathBuf::from)
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> Option<PathBuf> {
  std::env::var_os("HOME").map(PathBuf::from)
}

/// Returns the per-user rocks tree (`~/.luarocks`)
#[cfg(windows)]
pub fn default_user_tree() -> Option<PathBuf> {
  std::env::var_os("APPDATA").map(|appdata| PathBuf::from(appdata).join("luarocks"))
}

/// Returns the per-user rocks tree (`~/.luarocks`)
#[cfg(not(windows))]
pub fn default_user_tree() -> Option<PathBuf> {
  home_dir().map(|home| home.join(USER_TREE_DIR))
}

/// Returns the system-wide rocks tree
#[cfg(windows)]
pub fn default_system_tree() -> PathBuf {
  let drive = std::env::var("SYSTEMDRIVE").unwrap_or_else(|_| "C:".to_string());
  PathBuf::from(format!("{}\\", drive)).join("luarocks")
}

/// Returns the system-wide rocks tree
#[cfg(not(windows))]
pub fn default_system_tree() -> PathBuf {
  PathBuf::from("/usr/local")
}
