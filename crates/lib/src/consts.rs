//! Shared constants.

pub const APP_NAME: &str = "rockpack";

/// Directory of the per-user rocks tree, relative to the home directory.
pub const USER_TREE_DIR: &str = ".luarocks";

/// Lua version whose deploy directories are used when none is configured.
pub const DEFAULT_LUA_VERSION: &str = "5.4";

/// File inside an install prefix listing what the package deployed.
pub const ROCK_MANIFEST_FILE: &str = "rock_manifest";

/// Extension of every rock archive.
pub const ROCK_EXT: &str = "rock";

/// Arch tag of rocks that contain only Lua sources.
pub const ALL_ARCH: &str = "all";

/// Arch tag of source rocks.
pub const SRC_ARCH: &str = "src";

/// Extension of build recipes.
pub const ROCKSPEC_EXT: &str = "rockspec";
