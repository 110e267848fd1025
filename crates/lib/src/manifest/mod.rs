//! Rock manifests.
//!
//! Every installed package records the files it deployed in a `rock_manifest`
//! file inside its install prefix. The manifest mirrors the deploy
//! directories: `lua` for pure-Lua modules, `lib` for native modules and
//! `bin` for commands, with one checksum per deployed file.

mod load;
mod types;

pub use load::*;
pub use types::*;
