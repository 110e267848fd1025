//! rockpack-lib: packing Lua rocks
//!
//! This crate turns installed packages and rockspecs back into rock archives:
//! - `Tree`: a rocks tree and the paths packages are installed and deployed to
//! - `RockManifest`: the files an installed package deployed
//! - `Packer`: locates, stages and archives rocks
//! - `PackTarget`: what a pack request refers to, decided from its argument

pub mod archive;
pub mod config;
pub mod consts;
pub mod fetch;
pub mod manifest;
pub mod names;
pub mod pack;
pub mod platform;
pub mod rockspec;
pub mod search;
pub mod tree;
pub mod util;

pub use config::PackConfig;
pub use pack::{PackError, PackTarget, Packer};
pub use tree::Tree;
