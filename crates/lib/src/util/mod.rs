//! Shared utilities.
//!
//! Filesystem helpers used by the packing pipeline, plus test helpers.

pub mod fs;

#[cfg(test)]
pub mod testutil;
