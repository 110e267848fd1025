//! Platform detection.
//!
//! Binary rocks are tagged with the platform they were built for, using the
//! `<os>-<arch>` form rocks servers expect (e.g. `linux-x86_64`).

pub mod arch;
pub mod os;
pub mod paths;

use arch::Arch;
use os::Os;
use std::fmt;

/// Platform identifier combining OS and architecture (e.g., "macosx-aarch64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the architecture tag embedded in binary rock filenames
  pub fn arch_tag(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.arch_tag())
  }
}

/// Returns the architecture tag for the current system (e.g., "linux-x86_64")
///
/// Returns `None` if the current platform is not supported
pub fn arch_tag() -> Option<String> {
  Platform::current().map(|p| p.arch_tag())
}
