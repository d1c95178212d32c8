//! Dependency sources.
//!
//! Staging installs catalog dependencies (the Go toolchain, godep, glide)
//! through a [`DependencyInstaller`]. [`TarballInstaller`] is the real one.

pub mod tarball;

use std::path::Path;

use anyhow::Result;

use crate::core::catalog::CatalogEntry;

pub use tarball::TarballInstaller;

/// Installs one catalog entry into a directory.
pub trait DependencyInstaller {
    /// Install `entry` so its files end up below `dest`.
    fn install(&self, entry: &CatalogEntry, dest: &Path) -> Result<()>;
}
