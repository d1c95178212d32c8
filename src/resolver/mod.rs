//! Resolution of the compiler version and the package list.

pub mod packages;
pub mod version;

pub use packages::{
    ensure_lock_dependencies, resolve_packages, rewrite_for_vendor, vendor_mode, PackageSpec,
    VendorMode,
};
pub use version::{resolve_version, select_go_version, ResolvedVersion};
