//! Core data types for staging a Go app.

pub mod catalog;
pub mod convention;
pub mod errors;
pub mod godeps;
pub mod toolchain;
pub mod workspace;

pub use catalog::{Catalog, CatalogEntry};
pub use convention::{detect_convention, VendoringConvention};
pub use errors::{StageError, StageWarning, Warnings};
pub use godeps::DependencyManifest;
pub use toolchain::ToolchainEnv;
pub use workspace::{plan_workspace, Workspace};
