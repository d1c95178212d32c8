//! High-level operations.
//!
//! This module contains the implementation of gostage commands.

pub mod release;
pub mod stage;
pub mod supply;

pub use release::{write_startup_environment, DEFAULT_RELEASE_FILE};
pub use stage::{stage, StageContext, StageOptions, StageOutcome};
pub use supply::{go_install_location, install_go, install_vendor_tool, verify_go};
