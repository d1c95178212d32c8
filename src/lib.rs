//! gostage - a staging-time build orchestrator for Go applications
//!
//! This crate classifies an application's dependency-vendoring convention,
//! resolves a Go compiler version against the buildpack catalog, lays the
//! application out in a GOPATH and drives `go install`.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod sources;
pub mod util;

/// Test utilities and mocks for gostage unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides recording fakes for process execution and
/// dependency installation.
#[cfg(test)]
pub mod test_support;

pub use core::{
    catalog::Catalog, convention::VendoringConvention, errors::StageError,
    workspace::Workspace,
};
pub use ops::{stage, StageOptions};
pub use resolver::ResolvedVersion;
