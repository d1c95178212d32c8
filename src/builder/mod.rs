//! Compiling the app.
//!
//! [`plan`] turns the resolved inputs into one `go install` invocation and
//! [`executor`] runs it.

pub mod executor;
pub mod plan;

pub use executor::BuildExecutor;
pub use plan::{build_flags, BuildPlan};
