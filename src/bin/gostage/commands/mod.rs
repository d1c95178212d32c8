//! Command implementations

pub mod compile;
pub mod detect;
pub mod resolve_version;
