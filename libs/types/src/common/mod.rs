//! Common identifiers and error types shared by every crate in the workspace

pub mod errors;
pub mod identifiers;
