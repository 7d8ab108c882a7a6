//! Foundation utilities for srsforge
//!
//! Shared types (stage identifiers), the error taxonomy, exit codes, and
//! tracing initialization. Every other crate in the workspace depends on
//! this one; it depends on nothing internal.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod types;
