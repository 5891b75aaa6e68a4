//! Domain model for bcc-exporter
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern
//! - Self-documenting function signatures
//! - Structured error handling with a fixed HTTP status per failure

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{Pid, ProfileFormat, ProfileQuery, ProfileRequest, Seconds};

pub use errors::{PidError, ProfileError, RequestError, Stage};
