//! # Utilities
//!
//! Small helpers shared by the server and tools.

#![forbid(unsafe_code)]

/// Password digests for the operator accounts table.
pub mod hashing;

pub use hashing::{password_digest, verify_password};
