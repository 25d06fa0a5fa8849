//! # paging_common
//!
//! Shared library of the baggage-belt paging system. The data model is always
//! compiled; everything else is behind a feature so the server and the display
//! only build what they use.
//!
//! ## Features:
//! - **`display`**: belt selector, pagination/rotation engine, refresh loop.
//! - **`retrieve`**: paging API client and arrivals feed client.
//! - **`loggers`**: `tracing` subscriber setup and log pruning.
//! - **`utils`**: password digests.

#![forbid(unsafe_code)]

pub mod models;

#[cfg(feature = "display")]
pub mod display;

#[cfg(feature = "loggers")]
pub mod loggers;

#[cfg(feature = "retrieve")]
pub mod retrieve;

#[cfg(feature = "utils")]
pub mod utils;
