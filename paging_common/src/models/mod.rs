//! # Data Model
//!
//! Records shared between the paging server, its HTTP clients and the display.
//!
//! ## Contained Modules:
//! - **`paging`**: paging entries, drafts and the audit log row.
//! - **`account`**: operator accounts and stations.
//! - **`api`**: acknowledgement and small request bodies.

/// Paging entries, create/update drafts and audit rows.
pub mod paging;
/// Operator accounts and stations.
pub mod account;
/// Shared HTTP bodies.
pub mod api;

pub use account::{Station, UserAccount, UserDraft};
pub use api::{ApiMessage, DeleteRequest, SearchRequest};
pub use paging::{Handler, PagingDraft, PagingEntry, PagingLogEntry, STATUS_NO_SHOW, STATUS_SHOW};
