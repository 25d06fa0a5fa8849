//! # Belt Display
//!
//! Everything a baggage-belt screen needs between the raw paging table and a
//! rendered frame.
//!
//! ## Contained Modules:
//! - **`selector`**: reduces all entries to the data for one belt.
//! - **`texts`**: fixed bilingual screen texts.
//! - **`engine`**: the pagination/rotation state machine.
//! - **`refresh`**: the async loop that polls, ticks and publishes frames.

#![forbid(unsafe_code)]

/// Belt-specific display data.
pub mod selector;
/// Bilingual screen copy.
pub mod texts;
/// Pagination and language rotation.
pub mod engine;
/// Polling and timer loop.
pub mod refresh;

pub use engine::{
    paginate, total_pages, DisplayEngine, DisplayFrame, DisplayState, EngineEvent, FrameBody,
    Transition, LANGUAGE_INTERVAL, PAGE_INTERVAL, PAGE_SIZE, POLL_INTERVAL,
};
pub use refresh::{DisplayRuntime, PagingSource, RuntimeCommand};
pub use selector::{select_display_data, DisplayData};
pub use texts::{header_text, notice_text, HeaderText, Language, FALLBACK_LINES};
