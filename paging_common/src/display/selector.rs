//! # Display Data Selector
//!
//! Reduces the full paging table to what one belt screen needs.
//!
//! ## Rules:
//! 1.  No belt → idle data (nothing to show, JAS branding).
//! 2.  Visible entries (`status == 1`) for the belt win. Header fields come from
//!     the first of them; names are merged across **all** of them, entry order
//!     first, then comma order inside each entry.
//! 3.  No visible entry but some hidden ones → the first one's free text and
//!     handler, no names, no flight.
//! 4.  Nothing for the belt at all → idle data.
//!
//! The function is pure: same inputs, same output, no side effects.

use serde::Serialize;

use crate::models::{Handler, PagingEntry};

/// # Display Data
///
/// Selector output: the belt-specific slice of the paging table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayData {
    pub flight_no: String,
    pub free_text: String,
    pub handle_by: Handler,
    pub names: Vec<String>,
}

impl DisplayData {
    /// Data for a screen with no belt or no matching entries.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Two-letter airline designator taken from the flight number, if any.
    pub fn airline_code(&self) -> Option<&str> {
        let code = match self.flight_no.char_indices().nth(2) {
            Some((end, _)) => &self.flight_no[..end],
            None => self.flight_no.as_str(),
        };
        (!code.is_empty()).then_some(code)
    }
}

/// Computes the display data for `belt_no` from `entries`.
pub fn select_display_data(belt_no: Option<&str>, entries: &[PagingEntry]) -> DisplayData {
    let Some(belt) = belt_no.filter(|b| !b.is_empty()) else {
        return DisplayData::idle();
    };

    let active: Vec<&PagingEntry> = entries
        .iter()
        .filter(|e| e.belt_no == belt && e.is_visible())
        .collect();

    if let Some(first) = active.first() {
        // Multiple visible flights on one belt are merged; the first one labels the screen.
        let names = active
            .iter()
            .flat_map(|entry| entry.passenger_names())
            .map(str::to_owned)
            .collect();

        return DisplayData {
            flight_no: first.flight_no.clone(),
            free_text: first.free_text.clone(),
            handle_by: first.handle_by,
            names,
        };
    }

    match entries.iter().find(|e| e.belt_no == belt) {
        Some(first) => DisplayData {
            flight_no: String::new(),
            free_text: first.free_text.clone(),
            handle_by: first.handle_by,
            names: Vec::new(),
        },
        None => DisplayData::idle(),
    }
}
