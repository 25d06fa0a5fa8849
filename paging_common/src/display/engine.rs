//! # Pagination/Rotation Engine
//!
//! The display's state machine. All screen state lives in one [`DisplayEngine`]
//! struct that only changes through [`EngineEvent`]s, so a renderer can always
//! ask for a consistent [`DisplayFrame`].
//!
//! ## States:
//! - **`PassengerList`**: the belt has named passengers. Names are shown five per
//!   page; with more than one page the page timer cycles through them.
//! - **`FreeText`**: no names, but the operator left a message.
//! - **`Fallback`**: nothing at all; the fixed baggage safety message.
//!
//! ## Timers:
//! The page timer (5 s) and the language timer (6 s) are separate and not
//! phase-locked. The engine does not own them; it only reacts to `PageTick` and
//! `LanguageTick`. A change of the passenger list resets the page to 0 and asks
//! the owner to restart the page timer through [`Transition::page_reset`].

use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;

use super::selector::{select_display_data, DisplayData};
use super::texts::{header_text, notice_text, HeaderText, Language, FALLBACK_LINES};
use crate::models::{Handler, PagingEntry};

/// Passenger names per page.
pub const PAGE_SIZE: usize = 5;
/// Period of the passenger page rotation.
pub const PAGE_INTERVAL: Duration = Duration::from_millis(5000);
/// Period of the English/Indonesian rotation.
pub const LANGUAGE_INTERVAL: Duration = Duration::from_millis(6000);
/// Period of the data refresh poll.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// # Display State
///
/// Which of the three mutually exclusive screens is active, carrying only what
/// that screen needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayState {
    PassengerList {
        flight_no: String,
        handle_by: Handler,
        names: Vec<String>,
    },
    FreeText {
        text: String,
        handle_by: Handler,
    },
    Fallback {
        handle_by: Handler,
    },
}

impl DisplayState {
    /// Chooses the screen for a selector result.
    pub fn from_data(data: &DisplayData) -> Self {
        if !data.names.is_empty() {
            DisplayState::PassengerList {
                flight_no: data.flight_no.clone(),
                handle_by: data.handle_by,
                names: data.names.clone(),
            }
        } else if !data.free_text.is_empty() {
            DisplayState::FreeText {
                text: data.free_text.clone(),
                handle_by: data.handle_by,
            }
        } else {
            DisplayState::Fallback {
                handle_by: data.handle_by,
            }
        }
    }

    /// Passenger names; empty outside `PassengerList`.
    pub fn names(&self) -> &[String] {
        match self {
            DisplayState::PassengerList { names, .. } => names,
            _ => &[],
        }
    }

    /// Handler shown on every screen.
    pub fn handle_by(&self) -> Handler {
        match self {
            DisplayState::PassengerList { handle_by, .. }
            | DisplayState::FreeText { handle_by, .. }
            | DisplayState::Fallback { handle_by } => *handle_by,
        }
    }
}

/// Number of pages needed for `count` names.
pub fn total_pages(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Names on `page`. An out-of-range page falls back to the first page.
pub fn page_slice(names: &[String], page: usize) -> &[String] {
    let start = page.saturating_mul(PAGE_SIZE);
    match names.get(start..) {
        Some(rest) if !rest.is_empty() => &rest[..rest.len().min(PAGE_SIZE)],
        _ => &names[..names.len().min(PAGE_SIZE)],
    }
}

/// All pages at once, for stateless consumers.
pub fn paginate(names: &[String]) -> Vec<Vec<String>> {
    names.chunks(PAGE_SIZE).map(<[String]>::to_vec).collect()
}

/// Inputs to the engine.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// The screen was re-bound to another belt (or unbound).
    BeltChanged(Option<String>),
    /// A poll finished. `seq` increases with every issued poll.
    PollCompleted { seq: u64, entries: Vec<PagingEntry> },
    /// A poll failed; the current screen stays.
    PollFailed { seq: u64 },
    /// The page timer fired.
    PageTick,
    /// The language timer fired.
    LanguageTick,
}

/// Outcome of one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    /// Visible output changed; re-render.
    pub changed: bool,
    /// The page went back to 0 because the passenger list changed.
    pub page_reset: bool,
    /// The event was a poll result older than one already applied.
    pub stale: bool,
}

/// What a renderer needs for one moment in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    pub belt_no: Option<String>,
    pub language: Language,
    pub handle_by: Handler,
    pub airline_code: Option<String>,
    /// Only present on the passenger list.
    pub header: Option<HeaderText>,
    pub body: FrameBody,
    pub notice: String,
}

/// Main content area of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameBody {
    Passengers {
        names: Vec<String>,
        page: usize,
        total_pages: usize,
    },
    FreeText {
        text: String,
    },
    Fallback {
        lines: [&'static str; 2],
    },
}

/// # Display Engine
///
/// Explicit display state, updated only through [`DisplayEngine::apply`].
#[derive(Debug, Clone)]
pub struct DisplayEngine {
    belt_no: Option<String>,
    entries: Vec<PagingEntry>,
    last_seq: Option<u64>,
    data: DisplayData,
    state: DisplayState,
    current_page: usize,
    language_index: usize,
}

impl DisplayEngine {
    pub fn new(belt_no: Option<String>) -> Self {
        let data = DisplayData::idle();
        Self {
            belt_no: normalize_belt(belt_no),
            entries: Vec::new(),
            last_seq: None,
            state: DisplayState::from_data(&data),
            data,
            current_page: 0,
            language_index: 0,
        }
    }

    pub fn belt_no(&self) -> Option<&str> {
        self.belt_no.as_deref()
    }

    pub fn data(&self) -> &DisplayData {
        &self.data
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.state.names().len())
    }

    /// Whether the page timer has anything to rotate.
    pub fn needs_page_rotation(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn language(&self) -> Language {
        Language::from_index(self.language_index)
    }

    /// Names on the visible page.
    pub fn current_page_passengers(&self) -> &[String] {
        page_slice(self.state.names(), self.current_page)
    }

    /// # Apply
    ///
    /// Feeds one event through the state machine.
    ///
    /// - `BeltChanged` re-runs the selector over the last received entries right
    ///   away and always resets the page; the language index is kept.
    /// - `PollCompleted` is ignored when `seq` is not newer than the last applied
    ///   poll. Otherwise the entries replace the cache and the selector runs.
    /// - `PollFailed` keeps everything as is.
    /// - `PageTick` advances modulo the page count, only with two or more pages.
    /// - `LanguageTick` flips the language.
    pub fn apply(&mut self, event: EngineEvent) -> Transition {
        match event {
            EngineEvent::BeltChanged(belt_no) => {
                let belt_no = normalize_belt(belt_no);
                if belt_no == self.belt_no {
                    return Transition::default();
                }
                self.belt_no = belt_no;
                self.reselect();
                self.current_page = 0;
                Transition {
                    changed: true,
                    page_reset: true,
                    stale: false,
                }
            }
            EngineEvent::PollCompleted { seq, entries } => {
                if self.last_seq.is_some_and(|last| seq <= last) {
                    return Transition {
                        stale: true,
                        ..Transition::default()
                    };
                }
                self.last_seq = Some(seq);
                self.entries = entries;

                let previous = self.data.clone();
                self.reselect();
                let page_reset = previous.names != self.data.names;
                if page_reset {
                    self.current_page = 0;
                }
                Transition {
                    changed: previous != self.data,
                    page_reset,
                    stale: false,
                }
            }
            EngineEvent::PollFailed { .. } => Transition::default(),
            EngineEvent::PageTick => {
                let pages = self.total_pages();
                if pages <= 1 {
                    return Transition::default();
                }
                self.current_page = (self.current_page + 1) % pages;
                Transition {
                    changed: true,
                    ..Transition::default()
                }
            }
            EngineEvent::LanguageTick => {
                self.language_index = (self.language_index + 1) % Language::CYCLE.len();
                Transition {
                    changed: true,
                    ..Transition::default()
                }
            }
        }
    }

    /// Snapshot of the screen for `today`.
    pub fn frame(&self, today: NaiveDate) -> DisplayFrame {
        let language = self.language();
        let handle_by = self.state.handle_by();

        let (header, body) = match &self.state {
            DisplayState::PassengerList { flight_no, names, .. } => {
                let header = (!flight_no.is_empty())
                    .then(|| header_text(language, flight_no, today, handle_by));
                let body = FrameBody::Passengers {
                    names: self.current_page_passengers().to_vec(),
                    page: self.current_page,
                    total_pages: total_pages(names.len()),
                };
                (header, body)
            }
            DisplayState::FreeText { text, .. } => (None, FrameBody::FreeText { text: text.clone() }),
            DisplayState::Fallback { .. } => (None, FrameBody::Fallback { lines: FALLBACK_LINES }),
        };

        DisplayFrame {
            belt_no: self.belt_no.clone(),
            language,
            handle_by,
            airline_code: self.data.airline_code().map(str::to_owned),
            header,
            body,
            notice: notice_text(language, self.belt_no.is_some()),
        }
    }

    fn reselect(&mut self) {
        self.data = select_display_data(self.belt_no.as_deref(), &self.entries);
        self.state = DisplayState::from_data(&self.data);
    }
}

fn normalize_belt(belt_no: Option<String>) -> Option<String> {
    belt_no.filter(|b| !b.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PagingDraft, STATUS_NO_SHOW, STATUS_SHOW};

    fn entry(id: i32, belt: &str, names: &str, free: &str, status: i32) -> PagingEntry {
        PagingDraft {
            belt_no: belt.into(),
            flight_no: "GA123".into(),
            name_passenger: names.into(),
            free_text: free.into(),
            status,
            ..Default::default()
        }
        .into_entry(id)
    }

    fn twelve_names() -> String {
        (1..=12).map(|i| format!("P{i}")).collect::<Vec<_>>().join(",")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_twelve_names_rotate_over_three_pages() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "1", &twelve_names(), "", STATUS_SHOW)],
        });

        assert_eq!(engine.total_pages(), 3);
        assert_eq!(engine.current_page_passengers(), ["P1", "P2", "P3", "P4", "P5"]);
        engine.apply(EngineEvent::PageTick);
        assert_eq!(engine.current_page_passengers(), ["P6", "P7", "P8", "P9", "P10"]);
        engine.apply(EngineEvent::PageTick);
        assert_eq!(engine.current_page_passengers(), ["P11", "P12"]);
        engine.apply(EngineEvent::PageTick);
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn test_five_names_never_rotate() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "1", "A,B,C,D,E", "", STATUS_SHOW)],
        });
        assert_eq!(engine.total_pages(), 1);
        assert!(!engine.needs_page_rotation());
        let transition = engine.apply(EngineEvent::PageTick);
        assert!(!transition.changed);
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn test_empty_names_pick_free_text_or_fallback() {
        let mut engine = DisplayEngine::new(Some("2".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "2", "Zed", "Delayed", STATUS_NO_SHOW)],
        });
        assert_eq!(
            engine.state(),
            &DisplayState::FreeText {
                text: "Delayed".into(),
                handle_by: Handler::Jas
            }
        );

        engine.apply(EngineEvent::BeltChanged(Some("9".into())));
        assert_eq!(engine.state(), &DisplayState::Fallback { handle_by: Handler::Jas });
        assert_eq!(
            engine.frame(today()).body,
            FrameBody::Fallback { lines: FALLBACK_LINES }
        );
    }

    #[test]
    fn test_new_names_reset_page() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "1", &twelve_names(), "", STATUS_SHOW)],
        });
        engine.apply(EngineEvent::PageTick);
        assert_eq!(engine.current_page(), 1);

        let same = engine.apply(EngineEvent::PollCompleted {
            seq: 2,
            entries: vec![entry(1, "1", &twelve_names(), "", STATUS_SHOW)],
        });
        assert!(!same.page_reset);
        assert_eq!(engine.current_page(), 1);

        let changed = engine.apply(EngineEvent::PollCompleted {
            seq: 3,
            entries: vec![entry(1, "1", &format!("{},P13", twelve_names()), "", STATUS_SHOW)],
        });
        assert!(changed.page_reset);
        assert_eq!(engine.current_page(), 0);
    }

    #[test]
    fn test_stale_poll_is_discarded() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 5,
            entries: vec![entry(1, "1", "Fresh", "", STATUS_SHOW)],
        });
        let transition = engine.apply(EngineEvent::PollCompleted {
            seq: 4,
            entries: vec![entry(1, "1", "Stale", "", STATUS_SHOW)],
        });
        assert!(transition.stale);
        assert_eq!(engine.state().names(), ["Fresh"]);
    }

    #[test]
    fn test_belt_change_reselects_cached_entries_and_keeps_language() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![
                entry(1, "1", &twelve_names(), "", STATUS_SHOW),
                entry(2, "3", "Solo", "", STATUS_SHOW),
            ],
        });
        engine.apply(EngineEvent::PageTick);
        engine.apply(EngineEvent::LanguageTick);

        let transition = engine.apply(EngineEvent::BeltChanged(Some("3".into())));
        assert!(transition.page_reset);
        assert_eq!(engine.current_page(), 0);
        assert_eq!(engine.state().names(), ["Solo"]);
        assert_eq!(engine.language(), Language::Indonesian);
    }

    #[test]
    fn test_poll_failure_keeps_screen() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "1", "Alice", "", STATUS_SHOW)],
        });
        let transition = engine.apply(EngineEvent::PollFailed { seq: 2 });
        assert_eq!(transition, Transition::default());
        assert_eq!(engine.state().names(), ["Alice"]);
    }

    #[test]
    fn test_frame_header_follows_language() {
        let mut engine = DisplayEngine::new(Some("1".into()));
        engine.apply(EngineEvent::PollCompleted {
            seq: 1,
            entries: vec![entry(1, "1", "Alice, Bob", "", STATUS_SHOW)],
        });

        let frame = engine.frame(today());
        assert_eq!(frame.airline_code.as_deref(), Some("GA"));
        assert_eq!(frame.header.as_ref().map(|h| h.title), Some("ATTENTION"));
        assert_eq!(
            frame.body,
            FrameBody::Passengers {
                names: vec!["Alice".into(), "Bob".into()],
                page: 0,
                total_pages: 1
            }
        );

        engine.apply(EngineEvent::LanguageTick);
        let frame = engine.frame(today());
        assert_eq!(frame.header.map(|h| h.title), Some("PERHATIAN"));
        assert!(frame.notice.starts_with("HARAP MELAPOR"));
    }

    #[test]
    fn test_page_slice_falls_back_to_first_page() {
        let names: Vec<String> = (1..=7).map(|i| format!("N{i}")).collect();
        assert_eq!(page_slice(&names, 1), ["N6", "N7"]);
        assert_eq!(page_slice(&names, 4), ["N1", "N2", "N3", "N4", "N5"]);
        assert_eq!(paginate(&names).len(), 2);
        assert_eq!(total_pages(0), 0);
    }
}
