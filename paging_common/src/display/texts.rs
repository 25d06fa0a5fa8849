//! Fixed screen texts in both display languages.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::Handler;

/// Screen language, cycled by the language timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    English,
    Indonesian,
}

impl Language {
    /// Rotation order.
    pub const CYCLE: [Language; 2] = [Language::English, Language::Indonesian];

    pub fn from_index(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }
}

/// Shown when a belt has neither passengers nor free text.
pub const FALLBACK_LINES: [&str; 2] = [
    "PLEASE BE CAREFUL WHILE COLLECTING THE BAG AND DO NOT TAKE THE WRONG BAGGAGE",
    "OUT OF GAUGE (OOG) OR OVERSIZED BAGGAGE IS LOCATED NEAR CONVEYOR BELT NO.6",
];

/// Header block above the passenger grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderText {
    pub title: &'static str,
    pub description: String,
    pub instruction: String,
}

/// `14 Oct 2026`
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

pub fn header_text(language: Language, flight_no: &str, date: NaiveDate, handler: Handler) -> HeaderText {
    let date = format_display_date(date);
    let handler = handler.as_str().to_uppercase();
    match language {
        Language::English => HeaderText {
            title: "ATTENTION",
            description: format!("The Following Passenger(s) of {flight_no} / {date} :"),
            instruction: format!("Please Exceed The {handler} Counter"),
        },
        Language::Indonesian => HeaderText {
            title: "PERHATIAN",
            description: format!("Penumpang Berikut Dari {flight_no} / {date} :"),
            instruction: format!("Silahkan Mendatangani {handler} Konter"),
        },
    }
}

/// Bottom banner. The service counter sits in front of belt 1, so that location
/// is named whenever the screen is bound to any belt.
pub fn notice_text(language: Language, has_belt: bool) -> String {
    match (language, has_belt) {
        (Language::English, true) => "PLEASE REPORT TO PT JAS BAGGAGE SERVICES COUNTER IN FRONT OF BELT 1 \
             OR APPROACH OUR GROUND STAFF FOR ASSISTANCE"
            .to_string(),
        (Language::English, false) => "PLEASE REPORT TO PT JAS BAGGAGE SERVICES COUNTER AT ARRIVAL HALL \
             INFORMATION COUNTER OR APPROACH OUR GROUND STAFF FOR ASSISTANCE"
            .to_string(),
        (Language::Indonesian, true) => "HARAP MELAPOR KE KONTER LAYANAN BAGASI PT JAS DI DEPAN BELT 1 \
             ATAU HUBUNGI STAF DARAT KAMI UNTUK BANTUAN"
            .to_string(),
        (Language::Indonesian, false) => "HARAP MELAPOR KE KONTER LAYANAN BAGASI PT JAS DI KONTER INFORMASI \
             HALL KEDATANGAN ATAU HUBUNGI STAF DARAT KAMI UNTUK BANTUAN"
            .to_string(),
    }
}
