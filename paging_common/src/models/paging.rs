//! # Paging Records
//!
//! Wire and storage shapes for paging instructions and their audit trail.
//!
//! The admin front-end and older database rows are loose about types: belt
//! numbers arrive as strings or numbers, text columns may be `null`, and the
//! handler column has been seen empty. Deserialisation normalises all of that
//! once so that the rest of the system works with plain `String`s and a closed
//! [`Handler`] enum.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// `status` value for an entry that should be shown on the public display.
pub const STATUS_SHOW: i32 = 1;
/// `status` value for an entry kept for history but hidden from the display.
pub const STATUS_NO_SHOW: i32 = 0;

/// # Ground Handler
///
/// The ground-handling company whose branding and counter text appear on screen.
/// Anything that is not recognisably Gapura is treated as JAS, including missing
/// or empty values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Handler {
    #[default]
    Jas,
    Gapura,
}

impl Handler {
    /// Wire form as stored in the `handle_by` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Handler::Jas => "Jas",
            Handler::Gapura => "Gapura",
        }
    }

    /// Lenient parse used for every incoming value.
    pub fn from_loose(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("gapura") {
            Handler::Gapura
        } else {
            Handler::Jas
        }
    }
}

impl fmt::Display for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Handler {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Handler::from_loose).unwrap_or_default())
    }
}

/// Accepts `"7"`, `7` or `null` for a belt number and keeps the string form.
pub fn belt_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Belt {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Option::<Belt>::deserialize(deserializer)? {
        Some(Belt::Text(s)) => s,
        Some(Belt::Integer(n)) => n.to_string(),
        Some(Belt::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Maps a JSON `null` onto the empty string.
pub fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(Option::<i32>::deserialize(deserializer)?.unwrap_or(STATUS_NO_SHOW))
}

/// # Paging Entry
///
/// One stored paging instruction. `name_passenger` is a denormalised,
/// comma-joined list of names; see [`PagingEntry::passenger_names`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingEntry {
    pub id: i32,
    #[serde(default, deserialize_with = "belt_number")]
    pub belt_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub flight_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name_passenger: String,
    #[serde(default)]
    pub handle_by: Handler,
    #[serde(default, deserialize_with = "nullable_string")]
    pub free_text: String,
    #[serde(default, deserialize_with = "nullable_status")]
    pub status: i32,
}

impl PagingEntry {
    /// Whether the entry is flagged "show on display".
    pub fn is_visible(&self) -> bool {
        self.status == STATUS_SHOW
    }

    /// Splits the comma-joined name column, trimming and dropping empty segments.
    pub fn passenger_names(&self) -> impl Iterator<Item = &str> {
        self.name_passenger
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Same record under a new status, used by the show/no-show toggles.
    pub fn with_status(&self, status: i32) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// The editable part of the record.
    pub fn to_draft(&self) -> PagingDraft {
        PagingDraft {
            id: Some(self.id),
            belt_no: self.belt_no.clone(),
            flight_no: self.flight_no.clone(),
            name_passenger: self.name_passenger.clone(),
            handle_by: self.handle_by,
            free_text: self.free_text.clone(),
            status: self.status,
        }
    }
}

/// # Paging Draft
///
/// Request body for create and update. `id` is ignored on create and required on
/// update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PagingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, deserialize_with = "belt_number")]
    pub belt_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub flight_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name_passenger: String,
    #[serde(default)]
    pub handle_by: Handler,
    #[serde(default, deserialize_with = "nullable_string")]
    pub free_text: String,
    #[serde(default, deserialize_with = "nullable_status")]
    pub status: i32,
}

impl PagingDraft {
    /// Materialises the draft under a store-assigned id.
    pub fn into_entry(self, id: i32) -> PagingEntry {
        PagingEntry {
            id,
            belt_no: self.belt_no,
            flight_no: self.flight_no,
            name_passenger: self.name_passenger,
            handle_by: self.handle_by,
            free_text: self.free_text,
            status: self.status,
        }
    }

    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.belt_no.trim().is_empty() {
            missing.push("belt_no");
        }
        if self.flight_no.trim().is_empty() {
            missing.push("flight_no");
        }
        if self.name_passenger.trim().is_empty() {
            missing.push("name_passenger");
        }
        missing
    }
}

/// # Paging Log Entry
///
/// Audit row written on every create, update and delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagingLogEntry {
    pub id: i32,
    #[serde(default, deserialize_with = "belt_number")]
    pub belt_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub flight_no: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name_passenger: String,
    #[serde(default)]
    pub handle_by: Handler,
    #[serde(default, deserialize_with = "nullable_string")]
    pub free_text: String,
    #[serde(default, deserialize_with = "nullable_status")]
    pub status: i32,
    /// RFC 3339 timestamp assigned by the store.
    pub last_update: String,
}
