//! # Accounts and Stations
//!
//! Operator accounts and the airport stations they are assigned to. These back
//! the admin API only; the display pipeline never touches them.

use serde::{Deserialize, Serialize};

use super::paging::nullable_string;

/// # User Account
///
/// An operator login. `password` holds the upper-case SHA-1 hex digest and is
/// never written back out in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id_usr: i32,
    pub id_sts: i32,
    pub fullname: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub email: String,
    pub nohp: String,
    pub is_active: i32,
}

impl UserAccount {
    pub fn is_active(&self) -> bool {
        self.is_active == 1
    }
}

/// Body of `POST /api/users` and `PUT /api/users`.
///
/// Every field is optional on the wire: create checks that the required ones are
/// present, update only replaces what was sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_usr: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_sts: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nohp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<i32>,
}

impl UserDraft {
    /// Returns `true` when every field a new account needs is present and non-blank.
    pub fn is_complete(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        self.id_sts.is_some()
            && filled(&self.fullname)
            && filled(&self.username)
            && filled(&self.password)
            && filled(&self.email)
            && filled(&self.nohp)
    }
}

/// An airport station (e.g. `CGK`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub id_sts: i32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub code_station: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub name_station: String,
    #[serde(default)]
    pub is_active: i32,
}
