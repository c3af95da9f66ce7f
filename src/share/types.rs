use serde::{Deserialize, Serialize};

/// A named directory exported by the file server, as stored in one
/// configuration section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    pub name: String,
    pub path: String,
    pub comment: String,
    pub browseable: bool,
    pub read_only: bool,
    pub guest_ok: bool,
}

impl ShareRecord {
    /// A record with the documented field defaults: visible, writable, no
    /// guest access.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: String::new(),
            comment: String::new(),
            browseable: true,
            read_only: false,
            guest_ok: false,
        }
    }
}

/// Fields to overwrite in an existing share. `None` leaves the current
/// value untouched; there is no merge detection, last writer wins.
#[derive(Debug, Clone, Default)]
pub struct UpdateShareFields {
    pub path: Option<String>,
    pub comment: Option<String>,
    pub browseable: Option<bool>,
    pub read_only: Option<bool>,
    pub guest_ok: Option<bool>,
}
