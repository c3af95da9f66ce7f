use serde::{Deserialize, Serialize};

/// One Samba account as reported by the account tool's verbose listing.
/// Never persisted by this daemon; the external account store is
/// authoritative.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub username: String,
    /// Opaque status string, e.g. `[U          ]`.
    pub flags: String,
    pub sid: String,
}
