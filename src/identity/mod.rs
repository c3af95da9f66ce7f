//! Actor identity resolution.
//!
//! The daemon does not own logins or sessions; whoever fronts it does.
//! What it does need is a way to answer "who is actor `id` and may they
//! mutate" without hardcoding a user table, so identity lookup is an
//! injected trait with a static map implementation fed from settings.

use crate::settings::DaemonSettings;
use std::collections::HashMap;

/// A resolved actor. Samba accounts are a separate concept managed by the
/// account module; this is the daemon's own caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: String,
    pub username: String,
    pub is_admin: bool,
}

/// Lookup-by-id contract for actor resolution.
pub trait IdentityProvider: Send + Sync {
    fn lookup(&self, id: &str) -> Option<Identity>;
}

/// Identity provider backed by a fixed map, built from the settings file.
pub struct StaticIdentityProvider {
    entries: HashMap<String, Identity>,
}

impl StaticIdentityProvider {
    pub fn new(identities: impl IntoIterator<Item = Identity>) -> Self {
        Self {
            entries: identities
                .into_iter()
                .map(|i| (i.id.clone(), i))
                .collect(),
        }
    }

    pub fn from_settings(settings: &DaemonSettings) -> Self {
        Self::new(settings.admins.iter().map(|entry| Identity {
            id: entry.id.clone(),
            username: entry.username.clone(),
            is_admin: entry.is_admin,
        }))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn lookup(&self, id: &str) -> Option<Identity> {
        self.entries.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> StaticIdentityProvider {
        StaticIdentityProvider::new([
            Identity {
                id: "1".to_string(),
                username: "admin".to_string(),
                is_admin: true,
            },
            Identity {
                id: "2".to_string(),
                username: "viewer".to_string(),
                is_admin: false,
            },
        ])
    }

    #[test]
    fn test_lookup_known_id() {
        let identity = provider().lookup("1").expect("admin should resolve");
        assert_eq!(identity.username, "admin");
        assert!(identity.is_admin);
    }

    #[test]
    fn test_lookup_non_admin() {
        let identity = provider().lookup("2").unwrap();
        assert!(!identity.is_admin);
    }

    #[test]
    fn test_lookup_unknown_id() {
        assert!(provider().lookup("99").is_none());
    }

    #[test]
    fn test_from_settings() {
        let settings: DaemonSettings = serde_json::from_str(
            r#"{"admins": [{"id": "7", "username": "ops", "isAdmin": true}]}"#,
        )
        .unwrap();
        let provider = StaticIdentityProvider::from_settings(&settings);
        assert!(!provider.is_empty());
        assert!(provider.lookup("7").unwrap().is_admin);
    }
}
