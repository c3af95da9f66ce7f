use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

fn default_conf_path() -> PathBuf {
    PathBuf::from("/etc/samba/smb.conf")
}

fn default_services() -> Vec<String> {
    vec!["smbd".to_string(), "nmbd".to_string()]
}

fn default_systemctl_bin() -> String {
    "systemctl".to_string()
}

fn default_pdbedit_bin() -> String {
    "pdbedit".to_string()
}

fn default_smbpasswd_bin() -> String {
    "smbpasswd".to_string()
}

/// An identity entry the daemon can resolve actors against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminEntry {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Daemon settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaemonSettings {
    /// Path to the Samba share configuration file.
    #[serde(default = "default_conf_path")]
    pub conf_path: PathBuf,

    /// Services restarted after every successful configuration write.
    #[serde(default = "default_services")]
    pub services: Vec<String>,

    #[serde(default = "default_systemctl_bin")]
    pub systemctl_bin: String,

    #[serde(default = "default_pdbedit_bin")]
    pub pdbedit_bin: String,

    #[serde(default = "default_smbpasswd_bin")]
    pub smbpasswd_bin: String,

    /// When true, a share section with an unparseable boolean value fails
    /// the listing. When false (default) the section is skipped and the
    /// listing continues.
    #[serde(default)]
    pub strict_shares: bool,

    /// Known actors, keyed by id in [`admin_index`](Self::admin_index).
    /// Empty means the daemon performs no privilege gating of its own.
    #[serde(default)]
    pub admins: Vec<AdminEntry>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            conf_path: default_conf_path(),
            services: default_services(),
            systemctl_bin: default_systemctl_bin(),
            pdbedit_bin: default_pdbedit_bin(),
            smbpasswd_bin: default_smbpasswd_bin(),
            strict_shares: false,
            admins: Vec::new(),
        }
    }
}

impl DaemonSettings {
    pub fn admin_index(&self) -> HashMap<String, AdminEntry> {
        self.admins
            .iter()
            .map(|a| (a.id.clone(), a.clone()))
            .collect()
    }
}

/// Read the settings file. A missing file yields `None` so the caller can
/// fall back to defaults.
pub async fn read_settings(path: &Path) -> Result<Option<DaemonSettings>, SettingsError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).await?;
    let settings: DaemonSettings = serde_json::from_str(&content)?;
    Ok(Some(settings))
}

/// Write the settings file.
pub async fn write_settings(path: &Path, settings: &DaemonSettings) -> Result<(), SettingsError> {
    let content = serde_json::to_string_pretty(settings)?;
    fs::write(path, content).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = DaemonSettings::default();
        assert_eq!(settings.conf_path, PathBuf::from("/etc/samba/smb.conf"));
        assert_eq!(settings.services, vec!["smbd", "nmbd"]);
        assert!(!settings.strict_shares);
        assert!(settings.admins.is_empty());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: DaemonSettings =
            serde_json::from_str(r#"{"confPath": "/tmp/smb.conf"}"#).unwrap();
        assert_eq!(settings.conf_path, PathBuf::from("/tmp/smb.conf"));
        assert_eq!(settings.smbpasswd_bin, "smbpasswd");
        assert!(!settings.strict_shares);
    }

    #[tokio::test]
    async fn test_read_write_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        assert!(read_settings(&path).await.unwrap().is_none());

        let mut settings = DaemonSettings::default();
        settings.conf_path = PathBuf::from("/tmp/smb.conf");
        settings.strict_shares = true;
        write_settings(&path, &settings).await.unwrap();

        let loaded = read_settings(&path).await.unwrap().unwrap();
        assert_eq!(loaded.conf_path, settings.conf_path);
        assert!(loaded.strict_shares);
    }

    #[test]
    fn test_admin_index() {
        let settings: DaemonSettings = serde_json::from_str(
            r#"{"admins": [{"id": "1", "username": "root", "isAdmin": true}]}"#,
        )
        .unwrap();
        let index = settings.admin_index();
        assert!(index.get("1").map(|a| a.is_admin).unwrap_or(false));
        assert!(index.get("2").is_none());
    }
}
