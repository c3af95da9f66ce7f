use smbadmin_daemon::settings::DaemonSettings;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary directory for test files
pub fn create_test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// A smb.conf with a global section and two shares.
pub const SEED_CONF: &str = "\
[global]
workgroup = WORKGROUP
server string = test server

[docs]
path = /srv/docs
comment = documentation
read only = no

[media]
path = /srv/media
guest ok = yes
browseable = no
";

/// Write `content` as the share configuration file inside `dir` and return
/// settings pointing at it.
pub fn settings_with_conf(dir: &Path, content: &str) -> DaemonSettings {
    let conf_path = dir.join("smb.conf");
    std::fs::write(&conf_path, content).expect("Failed to write test conf");
    DaemonSettings {
        conf_path,
        ..DaemonSettings::default()
    }
}

/// Settings pointing at a conf path that does not exist.
pub fn settings_without_conf(dir: &Path) -> DaemonSettings {
    DaemonSettings {
        conf_path: dir.join("missing-smb.conf"),
        ..DaemonSettings::default()
    }
}
