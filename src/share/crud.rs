use super::name::{is_reserved, is_valid_share_name};
use super::types::{ShareRecord, UpdateShareFields};
use crate::conf::{self, ConfDocument, ConfError, ConfSection};
use crate::settings::DaemonSettings;
use crate::system::{restart_services, CommandRunner};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ShareError {
    #[error(transparent)]
    ConfigUnreadable(ConfError),

    #[error("Invalid share name: {0:?}")]
    InvalidName(String),

    #[error("Share name {0:?} is reserved")]
    ReservedName(String),

    #[error("Share {0} already exists")]
    DuplicateShare(String),

    #[error("Share {0} not found")]
    ShareNotFound(String),

    #[error("Share {name} has invalid value {value:?} for {key:?}")]
    InvalidSection {
        name: String,
        key: String,
        value: String,
    },

    #[error("Failed to persist configuration: {0}")]
    PersistFailure(String),
}

/// List every share section in the configuration file, excluding reserved
/// sections. Missing fields get the documented defaults. A section with an
/// unparseable boolean is skipped in lenient mode and fails the listing in
/// strict mode.
pub async fn list_shares(settings: &DaemonSettings) -> Result<Vec<ShareRecord>, ShareError> {
    let doc = read_conf(settings).await?;

    let mut shares = Vec::new();
    for section in &doc.sections {
        if is_reserved(&section.name) {
            continue;
        }
        match share_from_section(section) {
            Ok(record) => shares.push(record),
            Err(e) if settings.strict_shares => return Err(e),
            Err(e) => warn!("skipping malformed share section: {e}"),
        }
    }

    Ok(shares)
}

/// Look up a single share by section name.
pub async fn get_share(settings: &DaemonSettings, name: &str) -> Result<ShareRecord, ShareError> {
    let doc = read_conf(settings).await?;
    let section = find_share_section(&doc, name)?;
    share_from_section(section)
}

/// Add a new share section and persist. The name is validated before the
/// file is touched; writing rewrites the whole file and restarts the
/// serving daemons.
pub async fn add_share(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    record: ShareRecord,
) -> Result<ShareRecord, ShareError> {
    if !is_valid_share_name(&record.name) {
        return Err(ShareError::InvalidName(record.name));
    }
    if is_reserved(&record.name) {
        return Err(ShareError::ReservedName(record.name));
    }

    let mut doc = read_conf(settings).await?;
    if doc.has_section(&record.name) {
        return Err(ShareError::DuplicateShare(record.name));
    }

    doc.push_section(section_from_record(&record));
    persist(settings, runner, &doc).await?;

    info!("added share {}", record.name);
    Ok(record)
}

/// Overwrite the provided fields of an existing share and persist. Fields
/// left `None` keep whatever the file currently holds.
pub async fn edit_share(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    name: &str,
    fields: UpdateShareFields,
) -> Result<ShareRecord, ShareError> {
    let mut doc = read_conf(settings).await?;
    if is_reserved(name) {
        return Err(ShareError::ShareNotFound(name.to_string()));
    }
    let section = doc
        .section_mut(name)
        .ok_or_else(|| ShareError::ShareNotFound(name.to_string()))?;

    if let Some(path) = &fields.path {
        section.set("path", path.clone());
    }
    if let Some(comment) = &fields.comment {
        section.set("comment", comment.clone());
    }
    if let Some(browseable) = fields.browseable {
        section.set("browseable", conf::bool_token(browseable));
    }
    if let Some(read_only) = fields.read_only {
        section.set("read only", conf::bool_token(read_only));
    }
    if let Some(guest_ok) = fields.guest_ok {
        section.set("guest ok", conf::bool_token(guest_ok));
    }

    let updated = share_from_section(section)?;
    persist(settings, runner, &doc).await?;

    info!("updated share {name}");
    Ok(updated)
}

/// Remove a share section and persist.
pub async fn delete_share(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    name: &str,
) -> Result<(), ShareError> {
    let mut doc = read_conf(settings).await?;
    find_share_section(&doc, name)?;

    doc.remove_section(name);
    persist(settings, runner, &doc).await?;

    info!("deleted share {name}");
    Ok(())
}

async fn read_conf(settings: &DaemonSettings) -> Result<ConfDocument, ShareError> {
    conf::read_document(&settings.conf_path)
        .await
        .map_err(ShareError::ConfigUnreadable)
}

/// Rewrite the configuration file and restart the serving daemons. The
/// restart runs after the write; if it fails the file stays updated and
/// the error is surfaced without rollback.
async fn persist(
    settings: &DaemonSettings,
    runner: &dyn CommandRunner,
    doc: &ConfDocument,
) -> Result<(), ShareError> {
    conf::write_document(&settings.conf_path, doc)
        .await
        .map_err(|e| ShareError::PersistFailure(e.to_string()))?;

    restart_services(runner, settings)
        .await
        .map_err(|e| ShareError::PersistFailure(e.to_string()))
}

/// Resolve a section that is an actual share. Reserved sections are not
/// shares, so they resolve to `ShareNotFound` like any absent name.
fn find_share_section<'a>(
    doc: &'a ConfDocument,
    name: &str,
) -> Result<&'a ConfSection, ShareError> {
    if is_reserved(name) {
        return Err(ShareError::ShareNotFound(name.to_string()));
    }
    doc.section(name)
        .ok_or_else(|| ShareError::ShareNotFound(name.to_string()))
}

fn share_from_section(section: &ConfSection) -> Result<ShareRecord, ShareError> {
    let mut record = ShareRecord::new(section.name.clone());

    if let Some(path) = section.get("path") {
        record.path = path.to_string();
    }
    if let Some(comment) = section.get("comment") {
        record.comment = comment.to_string();
    }
    record.browseable = bool_field(section, "browseable", record.browseable)?;
    record.read_only = bool_field(section, "read only", record.read_only)?;
    record.guest_ok = bool_field(section, "guest ok", record.guest_ok)?;

    Ok(record)
}

fn bool_field(section: &ConfSection, key: &str, default: bool) -> Result<bool, ShareError> {
    match section.get(key) {
        None => Ok(default),
        Some(value) => conf::parse_bool(value).ok_or_else(|| ShareError::InvalidSection {
            name: section.name.clone(),
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

fn section_from_record(record: &ShareRecord) -> ConfSection {
    let mut section = ConfSection::new(record.name.clone());
    section.set("path", record.path.clone());
    section.set("comment", record.comment.clone());
    section.set("browseable", conf::bool_token(record.browseable));
    section.set("read only", conf::bool_token(record.read_only));
    section.set("guest ok", conf::bool_token(record.guest_ok));
    section
}
