mod types;

pub use types::{ConfDocument, ConfSection};

use std::path::Path;
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum ConfError {
    #[error("Configuration file {path} is unreadable: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to write configuration file {path}: {source}")]
    WriteFailed {
        path: String,
        source: std::io::Error,
    },
}

/// Parse section-based key/value text into a document.
///
/// The grammar is deliberately lenient: `#` and `;` start comments, a line
/// that is neither a `[section]` header nor a `key = value` pair is
/// ignored, keys are lowercased, a duplicate key within a section
/// overrides the earlier value, and a duplicate section header merges into
/// the existing section.
pub fn parse(text: &str) -> ConfDocument {
    let mut doc = ConfDocument::default();
    let mut current: Option<usize> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            let name = line[1..line.len() - 1].trim().to_string();
            if name.is_empty() {
                continue;
            }
            current = match doc.sections.iter().position(|s| s.name == name) {
                Some(idx) => Some(idx),
                None => {
                    doc.push_section(ConfSection::new(name));
                    Some(doc.sections.len() - 1)
                }
            };
            continue;
        }

        // Entries before any section header have nowhere to go.
        let Some(idx) = current else { continue };

        if let Some((key, value)) = split_entry(line) {
            doc.sections[idx].set(key, value);
        }
    }

    doc
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

/// Render the document back to text, the full-file rewrite form.
pub fn render(doc: &ConfDocument) -> String {
    let mut out = String::new();
    for section in &doc.sections {
        out.push('[');
        out.push_str(&section.name);
        out.push_str("]\n");
        for (key, value) in &section.entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

/// Read and parse the configuration file at `path`.
pub async fn read_document(path: &Path) -> Result<ConfDocument, ConfError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| ConfError::Unreadable {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parse(&content))
}

/// Rewrite the whole configuration file from `doc`.
pub async fn write_document(path: &Path, doc: &ConfDocument) -> Result<(), ConfError> {
    fs::write(path, render(doc))
        .await
        .map_err(|source| ConfError::WriteFailed {
            path: path.display().to_string(),
            source,
        })
}

/// Interpret a boolean config token. Accepts the usual truthy/falsy
/// spellings case-insensitively; anything else is `None`.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Some(true),
        "no" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// The on-disk spelling of a boolean value.
pub fn bool_token(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
