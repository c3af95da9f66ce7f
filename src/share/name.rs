//! Share name validation.
//!
//! A share name doubles as a configuration section header, so it must not
//! contain the section delimiter characters or line breaks. A handful of
//! section names carry built-in meaning to the file server and are never
//! treated as shares.

use once_cell::sync::Lazy;
use regex::Regex;

/// Section names with built-in meaning, excluded from share listings and
/// rejected as share names.
pub const RESERVED_SECTIONS: [&str; 4] = ["global", "homes", "printers", "print$"];

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\[\]\r\n]+$").expect("share name regex is valid")
});

/// Check whether a section name is reserved.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_SECTIONS.contains(&name)
}

/// Check whether a string is usable as a share name (and therefore as a
/// section header).
pub fn is_valid_share_name(name: &str) -> bool {
    !name.trim().is_empty() && NAME_RE.is_match(name)
}
