//! Validators and parsers for user-supplied input.
//!
//! Every CLI value passes through here exactly once, at the boundary where a
//! raw string becomes a typed value. Failures are returned as values; the CLI
//! layer decides how to surface them.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// The value does not match the expected format.
    #[error("Invalid {field}: {value:?}")]
    Malformed { field: String, value: String },

    /// The value could not be parsed at all.
    #[error("Invalid {field}: can't parse {value:?}")]
    Unparsable { field: String, value: String },

    /// A numeric value exceeds its hard ceiling.
    #[error("Invalid {field}: {value} bytes is over the limit of {max} bytes")]
    TooLarge { field: String, value: u64, max: u64 },

    /// An unrecognized `--set` key.
    #[error("Unknown setting: {key}")]
    UnknownSetting { key: String },

    /// A target directory that must not exist already does.
    #[error("Directory already exists: {path}")]
    PathExists { path: String },
}

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+$").unwrap());
static ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9]+-)+[a-zA-Z0-9]+$").unwrap());
static OWNER_FOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+:\w+$").unwrap());
static LIST_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r",\s*").unwrap());

/// A single `\w+` word (usernames, folder names).
pub fn is_word(input: &str) -> bool {
    WORD.is_match(input)
}

/// A dash-separated remote identifier.
pub fn is_id(input: &str) -> bool {
    ID.is_match(input)
}

/// An `owner:folder` reference.
pub fn is_owner_folder(input: &str) -> bool {
    OWNER_FOLDER.is_match(input)
}

/// A folder reference: either a remote id or an `owner:folder` pair.
pub fn is_folder_ref(input: &str) -> bool {
    is_id(input) || is_owner_folder(input)
}

pub fn is_email(input: &str) -> bool {
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !input.chars().any(char::is_whitespace)
}

/// At least 6 characters with one lowercase letter, one uppercase letter and
/// one digit.
pub fn is_password(input: &str) -> bool {
    input.len() >= 6
        && input.chars().any(|c| c.is_ascii_lowercase())
        && input.chars().any(|c| c.is_ascii_uppercase())
        && input.chars().any(|c| c.is_ascii_digit())
}

pub fn is_glob(input: &str) -> bool {
    glob::Pattern::new(input).is_ok()
}

/// Structural `type/subtype` check for MIME patterns.
pub fn is_mime(input: &str) -> bool {
    let Some((kind, subtype)) = input.split_once('/') else {
        return false;
    };
    let token = |s: &str| {
        !s.is_empty()
            && s.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.' | '*' | '_'))
    };
    token(kind) && token(subtype)
}

pub fn parse_bool(field: &str, value: &str) -> Result<bool, ValidationError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ValidationError::Unparsable {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse a human-readable data size (`"5MB"`, `"1.5 GiB"`, bare bytes) and
/// enforce `max` when it is non-zero.
pub fn parse_data_size(field: &str, value: &str, max: u64) -> Result<u64, ValidationError> {
    let bytes = parse_bytes(value).ok_or_else(|| ValidationError::Unparsable {
        field: field.to_string(),
        value: value.to_string(),
    })?;
    if max != 0 && bytes > max {
        return Err(ValidationError::TooLarge {
            field: field.to_string(),
            value: bytes,
            max,
        });
    }
    Ok(bytes)
}

fn parse_bytes(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, suffix) = trimmed.split_at(split);
    let value: f64 = number.parse().ok()?;
    let multiplier: f64 = match suffix.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "kb" | "k" => 1e3,
        "mb" | "m" => 1e6,
        "gb" | "g" => 1e9,
        "tb" | "t" => 1e12,
        "kib" => 1024.0,
        "mib" => 1024.0 * 1024.0,
        "gib" => 1024.0 * 1024.0 * 1024.0,
        "tib" => 1024.0 * 1024.0 * 1024.0 * 1024.0,
        _ => return None,
    };
    let bytes = value * multiplier;
    if !bytes.is_finite() || bytes < 0.0 {
        return None;
    }
    Some(bytes.round() as u64)
}

/// Render a byte count the way it is accepted on input (`"5.0 MB"`).
pub fn format_data_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "kB", "MB", "GB", "TB"];
    if bytes < 1000 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Split a comma-separated list, validating each item. Empty items are
/// skipped, so `""` yields an empty list.
pub fn parse_value_list(
    field: &str,
    value: &str,
    item_valid: impl Fn(&str) -> bool,
) -> Result<Vec<String>, ValidationError> {
    let mut values = Vec::new();
    for part in LIST_SEPARATOR.split(value) {
        if part.is_empty() {
            continue;
        }
        if !item_valid(part) {
            return Err(ValidationError::Unparsable {
                field: field.to_string(),
                value: part.to_string(),
            });
        }
        values.push(part.to_string());
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_and_id_patterns() {
        assert!(is_word("alice_01"));
        assert!(!is_word("alice 01"));
        assert!(!is_word(""));
        assert!(is_id("a1b2-c3d4-e5f6"));
        assert!(!is_id("a1b2c3"));
        assert!(!is_id("-a1b2"));
    }

    #[test]
    fn folder_ref_accepts_either_form() {
        assert!(is_folder_ref("a1b2-c3d4"));
        assert!(is_folder_ref("alice:notes"));
        assert!(!is_folder_ref("alice"));
        assert!(!is_folder_ref("alice:notes:extra"));
    }

    #[test]
    fn email_is_structural() {
        assert!(is_email("user@example.com"));
        assert!(is_email("user@localhost"));
        assert!(!is_email("userexample.com"));
        assert!(!is_email("user @example.com"));
        assert!(!is_email("@example.com"));
    }

    #[test]
    fn password_requires_mixed_classes() {
        assert!(is_password("Passw0rd"));
        assert!(!is_password("P0rd"));
        assert!(!is_password("password1"));
        assert!(!is_password("PASSWORD1"));
        assert!(!is_password("Password"));
    }

    #[test]
    fn mime_patterns() {
        assert!(is_mime("text/plain"));
        assert!(is_mime("image/*"));
        assert!(!is_mime("text"));
        assert!(!is_mime("text/"));
    }

    #[test]
    fn data_sizes_parse_units() {
        assert_eq!(parse_data_size("size", "42", 0).unwrap(), 42);
        assert_eq!(parse_data_size("size", "5MB", 0).unwrap(), 5_000_000);
        assert_eq!(parse_data_size("size", "1.5 kB", 0).unwrap(), 1_500);
        assert_eq!(parse_data_size("size", "1KiB", 0).unwrap(), 1_024);
        assert!(parse_data_size("size", "many", 0).is_err());
    }

    #[test]
    fn data_size_ceiling_is_enforced() {
        let err = parse_data_size("maxFileSize", "2GB", 1_000_000_000).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn value_lists_split_and_validate() {
        let names = parse_value_list("names", "*.txt, *.md,notes/**", is_glob).unwrap();
        assert_eq!(names, vec!["*.txt", "*.md", "notes/**"]);
        assert_eq!(parse_value_list("names", "", is_glob).unwrap(), Vec::<String>::new());
        assert!(parse_value_list("types", "text/plain, nope", is_mime).is_err());
    }

    #[test]
    fn format_sizes() {
        assert_eq!(format_data_size(512), "512 B");
        assert_eq!(format_data_size(1_000_000), "1.0 MB");
        assert_eq!(format_data_size(2_000_000_000), "2.0 GB");
    }
}
