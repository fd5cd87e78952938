//! Domain write models for store, employee, and customer records.
//!
//! # Responsibility
//! - Define the canonical payload shapes accepted by the services.
//! - Own field-level validation applied before any persistence write.
//!
//! # Invariants
//! - `id == None` marks a record as new; ids are assigned by storage.
//! - Validation reports the first offending field and never mutates the
//!   payload.

pub mod customer;
pub mod employee;
pub mod store;

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+0-9().\- ]+$").expect("valid phone regex"));
static ZIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}$").expect("valid zip regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

const PHONE_MIN_DIGITS: usize = 7;

/// Field-level validation failure raised before any persistence write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is missing or blank after trimming.
    BlankField(&'static str),
    /// Field is present but does not match the expected shape.
    InvalidFormat {
        field: &'static str,
        expected: &'static str,
    },
}

impl ValidationError {
    /// Returns the name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::BlankField(field) => field,
            Self::InvalidFormat { field, .. } => field,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::InvalidFormat { field, expected } => {
                write!(f, "field `{field}` must be {expected}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_non_blank(field, value)?;
    check_phone_shape(field, value)
}

/// Phone fields that may stay empty are still shape-checked when present.
pub(crate) fn optional_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    check_phone_shape(field, value)
}

pub(crate) fn optional_zip(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || ZIP_RE.is_match(trimmed) {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field,
        expected: "a 5-digit zip code",
    })
}

pub(crate) fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    require_non_blank(field, value)?;
    if EMAIL_RE.is_match(value.trim()) {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field,
        expected: "an email address",
    })
}

fn check_phone_shape(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let digits = trimmed.chars().filter(char::is_ascii_digit).count();
    if PHONE_RE.is_match(trimmed) && digits >= PHONE_MIN_DIGITS {
        return Ok(());
    }
    Err(ValidationError::InvalidFormat {
        field,
        expected: "a phone number with at least 7 digits",
    })
}

#[cfg(test)]
mod tests {
    use super::{optional_phone, optional_zip, require_email, require_phone, ValidationError};

    #[test]
    fn phone_accepts_common_formats() {
        require_phone("phone", "(541) 555-0100").unwrap();
        require_phone("phone", "+1 541.555.0100").unwrap();
        require_phone("phone", "555-0100 x12").unwrap_err();
    }

    #[test]
    fn blank_phone_names_field() {
        let err = require_phone("store_phone", "   ").unwrap_err();
        assert_eq!(err, ValidationError::BlankField("store_phone"));
    }

    #[test]
    fn optional_phone_allows_blank_but_not_garbage() {
        optional_phone("phone", "").unwrap();
        optional_phone("phone", "call me").unwrap_err();
    }

    #[test]
    fn zip_must_be_five_digits_when_present() {
        optional_zip("store_zip", "").unwrap();
        optional_zip("store_zip", "97405").unwrap();
        let err = optional_zip("store_zip", "9740").unwrap_err();
        assert_eq!(err.field(), "store_zip");
    }

    #[test]
    fn email_requires_host_and_tld() {
        require_email("email", "fern@example.com").unwrap();
        require_email("email", "fern@example").unwrap_err();
        require_email("email", "not an email").unwrap_err();
    }
}
