use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10,15}$").expect("phone pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is required")]
    Missing,
    #[error("invalid phone number: expected 10 to 15 digits")]
    InvalidFormat,
}

/// A phone number reduced to its digits, 10 to 15 of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalizes raw user input and validates the result.
    ///
    /// `None`, empty and whitespace-only input is reported as missing; anything
    /// else that does not reduce to 10..=15 digits is an invalid format.
    pub fn parse(raw: Option<&str>) -> Result<Self, PhoneError> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(PhoneError::Missing);
        };

        let digits = strip_non_digits(raw);
        if !PHONE_PATTERN.is_match(&digits) {
            return Err(PhoneError::InvalidFormat);
        }
        Ok(Self(digits))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}
