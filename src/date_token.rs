use serde::Serialize;
use std::fmt;

/// Date key used to address one archive file.
///
/// The archive names its files by trading day in `DDMMYYYY` order
/// (e.g. `fao_participant_oi_05012024.csv`). Only the shape is checked:
/// eight ASCII digits. Calendar validity is left to the upstream host,
/// which simply has no file for a day that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DateToken(String);

impl DateToken {
    /// Number of characters in a well-formed token.
    pub const LEN: usize = 8;

    /// Parses a raw query value into a date token.
    ///
    /// # Errors
    /// Returns `DateTokenError::Empty` for an empty string,
    /// `DateTokenError::WrongLength` when the value is not exactly eight
    /// characters, and `DateTokenError::NonDigit` when any character is not
    /// an ASCII digit.
    pub fn parse(raw: impl Into<String>) -> Result<Self, DateTokenError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(DateTokenError::Empty);
        }
        if raw.chars().count() != Self::LEN {
            return Err(DateTokenError::WrongLength(raw.chars().count()));
        }
        if !raw.chars().all(|c| c.is_ascii_digit()) {
            return Err(DateTokenError::NonDigit);
        }
        Ok(DateToken(raw))
    }

    /// Wraps a raw value without any shape check.
    ///
    /// Used by the minimal fetch mode, which passes the query value through
    /// as-is.
    pub fn unchecked(raw: impl Into<String>) -> Self {
        DateToken(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors produced when a raw value is not a well-formed date token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTokenError {
    /// No value supplied
    Empty,
    /// Value has the wrong number of characters
    WrongLength(usize),
    /// Value contains a character that is not an ASCII digit
    NonDigit,
}

impl fmt::Display for DateTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTokenError::Empty => write!(f, "date token is empty"),
            DateTokenError::WrongLength(len) => {
                write!(f, "date token must be 8 characters, got {}", len)
            }
            DateTokenError::NonDigit => write!(f, "date token must contain only digits"),
        }
    }
}

impl std::error::Error for DateTokenError {}
