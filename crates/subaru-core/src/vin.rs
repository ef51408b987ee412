//! VIN type uniquely identifying a vehicle within a config entry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for invalid VINs
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VinError {
    #[error("VIN must be exactly 17 characters, got {0}")]
    InvalidLength(usize),

    #[error("VIN contains invalid character '{0}' (letters I, O and Q are never used)")]
    InvalidChar(char),
}

/// A validated Vehicle Identification Number
///
/// VINs are 17 characters of uppercase letters and digits; the letters
/// I, O and Q are excluded by the standard. Lowercase input is accepted
/// and normalized to uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Create a new Vin, validating length and character set
    pub fn new(vin: impl Into<String>) -> Result<Self, VinError> {
        let vin: String = vin.into().to_ascii_uppercase();

        if vin.len() != 17 {
            return Err(VinError::InvalidLength(vin.len()));
        }
        if let Some(c) = vin.chars().find(|c| !Self::is_valid_char(*c)) {
            return Err(VinError::InvalidChar(c));
        }

        Ok(Self(vin))
    }

    /// Get the VIN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_valid_char(c: char) -> bool {
        matches!(c, 'A'..='H' | 'J'..='N' | 'P' | 'R'..='Z' | '0'..='9')
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Vin {
    type Err = VinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Vin {
    type Error = VinError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Vin> for String {
    fn from(vin: Vin) -> Self {
        vin.0
    }
}
