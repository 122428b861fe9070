//! The four-digit share code.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AppError;

/// Number of distinct share codes (`0000` through `9999`).
pub const SHARE_ID_SPACE: u16 = 10_000;

/// A share code: exactly four decimal digits, leading zeros significant.
///
/// Serialized as its four-character string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareId(u16);

impl ShareId {
    /// Build a code from its numeric value, if it is in range.
    pub fn new(value: u16) -> Option<Self> {
        (value < SHARE_ID_SPACE).then_some(Self(value))
    }

    /// Draw a uniformly random code.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.random_range(0..SHARE_ID_SPACE))
    }

    /// The code that follows this one, wrapping from `9999` to `0000`.
    pub fn next(self) -> Self {
        Self((self.0 + 1) % SHARE_ID_SPACE)
    }

    /// Numeric value of the code.
    pub fn value(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for ShareId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::validation(format!(
                "Invalid share code '{s}': expected exactly 4 digits"
            )));
        }
        let value: u16 = s
            .parse()
            .map_err(|_| AppError::validation(format!("Invalid share code '{s}'")))?;
        Ok(Self(value))
    }
}

impl Serialize for ShareId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ShareId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
