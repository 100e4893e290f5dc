//! Human size units used by the report protocol.
//!
//! Sizes are rendered as `<value> <unit>` with exactly two decimals, dividing
//! by 1024 while the value is at least 1024 and stopping at `TiB`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

/// Binary unit tiers. The tokens are part of the report protocol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum SizeUnit {
    B,
    KiB,
    MiB,
    GiB,
    TiB,
}

impl SizeUnit {
    /// Exponent of 1024 for this unit.
    pub fn tier(self) -> u32 {
        match self {
            Self::B => 0,
            Self::KiB => 1,
            Self::MiB => 2,
            Self::GiB => 3,
            Self::TiB => 4,
        }
    }

    /// Number of bytes in one of this unit.
    pub fn multiplier(self) -> u64 {
        1024u64.pow(self.tier())
    }

    fn next(self) -> Option<Self> {
        match self {
            Self::B => Some(Self::KiB),
            Self::KiB => Some(Self::MiB),
            Self::MiB => Some(Self::GiB),
            Self::GiB => Some(Self::TiB),
            Self::TiB => None,
        }
    }
}

/// A size expressed as a value and a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HumanSize {
    value: f64,
    unit: SizeUnit,
}

/// Failure to read a `<value> <unit>` pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeParseError {
    #[error("expected '<value> <unit>', got {0:?}")]
    Shape(String),
    #[error("invalid size value {0:?}")]
    Value(String),
    #[error("unknown size unit {0:?}")]
    Unit(String),
}

impl HumanSize {
    /// Pick the largest unit that keeps the value below 1024 (capped at TiB).
    pub fn from_bytes(bytes: u64) -> Self {
        let mut value = bytes as f64;
        let mut unit = SizeUnit::B;
        while value >= 1024.0 {
            match unit.next() {
                Some(next) => {
                    value /= 1024.0;
                    unit = next;
                }
                None => break,
            }
        }
        Self { value, unit }
    }

    /// Build from an already separated value and unit token.
    pub fn from_parts(value: &str, unit: &str) -> Result<Self, SizeParseError> {
        let value: f64 = value
            .parse()
            .map_err(|_| SizeParseError::Value(value.to_string()))?;
        if !value.is_finite() || value < 0.0 {
            return Err(SizeParseError::Value(value.to_string()));
        }
        let unit =
            SizeUnit::from_str(unit).map_err(|_| SizeParseError::Unit(unit.to_string()))?;
        Ok(Self { value, unit })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> SizeUnit {
        self.unit
    }

    /// Byte count this size stands for, rounded to the nearest byte.
    pub fn to_bytes(&self) -> u64 {
        (self.value * self.unit.multiplier() as f64).round() as u64
    }
}

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

impl FromStr for HumanSize {
    type Err = SizeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (value, unit) = s
            .split_once(' ')
            .ok_or_else(|| SizeParseError::Shape(s.to_string()))?;
        Self::from_parts(value, unit.trim())
    }
}
