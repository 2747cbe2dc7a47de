//! Lengths expressed in pixels, virtual pixels or percentages.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Unit attached to a [`Dimension`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DimensionUnit {
    Px,
    #[default]
    Vp,
    /// Fraction of a reference length, `0.5` meaning half.
    Percent,
}

/// A length with a unit. Virtual pixels scale with the surface density.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Dimension {
    value: f32,
    unit: DimensionUnit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DimensionParseError {
    #[error("empty dimension")]
    Empty,

    #[error("invalid number in dimension {0:?}")]
    InvalidNumber(String),

    #[error("unknown unit in dimension {0:?}")]
    UnknownUnit(String),
}

impl Dimension {
    pub const fn px(value: f32) -> Self {
        Self {
            value,
            unit: DimensionUnit::Px,
        }
    }

    pub const fn vp(value: f32) -> Self {
        Self {
            value,
            unit: DimensionUnit::Vp,
        }
    }

    /// `fraction` of the reference length (`0.4` is 40%).
    pub const fn percent(fraction: f32) -> Self {
        Self {
            value: fraction,
            unit: DimensionUnit::Percent,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn unit(&self) -> DimensionUnit {
        self.unit
    }

    pub fn is_percent(&self) -> bool {
        self.unit == DimensionUnit::Percent
    }

    /// Convert to pixels. Percentages have no reference here and resolve to 0.
    pub fn to_px(&self, density: f32) -> f32 {
        match self.unit {
            DimensionUnit::Px => self.value,
            DimensionUnit::Vp => self.value * density,
            DimensionUnit::Percent => 0.0,
        }
    }

    /// Convert to pixels, resolving percentages against `reference`.
    pub fn to_px_with_size(&self, reference: f32, density: f32) -> f32 {
        match self.unit {
            DimensionUnit::Percent => self.value * reference,
            _ => self.to_px(density),
        }
    }
}

impl FromStr for Dimension {
    type Err = DimensionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DimensionParseError::Empty);
        }
        let split = s
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
            .unwrap_or(s.len());
        let (number, unit) = s.split_at(split);
        let value: f32 = number
            .parse()
            .map_err(|_| DimensionParseError::InvalidNumber(s.to_string()))?;
        match unit.trim() {
            "" | "vp" => Ok(Dimension::vp(value)),
            "px" => Ok(Dimension::px(value)),
            "%" => Ok(Dimension::percent(value / 100.0)),
            _ => Err(DimensionParseError::UnknownUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for Dimension {
    type Error = DimensionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            DimensionUnit::Px => write!(f, "{}px", self.value),
            DimensionUnit::Vp => write!(f, "{}vp", self.value),
            DimensionUnit::Percent => write!(f, "{}%", self.value * 100.0),
        }
    }
}
