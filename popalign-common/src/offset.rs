use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParseError, Size};

/// A nudge along one axis: plain pixels or a percentage of a rectangle's size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOffset", into = "RawOffset")]
pub enum OffsetValue {
    Px(f64),
    /// Percent of the owning rectangle's size on the same axis
    Percent(f64),
}

impl Default for OffsetValue {
    fn default() -> Self {
        Self::Px(0.0)
    }
}

impl OffsetValue {
    /// Resolve to pixels against the size of the rectangle on this axis
    pub fn resolve(&self, size: f64) -> f64 {
        match *self {
            Self::Px(px) => px,
            Self::Percent(pct) => size * (pct / 100.0),
        }
    }
}

impl FromStr for OffsetValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || ParseError::InvalidOffset(s.to_string());
        if let Some(pct) = trimmed.strip_suffix('%') {
            let value: f64 = pct.trim().parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            return Ok(Self::Percent(value));
        }
        let px = trimmed.strip_suffix("px").unwrap_or(trimmed);
        let value: f64 = px.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(Self::Px(value))
    }
}

impl fmt::Display for OffsetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Wire form: either a bare number of pixels or a string like `"50%"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawOffset {
    Number(f64),
    Text(String),
}

impl TryFrom<RawOffset> for OffsetValue {
    type Error = ParseError;

    fn try_from(value: RawOffset) -> Result<Self, Self::Error> {
        match value {
            RawOffset::Number(px) => Ok(Self::Px(px)),
            RawOffset::Text(text) => text.parse(),
        }
    }
}

impl From<OffsetValue> for RawOffset {
    fn from(value: OffsetValue) -> Self {
        match value {
            OffsetValue::Px(px) => RawOffset::Number(px),
            OffsetValue::Percent(_) => RawOffset::Text(value.to_string()),
        }
    }
}

/// `[dx, dy]` offset pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[OffsetValue; 2]", into = "[OffsetValue; 2]")]
pub struct OffsetPair {
    pub x: OffsetValue,
    pub y: OffsetValue,
}

impl OffsetPair {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            x: OffsetValue::Px(x),
            y: OffsetValue::Px(y),
        }
    }

    /// Resolve both axes against a rectangle's size
    pub fn resolve(&self, size: Size) -> (f64, f64) {
        (self.x.resolve(size.width), self.y.resolve(size.height))
    }
}

impl From<[OffsetValue; 2]> for OffsetPair {
    fn from([x, y]: [OffsetValue; 2]) -> Self {
        Self { x, y }
    }
}

impl From<OffsetPair> for [OffsetValue; 2] {
    fn from(value: OffsetPair) -> Self {
        [value.x, value.y]
    }
}
