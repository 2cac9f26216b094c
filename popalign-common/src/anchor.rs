use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ParseError, Point, Rect};

/// Vertical part of an anchor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VAnchor {
    Top,
    Bottom,
    Center,
}

/// Horizontal part of an anchor code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HAnchor {
    Left,
    Right,
    Center,
}

/// Which axis a flip or shift acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl VAnchor {
    fn code(self) -> char {
        match self {
            Self::Top => 't',
            Self::Bottom => 'b',
            Self::Center => 'c',
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Center => Self::Center,
        }
    }
}

impl HAnchor {
    fn code(self) -> char {
        match self {
            Self::Left => 'l',
            Self::Right => 'r',
            Self::Center => 'c',
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Center => Self::Center,
        }
    }
}

/// A two-character anchor code such as `"bc"` (bottom center).
///
/// The first character picks the vertical edge (`t`, `b`, `c`), the second
/// the horizontal edge (`l`, `r`, `c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AnchorPoint {
    pub vertical: VAnchor,
    pub horizontal: HAnchor,
}

impl AnchorPoint {
    pub const TOP_LEFT: Self = Self::new(VAnchor::Top, HAnchor::Left);
    pub const BOTTOM_LEFT: Self = Self::new(VAnchor::Bottom, HAnchor::Left);
    pub const BOTTOM_RIGHT: Self = Self::new(VAnchor::Bottom, HAnchor::Right);

    pub const fn new(vertical: VAnchor, horizontal: HAnchor) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    /// Pixel position of this anchor on `rect`
    pub fn on(&self, rect: &Rect) -> Point {
        let y = match self.vertical {
            VAnchor::Top => rect.top(),
            VAnchor::Bottom => rect.bottom(),
            VAnchor::Center => rect.y + rect.height / 2.0,
        };
        let x = match self.horizontal {
            HAnchor::Left => rect.left(),
            HAnchor::Right => rect.right(),
            HAnchor::Center => rect.x + rect.width / 2.0,
        };
        Point::new(x, y)
    }

    /// Mirror the anchor on one axis (`t`<->`b` or `l`<->`r`)
    pub fn reversed(&self, axis: Axis) -> Self {
        match axis {
            Axis::Vertical => Self::new(self.vertical.reversed(), self.horizontal),
            Axis::Horizontal => Self::new(self.vertical, self.horizontal.reversed()),
        }
    }
}

impl FromStr for AnchorPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidAnchor(s.to_string());
        let mut chars = s.chars();
        let (Some(v), Some(h), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let vertical = match v {
            't' => VAnchor::Top,
            'b' => VAnchor::Bottom,
            'c' => VAnchor::Center,
            _ => return Err(invalid()),
        };
        let horizontal = match h {
            'l' => HAnchor::Left,
            'r' => HAnchor::Right,
            'c' => HAnchor::Center,
            _ => return Err(invalid()),
        };
        Ok(Self::new(vertical, horizontal))
    }
}

impl TryFrom<String> for AnchorPoint {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AnchorPoint> for String {
    fn from(value: AnchorPoint) -> Self {
        value.to_string()
    }
}

impl fmt::Display for AnchorPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.vertical.code(), self.horizontal.code())
    }
}

/// `[popupAnchor, targetAnchor]`: the popup's anchor is placed on the target's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[AnchorPoint; 2]", into = "[AnchorPoint; 2]")]
pub struct AnchorPoints {
    pub popup: AnchorPoint,
    pub target: AnchorPoint,
}

impl AnchorPoints {
    pub const fn new(popup: AnchorPoint, target: AnchorPoint) -> Self {
        Self { popup, target }
    }

    /// Parse a `["bc", "tc"]` style pair
    pub fn parse(popup: &str, target: &str) -> Result<Self, ParseError> {
        Ok(Self::new(popup.parse()?, target.parse()?))
    }

    /// Mirror both anchors on one axis
    pub fn reversed(&self, axis: Axis) -> Self {
        Self::new(self.popup.reversed(axis), self.target.reversed(axis))
    }
}

impl From<[AnchorPoint; 2]> for AnchorPoints {
    fn from([popup, target]: [AnchorPoint; 2]) -> Self {
        Self::new(popup, target)
    }
}

impl From<AnchorPoints> for [AnchorPoint; 2] {
    fn from(value: AnchorPoints) -> Self {
        [value.popup, value.target]
    }
}

impl fmt::Display for AnchorPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.popup, self.target)
    }
}
