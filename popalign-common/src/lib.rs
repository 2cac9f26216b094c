//! popalign-common - Geometry and placement value types
//!
//! Pure data structures shared by the alignment engine and its browser
//! binding. Nothing in here touches the DOM or does I/O.

mod anchor;
mod geometry;
mod offset;
mod overflow;

pub use anchor::{AnchorPoint, AnchorPoints, Axis, HAnchor, VAnchor};
pub use geometry::{Point, Rect, Region, Size};
pub use offset::{OffsetPair, OffsetValue};
pub use overflow::{Overflow, OverflowSetting};

use thiserror::Error;

/// Errors from parsing placement strings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Invalid anchor code: {0:?}")]
    InvalidAnchor(String),
    #[error("Invalid offset: {0:?}")]
    InvalidOffset(String),
}

/// Replace NaN with a fallback.
///
/// Measurements taken from computed styles can be `auto` or empty, which
/// parse to NaN. Layout math must never see those.
pub fn non_nan(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value
    }
}

/// Round half up, matching how browsers snap CSS pixel offsets.
///
/// `f64::round` rounds half away from zero, which moves `-2.5` to `-3`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_nan() {
        assert_eq!(non_nan(f64::NAN, 1.0), 1.0);
        assert_eq!(non_nan(0.0, 1.0), 0.0);
        assert_eq!(non_nan(2.5, 1.0), 2.5);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(7.0), 7.0);
    }
}
