//! Turning an [`AlignResult`] into CSS positions for the popup and its arrow.

use std::fmt;

use popalign_common::{HAnchor, VAnchor};

use crate::align::AlignResult;

/// A CSS inset value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Auto,
    Px(f64),
    /// Percent of the viewport width (`vw`)
    Vw(f64),
    /// Percent of the viewport height (`vh`)
    Vh(f64),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Px(px) => write!(f, "{px}px"),
            Self::Vw(vw) => write!(f, "{vw}vw"),
            Self::Vh(vh) => write!(f, "{vh}vh"),
        }
    }
}

/// Where the arrow element sits inside the popup.
///
/// Unset sides are left to the stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArrowPosition {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

impl ArrowPosition {
    /// Arrow position for a result, `None` when the placement doesn't want
    /// an automatic arrow.
    ///
    /// On an axis where the popup sits beside the target (popup and target
    /// share the anchor, or the popup anchor is centred) the arrow follows the
    /// overlap midpoint. Otherwise it hugs the popup edge facing the target.
    pub fn from_result(result: &AlignResult) -> Option<Self> {
        if !result.align.auto_arrow {
            return None;
        }
        let points = result.align.points;
        let mut position = Self::default();

        let popup_v = points.popup.vertical;
        if popup_v == points.target.vertical || popup_v == VAnchor::Center {
            position.top = Some(result.arrow_y);
        } else if popup_v == VAnchor::Top {
            position.top = Some(0.0);
        } else {
            position.bottom = Some(0.0);
        }

        let popup_h = points.popup.horizontal;
        if popup_h == points.target.horizontal || popup_h == HAnchor::Center {
            position.left = Some(result.arrow_x);
        } else if popup_h == HAnchor::Left {
            position.left = Some(0.0);
        } else {
            position.right = Some(0.0);
        }

        Some(position)
    }

    pub fn to_style(&self) -> String {
        let sides = [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ];
        sides
            .iter()
            .filter_map(|(side, value)| value.map(|px| format!("{side}: {px}px;")))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `left`/`top`/`right`/`bottom` for the popup element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupInset {
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
}

impl PopupInset {
    /// Off screen, where an open popup waits for its first alignment
    pub const PARKED: Self = Self {
        left: Length::Vw(-1000.0),
        top: Length::Vh(-1000.0),
        right: Length::Auto,
        bottom: Length::Auto,
    };

    pub fn from_result(result: &AlignResult, open: bool) -> Self {
        if open && !result.ready {
            return Self::PARKED;
        }

        let align = &result.align;
        let from_right = align.dynamic_inset && align.points.popup.horizontal == HAnchor::Right;
        let from_bottom = align.dynamic_inset && align.points.popup.vertical == VAnchor::Bottom;

        let (left, right) = if from_right {
            (Length::Auto, Length::Px(result.offset_r))
        } else {
            (Length::Px(result.offset_x), Length::Auto)
        };
        let (top, bottom) = if from_bottom {
            (Length::Auto, Length::Px(result.offset_b))
        } else {
            (Length::Px(result.offset_y), Length::Auto)
        };

        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn to_style(&self) -> String {
        format!(
            "left: {}; top: {}; right: {}; bottom: {};",
            self.left, self.top, self.right, self.bottom
        )
    }
}
