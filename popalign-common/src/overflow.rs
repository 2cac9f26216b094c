use serde::{Deserialize, Serialize};

/// Either a plain on/off switch or a pixel threshold.
///
/// Configuration written by hand tends to use `true`/`1` interchangeably,
/// so both spellings are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverflowSetting {
    Flag(bool),
    Amount(f64),
}

impl OverflowSetting {
    /// Whether flipping to the opposite side is permitted
    pub fn allows_flip(&self) -> bool {
        match *self {
            Self::Flag(flag) => flag,
            Self::Amount(amount) => amount >= 0.0,
        }
    }

    /// How far (px) the target may end up outside the visible region
    /// before shifting stops. `None` disables shifting.
    pub fn shift_allowance(&self) -> Option<f64> {
        match *self {
            Self::Flag(true) => Some(0.0),
            Self::Flag(false) => None,
            Self::Amount(amount) => Some(amount),
        }
    }
}

/// Collision policy per axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overflow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_x: Option<OverflowSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjust_y: Option<OverflowSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_x: Option<OverflowSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shift_y: Option<OverflowSetting>,
}

impl Overflow {
    pub fn flip_x(&self) -> bool {
        self.adjust_x.is_some_and(|s| s.allows_flip())
    }

    pub fn flip_y(&self) -> bool {
        self.adjust_y.is_some_and(|s| s.allows_flip())
    }

    pub fn shift_x_allowance(&self) -> Option<f64> {
        self.shift_x.and_then(|s| s.shift_allowance())
    }

    pub fn shift_y_allowance(&self) -> Option<f64> {
        self.shift_y.and_then(|s| s.shift_allowance())
    }

    /// Field-by-field override: set fields in `other` win
    pub fn merged(&self, other: &Overflow) -> Self {
        Self {
            adjust_x: other.adjust_x.or(self.adjust_x),
            adjust_y: other.adjust_y.or(self.adjust_y),
            shift_x: other.shift_x.or(self.shift_x),
            shift_y: other.shift_y.or(self.shift_y),
        }
    }
}
