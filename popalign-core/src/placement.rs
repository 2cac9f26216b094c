//! Placement descriptors and the named placement table.

use std::collections::BTreeMap;

use popalign_common::{AnchorPoint, AnchorPoints, OffsetPair, Overflow, OverflowSetting};
use serde::{Deserialize, Serialize};

/// Which bounding region constrains the popup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HtmlRegion {
    /// Only the part of the document currently in the viewport
    #[default]
    Visible,
    /// The whole scrollable document
    Scroll,
    /// Whole document, but prefer candidates that stay in the viewport
    VisibleFirst,
}

/// Immutable alignment configuration for one placement.
///
/// Defaults: popup below the target with left edges aligned, no offsets,
/// no flipping or shifting, constrained to the viewport, arrow follows the
/// alignment, positioned from left/top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Placement {
    /// `[popupAnchor, targetAnchor]`
    pub points: AnchorPoints,
    /// Applied to the popup after anchoring. Percentages are of the popup size.
    pub offset: OffsetPair,
    /// Applied to the target anchor. Percentages are of the target size.
    pub target_offset: OffsetPair,
    pub overflow: Overflow,
    pub html_region: HtmlRegion,
    pub auto_arrow: bool,
    /// Position from right/bottom when the popup anchor sits on that side
    pub dynamic_inset: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            points: AnchorPoints::new(AnchorPoint::TOP_LEFT, AnchorPoint::BOTTOM_LEFT),
            offset: OffsetPair::default(),
            target_offset: OffsetPair::default(),
            overflow: Overflow::default(),
            html_region: HtmlRegion::default(),
            auto_arrow: true,
            dynamic_inset: false,
        }
    }
}

/// Caller overrides for a placement. Unset fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlacementOverride {
    pub points: Option<AnchorPoints>,
    pub offset: Option<OffsetPair>,
    pub target_offset: Option<OffsetPair>,
    pub overflow: Option<Overflow>,
    pub html_region: Option<HtmlRegion>,
    pub auto_arrow: Option<bool>,
    pub dynamic_inset: Option<bool>,
}

impl Placement {
    /// Apply overrides field by field. The overflow block merges per axis
    /// instead of being replaced wholesale.
    pub fn merged(&self, patch: &PlacementOverride) -> Self {
        Self {
            points: patch.points.unwrap_or(self.points),
            offset: patch.offset.unwrap_or(self.offset),
            target_offset: patch.target_offset.unwrap_or(self.target_offset),
            overflow: match &patch.overflow {
                Some(overflow) => self.overflow.merged(overflow),
                None => self.overflow,
            },
            html_region: patch.html_region.unwrap_or(self.html_region),
            auto_arrow: patch.auto_arrow.unwrap_or(self.auto_arrow),
            dynamic_inset: patch.dynamic_inset.unwrap_or(self.dynamic_inset),
        }
    }
}

/// Gap between target and popup in the built-in placements
const BUILTIN_GAP: f64 = 4.0;

/// How far the target may slide out of view on top/bottom placements
/// before horizontal shifting stops
const BUILTIN_SHIFT_X: f64 = 64.0;

/// Named placements, e.g. `"top"` or `"bottomLeft"`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacementTable {
    placements: BTreeMap<String, Placement>,
}

impl PlacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The twelve standard tooltip placements
    pub fn builtin() -> Self {
        let top_bottom = Overflow {
            adjust_y: Some(OverflowSetting::Flag(true)),
            shift_x: Some(OverflowSetting::Amount(BUILTIN_SHIFT_X)),
            ..Default::default()
        };
        let left_right = Overflow {
            adjust_x: Some(OverflowSetting::Flag(true)),
            shift_y: Some(OverflowSetting::Flag(true)),
            ..Default::default()
        };

        let above = OffsetPair::px(0.0, -BUILTIN_GAP);
        let below = OffsetPair::px(0.0, BUILTIN_GAP);
        let before = OffsetPair::px(-BUILTIN_GAP, 0.0);
        let after = OffsetPair::px(BUILTIN_GAP, 0.0);

        let entries = [
            ("top", "bc", "tc", above, top_bottom),
            ("topLeft", "bl", "tl", above, top_bottom),
            ("topRight", "br", "tr", above, top_bottom),
            ("bottom", "tc", "bc", below, top_bottom),
            ("bottomLeft", "tl", "bl", below, top_bottom),
            ("bottomRight", "tr", "br", below, top_bottom),
            ("left", "cr", "cl", before, left_right),
            ("leftTop", "tr", "tl", before, left_right),
            ("leftBottom", "br", "bl", before, left_right),
            ("right", "cl", "cr", after, left_right),
            ("rightTop", "tl", "tr", after, left_right),
            ("rightBottom", "bl", "br", after, left_right),
        ];

        let mut table = Self::new();
        for (name, popup, target, offset, overflow) in entries {
            let Ok(points) = AnchorPoints::parse(popup, target) else {
                continue;
            };
            table.insert(
                name,
                Placement {
                    points,
                    offset,
                    overflow,
                    ..Default::default()
                },
            );
        }
        table
    }

    pub fn insert(&mut self, name: impl Into<String>, placement: Placement) {
        self.placements.insert(name.into(), placement);
    }

    pub fn get(&self, name: &str) -> Option<&Placement> {
        self.placements.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.placements.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Look up a named placement and apply caller overrides to it.
    ///
    /// An unknown name falls back to the default placement so a typo
    /// degrades to "below the target" instead of no popup at all.
    pub fn resolve(&self, name: &str, patch: &PlacementOverride) -> Placement {
        match self.get(name) {
            Some(base) => base.merged(patch),
            None => Placement::default().merged(patch),
        }
    }

    /// Name of the first placement using `points`.
    ///
    /// Point-anchored popups only compare the popup anchor since the target
    /// anchor of a point is meaningless.
    pub fn name_for(&self, points: &AnchorPoints, popup_only: bool) -> Option<&str> {
        self.placements
            .iter()
            .find(|(_, placement)| {
                if popup_only {
                    placement.points.popup == points.popup
                } else {
                    placement.points == *points
                }
            })
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use popalign_common::OffsetValue;

    #[test]
    fn test_builtin_has_all_twelve() {
        let table = PlacementTable::builtin();
        assert_eq!(table.len(), 12);
        let top = table.get("top").unwrap();
        assert_eq!(top.points, AnchorPoints::parse("bc", "tc").unwrap());
        assert_eq!(top.offset, OffsetPair::px(0.0, -4.0));
        assert!(top.overflow.flip_y());
        assert!(!top.overflow.flip_x());
        assert_eq!(top.overflow.shift_x_allowance(), Some(64.0));
    }

    #[test]
    fn test_merge_is_field_by_field() {
        let table = PlacementTable::builtin();
        let patch = PlacementOverride {
            offset: Some(OffsetPair::px(0.0, -10.0)),
            overflow: Some(Overflow {
                adjust_x: Some(OverflowSetting::Flag(true)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let placement = table.resolve("top", &patch);
        assert_eq!(placement.points, AnchorPoints::parse("bc", "tc").unwrap());
        assert_eq!(placement.offset.y, OffsetValue::Px(-10.0));
        assert!(placement.overflow.flip_x());
        assert!(placement.overflow.flip_y());
    }

    #[test]
    fn test_unknown_name_uses_default() {
        let table = PlacementTable::builtin();
        let placement = table.resolve("sideways", &PlacementOverride::default());
        assert_eq!(placement, Placement::default());
    }

    #[test]
    fn test_name_for_reverse_lookup() {
        let table = PlacementTable::builtin();
        let bottom = AnchorPoints::parse("tc", "bc").unwrap();
        assert_eq!(table.name_for(&bottom, false), Some("bottom"));

        let odd = AnchorPoints::parse("tc", "tc").unwrap();
        assert_eq!(table.name_for(&odd, false), None);
        assert_eq!(table.name_for(&odd, true), Some("bottom"));
    }

    #[test]
    fn test_placement_deserializes_with_defaults() {
        let placement: Placement = serde_json::from_str(
            r#"{"points": ["bc", "tc"], "htmlRegion": "visibleFirst", "overflow": {"adjustY": 1}}"#,
        )
        .unwrap();
        assert_eq!(placement.html_region, HtmlRegion::VisibleFirst);
        assert!(placement.auto_arrow);
        assert_eq!(placement.offset, OffsetPair::default());
        assert!(placement.overflow.flip_y());
    }
}
