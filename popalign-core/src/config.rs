use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::placement::{PlacementOverride, PlacementTable};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("Unknown placement: {0}")]
    UnknownPlacement(String),
    #[error("Configuration error: {0}")]
    Invalid(String),
}

fn default_true() -> bool {
    true
}

fn default_placement_name() -> String {
    "bottomLeft".to_string()
}

/// One entry of the `placements` map.
///
/// Starts from `base` (or the built-in placement of the same name) and
/// applies the remaining fields as overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementEntry {
    #[serde(default)]
    pub base: Option<String>,
    #[serde(flatten)]
    pub patch: PlacementOverride,
}

/// Alignment settings file (YAML or JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Placement used when the caller doesn't name one
    #[serde(default = "default_placement_name")]
    pub default_placement: String,
    /// Close point-anchored popups (context menus) when anything scrolls
    #[serde(default = "default_true")]
    pub close_on_scroll_for_point: bool,
    /// Extra or overridden named placements
    #[serde(default)]
    pub placements: BTreeMap<String, PlacementEntry>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            default_placement: default_placement_name(),
            close_on_scroll_for_point: true,
            placements: BTreeMap::new(),
        }
    }
}

impl AlignConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Yaml(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Load from a `.yaml`/`.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "unsupported config file type: {}",
                    path.display()
                )))
            }
        };
        info!(
            "Loaded alignment config from {} ({} placement entries)",
            path.display(),
            config.placements.len()
        );
        Ok(config)
    }

    /// Built-in placements with this config's entries applied on top.
    ///
    /// Entries are applied in name order; an entry may use another custom
    /// entry as its `base` only if that one sorts earlier.
    pub fn placement_table(&self) -> Result<PlacementTable, ConfigError> {
        let mut table = PlacementTable::builtin();
        for (name, entry) in &self.placements {
            let placement = match &entry.base {
                Some(base) => match table.get(base) {
                    Some(base_placement) => base_placement.merged(&entry.patch),
                    None => {
                        warn!("Placement {name:?} extends unknown placement {base:?}");
                        return Err(ConfigError::UnknownPlacement(base.clone()));
                    }
                },
                None => table.resolve(name, &entry.patch),
            };
            table.insert(name.clone(), placement);
        }

        if table.get(&self.default_placement).is_none() {
            return Err(ConfigError::UnknownPlacement(self.default_placement.clone()));
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::HtmlRegion;
    use popalign_common::{AnchorPoints, OffsetPair};

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = AlignConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AlignConfig::default());
        let table = config.placement_table().unwrap();
        assert_eq!(table.len(), 12);
    }

    #[test]
    fn test_yaml_overrides_builtin() {
        let yaml = r#"
default_placement: top
placements:
  top:
    offset: [0, -8]
    htmlRegion: visibleFirst
  menu:
    base: bottomLeft
    offset: [0, 2]
"#;
        let config = AlignConfig::from_yaml_str(yaml).unwrap();
        let table = config.placement_table().unwrap();

        let top = table.get("top").unwrap();
        assert_eq!(top.offset, OffsetPair::px(0.0, -8.0));
        assert_eq!(top.html_region, HtmlRegion::VisibleFirst);
        assert_eq!(top.points, AnchorPoints::parse("bc", "tc").unwrap());
        assert!(top.overflow.flip_y());

        let menu = table.get("menu").unwrap();
        assert_eq!(menu.points, AnchorPoints::parse("tl", "bl").unwrap());
        assert_eq!(menu.offset, OffsetPair::px(0.0, 2.0));
    }

    #[test]
    fn test_unknown_base_is_an_error() {
        let yaml = r#"
placements:
  menu:
    base: nowhere
"#;
        let config = AlignConfig::from_yaml_str(yaml).unwrap();
        assert!(matches!(
            config.placement_table(),
            Err(ConfigError::UnknownPlacement(name)) if name == "nowhere"
        ));
    }

    #[test]
    fn test_unknown_default_placement_is_an_error() {
        let config = AlignConfig {
            default_placement: "diagonal".to_string(),
            ..Default::default()
        };
        assert!(config.placement_table().is_err());
    }

    #[test]
    fn test_bad_anchor_fails_to_parse() {
        let json = r#"{"placements": {"top": {"points": ["qq", "tc"]}}}"#;
        assert!(matches!(
            AlignConfig::from_json_str(json),
            Err(ConfigError::Json(_))
        ));
    }
}
