//! Display settings: fill colours, bubble radius and the timeline window.
//!
//! Every field has a default, so a config file only needs the keys it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// File name looked up inside the data directory when `--config` is not given.
pub const CONFIG_FILE: &str = "atlas.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    /// Fill for the codes of a multi-location event.
    pub primary_colour: String,
    /// Overlay fill for an event's `Influences`.
    pub secondary_colour: String,
    /// Colour a code returns to when it stops being highlighted.
    pub neutral_colour: String,
    /// Bubble radius when the record carries no `radius` override.
    pub default_radius: u32,
    pub bubble_fill_key: String,
    pub timeline_start: i32,
    pub timeline_end: i32,
    /// Body text of every timeline slide; details are shown in the info panel.
    pub timeline_text: String,
    pub image_prefix: String,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            primary_colour: "#4C668C".to_string(),
            secondary_colour: "#758AA8".to_string(),
            neutral_colour: "silver".to_string(),
            default_radius: 10,
            bubble_fill_key: "bubble".to_string(),
            timeline_start: 1789,
            timeline_end: 1914,
            timeline_text: "Not Included".to_string(),
            image_prefix: "/Images/".to_string(),
        }
    }
}

impl AtlasConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| AtlasError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Explicit path first, then `atlas.json` in the data directory, then defaults.
    pub fn resolve(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let candidate = data_dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using data directory config");
            return Self::from_file(&candidate);
        }
        Ok(Self::default())
    }
}
