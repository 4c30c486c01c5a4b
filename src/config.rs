use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::Context;

/// Tunables for the placement search. The occlusion weights and the distance
/// tie-break coefficient are tuned constants; keep them as-is for stable
/// layouts across hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Upper bound on emitted suggestions, clamped to 0..=6 at use.
    pub max_suggestions: i64,
    /// World-space edge length of a suggestion icon.
    pub icon_world_size: f32,
    /// Separation margin applied when measuring overlap between a candidate
    /// and placed icons or image rects.
    pub collision_pad_world: f32,
    /// Penalty multiplier for covering an image the suggestion is about.
    pub anchor_occlusion_weight: f32,
    /// Penalty multiplier for covering any other image.
    pub incidental_occlusion_weight: f32,
    /// Coefficient on the center-to-anchor distance tie-break term.
    pub anchor_distance_weight: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_suggestions: 3,
            icon_world_size: 72.0,
            collision_pad_world: 8.0,
            anchor_occlusion_weight: 7.0,
            incidental_occlusion_weight: 3.0,
            anchor_distance_weight: 0.04,
        }
    }
}

/// Loads a config file, layering its values over the defaults. Accepts strict
/// JSON or JSON5. `None` yields the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlacementConfig> {
    let Some(path) = path else {
        return Ok(PlacementConfig::default());
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config = match serde_json::from_str::<PlacementConfig>(&contents) {
        Ok(config) => config,
        Err(_) => json5::from_str::<PlacementConfig>(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))?,
    };
    Ok(config)
}
