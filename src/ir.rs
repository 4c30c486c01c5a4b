use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::placement::Suggestion;

/// Fallback viewport extent substituted wholesale for invalid input.
pub const DEFAULT_VIEWPORT_EXTENT: f32 = 2048.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned rectangle in world coordinates. `w` and `h` never go below 1;
/// degenerate inputs are coerced on construction and every transformation
/// produces a new value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for Rect {
    fn default() -> Self {
        Rect::new(0.0, 0.0, 1.0, 1.0)
    }
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(1.0),
            h: h.max(1.0),
        }
    }
}

/// World-space bounds of the visible viewport. The host editor supplies these
/// with camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            min_y: 0.0,
            max_x: DEFAULT_VIEWPORT_EXTENT,
            max_y: DEFAULT_VIEWPORT_EXTENT,
        }
    }
}

impl Viewport {
    /// A viewport must satisfy `max > min` on both axes with finite bounds.
    /// Anything else is replaced wholesale by the default, no partial repair.
    pub fn sanitized(&self) -> Viewport {
        let finite = self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite();
        if finite && self.max_x > self.min_x && self.max_y > self.min_y {
            *self
        } else {
            Viewport::default()
        }
    }

    pub fn center(&self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }
}

/// Current image geometry keyed by image id. BTreeMap keeps the iteration
/// order deterministic, which the anchor fallback chain relies on.
pub type ImageRectMap = BTreeMap<String, Rect>;

/// Candidate suggestion produced upstream by intent inference. Fields arrive
/// loosely typed; selection normalizes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchCandidate {
    pub branch_id: String,
    pub asset_type: Option<String>,
    pub asset_key: String,
    pub asset_src: Option<String>,
    pub confidence: Option<f32>,
    pub evidence_image_ids: Vec<String>,
}

impl BranchCandidate {
    /// Lenient decode of a single branch entry. Non-object entries yield
    /// `None`; malformed fields inside an object fall back to their defaults.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            branch_id: string_field(map.get("branch_id")),
            asset_type: map
                .get("asset_type")
                .and_then(Value::as_str)
                .map(str::to_string),
            asset_key: string_field(map.get("asset_key")),
            asset_src: map
                .get("asset_src")
                .and_then(Value::as_str)
                .map(str::to_string),
            confidence: map.get("confidence").and_then(value_to_f32),
            evidence_image_ids: map
                .get("evidence_image_ids")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }
}

/// Caller-owned snapshot of the canvas handed in per call. The core only
/// reads it; there is no hidden cross-call state.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub image_rects: ImageRectMap,
    pub viewport: Viewport,
    pub touched_image_ids: Vec<String>,
}

impl Scene {
    pub fn from_value(value: &Value) -> Self {
        let map = match value.as_object() {
            Some(map) => map,
            None => return Scene::default(),
        };
        let images = map.get("images").or_else(|| map.get("imageRectsById"));
        let viewport = map
            .get("viewport")
            .or_else(|| map.get("viewportWorldBounds"));
        let touched = map
            .get("touched_image_ids")
            .or_else(|| map.get("touchedImageIds"));
        Scene {
            image_rects: images.map(decode_image_rects).unwrap_or_default(),
            viewport: viewport.map(sanitize_viewport).unwrap_or_default(),
            touched_image_ids: touched
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

/// Full recomputation request: scene snapshot, branch candidates and the
/// previous suggestion list for timestamp continuity.
#[derive(Debug, Clone, Default)]
pub struct ScenePayload {
    pub scene: Scene,
    pub branches: Vec<BranchCandidate>,
    pub previous: Vec<Suggestion>,
}

/// Only the outermost decode can fail; malformed members inside a valid
/// payload degrade to defaults instead.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Parse(String),
    #[error("payload root must be a JSON object")]
    NotAnObject,
}

impl ScenePayload {
    /// Parses a payload, accepting strict JSON first and falling back to
    /// JSON5 for hand-edited inputs.
    pub fn from_str(input: &str) -> Result<Self, PayloadError> {
        let value = match serde_json::from_str::<Value>(input) {
            Ok(value) => value,
            Err(strict_err) => json5::from_str::<Value>(input)
                .map_err(|_| PayloadError::Parse(strict_err.to_string()))?,
        };
        if !value.is_object() {
            return Err(PayloadError::NotAnObject);
        }
        let branches = value
            .get("branches")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(BranchCandidate::from_value)
                    .collect()
            })
            .unwrap_or_default();
        let previous = value
            .get("previous")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(Self {
            scene: Scene::from_value(&value),
            branches,
            previous,
        })
    }
}

/// Coerces a loose rect value. `x`/`y` default to 0, `w`/`h` are floored at
/// 1, non-objects yield `None`.
pub fn normalize_rect(value: &Value) -> Option<Rect> {
    let map = value.as_object()?;
    let coord = |key: &str| map.get(key).and_then(value_to_f32).unwrap_or(0.0);
    let extent = |key: &str| map.get(key).and_then(value_to_f32).unwrap_or(1.0);
    Some(Rect::new(coord("x"), coord("y"), extent("w"), extent("h")))
}

pub fn sanitize_viewport(value: &Value) -> Viewport {
    let map = match value.as_object() {
        Some(map) => map,
        None => return Viewport::default(),
    };
    let bound = |key: &str| map.get(key).and_then(value_to_f32).unwrap_or(f32::NAN);
    Viewport {
        min_x: bound("minX"),
        min_y: bound("minY"),
        max_x: bound("maxX"),
        max_y: bound("maxY"),
    }
    .sanitized()
}

fn decode_image_rects(value: &Value) -> ImageRectMap {
    let mut rects = ImageRectMap::new();
    let Some(map) = value.as_object() else {
        return rects;
    };
    for (key, raw) in map {
        let id = key.trim();
        if id.is_empty() {
            continue;
        }
        if let Some(rect) = normalize_rect(raw) {
            // Last rect wins for a duplicate (post-trim) key.
            rects.insert(id.to_string(), rect);
        }
    }
    rects
}

fn string_field(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

fn value_to_f32(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(num) => num.as_f64().map(|n| n as f32),
        Value::String(raw) => raw.trim().parse::<f32>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}
