use ambient_suggest::{
    PlacementConfig, ScenePayload, merge_ambient_suggestions, place_ambient_suggestions,
    should_schedule_ambient_intent,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AmbientPlacementOptions {
    max_suggestions: Option<i64>,
    icon_world_size: Option<f32>,
    collision_pad_world: Option<f32>,
    now_ms: Option<u64>,
    reason: Option<String>,
}

fn build_config(options: &AmbientPlacementOptions) -> PlacementConfig {
    let mut config = PlacementConfig::default();
    if let Some(max_suggestions) = options.max_suggestions {
        config.max_suggestions = max_suggestions;
    }
    if let Some(icon_world_size) = options.icon_world_size {
        config.icon_world_size = icon_world_size;
    }
    if let Some(collision_pad_world) = options.collision_pad_world {
        config.collision_pad_world = collision_pad_world;
    }
    config
}

#[wasm_bindgen]
pub fn place_ambient(payload_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<AmbientPlacementOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        AmbientPlacementOptions::default()
    };

    let payload = ScenePayload::from_str(payload_json)
        .map_err(|error| JsValue::from_str(&error.to_string()))?;
    let now_ms = options.now_ms.unwrap_or(0);

    let gated_out = options
        .reason
        .as_deref()
        .is_some_and(|reason| !should_schedule_ambient_intent(reason));
    let suggestions = if gated_out {
        payload.previous
    } else {
        let config = build_config(&options);
        let next = place_ambient_suggestions(&payload.scene, &payload.branches, &config, now_ms);
        merge_ambient_suggestions(&payload.previous, &next, now_ms)
    };

    serde_json::to_string(&suggestions).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use ambient_suggest::{ScenePayload, place_ambient_suggestions};

    use crate::{AmbientPlacementOptions, build_config};

    #[test]
    fn places_suggestions_from_a_canvas_payload() {
        let payload = ScenePayload::from_str(
            r#"{
                "images": {
                    "img-1": {"x": 100, "y": 100, "w": 400, "h": 300},
                    "img-2": {"x": 700, "y": 200, "w": 300, "h": 300}
                },
                "viewport": {"minX": 0, "minY": 0, "maxX": 1400, "maxY": 1000},
                "branches": [
                    {"branch_id": "b1", "asset_key": "crop", "confidence": 0.9,
                     "evidence_image_ids": ["img-1"]},
                    {"branch_id": "b2", "asset_key": "tone", "confidence": 0.5,
                     "evidence_image_ids": ["img-2"]}
                ]
            }"#,
        )
        .expect("canvas payload should decode");

        let config = build_config(&AmbientPlacementOptions::default());
        let suggestions =
            place_ambient_suggestions(&payload.scene, &payload.branches, &config, 0);

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].id, "ambient:b1:crop");
        assert_eq!(suggestions[1].id, "ambient:b2:tone");
    }
}
