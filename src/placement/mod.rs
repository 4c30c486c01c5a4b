// Ambient suggestion placement: pick non-overlapping world-space slots for a
// small ranked set of suggestion icons near the images they annotate.

mod anchor;
mod geometry;
mod hash;
mod merge;
mod ranking;
mod search;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::PlacementConfig;
use crate::ir::{BranchCandidate, Point, Rect, Scene};

pub use merge::merge_ambient_suggestions;

/// Edit reasons that warrant recomputing ambient suggestions.
static AMBIENT_INTENT_REASONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "add",
        "import",
        "remove",
        "move",
        "resize",
        "replace",
        "describe",
        "composition_change",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorKind {
    ImageCluster,
    #[default]
    Viewport,
}

/// The resolved point a suggestion's placement search centered around, with
/// the image ids it was derived from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Anchor {
    pub kind: AnchorKind,
    pub image_ids: Vec<String>,
    pub world: Point,
}

/// A placed ambient suggestion. `id` is the stable identity used for merge
/// reconciliation across recomputation cycles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Suggestion {
    pub id: String,
    pub branch_id: String,
    pub asset_type: String,
    pub asset_key: String,
    pub asset_src: Option<String>,
    pub confidence: Option<f32>,
    pub anchor: Anchor,
    pub world_rect: Rect,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

/// Whether an edit event with this reason should trigger a recomputation.
/// Case and surrounding whitespace are ignored.
pub fn should_schedule_ambient_intent(reason: &str) -> bool {
    AMBIENT_INTENT_REASONS.contains(reason.trim().to_ascii_lowercase().as_str())
}

/// Main entry point. Ranks the branch candidates, resolves an anchor per
/// suggestion and greedily searches the offset ring for each in ranked
/// order, so the highest-confidence suggestion gets the least-constrained
/// choice. Pure: identical inputs produce identical output.
pub fn place_ambient_suggestions(
    scene: &Scene,
    branches: &[BranchCandidate],
    config: &PlacementConfig,
    now_ms: u64,
) -> Vec<Suggestion> {
    let ranked = ranking::select_ranked_candidates(branches, config.max_suggestions);
    if ranked.is_empty() {
        return Vec::new();
    }

    let viewport = scene.viewport.sanitized();
    let mut placed: Vec<Rect> = Vec::with_capacity(ranked.len());
    let mut suggestions: Vec<Suggestion> = Vec::with_capacity(ranked.len());
    for candidate in ranked {
        let anchor = anchor::resolve_anchor(
            &candidate.evidence_image_ids,
            &scene.image_rects,
            &scene.touched_image_ids,
            &viewport,
        );
        let world_rect = search::place_one(
            &candidate.branch_id,
            &candidate.asset_key,
            &anchor,
            &placed,
            &scene.image_rects,
            &viewport,
            config,
        );
        placed.push(world_rect);
        suggestions.push(Suggestion {
            id: format!("ambient:{}:{}", candidate.branch_id, candidate.asset_key),
            branch_id: candidate.branch_id,
            asset_type: candidate.asset_type,
            asset_key: candidate.asset_key,
            asset_src: candidate.asset_src,
            confidence: candidate.confidence,
            anchor,
            world_rect,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        });
    }
    suggestions
}
