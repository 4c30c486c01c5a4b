// Greedy ring search. Each suggestion takes the best-scoring slot around its
// anchor given every previously placed icon; no backtracking.

use crate::config::PlacementConfig;
use crate::ir::{ImageRectMap, Rect, Viewport};

use super::geometry::{clamp_rect_to_viewport, distance, overlap_area, rect_center};
use super::hash::hash32;
use super::Anchor;

/// Icon edge length the ring offsets were tuned at; other sizes scale the
/// ring linearly.
const BASE_ICON_SIZE: f32 = 72.0;

/// Candidate offsets around the anchor, magnitudes 130..=166 at base size.
/// Ten slots roughly every 36 degrees with staggered radii so neighboring
/// suggestions do not fan out into identical shells.
const OFFSET_RING: [(f32, f32); 10] = [
    (132.0, 0.0),
    (120.0, 87.0),
    (51.0, 158.0),
    (-43.0, 133.0),
    (-126.0, 92.0),
    (-136.0, 0.0),
    (-121.0, -88.0),
    (-51.0, -156.0),
    (44.0, -137.0),
    (128.0, -93.0),
];

const EDGE_MARGIN_RATIO: f32 = 0.14;
const MIN_EDGE_MARGIN: f32 = 2.0;

pub(crate) fn edge_margin(icon_world_size: f32) -> f32 {
    (icon_world_size * EDGE_MARGIN_RATIO).round().max(MIN_EDGE_MARGIN)
}

/// Pure placement step for one suggestion: probes the offset ring starting
/// at a key-hashed index, keeps the minimum-scoring viewport-clamped
/// candidate, and stops early on a fully clear slot. `placed` holds the
/// world rects committed by higher-ranked suggestions.
pub(crate) fn place_one(
    branch_id: &str,
    asset_key: &str,
    anchor: &Anchor,
    placed: &[Rect],
    image_rects: &ImageRectMap,
    viewport: &Viewport,
    config: &PlacementConfig,
) -> Rect {
    let size = config.icon_world_size.max(1.0);
    let scale = size / BASE_ICON_SIZE;
    let margin = edge_margin(size);
    let start = hash32(&format!("{branch_id}|{asset_key}")) as usize % OFFSET_RING.len();

    let mut best: Option<(f32, Rect)> = None;
    for step in 0..OFFSET_RING.len() {
        let (dx, dy) = OFFSET_RING[(start + step) % OFFSET_RING.len()];
        let candidate = Rect::new(
            anchor.world.x + dx * scale - size / 2.0,
            anchor.world.y + dy * scale - size / 2.0,
            size,
            size,
        );
        let candidate = clamp_rect_to_viewport(&candidate, viewport, margin);
        let score = score_candidate(&candidate, anchor, placed, image_rects, config);
        if best.is_none_or(|(best_score, _)| score < best_score) {
            best = Some((score, candidate));
        }
        if score == 0.0 {
            break;
        }
    }

    match best {
        Some((_, rect)) => rect,
        // Cannot occur with the fixed ring, but degrade to the bare anchor.
        None => {
            let fallback = Rect::new(
                anchor.world.x - size / 2.0,
                anchor.world.y - size / 2.0,
                size,
                size,
            );
            clamp_rect_to_viewport(&fallback, viewport, margin)
        }
    }
}

/// Occlusion cost of a candidate rect: overlap with placed icons (weight 1),
/// overlap with image rects (weighted higher when the image is in the
/// suggestion's anchor set), plus a small distance-to-anchor tie-break.
fn score_candidate(
    candidate: &Rect,
    anchor: &Anchor,
    placed: &[Rect],
    image_rects: &ImageRectMap,
    config: &PlacementConfig,
) -> f32 {
    let mut score = 0.0;
    for rect in placed {
        score += overlap_area(candidate, rect, config.collision_pad_world);
    }
    for (id, rect) in image_rects {
        let overlap = overlap_area(candidate, rect, config.collision_pad_world);
        if overlap <= 0.0 {
            continue;
        }
        let weight = if anchor.image_ids.iter().any(|anchor_id| anchor_id == id) {
            config.anchor_occlusion_weight
        } else {
            config.incidental_occlusion_weight
        };
        score += overlap * weight;
    }
    score + distance(rect_center(candidate), anchor.world) * config.anchor_distance_weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Point;
    use crate::placement::AnchorKind;

    fn anchor_on(image_ids: Vec<String>, world: Point) -> Anchor {
        Anchor {
            kind: AnchorKind::ImageCluster,
            image_ids,
            world,
        }
    }

    fn single_image_scene() -> ImageRectMap {
        [("img-1".to_string(), Rect::new(0.0, 0.0, 100.0, 100.0))]
            .into_iter()
            .collect()
    }

    #[test]
    fn ring_offsets_sit_in_the_tuned_band() {
        for (dx, dy) in OFFSET_RING {
            let magnitude = (dx * dx + dy * dy).sqrt();
            assert!(
                (130.0..=166.0).contains(&magnitude),
                "offset ({dx}, {dy}) has magnitude {magnitude}"
            );
        }
    }

    #[test]
    fn edge_margin_scales_with_icon_size() {
        assert_eq!(edge_margin(72.0), 10.0);
        assert_eq!(edge_margin(8.0), 2.0);
    }

    #[test]
    fn clear_slot_avoids_the_anchored_image() {
        let images = single_image_scene();
        let anchor = anchor_on(vec!["img-1".to_string()], Point { x: 50.0, y: 50.0 });
        let config = PlacementConfig::default();
        let rect = place_one(
            "b1",
            "spark",
            &anchor,
            &[],
            &images,
            &Viewport::default(),
            &config,
        );
        let image = images.get("img-1").unwrap();
        assert_eq!(
            overlap_area(&rect, image, 0.0),
            0.0,
            "expected a clear slot, got {rect:?}"
        );
    }

    #[test]
    fn second_suggestion_avoids_the_first() {
        let images = single_image_scene();
        let anchor = anchor_on(vec!["img-1".to_string()], Point { x: 50.0, y: 50.0 });
        let config = PlacementConfig::default();
        let viewport = Viewport::default();
        let first = place_one("b1", "spark", &anchor, &[], &images, &viewport, &config);
        let second = place_one(
            "b2",
            "glow",
            &anchor,
            &[first],
            &images,
            &viewport,
            &config,
        );
        assert_eq!(
            overlap_area(&first, &second, 0.0),
            0.0,
            "second icon must not cover the first: {first:?} vs {second:?}"
        );
    }

    #[test]
    fn anchored_image_costs_more_than_incidental_overlap() {
        let candidate = Rect::new(10.0, 10.0, 72.0, 72.0);
        let image: ImageRectMap = [("img-1".to_string(), Rect::new(0.0, 0.0, 100.0, 100.0))]
            .into_iter()
            .collect();
        let config = PlacementConfig::default();
        let world = Point { x: 46.0, y: 46.0 };
        let about = score_candidate(
            &candidate,
            &anchor_on(vec!["img-1".to_string()], world),
            &[],
            &image,
            &config,
        );
        let incidental = score_candidate(
            &candidate,
            &anchor_on(vec!["other".to_string()], world),
            &[],
            &image,
            &config,
        );
        assert!(about > incidental);
    }

    #[test]
    fn placement_stays_inside_the_viewport_margin() {
        let viewport = Viewport {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 400.0,
            max_y: 400.0,
        };
        let anchor = anchor_on(Vec::new(), Point { x: 395.0, y: 5.0 });
        let config = PlacementConfig::default();
        let rect = place_one(
            "edge",
            "pin",
            &anchor,
            &[],
            &ImageRectMap::new(),
            &viewport,
            &config,
        );
        let margin = edge_margin(config.icon_world_size);
        assert!(rect.x >= viewport.min_x + margin);
        assert!(rect.y >= viewport.min_y + margin);
        assert!(rect.x + rect.w <= viewport.max_x - margin);
        assert!(rect.y + rect.h <= viewport.max_y - margin);
    }

    #[test]
    fn identical_inputs_place_identically() {
        let images = single_image_scene();
        let anchor = anchor_on(vec!["img-1".to_string()], Point { x: 50.0, y: 50.0 });
        let config = PlacementConfig::default();
        let a = place_one(
            "b1",
            "spark",
            &anchor,
            &[],
            &images,
            &Viewport::default(),
            &config,
        );
        let b = place_one(
            "b1",
            "spark",
            &anchor,
            &[],
            &images,
            &Viewport::default(),
            &config,
        );
        assert_eq!(a, b);
    }
}
