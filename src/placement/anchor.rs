use crate::ir::{ImageRectMap, Point, Viewport};

use super::geometry::rect_center;
use super::{Anchor, AnchorKind};

/// How many known images seed the anchor when neither evidence nor touched
/// images resolve.
const FALLBACK_IMAGE_COUNT: usize = 3;

/// Resolves the world-space point a suggestion's placement search centers
/// around. Fallback chain: evidence images, then touched images, then the
/// first few known images in map order, then the viewport center.
pub(crate) fn resolve_anchor(
    evidence_image_ids: &[String],
    image_rects: &ImageRectMap,
    touched_image_ids: &[String],
    viewport: &Viewport,
) -> Anchor {
    let evidence = known_ids(evidence_image_ids, image_rects);
    if !evidence.is_empty() {
        return cluster_anchor(evidence, image_rects);
    }

    let touched = known_ids(touched_image_ids, image_rects);
    if !touched.is_empty() {
        return cluster_anchor(touched, image_rects);
    }

    let first_known: Vec<String> = image_rects
        .keys()
        .take(FALLBACK_IMAGE_COUNT)
        .cloned()
        .collect();
    if !first_known.is_empty() {
        return cluster_anchor(first_known, image_rects);
    }

    Anchor {
        kind: AnchorKind::Viewport,
        image_ids: Vec::new(),
        world: viewport.center(),
    }
}

/// Intersects `ids` with the known rect map, preserving input order and
/// dropping duplicates.
fn known_ids(ids: &[String], image_rects: &ImageRectMap) -> Vec<String> {
    let mut known: Vec<String> = Vec::new();
    for id in ids {
        if image_rects.contains_key(id) && !known.iter().any(|seen| seen == id) {
            known.push(id.clone());
        }
    }
    known
}

fn cluster_anchor(image_ids: Vec<String>, image_rects: &ImageRectMap) -> Anchor {
    let mut sum = Point::default();
    for id in &image_ids {
        if let Some(rect) = image_rects.get(id) {
            let center = rect_center(rect);
            sum.x += center.x;
            sum.y += center.y;
        }
    }
    let count = image_ids.len() as f32;
    Anchor {
        kind: AnchorKind::ImageCluster,
        world: Point {
            x: sum.x / count,
            y: sum.y / count,
        },
        image_ids,
    }
}
