// Pure geometry over world-space rects. No state, no rendering concerns.

use crate::ir::{Point, Rect, Viewport};

pub(crate) fn rect_center(rect: &Rect) -> Point {
    Point {
        x: rect.x + rect.w / 2.0,
        y: rect.y + rect.h / 2.0,
    }
}

/// Axis-aligned overlap of `a` and `b` after expanding both by `pad` on all
/// sides. Expanding both rects by the same pad approximates a minimum
/// separation margin between icon and image/other icon.
pub(crate) fn overlap_area(a: &Rect, b: &Rect, pad: f32) -> f32 {
    let overlap_x = (a.x + a.w + pad).min(b.x + b.w + pad) - (a.x - pad).max(b.x - pad);
    if overlap_x <= 0.0 {
        return 0.0;
    }
    let overlap_y = (a.y + a.h + pad).min(b.y + b.h + pad) - (a.y - pad).max(b.y - pad);
    if overlap_y <= 0.0 {
        return 0.0;
    }
    overlap_x * overlap_y
}

/// Shifts (never resizes) `rect` so it stays inside the viewport with
/// `margin` clearance on every edge. When the viewport cannot fit the rect
/// plus margin, the minimum bound wins.
pub(crate) fn clamp_rect_to_viewport(rect: &Rect, viewport: &Viewport, margin: f32) -> Rect {
    let x = rect
        .x
        .min(viewport.max_x - margin - rect.w)
        .max(viewport.min_x + margin);
    let y = rect
        .y
        .min(viewport.max_y - margin - rect.h)
        .max(viewport.min_y + margin);
    Rect { x, y, ..*rect }
}

pub(crate) fn distance(a: Point, b: Point) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_area_no_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &b, 0.0), 0.0);
    }

    #[test]
    fn overlap_area_partial_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &b, 0.0), 25.0);
    }

    #[test]
    fn overlap_area_contained() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        let b = Rect::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(overlap_area(&a, &b, 0.0), 25.0);
    }

    #[test]
    fn overlap_area_padding_bridges_a_gap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(14.0, 0.0, 10.0, 10.0);
        assert_eq!(overlap_area(&a, &b, 0.0), 0.0);
        // 4 units apart, both expanded by 3 on each side: 2 units of overlap.
        assert!(overlap_area(&a, &b, 3.0) > 0.0);
    }

    #[test]
    fn rect_center_is_midpoint() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let center = rect_center(&rect);
        assert_eq!((center.x, center.y), (25.0, 40.0));
    }

    #[test]
    fn clamp_shifts_without_resizing() {
        let viewport = Viewport {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 100.0,
            max_y: 100.0,
        };
        let rect = Rect::new(95.0, -20.0, 30.0, 30.0);
        let clamped = clamp_rect_to_viewport(&rect, &viewport, 5.0);
        assert_eq!((clamped.w, clamped.h), (30.0, 30.0));
        assert_eq!(clamped.x, 65.0);
        assert_eq!(clamped.y, 5.0);
    }

    #[test]
    fn clamp_favors_minimum_bound_when_rect_cannot_fit() {
        let viewport = Viewport {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 20.0,
            max_y: 20.0,
        };
        let rect = Rect::new(50.0, 50.0, 40.0, 40.0);
        let clamped = clamp_rect_to_viewport(&rect, &viewport, 2.0);
        assert_eq!(clamped.x, 2.0);
        assert_eq!(clamped.y, 2.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Point { x: 0.0, y: 0.0 };
        let b = Point { x: 3.0, y: 4.0 };
        assert_eq!(distance(a, b), 5.0);
    }
}
