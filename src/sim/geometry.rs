//! Geometry helpers shared by every game
//!
//! All functions are pure. Degenerate inputs (zero-length normals, polygons
//! with fewer than three vertices, circles centered on a rectangle edge) map
//! to documented fallback values instead of NaN.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Tolerance for orientation tests in `segments_intersect`
const ORIENT_EPS: f64 = 1e-9;

/// Axis-aligned rectangle, origin at the top-left corner (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    /// Closest point of the rectangle to `p`
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.clamp(self.x, self.right()), p.y.clamp(self.y, self.bottom()))
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Strict overlap test (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Penetration of a circle into a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector pointing from the shape toward the circle
    pub normal: Vec2,
    /// Distance the circle must move along `normal` to stop overlapping
    pub overlap: f32,
}

/// Ray-casting parity test. Polygons with fewer than 3 vertices contain nothing.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }
    let (x, y) = (point.x as f64, point.y as f64);
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].x as f64, polygon[i].y as f64);
        let (xj, yj) = (polygon[j].x as f64, polygon[j].y as f64);
        // (yi > y) != (yj > y) guarantees yi != yj
        if (yi > y) != (yj > y) {
            let x_cross = (xj - xi) * (y - yi) / (yj - yi) + xi;
            if x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f64 {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (bx, by) = (b.x as f64, b.y as f64);
    let (cx, cy) = (c.x as f64, c.y as f64);
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Orientation-based segment intersection, including touching endpoints and
/// collinear overlap
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);

    if ((d1 > ORIENT_EPS && d2 < -ORIENT_EPS) || (d1 < -ORIENT_EPS && d2 > ORIENT_EPS))
        && ((d3 > ORIENT_EPS && d4 < -ORIENT_EPS) || (d3 < -ORIENT_EPS && d4 > ORIENT_EPS))
    {
        return true;
    }

    (d1.abs() <= ORIENT_EPS && on_segment(b1, b2, a1))
        || (d2.abs() <= ORIENT_EPS && on_segment(b1, b2, a2))
        || (d3.abs() <= ORIENT_EPS && on_segment(a1, a2, b1))
        || (d4.abs() <= ORIENT_EPS && on_segment(a1, a2, b2))
}

/// Resolve a circle against a rectangle using the closest-point clamp.
///
/// Returns `None` when they do not overlap. When the center sits inside the
/// rectangle the circle is pushed out through the nearest edge; when it sits
/// exactly on the boundary (zero distance) the normal defaults to up `(0, -1)`.
pub fn resolve_circle_rect(center: Vec2, radius: f32, rect: &Rect) -> Option<Contact> {
    let closest = rect.clamp_point(center);
    let delta = center - closest;
    let dist_sq = delta.length_squared();

    if dist_sq >= radius * radius {
        return None;
    }

    if dist_sq > 0.0 {
        let dist = dist_sq.sqrt();
        return Some(Contact {
            normal: delta / dist,
            overlap: radius - dist,
        });
    }

    let inside = center.x > rect.x
        && center.x < rect.right()
        && center.y > rect.y
        && center.y < rect.bottom();

    if inside {
        let exits = [
            (Vec2::new(0.0, -1.0), center.y - rect.y),
            (Vec2::new(0.0, 1.0), rect.bottom() - center.y),
            (Vec2::new(-1.0, 0.0), center.x - rect.x),
            (Vec2::new(1.0, 0.0), rect.right() - center.x),
        ];
        let mut best = exits[0];
        for exit in &exits[1..] {
            if exit.1 < best.1 {
                best = *exit;
            }
        }
        return Some(Contact {
            normal: best.0,
            overlap: best.1 + radius,
        });
    }

    // On the boundary: lift above the top edge
    Some(Contact {
        normal: Vec2::new(0.0, -1.0),
        overlap: (center.y - rect.y).max(0.0) + radius,
    })
}

/// Minimum translation that moves rectangle `a` out of rectangle `b`.
///
/// Pushes along the axis with the smaller overlap; `None` when they do not
/// intersect.
pub fn resolve_rect_rect(a: &Rect, b: &Rect) -> Option<Vec2> {
    if !a.intersects(b) {
        return None;
    }
    let (ca, cb) = (a.center(), b.center());
    let overlap_x = (a.w + b.w) * 0.5 - (ca.x - cb.x).abs();
    let overlap_y = (a.h + b.h) * 0.5 - (ca.y - cb.y).abs();
    if overlap_x < overlap_y {
        let sign = if a.x < b.x { -1.0 } else { 1.0 };
        Some(Vec2::new(sign * overlap_x, 0.0))
    } else {
        let sign = if a.y < b.y { -1.0 } else { 1.0 };
        Some(Vec2::new(0.0, sign * overlap_y))
    }
}

/// Resolve two overlapping circles. The normal points from `b` to `a`.
///
/// Coincident centers fall back to the upward normal.
pub fn resolve_circle_circle(a: Vec2, b: Vec2, min_dist: f32) -> Option<Contact> {
    let delta = a - b;
    let dist = delta.length();
    if dist >= min_dist {
        return None;
    }
    let normal = if dist > f32::EPSILON {
        delta / dist
    } else {
        Vec2::new(0.0, -1.0)
    };
    Some(Contact {
        normal,
        overlap: min_dist - dist,
    })
}

/// Mirror `velocity` about `normal`, then scale by `damping` (0 < damping <= 1).
///
/// The normal need not be unit length; a zero normal leaves the direction
/// unchanged.
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2, damping: f32) -> Vec2 {
    let n = normal.normalize_or_zero();
    (velocity - 2.0 * velocity.dot(n) * n) * damping
}

fn merge_runs(
    rects: &mut [Rect],
    key: impl Fn(&Rect) -> (f32, f32),
    start: impl Fn(&Rect) -> f32,
    extent: impl Fn(&Rect) -> f32,
    rebuild: impl Fn(&Rect, f32, f32) -> Rect,
) -> Vec<Rect> {
    rects.sort_by(|a, b| {
        let (ka, kb) = (key(a), key(b));
        ka.0.total_cmp(&kb.0)
            .then(ka.1.total_cmp(&kb.1))
            .then(start(a).total_cmp(&start(b)))
    });

    let mut out: Vec<Rect> = Vec::with_capacity(rects.len());
    for r in rects.iter() {
        if let Some(cur) = out.last_mut()
            && key(cur) == key(r)
            && start(r) <= start(cur) + extent(cur)
        {
            let lo = start(cur);
            let hi = (start(cur) + extent(cur)).max(start(r) + extent(r));
            *cur = rebuild(cur, lo, hi - lo);
            continue;
        }
        out.push(*r);
    }
    out
}

/// Merge touching or overlapping rectangles: first along rows (same `y` and
/// `h`), then along columns (same `x` and `w`). Output is sorted by `(y, x)`.
pub fn merge_axis_aligned_rects(rects: &[Rect]) -> Vec<Rect> {
    let mut work: Vec<Rect> = rects
        .iter()
        .copied()
        .filter(|r| r.w > 0.0 && r.h > 0.0)
        .collect();

    let mut rows = merge_runs(
        &mut work,
        |r| (r.y, r.h),
        |r| r.x,
        |r| r.w,
        |r, x, w| Rect::new(x, r.y, w, r.h),
    );
    let mut merged = merge_runs(
        &mut rows,
        |r| (r.x, r.w),
        |r| r.y,
        |r| r.h,
        |r, y, h| Rect::new(r.x, y, r.w, h),
    );

    merged.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    /// Count edge crossings of a horizontal ray to +x, one edge at a time
    fn crossing_number(p: Vec2, poly: &[Vec2]) -> usize {
        let n = poly.len();
        (0..n)
            .filter(|&i| {
                let a = poly[i].as_dvec2();
                let b = poly[(i + 1) % n].as_dvec2();
                let (px, py) = (p.x as f64, p.y as f64);
                let straddles = (a.y <= py && b.y > py) || (b.y <= py && a.y > py);
                if !straddles {
                    return false;
                }
                let t = (py - a.y) / (b.y - a.y);
                px < a.x + t * (b.x - a.x)
            })
            .count()
    }

    fn dist_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
        let ab = b - a;
        let t = ((p - a).dot(ab) / ab.length_squared().max(f32::EPSILON)).clamp(0.0, 1.0);
        (a + ab * t).distance(p)
    }

    /// Star-shaped polygon around (50, 50), always simple
    fn star_polygon() -> impl Strategy<Value = Vec<Vec2>> {
        prop::collection::vec(5.0f32..40.0, 3..12).prop_map(|radii| {
            let n = radii.len();
            radii
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let a = i as f32 / n as f32 * std::f32::consts::TAU;
                    Vec2::new(50.0 + r * a.cos(), 50.0 + r * a.sin())
                })
                .collect()
        })
    }

    #[test]
    fn test_rect_rect_pushes_along_shallow_axis() {
        let crate_box = Rect::new(0.0, 90.0, 20.0, 20.0);
        let ground = Rect::new(-50.0, 100.0, 200.0, 50.0);
        assert_eq!(resolve_rect_rect(&crate_box, &ground), Some(Vec2::new(0.0, -10.0)));
        let side = Rect::new(145.0, 110.0, 20.0, 20.0);
        assert_eq!(resolve_rect_rect(&side, &ground), Some(Vec2::new(5.0, 0.0)));
        assert!(resolve_rect_rect(&Rect::new(0.0, 0.0, 5.0, 5.0), &ground).is_none());
    }

    #[test]
    fn test_point_in_polygon_basic() {
        let sq = square();
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &sq));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &sq));
        assert!(!point_in_polygon(Vec2::new(-1.0, 5.0), &sq));
    }

    #[test]
    fn test_point_in_polygon_degenerate() {
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
        let line = [Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0)];
        assert!(!point_in_polygon(Vec2::ZERO, &line));
    }

    #[test]
    fn test_segments_cross() {
        assert!(segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 0.0)
        ));
        assert!(!segments_intersect(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(6.0, 1.0)
        ));
    }

    #[test]
    fn test_segments_collinear_overlap() {
        let (a1, a2) = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(segments_intersect(a1, a2, Vec2::new(5.0, 0.0), Vec2::new(15.0, 0.0)));
        assert!(!segments_intersect(a1, a2, Vec2::new(11.0, 0.0), Vec2::new(15.0, 0.0)));
        // Touching at an endpoint counts
        assert!(segments_intersect(a1, a2, Vec2::new(10.0, 0.0), Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn test_circle_rect_miss() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(resolve_circle_rect(Vec2::new(20.0, 5.0), 5.0, &rect).is_none());
    }

    #[test]
    fn test_circle_rect_side_hit() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let c = resolve_circle_rect(Vec2::new(13.0, 5.0), 5.0, &rect).unwrap();
        assert!((c.normal - Vec2::X).length() < 1e-6);
        assert!((c.overlap - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_on_boundary_defaults_up() {
        let rect = Rect::new(0.0, 10.0, 40.0, 10.0);
        let c = resolve_circle_rect(Vec2::new(20.0, 10.0), 5.0, &rect).unwrap();
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
        assert!((c.overlap - 5.0).abs() < 1e-6);
        assert!(c.normal.x.is_finite() && c.normal.y.is_finite());
    }

    #[test]
    fn test_circle_inside_exits_nearest_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        let c = resolve_circle_rect(Vec2::new(50.0, 15.0), 4.0, &rect).unwrap();
        assert_eq!(c.normal, Vec2::new(0.0, 1.0));
        assert!((c.overlap - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_circle_circle_coincident() {
        let c = resolve_circle_circle(Vec2::ONE, Vec2::ONE, 10.0).unwrap();
        assert_eq!(c.normal, Vec2::new(0.0, -1.0));
        assert_eq!(c.overlap, 10.0);
    }

    #[test]
    fn test_reflect_velocity() {
        let v = Vec2::new(3.0, -4.0);
        let r = reflect_velocity(v, Vec2::new(0.0, 2.0), 1.0);
        assert!((r - Vec2::new(3.0, 4.0)).length() < 1e-6);
        let d = reflect_velocity(v, Vec2::new(0.0, 1.0), 0.5);
        assert!((d.length() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_merge_row_then_column() {
        let cells = [
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(10.0, 0.0, 10.0, 10.0),
            Rect::new(0.0, 10.0, 10.0, 10.0),
            Rect::new(10.0, 10.0, 10.0, 10.0),
            Rect::new(40.0, 0.0, 10.0, 10.0),
        ];
        let merged = merge_axis_aligned_rects(&cells);
        assert_eq!(
            merged,
            vec![Rect::new(0.0, 0.0, 20.0, 20.0), Rect::new(40.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn test_merge_overlapping_same_row() {
        let merged = merge_axis_aligned_rects(&[
            Rect::new(0.0, 0.0, 30.0, 10.0),
            Rect::new(20.0, 0.0, 30.0, 10.0),
        ]);
        assert_eq!(merged, vec![Rect::new(0.0, 0.0, 50.0, 10.0)]);
    }

    proptest! {
        #[test]
        fn prop_point_in_polygon_matches_crossing_number(
            poly in star_polygon(),
            px in 0.0f32..100.0,
            py in 0.0f32..100.0,
        ) {
            let p = Vec2::new(px, py);
            let n = poly.len();
            let near_edge = (0..n).any(|i| dist_to_segment(p, poly[i], poly[(i + 1) % n]) < 1e-3);
            let near_vertex_row = poly.iter().any(|v| (v.y - p.y).abs() < 1e-3);
            prop_assume!(!near_edge && !near_vertex_row);
            prop_assert_eq!(point_in_polygon(p, &poly), crossing_number(p, &poly) % 2 == 1);
        }

        #[test]
        fn prop_circle_rect_resolution_separates(
            rx in -50.0f32..50.0, ry in -50.0f32..50.0,
            rw in 1.0f32..60.0, rh in 1.0f32..60.0,
            cx in -80.0f32..120.0, cy in -80.0f32..120.0,
            radius in 0.5f32..30.0,
        ) {
            let rect = Rect::new(rx, ry, rw, rh);
            let center = Vec2::new(cx, cy);
            if let Some(contact) = resolve_circle_rect(center, radius, &rect) {
                prop_assert!(contact.overlap >= 0.0);
                prop_assert!((contact.normal.length() - 1.0).abs() < 1e-6);
                let moved = center + contact.normal * contact.overlap;
                let dist = moved.distance(rect.clamp_point(moved));
                prop_assert!(dist >= radius - 1e-3, "dist {} radius {}", dist, radius);
            }
        }

        #[test]
        fn prop_double_reflection_restores(
            vx in -500.0f32..500.0, vy in -500.0f32..500.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::from_angle(angle);
            let twice = reflect_velocity(reflect_velocity(v, n, 1.0), n, 1.0);
            prop_assert!((twice - v).length() < 1e-2);
        }

        #[test]
        fn prop_damped_reflection_shrinks(
            vx in -500.0f32..500.0, vy in -500.0f32..500.0,
            angle in 0.0f32..std::f32::consts::TAU,
            damping in 0.05f32..0.95,
        ) {
            let v = Vec2::new(vx, vy);
            prop_assume!(v.length() > 1e-3);
            let n = Vec2::from_angle(angle);
            let once = reflect_velocity(v, n, damping);
            let twice = reflect_velocity(once, n, damping);
            prop_assert!(once.length() < v.length());
            prop_assert!(twice.length() < once.length());
        }

        #[test]
        fn prop_merge_idempotent_and_area_preserving(
            cells in prop::collection::btree_set((0u8..10, 0u8..10), 0..60),
        ) {
            let cells: BTreeSet<(u8, u8)> = cells;
            let rects: Vec<Rect> = cells
                .iter()
                .map(|&(x, y)| Rect::new(x as f32 * 20.0, y as f32 * 20.0, 20.0, 20.0))
                .collect();
            let merged = merge_axis_aligned_rects(&rects);
            let area: f32 = merged.iter().map(Rect::area).sum();
            prop_assert_eq!(area, cells.len() as f32 * 400.0);
            prop_assert!(merged.len() <= rects.len());
            prop_assert_eq!(merge_axis_aligned_rects(&merged), merged);
        }
    }
}
