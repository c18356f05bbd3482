//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in world pixels.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::sim::Rect;

#[inline]
fn tri(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

#[inline]
fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], color: [f32; 4]) {
    tri(out, corners[0], corners[1], corners[2], color);
    tri(out, corners[2], corners[3], corners[0], color);
}

/// Filled axis-aligned rectangle
pub fn rect(out: &mut Vec<Vertex>, r: &Rect, color: [f32; 4]) {
    quad(
        out,
        [
            Vec2::new(r.x, r.y),
            Vec2::new(r.right(), r.y),
            Vec2::new(r.right(), r.bottom()),
            Vec2::new(r.x, r.bottom()),
        ],
        color,
    );
}

/// Rectangle outline drawn inside `r`
pub fn rect_outline(out: &mut Vec<Vertex>, r: &Rect, width: f32, color: [f32; 4]) {
    let w = width.min(r.w * 0.5).min(r.h * 0.5);
    rect(out, &Rect::new(r.x, r.y, r.w, w), color);
    rect(out, &Rect::new(r.x, r.bottom() - w, r.w, w), color);
    rect(out, &Rect::new(r.x, r.y + w, w, r.h - 2.0 * w), color);
    rect(out, &Rect::new(r.right() - w, r.y + w, w, r.h - 2.0 * w), color);
}

/// Rectangle of `half` extents rotated by `angle` around `center`
pub fn rotated_rect(out: &mut Vec<Vertex>, center: Vec2, half: Vec2, angle: f32, color: [f32; 4]) {
    let rot = Vec2::from_angle(angle);
    let corner = |x: f32, y: f32| center + rot.rotate(Vec2::new(x, y));
    quad(
        out,
        [
            corner(-half.x, -half.y),
            corner(half.x, -half.y),
            corner(half.x, half.y),
            corner(-half.x, half.y),
        ],
        color,
    );
}

/// Thick line segment
pub fn line(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    if dir == Vec2::ZERO {
        return;
    }
    let side = dir.perp() * (width * 0.5);
    quad(out, [a + side, b + side, b - side, a - side], color);
}

/// Filled circle
pub fn circle(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4], segments: u32) {
    let segments = segments.max(3);
    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;
        tri(
            out,
            center,
            center + Vec2::from_angle(theta1) * radius,
            center + Vec2::from_angle(theta2) * radius,
            color,
        );
    }
}

/// Ring (hollow circle)
pub fn ring(
    out: &mut Vec<Vertex>,
    center: Vec2,
    inner_radius: f32,
    outer_radius: f32,
    color: [f32; 4],
    segments: u32,
) {
    let segments = segments.max(3);
    for i in 0..segments {
        let d1 = Vec2::from_angle((i as f32 / segments as f32) * 2.0 * PI);
        let d2 = Vec2::from_angle(((i + 1) as f32 / segments as f32) * 2.0 * PI);
        quad(
            out,
            [
                center + d1 * inner_radius,
                center + d1 * outer_radius,
                center + d2 * outer_radius,
                center + d2 * inner_radius,
            ],
            color,
        );
    }
}

/// Fan-filled polygon; exact for convex outlines
pub fn convex_polygon(out: &mut Vec<Vertex>, points: &[Vec2], color: [f32; 4]) {
    if points.len() < 3 {
        return;
    }
    for pair in points[1..].windows(2) {
        tri(out, points[0], pair[0], pair[1], color);
    }
}
