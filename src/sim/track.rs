//! Race track descriptions
//!
//! Tracks are JSON documents (see `assets/maps/`). [`Track::parse`] is strict
//! and reports a [`TrackError`]; [`Track::load`] logs the problem and falls
//! back to [`Track::default_ring`] so a bad map never stops a race.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use super::entity::{Arena, Obstacle};
use super::geometry::{Rect, merge_axis_aligned_rects, point_in_polygon, segments_intersect};

pub const DEFAULT_LAP_TARGET: u32 = 3;
const DEFAULT_ARENA: Arena = Arena::new(900.0, 520.0, 8.0);
pub(crate) const DEFAULT_CENTER: Vec2 = Vec2::new(450.0, 260.0);
const DEFAULT_INNER_R: f32 = 110.0;
const DEFAULT_OUTER_R: f32 = 220.0;
const DEFAULT_FINISH_ANGLE: f32 = -FRAC_PI_2;
const DEFAULT_FINISH_WIDTH: f32 = 10.0;
/// Ring starts sit this far (radians) past the finish line
const START_OFFSET: f32 = 0.2;
/// Polygon starts sit this far (px) past the finish line
const POLY_START_GAP: f32 = 24.0;

/// Built-in maps, `(id, json)`
pub const BUILTIN_MAPS: &[(&str, &str)] = &[
    ("ring", include_str!("../../assets/maps/ring.json")),
    ("octagon", include_str!("../../assets/maps/octagon.json")),
    ("pillars", include_str!("../../assets/maps/pillars.json")),
];

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("track JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ring radii must satisfy 0 < inner ({inner}) < outer ({outer})")]
    InvalidRing { inner: f32, outer: f32 },
    #[error("polygon track: {0}")]
    InvalidPolygon(&'static str),
    #[error("unknown track type `{0}`")]
    UnknownType(String),
}

/// Track surface geometry
#[derive(Debug, Clone, PartialEq)]
pub enum TrackShape {
    Ring {
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        finish_angle: f32,
    },
    Polygon {
        outer: Vec<Vec2>,
        inner: Vec<Vec2>,
        /// Directed finish segment; forward travel crosses it toward its left normal
        finish: (Vec2, Vec2),
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPose {
    pub pos: Vec2,
    pub heading: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub arena: Arena,
    pub shape: TrackShape,
    pub finish_width: f32,
    pub walls: Vec<Obstacle>,
    pub starts: [StartPose; 2],
    pub lap_target: u32,
}

// --- raw document -----------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TrackDoc {
    id: Option<String>,
    name: Option<String>,
    size: Option<SizeDoc>,
    arena: Option<SizeDoc>,
    track_type: Option<String>,
    center: Option<CenterDoc>,
    inner_r: Option<f32>,
    outer_r: Option<f32>,
    finish: Option<FinishDoc>,
    lap_target: Option<u32>,
    walls: Vec<serde_json::Value>,
    /// Free-drawn editor cells, merged into rect walls
    colliders: Vec<Rect>,
    #[serde(alias = "spawn")]
    starts: Option<StartsDoc>,
    outer_path: Vec<[f32; 2]>,
    inner_path: Vec<[f32; 2]>,
}

#[derive(Debug, Deserialize)]
struct SizeDoc {
    w: f32,
    h: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CenterDoc {
    cx: Option<f32>,
    cy: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FinishDoc {
    angle: Option<f32>,
    width: Option<f32>,
    p1: Option<[f32; 2]>,
    p2: Option<[f32; 2]>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StartsDoc {
    p1: Option<PoseDoc>,
    p2: Option<PoseDoc>,
}

#[derive(Debug, Deserialize)]
struct PoseDoc {
    x: f32,
    y: f32,
    angle: Option<f32>,
}

fn to_points(path: &[[f32; 2]]) -> Vec<Vec2> {
    path.iter().map(|&[x, y]| Vec2::new(x, y)).collect()
}

/// Closed path with at least 3 vertices and no crossing edges
fn is_simple_polygon(path: &[Vec2]) -> bool {
    let n = path.len();
    if n < 3 || path.iter().any(|p| !p.is_finite()) {
        return false;
    }
    for i in 0..n {
        let (a1, a2) = (path[i], path[(i + 1) % n]);
        for j in (i + 1)..n {
            // Skip edges that share a vertex
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (b1, b2) = (path[j], path[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                return false;
            }
        }
    }
    true
}

fn ring_start(center: Vec2, radius: f32, finish_angle: f32) -> StartPose {
    let a = finish_angle + START_OFFSET;
    StartPose {
        pos: center + Vec2::from_angle(a) * radius,
        heading: crate::normalize_angle(a + FRAC_PI_2),
    }
}

/// Side-by-side grid just past a polygon finish line, facing forward travel
fn poly_starts(finish: (Vec2, Vec2)) -> [StartPose; 2] {
    let (a, b) = finish;
    let tangent = (b - a).perp().normalize_or_zero();
    let heading = crate::normalize_angle(tangent.y.atan2(tangent.x));
    [0.3, 0.7].map(|t| StartPose {
        pos: a.lerp(b, t) + tangent * POLY_START_GAP,
        heading,
    })
}

impl Track {
    /// The engine default: 900x520 ring, finish at the top, 3 laps
    pub fn default_ring() -> Self {
        Self::ring(
            "ring",
            "Кольцо",
            DEFAULT_ARENA,
            DEFAULT_CENTER,
            DEFAULT_INNER_R,
            DEFAULT_OUTER_R,
            DEFAULT_FINISH_ANGLE,
        )
    }

    fn ring(
        id: &str,
        name: &str,
        arena: Arena,
        center: Vec2,
        inner_radius: f32,
        outer_radius: f32,
        finish_angle: f32,
    ) -> Self {
        let lane = outer_radius - inner_radius;
        Self {
            id: id.to_string(),
            name: name.to_string(),
            arena,
            shape: TrackShape::Ring {
                center,
                inner_radius,
                outer_radius,
                finish_angle,
            },
            finish_width: DEFAULT_FINISH_WIDTH,
            walls: Vec::new(),
            starts: [
                ring_start(center, inner_radius + lane * 0.3, finish_angle),
                ring_start(center, inner_radius + lane * 0.7, finish_angle),
            ],
            lap_target: DEFAULT_LAP_TARGET,
        }
    }

    /// Strict parse. Missing optional fields take engine defaults; invalid
    /// geometry is an error.
    pub fn parse(json: &str) -> Result<Self, TrackError> {
        let doc: TrackDoc = serde_json::from_str(json)?;

        let arena = doc
            .size
            .as_ref()
            .or(doc.arena.as_ref())
            .filter(|s| s.w > 0.0 && s.h > 0.0)
            .map(|s| Arena::new(s.w, s.h, DEFAULT_ARENA.padding))
            .unwrap_or(DEFAULT_ARENA);
        let id = doc.id.clone().unwrap_or_else(|| "custom".to_string());
        let name = doc.name.clone().unwrap_or_else(|| id.clone());
        let finish = doc.finish.unwrap_or_default();

        let mut track = match doc.track_type.as_deref().unwrap_or("ring") {
            "ring" => {
                let center = doc.center.unwrap_or_default();
                let center = Vec2::new(
                    center.cx.unwrap_or(DEFAULT_CENTER.x),
                    center.cy.unwrap_or(DEFAULT_CENTER.y),
                );
                let inner = doc.inner_r.unwrap_or(DEFAULT_INNER_R);
                let outer = doc.outer_r.unwrap_or(DEFAULT_OUTER_R);
                if !(inner > 0.0 && inner < outer) || !center.is_finite() {
                    return Err(TrackError::InvalidRing { inner, outer });
                }
                let angle = finish.angle.unwrap_or(DEFAULT_FINISH_ANGLE);
                Self::ring(&id, &name, arena, center, inner, outer, angle)
            }
            "poly" => {
                let outer = to_points(&doc.outer_path);
                let inner = to_points(&doc.inner_path);
                if !is_simple_polygon(&outer) {
                    return Err(TrackError::InvalidPolygon("outer path is not a simple polygon"));
                }
                if !is_simple_polygon(&inner) {
                    return Err(TrackError::InvalidPolygon("inner path is not a simple polygon"));
                }
                let (Some([x1, y1]), Some([x2, y2])) = (finish.p1, finish.p2) else {
                    return Err(TrackError::InvalidPolygon("finish segment missing"));
                };
                let seg = (Vec2::new(x1, y1), Vec2::new(x2, y2));
                if seg.0.distance_squared(seg.1) < 1e-6 {
                    return Err(TrackError::InvalidPolygon("finish segment has zero length"));
                }
                let starts = poly_starts(seg);
                Self {
                    id,
                    name,
                    arena,
                    shape: TrackShape::Polygon {
                        outer,
                        inner,
                        finish: seg,
                    },
                    finish_width: DEFAULT_FINISH_WIDTH,
                    walls: Vec::new(),
                    starts,
                    lap_target: DEFAULT_LAP_TARGET,
                }
            }
            other => return Err(TrackError::UnknownType(other.to_string())),
        };

        if let Some(width) = finish.width.filter(|w| *w > 0.0) {
            track.finish_width = width;
        }
        if let Some(target) = doc.lap_target.filter(|t| *t > 0) {
            track.lap_target = target;
        }
        if let Some(starts) = doc.starts {
            for (slot, pose) in [starts.p1, starts.p2].into_iter().enumerate() {
                if let Some(pose) = pose.filter(|p| p.x.is_finite() && p.y.is_finite()) {
                    track.starts[slot] = StartPose {
                        pos: Vec2::new(pose.x, pose.y),
                        heading: crate::normalize_angle(
                            pose.angle.unwrap_or(track.starts[slot].heading),
                        ),
                    };
                }
            }
        }

        for raw in doc.walls {
            match serde_json::from_value::<Obstacle>(raw) {
                Ok(wall) if wall.is_valid() => track.walls.push(wall),
                Ok(wall) => log::warn!("Skipping degenerate wall {wall:?}"),
                Err(e) => log::warn!("Skipping malformed wall: {e}"),
            }
        }
        track.walls.extend(
            merge_axis_aligned_rects(&doc.colliders)
                .into_iter()
                .map(Obstacle::rect),
        );

        Ok(track)
    }

    /// Lenient load: any error falls back to the default ring
    pub fn load(json: &str) -> Self {
        match Self::parse(json) {
            Ok(track) => {
                log::info!("Loaded track '{}' ({} walls)", track.name, track.walls.len());
                track
            }
            Err(e) => {
                log::warn!("Track rejected ({e}); using default ring");
                Self::default_ring()
            }
        }
    }

    /// Built-in map by id, or the default ring
    pub fn builtin(id: &str) -> Self {
        BUILTIN_MAPS
            .iter()
            .find(|(map_id, _)| *map_id == id)
            .map(|(_, json)| Self::load(json))
            .unwrap_or_else(Self::default_ring)
    }

    /// Terrain rule: is `p` on the asphalt?
    pub fn on_track(&self, p: Vec2) -> bool {
        match &self.shape {
            TrackShape::Ring {
                center,
                inner_radius,
                outer_radius,
                ..
            } => {
                let d = p.distance(*center);
                d >= *inner_radius && d <= *outer_radius
            }
            TrackShape::Polygon { outer, inner, .. } => {
                point_in_polygon(p, outer) && !point_in_polygon(p, inner)
            }
        }
    }

    /// Finish line endpoints, inner edge first
    pub fn finish_segment(&self) -> (Vec2, Vec2) {
        match &self.shape {
            TrackShape::Ring {
                center,
                inner_radius,
                outer_radius,
                finish_angle,
            } => {
                let dir = Vec2::from_angle(*finish_angle);
                (*center + dir * *inner_radius, *center + dir * *outer_radius)
            }
            TrackShape::Polygon { finish, .. } => *finish,
        }
    }

    /// Unit direction of forward travel across the finish line
    pub fn finish_tangent(&self) -> Vec2 {
        let (a, b) = self.finish_segment();
        (b - a).perp().normalize_or_zero()
    }
}
