//! Shared entity records
//!
//! Games build their own entity structs out of these pieces; there is no
//! inheritance, only composition plus per-game tagged enums.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Contact, Rect, resolve_circle_circle, resolve_circle_rect};
use super::match_state::PlayerSlot;

/// Bounded play area with an inner padding band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub padding: f32,
}

/// Which axes an arena clamp touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Clamped {
    pub x: bool,
    pub y: bool,
}

impl Clamped {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

impl Arena {
    pub const fn new(width: f32, height: f32, padding: f32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    /// Clamp a circle's center inside the padded bounds
    pub fn clamp_circle(&self, pos: &mut Vec2, radius: f32) -> Clamped {
        let inset = self.padding + radius;
        let (min_x, max_x) = (inset, (self.width - inset).max(inset));
        let (min_y, max_y) = (inset, (self.height - inset).max(inset));
        let mut clamped = Clamped::default();
        if pos.x < min_x || pos.x > max_x {
            pos.x = pos.x.clamp(min_x, max_x);
            clamped.x = true;
        }
        if pos.y < min_y || pos.y > max_y {
            pos.y = pos.y.clamp(min_y, max_y);
            clamped.y = true;
        }
        clamped
    }

    /// Whether a point lies inside the unpadded bounds
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Static obstacle, tagged by shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Obstacle {
    Circle { x: f32, y: f32, r: f32 },
    Rect { x: f32, y: f32, w: f32, h: f32 },
}

impl Obstacle {
    pub fn circle(center: Vec2, r: f32) -> Self {
        Obstacle::Circle {
            x: center.x,
            y: center.y,
            r,
        }
    }

    pub fn rect(rect: Rect) -> Self {
        Obstacle::Rect {
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
        }
    }

    /// Penetration of a circle into this obstacle
    pub fn resolve_circle(&self, center: Vec2, radius: f32) -> Option<Contact> {
        match *self {
            Obstacle::Circle { x, y, r } => {
                resolve_circle_circle(center, Vec2::new(x, y), r + radius)
            }
            Obstacle::Rect { x, y, w, h } => {
                resolve_circle_rect(center, radius, &Rect::new(x, y, w, h))
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Obstacle::Circle { x, y, r } => x.is_finite() && y.is_finite() && r > 0.0,
            Obstacle::Rect { x, y, w, h } => {
                x.is_finite() && y.is_finite() && w > 0.0 && h > 0.0
            }
        }
    }
}

/// Axis-aligned body: top-left corner, velocity, extent
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// Free-flying projectile with a bounce budget
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: PlayerSlot,
    /// Wall bounces still allowed; the next bounce at zero destroys it
    pub bounces_left: u32,
}

impl Projectile {
    /// Advance and bounce off the arena walls. Returns false once it should be
    /// removed.
    pub fn advance(&mut self, arena: &Arena, dt: f32) -> bool {
        self.pos += self.vel * dt;
        let mut bounced = false;
        if self.pos.x < 0.0 || self.pos.x > arena.width {
            self.vel.x = -self.vel.x;
            self.pos.x = self.pos.x.clamp(0.0, arena.width);
            bounced = true;
        }
        if self.pos.y < 0.0 || self.pos.y > arena.height {
            self.vel.y = -self.vel.y;
            self.pos.y = self.pos.y.clamp(0.0, arena.height);
            bounced = true;
        }
        if bounced {
            if self.bounces_left == 0 {
                return false;
            }
            self.bounces_left -= 1;
        }
        self.pos.is_finite()
    }
}

/// Replace a non-finite position with a known-good fallback
#[inline]
pub fn keep_finite(pos: &mut Vec2, fallback: Vec2) {
    if !pos.is_finite() {
        *pos = fallback;
    }
}
