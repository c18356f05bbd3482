//! Steerable vehicle physics shared by tanks and race cars
//!
//! A vehicle moves in polar form (heading + scalar speed) plus a cartesian
//! `drift` velocity that carries knockback and bumps. One call to
//! [`step_vehicle`] runs the full per-tick contract:
//!
//! 1. read controls
//! 2. turn, with authority scaled by speed fraction
//! 3. accelerate, brake, or decay; clamp to the reverse/forward range
//! 4. integrate position
//! 5. clamp to the arena with an inelastic bounce
//! 6. apply the terrain rule (off-track speed cap and drag)
//! 7. push out of static obstacles and reflect
//!
//! Step 8, vehicle-vehicle separation, is [`resolve_vehicle_pair`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Obstacle, keep_finite};
use super::geometry::{reflect_velocity, resolve_circle_circle};
use super::input::{ControlSet, InputSampler};
use crate::consts::FRAME_RATE;
use crate::normalize_angle;

/// Tuning for one class of vehicle. Rates are per second; `*_decay` and
/// `*_drag` factors are per 60 Hz frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    pub accel: f32,
    pub brake: f32,
    pub max_speed: f32,
    /// Reverse speed limit as a fraction of `max_speed`
    pub reverse_ratio: f32,
    pub turn_rate: f32,
    /// Turning authority at zero speed (1.0 turns in place)
    pub min_turn_authority: f32,
    pub decay: f32,
    pub stop_speed: f32,
    /// Speed multiplier (negated) when clamped at the arena edge
    pub edge_bounce: f32,
    pub radius: f32,
    pub offroad_speed_ratio: f32,
    pub offroad_drag: f32,
    pub offroad_stop_speed: f32,
    pub wall_damping: f32,
    /// Extra push past the contact so the next tick starts clear
    pub wall_nudge: f32,
    pub pair_min_dist: f32,
    pub pair_restitution: f32,
    pub drift_decay: f32,
}

impl VehicleParams {
    /// Tracked tank: turns in place, bounces hard off the arena edge
    pub fn tank() -> Self {
        Self {
            accel: 900.0,
            brake: 600.0,
            max_speed: 180.0,
            reverse_ratio: 0.5,
            turn_rate: 3.0,
            min_turn_authority: 1.0,
            decay: 0.9,
            stop_speed: 2.0,
            edge_bounce: 0.7,
            radius: 16.0,
            offroad_speed_ratio: 1.0,
            offroad_drag: 1.0,
            offroad_stop_speed: 0.0,
            wall_damping: 0.7,
            wall_nudge: 0.5,
            pair_min_dist: 34.0,
            pair_restitution: 0.2,
            drift_decay: 0.9,
        }
    }

    /// Race car: needs speed to steer, slows hard off the asphalt
    pub fn car() -> Self {
        Self {
            accel: 120.0,
            brake: 220.0,
            max_speed: 300.0,
            reverse_ratio: 0.5,
            turn_rate: 2.6,
            min_turn_authority: 0.2,
            decay: 0.93,
            stop_speed: 2.0,
            edge_bounce: 0.2,
            radius: 14.0,
            offroad_speed_ratio: 0.4,
            offroad_drag: 0.975,
            offroad_stop_speed: 1.0,
            wall_damping: 0.7,
            wall_nudge: 0.5,
            pair_min_dist: 28.0,
            pair_restitution: 0.08,
            drift_decay: 0.85,
        }
    }
}

/// Control intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub throttle: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

impl Controls {
    pub fn sample(input: &InputSampler, set: &ControlSet) -> Self {
        Self {
            throttle: input.is_held(set.up),
            reverse: input.is_held(set.down),
            left: input.is_held(set.left),
            right: input.is_held(set.right),
        }
    }

    fn steer(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub pos: Vec2,
    pub heading: f32,
    pub speed: f32,
    pub drift: Vec2,
}

impl Vehicle {
    pub fn new(pos: Vec2, heading: f32) -> Self {
        Self {
            pos,
            heading: normalize_angle(heading),
            speed: 0.0,
            drift: Vec2::ZERO,
        }
    }

    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.heading)
    }

    /// Combined cartesian velocity
    pub fn velocity(&self) -> Vec2 {
        self.forward() * self.speed + self.drift
    }
}

/// What happened during one vehicle step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub prev_pos: Vec2,
    pub on_track: bool,
    pub hit_wall: bool,
}

/// Advance one vehicle by `dt` seconds. `on_track` is the terrain rule.
pub fn step_vehicle(
    v: &mut Vehicle,
    controls: Controls,
    params: &VehicleParams,
    arena: &Arena,
    on_track: impl Fn(Vec2) -> bool,
    obstacles: &[Obstacle],
    dt: f32,
) -> StepReport {
    let prev_pos = v.pos;
    let frames = dt * FRAME_RATE;

    // Turning
    let speed_frac = (v.speed.abs() / params.max_speed.max(f32::EPSILON)).clamp(0.0, 1.0);
    let authority = params.min_turn_authority + (1.0 - params.min_turn_authority) * speed_frac;
    let gear = if v.speed >= 0.0 { 1.0 } else { -1.0 };
    v.heading = normalize_angle(v.heading + controls.steer() * params.turn_rate * authority * dt * gear);

    // Speed
    if controls.throttle {
        v.speed += params.accel * dt;
    } else if controls.reverse {
        v.speed -= params.brake * dt;
    } else {
        v.speed *= params.decay.powf(frames);
        if v.speed.abs() < params.stop_speed {
            v.speed = 0.0;
        }
    }
    v.speed = v
        .speed
        .clamp(-params.max_speed * params.reverse_ratio, params.max_speed);

    // Integrate
    v.pos += v.forward() * v.speed * dt + v.drift * dt;
    v.drift *= params.drift_decay.powf(frames);
    if v.drift.length_squared() < 1e-4 {
        v.drift = Vec2::ZERO;
    }

    // Arena edge
    let clamped = arena.clamp_circle(&mut v.pos, params.radius);
    if clamped.any() {
        v.speed *= -params.edge_bounce;
    }
    if clamped.x {
        v.drift.x *= -params.edge_bounce;
    }
    if clamped.y {
        v.drift.y *= -params.edge_bounce;
    }

    // Terrain
    let on = on_track(v.pos);
    if !on {
        let cap = params.max_speed * params.offroad_speed_ratio;
        v.speed = v.speed.clamp(-cap, cap) * params.offroad_drag.powf(frames);
        if v.speed.abs() < params.offroad_stop_speed {
            v.speed = 0.0;
        }
    }

    // Static obstacles
    let mut hit_wall = false;
    for obstacle in obstacles {
        let Some(contact) = obstacle.resolve_circle(v.pos, params.radius) else {
            continue;
        };
        hit_wall = true;
        v.pos += contact.normal * (contact.overlap + params.wall_nudge);

        let vel = v.forward() * v.speed;
        if vel.dot(contact.normal) < 0.0 {
            let reflected = reflect_velocity(vel, contact.normal, params.wall_damping);
            let len = reflected.length();
            if len > f32::EPSILON {
                v.heading = normalize_angle(reflected.y.atan2(reflected.x));
            }
            v.speed = len;
        }
        if v.drift.dot(contact.normal) < 0.0 {
            v.drift = reflect_velocity(v.drift, contact.normal, params.wall_damping);
        }
    }

    keep_finite(&mut v.pos, prev_pos);
    if !v.speed.is_finite() {
        v.speed = 0.0;
    }

    StepReport {
        prev_pos,
        on_track: on,
        hit_wall,
    }
}

/// Separate two overlapping vehicles symmetrically and exchange part of
/// their relative velocity. Returns true when they were touching.
pub fn resolve_vehicle_pair(a: &mut Vehicle, b: &mut Vehicle, params: &VehicleParams) -> bool {
    let Some(contact) = resolve_circle_circle(a.pos, b.pos, params.pair_min_dist) else {
        return false;
    };
    let half = contact.normal * (contact.overlap * 0.5);
    a.pos += half;
    b.pos -= half;

    let (va, vb) = (a.velocity(), b.velocity());
    if (va - vb).dot(contact.normal) < 0.0 {
        let exchange = (vb - va) * params.pair_restitution;
        a.drift += exchange;
        b.drift -= exchange;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Wide enough that nothing in these tests reaches an edge
    fn open_arena() -> Arena {
        Arena::new(100_000.0, 100_000.0, 0.0)
    }

    const MID: Vec2 = Vec2::splat(50_000.0);

    fn run(v: &mut Vehicle, controls: Controls, params: &VehicleParams, seconds: f32) {
        let dt = crate::consts::SIM_DT;
        let steps = (seconds / dt).round() as u32;
        for _ in 0..steps {
            step_vehicle(v, controls, params, &open_arena(), |_| true, &[], dt);
        }
    }

    #[test]
    fn test_speed_clamped_to_range() {
        let params = VehicleParams::car();
        let mut v = Vehicle::new(MID, 0.0);
        let gas = Controls {
            throttle: true,
            ..Default::default()
        };
        run(&mut v, gas, &params, 4.0);
        assert!((v.speed - params.max_speed).abs() < 1e-3);

        let mut r = Vehicle::new(MID, 0.0);
        let back = Controls {
            reverse: true,
            ..Default::default()
        };
        run(&mut r, back, &params, 3.0);
        assert!((r.speed + params.max_speed * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_car_cannot_turn_in_place_but_tank_can() {
        let left = Controls {
            left: true,
            ..Default::default()
        };
        let mut car = Vehicle::new(Vec2::splat(500.0), 0.0);
        run(&mut car, left, &VehicleParams::car(), 0.5);
        let mut tank = Vehicle::new(Vec2::splat(500.0), 0.0);
        run(&mut tank, left, &VehicleParams::tank(), 0.5);
        assert!(tank.heading.abs() > car.heading.abs() * 4.0);
        assert!(car.heading < 0.0);
    }

    #[test]
    fn test_decay_stops_vehicle() {
        let params = VehicleParams::car();
        let mut v = Vehicle::new(Vec2::splat(500.0), 0.0);
        v.speed = 100.0;
        run(&mut v, Controls::default(), &params, 2.0);
        assert_eq!(v.speed, 0.0);
    }

    #[test]
    fn test_arena_bounce_reverses_speed() {
        let params = VehicleParams::car();
        let arena = Arena::new(200.0, 200.0, 8.0);
        let mut v = Vehicle::new(Vec2::new(170.0, 100.0), 0.0);
        v.speed = 200.0;
        let gas = Controls {
            throttle: true,
            ..Default::default()
        };
        for _ in 0..20 {
            step_vehicle(&mut v, gas, &params, &arena, |_| true, &[], crate::consts::SIM_DT);
            assert!(v.pos.x <= 200.0 - 8.0 - params.radius + 1e-3);
        }
    }

    #[test]
    fn test_offroad_caps_speed() {
        let params = VehicleParams::car();
        let mut v = Vehicle::new(Vec2::splat(500.0), 0.0);
        v.speed = 300.0;
        step_vehicle(
            &mut v,
            Controls::default(),
            &params,
            &open_arena(),
            |_| false,
            &[],
            crate::consts::SIM_DT,
        );
        assert!(v.speed <= params.max_speed * params.offroad_speed_ratio);
    }

    #[test]
    fn test_wall_reflects_and_dampens() {
        let params = VehicleParams::car();
        let wall = Obstacle::Rect {
            x: 520.0,
            y: 400.0,
            w: 40.0,
            h: 200.0,
        };
        let mut v = Vehicle::new(Vec2::new(507.0, 500.0), 0.0);
        v.speed = 200.0;
        let report = step_vehicle(
            &mut v,
            Controls::default(),
            &params,
            &open_arena(),
            |_| true,
            &[wall],
            crate::consts::SIM_DT,
        );
        assert!(report.hit_wall);
        assert!(v.forward().x < -0.99);
        assert!(v.speed < 200.0 * 0.7);
        assert!(v.pos.x <= 520.0 - params.radius);
    }

    #[test]
    fn test_pair_separates_symmetrically() {
        let params = VehicleParams::tank();
        let mut a = Vehicle::new(Vec2::new(100.0, 100.0), 0.0);
        let mut b = Vehicle::new(Vec2::new(120.0, 100.0), std::f32::consts::PI);
        a.speed = 100.0;
        b.speed = 100.0;
        assert!(resolve_vehicle_pair(&mut a, &mut b, &params));
        assert!((a.pos.distance(b.pos) - params.pair_min_dist).abs() < 1e-3);
        assert!((a.pos.x + b.pos.x - 220.0).abs() < 1e-3);
        assert!(a.drift.x < 0.0 && b.drift.x > 0.0);
    }
}
