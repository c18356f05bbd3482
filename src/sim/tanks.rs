//! Tanks: two tanks in a walled box, bouncing shells, first to zero hp loses

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Arena, Projectile};
use super::input::{ControlSet, InputSampler};
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::vehicle::{Controls, Vehicle, VehicleParams, resolve_vehicle_pair, step_vehicle};
use super::{Game, SimClock};

pub const ARENA: Arena = Arena::new(640.0, 320.0, 10.0);
pub const MAX_HP: u32 = 5;
/// Shell-to-tank-center distance that counts as a hit
pub const HIT_RADIUS: f32 = 22.0;
const MUZZLE_OFFSET: f32 = 5.0;
/// Fraction of shell velocity transferred to the target as knockback
const KNOCKBACK: f32 = 0.08;

const STARTS: [(Vec2, f32); 2] = [
    (Vec2::new(100.0, 160.0), 0.0),
    (Vec2::new(540.0, 160.0), std::f32::consts::PI),
];

/// Player-adjustable tank settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankTuning {
    /// Top speed (px/s)
    pub speed: f32,
    /// Turn rate (rad/s)
    pub turn_speed: f32,
    pub fire_cooldown_ms: f64,
    pub bullet_speed: f32,
    pub bullet_bounces: u32,
}

impl Default for TankTuning {
    fn default() -> Self {
        Self {
            speed: 180.0,
            turn_speed: 3.0,
            fire_cooldown_ms: 1000.0,
            bullet_speed: 300.0,
            bullet_bounces: 2,
        }
    }
}

impl TankTuning {
    fn vehicle_params(&self) -> VehicleParams {
        let mut params = VehicleParams::tank();
        params.max_speed = self.speed.max(1.0);
        params.accel = params.max_speed * 5.0;
        params.brake = params.max_speed * 10.0 / 3.0;
        params.turn_rate = self.turn_speed;
        params
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tank {
    pub body: Vehicle,
    pub hp: u32,
    last_shot_ms: Option<f64>,
}

impl Tank {
    fn spawn(slot: PlayerSlot) -> Self {
        let (pos, heading) = STARTS[slot.index()];
        Self {
            body: Vehicle::new(pos, heading),
            hp: MAX_HP,
            last_shot_ms: None,
        }
    }
}

pub struct TanksGame {
    tuning: TankTuning,
    params: VehicleParams,
    pub tanks: [Tank; 2],
    pub shells: Vec<Projectile>,
    pub match_state: MatchState,
    clock: SimClock,
}

impl TanksGame {
    pub fn new(config: &MatchConfig) -> Self {
        Self::with_tuning(config, TankTuning::default())
    }

    pub fn with_tuning(config: &MatchConfig, tuning: TankTuning) -> Self {
        Self {
            tuning,
            params: tuning.vehicle_params(),
            tanks: [Tank::spawn(PlayerSlot::One), Tank::spawn(PlayerSlot::Two)],
            shells: Vec::new(),
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        }
    }

    pub fn arena(&self) -> &Arena {
        &ARENA
    }

    pub fn tuning(&self) -> &TankTuning {
        &self.tuning
    }

    /// Change settings mid-match; applies from the next tick
    pub fn set_tuning(&mut self, tuning: TankTuning) {
        self.tuning = tuning;
        self.params = tuning.vehicle_params();
    }

    pub fn tank(&self, slot: PlayerSlot) -> &Tank {
        &self.tanks[slot.index()]
    }

    /// Fire if the cooldown allows. Returns true when a shell was spawned.
    pub fn fire(&mut self, slot: PlayerSlot) -> bool {
        if self.match_state.is_over() {
            return false;
        }
        let now = self.clock.now_ms();
        let tank = &mut self.tanks[slot.index()];
        if let Some(last) = tank.last_shot_ms
            && now - last < self.tuning.fire_cooldown_ms
        {
            return false;
        }
        tank.last_shot_ms = Some(now);
        let dir = tank.body.forward();
        self.shells.push(Projectile {
            pos: tank.body.pos + dir * MUZZLE_OFFSET,
            vel: dir * self.tuning.bullet_speed,
            owner: slot,
            bounces_left: self.tuning.bullet_bounces,
        });
        true
    }

    fn update_shells(&mut self, dt: f32) {
        let mut shells = std::mem::take(&mut self.shells);
        shells.retain_mut(|shell| {
            if !shell.advance(&ARENA, dt) {
                return false;
            }
            let target = shell.owner.other();
            let tank = &mut self.tanks[target.index()];
            if shell.pos.distance_squared(tank.body.pos) >= HIT_RADIUS * HIT_RADIUS {
                return true;
            }
            tank.hp = tank.hp.saturating_sub(1);
            tank.body.drift += shell.vel * KNOCKBACK;
            log::debug!("{:?} hit, hp {}", target, tank.hp);
            if tank.hp == 0 {
                self.match_state.declare_winner(shell.owner);
            }
            false
        });
        self.shells = shells;
    }
}

impl Game for TanksGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);

        for (slot, set) in [(PlayerSlot::One, ControlSet::WASD), (PlayerSlot::Two, ControlSet::ARROWS)] {
            let controls = Controls::sample(input, &set);
            step_vehicle(
                &mut self.tanks[slot.index()].body,
                controls,
                &self.params,
                &ARENA,
                |_| true,
                &[],
                dt,
            );
            if input.is_held(set.action) {
                self.fire(slot);
            }
        }

        let [a, b] = &mut self.tanks;
        resolve_vehicle_pair(&mut a.body, &mut b.body, &self.params);

        self.update_shells(dt);
    }

    fn reset(&mut self) {
        self.tanks = [Tank::spawn(PlayerSlot::One), Tank::spawn(PlayerSlot::Two)];
        self.shells.clear();
        self.clock.reset();
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        format!(
            "{}: {} hp | {}: {} hp | {}",
            self.match_state.name(PlayerSlot::One),
            self.tanks[0].hp,
            self.match_state.name(PlayerSlot::Two),
            self.tanks[1].hp,
            self.match_state.status_line()
        )
    }
}
