//! Racing: two cars, laps counted at the finish line, first to the target wins

use serde::{Deserialize, Serialize};

use super::geometry::segments_intersect;
use super::input::{ControlSet, InputSampler};
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::track::{Track, TrackShape};
use super::vehicle::{Controls, Vehicle, VehicleParams, resolve_vehicle_pair, step_vehicle};
use super::{Game, SimClock};
use crate::{format_lap_time, normalize_angle};

/// Lap counting rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceTuning {
    /// Minimum velocity along the finish tangent (px/s) for a crossing to count
    pub min_forward_speed: f32,
    /// Minimum time between two counted crossings of one car
    pub debounce_ms: f64,
    /// Ring tracks: how far from the finish ray (px) a side flip still counts
    pub finish_proximity: f32,
}

impl Default for RaceTuning {
    fn default() -> Self {
        Self {
            min_forward_speed: 20.0,
            debounce_ms: 700.0,
            finish_proximity: 40.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub body: Vehicle,
    pub laps: u32,
    pub best_lap_ms: Option<f64>,
    lap_start_ms: f64,
    last_cross_ms: Option<f64>,
    /// Ring tracks: which side of the finish bearing the car was on last tick
    last_side: Option<i8>,
}

impl Car {
    fn at_start(track: &Track, slot: PlayerSlot) -> Self {
        let start = track.starts[slot.index()];
        Self {
            body: Vehicle::new(start.pos, start.heading),
            laps: 0,
            best_lap_ms: None,
            lap_start_ms: 0.0,
            last_cross_ms: None,
            last_side: None,
        }
    }
}

pub struct RaceGame {
    track: Track,
    params: VehicleParams,
    tuning: RaceTuning,
    pub cars: [Car; 2],
    pub match_state: MatchState,
    clock: SimClock,
}

impl RaceGame {
    pub fn new(config: &MatchConfig, track: Track) -> Self {
        Self::with_tuning(config, track, RaceTuning::default())
    }

    pub fn with_tuning(config: &MatchConfig, track: Track, tuning: RaceTuning) -> Self {
        let cars = [
            Car::at_start(&track, PlayerSlot::One),
            Car::at_start(&track, PlayerSlot::Two),
        ];
        Self {
            track,
            params: VehicleParams::car(),
            tuning,
            cars,
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        }
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn car(&self, slot: PlayerSlot) -> &Car {
        &self.cars[slot.index()]
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    /// Time spent on the current lap
    pub fn current_lap_ms(&self, slot: PlayerSlot) -> f64 {
        self.clock.now_ms() - self.cars[slot.index()].lap_start_ms
    }

    /// Has this car just crossed the finish line forwards?
    fn crossed_finish(&mut self, slot: PlayerSlot, prev: glam::Vec2) -> bool {
        let tangent = self.track.finish_tangent();
        let car = &mut self.cars[slot.index()];
        let pos = car.body.pos;

        let crossed = match &self.track.shape {
            TrackShape::Polygon { finish, .. } => segments_intersect(prev, pos, finish.0, finish.1),
            TrackShape::Ring {
                center,
                inner_radius,
                finish_angle,
                ..
            } => {
                let rel = pos - *center;
                let bearing = normalize_angle(rel.y.atan2(rel.x) - finish_angle);
                let side: i8 = if bearing > 0.0 { 1 } else { -1 };
                let ray = glam::Vec2::from_angle(*finish_angle);
                let along = rel.dot(ray);
                let off_ray = rel.perp_dot(ray).abs();
                let near = off_ray < self.tuning.finish_proximity && along > *inner_radius;
                let flipped = car.last_side.is_some_and(|s| s != side);
                car.last_side = Some(side);
                flipped && near
            }
        };
        if !crossed {
            return false;
        }

        let now = self.clock.now_ms();
        if car
            .last_cross_ms
            .is_some_and(|last| now - last < self.tuning.debounce_ms)
        {
            return false;
        }
        car.body.velocity().dot(tangent) > self.tuning.min_forward_speed
    }

    fn count_lap(&mut self, slot: PlayerSlot) {
        let now = self.clock.now_ms();
        let car = &mut self.cars[slot.index()];
        let lap_ms = now - car.lap_start_ms;
        car.laps += 1;
        car.last_cross_ms = Some(now);
        car.lap_start_ms = now;
        if car.best_lap_ms.is_none_or(|best| lap_ms < best) {
            car.best_lap_ms = Some(lap_ms);
        }
        log::debug!("{slot:?} lap {} in {}", car.laps, format_lap_time(lap_ms));
        if car.laps >= self.track.lap_target {
            self.match_state.declare_winner(slot);
        }
    }
}

impl Game for RaceGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);

        let mut prev = [glam::Vec2::ZERO; 2];
        for (slot, set) in [(PlayerSlot::One, ControlSet::WASD), (PlayerSlot::Two, ControlSet::ARROWS)] {
            let controls = Controls::sample(input, &set);
            let track = &self.track;
            let report = step_vehicle(
                &mut self.cars[slot.index()].body,
                controls,
                &self.params,
                &track.arena,
                |p| track.on_track(p),
                &track.walls,
                dt,
            );
            prev[slot.index()] = report.prev_pos;
        }

        let [a, b] = &mut self.cars;
        resolve_vehicle_pair(&mut a.body, &mut b.body, &self.params);

        for slot in PlayerSlot::BOTH {
            if self.crossed_finish(slot, prev[slot.index()]) {
                self.count_lap(slot);
            }
        }
    }

    fn reset(&mut self) {
        self.cars = [
            Car::at_start(&self.track, PlayerSlot::One),
            Car::at_start(&self.track, PlayerSlot::Two),
        ];
        self.clock.reset();
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        let line = |slot: PlayerSlot| {
            let car = self.car(slot);
            format!(
                "{}: круг {}/{} | тек. {} | лучший {}",
                self.match_state.name(slot),
                car.laps,
                self.track.lap_target,
                format_lap_time(self.current_lap_ms(slot)),
                car.best_lap_ms.map_or_else(|| "--".to_string(), format_lap_time),
            )
        };
        format!(
            "{} | {}\n{}\n{}",
            self.track.name,
            self.match_state.status_line(),
            line(PlayerSlot::One),
            line(PlayerSlot::Two)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::input::Key;
    use crate::sim::track::DEFAULT_CENTER;
    use glam::Vec2;

    fn run(game: &mut RaceGame, input: &InputSampler, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).round() as u32 {
            game.tick(input, SIM_DT);
        }
    }

    /// Put car one just before the top finish line, heading east at speed
    fn approach_finish(game: &mut RaceGame, at: Vec2) {
        let car = &mut game.cars[0];
        car.body.pos = at;
        car.body.heading = 0.0;
        car.body.speed = 200.0;
        car.body.drift = Vec2::ZERO;
        game.cars[1].body.pos = Vec2::new(150.0, 260.0);
    }

    fn throttle() -> InputSampler {
        let mut input = InputSampler::new();
        input.key_down(Key::W, 0.0, false);
        input
    }

    #[test]
    fn test_three_forward_laps_win_ring() {
        let mut game = RaceGame::new(&MatchConfig::new("Аня", "Боря"), Track::default_ring());
        let input = throttle();
        for lap in 1..=3 {
            approach_finish(&mut game, Vec2::new(400.0, 95.0));
            run(&mut game, &input, 1.0);
            assert_eq!(game.car(PlayerSlot::One).laps, lap);
        }
        assert_eq!(game.match_state.winner_name(), Some("Аня"));
        assert_eq!(game.match_state.score(PlayerSlot::One), 1);
        assert!(game.car(PlayerSlot::One).best_lap_ms.is_some());
    }

    /// Hold or release `key` so the sampler matches `want`
    fn hold(input: &mut InputSampler, key: Key, want: bool) {
        if want {
            input.key_down(key, 0.0, false);
        } else {
            input.key_up(key);
        }
    }

    #[test]
    fn test_driven_lap_counts_once() {
        let mut game = RaceGame::new(&MatchConfig::default(), Track::default_ring());
        // Park car two in the infield, clear of the racing line
        game.cars[1].body.pos = DEFAULT_CENTER;
        let mut input = InputSampler::new();

        let mut ticks = 0;
        while game.car(PlayerSlot::One).laps == 0 && ticks < (15.0 / SIM_DT) as u32 {
            let body = game.car(PlayerSlot::One).body;
            let rel = body.pos - DEFAULT_CENTER;
            // Clockwise around the lane middle, steering back toward it
            let off_line = ((rel.length() - 165.0) * 0.01).clamp(-0.5, 0.5);
            let wanted = rel.y.atan2(rel.x) + std::f32::consts::FRAC_PI_2 + off_line;
            let error = normalize_angle(wanted - body.heading);
            hold(&mut input, Key::W, body.speed < 140.0);
            hold(&mut input, Key::D, error > 0.02);
            hold(&mut input, Key::A, error < -0.02);

            game.tick(&input, SIM_DT);
            input.end_tick();
            ticks += 1;
            assert!(game.track().on_track(game.car(PlayerSlot::One).body.pos));
        }

        let car = game.car(PlayerSlot::One);
        assert_eq!(car.laps, 1);
        // ~1000 px of lane at under 140 px/s
        assert!(car.best_lap_ms.is_some_and(|ms| ms > 5000.0));
        assert!(!game.match_state.is_over());
    }

    #[test]
    fn test_crossing_within_debounce_ignored() {
        let mut game = RaceGame::new(&MatchConfig::default(), Track::default_ring());
        let input = throttle();
        approach_finish(&mut game, Vec2::new(400.0, 95.0));
        run(&mut game, &input, 0.4);
        assert_eq!(game.car(PlayerSlot::One).laps, 1);
        approach_finish(&mut game, Vec2::new(400.0, 95.0));
        run(&mut game, &input, 0.6);
        assert_eq!(game.car(PlayerSlot::One).laps, 1);
    }

    #[test]
    fn test_backward_crossing_not_counted() {
        let mut game = RaceGame::new(&MatchConfig::default(), Track::default_ring());
        let car = &mut game.cars[0];
        car.body.pos = Vec2::new(500.0, 95.0);
        car.body.heading = std::f32::consts::PI;
        car.body.speed = 200.0;
        game.cars[1].body.pos = Vec2::new(150.0, 260.0);
        run(&mut game, &throttle(), 1.0);
        assert_eq!(game.car(PlayerSlot::One).laps, 0);
    }

    #[test]
    fn test_polygon_finish_segment() {
        let mut game = RaceGame::new(&MatchConfig::default(), Track::builtin("octagon"));
        let input = throttle();
        approach_finish(&mut game, Vec2::new(420.0, 100.0));
        run(&mut game, &input, 0.5);
        assert_eq!(game.car(PlayerSlot::One).laps, 1);
    }

    #[test]
    fn test_reset_restores_start() {
        let mut game = RaceGame::new(&MatchConfig::default(), Track::default_ring());
        approach_finish(&mut game, Vec2::new(400.0, 95.0));
        run(&mut game, &throttle(), 1.0);
        game.reset();
        let start = game.track().starts[0];
        assert_eq!(game.car(PlayerSlot::One).body.pos, start.pos);
        assert_eq!(game.car(PlayerSlot::One).laps, 0);
        assert!(game.car(PlayerSlot::One).best_lap_ms.is_none());
    }
}
