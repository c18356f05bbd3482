//! Lawn defense: plant defenders on a 9x5 grid, hold off zombie waves
//!
//! Timings are expressed in 60 Hz frames and advanced by `dt * 60`, so the
//! balance does not depend on the simulation rate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Rect;
use super::input::{InputSampler, Key};
use super::match_state::{MatchConfig, MatchState};
use super::{Game, SimClock};
use crate::consts::FRAME_RATE;

pub const TILE_W: f32 = 80.0;
pub const TILE_H: f32 = 100.0;
pub const HOUSE_W: f32 = 160.0;
pub const STREET_W: f32 = 100.0;
pub const COLS: usize = 9;
pub const ROWS: usize = 5;
pub const MARGIN_TOP: f32 = 80.0;
pub const WIDTH: f32 = HOUSE_W + COLS as f32 * TILE_W + STREET_W;
pub const HEIGHT: f32 = MARGIN_TOP + ROWS as f32 * TILE_H + 20.0;

const ZOMBIE_HP: f32 = 120.0;
const ZOMBIE_BITE: f32 = 0.5;
const PEA_SPEED: f32 = 7.0;
const PEA_DAMAGE: f32 = 20.0;
const PEA_RELOAD: f32 = 90.0;
const SUNFLOWER_PERIOD: f32 = 600.0;
const CHERRY_FUSE: f32 = 50.0;
const CHERRY_RADIUS: f32 = 150.0;
const CHERRY_DAMAGE: f32 = 2000.0;
const MOWER_W: f32 = 60.0;
const MOWER_HOME_X: f32 = HOUSE_W - 50.0;
/// A zombie whose x drops below this has reached the house
const HOUSE_LINE: f32 = HOUSE_W - 70.0;
const HUGE_WAVE_SIZE: usize = 5;
const HUGE_WAVE_GAP: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LawnTuning {
    pub starting_sun: u32,
    pub sun_value: u32,
    /// Pointer distance that collects a sun
    pub collect_radius: f32,
    /// Frames a landed sun stays collectible
    pub sun_lifetime: f32,
    pub first_spawn_interval: f32,
    pub min_spawn_interval: f32,
    /// Frames between spawn-interval reductions
    pub escalation_period: f32,
    pub escalation_step: f32,
    pub huge_wave_period: f32,
}

impl Default for LawnTuning {
    fn default() -> Self {
        Self {
            starting_sun: 200,
            sun_value: 25,
            collect_radius: 40.0,
            sun_lifetime: 800.0,
            first_spawn_interval: 600.0,
            min_spawn_interval: 100.0,
            escalation_period: 600.0,
            escalation_step: 50.0,
            huge_wave_period: 3600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantKind {
    Peashooter,
    Sunflower,
    Wallnut,
    CherryBomb,
}

impl PlantKind {
    pub const ALL: [PlantKind; 4] = [
        PlantKind::Peashooter,
        PlantKind::Sunflower,
        PlantKind::Wallnut,
        PlantKind::CherryBomb,
    ];

    pub const fn cost(self) -> u32 {
        match self {
            PlantKind::Peashooter => 100,
            PlantKind::Sunflower => 50,
            PlantKind::Wallnut => 50,
            PlantKind::CherryBomb => 150,
        }
    }

    pub const fn max_hp(self) -> f32 {
        match self {
            PlantKind::Peashooter => 100.0,
            PlantKind::Sunflower => 80.0,
            PlantKind::Wallnut => 400.0,
            PlantKind::CherryBomb => 999.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PlantKind::Peashooter => "Горохострел",
            PlantKind::Sunflower => "Подсолнух",
            PlantKind::Wallnut => "Орех",
            PlantKind::CherryBomb => "Вишня",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlaceError {
    #[error("outside the lawn")]
    OutOfBounds,
    #[error("cell already has a plant")]
    Occupied,
    #[error("not enough sun: need {need}, have {have}")]
    NotEnoughSun { need: u32, have: u32 },
    #[error("no plant selected")]
    NoSelection,
    #[error("game is over")]
    RoundOver,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    pub kind: PlantKind,
    pub hp: f32,
    /// Reload, production, or fuse counter depending on kind
    pub timer: f32,
}

impl Plant {
    fn new(kind: PlantKind) -> Self {
        Self {
            kind,
            hp: kind.max_hp(),
            timer: if kind == PlantKind::CherryBomb { CHERRY_FUSE } else { 0.0 },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zombie {
    pub row: usize,
    /// Left edge of the 80x100 sprite box
    pub x: f32,
    pub hp: f32,
    /// Pixels per frame
    pub speed: f32,
    pub eating: bool,
}

impl Zombie {
    pub fn new(row: usize, x: f32, speed: f32) -> Self {
        Self {
            row,
            x,
            hp: ZOMBIE_HP,
            speed,
            eating: false,
        }
    }

    pub fn y(&self) -> f32 {
        row_top(self.row)
    }

    fn center(&self) -> Vec2 {
        Vec2::new(self.x + 40.0, self.y() + 50.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pea {
    pub row: usize,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunDrop {
    pub pos: Vec2,
    pub dest_y: f32,
    pub from_sky: bool,
    /// Frames spent collectible
    pub age: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mower {
    pub x: f32,
    pub speed: f32,
    pub active: bool,
    pub used: bool,
}

impl Default for Mower {
    fn default() -> Self {
        Self {
            x: MOWER_HOME_X,
            speed: 0.0,
            active: false,
            used: false,
        }
    }
}

#[inline]
fn row_top(row: usize) -> f32 {
    MARGIN_TOP + row as f32 * TILE_H
}

#[inline]
fn col_left(col: usize) -> f32 {
    HOUSE_W + col as f32 * TILE_W
}

/// Lawn cell rectangle
pub fn cell_rect(row: usize, col: usize) -> Rect {
    Rect::new(col_left(col), row_top(row), TILE_W, TILE_H)
}

/// Lawn cell under a point, if any
pub fn cell_at(p: Vec2) -> Option<(usize, usize)> {
    let lawn = Rect::new(HOUSE_W, MARGIN_TOP, COLS as f32 * TILE_W, ROWS as f32 * TILE_H);
    if !(p.x > lawn.x && p.x < lawn.right() && p.y > lawn.y && p.y < lawn.bottom()) {
        return None;
    }
    let col = ((p.x - HOUSE_W) / TILE_W) as usize;
    let row = ((p.y - MARGIN_TOP) / TILE_H) as usize;
    Some((row.min(ROWS - 1), col.min(COLS - 1)))
}

pub struct LawnGame {
    tuning: LawnTuning,
    pub sun: u32,
    pub selected: Option<PlantKind>,
    plants: Vec<Option<Plant>>,
    pub zombies: Vec<Zombie>,
    pub peas: Vec<Pea>,
    pub suns: Vec<SunDrop>,
    pub mowers: [Mower; ROWS],
    spawn_timer: f32,
    spawn_interval: f32,
    escalation_timer: f32,
    wave_timer: f32,
    /// Frames until each queued huge-wave zombie appears
    pending_spawns: Vec<f32>,
    sky_timer: f32,
    next_sky_sun: f32,
    /// Frames elapsed this round
    pub frames: f32,
    rng: Pcg32,
    pub match_state: MatchState,
    clock: SimClock,
}

impl LawnGame {
    pub fn new(config: &MatchConfig, seed: u64) -> Self {
        Self::with_tuning(config, LawnTuning::default(), seed)
    }

    pub fn with_tuning(config: &MatchConfig, tuning: LawnTuning, seed: u64) -> Self {
        Self {
            tuning,
            sun: tuning.starting_sun,
            selected: None,
            plants: vec![None; ROWS * COLS],
            zombies: Vec::new(),
            peas: Vec::new(),
            suns: Vec::new(),
            mowers: [Mower::default(); ROWS],
            spawn_timer: 0.0,
            spawn_interval: tuning.first_spawn_interval,
            escalation_timer: 0.0,
            wave_timer: 0.0,
            pending_spawns: Vec::new(),
            sky_timer: 0.0,
            next_sky_sun: 300.0,
            frames: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        }
    }

    pub fn plant(&self, row: usize, col: usize) -> Option<&Plant> {
        self.plants.get(row * COLS + col).and_then(Option::as_ref)
    }

    /// Plants with their grid coordinates
    pub fn plants(&self) -> impl Iterator<Item = (usize, usize, &Plant)> {
        self.plants
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i / COLS, i % COLS, p)))
    }

    pub fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    pub fn select(&mut self, kind: Option<PlantKind>) {
        self.selected = kind;
    }

    /// Spend sun and plant `kind` at a cell
    pub fn place(&mut self, kind: PlantKind, row: usize, col: usize) -> Result<(), PlaceError> {
        if self.match_state.is_over() {
            return Err(PlaceError::RoundOver);
        }
        if row >= ROWS || col >= COLS {
            return Err(PlaceError::OutOfBounds);
        }
        let slot = &mut self.plants[row * COLS + col];
        if slot.is_some() {
            return Err(PlaceError::Occupied);
        }
        let need = kind.cost();
        if self.sun < need {
            return Err(PlaceError::NotEnoughSun {
                need,
                have: self.sun,
            });
        }
        self.sun -= need;
        *slot = Some(Plant::new(kind));
        Ok(())
    }

    /// Plant the selected kind at a clicked point; clears the selection on success
    pub fn place_at(&mut self, p: Vec2) -> Result<(), PlaceError> {
        let kind = self.selected.ok_or(PlaceError::NoSelection)?;
        let (row, col) = cell_at(p).ok_or(PlaceError::OutOfBounds)?;
        self.place(kind, row, col)?;
        self.selected = None;
        Ok(())
    }

    /// Put a zombie on the lawn directly
    pub fn spawn_zombie_at(&mut self, row: usize, x: f32, speed: f32) {
        self.zombies.push(Zombie::new(row.min(ROWS - 1), x, speed));
    }

    fn spawn_random_zombie(&mut self) {
        let row = self.rng.random_range(0..ROWS);
        let speed = 0.2 + self.rng.random::<f32>() * 0.25;
        self.zombies.push(Zombie::new(row, WIDTH + 20.0, speed));
    }

    fn update_spawning(&mut self, frames: f32) {
        self.escalation_timer += frames;
        while self.escalation_timer >= self.tuning.escalation_period {
            self.escalation_timer -= self.tuning.escalation_period;
            self.spawn_interval = (self.spawn_interval - self.tuning.escalation_step)
                .max(self.tuning.min_spawn_interval);
        }

        self.spawn_timer += frames;
        if self.spawn_timer > self.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_random_zombie();
        }

        self.wave_timer += frames;
        if self.wave_timer >= self.tuning.huge_wave_period {
            self.wave_timer -= self.tuning.huge_wave_period;
            log::info!("Huge wave incoming");
            self.pending_spawns
                .extend((0..HUGE_WAVE_SIZE).map(|i| i as f32 * HUGE_WAVE_GAP));
        }
        let mut due = 0;
        self.pending_spawns.retain_mut(|delay| {
            *delay -= frames;
            if *delay <= 0.0 {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            self.spawn_random_zombie();
        }

        self.sky_timer += frames;
        if self.sky_timer > self.next_sky_sun {
            self.sky_timer = 0.0;
            self.next_sky_sun = self.rng.random_range(300.0..600.0);
            let x = HOUSE_W + self.rng.random::<f32>() * COLS as f32 * TILE_W;
            let dest_y = MARGIN_TOP + self.rng.random::<f32>() * (ROWS as f32 * TILE_H - 50.0);
            self.suns.push(SunDrop {
                pos: Vec2::new(x, -50.0),
                dest_y,
                from_sky: true,
                age: 0.0,
            });
        }
    }

    fn update_plants(&mut self, frames: f32) {
        for idx in 0..self.plants.len() {
            let (row, col) = (idx / COLS, idx % COLS);
            let Some(plant) = self.plants[idx].as_mut() else {
                continue;
            };
            let origin = Vec2::new(col_left(col), row_top(row));
            match plant.kind {
                PlantKind::Sunflower => {
                    plant.timer += frames;
                    if plant.timer >= SUNFLOWER_PERIOD {
                        plant.timer = 0.0;
                        let drop = self.rng.random::<f32>() * 40.0 + 20.0;
                        self.suns.push(SunDrop {
                            pos: origin + Vec2::splat(10.0),
                            dest_y: origin.y + 10.0 + drop,
                            from_sky: false,
                            age: 0.0,
                        });
                    }
                }
                PlantKind::Peashooter => {
                    plant.timer += frames;
                    let has_target = self.zombies.iter().any(|z| z.row == row && z.x > origin.x);
                    if plant.timer >= PEA_RELOAD && has_target {
                        plant.timer = 0.0;
                        self.peas.push(Pea {
                            row,
                            pos: origin + Vec2::new(50.0, 20.0),
                        });
                    }
                }
                PlantKind::CherryBomb => {
                    plant.timer -= frames;
                    if plant.timer <= 0.0 {
                        let center = origin + Vec2::new(TILE_W, TILE_H) * 0.5;
                        for z in &mut self.zombies {
                            if z.center().distance(center) < CHERRY_RADIUS {
                                z.hp -= CHERRY_DAMAGE;
                            }
                        }
                        self.plants[idx] = None;
                    }
                }
                PlantKind::Wallnut => {}
            }
        }
    }

    fn update_mowers(&mut self, frames: f32) {
        for (row, mower) in self.mowers.iter_mut().enumerate() {
            if mower.used {
                continue;
            }
            if mower.active {
                mower.x += mower.speed * frames;
                mower.speed += frames;
                for z in self.zombies.iter_mut().filter(|z| z.row == row) {
                    if z.x < mower.x + MOWER_W && z.x > mower.x - 50.0 {
                        z.hp = 0.0;
                    }
                }
                if mower.x > WIDTH {
                    mower.used = true;
                }
            } else if self
                .zombies
                .iter()
                .any(|z| z.row == row && z.x < mower.x + MOWER_W - 20.0)
            {
                log::debug!("Mower {row} triggered");
                mower.active = true;
                mower.speed = 5.0;
            }
        }
    }

    /// Move zombies; returns true if one got into the house
    fn update_zombies(&mut self, frames: f32) -> bool {
        let mut breached = false;
        for z in &mut self.zombies {
            z.eating = false;
            let (bite_l, bite_r) = (z.x + 30.0, z.x + 50.0);
            for col in 0..COLS {
                let idx = z.row * COLS + col;
                let Some(plant) = self.plants[idx].as_mut() else {
                    continue;
                };
                let left = col_left(col);
                if bite_l < left + TILE_W - 20.0 && bite_r > left + 20.0 {
                    z.eating = true;
                    plant.hp -= ZOMBIE_BITE * frames;
                    if plant.hp <= 0.0 {
                        self.plants[idx] = None;
                        z.eating = false;
                    }
                }
            }
            if !z.eating {
                z.x -= z.speed * frames;
            }
            if z.x < HOUSE_LINE && z.hp > 0.0 {
                let mower = &self.mowers[z.row];
                if mower.used || mower.x > z.x {
                    breached = true;
                }
            }
        }
        breached
    }

    fn update_peas(&mut self, frames: f32) {
        let zombies = &mut self.zombies;
        self.peas.retain_mut(|pea| {
            pea.pos.x += PEA_SPEED * frames;
            if let Some(z) = zombies.iter_mut().find(|z| {
                z.row == pea.row && z.hp > 0.0 && pea.pos.x > z.x + 20.0 && pea.pos.x < z.x + 60.0
            }) {
                z.hp -= PEA_DAMAGE;
                return false;
            }
            pea.pos.x <= WIDTH
        });
    }

    fn update_suns(&mut self, frames: f32, pointer: Option<Vec2>) {
        let radius = self.tuning.collect_radius;
        let lifetime = self.tuning.sun_lifetime;
        let mut collected = 0;
        self.suns.retain_mut(|s| {
            if s.pos.y < s.dest_y {
                s.pos.y = (s.pos.y + 1.5 * frames).min(s.dest_y);
            }
            if !s.from_sky || (s.pos.y - s.dest_y).abs() < 5.0 {
                s.age += frames;
            }
            if pointer.is_some_and(|p| p.distance(s.pos) < radius) {
                collected += 1;
                return false;
            }
            s.age <= lifetime
        });
        self.sun += collected * self.tuning.sun_value;
    }
}

impl Game for LawnGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);
        let frames = dt * FRAME_RATE;
        self.frames += frames;

        for (key, kind) in [Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4]
            .into_iter()
            .zip(PlantKind::ALL)
        {
            if input.just_pressed(key) {
                self.selected = Some(kind);
            }
        }
        for &click in input.clicks() {
            if let Err(e) = self.place_at(click) {
                log::debug!("Placement rejected: {e}");
            }
        }

        self.update_spawning(frames);
        self.update_plants(frames);
        self.update_mowers(frames);
        let breached = self.update_zombies(frames);
        self.update_peas(frames);
        self.zombies.retain(|z| z.hp > 0.0);
        self.update_suns(frames, input.pointer());

        if breached {
            self.match_state.declare_defeat();
        }
    }

    fn reset(&mut self) {
        let tuning = self.tuning;
        self.sun = tuning.starting_sun;
        self.selected = None;
        self.plants.fill(None);
        self.zombies.clear();
        self.peas.clear();
        self.suns.clear();
        self.mowers = [Mower::default(); ROWS];
        self.spawn_timer = 0.0;
        self.spawn_interval = tuning.first_spawn_interval;
        self.escalation_timer = 0.0;
        self.wave_timer = 0.0;
        self.pending_spawns.clear();
        self.sky_timer = 0.0;
        self.next_sky_sun = 300.0;
        self.frames = 0.0;
        self.clock.reset();
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        let selected = self.selected.map_or("-", PlantKind::label);
        format!(
            "Солнце: {} | выбрано: {} | зомби: {} | {}",
            self.sun,
            selected,
            self.zombies.len(),
            self.match_state.status_line()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn lawn() -> LawnGame {
        LawnGame::new(&MatchConfig::default(), 11)
    }

    fn run(game: &mut LawnGame, input: &InputSampler, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).round() as u32 {
            game.tick(input, SIM_DT);
        }
    }

    #[test]
    fn test_place_spends_sun_and_rejects_bad_moves() {
        let mut game = lawn();
        assert_eq!(game.place(PlantKind::Peashooter, 0, 0), Ok(()));
        assert_eq!(game.sun, 100);
        assert_eq!(game.place(PlantKind::Wallnut, 0, 0), Err(PlaceError::Occupied));
        assert_eq!(
            game.place(PlantKind::CherryBomb, 1, 1),
            Err(PlaceError::NotEnoughSun { need: 150, have: 100 })
        );
        assert_eq!(game.place(PlantKind::Wallnut, ROWS, 0), Err(PlaceError::OutOfBounds));
        assert_eq!(game.sun, 100);
    }

    #[test]
    fn test_click_places_selected_plant() {
        let mut game = lawn();
        let mut input = InputSampler::new();
        input.key_down(Key::Digit2, 0.0, false);
        input.click(cell_rect(2, 3).center());
        game.tick(&input, SIM_DT);
        assert_eq!(game.plant(2, 3).map(|p| p.kind), Some(PlantKind::Sunflower));
        assert_eq!(game.sun, 150);
        assert!(game.selected.is_none());
    }

    #[test]
    fn test_zombie_eats_wallnut_instead_of_walking() {
        let mut game = lawn();
        game.place(PlantKind::Wallnut, 1, 4).unwrap();
        let left = col_left(4);
        game.spawn_zombie_at(1, left - 20.0, 0.3);
        run(&mut game, &InputSampler::new(), 1.0);
        let z = &game.zombies[0];
        assert!(z.eating);
        assert_eq!(z.x, left - 20.0);
        let hp = game.plant(1, 4).map(|p| p.hp).unwrap_or(0.0);
        assert!((hp - (400.0 - 30.0)).abs() < 1e-2);
    }

    #[test]
    fn test_peashooter_kills_zombie_in_lane() {
        let mut game = lawn();
        game.place(PlantKind::Peashooter, 2, 0).unwrap();
        game.spawn_zombie_at(2, 600.0, 0.0);
        game.zombies[0].hp = 40.0;
        run(&mut game, &InputSampler::new(), 5.0);
        assert!(game.zombies.is_empty());
        assert!(!game.match_state.is_over());
    }

    #[test]
    fn test_cherry_bomb_clears_radius() {
        let mut game = lawn();
        game.place(PlantKind::CherryBomb, 2, 4).unwrap();
        let left = col_left(4);
        game.spawn_zombie_at(2, left + 60.0, 0.0);
        game.spawn_zombie_at(0, WIDTH - 10.0, 0.0);
        run(&mut game, &InputSampler::new(), 1.0);
        assert_eq!(game.zombies.len(), 1);
        assert_eq!(game.zombies[0].row, 0);
        assert!(game.plant(2, 4).is_none());
    }

    #[test]
    fn test_mower_saves_lane_once() {
        let mut game = lawn();
        game.spawn_zombie_at(3, MOWER_HOME_X + 30.0, 0.3);
        run(&mut game, &InputSampler::new(), 3.0);
        assert!(game.zombies.iter().all(|z| z.row != 3));
        assert!(game.mowers[3].used);
        assert!(!game.match_state.is_over());

        game.spawn_zombie_at(3, HOUSE_LINE + 2.0, 1.0);
        run(&mut game, &InputSampler::new(), 0.5);
        assert_eq!(game.match_state.outcome(), Some(crate::sim::match_state::Outcome::Defeat));
    }

    #[test]
    fn test_sun_collected_by_pointer() {
        let mut game = lawn();
        game.suns.push(SunDrop {
            pos: Vec2::new(400.0, 300.0),
            dest_y: 300.0,
            from_sky: true,
            age: 0.0,
        });
        let mut input = InputSampler::new();
        input.set_pointer(Vec2::new(410.0, 310.0));
        game.tick(&input, SIM_DT);
        assert_eq!(game.sun, 225);
        assert!(game.suns.is_empty());
    }

    #[test]
    fn test_uncollected_sun_expires() {
        let mut game = lawn();
        game.suns.push(SunDrop {
            pos: Vec2::new(400.0, 300.0),
            dest_y: 300.0,
            from_sky: false,
            age: 790.0,
        });
        run(&mut game, &InputSampler::new(), 0.5);
        assert!(game.suns.iter().all(|s| s.pos != Vec2::new(400.0, 300.0)));
    }

    #[test]
    fn test_spawning_escalates_and_sky_sun_falls() {
        let mut game = lawn();
        run(&mut game, &InputSampler::new(), 21.0);
        assert!(game.spawn_interval() <= 600.0 - 2.0 * 50.0);
        assert!(!game.zombies.is_empty());
        assert!(!game.suns.is_empty() || game.sun > 200);
    }

    #[test]
    fn test_escalation_never_undercuts_min_interval() {
        // 600 -> 100 in steps of 70 does not land on the floor exactly
        let tuning = LawnTuning {
            escalation_period: 60.0,
            escalation_step: 70.0,
            ..LawnTuning::default()
        };
        let mut game = LawnGame::with_tuning(&MatchConfig::default(), tuning, 5);
        for _ in 0..(12.0 / SIM_DT).round() as u32 {
            game.tick(&InputSampler::new(), SIM_DT);
            assert!(game.spawn_interval() >= tuning.min_spawn_interval);
        }
        assert_eq!(game.spawn_interval(), tuning.min_spawn_interval);
    }

    #[test]
    fn test_reset_clears_lawn() {
        let mut game = lawn();
        game.place(PlantKind::Sunflower, 0, 0).unwrap();
        game.spawn_zombie_at(0, 500.0, 0.3);
        game.reset();
        assert_eq!(game.sun, 200);
        assert!(game.zombies.is_empty());
        assert!(game.plant(0, 0).is_none());
        assert!(game.mowers.iter().all(|m| !m.used && !m.active));
    }
}
