//! Red-ball platformer: roll, jump, stomp, reach the flag
//!
//! Levels are loaded from `assets/levels.json`. Actors are one tagged type
//! with a shared [`Body`]; behavior is a match on [`ActorKind`].

use glam::Vec2;
use serde::Deserialize;

use super::entity::Body;
use super::geometry::{resolve_circle_rect, resolve_rect_rect};
use super::input::{InputSampler, Key};
use super::match_state::{MatchConfig, MatchState, PlayerSlot};
use super::{Game, SimClock};
use crate::consts::FRAME_RATE;

pub const VIEW_WIDTH: f32 = 800.0;
pub const VIEW_HEIGHT: f32 = 600.0;
pub const BALL_RADIUS: f32 = 25.0;
pub const MAX_HP: u32 = 3;

const GRAVITY: f32 = 0.6;
const FRICTION: f32 = 0.85;
const ACCELERATION: f32 = 0.8;
const JUMP_FORCE: f32 = -14.0;
const STOMP_BOUNCE: f32 = -8.0;
const CRATE_FRICTION: f32 = 0.85;
const ENEMY_SPEED: f32 = 2.0;
const ENEMY_SIZE: f32 = 50.0;
const FLAG_SIZE: Vec2 = Vec2::new(50.0, 100.0);
/// Frames of invulnerability after a hit
const INVULNERABLE_FRAMES: f32 = 60.0;
const FALL_LIMIT: f32 = VIEW_HEIGHT + 300.0;
const CAMERA_LERP: f32 = 0.1;

const LEVELS_JSON: &str = include_str!("../../assets/levels.json");

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActorKind {
    Ground,
    Crate,
    Enemy { start_x: f32, range: f32, dir: f32, alive: bool },
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub body: Body,
    pub kind: ActorKind,
}

impl Actor {
    fn is_solid(&self) -> bool {
        matches!(self.kind, ActorKind::Ground | ActorKind::Crate)
    }

    fn update(&mut self, f: f32) {
        match &mut self.kind {
            ActorKind::Crate => {
                self.body.vel.x *= CRATE_FRICTION.powf(f);
                self.body.vel.y += GRAVITY * f;
                self.body.pos += self.body.vel * f;
            }
            ActorKind::Enemy {
                start_x,
                range,
                dir,
                alive: true,
            } => {
                self.body.pos.x += ENEMY_SPEED * *dir * f;
                if self.body.pos.x > *start_x + *range {
                    *dir = -1.0;
                }
                if self.body.pos.x < *start_x {
                    *dir = 1.0;
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ActorDoc {
    Ground { x: f32, y: f32, w: f32, h: f32 },
    Crate { x: f32, y: f32, w: f32, h: f32 },
    Enemy { x: f32, y: f32, range: f32 },
    Flag { x: f32, y: f32 },
}

impl From<ActorDoc> for Actor {
    fn from(doc: ActorDoc) -> Self {
        match doc {
            ActorDoc::Ground { x, y, w, h } => Actor {
                body: Body::new(x, y, w, h),
                kind: ActorKind::Ground,
            },
            ActorDoc::Crate { x, y, w, h } => Actor {
                body: Body::new(x, y, w, h),
                kind: ActorKind::Crate,
            },
            ActorDoc::Enemy { x, y, range } => Actor {
                body: Body::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
                kind: ActorKind::Enemy {
                    start_x: x,
                    range,
                    dir: 1.0,
                    alive: true,
                },
            },
            ActorDoc::Flag { x, y } => Actor {
                body: Body::new(x, y, FLAG_SIZE.x, FLAG_SIZE.y),
                kind: ActorKind::Flag,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct LevelDoc {
    start: [f32; 2],
    actors: Vec<ActorDoc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub start: Vec2,
    pub actors: Vec<Actor>,
}

impl Level {
    fn flat() -> Self {
        Self {
            start: Vec2::new(100.0, 300.0),
            actors: vec![
                ActorDoc::Ground { x: 0.0, y: 500.0, w: 1200.0, h: 100.0 }.into(),
                ActorDoc::Flag { x: 1100.0, y: 400.0 }.into(),
            ],
        }
    }
}

/// Parse a level list; falls back to one flat level on malformed input
pub fn load_levels(json: &str) -> Vec<Level> {
    match serde_json::from_str::<Vec<LevelDoc>>(json) {
        Ok(docs) if !docs.is_empty() => docs
            .into_iter()
            .map(|doc| Level {
                start: Vec2::from(doc.start),
                actors: doc.actors.into_iter().map(Actor::from).collect(),
            })
            .collect(),
        Ok(_) => vec![Level::flat()],
        Err(e) => {
            log::warn!("Bad level data, using a flat level: {e}");
            vec![Level::flat()]
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub hp: u32,
    /// Frames of invulnerability left
    pub invulnerable: f32,
    pub grounded: bool,
}

impl Ball {
    fn spawn(at: Vec2, hp: u32) -> Self {
        Self {
            pos: at,
            vel: Vec2::ZERO,
            rotation: 0.0,
            hp,
            invulnerable: 0.0,
            grounded: false,
        }
    }
}

pub struct PlatformerGame {
    levels: Vec<Level>,
    level_idx: usize,
    pub ball: Ball,
    pub actors: Vec<Actor>,
    pub camera_x: f32,
    pub match_state: MatchState,
    clock: SimClock,
}

impl PlatformerGame {
    pub fn new(config: &MatchConfig) -> Self {
        Self::with_levels(config, load_levels(LEVELS_JSON))
    }

    pub fn with_levels(config: &MatchConfig, levels: Vec<Level>) -> Self {
        let levels = if levels.is_empty() { vec![Level::flat()] } else { levels };
        let mut game = Self {
            ball: Ball::spawn(levels[0].start, MAX_HP),
            actors: levels[0].actors.clone(),
            levels,
            level_idx: 0,
            camera_x: 0.0,
            match_state: MatchState::new(config),
            clock: SimClock::default(),
        };
        game.load_level(0);
        game
    }

    pub fn level_index(&self) -> usize {
        self.level_idx
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Load a level, keeping the current hp
    pub fn load_level(&mut self, idx: usize) {
        let idx = idx.min(self.levels.len() - 1);
        let level = &self.levels[idx];
        self.level_idx = idx;
        self.actors = level.actors.clone();
        self.ball = Ball::spawn(level.start, self.ball.hp);
        self.camera_x = 0.0;
    }

    fn take_damage(&mut self) {
        if self.ball.invulnerable > 0.0 {
            return;
        }
        self.ball.hp = self.ball.hp.saturating_sub(1);
        self.ball.invulnerable = INVULNERABLE_FRAMES;
        log::debug!("Ball hit, hp {}", self.ball.hp);
        if self.ball.hp == 0 {
            self.match_state.declare_defeat();
        }
    }

    fn check_grounded(&mut self) {
        let ball = &mut self.ball;
        ball.grounded = false;
        for actor in self.actors.iter().filter(|a| a.is_solid()) {
            let rect = actor.body.rect();
            if ball.pos.x + BALL_RADIUS <= rect.x || ball.pos.x - BALL_RADIUS >= rect.right() {
                continue;
            }
            let bottom = ball.pos.y + BALL_RADIUS;
            if bottom >= rect.y - 2.0 && bottom <= rect.y + 10.0 {
                if bottom > rect.y {
                    ball.pos.y = rect.y - BALL_RADIUS;
                }
                ball.vel.y = 0.0;
                ball.grounded = true;
                break;
            }
        }
    }

    /// Move the ball; returns false if it fell out of the level
    fn update_ball(&mut self, input: &InputSampler, f: f32) -> bool {
        let right = input.is_held(Key::D) || input.is_held(Key::ArrowRight);
        let left = input.is_held(Key::A) || input.is_held(Key::ArrowLeft);
        let jump = [Key::Space, Key::W, Key::ArrowUp]
            .into_iter()
            .any(|k| input.is_held(k));

        let ball = &mut self.ball;
        if right {
            ball.vel.x += ACCELERATION * f;
        }
        if left {
            ball.vel.x -= ACCELERATION * f;
        }
        ball.vel.x *= FRICTION.powf(f);
        ball.pos.x += ball.vel.x * f;
        ball.rotation += ball.vel.x * f / BALL_RADIUS;
        ball.vel.y += GRAVITY * f;
        ball.pos.y += ball.vel.y * f;

        self.check_grounded();

        let ball = &mut self.ball;
        if jump && ball.grounded {
            ball.vel.y = JUMP_FORCE;
            ball.grounded = false;
        }
        ball.invulnerable = (ball.invulnerable - f).max(0.0);
        ball.pos.y <= FALL_LIMIT
    }

    fn collide_ball(&mut self) {
        let ball = &mut self.ball;
        for actor in self.actors.iter_mut().filter(|a| a.is_solid()) {
            let Some(contact) = resolve_circle_rect(ball.pos, BALL_RADIUS, &actor.body.rect()) else {
                continue;
            };
            let n = contact.normal;
            if actor.kind == ActorKind::Crate && n.x.abs() > 0.7 {
                actor.body.vel.x += ball.vel.x * 0.5;
                ball.vel.x *= 0.5;
                ball.pos.x += n.x * contact.overlap * 0.2;
                continue;
            }
            ball.pos += n * contact.overlap;
            if n.y < -0.5 {
                ball.vel.y = 0.0;
                ball.grounded = true;
            } else if n.y > 0.5 {
                ball.vel.y = 0.0;
            }
            if n.x.abs() > 0.7 {
                ball.vel.x = 0.0;
            }
        }
    }

    fn collide_crates(&mut self) {
        for i in 0..self.actors.len() {
            if self.actors[i].kind != ActorKind::Crate {
                continue;
            }
            for j in 0..self.actors.len() {
                if i == j || !self.actors[j].is_solid() {
                    continue;
                }
                let other = self.actors[j].body.rect();
                let body = &mut self.actors[i].body;
                if let Some(push) = resolve_rect_rect(&body.rect(), &other) {
                    body.pos += push;
                    if push.x != 0.0 {
                        body.vel.x = 0.0;
                    } else {
                        body.vel.y = 0.0;
                    }
                }
            }
        }
    }

    fn collide_enemies(&mut self) {
        let mut hurt_by = None;
        let ball = &mut self.ball;
        for actor in &mut self.actors {
            let ActorKind::Enemy { alive, .. } = &mut actor.kind else {
                continue;
            };
            if !*alive {
                continue;
            }
            let rect = actor.body.rect();
            let touching = ball.pos.x + BALL_RADIUS > rect.x
                && ball.pos.x - BALL_RADIUS < rect.right()
                && ball.pos.y + BALL_RADIUS > rect.y
                && ball.pos.y - BALL_RADIUS < rect.bottom();
            if !touching {
                continue;
            }
            if ball.vel.y > 0.0 && ball.pos.y < rect.y + 20.0 {
                *alive = false;
                ball.vel.y = STOMP_BOUNCE;
            } else {
                hurt_by = Some(rect.x);
            }
        }
        if let Some(enemy_x) = hurt_by {
            self.take_damage();
            self.ball.vel.x = if self.ball.pos.x < enemy_x { -10.0 } else { 10.0 };
            self.ball.vel.y = -5.0;
        }
    }

    fn reached_flag(&self) -> bool {
        self.actors.iter().any(|a| {
            a.kind == ActorKind::Flag
                && (self.ball.pos.x - a.body.pos.x).abs() < 50.0
                && (self.ball.pos.y - a.body.pos.y).abs() < 100.0
        })
    }
}

impl Game for PlatformerGame {
    fn tick(&mut self, input: &InputSampler, dt: f32) {
        if self.match_state.is_over() {
            return;
        }
        self.clock.advance(dt);
        let f = dt * FRAME_RATE;

        if !self.update_ball(input, f) {
            self.take_damage();
            if !self.match_state.is_over() {
                self.load_level(self.level_idx);
            }
            return;
        }

        for actor in &mut self.actors {
            actor.update(f);
        }
        self.collide_ball();
        self.collide_crates();
        self.collide_enemies();
        if self.match_state.is_over() {
            return;
        }

        if self.reached_flag() {
            if self.level_idx + 1 >= self.levels.len() {
                log::info!("Final flag reached");
                self.match_state.declare_winner(PlayerSlot::One);
                return;
            }
            self.load_level(self.level_idx + 1);
            return;
        }

        let target = (self.ball.pos.x - VIEW_WIDTH * 0.4).max(0.0);
        let blend = 1.0 - (1.0 - CAMERA_LERP).powf(f);
        self.camera_x += (target - self.camera_x) * blend;
    }

    fn reset(&mut self) {
        self.ball.hp = MAX_HP;
        self.load_level(0);
        self.clock.reset();
        self.match_state.new_round();
    }

    fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    fn hud_text(&self) -> String {
        format!(
            "Уровень {}/{} | жизни: {} | {}",
            self.level_idx + 1,
            self.levels.len(),
            self.ball.hp,
            self.match_state.status_line()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::match_state::Outcome;

    fn game() -> PlatformerGame {
        PlatformerGame::new(&MatchConfig::default())
    }

    fn run(game: &mut PlatformerGame, input: &InputSampler, seconds: f32) {
        for _ in 0..(seconds / SIM_DT).round() as u32 {
            game.tick(input, SIM_DT);
        }
    }

    #[test]
    fn test_builtin_levels_have_flags() {
        let levels = load_levels(LEVELS_JSON);
        assert_eq!(levels.len(), 10);
        for level in &levels {
            assert!(level.actors.iter().any(|a| a.kind == ActorKind::Flag));
        }
    }

    #[test]
    fn test_bad_level_data_falls_back() {
        let levels = load_levels("{ nope");
        assert_eq!(levels, vec![Level::flat()]);
    }

    #[test]
    fn test_ball_settles_on_ground() {
        let mut game = game();
        run(&mut game, &InputSampler::new(), 1.5);
        assert!(game.ball.grounded);
        assert!((game.ball.pos.y - (500.0 - BALL_RADIUS)).abs() < 1.0);
    }

    #[test]
    fn test_jump_from_ground() {
        let mut game = game();
        run(&mut game, &InputSampler::new(), 1.5);
        let rest_y = game.ball.pos.y;
        let mut input = InputSampler::new();
        input.key_down(Key::Space, 0.0, false);
        run(&mut game, &input, 0.2);
        assert!(game.ball.pos.y < rest_y - 20.0);
    }

    #[test]
    fn test_fall_costs_hp_and_respawns() {
        let mut game = game();
        game.ball.pos = Vec2::new(475.0, 700.0);
        run(&mut game, &InputSampler::new(), 1.0);
        assert_eq!(game.ball.hp, MAX_HP - 1);
        assert_eq!(game.level_index(), 0);
        assert!(game.ball.pos.y < FALL_LIMIT);
    }

    #[test]
    fn test_stomp_defeats_enemy() {
        let mut game = game();
        game.load_level(1);
        game.ball.pos = Vec2::new(625.0, 330.0);
        game.ball.vel = Vec2::new(0.0, 5.0);
        game.tick(&InputSampler::new(), SIM_DT);
        assert!(game.actors.iter().any(|a| matches!(a.kind, ActorKind::Enemy { alive: false, .. })));
        assert_eq!(game.ball.vel.y, STOMP_BOUNCE);
        assert_eq!(game.ball.hp, MAX_HP);
    }

    #[test]
    fn test_side_contact_hurts_and_knocks_back() {
        let mut game = game();
        game.load_level(1);
        game.ball.pos = Vec2::new(590.0, 375.0);
        game.tick(&InputSampler::new(), SIM_DT);
        assert_eq!(game.ball.hp, MAX_HP - 1);
        assert_eq!(game.ball.vel.x, -10.0);
        assert!(game.ball.invulnerable > 0.0);
        game.tick(&InputSampler::new(), SIM_DT);
        assert_eq!(game.ball.hp, MAX_HP - 1);
    }

    #[test]
    fn test_flag_advances_and_final_flag_wins() {
        let mut game = game();
        game.ball.pos = Vec2::new(1700.0, 440.0);
        game.tick(&InputSampler::new(), SIM_DT);
        assert_eq!(game.level_index(), 1);

        let last = game.level_count() - 1;
        game.load_level(last);
        game.ball.pos = Vec2::new(1850.0, 440.0);
        game.tick(&InputSampler::new(), SIM_DT);
        assert_eq!(game.match_state.winner(), Some(PlayerSlot::One));
    }

    #[test]
    fn test_last_hp_lost_is_defeat() {
        let mut game = game();
        game.ball.hp = 1;
        game.ball.pos = Vec2::new(475.0, 880.0);
        run(&mut game, &InputSampler::new(), 0.5);
        assert_eq!(game.match_state.outcome(), Some(Outcome::Defeat));

        game.reset();
        assert_eq!(game.ball.hp, MAX_HP);
        assert!(!game.match_state.is_over());
    }

    #[test]
    fn test_ball_pushes_crate() {
        let mut game = game();
        game.load_level(2);
        let start_x = game.actors[1].body.pos.x;
        game.ball.pos = Vec2::new(340.0, 475.0);
        let mut input = InputSampler::new();
        input.key_down(Key::D, 0.0, false);
        run(&mut game, &input, 1.0);
        assert_eq!(game.actors[1].kind, ActorKind::Crate);
        assert!(game.actors[1].body.pos.x > start_x);
    }
}
