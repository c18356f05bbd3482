//! Keyboard and pointer sampling
//!
//! Browser event handlers only write into [`InputSampler`]; games read it once
//! per tick. Fresh presses and clicks are one-shot and are cleared by
//! [`InputSampler::end_tick`] after every simulation substep.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

/// Keys the games bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
    Enter,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    R,
}

impl Key {
    /// Map a `KeyboardEvent.code` string
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "KeyW" => Key::W,
            "KeyA" => Key::A,
            "KeyS" => Key::S,
            "KeyD" => Key::D,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "Space" => Key::Space,
            "Enter" | "NumpadEnter" => Key::Enter,
            "Digit1" => Key::Digit1,
            "Digit2" => Key::Digit2,
            "Digit3" => Key::Digit3,
            "Digit4" => Key::Digit4,
            "KeyR" => Key::R,
            _ => return None,
        })
    }

    /// Keys whose default browser action (scrolling) must be suppressed
    pub fn scrolls_page(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp | Key::ArrowDown | Key::ArrowLeft | Key::ArrowRight | Key::Space | Key::Enter
        )
    }
}

/// Cardinal direction; screen coordinates, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit grid offset `(dx, dy)`
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Four direction keys plus one action key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSet {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub action: Key,
}

impl ControlSet {
    /// Player one: W/A/S/D + Space
    pub const WASD: ControlSet = ControlSet {
        up: Key::W,
        down: Key::S,
        left: Key::A,
        right: Key::D,
        action: Key::Space,
    };

    /// Player two: arrows + Enter
    pub const ARROWS: ControlSet = ControlSet {
        up: Key::ArrowUp,
        down: Key::ArrowDown,
        left: Key::ArrowLeft,
        right: Key::ArrowRight,
        action: Key::Enter,
    };

    pub fn key_for(&self, dir: Direction) -> Key {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn direction_of(&self, key: Key) -> Option<Direction> {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .find(|&d| self.key_for(d) == key)
    }
}

/// Held keys, press timestamps, and queued one-shot events
#[derive(Debug, Default, Clone)]
pub struct InputSampler {
    pressed: HashSet<Key>,
    last_pressed_at: HashMap<Key, f64>,
    /// Released-to-pressed transitions not yet consumed by a tick
    fresh: Vec<Key>,
    pointer: Option<Vec2>,
    clicks: Vec<Vec2>,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true only for a released-to-pressed
    /// transition; auto-repeat events and already-held keys return false.
    pub fn key_down(&mut self, key: Key, timestamp_ms: f64, repeat: bool) -> bool {
        if repeat || self.pressed.contains(&key) {
            return false;
        }
        self.pressed.insert(key);
        self.last_pressed_at.insert(key, timestamp_ms);
        self.fresh.push(key);
        true
    }

    pub fn key_up(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// Drop every held key (e.g. on window blur or game teardown)
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.fresh.clear();
        self.clicks.clear();
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Whether `key` went down since the last `end_tick`
    pub fn just_pressed(&self, key: Key) -> bool {
        self.fresh.contains(&key)
    }

    pub fn last_pressed_at(&self, key: Key) -> Option<f64> {
        self.last_pressed_at.get(&key).copied()
    }

    /// Direction of the held key in `controls` that was pressed most recently
    pub fn active_direction(&self, controls: &ControlSet) -> Option<Direction> {
        let mut best: Option<(Direction, f64)> = None;
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            let key = controls.key_for(dir);
            if !self.is_held(key) {
                continue;
            }
            let at = self.last_pressed_at(key).unwrap_or(f64::NEG_INFINITY);
            if best.is_none_or(|(_, t)| at >= t) {
                best = Some((dir, at));
            }
        }
        best.map(|(dir, _)| dir)
    }

    /// Fresh direction presses for a control set, in arrival order
    pub fn fresh_directions(&self, controls: &ControlSet) -> impl Iterator<Item = Direction> + '_ {
        let controls = *controls;
        self.fresh
            .iter()
            .filter_map(move |&key| controls.direction_of(key))
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn click(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
        self.clicks.push(pos);
    }

    /// Clicks since the last `end_tick`
    pub fn clicks(&self) -> &[Vec2] {
        &self.clicks
    }

    /// Consume one-shot events; held keys stay held
    pub fn end_tick(&mut self) {
        self.fresh.clear();
        self.clicks.clear();
    }
}
