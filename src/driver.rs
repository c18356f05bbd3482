//! Frame driver: turns display frames into fixed simulation ticks
//!
//! A [`GameLoop`] owns one game and moves through `Idle -> Running ->
//! Finished`. Each frame it asks its [`Scheduler`] how much time passed,
//! runs whole `SIM_DT` substeps while running, then hands the game to the
//! render callback. Once an outcome is set no further ticks run but frames
//! still render, so the final state stays visible.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{Game, InputSampler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Idle,
    Running,
    Finished,
}

/// Source of per-frame elapsed time
pub trait Scheduler {
    /// Seconds of simulation owed for the frame at `timestamp_ms`
    fn frame_dt(&mut self, timestamp_ms: f64) -> f32;

    /// Forget the previous frame, e.g. after a reset or tab switch
    fn reset(&mut self) {}
}

/// Derives dt from animation-frame timestamps, capped to `MAX_FRAME_DT`
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTime {
    last_ms: Option<f64>,
}

impl Scheduler for RealTime {
    fn frame_dt(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) if timestamp_ms >= last => ((timestamp_ms - last) / 1000.0) as f32,
            Some(_) => 0.0,
            None => SIM_DT,
        };
        self.last_ms = Some(timestamp_ms);
        dt.min(MAX_FRAME_DT)
    }

    fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Constant dt per frame whatever the timestamps say; used by tests and the
/// native demo
#[derive(Debug, Clone, Copy)]
pub struct FixedStep {
    pub dt: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self { dt: SIM_DT }
    }
}

impl Scheduler for FixedStep {
    fn frame_dt(&mut self, _timestamp_ms: f64) -> f32 {
        self.dt
    }
}

pub struct GameLoop<G: Game, S: Scheduler = RealTime> {
    game: G,
    scheduler: S,
    phase: LoopPhase,
    accumulator: f32,
    cancelled: bool,
}

impl<G: Game, S: Scheduler> GameLoop<G, S> {
    pub fn new(game: G, scheduler: S) -> Self {
        Self {
            game,
            scheduler,
            phase: LoopPhase::Idle,
            accumulator: 0.0,
            cancelled: false,
        }
    }

    pub fn phase(&self) -> LoopPhase {
        self.phase
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn start(&mut self) {
        if self.cancelled || self.phase != LoopPhase::Idle {
            return;
        }
        self.scheduler.reset();
        self.accumulator = 0.0;
        self.phase = if self.game.is_over() {
            LoopPhase::Finished
        } else {
            LoopPhase::Running
        };
    }

    /// Run one display frame. One-shot inputs are consumed after every
    /// substep. `render` is called unless the loop was cancelled.
    pub fn frame(
        &mut self,
        timestamp_ms: f64,
        input: &mut InputSampler,
        mut render: impl FnMut(&G),
    ) -> LoopPhase {
        if self.cancelled {
            return self.phase;
        }
        let dt = self.scheduler.frame_dt(timestamp_ms);

        if self.phase == LoopPhase::Running {
            self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.game.tick(input, SIM_DT);
                input.end_tick();
                self.accumulator -= SIM_DT;
                substeps += 1;
                if self.game.is_over() {
                    log::info!("Round finished: {}", self.game.match_state().status_line());
                    self.phase = LoopPhase::Finished;
                    self.accumulator = 0.0;
                    break;
                }
            }
            // Guessing and other event-driven games can end between ticks
            if self.phase == LoopPhase::Running && self.game.is_over() {
                self.phase = LoopPhase::Finished;
            }
        }

        render(&self.game);
        self.phase
    }

    /// Back to start-of-round values and running again
    pub fn reset(&mut self) {
        if self.cancelled {
            return;
        }
        self.game.reset();
        self.phase = LoopPhase::Idle;
        self.start();
    }

    /// Pick ticking back up after the game opened a new round by itself
    /// (e.g. a page setting restarted it) without going through [`reset`]
    ///
    /// [`reset`]: GameLoop::reset
    pub fn resume(&mut self) {
        if self.cancelled || self.phase != LoopPhase::Finished || self.game.is_over() {
            return;
        }
        self.scheduler.reset();
        self.accumulator = 0.0;
        self.phase = LoopPhase::Running;
    }

    /// Stop for good; later frames neither tick nor render
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
