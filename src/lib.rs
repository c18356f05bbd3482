//! Duo Arcade - two-player browser mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, input, vehicles, per-game rules)
//! - `driver`: Frame loop state machine and schedulers
//! - `renderer`: Pure scene building and the WebGPU pipeline
//! - `profile`: Player names and theme, stored per browser

pub mod driver;
pub mod profile;
pub mod renderer;
pub mod sim;

pub use driver::{FixedStep, GameLoop, LoopPhase, RealTime, Scheduler};
pub use profile::{NameStore, PlayerProfile, Theme};

/// Simulation timing constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.04;
    /// Legacy games were tuned per 60 Hz frame; `x^(dt * FRAME_RATE)` rescales them
    pub const FRAME_RATE: f32 = 60.0;
}

/// Normalize an angle to (-π, π]
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Format a duration in milliseconds as `m:ss.cc`
pub fn format_lap_time(ms: f64) -> String {
    if !ms.is_finite() || ms < 0.0 {
        return "--:--.--".to_string();
    }
    let total_cs = (ms / 10.0).floor() as u64;
    let minutes = total_cs / 6000;
    let seconds = (total_cs / 100) % 60;
    let centis = total_cs % 100;
    format!("{minutes}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(-PI) - PI).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_normalize_angle_huge_magnitude_returns() {
        let n = normalize_angle(1e30);
        assert!(n > -PI && n <= PI + 1e-6);
        let n = normalize_angle(-3.4e38);
        assert!(n > -PI && n <= PI + 1e-6);
    }

    proptest! {
        #[test]
        fn test_normalize_angle_any_magnitude(a in -1e30f32..1e30f32) {
            let n = normalize_angle(a);
            prop_assert!(n > -PI - 1e-6 && n <= PI + 1e-6, "{a} -> {n}");
        }
    }

    #[test]
    fn test_format_lap_time() {
        assert_eq!(format_lap_time(0.0), "0:00.00");
        assert_eq!(format_lap_time(83_456.0), "1:23.45");
        assert_eq!(format_lap_time(f64::INFINITY), "--:--.--");
    }
}
