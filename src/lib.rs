//! Neon Nexus - A top-down survival arena shooter
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (movement, collisions, spawning, particles)
//! - `session`: Menu/Playing/GameOver state machine around the simulation
//! - `commentary`: Fire-and-forget announcer lines from an external narrator
//! - `input`: Input ingestion boundary (sanitizing, key mapping, shared snapshot)
//! - `config`: Data-driven game balance
//! - `renderer`: WebGPU draw pass over the per-tick render snapshot
//! - `platform`: Browser/native platform glue

pub mod commentary;
pub mod config;
pub mod error;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use commentary::{CannedNarrator, CommentaryContext, CommentaryEvent, CommentaryHub, Narrator};
pub use config::SimConfig;
pub use error::{ConfigError, ConfigResult};
pub use input::{InputSnapshot, TickInput};
pub use session::{GameSession, SessionState};
pub use sim::RenderSnapshot;

use glam::Vec2;

/// Reference game constants
pub mod consts {
    /// Logical canvas size (simulation space, y grows downward)
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Nominal frame rate the tick counts are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Score needed per difficulty wave
    pub const SCORE_PER_WAVE: u64 = 500;

    /// Text shown before any commentary arrives
    pub const INITIAL_COMMENTARY: &str = "System: Waiting for pilot...";
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector, or zero for a zero-length (or non-finite) input
#[inline]
pub fn normalize_or_zero(v: Vec2) -> Vec2 {
    let len = v.length();
    if len > 0.0 && len.is_finite() {
        v / len
    } else {
        Vec2::ZERO
    }
}

/// Unit vector pointing from `from` toward `to` (zero if they coincide)
#[inline]
pub fn direction(from: Vec2, to: Vec2) -> Vec2 {
    normalize_or_zero(to - from)
}

/// Both components are finite (no NaN/inf)
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Wave index for a score: floor(score / score_per_wave) + 1
#[inline]
pub fn wave_for_score(score: u64, score_per_wave: u64) -> u32 {
    (score / score_per_wave.max(1)) as u32 + 1
}
