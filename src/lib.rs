//! Math Dash - a three-lane arithmetic runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (task generation, session state, tick)
//! - `runner`: Fixed-timestep frame driver
//! - `controls`: Keyboard bindings
//! - `settings`: Player preferences and speed tuning

pub mod controls;
pub mod error;
pub mod runner;
pub mod settings;
pub mod sim;

pub use error::{SettingsError, TaskError};
pub use runner::Runner;
pub use settings::{Settings, SpeedCurve};

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted by the runner (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    // Score bounds and deltas for scored runs
    pub const INITIAL_SCORE: i32 = 50;
    pub const MIN_SCORE: i32 = 0;
    pub const MAX_SCORE: i32 = 100;
    pub const CORRECT_DELTA: i32 = 10;
    pub const WRONG_DELTA: i32 = -5;

    // Transient feedback lifetimes
    pub const FEEDBACK_DURATION: Duration = Duration::from_millis(1200);
    pub const SOLUTION_DURATION: Duration = Duration::from_millis(1500);
    pub const PULSE_DURATION: Duration = Duration::from_millis(400);
    pub const RECENT_RESULT_DURATION: Duration = Duration::from_millis(2000);

    /// Prefix of the solution reveal after a wrong answer
    pub const SOLUTION_PREFIX: &str = "Richtig ist: ";

    /// Progress at which the runner reaches a checkpoint
    pub const CHECKPOINT_THRESHOLD: f32 = 1.0;
    // Runner speed defaults (progress units per second)
    pub const BASE_SPEED_PLAY: f32 = 0.26;
    pub const BASE_SPEED_TRAINING: f32 = 0.14;
    pub const SPEED_BOOST_PER_CORRECT: f32 = 0.008;
    pub const SPEED_BOOST_CAP_PLAY: f32 = 0.15;
    pub const SPEED_BOOST_CAP_TRAINING: f32 = 0.05;
    pub const MAX_SPEED: f32 = 0.55;

    /// Distractors lie within this distance of the solution
    pub const MAX_PERTURBATION: i32 = 5;
    /// Draws allowed before distractor generation gives up
    pub const MAX_CANDIDATE_ATTEMPTS: u32 = 100;
}
