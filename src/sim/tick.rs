//! Fixed timestep simulation tick
//!
//! Applies player input, counts down feedback timers and moves the runner
//! toward the next checkpoint. Reaching a checkpoint resolves the current
//! task against the lane the runner is in.

use std::time::Duration;

use super::state::{AnswerOutcome, Session, SessionPhase};
use super::task::{Direction, Lane, TaskId};
use crate::consts::CHECKPOINT_THRESHOLD;
use crate::error::TaskError;
use crate::settings::SpeedCurve;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Step one lane left/right (arrow keys)
    pub move_lane: Option<Direction>,
    /// Jump straight to a lane (click/tap)
    pub click_lane: Option<Lane>,
    /// Pause toggle
    pub toggle_pause: bool,
    /// Abandon the run and return to the title screen
    pub back_to_start: bool,
    /// Restart with the same configuration
    pub retry: bool,
    /// Idle/demo mode - AI steers toward the right answer
    pub idle_mode: bool,
}

/// Real-time approach toward the next checkpoint
///
/// Lives outside [`Session`]: the session only learns about checkpoints
/// through `resolve_checkpoint`.
#[derive(Debug, Clone, Default)]
pub struct ProgressDriver {
    curve: SpeedCurve,
    /// 0.0 at the start of a task, checkpoint at 1.0
    progress: f32,
    paused: bool,
    /// Task the current progress belongs to
    tracked_task: Option<TaskId>,
}

impl ProgressDriver {
    pub fn new(curve: SpeedCurve) -> Self {
        Self {
            curve,
            ..Default::default()
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Forget accumulated progress and pause state
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.paused = false;
        self.tracked_task = None;
    }

    /// Current approach speed; zero unless active and unpaused
    pub fn speed(&self, session: &Session) -> f32 {
        match session.phase() {
            SessionPhase::Active(intent) if !self.paused => {
                self.curve.speed(intent, session.stats().correct)
            }
            _ => 0.0,
        }
    }

    /// Accumulate `dt` seconds of progress
    ///
    /// Crossing the threshold resolves the checkpoint exactly once and
    /// restarts progress from zero.
    pub fn advance(
        &mut self,
        session: &mut Session,
        dt: f32,
    ) -> Result<Option<AnswerOutcome>, TaskError> {
        let current = session.task().map(|t| t.id);
        if current != self.tracked_task {
            self.progress = 0.0;
            self.tracked_task = current;
        }

        let speed = self.speed(session);
        if current.is_none() || speed <= 0.0 {
            return Ok(None);
        }

        let next = self.progress + dt * speed;
        if next < CHECKPOINT_THRESHOLD {
            self.progress = next;
            return Ok(None);
        }

        self.progress = 0.0;
        let outcome = session.resolve_checkpoint(session.lane())?;
        self.tracked_task = session.task().map(|t| t.id);
        Ok(outcome)
    }
}

/// Apply the discrete (non-time) parts of an input
pub fn apply_input(
    session: &mut Session,
    driver: &mut ProgressDriver,
    input: &TickInput,
) -> Result<(), TaskError> {
    if input.back_to_start {
        session.back_to_start();
        driver.reset();
        return Ok(());
    }

    if input.retry {
        session.retry()?;
        if session.is_active() {
            driver.reset();
        }
    }

    if input.toggle_pause && session.is_active() {
        driver.toggle_pause();
        log::info!("{}", if driver.is_paused() { "Paused" } else { "Resumed" });
    }

    let move_lane = if input.idle_mode {
        idle_steer(session)
    } else {
        input.move_lane
    };
    if let Some(dir) = move_lane {
        session.move_lane(dir);
    }

    if let Some(lane) = input.click_lane {
        if !driver.is_paused() && lane != session.lane() {
            session.set_lane_directly(lane);
        }
    }

    Ok(())
}

/// Advance the game by one fixed timestep
pub fn tick(
    session: &mut Session,
    driver: &mut ProgressDriver,
    input: &TickInput,
    dt: f32,
) -> Result<Option<AnswerOutcome>, TaskError> {
    apply_input(session, driver, input)?;

    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let elapsed = Duration::try_from_secs_f32(dt).unwrap_or(Duration::MAX);
    session.advance_timers(elapsed);
    driver.advance(session, dt)
}

/// One lane step toward the correct answer, if not already there
fn idle_steer(session: &Session) -> Option<Direction> {
    let target = session.task()?.correct_lane()?;
    let current = session.lane();
    if target < current {
        Some(Direction::Left)
    } else if target > current {
        Some(Direction::Right)
    } else {
        None
    }
}
