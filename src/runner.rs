//! Frame-paced game runner
//!
//! Turns variable frame deltas into fixed simulation ticks. Presentation
//! layers call [`Runner::update`] once per animation frame and forward key
//! presses through [`Runner::apply`].

use crate::consts::*;
use crate::controls::Command;
use crate::error::TaskError;
use crate::settings::Settings;
use crate::sim::{ProgressDriver, Session, TickInput, apply_input, tick};

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Runner {
    session: Session,
    driver: ProgressDriver,
    accumulator: f32,
    /// Demo mode - AI plays the game
    idle_mode: bool,
    time_ticks: u64,
}

impl Runner {
    /// Runner on the title screen, preconfigured from `settings`
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let mut session = Session::new(seed);
        session.set_range(settings.range);
        session.set_operation(settings.operation);
        log::info!("Runner initialized with seed: {}", seed);
        Self {
            session,
            driver: ProgressDriver::new(settings.speed),
            accumulator: 0.0,
            idle_mode: false,
            time_ticks: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Setup-screen access (intent, range, operation, start)
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn driver(&self) -> &ProgressDriver {
        &self.driver
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.idle_mode = idle;
        log::info!("Idle mode: {}", idle);
    }

    /// Apply a player command immediately, in arrival order
    pub fn apply(&mut self, command: Command) -> Result<(), TaskError> {
        apply_input(&mut self.session, &mut self.driver, &command.to_input())?;
        if matches!(command, Command::Home | Command::Retry) {
            self.accumulator = 0.0;
        }
        Ok(())
    }

    /// Run simulation ticks for one frame; returns the number of substeps
    pub fn update(&mut self, frame_dt: f32) -> Result<u32, TaskError> {
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let input = TickInput {
            idle_mode: self.idle_mode,
            ..Default::default()
        };

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.session, &mut self.driver, &input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            self.time_ticks += 1;
            substeps += 1;
        }

        // Drop any backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        Ok(substeps)
    }
}
