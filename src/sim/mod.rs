//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only advances through explicit `dt`/`Duration` arguments
//! - No rendering or platform dependencies

pub mod state;
pub mod task;
pub mod tick;
pub mod timer;

pub use state::{
    AnswerOutcome, FeedbackEvent, FeedbackKind, GameEvent, GameResult, Session, SessionIntent,
    SessionPhase, SessionStats,
};
pub use task::{
    AnswerOption, Direction, Lane, MathTask, NumberRange, OperationMode, OptionId, Operator,
    TaskGenerator, TaskId,
};
pub use tick::{ProgressDriver, TickInput, apply_input, tick};
pub use timer::Expiring;
