//! Session state and transitions
//!
//! [`Session`] exclusively owns phase, score, stats, the current task, the
//! lane selection and every transient feedback signal. Operations that do
//! not apply to the current phase are silent no-ops.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::task::{Direction, Lane, MathTask, NumberRange, OperationMode, TaskGenerator, TaskId};
use super::timer::Expiring;
use crate::consts::*;
use crate::error::TaskError;

/// Whether a session is scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionIntent {
    /// Scored run with win/lose
    #[default]
    Play,
    /// Consequence-free practice, score never moves
    Training,
}

/// How a scored run finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Won,
    Lost,
}

/// Current phase of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Start screen
    Title,
    /// Picking range and operation
    Setup(SessionIntent),
    /// Runner moving toward checkpoints
    Active(SessionIntent),
    /// Run over, waiting for retry or back-to-start
    Ended(GameResult),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub wrong: u32,
}

impl SessionStats {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedbackKind {
    Gain,
    Loss,
}

/// Score delta flash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub id: u32,
    pub kind: FeedbackKind,
    /// Signed score delta (`+10` or `-5`)
    pub magnitude: i32,
}

/// One-shot signals for presentation, drained once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new task became current
    TaskIssued(TaskId),
    /// Score changed in a scored run
    Feedback(FeedbackEvent),
    /// Correct answer: accent the avatar once
    Pulse { token: u64 },
    /// Wrong answer: shake the scene once
    Shake { token: u64 },
    /// Wrong answer: the solved equation to show
    SolutionRevealed(String),
    /// Run finished
    SessionEnded(GameResult),
}

/// What a checkpoint resolution leads to
enum Continuation {
    Next(MathTask),
    End(GameResult),
}

/// One player's game session
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    /// Intent of the current (or last) run, replayed on retry
    intent: SessionIntent,
    range: NumberRange,
    operation: OperationMode,
    score: i32,
    stats: SessionStats,
    task: Option<MathTask>,
    lane: Lane,
    feedback: Expiring<FeedbackEvent>,
    solution_text: Expiring<String>,
    pulse: Expiring<u64>,
    recent_result: Expiring<AnswerOutcome>,
    /// Last shake token; presentation plays one shake per distinct value
    shake_token: Option<u64>,
    /// Source of pulse/shake tokens, never reset so tokens stay distinct
    token_seq: u64,
    next_feedback_id: u32,
    events: Vec<GameEvent>,
    generator: TaskGenerator,
}

impl Session {
    /// Create a session on the title screen
    pub fn new(seed: u64) -> Self {
        Self {
            phase: SessionPhase::Title,
            intent: SessionIntent::default(),
            range: NumberRange::default(),
            operation: OperationMode::default(),
            score: INITIAL_SCORE,
            stats: SessionStats::default(),
            task: None,
            lane: Lane::Center,
            feedback: Expiring::new(FEEDBACK_DURATION),
            solution_text: Expiring::new(SOLUTION_DURATION),
            pulse: Expiring::new(PULSE_DURATION),
            recent_result: Expiring::new(RECENT_RESULT_DURATION),
            shake_token: None,
            token_seq: 0,
            next_feedback_id: 1,
            events: Vec::new(),
            generator: TaskGenerator::new(seed),
        }
    }

    // === Observation ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn intent(&self) -> SessionIntent {
        self.intent
    }

    pub fn range(&self) -> NumberRange {
        self.range
    }

    pub fn operation(&self) -> OperationMode {
        self.operation
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn task(&self) -> Option<&MathTask> {
        self.task.as_ref()
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn feedback(&self) -> Option<&FeedbackEvent> {
        self.feedback.get()
    }

    pub fn solution_text(&self) -> Option<&str> {
        self.solution_text.get().map(String::as_str)
    }

    pub fn pulse_token(&self) -> Option<u64> {
        self.pulse.get().copied()
    }

    pub fn shake_token(&self) -> Option<u64> {
        self.shake_token
    }

    pub fn recent_result(&self) -> Option<AnswerOutcome> {
        self.recent_result.get().copied()
    }

    pub fn result(&self) -> Option<GameResult> {
        match self.phase {
            SessionPhase::Ended(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Active(_))
    }

    pub fn is_training(&self) -> bool {
        self.phase == SessionPhase::Active(SessionIntent::Training)
    }

    /// True while any self-expiring signal is still waiting to clear
    pub fn has_pending_timers(&self) -> bool {
        self.feedback.is_pending()
            || self.solution_text.is_pending()
            || self.pulse.is_pending()
            || self.recent_result.is_pending()
    }

    /// Take all one-shot events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Setup ===

    /// Title → Setup
    pub fn select_intent(&mut self, intent: SessionIntent) {
        if self.phase != SessionPhase::Title {
            return;
        }
        self.intent = intent;
        self.phase = SessionPhase::Setup(intent);
    }

    pub fn set_range(&mut self, range: NumberRange) {
        if self.is_configurable() {
            self.range = range;
        }
    }

    pub fn set_operation(&mut self, operation: OperationMode) {
        if self.is_configurable() {
            self.operation = operation;
        }
    }

    fn is_configurable(&self) -> bool {
        matches!(self.phase, SessionPhase::Title | SessionPhase::Setup(_))
    }

    // === Lifecycle ===

    /// Setup → Active
    pub fn start_session(&mut self) -> Result<(), TaskError> {
        let SessionPhase::Setup(intent) = self.phase else {
            return Ok(());
        };
        self.intent = intent;
        self.begin_run()
    }

    /// Restart with the same intent, range and operation
    pub fn retry(&mut self) -> Result<(), TaskError> {
        match self.phase {
            SessionPhase::Active(_) | SessionPhase::Ended(_) => self.begin_run(),
            SessionPhase::Title | SessionPhase::Setup(_) => Ok(()),
        }
    }

    /// Any phase → Title, discarding the run
    pub fn back_to_start(&mut self) {
        if self.phase != SessionPhase::Title {
            log::info!("Back to start from {:?}", self.phase);
        }
        self.reset_for_new_run();
        self.task = None;
        self.phase = SessionPhase::Title;
    }

    fn begin_run(&mut self) -> Result<(), TaskError> {
        let task = self.generator.generate(self.range, self.operation)?;
        self.reset_for_new_run();
        self.install_task(task);
        self.phase = SessionPhase::Active(self.intent);
        log::info!(
            "Session started: {:?}, range 0..={}, operation {}",
            self.intent,
            self.range.max(),
            self.operation.as_str()
        );
        Ok(())
    }

    fn reset_for_new_run(&mut self) {
        self.score = INITIAL_SCORE;
        self.stats = SessionStats::default();
        self.lane = Lane::Center;
        self.cancel_timers();
        self.shake_token = None;
        self.events.clear();
    }

    fn cancel_timers(&mut self) {
        self.feedback.cancel();
        self.solution_text.cancel();
        self.pulse.cancel();
        self.recent_result.cancel();
    }

    fn install_task(&mut self, task: MathTask) {
        self.events.push(GameEvent::TaskIssued(task.id));
        self.task = Some(task);
    }

    fn next_token(&mut self) -> u64 {
        self.token_seq += 1;
        self.token_seq
    }

    // === Lanes ===

    pub fn move_lane(&mut self, dir: Direction) {
        if self.is_active() {
            self.lane = self.lane.step(dir);
        }
    }

    pub fn set_lane_directly(&mut self, lane: Lane) {
        if self.is_active() {
            self.lane = lane;
        }
    }

    // === Scoring ===

    /// Score the option on `lane` against the current task
    ///
    /// Returns the outcome, or `None` when there was nothing to resolve.
    pub fn resolve_checkpoint(&mut self, lane: Lane) -> Result<Option<AnswerOutcome>, TaskError> {
        let SessionPhase::Active(intent) = self.phase else {
            return Ok(None);
        };
        let Some(task) = self.task.as_ref() else {
            return Ok(None);
        };

        let is_correct = task.option_at(lane).is_some_and(|o| o.is_correct);
        let equation = task.equation();
        let outcome = if is_correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Wrong
        };

        let scored = match intent {
            SessionIntent::Training => None,
            SessionIntent::Play => {
                let delta = if is_correct { CORRECT_DELTA } else { WRONG_DELTA };
                Some((delta, (self.score + delta).clamp(MIN_SCORE, MAX_SCORE)))
            }
        };

        // Generate before mutating so a generator fault leaves the session untouched
        let continuation = match scored.and_then(|(_, score)| end_result_for(score)) {
            Some(result) => Continuation::End(result),
            None => Continuation::Next(self.generator.generate(self.range, self.operation)?),
        };

        match outcome {
            AnswerOutcome::Correct => self.stats.correct += 1,
            AnswerOutcome::Wrong => self.stats.wrong += 1,
        }
        self.recent_result.set(outcome);

        if let Some((delta, score)) = scored {
            self.score = score;
            let feedback = FeedbackEvent {
                id: self.next_feedback_id,
                kind: if delta > 0 {
                    FeedbackKind::Gain
                } else {
                    FeedbackKind::Loss
                },
                magnitude: delta,
            };
            self.next_feedback_id = self.next_feedback_id.wrapping_add(1);
            self.feedback.set(feedback.clone());
            self.events.push(GameEvent::Feedback(feedback));
        }

        if is_correct {
            let token = self.next_token();
            self.pulse.set(token);
            self.events.push(GameEvent::Pulse { token });
        } else {
            let text = format!("{SOLUTION_PREFIX}{equation}");
            self.solution_text.set(text.clone());
            self.events.push(GameEvent::SolutionRevealed(text));
            let token = self.next_token();
            self.shake_token = Some(token);
            self.events.push(GameEvent::Shake { token });
        }

        log::debug!(
            "Checkpoint on {:?}: {:?} ({}), score {}, stats {}/{}",
            lane,
            outcome,
            equation,
            self.score,
            self.stats.correct,
            self.stats.wrong
        );

        match continuation {
            Continuation::Next(next) => self.install_task(next),
            Continuation::End(result) => self.end_session(result),
        }

        Ok(Some(outcome))
    }

    fn end_session(&mut self, result: GameResult) {
        self.phase = SessionPhase::Ended(result);
        self.task = None;
        self.cancel_timers();
        self.events.push(GameEvent::SessionEnded(result));
        log::info!(
            "Session ended: {:?} with score {} ({} correct, {} wrong)",
            result,
            self.score,
            self.stats.correct,
            self.stats.wrong
        );
    }

    // === Time ===

    /// Count down every self-expiring signal
    pub fn advance_timers(&mut self, elapsed: Duration) {
        if self.feedback.advance(elapsed).is_some() {
            log::trace!("Feedback cleared");
        }
        self.solution_text.advance(elapsed);
        self.pulse.advance(elapsed);
        self.recent_result.advance(elapsed);
    }
}

/// Win/lose check on a post-clamp score
fn end_result_for(score: i32) -> Option<GameResult> {
    if score == MIN_SCORE {
        Some(GameResult::Lost)
    } else if score >= MAX_SCORE {
        Some(GameResult::Won)
    } else {
        None
    }
}
