//! Keyboard controls
//!
//! Maps key names (as reported by browsers and terminal front-ends) to game
//! commands, and commands to tick input.

use crate::sim::{Direction, Lane, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Jump to a lane (pointer/touch)
    SelectLane(Lane),
    TogglePause,
    /// Back to the title screen
    Home,
    Retry,
}

/// Command bound to `key`, if any
pub fn command_for_key(key: &str) -> Option<Command> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
        "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
        "p" | "P" | "Escape" => Some(Command::TogglePause),
        "h" | "H" => Some(Command::Home),
        "r" | "R" | "Enter" => Some(Command::Retry),
        _ => None,
    }
}

impl Command {
    pub fn to_input(self) -> TickInput {
        let mut input = TickInput::default();
        match self {
            Command::MoveLeft => input.move_lane = Some(Direction::Left),
            Command::MoveRight => input.move_lane = Some(Direction::Right),
            Command::SelectLane(lane) => input.click_lane = Some(lane),
            Command::TogglePause => input.toggle_pause = true,
            Command::Home => input.back_to_start = true,
            Command::Retry => input.retry = true,
        }
        input
    }
}
