use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ControlError;
use crate::models::intersection::Mode;
use crate::models::movement::{Approach, MovementKey, Status, Turn};

/// Operator commands accepted by the controller's dispatch point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    SetMode(Mode),
    Grant {
        approach: Approach,
        is_left_turn: bool,
    },
    SetShowAllTimers(bool),
    Shutdown,
}

impl FromStr for Command {
    type Err = ControlError;

    /// Operator console syntax: `auto`, `manual`, `grant <approach> [left]`,
    /// `timers on|off`, `quit`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<String> = line
            .split_whitespace()
            .map(|w| w.to_ascii_lowercase())
            .collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();
        match words.as_slice() {
            ["auto"] | ["automated"] => Ok(Command::SetMode(Mode::Automated)),
            ["manual"] => Ok(Command::SetMode(Mode::Manual)),
            ["grant", approach] => Ok(Command::Grant {
                approach: approach.parse()?,
                is_left_turn: false,
            }),
            ["grant", approach, turn] => Ok(Command::Grant {
                approach: approach.parse()?,
                is_left_turn: turn.parse::<Turn>()? == Turn::Left,
            }),
            ["timers", "on"] => Ok(Command::SetShowAllTimers(true)),
            ["timers", "off"] => Ok(Command::SetShowAllTimers(false)),
            ["quit"] | ["exit"] => Ok(Command::Shutdown),
            _ => Err(ControlError::UnknownCommand(line.trim().to_string())),
        }
    }
}

/// Something the controller did, for logging and the phase log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerEvent {
    Started {
        head: Approach,
    },
    Rotated {
        from: Approach,
        to: Approach,
        order: Vec<Approach>,
    },
    ModeChanged(Mode),
    Granted {
        movement: MovementKey,
        status: Status,
        stopped: Vec<MovementKey>,
    },
    Released {
        movement: MovementKey,
    },
}

impl ControllerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ControllerEvent::Started { .. } => "started",
            ControllerEvent::Rotated { .. } => "rotated",
            ControllerEvent::ModeChanged(_) => "mode_changed",
            ControllerEvent::Granted { .. } => "granted",
            ControllerEvent::Released { .. } => "released",
        }
    }
}
