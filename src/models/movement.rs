use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ControlError;

/// One of the four compass approaches feeding the intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Approach {
    North,
    East,
    South,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [
        Approach::North,
        Approach::East,
        Approach::South,
        Approach::West,
    ];

    /// Slot of this approach in per-approach arrays.
    pub const fn index(self) -> usize {
        match self {
            Approach::North => 0,
            Approach::East => 1,
            Approach::South => 2,
            Approach::West => 3,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Approach::North => "NORTH",
            Approach::East => "EAST",
            Approach::South => "SOUTH",
            Approach::West => "WEST",
        }
    }

    /// Where traffic on this approach comes from and where its left turn goes.
    pub const fn description(self) -> &'static str {
        match self {
            Approach::North => "From South, head North and turn left to West.",
            Approach::South => "From North, head South and turn left to East.",
            Approach::East => "From West, head East and turn left to North.",
            Approach::West => "From East, head West and turn left to South.",
        }
    }
}

impl fmt::Display for Approach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Approach {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORTH" | "N" => Ok(Approach::North),
            "EAST" | "E" => Ok(Approach::East),
            "SOUTH" | "S" => Ok(Approach::South),
            "WEST" | "W" => Ok(Approach::West),
            _ => Err(ControlError::UnknownApproach(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Turn {
    Through,
    Left,
}

impl FromStr for Turn {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "through" | "straight" | "go" => Ok(Turn::Through),
            "left" => Ok(Turn::Left),
            _ => Err(ControlError::UnknownTurn(s.to_string())),
        }
    }
}

/// A permitted vehicle path: the through or left-turn movement of an approach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementKey {
    pub approach: Approach,
    pub turn: Turn,
}

impl MovementKey {
    pub const fn through(approach: Approach) -> Self {
        Self {
            approach,
            turn: Turn::Through,
        }
    }

    pub const fn left(approach: Approach) -> Self {
        Self {
            approach,
            turn: Turn::Left,
        }
    }

    pub const fn new(approach: Approach, is_left_turn: bool) -> Self {
        if is_left_turn {
            Self::left(approach)
        } else {
            Self::through(approach)
        }
    }

    pub const fn is_left(self) -> bool {
        matches!(self.turn, Turn::Left)
    }

    /// Dense index over all eight movements, through movements first.
    pub const fn index(self) -> usize {
        match self.turn {
            Turn::Through => self.approach.index(),
            Turn::Left => 4 + self.approach.index(),
        }
    }
}

impl fmt::Display for MovementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.turn {
            Turn::Through => write!(f, "{}", self.approach),
            Turn::Left => write!(f, "{}_LEFT", self.approach),
        }
    }
}

/// Signal-head state of a movement. Ordered by permissiveness, `Go` highest.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    #[default]
    Stop,
    Caution,
    Go,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Stop => "STOP",
            Status::Caution => "CAUTION",
            Status::Go => "GO",
        };
        f.write_str(label)
    }
}
