use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ControlError, Result};
use crate::global_variables::DEFAULT_ORDER;
use crate::models::direction::{DirectionState, Directions};
use crate::models::movement::{Approach, MovementKey, Status, Turn};

/// Operating mode of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Automated,
    Manual,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Automated => f.write_str("Automated"),
            Mode::Manual => f.write_str("Manual"),
        }
    }
}

/// Cyclic sequence in which approaches receive primary green.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Approach>", into = "Vec<Approach>")]
pub struct RotationOrder(Vec<Approach>);

impl RotationOrder {
    /// Builds an order, rejecting an empty list or a repeated approach.
    pub fn new(approaches: Vec<Approach>) -> Result<Self> {
        if approaches.is_empty() {
            return Err(ControlError::EmptyOrder);
        }
        for (i, approach) in approaches.iter().enumerate() {
            if approaches[..i].contains(approach) {
                return Err(ControlError::DuplicateApproach(*approach));
            }
        }
        Ok(Self(approaches))
    }

    pub fn head(&self) -> Option<Approach> {
        self.0.first().copied()
    }

    pub fn as_slice(&self) -> &[Approach] {
        &self.0
    }

    /// Moves the head to the tail.
    pub fn rotate(&mut self) {
        if !self.0.is_empty() {
            self.0.rotate_left(1);
        }
    }
}

impl Default for RotationOrder {
    fn default() -> Self {
        Self(DEFAULT_ORDER.to_vec())
    }
}

impl TryFrom<Vec<Approach>> for RotationOrder {
    type Error = ControlError;

    fn try_from(approaches: Vec<Approach>) -> Result<Self> {
        Self::new(approaches)
    }
}

impl From<RotationOrder> for Vec<Approach> {
    fn from(order: RotationOrder) -> Self {
        order.0
    }
}

/// Whole-intersection controller state. One live instance is owned by the
/// controller; transition functions take it by `&mut`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionState {
    pub directions: Directions,
    pub order: RotationOrder,
    pub current_direction: Approach,
    pub all_red_phase: bool,
    pub mode: Mode,
    pub show_all_timers: bool,
}

impl IntersectionState {
    /// Everything stopped, countdowns at zero, automated mode pending start.
    pub fn new() -> Self {
        let order = RotationOrder::default();
        Self {
            directions: Directions::default(),
            current_direction: order.head().unwrap_or(Approach::North),
            order,
            all_red_phase: false,
            mode: Mode::Automated,
            show_all_timers: true,
        }
    }

    pub fn direction(&self, approach: Approach) -> &DirectionState {
        &self.directions[approach]
    }

    /// Movements currently showing go, through movements first.
    pub fn active_movements(&self) -> Vec<MovementKey> {
        let through = self
            .directions
            .active(Turn::Through)
            .into_iter()
            .map(MovementKey::through);
        let left = self
            .directions
            .active(Turn::Left)
            .into_iter()
            .map(MovementKey::left);
        through.chain(left).collect()
    }

    /// "NORTH → SOUTH → EAST → WEST" followed by the head's travel description.
    pub fn sequence_label(&self) -> String {
        let names: Vec<&str> = self.order.as_slice().iter().map(|a| a.name()).collect();
        match self.order.head() {
            Some(head) => format!("{} ({})", names.join(" → "), head.description()),
            None => String::new(),
        }
    }

    /// Countdowns a display should show: every movement's when
    /// `show_all_timers` is set, otherwise only those of movements showing go.
    pub fn visible_countdowns(&self) -> Vec<(MovementKey, u32)> {
        let mut visible = Vec::new();
        for (approach, dir) in self.directions.iter() {
            for (movement, status, countdown) in [
                (MovementKey::through(approach), dir.go_status, dir.green_countdown),
                (MovementKey::left(approach), dir.left_status, dir.left_turn_countdown),
            ] {
                if self.show_all_timers || status == Status::Go {
                    visible.push((movement, countdown));
                }
            }
        }
        visible
    }
}

impl Default for IntersectionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_all_stop_with_default_order() {
        let state = IntersectionState::new();
        assert_eq!(state.mode, Mode::Automated);
        assert_eq!(state.current_direction, Approach::North);
        assert_eq!(state.order.as_slice(), &DEFAULT_ORDER);
        for (_, dir) in state.directions.iter() {
            assert_eq!(dir.go_status, Status::Stop);
            assert_eq!(dir.left_status, Status::Stop);
            assert_eq!(dir.green_countdown, 0);
        }
    }

    #[test]
    fn rotation_order_rejects_empty_and_duplicates() {
        assert!(matches!(RotationOrder::new(vec![]), Err(ControlError::EmptyOrder)));
        assert!(matches!(
            RotationOrder::new(vec![Approach::North, Approach::North]),
            Err(ControlError::DuplicateApproach(Approach::North))
        ));
    }

    #[test]
    fn rotate_moves_head_to_tail() {
        let mut order = RotationOrder::default();
        order.rotate();
        assert_eq!(
            order.as_slice(),
            &[Approach::South, Approach::East, Approach::West, Approach::North]
        );
    }

    #[test]
    fn rotation_order_deserialization_is_validated() {
        let order: RotationOrder = serde_json::from_str("[\"EAST\",\"WEST\"]").unwrap();
        assert_eq!(order.head(), Some(Approach::East));
        assert!(serde_json::from_str::<RotationOrder>("[]").is_err());
    }

    #[test]
    fn hidden_timers_show_only_movements_at_go() {
        let mut state = IntersectionState::new();
        assert_eq!(state.visible_countdowns().len(), 8);

        state.show_all_timers = false;
        assert!(state.visible_countdowns().is_empty());

        // a manual grant elsewhere leaves current_direction behind
        state.current_direction = Approach::West;
        state.directions[Approach::East].left_status = Status::Go;
        state.directions[Approach::East].left_turn_countdown = 7;
        state.directions[Approach::West].go_status = Status::Caution;
        assert_eq!(
            state.visible_countdowns(),
            vec![(MovementKey::left(Approach::East), 7)]
        );
    }

    #[test]
    fn sequence_label_starts_at_head() {
        let state = IntersectionState::new();
        assert!(state
            .sequence_label()
            .starts_with("NORTH → SOUTH → EAST → WEST (From South"));
    }
}
