use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::global_variables::{CAUTION_THRESHOLD, STOP_THRESHOLD};
use crate::models::movement::{Approach, Status, Turn};

/// Signal state of a single approach: allotments, countdowns and the status
/// of its through and left-turn movements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionState {
    /// Configured through-movement allotment (seconds).
    pub green_time: u32,
    /// Configured left-turn allotment (seconds).
    pub left_turn_time: u32,
    pub green_countdown: u32,
    pub left_turn_countdown: u32,
    pub go_status: Status,
    pub left_status: Status,
}

impl DirectionState {
    /// Creates a stopped direction with the given allotments and no countdown.
    pub fn new(green_time: u32, left_turn_time: u32) -> Self {
        Self {
            green_time,
            left_turn_time,
            ..Self::default()
        }
    }

    pub fn status(&self, turn: Turn) -> Status {
        match turn {
            Turn::Through => self.go_status,
            Turn::Left => self.left_status,
        }
    }

    pub fn set_status(&mut self, turn: Turn, status: Status) {
        match turn {
            Turn::Through => self.go_status = status,
            Turn::Left => self.left_status = status,
        }
    }

    pub fn set_both(&mut self, status: Status) {
        self.go_status = status;
        self.left_status = status;
    }

    /// Grants go to both movements, then lowers any whose countdown is
    /// already inside the caution or stop window.
    pub fn open(&mut self) {
        self.set_both(Status::Go);
        self.update_statuses();
    }

    /// Counts both countdowns down by one second, never below zero.
    pub fn decrement_countdowns(&mut self) {
        self.green_countdown = self.green_countdown.saturating_sub(1);
        self.left_turn_countdown = self.left_turn_countdown.saturating_sub(1);
    }

    /// Derives statuses from the remaining time. Caution is applied first so
    /// that stop wins at the boundary; a status is never raised to go here.
    pub fn update_statuses(&mut self) {
        self.go_status = status_for_countdown(self.green_countdown, self.go_status);
        self.left_status = status_for_countdown(self.left_turn_countdown, self.left_status);
    }

    pub fn is_exhausted(&self) -> bool {
        self.green_countdown == 0 && self.left_turn_countdown == 0
    }

    /// Zeroes both countdowns and stops both movements. Allotments are kept.
    pub fn clear_signal(&mut self) {
        self.green_countdown = 0;
        self.left_turn_countdown = 0;
        self.set_both(Status::Stop);
    }
}

fn status_for_countdown(countdown: u32, current: Status) -> Status {
    let mut status = current;
    if countdown <= CAUTION_THRESHOLD {
        status = Status::Caution;
    }
    if countdown <= STOP_THRESHOLD {
        status = Status::Stop;
    }
    status
}

/// The four direction records, one per approach, always all present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions([DirectionState; 4]);

impl Directions {
    pub fn from_fn(mut f: impl FnMut(Approach) -> DirectionState) -> Self {
        Self(Approach::ALL.map(&mut f))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Approach, &DirectionState)> {
        Approach::ALL.into_iter().map(move |a| (a, &self.0[a.index()]))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut DirectionState> {
        self.0.iter_mut()
    }

    /// Approaches whose movement of the given turn currently shows go.
    pub fn active(&self, turn: Turn) -> Vec<Approach> {
        self.iter()
            .filter(|(_, dir)| dir.status(turn) == Status::Go)
            .map(|(approach, _)| approach)
            .collect()
    }
}

impl Index<Approach> for Directions {
    type Output = DirectionState;

    fn index(&self, approach: Approach) -> &DirectionState {
        &self.0[approach.index()]
    }
}

impl IndexMut<Approach> for Directions {
    fn index_mut(&mut self, approach: Approach) -> &mut DirectionState {
        &mut self.0[approach.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_floors_at_zero() {
        let mut dir = DirectionState::new(5, 5);
        dir.green_countdown = 1;
        dir.decrement_countdowns();
        dir.decrement_countdowns();
        assert_eq!(dir.green_countdown, 0);
        assert_eq!(dir.left_turn_countdown, 0);
    }

    #[test]
    fn caution_window_is_two_seconds_and_stop_wins_at_one() {
        let mut dir = DirectionState::new(10, 10);
        dir.set_both(Status::Go);

        dir.green_countdown = 3;
        dir.left_turn_countdown = 3;
        dir.update_statuses();
        assert_eq!(dir.go_status, Status::Go);

        dir.green_countdown = 2;
        dir.update_statuses();
        assert_eq!(dir.go_status, Status::Caution);
        assert_eq!(dir.left_status, Status::Go);

        dir.green_countdown = 1;
        dir.left_turn_countdown = 0;
        dir.update_statuses();
        assert_eq!(dir.go_status, Status::Stop);
        assert_eq!(dir.left_status, Status::Stop);
    }

    #[test]
    fn open_respects_the_remaining_time() {
        let mut dir = DirectionState::new(0, 2);
        dir.left_turn_countdown = 2;
        dir.open();
        assert_eq!(dir.go_status, Status::Stop);
        assert_eq!(dir.left_status, Status::Caution);

        dir.green_countdown = 3;
        dir.open();
        assert_eq!(dir.go_status, Status::Go);
    }

    #[test]
    fn queued_direction_is_never_raised_to_go() {
        let mut dir = DirectionState::new(10, 10);
        dir.green_countdown = 40;
        dir.update_statuses();
        assert_eq!(dir.go_status, Status::Stop);
    }

    #[test]
    fn serializes_with_settings_field_names() {
        let json = serde_json::to_value(DirectionState::new(20, 30)).unwrap();
        assert_eq!(json["greenTime"], 20);
        assert_eq!(json["leftTurnTime"], 30);
        assert_eq!(json["goStatus"], "STOP");
    }

    #[test]
    fn active_lists_only_go_movements() {
        let mut dirs = Directions::default();
        dirs[Approach::East].go_status = Status::Go;
        dirs[Approach::West].go_status = Status::Caution;
        dirs[Approach::South].left_status = Status::Go;
        assert_eq!(dirs.active(Turn::Through), vec![Approach::East]);
        assert_eq!(dirs.active(Turn::Left), vec![Approach::South]);
    }
}
