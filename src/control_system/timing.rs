use crate::models::direction::Directions;
use crate::models::intersection::RotationOrder;
use crate::models::movement::Status;

/// Primes every direction's countdowns from the rotation order.
///
/// The head keeps any countdown already running (never shortened), the second
/// approach waits for the head plus the time its left turn outlives its green,
/// and each later approach waits for the cumulative total ahead of it. Sums
/// saturate at `u32::MAX`. Every movement is left stopped; granting go is up
/// to the caller.
pub fn reset_timers(directions: &mut Directions, order: &RotationOrder) {
    let approaches = order.as_slice();
    let mut excess = 0;

    for (i, &approach) in approaches.iter().enumerate() {
        match i {
            0 => {
                let head = &mut directions[approach];
                head.green_countdown = head.green_countdown.max(head.green_time);
                head.left_turn_countdown = head.left_turn_countdown.max(head.left_turn_time);
                excess = head.left_turn_countdown.saturating_sub(head.green_time);
            }
            1 => {
                let head = directions[approaches[0]];
                let second = &mut directions[approach];
                second.green_countdown = head
                    .green_countdown
                    .max(second.green_time)
                    .saturating_add(excess);
                second.left_turn_countdown = head
                    .left_turn_countdown
                    .max(second.left_turn_time)
                    .saturating_add(excess);
            }
            _ => {
                let prev = directions[approaches[i - 1]];
                let dir = &mut directions[approach];
                dir.green_countdown = prev.green_countdown.saturating_add(dir.green_time);
                dir.left_turn_countdown =
                    prev.left_turn_countdown.saturating_add(dir.left_turn_time);
            }
        }
        directions[approach].set_both(Status::Stop);
    }
}

/// Zeroes all countdowns and stops every movement, as on entering manual mode.
pub fn clear_all(directions: &mut Directions) {
    for dir in directions.values_mut() {
        dir.clear_signal();
    }
}
