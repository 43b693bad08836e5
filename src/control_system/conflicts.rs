use crate::models::movement::Approach::{self, East, North, South, West};
use crate::models::movement::{MovementKey, Turn};

const fn through(approach: Approach) -> MovementKey {
    MovementKey::through(approach)
}

const fn left(approach: Approach) -> MovementKey {
    MovementKey::left(approach)
}

const NORTH_THROUGH: &[MovementKey] = &[
    through(East),
    through(West),
    left(South),
    left(East),
    left(West),
];
const NORTH_LEFT: &[MovementKey] = &[through(South), through(East), through(West)];
const SOUTH_THROUGH: &[MovementKey] = &[through(East), through(West), left(North)];
const SOUTH_LEFT: &[MovementKey] = &[through(West), left(East), through(North)];
const EAST_THROUGH: &[MovementKey] = &[
    through(West),
    through(North),
    through(South),
    left(South),
    left(North),
    left(West),
];
const EAST_LEFT: &[MovementKey] = &[left(North), left(South), through(South), through(West)];
const WEST_THROUGH: &[MovementKey] = &[
    through(East),
    through(North),
    through(South),
    left(North),
    left(South),
    left(East),
];
const WEST_LEFT: &[MovementKey] = &[through(North), through(South), left(South), through(East)];

/// Movements that must be stopped when `movement` is granted go.
///
/// Lookups are one-directional: only the granted movement's entry is consulted.
pub fn conflicts_of(movement: MovementKey) -> &'static [MovementKey] {
    match (movement.approach, movement.turn) {
        (North, Turn::Through) => NORTH_THROUGH,
        (North, Turn::Left) => NORTH_LEFT,
        (South, Turn::Through) => SOUTH_THROUGH,
        (South, Turn::Left) => SOUTH_LEFT,
        (East, Turn::Through) => EAST_THROUGH,
        (East, Turn::Left) => EAST_LEFT,
        (West, Turn::Through) => WEST_THROUGH,
        (West, Turn::Left) => WEST_LEFT,
    }
}

pub fn conflicts_with(granted: MovementKey, other: MovementKey) -> bool {
    conflicts_of(granted).contains(&other)
}
