pub mod direction;
pub mod intersection;
pub mod movement;
