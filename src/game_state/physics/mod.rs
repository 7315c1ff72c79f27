//! Discrete-grid physics: the player body, axis-aligned bounding boxes and
//! the collision resolver.

pub mod aabb;
pub mod collision;
pub mod player;

pub use aabb::Aabb;
pub use player::Player;
