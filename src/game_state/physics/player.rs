//! The player's physical state and body constants.

use cgmath::Point3;

use super::aabb::Aabb;

/// Player body and movement constants.
pub const PLAYER_WIDTH: f32 = 0.6;
pub const PLAYER_DEPTH: f32 = 0.6;
pub const PLAYER_HEIGHT: f32 = 1.8;
pub const PLAYER_EYE_HEIGHT: f32 = 1.6;

pub const GRAVITY: f32 = 30.0;
pub const JUMP_VELOCITY: f32 = 9.0;
pub const TERMINAL_VELOCITY: f32 = -50.0;

/// The player's physical state.
///
/// `position` is the bottom-center of the body (feet level); the eye sits
/// [`PLAYER_EYE_HEIGHT`] above it. Owned by the game loop, read and written
/// by the collision resolver each physics step.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: Point3<f32>,
    pub velocity_y: f32,
    pub on_ground: bool,
}

impl Player {
    /// Spawns the player at a position (feet level).
    pub fn new(position: Point3<f32>) -> Self {
        Player {
            position,
            velocity_y: 0.0,
            on_ground: false,
        }
    }

    /// The body box when the feet are at `feet`, centered at mid-height.
    pub fn body_box_at(feet: Point3<f32>) -> Aabb {
        Aabb::centered(
            Point3::new(feet.x, feet.y + PLAYER_HEIGHT / 2.0, feet.z),
            PLAYER_WIDTH,
            PLAYER_HEIGHT,
            PLAYER_DEPTH,
        )
    }

    /// The body box at the player's current position.
    pub fn body_box(&self) -> Aabb {
        Self::body_box_at(self.position)
    }

    /// Applies a jump impulse if the player is grounded.
    pub fn try_jump(&mut self) {
        if self.on_ground {
            self.velocity_y += JUMP_VELOCITY;
            self.on_ground = false;
        }
    }

    /// The eye position the camera and raycaster use.
    pub fn eye_position(&self) -> Point3<f32> {
        Point3::new(
            self.position.x,
            self.position.y + PLAYER_EYE_HEIGHT,
            self.position.z,
        )
    }
}
