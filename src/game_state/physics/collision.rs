//! # Collision Resolution
//!
//! Discrete box-versus-grid collision for the player, run once per physics
//! step. Vertical motion resolves first, then horizontal motion, as two
//! independent passes, never diagonally. The horizontal pass is itself two
//! sub-passes (X then Z), each stopping at its first overlap, so a single
//! colliding block corrects exactly one axis; simultaneous diagonal pushes
//! are not summed. This ordering is part of the movement feel and must be
//! preserved.
//!
//! Block cells are unit cubes centered on their integer coordinates. Every
//! block box is expanded by a small gap on the axis being resolved so the
//! clamped player never re-penetrates through float error, and the scan
//! region around the body box is padded by a half-block margin.

use cgmath::{Point3, Vector3};

use crate::game_state::voxels::World;

use super::aabb::Aabb;
use super::player::{Player, GRAVITY, PLAYER_HEIGHT, PLAYER_WIDTH, PLAYER_DEPTH, TERMINAL_VELOCITY};

/// Edge length of a block cell.
pub const BLOCK_SIZE: f32 = 1.0;

/// Expansion of a block box on the resolved axis, to keep the clamped
/// position strictly outside the cell.
pub const COLLISION_GAP: f32 = 0.01;

/// Padding around the body box when enumerating candidate cells.
pub const COLLISION_MARGIN: f32 = 0.5;

#[derive(Clone, Copy, PartialEq)]
enum Axis {
    X,
    Y,
    Z,
}

/// Advances vertical motion: applies gravity (unless grounded) and the
/// terminal-velocity clamp, then moves the player by the resulting step and
/// clamps against the first overlapping block. Landing zeroes the velocity
/// and sets `on_ground`; hitting a ceiling zeroes the velocity only.
pub fn step_vertical(world: &World, player: &mut Player, dt: f32) {
    if !player.on_ground {
        player.velocity_y -= GRAVITY * dt;
        if player.velocity_y < TERMINAL_VELOCITY {
            player.velocity_y = TERMINAL_VELOCITY;
        }
    }

    let dy = player.velocity_y * dt;
    let mut next = player.position;
    next.y += dy;

    player.on_ground = false;

    let body = Player::body_box_at(next);
    if let Some(block) = first_colliding_block(world, &body, Axis::Y) {
        player.velocity_y = 0.0;
        if dy > 0.0 {
            // Moving up: pin the head below the ceiling cell.
            next.y = block.min.y - PLAYER_HEIGHT;
        } else {
            // Moving down (or resting): land on the cell's top surface.
            next.y = block.max.y;
            player.on_ground = true;
        }
    }

    player.position = next;
}

/// Advances horizontal motion by `movement`, clamping X and then Z
/// independently. Each sub-pass rebuilds the body box at the candidate
/// position (with the X result feeding the Z test) and stops at its first
/// overlap.
pub fn step_horizontal(world: &World, player: &mut Player, movement: Vector3<f32>) {
    let next = player.position + movement;
    let mut resolved = next;

    if movement.x != 0.0 {
        let body = Player::body_box_at(Point3::new(
            resolved.x,
            player.position.y,
            player.position.z,
        ));
        if let Some(block) = first_colliding_block(world, &body, Axis::X) {
            resolved.x = if movement.x > 0.0 {
                block.min.x - PLAYER_WIDTH / 2.0
            } else {
                block.max.x + PLAYER_WIDTH / 2.0
            };
        }
    }

    if movement.z != 0.0 {
        let body = Player::body_box_at(Point3::new(resolved.x, player.position.y, resolved.z));
        if let Some(block) = first_colliding_block(world, &body, Axis::Z) {
            resolved.z = if movement.z > 0.0 {
                block.min.z - PLAYER_DEPTH / 2.0
            } else {
                block.max.z + PLAYER_DEPTH / 2.0
            };
        }
    }

    player.position = resolved;
}

/// Scans every cell within a margin of the body box and returns the box of
/// the first solid block that overlaps it.
///
/// The scan is an unordered walk of the region, so with several overlapping
/// candidates the one found is not necessarily the closest. That matches
/// the reference behavior and the single-axis clamp makes the difference
/// invisible in practice.
fn first_colliding_block(world: &World, body: &Aabb, axis: Axis) -> Option<Aabb> {
    let min_x = (body.min.x - COLLISION_MARGIN).floor() as i32;
    let min_y = (body.min.y - COLLISION_MARGIN).floor() as i32;
    let min_z = (body.min.z - COLLISION_MARGIN).floor() as i32;
    let max_x = (body.max.x + COLLISION_MARGIN).ceil() as i32;
    let max_y = (body.max.y + COLLISION_MARGIN).ceil() as i32;
    let max_z = (body.max.z + COLLISION_MARGIN).ceil() as i32;

    for x in min_x..max_x {
        for y in min_y..max_y {
            for z in min_z..max_z {
                if !world.is_solid(Point3::new(x, y, z)) {
                    continue;
                }
                let block = block_box(Point3::new(x, y, z), axis);
                if body.intersects(&block) {
                    return Some(block);
                }
            }
        }
    }
    None
}

/// The collision box of the cell at `cell`, expanded by the gap on the
/// resolved axis.
fn block_box(cell: Point3<i32>, axis: Axis) -> Aabb {
    let center = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
    let expanded = BLOCK_SIZE + 2.0 * COLLISION_GAP;
    match axis {
        Axis::X => Aabb::centered(center, expanded, BLOCK_SIZE, BLOCK_SIZE),
        Axis::Y => Aabb::centered(center, BLOCK_SIZE, expanded, BLOCK_SIZE),
        Axis::Z => Aabb::centered(center, BLOCK_SIZE, BLOCK_SIZE, expanded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::{BlockType, Chunk};

    const DT: f32 = 1.0 / 60.0;

    /// A world with a single chunk at the origin and solid blocks at the
    /// given world cells.
    fn world_with_blocks(cells: &[Point3<i32>]) -> World {
        let mut world = World::new();
        for &cell in cells {
            let origin = World::chunk_origin(cell);
            if !world.contains_chunk(origin) {
                world.insert_chunk(origin, Chunk::empty());
            }
            world.set_block(cell, BlockType::STONE);
        }
        world
    }

    #[test]
    fn falling_player_lands_on_block_top() {
        let world = world_with_blocks(&[Point3::new(0, 0, 0)]);
        let mut player = Player::new(Point3::new(0.0, 3.0, 0.0));

        for _ in 0..600 {
            step_vertical(&world, &mut player, DT);
            if player.on_ground {
                break;
            }
        }

        assert!(player.on_ground);
        assert_eq!(player.velocity_y, 0.0);
        // The block spans [-0.5, 0.5] vertically; its collision box adds
        // the gap on top.
        let expected_y = 0.5 + COLLISION_GAP;
        assert!((player.position.y - expected_y).abs() < 1e-4);
    }

    #[test]
    fn player_keeps_falling_through_empty_space() {
        let world = World::new();
        let mut player = Player::new(Point3::new(0.0, 10.0, 0.0));

        step_vertical(&world, &mut player, DT);
        step_vertical(&world, &mut player, DT);

        assert!(!player.on_ground);
        assert!(player.velocity_y < 0.0);
        assert!(player.position.y < 10.0);
    }

    #[test]
    fn terminal_velocity_is_clamped() {
        let world = World::new();
        let mut player = Player::new(Point3::new(0.0, 1000.0, 0.0));

        for _ in 0..600 {
            step_vertical(&world, &mut player, DT);
        }
        assert_eq!(player.velocity_y, TERMINAL_VELOCITY);
    }

    #[test]
    fn rising_player_bumps_its_head() {
        let world = world_with_blocks(&[Point3::new(0, 4, 0)]);
        let mut player = Player::new(Point3::new(0.0, 1.0, 0.0));
        player.velocity_y = 9.0;
        player.on_ground = false;

        for _ in 0..60 {
            step_vertical(&world, &mut player, DT);
            if player.velocity_y == 0.0 {
                break;
            }
        }

        // Head pinned just below the ceiling cell at y = 4.
        let ceiling_bottom = 4.0 - 0.5 - COLLISION_GAP;
        assert!((player.position.y + PLAYER_HEIGHT - ceiling_bottom).abs() < 1e-4);
        assert!(!player.on_ground);
    }

    #[test]
    fn walking_into_a_wall_clamps_only_the_blocked_axis() {
        // A column of stone at x = 2 next to the player's path.
        let world = world_with_blocks(&[
            Point3::new(2, 1, 0),
            Point3::new(2, 2, 0),
        ]);
        let mut player = Player::new(Point3::new(0.0, 0.51, 0.0));

        step_horizontal(&world, &mut player, Vector3::new(1.4, 0.0, 0.0));

        let wall_face = 2.0 - 0.5 - COLLISION_GAP;
        assert!((player.position.x - (wall_face - PLAYER_WIDTH / 2.0)).abs() < 1e-4);
        assert_eq!(player.position.z, 0.0);
    }

    #[test]
    fn unobstructed_movement_is_accepted_unchanged() {
        let world = world_with_blocks(&[Point3::new(0, -2, 0)]);
        let mut player = Player::new(Point3::new(0.0, 0.0, 0.0));

        step_horizontal(&world, &mut player, Vector3::new(0.25, 0.0, -0.5));

        assert!((player.position.x - 0.25).abs() < 1e-6);
        assert!((player.position.z - (-0.5)).abs() < 1e-6);
    }
}
