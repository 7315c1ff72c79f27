//! # Block Selection Raycasting
//!
//! Picks the block under the crosshair and the adjacent empty cell where a
//! new block would be placed. The ray is marched in fixed small steps and
//! sampled at the nearest integer cell; to stay robust at grazing angles it
//! is fired seven times from slightly offset parallel origins (a
//! "thickened" ray), and the closest hit across all sub-rays wins.

use cgmath::{Point3, Vector3};

use super::physics::Player;
use super::voxels::World;

/// Distance along the ray at which sampling starts.
const RAY_START: f32 = 0.1;
/// Maximum selection range.
const RAY_END: f32 = 4.0;
/// March step length.
const RAY_STEP: f32 = 0.1;
/// Half-width of the thickened ray.
const RAY_OFFSET: f32 = 0.05;

/// Origin offsets of the seven parallel sub-rays.
const RAY_ORIGINS: [Vector3<f32>; 7] = [
    Vector3::new(0.0, 0.0, 0.0),
    Vector3::new(RAY_OFFSET, 0.0, 0.0),
    Vector3::new(-RAY_OFFSET, 0.0, 0.0),
    Vector3::new(0.0, RAY_OFFSET, 0.0),
    Vector3::new(0.0, -RAY_OFFSET, 0.0),
    Vector3::new(0.0, 0.0, RAY_OFFSET),
    Vector3::new(0.0, 0.0, -RAY_OFFSET),
];

/// Result of a selection raycast.
///
/// `hit` is the first non-air cell along the ray; `placement` is the empty
/// cell just before it on the winning sub-ray, or `None` when placing there
/// would be invalid (no empty cell seen, the cell overlaps the player's
/// body, or it is not face-adjacent to the hit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlockSelection {
    pub hit: Option<Point3<i32>>,
    pub placement: Option<Point3<i32>>,
}

/// Marches the thickened ray from `origin` along `direction` and returns
/// the selected block and placement candidate.
pub fn pick_block(
    world: &World,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    player: &Player,
) -> BlockSelection {
    let mut closest_hit = RAY_END;
    let mut best_hit: Option<Point3<i32>> = None;
    let mut best_placement: Option<Point3<i32>> = None;

    let player_box = player.body_box();

    for offset in RAY_ORIGINS {
        let ray_origin = origin + offset;
        let mut previous_cell: Option<Point3<i32>> = None;

        let mut t = RAY_START;
        while t < closest_hit {
            let point = ray_origin + direction * t;
            let cell = Point3::new(
                point.x.round() as i32,
                point.y.round() as i32,
                point.z.round() as i32,
            );

            if previous_cell == Some(cell) {
                t += RAY_STEP;
                continue;
            }

            if world.is_solid(cell) {
                // First solid cell on this sub-ray; it is closer than every
                // hit found so far because the march is capped at
                // `closest_hit`.
                closest_hit = t;
                best_hit = Some(cell);

                best_placement = previous_cell.filter(|prev| {
                    let prev_box = crate::game_state::physics::Aabb::centered(
                        Point3::new(prev.x as f32, prev.y as f32, prev.z as f32),
                        1.0,
                        1.0,
                        1.0,
                    );
                    !player_box.intersects(&prev_box)
                });
                break;
            }

            previous_cell = Some(cell);
            t += RAY_STEP;
        }
    }

    // The hit and the placement cell can end up non-adjacent through the
    // rounding of offset sub-rays; such a placement would create a floating
    // block, so reject it.
    if let (Some(hit), Some(placement)) = (best_hit, best_placement) {
        let delta = hit - placement;
        if delta.x.abs() + delta.y.abs() + delta.z.abs() != 1 {
            best_placement = None;
        }
    }

    BlockSelection {
        hit: best_hit,
        placement: best_placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::{BlockType, Chunk};

    fn world_with_block(cell: Point3<i32>) -> World {
        let mut world = World::new();
        let origin = World::chunk_origin(cell);
        world.insert_chunk(origin, Chunk::empty());
        world.set_block(cell, BlockType::STONE);
        world
    }

    #[test]
    fn straight_shot_selects_the_block_and_the_cell_in_front() {
        let world = world_with_block(Point3::new(0, 0, 3));
        // Player far away so its body cannot invalidate the placement.
        let player = Player::new(Point3::new(0.0, 20.0, 0.0));

        let selection = pick_block(
            &world,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            &player,
        );

        assert_eq!(selection.hit, Some(Point3::new(0, 0, 3)));
        assert_eq!(selection.placement, Some(Point3::new(0, 0, 2)));
    }

    #[test]
    fn nothing_in_range_selects_nothing() {
        let world = world_with_block(Point3::new(0, 0, 8));
        let player = Player::new(Point3::new(0.0, 20.0, 0.0));

        let selection = pick_block(
            &world,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            &player,
        );

        assert_eq!(selection.hit, None);
        assert_eq!(selection.placement, None);
    }

    #[test]
    fn placement_inside_the_player_is_rejected() {
        let world = world_with_block(Point3::new(0, 0, 2));
        // Feet at the cell in front of the block: the placement candidate
        // (0, 0, 1) overlaps the player's own body.
        let player = Player::new(Point3::new(0.0, -0.5, 1.0));

        let selection = pick_block(
            &world,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            &player,
        );

        assert_eq!(selection.hit, Some(Point3::new(0, 0, 2)));
        assert_eq!(selection.placement, None);
    }

    #[test]
    fn selection_is_looking_down_at_the_ground() {
        let world = world_with_block(Point3::new(0, -2, 0));
        let player = Player::new(Point3::new(10.0, 20.0, 10.0));

        let selection = pick_block(
            &world,
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            &player,
        );

        assert_eq!(selection.hit, Some(Point3::new(0, -2, 0)));
        assert_eq!(selection.placement, Some(Point3::new(0, -1, 0)));
    }
}
