//! # Chunk Mesh Building
//!
//! Converts a chunk's block data into a flat vertex buffer by face culling:
//! a block face is emitted only when the neighboring cell is missing or
//! air. The neighbor test goes through the *world*, not the local chunk;
//! faces on a chunk boundary depend on the adjacent chunk, and testing only
//! locally would open visible seams at every chunk border.
//!
//! Meshing runs on worker threads under a read lock of the world; output
//! hand-off to the main thread goes through the streaming module.

use cgmath::{Point3, Vector3};

use crate::game_state::voxels::{World, CHUNK_SIZE};

use super::vertex::ChunkVertex;

/// Neighbor directions indexed by face ID:
/// top (+Y), front (-Z), right (-X), back (+Z), left (+X), bottom (-Y).
const FACE_DIRECTIONS: [Vector3<i32>; 6] = [
    Vector3::new(0, 1, 0),
    Vector3::new(0, 0, -1),
    Vector3::new(-1, 0, 0),
    Vector3::new(0, 0, 1),
    Vector3::new(1, 0, 0),
    Vector3::new(0, -1, 0),
];

const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 1.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0],
];

/// Corner positions and UVs of the two triangles of each face, in face-ID
/// order. Positions are relative to the block center.
const FACE_VERTICES: [[([f32; 3], [f32; 2]); 6]; 6] = [
    // Top face (+Y)
    [
        ([0.5, 0.5, -0.5], [0.0, 0.0]),
        ([-0.5, 0.5, -0.5], [1.0, 0.0]),
        ([-0.5, 0.5, 0.5], [1.0, 1.0]),
        ([0.5, 0.5, -0.5], [0.0, 0.0]),
        ([0.5, 0.5, 0.5], [0.0, 1.0]),
        ([-0.5, 0.5, 0.5], [1.0, 1.0]),
    ],
    // Front face (-Z)
    [
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([-0.5, 0.5, -0.5], [0.0, 1.0]),
        ([0.5, 0.5, -0.5], [1.0, 1.0]),
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([0.5, -0.5, -0.5], [1.0, 0.0]),
        ([0.5, 0.5, -0.5], [1.0, 1.0]),
    ],
    // Right face (-X)
    [
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([-0.5, 0.5, -0.5], [0.0, 1.0]),
        ([-0.5, 0.5, 0.5], [1.0, 1.0]),
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([-0.5, -0.5, 0.5], [1.0, 0.0]),
        ([-0.5, 0.5, 0.5], [1.0, 1.0]),
    ],
    // Back face (+Z)
    [
        ([-0.5, -0.5, 0.5], [0.0, 0.0]),
        ([-0.5, 0.5, 0.5], [0.0, 1.0]),
        ([0.5, 0.5, 0.5], [1.0, 1.0]),
        ([-0.5, -0.5, 0.5], [0.0, 0.0]),
        ([0.5, -0.5, 0.5], [1.0, 0.0]),
        ([0.5, 0.5, 0.5], [1.0, 1.0]),
    ],
    // Left face (+X)
    [
        ([0.5, -0.5, -0.5], [0.0, 0.0]),
        ([0.5, 0.5, -0.5], [0.0, 1.0]),
        ([0.5, 0.5, 0.5], [1.0, 1.0]),
        ([0.5, -0.5, -0.5], [0.0, 0.0]),
        ([0.5, -0.5, 0.5], [1.0, 0.0]),
        ([0.5, 0.5, 0.5], [1.0, 1.0]),
    ],
    // Bottom face (-Y)
    [
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([0.5, -0.5, -0.5], [1.0, 0.0]),
        ([0.5, -0.5, 0.5], [1.0, 1.0]),
        ([-0.5, -0.5, -0.5], [0.0, 0.0]),
        ([-0.5, -0.5, 0.5], [0.0, 1.0]),
        ([0.5, -0.5, 0.5], [1.0, 1.0]),
    ],
];

/// Builds the vertex buffer for the chunk at `origin`.
///
/// An empty result is a valid, expected outcome: a chunk that is fully air
/// or fully buried emits no geometry. The scan order is fixed (x, then y,
/// then z, faces in ID order), so meshing an unchanged chunk twice yields
/// byte-identical buffers.
pub fn build_chunk_mesh(world: &World, origin: Point3<i32>) -> Vec<ChunkVertex> {
    let mut vertices = Vec::new();

    for x in 0..CHUNK_SIZE {
        for y in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let block_pos = origin + Vector3::new(x, y, z);
                let block = match world.block_at(block_pos) {
                    Some(block) if block.is_solid() => block,
                    _ => continue,
                };

                for face_id in 0..6 {
                    let neighbor = block_pos + FACE_DIRECTIONS[face_id];
                    if world.is_solid(neighbor) {
                        continue;
                    }

                    let normal = FACE_NORMALS[face_id];
                    for (corner, uv) in FACE_VERTICES[face_id] {
                        vertices.push(ChunkVertex {
                            position: [
                                corner[0] + block_pos.x as f32,
                                corner[1] + block_pos.y as f32,
                                corner[2] + block_pos.z as f32,
                            ],
                            tex_coords: uv,
                            face_id: face_id as f32,
                            block_type: block.block_type as u8 as f32,
                            normal,
                        });
                    }
                }
            }
        }
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::{BlockType, Chunk};

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
    fn empty_chunk_meshes_to_nothing() {
        let mut world = World::new();
        world.insert_chunk(Point3::new(0, 0, 0), Chunk::empty());
        assert!(build_chunk_mesh(&world, Point3::new(0, 0, 0)).is_empty());
    }

    #[test]
    fn isolated_block_emits_six_faces() {
        let world = world_with_blocks(&[Point3::new(5, 5, 5)]);
        let mesh = build_chunk_mesh(&world, Point3::new(0, 0, 0));
        assert_eq!(mesh.len(), 6 * 6);
    }

    #[test]
    fn fully_surrounded_block_emits_nothing_for_itself() {
        // A 3x3x3 stone cube: the center block has all six neighbors solid.
        let mut cells = Vec::new();
        for x in 4..7 {
            for y in 4..7 {
                for z in 4..7 {
                    cells.push(Point3::new(x, y, z));
                }
            }
        }
        let world = world_with_blocks(&cells);
        let mesh = build_chunk_mesh(&world, Point3::new(0, 0, 0));

        // 27 blocks, but only the outer shell is visible: every face of the
        // cube is a 3x3 grid of block faces.
        assert_eq!(mesh.len(), 6 * 9 * 6);

        // No vertex belongs to a face of the center block: each such face
        // would sit half a block off the center (5,5,5) on one axis.
        let center_face_positions = mesh.iter().filter(|v| {
            let [x, y, z] = v.position;
            (x - 5.0).abs() <= 0.5 && (y - 5.0).abs() <= 0.5 && (z - 5.0).abs() <= 0.5
        });
        assert_eq!(center_face_positions.count(), 0);
    }

    #[test]
    fn meshing_is_idempotent_to_the_byte() {
        let world = world_with_blocks(&[
            Point3::new(1, 2, 3),
            Point3::new(1, 3, 3),
            Point3::new(8, 0, 15),
        ]);
        let a = build_chunk_mesh(&world, Point3::new(0, 0, 0));
        let b = build_chunk_mesh(&world, Point3::new(0, 0, 0));

        let a_bytes: &[u8] = bytemuck::cast_slice(&a);
        let b_bytes: &[u8] = bytemuck::cast_slice(&b);
        assert_eq!(a_bytes, b_bytes);
    }

    #[test]
    fn chunk_border_faces_respect_the_neighbor_chunk() {
        // Two stone blocks facing each other across the x = 0 chunk
        // boundary: (0, 5, 5) in chunk (0,0,0) and (-1, 5, 5) in chunk
        // (-16,0,0).
        let world = world_with_blocks(&[Point3::new(0, 5, 5), Point3::new(-1, 5, 5)]);

        let mesh = build_chunk_mesh(&world, Point3::new(0, 0, 0));
        // The -X face of (0,5,5) is culled by the neighbor chunk's block:
        // five faces remain.
        assert_eq!(mesh.len(), 5 * 6);

        // Against a missing neighbor chunk the same face would be emitted.
        let lonely = world_with_blocks(&[Point3::new(0, 5, 5)]);
        let lonely_mesh = build_chunk_mesh(&lonely, Point3::new(0, 0, 0));
        assert_eq!(lonely_mesh.len(), 6 * 6);
    }
}
