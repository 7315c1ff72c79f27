//! # World Module
//!
//! The `World` is the single source of truth for block data: a sparse map
//! from chunk origins to chunks. Origins are world-space coordinates of a
//! chunk's minimum corner and are always multiples of `CHUNK_SIZE` on every
//! axis; the same quantization function is used by every component, because
//! an off-by-one here would desynchronize generation, meshing, collision
//! and raycasting from each other.
//!
//! ## Concurrency
//!
//! The world is shared as an `MtResource<World>` (one lock over the whole
//! map). Workers take the write lock briefly to insert freshly generated
//! chunks and the read lock while meshing; the main thread takes the write
//! lock to apply block edits. Mesh vertex data and GPU buffers are *not*
//! stored here; they belong to the main-thread streaming coordinator, so
//! mesh hand-off never contends with block access.

use std::collections::HashMap;

use cgmath::{EuclideanSpace, Point3, Vector3};

use super::block::{Block, BlockType};
use super::chunk::{Chunk, CHUNK_SIZE};

/// Sparse chunk storage keyed by chunk origin.
pub struct World {
    chunks: HashMap<Point3<i32>, Chunk>,
}

impl World {
    /// Creates a world with no chunks loaded.
    pub fn new() -> Self {
        World {
            chunks: HashMap::new(),
        }
    }

    /// Returns the origin of the chunk containing the given world position.
    ///
    /// Each axis is floor-divided by `CHUNK_SIZE` and multiplied back, so
    /// the result is a multiple of `CHUNK_SIZE` and
    /// `pos - chunk_origin(pos)` lies in `[0, CHUNK_SIZE)³`. Uses euclidean
    /// division, which is exact for negative coordinates.
    pub fn chunk_origin(pos: Point3<i32>) -> Point3<i32> {
        Point3::new(
            pos.x.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
            pos.y.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
            pos.z.div_euclid(CHUNK_SIZE) * CHUNK_SIZE,
        )
    }

    /// Returns the block at a world position.
    ///
    /// `None` means the owning chunk has not been generated (or the local
    /// offset fell outside the chunk, which cannot happen for origins
    /// produced by [`World::chunk_origin`]). Callers must treat `None` the
    /// same as air.
    pub fn block_at(&self, pos: Point3<i32>) -> Option<Block> {
        let origin = Self::chunk_origin(pos);
        let chunk = self.chunks.get(&origin)?;
        chunk.block(Point3::from_vec(pos - origin))
    }

    /// Returns whether the cell at a world position is solid.
    ///
    /// A missing chunk behaves exactly like air. This is the accessor the
    /// mesh builder, collision resolver and raycaster share.
    pub fn is_solid(&self, pos: Point3<i32>) -> bool {
        self.block_at(pos).map_or(false, |b| b.is_solid())
    }

    /// Overwrites the block at a world position.
    ///
    /// A no-op if the owning chunk does not exist; edits can only touch
    /// terrain that has been generated.
    pub fn set_block(&mut self, pos: Point3<i32>, block_type: BlockType) {
        let origin = Self::chunk_origin(pos);
        if let Some(chunk) = self.chunks.get_mut(&origin) {
            chunk.set_block(Point3::from_vec(pos - origin), Block::new(block_type));
        }
    }

    /// Inserts a generated chunk at the given origin, replacing any previous
    /// chunk there.
    pub fn insert_chunk(&mut self, origin: Point3<i32>, chunk: Chunk) {
        self.chunks.insert(origin, chunk);
    }

    /// Returns whether a chunk exists at the given origin.
    pub fn contains_chunk(&self, origin: Point3<i32>) -> bool {
        self.chunks.contains_key(&origin)
    }

    /// Returns the number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the origins of every chunk whose mesh depends on the block at
    /// `pos`: the owning chunk, plus each neighbor chunk whose shared
    /// boundary the block sits on (local offset 0 or `CHUNK_SIZE - 1` on
    /// that axis). A block in a chunk corner touches up to three neighbors.
    pub fn chunks_touching_block(pos: Point3<i32>) -> Vec<Point3<i32>> {
        let origin = Self::chunk_origin(pos);
        let offset = pos - origin;

        let axes = [
            (offset.x, Vector3::new(CHUNK_SIZE, 0, 0)),
            (offset.y, Vector3::new(0, CHUNK_SIZE, 0)),
            (offset.z, Vector3::new(0, 0, CHUNK_SIZE)),
        ];

        let mut origins = vec![origin];
        for (local, step) in axes {
            if local == 0 {
                origins.push(origin - step);
            }
            if local == CHUNK_SIZE - 1 {
                origins.push(origin + step);
            }
        }
        origins
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_is_quantized_on_every_axis() {
        let samples = [
            Point3::new(0, 0, 0),
            Point3::new(1, 2, 3),
            Point3::new(15, 15, 15),
            Point3::new(16, 16, 16),
            Point3::new(-1, -16, -17),
            Point3::new(-31, 47, -48),
            Point3::new(1000, -1000, 123),
        ];
        for p in samples {
            let origin = World::chunk_origin(p);
            assert_eq!(origin.x.rem_euclid(CHUNK_SIZE), 0);
            assert_eq!(origin.y.rem_euclid(CHUNK_SIZE), 0);
            assert_eq!(origin.z.rem_euclid(CHUNK_SIZE), 0);

            let local = p - origin;
            for d in [local.x, local.y, local.z] {
                assert!((0..CHUNK_SIZE).contains(&d), "local {:?} for {:?}", local, p);
            }
        }
    }

    #[test]
    fn missing_chunk_reads_as_no_block() {
        let world = World::new();
        assert_eq!(world.block_at(Point3::new(5, 5, 5)), None);
        assert!(!world.is_solid(Point3::new(5, 5, 5)));
    }

    #[test]
    fn set_block_into_missing_chunk_is_a_no_op() {
        let mut world = World::new();
        world.set_block(Point3::new(5, 5, 5), BlockType::STONE);
        assert_eq!(world.block_at(Point3::new(5, 5, 5)), None);
    }

    #[test]
    fn blocks_round_trip_through_world_coordinates() {
        let mut world = World::new();
        world.insert_chunk(Point3::new(-16, 0, 16), Chunk::empty());

        let pos = Point3::new(-3, 12, 30);
        world.set_block(pos, BlockType::DIRT);
        assert_eq!(world.block_at(pos), Some(Block::new(BlockType::DIRT)));
        assert!(world.is_solid(pos));
        assert!(!world.is_solid(Point3::new(-3, 12, 31)));
    }

    #[test]
    fn interior_block_touches_only_its_own_chunk() {
        let affected = World::chunks_touching_block(Point3::new(5, 5, 5));
        assert_eq!(affected, vec![Point3::new(0, 0, 0)]);
    }

    #[test]
    fn boundary_block_touches_the_facing_neighbor() {
        // Local x offset 0 -> the -X neighbor must be remeshed too.
        let affected = World::chunks_touching_block(Point3::new(16, 5, 5));
        assert_eq!(affected, vec![Point3::new(16, 0, 0), Point3::new(0, 0, 0)]);
    }

    #[test]
    fn corner_block_touches_three_neighbors() {
        let affected = World::chunks_touching_block(Point3::new(15, 0, 31));
        assert_eq!(
            affected,
            vec![
                Point3::new(0, 0, 16),
                Point3::new(16, 0, 16),
                Point3::new(0, -16, 16),
                Point3::new(0, 0, 32),
            ]
        );
    }
}
