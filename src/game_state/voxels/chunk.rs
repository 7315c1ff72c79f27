//! # Chunk Module
//!
//! A chunk is the unit of generation, meshing and storage: a dense cube of
//! `CHUNK_SIZE³` blocks addressed by local coordinates in `[0, CHUNK_SIZE)`
//! on each axis.
//!
//! Chunks are owned exclusively by the world map and never shared by value;
//! everything outside the map addresses blocks through world coordinates.

use cgmath::Point3;

use super::block::Block;

/// Edge length of a chunk in blocks.
pub const CHUNK_SIZE: i32 = 16;

/// Total number of blocks in a chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// A `CHUNK_SIZE³` cube of blocks.
///
/// Storage is a flat boxed slice in x-major order (x, then y, then z), which
/// keeps a chunk at one byte per cell and makes the meshing scan a linear
/// walk.
pub struct Chunk {
    blocks: Box<[Block; CHUNK_VOLUME]>,
}

impl Chunk {
    /// Creates a chunk filled entirely with air.
    pub fn empty() -> Self {
        Self::filled(Block::AIR)
    }

    /// Creates a chunk filled entirely with the given block.
    pub fn filled(block: Block) -> Self {
        Chunk {
            blocks: Box::new([block; CHUNK_VOLUME]),
        }
    }

    /// Returns the block at the given local coordinates, or `None` if any
    /// axis falls outside `[0, CHUNK_SIZE)`.
    pub fn block(&self, local: Point3<i32>) -> Option<Block> {
        Self::index(local).map(|i| self.blocks[i])
    }

    /// Overwrites the block at the given local coordinates.
    ///
    /// Out-of-bounds coordinates are a no-op; the world map has already
    /// quantized the address, so this only guards against callers bypassing
    /// it.
    pub fn set_block(&mut self, local: Point3<i32>, block: Block) {
        if let Some(i) = Self::index(local) {
            self.blocks[i] = block;
        }
    }

    fn index(local: Point3<i32>) -> Option<usize> {
        let in_bounds = (0..CHUNK_SIZE).contains(&local.x)
            && (0..CHUNK_SIZE).contains(&local.y)
            && (0..CHUNK_SIZE).contains(&local.z);
        if !in_bounds {
            return None;
        }
        Some((local.x + local.y * CHUNK_SIZE + local.z * CHUNK_SIZE * CHUNK_SIZE) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::voxels::block::BlockType;

    #[test]
    fn local_access_round_trips() {
        let mut chunk = Chunk::empty();
        let local = Point3::new(3, 7, 11);
        assert_eq!(chunk.block(local), Some(Block::AIR));

        chunk.set_block(local, Block::new(BlockType::STONE));
        assert_eq!(chunk.block(local), Some(Block::new(BlockType::STONE)));

        // Neighbouring cells are untouched.
        assert_eq!(chunk.block(Point3::new(4, 7, 11)), Some(Block::AIR));
    }

    #[test]
    fn out_of_bounds_is_no_block() {
        let chunk = Chunk::empty();
        assert_eq!(chunk.block(Point3::new(-1, 0, 0)), None);
        assert_eq!(chunk.block(Point3::new(0, CHUNK_SIZE, 0)), None);
        assert_eq!(chunk.block(Point3::new(0, 0, 99)), None);
    }

    #[test]
    fn cells_do_not_alias() {
        let mut chunk = Chunk::empty();
        for x in 0..CHUNK_SIZE {
            chunk.set_block(Point3::new(x, 0, 0), Block::new(BlockType::DIRT));
        }
        assert_eq!(chunk.block(Point3::new(0, 1, 0)), Some(Block::AIR));
        assert_eq!(chunk.block(Point3::new(0, 0, 1)), Some(Block::AIR));
    }
}
