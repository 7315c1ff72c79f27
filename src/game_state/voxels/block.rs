//! # Block Module
//!
//! Defines the block cell type stored in chunks and the set of materials
//! the terrain generator and player edits can produce.

use num_derive::FromPrimitive;

/// Enumerates all block materials in the world.
///
/// The discriminants are the material IDs carried by edit events and by the
/// vertex stream, so they must stay stable. `AIR` is the reserved absence
/// value: a missing chunk and an `AIR` cell are treated identically by every
/// consumer (meshing, collision, raycasting).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Absence of solid geometry.
    AIR = 0,

    /// Surface material of a terrain column.
    GRASS = 1,

    /// Subsurface material, down to five cells below the surface.
    DIRT = 2,

    /// Everything deeper.
    STONE = 3,
}

impl BlockType {
    /// Converts a raw material ID into a `BlockType`, if it names one.
    ///
    /// Used for the number-key material selection in the input layer.
    pub fn from_id(id: u8) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }
}

/// A single cell of a chunk.
///
/// Blocks have no identity of their own; they are always addressed through
/// the chunk that owns them. The representation is a single byte so a chunk
/// stays a flat, cache-friendly array.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub block_type: BlockType,
}

impl Block {
    pub const AIR: Block = Block {
        block_type: BlockType::AIR,
    };

    pub fn new(block_type: BlockType) -> Self {
        Block { block_type }
    }

    pub fn is_air(&self) -> bool {
        self.block_type == BlockType::AIR
    }

    pub fn is_solid(&self) -> bool {
        !self.is_air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_ids_round_trip() {
        assert_eq!(BlockType::from_id(0), Some(BlockType::AIR));
        assert_eq!(BlockType::from_id(1), Some(BlockType::GRASS));
        assert_eq!(BlockType::from_id(2), Some(BlockType::DIRT));
        assert_eq!(BlockType::from_id(3), Some(BlockType::STONE));
        assert_eq!(BlockType::from_id(9), None);
    }

    #[test]
    fn air_is_not_solid() {
        assert!(Block::AIR.is_air());
        assert!(!Block::AIR.is_solid());
        assert!(Block::new(BlockType::STONE).is_solid());
    }
}
