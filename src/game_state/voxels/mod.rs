//! Voxel data management: blocks, chunks, the world map and terrain generation.

pub mod block;
pub mod chunk;
pub mod terrain;
pub mod world;

pub use block::{Block, BlockType};
pub use chunk::{Chunk, CHUNK_SIZE, CHUNK_VOLUME};
pub use world::World;
