//! # Terrain Generation
//!
//! Deterministic terrain generation from a seeded fractal-Brownian-motion
//! height field. A generator is a pure function of its configuration and a
//! chunk origin, which is what allows chunks to be generated independently
//! on any worker thread, in any order, with identical results.

use cgmath::Point3;
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::game_state::config::NoiseConfig;

use super::block::{Block, BlockType};
use super::chunk::{Chunk, CHUNK_SIZE};

/// Depth, in blocks, of the dirt layer beneath the grass surface.
const SUBSURFACE_DEPTH: i32 = 5;

/// Seeded height-field terrain generator.
///
/// Shared read-only across all worker threads; sampling the noise function
/// takes `&self`.
pub struct TerrainGenerator {
    height_field: Fbm<Perlin>,
    amplitude: f64,
}

impl TerrainGenerator {
    /// Builds a generator from the noise parameters.
    pub fn new(config: &NoiseConfig) -> Self {
        let height_field = Fbm::<Perlin>::new(config.seed)
            .set_octaves(config.octaves)
            .set_frequency(config.frequency)
            .set_lacunarity(config.lacunarity)
            .set_persistence(config.gain);

        TerrainGenerator {
            height_field,
            amplitude: config.amplitude,
        }
    }

    /// Returns the surface height of the terrain column at (x, z), in
    /// world-space blocks.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self.height_field.get([x as f64, z as f64]);
        (sample * self.amplitude).round() as i32
    }

    /// Generates the chunk whose minimum corner sits at `origin`.
    ///
    /// Every (x, z) column samples the height field once; each cell is then
    /// classified by its global y against the column height: above is air,
    /// at the surface grass, within [`SUBSURFACE_DEPTH`] below dirt, and
    /// everything deeper stone.
    pub fn generate(&self, origin: Point3<i32>) -> Chunk {
        let mut chunk = Chunk::empty();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let height = self.surface_height(origin.x + x, origin.z + z);

                for y in 0..CHUNK_SIZE {
                    let global_y = origin.y + y;
                    let block_type = if global_y > height {
                        BlockType::AIR
                    } else if global_y == height {
                        BlockType::GRASS
                    } else if global_y >= height - SUBSURFACE_DEPTH {
                        BlockType::DIRT
                    } else {
                        BlockType::STONE
                    };
                    chunk.set_block(Point3::new(x, y, z), Block::new(block_type));
                }
            }
        }

        chunk
    }
}
