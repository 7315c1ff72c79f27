//! End-to-end tests of the background chunk pipeline: generation jobs on
//! the worker pool filling the world map, follow-up meshing jobs, and the
//! ready-mesh queue hand-off. This is the same wiring the game uses, minus
//! the GPU upload at the end.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cgmath::{Point3, Vector3};

use voxel_game::core::MtResource;
use voxel_game::game_state::config::NoiseConfig;
use voxel_game::game_state::rendering::{build_chunk_mesh, ChunkVertex, MeshResult, ReadyMeshes};
use voxel_game::game_state::task_pool::TaskPool;
use voxel_game::game_state::voxels::terrain::TerrainGenerator;
use voxel_game::game_state::voxels::{BlockType, World, CHUNK_SIZE};

const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Submits a generation job exactly the way the game does: generate off
/// the main thread, insert under the world's write lock, then queue the
/// first meshing pass.
fn spawn_generation(
    pool: &TaskPool,
    world: &MtResource<World>,
    generator: &Arc<TerrainGenerator>,
    ready: &ReadyMeshes,
    origin: Point3<i32>,
) {
    let world = world.clone();
    let generator = generator.clone();
    let ready = ready.clone();
    let sender = pool.sender();

    pool.sender().submit(move || {
        let chunk = generator.generate(origin);
        world.get_mut().insert_chunk(origin, chunk);

        sender.submit(move || {
            let vertices = build_chunk_mesh(&world.get(), origin);
            ready.push(MeshResult { origin, vertices });
        });
    });
}

/// Drains the ready queue until `expected` results arrived or the timeout
/// hits, mimicking the main-thread consumer.
fn drain_results(ready: &ReadyMeshes, expected: usize) -> HashMap<Point3<i32>, Vec<ChunkVertex>> {
    let mut results = HashMap::new();
    let deadline = Instant::now() + DRAIN_TIMEOUT;

    while results.len() < expected {
        if let Some(result) = ready.pop() {
            let previous = results.insert(result.origin, result.vertices);
            assert!(
                previous.is_none(),
                "chunk {:?} produced two mesh results",
                result.origin
            );
        } else {
            assert!(Instant::now() < deadline, "pipeline stalled");
            std::thread::sleep(Duration::from_millis(5));
        }
    }
    results
}

/// The cylindrical load volume around the origin chunk, as the streaming
/// coordinator walks it.
fn load_volume(xz_dist: i32, y_dist: i32) -> Vec<Point3<i32>> {
    let mut origins = Vec::new();
    for cx in -xz_dist..=xz_dist {
        for cy in -y_dist..=y_dist {
            for cz in -xz_dist..=xz_dist {
                if cx * cx + cz * cz > xz_dist * xz_dist {
                    continue;
                }
                origins.push(Point3::new(cx, cy, cz) * CHUNK_SIZE);
            }
        }
    }
    origins
}

#[test]
fn pipeline_generates_and_meshes_every_requested_chunk() {
    let pool = TaskPool::new(4);
    let world = MtResource::new(World::new());
    let generator = Arc::new(TerrainGenerator::new(&NoiseConfig::default()));
    let ready = ReadyMeshes::new();

    let origins = load_volume(2, 1);
    for &origin in &origins {
        spawn_generation(&pool, &world, &generator, &ready, origin);
    }

    let results = drain_results(&ready, origins.len());

    // Every requested chunk got exactly one result, and the chunk data
    // itself landed in the world.
    assert_eq!(results.len(), origins.len());
    for &origin in &origins {
        assert!(results.contains_key(&origin), "no mesh for {:?}", origin);
        assert!(world.get().contains_chunk(origin), "no chunk for {:?}", origin);
    }

    // The surface chunks have geometry; a result being empty is legal for
    // fully buried or all-air chunks, but not for the whole volume.
    assert!(results.values().any(|v| !v.is_empty()));
}

#[test]
fn edit_remesh_updates_the_edited_chunk_and_its_neighbor() {
    let pool = TaskPool::new(2);
    let world = MtResource::new(World::new());
    let generator = Arc::new(TerrainGenerator::new(&NoiseConfig::default()));
    let ready = ReadyMeshes::new();

    // Load the column of chunks around the world origin and its -X
    // neighbors, so the seam at x = 0 has real terrain on both sides.
    let mut origins = Vec::new();
    for cx in [-CHUNK_SIZE, 0] {
        for cy in [-CHUNK_SIZE, 0] {
            origins.push(Point3::new(cx, cy, 0));
        }
    }
    for &origin in &origins {
        spawn_generation(&pool, &world, &generator, &ready, origin);
    }
    drain_results(&ready, origins.len());

    // Make the seam at x = 0 deterministic: a solid block on each side of
    // the boundary at surface height. Their facing faces cull each other.
    let surface_y = generator.surface_height(0, 0);
    let edited = Point3::new(0, surface_y, 0);
    let across = Point3::new(-1, surface_y, 0);
    {
        let mut world = world.get_mut();
        world.set_block(edited, BlockType::STONE);
        world.set_block(across, BlockType::STONE);
    }

    let own_chunk = World::chunk_origin(edited);
    let neighbor = own_chunk - Vector3::new(CHUNK_SIZE, 0, 0);
    let remesh = |origin: Point3<i32>, priority: bool| {
        let world = world.clone();
        let ready = ready.clone();
        let job = move || {
            let vertices = build_chunk_mesh(&world.get(), origin);
            ready.push(MeshResult { origin, vertices });
        };
        if priority {
            pool.sender().submit_priority(job);
        } else {
            pool.sender().submit(job);
        }
    };

    remesh(own_chunk, false);
    remesh(neighbor, false);
    let before = drain_results(&ready, 2);

    // Break the block at local x offset 0: both the owning chunk and the
    // -X neighbor must remesh, with the priority path.
    let affected = World::chunks_touching_block(edited);
    assert!(affected.contains(&own_chunk));
    assert!(affected.contains(&neighbor));

    world.get_mut().set_block(edited, BlockType::AIR);
    for &origin in &affected {
        remesh(origin, true);
    }
    let after = drain_results(&ready, affected.len());

    // The edited chunk lost the block's faces.
    let own_before: &[u8] = bytemuck::cast_slice(&before[&own_chunk]);
    let own_after: &[u8] = bytemuck::cast_slice(&after[&own_chunk]);
    assert_ne!(own_before, own_after);

    // The neighbor gained the newly exposed face across the boundary.
    let neighbor_before: &[u8] = bytemuck::cast_slice(&before[&neighbor]);
    let neighbor_after: &[u8] = bytemuck::cast_slice(&after[&neighbor]);
    assert_ne!(neighbor_before, neighbor_after);
    assert!(neighbor_after.len() > neighbor_before.len());
}
