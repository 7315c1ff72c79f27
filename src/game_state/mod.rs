//! # Game State
//!
//! The central coordinator of the engine. `GameState` owns the world, the
//! player, the worker pool and the streaming/rendering state, and sequences
//! one frame: input, the horizontal and then vertical collision passes,
//! block edits, chunk streaming, the budgeted mesh upload, the selection
//! raycast, and the draw.
//!
//! Everything mutable lives here (no globals): the world map is shared with
//! the workers through an [`MtResource`], and all other state is owned
//! outright by this struct on the main thread.

pub mod camera;
pub mod config;
pub mod physics;
pub mod raycast;
pub mod rendering;
pub mod task_pool;
pub mod voxels;

use std::sync::Arc;
use std::time::Duration;

use cgmath::{Point3, Vector3};

use crate::application_state::input_manager::FrameInput;
use crate::core::MtResource;

use camera::{Camera, CameraUniform, Projection};
use config::GameConfig;
use physics::{collision, Player};
use raycast::BlockSelection;
use rendering::{build_chunk_mesh, ChunkRenderer, ChunkStreamer, MeshResult};
use task_pool::TaskPool;
use voxels::terrain::TerrainGenerator;
use voxels::{BlockType, World, CHUNK_SIZE};

/// Walking speed, in blocks per second.
const MOVE_SPEED: f32 = 10.0;

/// Air control factor: horizontal movement is damped while airborne.
const AIR_MOVE_SCALE: f32 = 0.5;

/// Physics steps are clamped to this delta so a long frame cannot tunnel
/// the player through geometry.
const MAX_DELTA_TIME: f32 = 0.02;

/// The running game: world, player, workers, streaming and rendering state.
pub struct GameState {
    config: GameConfig,
    world: MtResource<World>,
    generator: Arc<TerrainGenerator>,
    pool: TaskPool,
    streamer: ChunkStreamer,
    renderer: ChunkRenderer,
    player: Player,
    camera: Camera,
    projection: Projection,
    camera_uniform: CameraUniform,
    selection: BlockSelection,
    selected_material: BlockType,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl GameState {
    /// Creates the game state and kicks off the initial terrain load around
    /// the spawn point.
    pub fn new(
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
        device: wgpu::Device,
        queue: wgpu::Queue,
        shader_source: String,
        atlas_bytes: Vec<u8>,
    ) -> Self {
        let config = GameConfig::load();
        log::debug!("Running with {:?}", config);

        let generator = Arc::new(TerrainGenerator::new(&config.noise));

        // Spawn the player a few blocks above the terrain surface at the
        // world origin.
        let spawn_height = generator.surface_height(0, 0) as f32 + 3.0;
        let player = Player::new(Point3::new(0.0, spawn_height, 0.0));
        let camera = Camera::new(player.eye_position());

        let projection = Projection::new(surface_config.width, surface_config.height);
        let renderer = ChunkRenderer::new(
            surface,
            surface_config,
            &device,
            &queue,
            &shader_source,
            &atlas_bytes,
        );

        let pool = TaskPool::new(config.resolved_worker_threads());
        let streamer = ChunkStreamer::new(Duration::from_millis(config.upload_budget_ms));

        let mut state = GameState {
            config,
            world: MtResource::new(World::new()),
            generator,
            pool,
            streamer,
            renderer,
            player,
            camera,
            projection,
            camera_uniform: CameraUniform::new(),
            selection: BlockSelection::default(),
            selected_material: BlockType::GRASS,
            device,
            queue,
        };

        state.stream_chunks();
        state
    }

    /// Handles a window resize.
    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.projection.resize(size.width, size.height);
        self.renderer.resize(&self.device, size);
    }

    /// Whether the initial chunk load has finished.
    pub fn is_world_ready(&self) -> bool {
        self.streamer.is_world_ready()
    }

    /// Advances the game by one frame.
    pub fn frame(&mut self, dt: f32, input: &FrameInput) {
        if !self.streamer.is_world_ready() {
            // Bootstrapping: keep draining worker output and show the
            // loading frame; input and physics wait for solid ground.
            self.streamer.upload_ready(&self.device, &self.queue);
            self.render();
            return;
        }

        let dt = dt.min(MAX_DELTA_TIME);
        let old_position = self.player.position;

        self.apply_input(dt, input);

        collision::step_vertical(&self.world.get(), &mut self.player, dt);

        if Self::world_cell_origin(self.player.position)
            != Self::world_cell_origin(old_position)
        {
            self.stream_chunks();
        }

        self.streamer.upload_ready(&self.device, &self.queue);

        self.camera.position = self.player.eye_position();
        self.selection = raycast::pick_block(
            &self.world.get(),
            self.camera.position,
            self.camera.forward(),
            &self.player,
        );

        self.render();
    }

    /// Applies look, walk, jump and edit input for this frame.
    fn apply_input(&mut self, dt: f32, input: &FrameInput) {
        let (dx, dy) = input.mouse_delta;
        self.camera.rotate(dx, dy);

        let speed = MOVE_SPEED * dt
            * if self.player.on_ground {
                1.0
            } else {
                AIR_MOVE_SCALE
            };

        let mut movement = Vector3::new(0.0, 0.0, 0.0);
        if input.move_forward {
            movement += self.camera.walk_forward() * speed;
        }
        if input.move_backward {
            movement -= self.camera.walk_forward() * speed;
        }
        if input.move_right {
            movement += self.camera.walk_right() * speed;
        }
        if input.move_left {
            movement -= self.camera.walk_right() * speed;
        }

        collision::step_horizontal(&self.world.get(), &mut self.player, movement);

        if input.jump {
            self.player.try_jump();
        }

        if let Some(id) = input.select_material {
            if let Some(material) = BlockType::from_id(id) {
                if material != BlockType::AIR {
                    self.selected_material = material;
                }
            }
        }

        // Edits use the selection from the previous frame's raycast, which
        // is what the crosshair showed when the click happened.
        if input.break_block {
            if let Some(hit) = self.selection.hit {
                self.break_block(hit);
            }
        }
        if input.place_block {
            if let Some(cell) = self.selection.placement {
                self.place_block(cell, self.selected_material);
            }
        }
    }

    /// Removes the block at `pos` (if it exists and is not already air) and
    /// schedules priority remeshes for every chunk the edit touches.
    pub fn break_block(&mut self, pos: Point3<i32>) {
        {
            let mut world = self.world.get_mut();
            match world.block_at(pos) {
                Some(block) if block.is_solid() => world.set_block(pos, BlockType::AIR),
                _ => return,
            }
        }
        self.remesh_after_edit(pos);
    }

    /// Places a block of `material` at `pos` and schedules priority
    /// remeshes for every chunk the edit touches.
    pub fn place_block(&mut self, pos: Point3<i32>, material: BlockType) {
        self.world.get_mut().set_block(pos, material);
        self.remesh_after_edit(pos);
    }

    fn remesh_after_edit(&self, pos: Point3<i32>) {
        for origin in World::chunks_touching_block(pos) {
            self.spawn_mesh_job(origin, true);
        }
    }

    /// Submits generation jobs for every chunk within load distance of the
    /// player that has not been requested yet. Cylindrical in XZ, full
    /// range in Y.
    fn stream_chunks(&mut self) {
        let player_chunk = Self::world_cell_origin(self.player.position);
        let xz = self.config.xz_load_distance;
        let y = self.config.y_load_distance;

        for cx in -xz..=xz {
            for cy in -y..=y {
                for cz in -xz..=xz {
                    if cx * cx + cz * cz > xz * xz {
                        continue;
                    }
                    let origin = player_chunk + Vector3::new(cx, cy, cz) * CHUNK_SIZE;
                    if self.streamer.try_begin_request(origin) {
                        self.spawn_generation_job(origin);
                    }
                }
            }
        }
    }

    /// Queues background generation of one chunk. The worker inserts the
    /// chunk under the world's write lock and then queues that chunk's
    /// first meshing pass.
    fn spawn_generation_job(&self, origin: Point3<i32>) {
        let world = self.world.clone();
        let generator = self.generator.clone();
        let ready = self.streamer.ready_meshes();
        let sender = self.pool.sender();

        self.pool.sender().submit(move || {
            let chunk = generator.generate(origin);
            world.get_mut().insert_chunk(origin, chunk);

            sender.submit(move || {
                let vertices = build_chunk_mesh(&world.get(), origin);
                ready.push(MeshResult { origin, vertices });
            });
        });
    }

    /// Queues a meshing pass for one chunk; priority jobs preempt the
    /// generation backlog so edits appear without waiting behind it.
    fn spawn_mesh_job(&self, origin: Point3<i32>, priority: bool) {
        let world = self.world.clone();
        let ready = self.streamer.ready_meshes();

        let job = move || {
            let vertices = build_chunk_mesh(&world.get(), origin);
            ready.push(MeshResult { origin, vertices });
        };

        if priority {
            self.pool.sender().submit_priority(job);
        } else {
            self.pool.sender().submit(job);
        }
    }

    fn render(&mut self) {
        let world_ready = self.streamer.is_world_ready();

        // The highlight wants the material of the block under the
        // crosshair, not the material the player would place.
        let highlighted_material = self
            .selection
            .hit
            .and_then(|hit| self.world.get().block_at(hit))
            .map(|block| block.block_type as u8)
            .unwrap_or(0);

        self.camera_uniform.update(
            &self.camera,
            &self.projection,
            &self.selection,
            highlighted_material,
        );
        self.renderer.update_camera(&self.queue, &self.camera_uniform);

        let player_chunk = Self::world_cell_origin(self.player.position);
        self.renderer.render(
            &self.device,
            &self.queue,
            &self.streamer,
            player_chunk,
            &self.config,
            world_ready,
        );
    }

    /// Stops the worker pool, discarding queued work and joining every
    /// worker.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }

    /// The origin of the chunk containing a continuous position, using the
    /// same cell rounding as the raycaster.
    fn world_cell_origin(pos: Point3<f32>) -> Point3<i32> {
        World::chunk_origin(Point3::new(
            pos.x.round() as i32,
            pos.y.round() as i32,
            pos.z.round() as i32,
        ))
    }
}
