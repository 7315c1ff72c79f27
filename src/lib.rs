//! # Voxel Game
//!
//! The runtime core of a block-world game: procedural terrain around the
//! player, background chunk generation and meshing on a worker pool, a
//! time-budgeted main-thread uploader feeding a wgpu renderer, and discrete
//! collision and raycasting against the same sparse chunk grid.
//!
//! ## Key Modules
//!
//! * `application_state` - winit application shell and input handling
//! * `core` - the shared-resource primitive used across threads
//! * `game_state` - world, terrain, workers, physics, raycasting, rendering
//!
//! ## Architecture
//!
//! A fixed pool of worker threads consumes a double-ended task queue:
//! chunk generation and first-pass meshing go to the back, remeshing after
//! a player edit goes to the front. Workers publish finished meshes into a
//! locked queue that the main thread drains under a per-frame time budget,
//! since only the main thread may create or update GPU buffers. The chunk
//! map itself is the one structure both sides mutate, behind a single
//! lock.

use winit::event_loop::EventLoop;

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};

use log::info;

pub mod application_state;
pub mod core;
pub mod game_state;

/// Initializes logging, builds the event loop and runs the game until the
/// window closes.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let event_loop = EventLoop::with_user_event().build().unwrap();

    let mut state = ApplicationState {
        graphics: MaybeGraphics::Builder(GraphicsBuilder::new(event_loop.create_proxy())),
        state: None,
    };

    let _ = event_loop.run_app(&mut state);
}
