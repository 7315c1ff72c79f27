//! Rendering-facing side of the engine: mesh building on workers, the
//! worker-to-GPU streaming hand-off, and the wgpu renderer itself.

pub mod meshing;
pub mod renderer;
pub mod streaming;
pub mod texture;
pub mod vertex;

pub use meshing::build_chunk_mesh;
pub use renderer::ChunkRenderer;
pub use streaming::{ChunkStreamer, MeshResult, ReadyMeshes};
pub use vertex::ChunkVertex;
