//! # Chunk Streaming
//!
//! The hand-off between worker threads and the GPU. Workers push finished
//! chunk meshes into a [`ReadyMeshes`] queue; each frame the main-thread
//! [`ChunkStreamer`] drains that queue under a wall-clock budget, creating
//! or updating one GPU vertex buffer per chunk. Draining is the only place
//! GPU resources are touched; workers never see a buffer handle.
//!
//! The streamer also tracks the initial-load barrier: the first wave of
//! generation requests is counted, every consumed mesh result (including
//! empty ones) counts it back down, and the world reports ready once the
//! counter returns to zero.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use cgmath::Point3;
use wgpu::util::DeviceExt;

use super::vertex::ChunkVertex;

/// A finished chunk mesh, produced by a worker and consumed exactly once by
/// the main thread.
pub struct MeshResult {
    pub origin: Point3<i32>,
    pub vertices: Vec<ChunkVertex>,
}

/// The locked worker-to-main-thread mesh queue.
///
/// Independent from the world lock, so publishing a mesh never contends
/// with block access.
#[derive(Clone)]
pub struct ReadyMeshes {
    queue: Arc<Mutex<VecDeque<MeshResult>>>,
}

impl ReadyMeshes {
    pub fn new() -> Self {
        ReadyMeshes {
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Publishes a mesh result (worker side).
    pub fn push(&self, result: MeshResult) {
        self.queue.lock().unwrap().push_back(result);
    }

    /// Takes the oldest pending result, if any (main-thread side).
    pub fn pop(&self) -> Option<MeshResult> {
        self.queue.lock().unwrap().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ReadyMeshes {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU-side state of one chunk.
struct ChunkGpuBuffer {
    buffer: wgpu::Buffer,
    capacity_bytes: u64,
    vertex_count: u32,
}

/// Main-thread coordinator for chunk uploads.
///
/// Owns the two derived per-chunk maps: the CPU vertex copies (size
/// bookkeeping for draw calls) and the GPU buffers. A GPU entry exists only
/// for chunks whose mesh has ever had visible faces; a CPU entry may be
/// empty without a GPU entry.
pub struct ChunkStreamer {
    ready: ReadyMeshes,
    meshes: HashMap<Point3<i32>, Vec<ChunkVertex>>,
    buffers: HashMap<Point3<i32>, ChunkGpuBuffer>,
    /// Chunks whose generation has been submitted; never removed, matching
    /// the world's no-eviction lifecycle, and protecting the load barrier
    /// from duplicate submissions.
    requested: HashSet<Point3<i32>>,
    pending_initial: usize,
    first_load: bool,
    upload_budget: Duration,
}

impl ChunkStreamer {
    pub fn new(upload_budget: Duration) -> Self {
        ChunkStreamer {
            ready: ReadyMeshes::new(),
            meshes: HashMap::new(),
            buffers: HashMap::new(),
            requested: HashSet::new(),
            pending_initial: 0,
            first_load: true,
            upload_budget,
        }
    }

    /// The queue handle to hand to meshing jobs.
    pub fn ready_meshes(&self) -> ReadyMeshes {
        self.ready.clone()
    }

    /// Records that generation for `origin` is being submitted. Returns
    /// `false` if it was already requested (the caller must not submit a
    /// duplicate job, which would also corrupt the load barrier).
    pub fn try_begin_request(&mut self, origin: Point3<i32>) -> bool {
        if !self.requested.insert(origin) {
            return false;
        }
        if self.first_load {
            self.pending_initial += 1;
        }
        true
    }

    /// Whether the initial load has completed. Flips once and stays set.
    pub fn is_world_ready(&self) -> bool {
        !self.first_load
    }

    /// Drains ready meshes into GPU buffers until the queue is empty or the
    /// per-frame budget is spent.
    ///
    /// The first non-empty mesh for a coordinate creates its vertex buffer;
    /// remeshes reuse the existing buffer when the new data fits, otherwise
    /// the allocation is replaced. Empty meshes only update bookkeeping, so
    /// a chunk whose last visible block was removed simply draws zero
    /// vertices.
    pub fn upload_ready(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let start = Instant::now();

        while start.elapsed() < self.upload_budget {
            let Some(result) = self.ready.pop() else {
                break;
            };
            self.upload_one(device, queue, result);

            if self.first_load {
                self.pending_initial = self.pending_initial.saturating_sub(1);
                if self.pending_initial == 0 {
                    self.first_load = false;
                    log::info!("Initial world load complete");
                }
            }
        }
    }

    fn upload_one(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, result: MeshResult) {
        let byte_len = (result.vertices.len() * std::mem::size_of::<ChunkVertex>()) as u64;

        if result.vertices.is_empty() {
            if let Some(gpu) = self.buffers.get_mut(&result.origin) {
                gpu.vertex_count = 0;
            }
        } else {
            let fits_existing = self
                .buffers
                .get(&result.origin)
                .map_or(false, |gpu| byte_len <= gpu.capacity_bytes);

            if fits_existing {
                let gpu = self.buffers.get_mut(&result.origin).unwrap();
                queue.write_buffer(&gpu.buffer, 0, bytemuck::cast_slice(&result.vertices));
                gpu.vertex_count = result.vertices.len() as u32;
            } else {
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("Chunk Vertex Buffer {:?}", result.origin)),
                    contents: bytemuck::cast_slice(&result.vertices),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
                self.buffers.insert(
                    result.origin,
                    ChunkGpuBuffer {
                        buffer,
                        capacity_bytes: byte_len,
                        vertex_count: result.vertices.len() as u32,
                    },
                );
            }
        }

        self.meshes.insert(result.origin, result.vertices);
    }

    /// The buffer and vertex count for a chunk, if it has one with visible
    /// geometry.
    pub fn drawable_chunk(&self, origin: Point3<i32>) -> Option<(&wgpu::Buffer, u32)> {
        let gpu = self.buffers.get(&origin)?;
        if gpu.vertex_count == 0 {
            return None;
        }
        Some((&gpu.buffer, gpu.vertex_count))
    }

    /// Number of chunks with a CPU-side mesh entry.
    pub fn meshed_chunk_count(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_queue_is_fifo() {
        let ready = ReadyMeshes::new();
        ready.push(MeshResult {
            origin: Point3::new(0, 0, 0),
            vertices: Vec::new(),
        });
        ready.push(MeshResult {
            origin: Point3::new(16, 0, 0),
            vertices: Vec::new(),
        });

        assert_eq!(ready.len(), 2);
        assert_eq!(ready.pop().unwrap().origin, Point3::new(0, 0, 0));
        assert_eq!(ready.pop().unwrap().origin, Point3::new(16, 0, 0));
        assert!(ready.pop().is_none());
    }

    #[test]
    fn duplicate_requests_are_rejected() {
        let mut streamer = ChunkStreamer::new(Duration::from_millis(4));
        assert!(streamer.try_begin_request(Point3::new(0, 0, 0)));
        assert!(!streamer.try_begin_request(Point3::new(0, 0, 0)));
        assert!(streamer.try_begin_request(Point3::new(16, 0, 0)));
    }

    #[test]
    fn world_is_not_ready_while_requests_are_outstanding() {
        let mut streamer = ChunkStreamer::new(Duration::from_millis(4));
        assert!(!streamer.is_world_ready());
        streamer.try_begin_request(Point3::new(0, 0, 0));
        assert_eq!(streamer.pending_initial, 1);
        assert!(!streamer.is_world_ready());
    }
}
