//! Vertex data structure and layout for chunk rendering.
//!
//! Chunk meshes are flat vertex buffers with no index buffer; every visible
//! block face contributes two triangles of six vertices each.

/// A vertex of a chunk mesh.
///
/// # Memory Layout
/// - Position: [f32; 3] (world space)
/// - Texture coordinates: [f32; 2] (normalized, per face)
/// - Face ID: f32 (0-5, selects the texture-atlas column)
/// - Block type: f32 (material ID, selects the texture-atlas row)
/// - Normal: [f32; 3]
///
/// Total stride: 40 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChunkVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub face_id: f32,
    pub block_type: f32,
    pub normal: [f32; 3],
}

impl ChunkVertex {
    /// Returns the vertex buffer layout description for the chunk pipeline.
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ChunkVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 7]>() as wgpu::BufferAddress,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
