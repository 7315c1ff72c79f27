//! # Graphics Resources Builder
//!
//! Handles the asynchronous creation of the wgpu context behind the winit
//! event loop: window, surface, adapter, device and queue, plus the on-disk
//! assets (chunk shader and the block texture atlas).
//!
//! The main components are:
//! - `Graphics`: holds all graphics-related resources
//! - `GraphicsBuilder`: helper for asynchronous graphics initialization
//! - `MaybeGraphics`: the states of graphics initialization

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

const SHADER_PATH: &str = "assets/shaders/chunk_shader.wgsl";
const ATLAS_PATH: &str = "assets/textures/atlas.png";

/// All graphics resources required by the application, created during
/// initialization and handed over to the game state.
#[derive(Default)]
pub struct Graphics {
    pub window: Option<Arc<Window>>,
    pub surface: Option<Surface<'static>>,
    pub surface_config: Option<SurfaceConfiguration>,
    pub device: Option<Device>,
    pub queue: Option<Queue>,
    pub shader_file_string: String,
    pub atlas_bytes: Vec<u8>,
}

/// Asynchronously creates the window, surface and device.
fn create_graphics(event_loop: &ActiveEventLoop) -> impl Future<Output = Graphics> + 'static {
    let window_attrs = Window::default_attributes().with_title("Voxel Game");
    let window = Arc::new(event_loop.create_window(window_attrs).unwrap());

    // The instance is a handle to our GPU.
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone()).unwrap();

    async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .unwrap();

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .unwrap();

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let shader_string = std::fs::read_to_string(Path::new(SHADER_PATH)).unwrap();
        let atlas_bytes = std::fs::read(Path::new(ATLAS_PATH)).unwrap();

        Graphics {
            window: Some(window),
            surface: Some(surface),
            surface_config: Some(surface_config),
            device: Some(device),
            queue: Some(queue),
            shader_file_string: shader_string,
            atlas_bytes,
        }
    }
}

/// Helper managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
}

/// The states of the graphics initialization process.
pub enum MaybeGraphics {
    /// Asynchronous initialization in progress.
    Builder(GraphicsBuilder),

    /// Resources fully initialized and ready for use.
    Graphics(Graphics),

    /// Resources have been moved into the game state.
    Moved,
}

impl GraphicsBuilder {
    pub fn new(event_loop_proxy: EventLoopProxy<Graphics>) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
        }
    }

    /// Builds the graphics resources and sends them back through the event
    /// loop proxy.
    ///
    /// # Panics
    /// Panics if sending the finished resources fails.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // Proxy already spent - Graphics was constructed before.
            return;
        };

        let gfx = pollster::block_on(create_graphics(event_loop));
        assert!(event_loop_proxy.send_event(gfx).is_ok());
    }
}
