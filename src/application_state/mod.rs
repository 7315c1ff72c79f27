//! # Application State Management
//!
//! The winit shell around the game: window and graphics initialization,
//! input event routing, frame timing and the application lifecycle. All
//! game logic lives in [`GameState`]; this module only sequences it.

pub mod graphics_resources_builder;
pub mod input_manager;

use std::sync::Arc;
use std::time::Instant;

use graphics_resources_builder::{Graphics, MaybeGraphics};
use input_manager::InputManager;

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::game_state::GameState;

/// Top-level application state driving the winit event loop.
pub struct ApplicationState {
    /// The current graphics state: initializing, ready, or moved into the
    /// running state.
    pub graphics: MaybeGraphics,

    /// The running application, once graphics are up.
    pub state: Option<InitializedApplicationState>,
}

/// The fully initialized, running application.
pub struct InitializedApplicationState {
    pub game_state: GameState,
    pub window: Arc<Window>,
    pub input_manager: InputManager,
    /// Timestamp of the previous frame, for delta time.
    pub last_frame_time: Instant,
}

impl ApplicationState {
    /// Moves the finished graphics resources into a running game state.
    fn initialize_application_state(&mut self) {
        if let MaybeGraphics::Graphics(gfx) = &mut self.graphics {
            let taken_gfx = std::mem::take(gfx);
            let window = taken_gfx.window.expect("Window is missing");

            let game_state = GameState::new(
                taken_gfx.surface.expect("Surface is missing"),
                taken_gfx
                    .surface_config
                    .expect("Surface configuration is missing"),
                taken_gfx.device.expect("Device is missing"),
                taken_gfx.queue.expect("Queue is missing"),
                taken_gfx.shader_file_string,
                taken_gfx.atlas_bytes,
            );

            // First-person mouse look wants a captured, hidden cursor.
            if window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .is_err()
            {
                log::warn!("Could not grab the cursor; mouse look may drift");
            }
            window.set_cursor_visible(false);

            self.state = Some(InitializedApplicationState {
                game_state,
                window,
                input_manager: InputManager::new(),
                last_frame_time: Instant::now(),
            });

            self.graphics = MaybeGraphics::Moved;
        }
    }
}

impl ApplicationHandler<Graphics> for ApplicationState {
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            state.input_manager.intake_input(&event);

            match event {
                WindowEvent::Resized(size) => {
                    state.game_state.resize(size);
                }
                WindowEvent::Focused(is_focused) => {
                    if !is_focused {
                        state.input_manager.reset_inputs();
                    }
                }
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            state: ElementState::Pressed,
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            ..
                        },
                    ..
                } => event_loop.exit(),
                _ => (),
            }
        } else if let WindowEvent::CloseRequested = event {
            event_loop.exit();
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, graphics: Graphics) {
        self.graphics = MaybeGraphics::Graphics(graphics);
        self.initialize_application_state();
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            let now = Instant::now();
            let dt = (now - state.last_frame_time).as_secs_f32();
            state.last_frame_time = now;

            let input = state.input_manager.take_frame_input();
            state.game_state.frame(dt, &input);

            state.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            state.game_state.shutdown();
        }
    }
}
