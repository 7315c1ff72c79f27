//! # Input Manager
//!
//! Collects raw winit events between frames and flattens them into one
//! [`FrameInput`] per frame: held movement keys, edge-triggered actions
//! (jump, clicks, material selection) and the accumulated mouse delta.
//! Edge detection lives here so the game state only ever sees clean
//! per-frame actions.

use std::collections::HashSet;

use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Everything the game consumes from input in one frame.
#[derive(Debug, Default, Clone)]
pub struct FrameInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,

    /// Jump key edge (pressed this frame, not held).
    pub jump: bool,
    /// Left-click edge: break the selected block.
    pub break_block: bool,
    /// Right-click edge: place a block at the placement cell.
    pub place_block: bool,
    /// Number-key edge: newly selected material ID.
    pub select_material: Option<u8>,

    /// Accumulated mouse motion since the previous frame, in pixels.
    pub mouse_delta: (f32, f32),
}

/// Accumulates winit events and produces a [`FrameInput`] per frame.
pub struct InputManager {
    held_keys: HashSet<KeyCode>,
    pressed_keys: HashSet<KeyCode>,
    clicked_buttons: HashSet<MouseButton>,
    mouse_delta: (f64, f64),
}

impl InputManager {
    pub fn new() -> Self {
        InputManager {
            held_keys: HashSet::new(),
            pressed_keys: HashSet::new(),
            clicked_buttons: HashSet::new(),
            mouse_delta: (0.0, 0.0),
        }
    }

    /// Feeds one window event into the accumulated state.
    pub fn intake_input(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                match event.state {
                    ElementState::Pressed => {
                        if self.held_keys.insert(code) {
                            self.pressed_keys.insert(code);
                        }
                    }
                    ElementState::Released => {
                        self.held_keys.remove(&code);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *state == ElementState::Pressed {
                    self.clicked_buttons.insert(*button);
                }
            }
            _ => (),
        }
    }

    /// Feeds raw mouse motion (device event) into the accumulated state.
    pub fn intake_mouse_motion(&mut self, delta: (f64, f64)) {
        self.mouse_delta.0 += delta.0;
        self.mouse_delta.1 += delta.1;
    }

    /// Clears all held state, for when the window loses focus.
    pub fn reset_inputs(&mut self) {
        self.held_keys.clear();
        self.pressed_keys.clear();
        self.clicked_buttons.clear();
        self.mouse_delta = (0.0, 0.0);
    }

    /// Flattens the accumulated events into this frame's input and resets
    /// the per-frame edges.
    pub fn take_frame_input(&mut self) -> FrameInput {
        let select_material = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3]
            .iter()
            .position(|key| self.pressed_keys.contains(key))
            .map(|i| (i + 1) as u8);

        let input = FrameInput {
            move_forward: self.held_keys.contains(&KeyCode::KeyW),
            move_backward: self.held_keys.contains(&KeyCode::KeyS),
            move_left: self.held_keys.contains(&KeyCode::KeyA),
            move_right: self.held_keys.contains(&KeyCode::KeyD),
            jump: self.pressed_keys.contains(&KeyCode::Space),
            break_block: self.clicked_buttons.contains(&MouseButton::Left),
            place_block: self.clicked_buttons.contains(&MouseButton::Right),
            select_material,
            mouse_delta: (self.mouse_delta.0 as f32, self.mouse_delta.1 as f32),
        };

        self.pressed_keys.clear();
        self.clicked_buttons.clear();
        self.mouse_delta = (0.0, 0.0);

        input
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_motion_accumulates_and_resets() {
        let mut input = InputManager::new();
        input.intake_mouse_motion((1.5, -2.0));
        input.intake_mouse_motion((0.5, 1.0));

        let frame = input.take_frame_input();
        assert_eq!(frame.mouse_delta, (2.0, -1.0));

        let next = input.take_frame_input();
        assert_eq!(next.mouse_delta, (0.0, 0.0));
    }
}
