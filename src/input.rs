//! Pointer input tracking for camera navigation.
//!
//! Window events arrive between frames and only update plain state here: held
//! buttons, the latest cursor position and an accumulated wheel delta. Once per
//! frame the driver reads a [`Navigation`] snapshot and then calls
//! [`Input::end_frame`], which clears the wheel and remembers the cursor position
//! so the next frame measures motion from it.
//!
//! Event delivery and the frame step share one thread (the winit event loop), so
//! no synchronization is involved.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};

/// Pixels per wheel line, matching what browsers report for one notch.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    fn from_winit(btn: WinitMouseButton) -> Option<Self> {
        match btn {
            WinitMouseButton::Left => Some(MouseButton::Left),
            WinitMouseButton::Right => Some(MouseButton::Right),
            WinitMouseButton::Middle => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Which camera control a drag drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavMode {
    /// No navigation button held.
    Idle,
    /// Right button: translate in camera space.
    Pan,
    /// Left button: rotate about the origin.
    Orbit,
}

/// Input accumulated since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Navigation {
    pub mode: NavMode,
    /// Cursor motion in pixels, +y pointing down the screen.
    pub cursor_delta: Vec2,
    /// Wheel motion in pixels, positive when scrolling towards the user.
    pub wheel_delta: f32,
}

impl Navigation {
    pub const NONE: Navigation = Navigation {
        mode: NavMode::Idle,
        cursor_delta: Vec2::ZERO,
        wheel_delta: 0.0,
    };
}

/// Pointer state shared between event handling and the frame step.
#[derive(Debug, Default)]
pub struct Input {
    held: HashSet<MouseButton>,
    cursor: Option<Vec2>,
    previous_cursor: Option<Vec2>,
    wheel_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn button_down(&mut self, button: MouseButton) {
        self.held.insert(button);
    }

    pub fn button_up(&mut self, button: MouseButton) {
        self.held.remove(&button);
    }

    /// Forget every held button, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, button: MouseButton) -> bool {
        self.held.contains(&button)
    }

    pub fn cursor_moved(&mut self, position: Vec2) {
        self.cursor = Some(position);
    }

    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Accumulate wheel motion in pixels (positive towards the user).
    pub fn scroll(&mut self, pixels: f32) {
        self.wheel_delta += pixels;
    }

    /// Snapshot for this frame. The right button wins when both are held.
    pub fn navigation(&self) -> Navigation {
        let mode = if self.is_held(MouseButton::Right) {
            NavMode::Pan
        } else if self.is_held(MouseButton::Left) {
            NavMode::Orbit
        } else {
            NavMode::Idle
        };

        let cursor_delta = match (self.cursor, self.previous_cursor) {
            (Some(now), Some(before)) => now - before,
            _ => Vec2::ZERO,
        };

        Navigation {
            mode,
            cursor_delta,
            wheel_delta: self.wheel_delta,
        }
    }

    /// Reset per-frame deltas.
    pub fn end_frame(&mut self) {
        self.wheel_delta = 0.0;
        self.previous_cursor = self.cursor;
    }

    /// Process a winit window event.
    ///
    /// With `pointer_captured` set (the control panel owns the pointer), presses
    /// and wheel motion are ignored; releases and cursor motion are always
    /// recorded so a drag can't get stuck and the next delta stays small.
    pub fn handle_event(&mut self, event: &WindowEvent, pointer_captured: bool) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(btn) = MouseButton::from_winit(*button) else {
                    return;
                };
                match state {
                    ElementState::Pressed if !pointer_captured => self.button_down(btn),
                    ElementState::Pressed => {}
                    ElementState::Released => self.button_up(btn),
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::CursorLeft { .. } | WindowEvent::Focused(false) => {
                self.release_all();
            }

            WindowEvent::MouseWheel { delta, .. } if !pointer_captured => {
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                self.scroll(pixels);
            }

            _ => {}
        }
    }
}
