//! # Pointer Input
//!
//! The engine consumes input as one [`InputFrame`] per tick: where the pointer
//! is, plus edge signals for the buttons and keys it cares about.
//! [`PointerTracker`] builds those frames from winit window events.
//!
//! | Input | Signal |
//! |---|---|
//! | Left mouse | primary |
//! | Right mouse, Escape | cancel |
//! | Mouse forward, Right arrow, D | page forward |
//! | Mouse back, Left arrow, A | page back |

use winit::{
    event::{ElementState, MouseButton, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Pointer state and edge signals for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputFrame {
    /// Pointer position in physical pixels, `None` when outside the window
    pub pointer: Option<(f32, f32)>,
    /// Primary button went down this tick (not held)
    pub primary_pressed: bool,
    pub cancel_pressed: bool,
    pub page_forward: bool,
    pub page_back: bool,
    /// New framebuffer size, if the window was resized
    pub resized: Option<(u32, u32)>,
}

impl InputFrame {
    pub fn pointer_at(x: f32, y: f32) -> Self {
        Self {
            pointer: Some((x, y)),
            ..Self::default()
        }
    }

    pub fn with_primary(mut self) -> Self {
        self.primary_pressed = true;
        self
    }

    pub fn with_cancel(mut self) -> Self {
        self.cancel_pressed = true;
        self
    }

    pub fn with_page_forward(mut self) -> Self {
        self.page_forward = true;
        self
    }

    pub fn with_page_back(mut self) -> Self {
        self.page_back = true;
        self
    }
}

/// Accumulates window events between ticks
#[derive(Debug, Default)]
pub struct PointerTracker {
    pointer: Option<(f32, f32)>,
    primary_held: bool,
    pending: InputFrame,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one window event; returns whether it was consumed
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.on_cursor_moved(Some((position.x as f32, position.y as f32)));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.on_cursor_moved(None);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => self.on_mouse_button(*button, *state),
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => self.on_key(code, event.state, event.repeat),
                PhysicalKey::Unidentified(_) => false,
            },
            WindowEvent::Resized(size) => {
                self.pending.resized = Some((size.width, size.height));
                true
            }
            WindowEvent::Focused(false) => {
                // releases delivered while unfocused never arrive
                self.primary_held = false;
                false
            }
            _ => false,
        }
    }

    pub fn on_cursor_moved(&mut self, position: Option<(f32, f32)>) {
        self.pointer = position;
    }

    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => {
                if pressed && !self.primary_held {
                    self.pending.primary_pressed = true;
                }
                self.primary_held = pressed;
            }
            MouseButton::Right if pressed => self.pending.cancel_pressed = true,
            MouseButton::Forward if pressed => self.pending.page_forward = true,
            MouseButton::Back if pressed => self.pending.page_back = true,
            MouseButton::Right | MouseButton::Forward | MouseButton::Back => {}
            _ => return false,
        }
        true
    }

    /// Key repeats never count as fresh edges
    pub fn on_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) -> bool {
        let edge = state == ElementState::Pressed && !repeat;
        let slot = match code {
            KeyCode::Escape => &mut self.pending.cancel_pressed,
            KeyCode::ArrowRight | KeyCode::KeyD => &mut self.pending.page_forward,
            KeyCode::ArrowLeft | KeyCode::KeyA => &mut self.pending.page_back,
            _ => return false,
        };
        if edge {
            *slot = true;
        }
        true
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }

    /// Hands over everything gathered since the last call and resets the edges
    pub fn take_frame(&mut self) -> InputFrame {
        let mut frame = std::mem::take(&mut self.pending);
        frame.pointer = self.pointer;
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_is_an_edge_not_a_level() {
        let mut tracker = PointerTracker::new();
        tracker.on_cursor_moved(Some((10.0, 20.0)));
        tracker.on_mouse_button(MouseButton::Left, ElementState::Pressed);

        let frame = tracker.take_frame();
        assert!(frame.primary_pressed);
        assert_eq!(frame.pointer, Some((10.0, 20.0)));

        // still held: no new edge
        tracker.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(!tracker.take_frame().primary_pressed);

        tracker.on_mouse_button(MouseButton::Left, ElementState::Released);
        tracker.on_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(tracker.take_frame().primary_pressed);
    }

    #[test]
    fn keys_map_to_cancel_and_pages() {
        let mut tracker = PointerTracker::new();
        assert!(tracker.on_key(KeyCode::Escape, ElementState::Pressed, false));
        assert!(tracker.on_key(KeyCode::ArrowRight, ElementState::Pressed, false));
        assert!(!tracker.on_key(KeyCode::KeyQ, ElementState::Pressed, false));

        let frame = tracker.take_frame();
        assert!(frame.cancel_pressed);
        assert!(frame.page_forward);
        assert!(!frame.page_back);

        tracker.on_key(KeyCode::KeyA, ElementState::Pressed, true);
        assert!(!tracker.take_frame().page_back);
    }

    #[test]
    fn pointer_persists_and_clears_on_leave() {
        let mut tracker = PointerTracker::new();
        tracker.on_cursor_moved(Some((5.0, 5.0)));
        assert_eq!(tracker.take_frame().pointer, Some((5.0, 5.0)));
        assert_eq!(tracker.take_frame().pointer, Some((5.0, 5.0)));
        tracker.on_cursor_moved(None);
        assert_eq!(tracker.take_frame(), InputFrame::default());
    }

    #[test]
    fn secondary_buttons() {
        let mut tracker = PointerTracker::new();
        tracker.on_mouse_button(MouseButton::Right, ElementState::Pressed);
        tracker.on_mouse_button(MouseButton::Back, ElementState::Pressed);
        tracker.on_mouse_button(MouseButton::Back, ElementState::Released);
        assert!(!tracker.on_mouse_button(MouseButton::Middle, ElementState::Pressed));

        let frame = tracker.take_frame();
        assert!(frame.cancel_pressed);
        assert!(frame.page_back);
        assert!(!frame.primary_pressed);
    }
}
