//! Per-frame input snapshot supplied by the host.
//!
//! Pointer and touch coordinates are in UI space: origin at the bottom-left
//! of the client area, Y growing upward.

use crate::Vec2;

#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Whether the application currently has OS focus.
    pub app_focused: bool,
    /// Whether any key, button or touch was active this frame.
    pub any_input: bool,
    pub pointer: Vec2,
    pub mouse: MouseButtons,
    pub touches: Vec<Touch>,
    pub fullscreen: bool,
    /// Client-area size in pixels.
    pub screen_size: Vec2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtons {
    /// Primary button went down this frame.
    pub primary_pressed: bool,
    pub primary_held: bool,
    pub secondary_held: bool,
    pub middle_held: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Touch {
    pub id: u32,
    pub position: Vec2,
    pub phase: TouchPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

impl TouchPhase {
    /// Whether the finger is still on the surface.
    pub fn is_down(self) -> bool {
        !matches!(self, Self::Ended | Self::Canceled)
    }
}
