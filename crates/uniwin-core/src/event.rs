use serde::Serialize;

use crate::Rgb;
use crate::native::TransparencyMode;

/// Snapshot of the controller's feature flags, passed to state-changed
/// listeners.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowState {
    pub transparent: bool,
    pub transparency_mode: TransparencyMode,
    pub topmost: bool,
    pub maximized: bool,
    pub minimized: bool,
    pub click_through: bool,
    pub file_drop: bool,
}

/// How the host camera should clear the frame background.
///
/// Raised whenever transparency, mode or color key changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundRequest {
    /// Keep the background the host had before transparency was enabled.
    Original,
    /// Clear to fully transparent black (alpha transparency).
    Clear,
    /// Clear to the key color (color-key transparency).
    Key(Rgb),
}

impl BackgroundRequest {
    /// The request matching a transparency state.
    pub fn for_state(transparent: bool, mode: TransparencyMode, key: Rgb) -> Self {
        match (transparent, mode) {
            (false, _) => Self::Original,
            (true, TransparencyMode::ColorKey) => Self::Key(key),
            (true, _) => Self::Clear,
        }
    }
}
