pub mod api;
pub mod color;
pub mod config;
pub mod controller;
pub mod dialog;
pub mod drag;
pub mod drop_registry;
pub mod error;
pub mod event;
pub mod geometry;
pub mod handle;
pub mod input;
pub mod log;
pub mod native;
pub mod style;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{HookHandle, RawHandle, ShowCommand, WindowApi};
pub use color::Rgb;
pub use config::{Config, WindowSettings};
pub use controller::{Acquisition, WindowController};
pub use drop_registry::{DropRegistry, FilesDropped, RegistrationId};
pub use error::{WindowError, WindowResult};
pub use event::{BackgroundRequest, WindowState};
pub use geometry::{Rect, Vec2};
pub use handle::{WindowHandle, find_own_window, find_window_by_class, find_window_by_title, find_windows};
pub use hit_test::{ContentProbe, HitTest, HitTestPolicy, NoProbe};
pub use input::{FrameInput, MouseButtons, Touch, TouchPhase};
pub use native::{HostCapabilities, NativeWindow, TransparencyMode};
