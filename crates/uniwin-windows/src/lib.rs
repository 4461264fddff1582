//! Win32 implementation of the uniwin window control layer.
//!
//! Everything here is compiled on Windows only; the core crate stays
//! buildable and testable elsewhere.

/// `WindowApi` over Win32.
#[cfg(windows)]
pub mod api;

/// Open/save common dialogs.
#[cfg(windows)]
pub mod dialog;

/// Top-level window enumeration and lookup.
#[cfg(windows)]
pub mod enumerate;

/// `WH_GETMESSAGE` hook feeding file drops into the drop registry.
#[cfg(windows)]
pub mod hook;

/// Process name lookup.
#[cfg(windows)]
pub mod process;

#[cfg(windows)]
pub use api::Win32Api;

/// Builds a controller bound to the Win32 window system.
#[cfg(windows)]
pub fn controller(
    caps: uniwin_core::HostCapabilities,
) -> uniwin_core::WindowController<Win32Api> {
    uniwin_core::WindowController::new(Win32Api, caps)
}
