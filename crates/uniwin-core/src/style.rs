//! Window style bit-fields.
//!
//! The values mirror the Win32 `WS_*` / `WS_EX_*` constants so the core
//! can reason about styles without depending on the `windows` crate.
//! `uniwin-windows` asserts at compile time that they match.

/// `WS_POPUP`
pub const WS_POPUP: u32 = 0x8000_0000;
/// `WS_MINIMIZE`
pub const WS_MINIMIZE: u32 = 0x2000_0000;
/// `WS_VISIBLE`
pub const WS_VISIBLE: u32 = 0x1000_0000;
/// `WS_MAXIMIZE`
pub const WS_MAXIMIZE: u32 = 0x0100_0000;
/// `WS_CAPTION`
pub const WS_CAPTION: u32 = 0x00C0_0000;
/// `WS_THICKFRAME`
pub const WS_THICKFRAME: u32 = 0x0004_0000;
/// `WS_OVERLAPPEDWINDOW`
pub const WS_OVERLAPPEDWINDOW: u32 = 0x00CF_0000;

/// `WS_EX_TOPMOST`
pub const WS_EX_TOPMOST: u32 = 0x0000_0008;
/// `WS_EX_ACCEPTFILES`
pub const WS_EX_ACCEPTFILES: u32 = 0x0000_0010;
/// `WS_EX_TRANSPARENT`
pub const WS_EX_TRANSPARENT: u32 = 0x0000_0020;
/// `WS_EX_LAYERED`
pub const WS_EX_LAYERED: u32 = 0x0008_0000;

/// Style of a borderless window: visible popup, no chrome.
pub const BORDERLESS_STYLE: u32 = WS_VISIBLE | WS_POPUP;

/// Bits the OS flips on show-state transitions. They describe the
/// window's show state, not its chrome, so they never belong to a
/// commanded style.
pub const SHOW_STATE_BITS: u32 = WS_MINIMIZE | WS_MAXIMIZE;

/// Styles recorded for the controlled window.
///
/// `original_*` is captured once when the window is acquired. `current_*`
/// is the last value this crate wrote; per-frame reconciliation pushes it
/// back whenever the live value drifts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowStyleSnapshot {
    pub original_style: u32,
    pub original_ex_style: u32,
    pub current_style: u32,
    pub current_ex_style: u32,
}

impl WindowStyleSnapshot {
    /// Captures a window's styles at acquisition.
    pub fn capture(style: u32, ex_style: u32) -> Self {
        Self {
            original_style: style,
            original_ex_style: ex_style,
            current_style: style,
            current_ex_style: ex_style,
        }
    }

    /// Returns `current` with the bits in `mask` copied from the original
    /// extended style.
    pub fn ex_with_original_bits(&self, current: u32, mask: u32) -> u32 {
        (current & !mask) | (self.original_ex_style & mask)
    }
}
