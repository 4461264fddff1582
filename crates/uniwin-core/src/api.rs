use std::path::PathBuf;

use crate::{Rect, Rgb, Vec2, WindowResult};

/// A native window handle as a pointer-sized integer.
///
/// Keeping it an integer lets the core store and compare handles
/// without depending on the `windows` crate.
pub type RawHandle = usize;

/// Show-window commands the control layer issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// `SW_SHOW`: show in the current state; also forces a repaint.
    Show,
    /// `SW_MAXIMIZE`
    Maximize,
    /// `SW_MINIMIZE`
    Minimize,
    /// `SW_RESTORE`
    Restore,
}

/// An installed message hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookHandle(pub usize);

/// The window-system primitives the control layer is built on.
///
/// `uniwin-windows` implements this over Win32. Every method takes
/// `&self`: the window system holds the state, not the implementor.
pub trait WindowApi {
    /// Whether `hwnd` still identifies an existing window.
    fn is_window(&self, hwnd: RawHandle) -> bool;

    /// Whether the window is maximized (`IsZoomed`).
    fn is_maximized(&self, hwnd: RawHandle) -> bool;

    /// Whether the window is minimized (`IsIconic`).
    fn is_minimized(&self, hwnd: RawHandle) -> bool;

    /// Reads the live style bit-field.
    fn style(&self, hwnd: RawHandle) -> u32;

    /// Reads the live extended style bit-field.
    fn ex_style(&self, hwnd: RawHandle) -> u32;

    /// Overwrites the style bit-field.
    fn set_style(&self, hwnd: RawHandle, style: u32);

    /// Overwrites the extended style bit-field.
    fn set_ex_style(&self, hwnd: RawHandle, ex_style: u32);

    /// Returns the outer window rectangle in screen pixels.
    fn rect(&self, hwnd: RawHandle) -> WindowResult<Rect>;

    /// Moves the window without resizing, activating or blocking.
    fn move_window(&self, hwnd: RawHandle, x: i32, y: i32) -> WindowResult<()>;

    /// Resizes the window without moving, activating or blocking.
    fn resize_window(&self, hwnd: RawHandle, width: i32, height: i32) -> WindowResult<()>;

    /// Inserts the window above all non-topmost windows, or back into
    /// normal z-order.
    fn set_topmost(&self, hwnd: RawHandle, topmost: bool) -> WindowResult<()>;

    /// Issues a show-window command.
    fn show(&self, hwnd: RawHandle, command: ShowCommand);

    /// Gives the window keyboard focus.
    fn focus(&self, hwnd: RawHandle);

    /// Posts one UTF-16 code unit to the window as `WM_IME_CHAR`.
    fn post_char(&self, hwnd: RawHandle, unit: u16) -> WindowResult<()>;

    /// Extends the compositor frame over the whole client area, or
    /// shrinks it back to the frame only.
    fn extend_frame_into_client(&self, hwnd: RawHandle, whole_client: bool) -> WindowResult<()>;

    /// Sets (or clears, with `None`) the layered-window color key.
    fn set_color_key(&self, hwnd: RawHandle, key: Option<Rgb>) -> WindowResult<()>;

    /// The active window of the calling thread's message queue.
    fn active_window(&self) -> Option<RawHandle>;

    /// The root (top-level) ancestor of `hwnd`.
    fn root_window(&self, hwnd: RawHandle) -> RawHandle;

    /// Every top-level window, in z-order.
    fn top_level_windows(&self) -> WindowResult<Vec<RawHandle>>;

    /// Finds a top-level window by class name and/or title.
    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<RawHandle>;

    /// Window title text.
    fn title(&self, hwnd: RawHandle) -> String;

    /// Window class name.
    fn class_name(&self, hwnd: RawHandle) -> String;

    /// Id of the process that owns `hwnd`.
    fn process_id(&self, hwnd: RawHandle) -> u32;

    /// Executable name (without extension) of a process.
    fn process_name(&self, pid: u32) -> WindowResult<String>;

    /// Id of the calling process.
    fn current_process_id(&self) -> u32;

    /// Whether the system cursor is currently shown.
    fn cursor_visible(&self) -> bool;

    /// System cursor position in screen pixels.
    fn cursor_position(&self) -> Vec2;

    /// Installs the thread-scoped message hook that feeds file drops into
    /// the process-wide [`DropRegistry`](crate::DropRegistry).
    fn install_message_hook(&self) -> WindowResult<HookHandle>;

    /// Removes a hook returned by [`install_message_hook`](Self::install_message_hook).
    fn remove_message_hook(&self, hook: HookHandle);

    /// Lets lower-integrity processes deliver drop messages to `hwnd`
    /// (`allow`), or resets the filter to its default.
    fn set_drop_message_filter(&self, hwnd: RawHandle, allow: bool) -> WindowResult<()>;

    /// Runs the native open-file dialog. `filter` is already in the
    /// null-delimited native form.
    fn open_file_dialog(&self, owner: Option<RawHandle>, filter: &str) -> Option<PathBuf>;

    /// Runs the native save-file dialog. `filter` is already in the
    /// null-delimited native form.
    fn save_file_dialog(&self, owner: Option<RawHandle>, filter: &str) -> Option<PathBuf>;
}
