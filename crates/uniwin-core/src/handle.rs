use std::fmt;

use serde::Serialize;

use crate::api::{RawHandle, WindowApi};

/// Identity of a window, captured when it is discovered.
///
/// This is a snapshot: title and owner are not kept in sync afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WindowHandle {
    pub hwnd: RawHandle,
    pub title: String,
    pub class_name: String,
    pub process_id: u32,
    /// Best-effort; empty when the owning process could not be queried.
    pub process_name: String,
}

impl WindowHandle {
    /// Queries the window system for everything about `hwnd`.
    pub fn describe(api: &impl WindowApi, hwnd: RawHandle) -> Self {
        let process_id = api.process_id(hwnd);
        let process_name = match api.process_name(process_id) {
            Ok(name) => name,
            Err(e) => {
                log::debug!("process name lookup for PID {process_id} failed: {e}");
                String::new()
            }
        };

        Self {
            hwnd,
            title: api.title(hwnd),
            class_name: api.class_name(hwnd),
            process_id,
            process_name,
        }
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HWND:0x{:X} PID:{} Proc:{} Title:{} Class:{}",
            self.hwnd, self.process_id, self.process_name, self.title, self.class_name
        )
    }
}

/// Finds the window this process is presenting.
///
/// Takes the root of the active window and accepts it only if this process
/// owns it. Returns `None` when the process is not in the foreground or
/// some other process's window is active.
pub fn find_own_window(api: &impl WindowApi) -> Option<WindowHandle> {
    let active = api.active_window()?;
    let root = api.root_window(active);
    let window = WindowHandle::describe(api, root);

    if window.process_id != api.current_process_id() {
        log::debug!("active window belongs to another process: {window}");
        return None;
    }
    Some(window)
}

/// Lists every existing top-level window.
pub fn find_windows(api: &impl WindowApi) -> Vec<WindowHandle> {
    let handles = match api.top_level_windows() {
        Ok(handles) => handles,
        Err(e) => {
            log::warn!("window enumeration failed: {e}");
            return Vec::new();
        }
    };

    handles
        .into_iter()
        .filter(|&hwnd| api.is_window(hwnd))
        .map(|hwnd| WindowHandle::describe(api, hwnd))
        .collect()
}

/// Finds a top-level window by its exact title.
pub fn find_window_by_title(api: &impl WindowApi, title: &str) -> Option<WindowHandle> {
    api.find_window(None, Some(title))
        .map(|hwnd| WindowHandle::describe(api, hwnd))
}

/// Finds a top-level window by its class name.
pub fn find_window_by_class(api: &impl WindowApi, class: &str) -> Option<WindowHandle> {
    api.find_window(Some(class), None)
        .map(|hwnd| WindowHandle::describe(api, hwnd))
}
