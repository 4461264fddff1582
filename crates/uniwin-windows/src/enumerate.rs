use uniwin_core::{RawHandle, WindowError, WindowResult};

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{EnumWindows, FindWindowW};
use windows::core::{BOOL, PCWSTR};

use crate::api::raw;

/// Returns every top-level window, in z-order.
pub fn top_level_windows() -> WindowResult<Vec<RawHandle>> {
    let mut handles: Vec<RawHandle> = Vec::new();

    // SAFETY: EnumWindows runs synchronously, so the Vec passed through
    // LPARAM outlives every callback invocation.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )
    }
    .map_err(|e| WindowError::os("EnumWindows", e))?;

    Ok(handles)
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec pointer from top_level_windows().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<RawHandle>) };
    handles.push(raw(hwnd));
    BOOL(1) // keep enumerating
}

/// Finds a top-level window by exact class name and/or title.
pub fn find_window(class: Option<&str>, title: Option<&str>) -> Option<RawHandle> {
    let class = class.map(to_wide);
    let title = title.map(to_wide);
    let as_pcwstr = |wide: &Option<Vec<u16>>| {
        wide.as_ref()
            .map_or(PCWSTR::null(), |w| PCWSTR(w.as_ptr()))
    };

    // SAFETY: both strings are null-terminated and outlive the call.
    let found = unsafe { FindWindowW(as_pcwstr(&class), as_pcwstr(&title)) }.ok()?;
    (!found.is_invalid()).then(|| raw(found))
}

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}
