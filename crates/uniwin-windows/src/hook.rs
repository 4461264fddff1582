use std::path::PathBuf;

use uniwin_core::{DropRegistry, HookHandle, WindowError, WindowResult};

use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Shell::{DragFinish, DragQueryFileW, HDROP};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, HHOOK, MSG, PM_REMOVE, SetWindowsHookExW, UnhookWindowsHookEx,
    WH_GETMESSAGE, WM_DROPFILES, WM_NULL,
};

use crate::api::raw;

/// `DragQueryFileW` index that asks for the file count.
const QUERY_COUNT: u32 = 0xFFFF_FFFF;

/// Installs the `WH_GETMESSAGE` hook on the calling thread.
///
/// Must be called from the thread that owns the window, since only that
/// thread's message queue is observed.
pub fn install() -> WindowResult<HookHandle> {
    // SAFETY: the hook procedure is a plain `extern "system"` function
    // living for the whole process; the module handle is our own.
    unsafe {
        let module = GetModuleHandleW(None).map_err(|e| WindowError::HookInstall(e.to_string()))?;
        let hook = SetWindowsHookExW(
            WH_GETMESSAGE,
            Some(get_message_proc),
            Some(HINSTANCE(module.0)),
            GetCurrentThreadId(),
        )
        .map_err(|e| WindowError::HookInstall(e.to_string()))?;
        log::debug!("message hook installed: {:?}", hook.0);
        Ok(HookHandle(hook.0 as usize))
    }
}

/// Removes a hook installed by [`install`].
pub fn uninstall(hook: HookHandle) {
    // SAFETY: the handle came from SetWindowsHookExW.
    if let Err(e) = unsafe { UnhookWindowsHookEx(HHOOK(hook.0 as *mut _)) } {
        log::warn!("removing message hook failed: {e}");
    }
}

/// The `WH_GETMESSAGE` callback.
///
/// Only messages being removed from the queue are handled, so a message
/// that is peeked and then retrieved is dispatched once.
unsafe extern "system" fn get_message_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 && wparam.0 == PM_REMOVE.0 as usize && lparam.0 != 0 {
        // SAFETY: for WH_GETMESSAGE, lparam points to the MSG being retrieved.
        let msg = unsafe { &mut *(lparam.0 as *mut MSG) };
        if msg.message == WM_DROPFILES {
            let hdrop = HDROP(msg.wParam.0 as *mut _);
            // SAFETY: wParam of WM_DROPFILES is the drop handle, valid
            // until DragFinish.
            let paths = unsafe { dropped_paths(hdrop) };
            unsafe { DragFinish(hdrop) };

            DropRegistry::global().dispatch(raw(msg.hwnd), &paths);
            // The drop handle is freed; keep the window from seeing it.
            msg.message = WM_NULL;
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

/// Extracts every path from a drop handle, in drop order.
///
/// # Safety
///
/// `hdrop` must be a live handle from `WM_DROPFILES`.
unsafe fn dropped_paths(hdrop: HDROP) -> Vec<PathBuf> {
    let count = unsafe { DragQueryFileW(hdrop, QUERY_COUNT, None) };
    let mut paths = Vec::with_capacity(count as usize);

    for index in 0..count {
        // Length excludes the terminator.
        let length = unsafe { DragQueryFileW(hdrop, index, None) };
        let mut buffer = vec![0u16; length as usize + 1];
        let copied = unsafe { DragQueryFileW(hdrop, index, Some(&mut buffer)) };
        paths.push(PathBuf::from(String::from_utf16_lossy(
            &buffer[..copied as usize],
        )));
    }
    log::debug!("{} file(s) dropped", paths.len());
    paths
}
