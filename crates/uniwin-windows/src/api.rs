use std::path::PathBuf;

use uniwin_core::style;
use uniwin_core::{
    HookHandle, RawHandle, Rect, Rgb, ShowCommand, Vec2, WindowApi, WindowError, WindowResult,
};

use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, POINT, RECT, WPARAM};
use windows::Win32::Graphics::Dwm::DwmExtendFrameIntoClientArea;
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::Input::KeyboardAndMouse::{GetActiveWindow, SetFocus};
use windows::Win32::UI::WindowsAndMessaging::{
    CURSOR_SHOWING, CURSORINFO, ChangeWindowMessageFilterEx, GA_ROOT, GWL_EXSTYLE, GWL_STYLE,
    GetAncestor, GetCursorInfo, GetCursorPos, GetWindowLongPtrW, GetWindowRect,
    GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, HWND_NOTOPMOST, HWND_TOPMOST,
    IsIconic, IsWindow, IsZoomed, LAYERED_WINDOW_ATTRIBUTES_FLAGS, LWA_COLORKEY, MSGFLT_ALLOW,
    MSGFLT_RESET, PostMessageW, RealGetWindowClassW, SET_WINDOW_POS_FLAGS, SW_MAXIMIZE, SW_MINIMIZE, SW_RESTORE,
    SW_SHOW, SWP_ASYNCWINDOWPOS, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE,
    SWP_NOOWNERZORDER, SWP_NOSIZE, SWP_NOZORDER, SetForegroundWindow, SetLayeredWindowAttributes,
    SetWindowLongPtrW, SetWindowPos, ShowWindow, WM_COPYDATA, WM_DROPFILES, WM_IME_CHAR,
};

use crate::{dialog, enumerate, hook, process};

/// `WM_COPYGLOBALDATA`; not exported by the `windows` crate.
const WM_COPYGLOBALDATA: u32 = 0x0049;

// The core reasons about style bits without the `windows` crate.
const _: () = {
    use windows::Win32::UI::WindowsAndMessaging as wm;
    assert!(style::WS_POPUP == wm::WS_POPUP.0);
    assert!(style::WS_MINIMIZE == wm::WS_MINIMIZE.0);
    assert!(style::WS_VISIBLE == wm::WS_VISIBLE.0);
    assert!(style::WS_MAXIMIZE == wm::WS_MAXIMIZE.0);
    assert!(style::WS_CAPTION == wm::WS_CAPTION.0);
    assert!(style::WS_THICKFRAME == wm::WS_THICKFRAME.0);
    assert!(style::WS_OVERLAPPEDWINDOW == wm::WS_OVERLAPPEDWINDOW.0);
    assert!(style::WS_EX_TOPMOST == wm::WS_EX_TOPMOST.0);
    assert!(style::WS_EX_ACCEPTFILES == wm::WS_EX_ACCEPTFILES.0);
    assert!(style::WS_EX_TRANSPARENT == wm::WS_EX_TRANSPARENT.0);
    assert!(style::WS_EX_LAYERED == wm::WS_EX_LAYERED.0);
};

/// Converts a raw handle value into an `HWND`.
pub(crate) fn hwnd(raw: RawHandle) -> HWND {
    HWND(raw as *mut _)
}

/// Converts an `HWND` into a raw handle value.
pub(crate) fn raw(hwnd: HWND) -> RawHandle {
    hwnd.0 as RawHandle
}

/// Flags for every reposition: never activate, never block.
const BASE_POS_FLAGS: SET_WINDOW_POS_FLAGS =
    SET_WINDOW_POS_FLAGS(SWP_NOACTIVATE.0 | SWP_ASYNCWINDOWPOS.0);

/// The Win32 window system.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Api;

impl Win32Api {
    fn set_window_pos(
        &self,
        hwnd_raw: RawHandle,
        insert_after: Option<HWND>,
        (x, y, cx, cy): (i32, i32, i32, i32),
        flags: SET_WINDOW_POS_FLAGS,
        context: &'static str,
    ) -> WindowResult<()> {
        // SAFETY: SetWindowPos validates the handle and fails cleanly on a
        // stale one.
        unsafe {
            SetWindowPos(
                hwnd(hwnd_raw),
                insert_after,
                x,
                y,
                cx,
                cy,
                flags | BASE_POS_FLAGS,
            )
        }
        .map_err(|e| WindowError::os(context, e))
    }
}

impl WindowApi for Win32Api {
    fn is_window(&self, hwnd_raw: RawHandle) -> bool {
        hwnd_raw != 0 && unsafe { IsWindow(Some(hwnd(hwnd_raw))) }.as_bool()
    }

    fn is_maximized(&self, hwnd_raw: RawHandle) -> bool {
        unsafe { IsZoomed(hwnd(hwnd_raw)) }.as_bool()
    }

    fn is_minimized(&self, hwnd_raw: RawHandle) -> bool {
        unsafe { IsIconic(hwnd(hwnd_raw)) }.as_bool()
    }

    fn style(&self, hwnd_raw: RawHandle) -> u32 {
        // SAFETY: reads a window long; returns 0 for an invalid handle.
        unsafe { GetWindowLongPtrW(hwnd(hwnd_raw), GWL_STYLE) as u32 }
    }

    fn ex_style(&self, hwnd_raw: RawHandle) -> u32 {
        unsafe { GetWindowLongPtrW(hwnd(hwnd_raw), GWL_EXSTYLE) as u32 }
    }

    fn set_style(&self, hwnd_raw: RawHandle, style: u32) {
        unsafe {
            SetWindowLongPtrW(hwnd(hwnd_raw), GWL_STYLE, style as isize);
        }
    }

    fn set_ex_style(&self, hwnd_raw: RawHandle, ex_style: u32) {
        unsafe {
            SetWindowLongPtrW(hwnd(hwnd_raw), GWL_EXSTYLE, ex_style as isize);
        }
    }

    fn rect(&self, hwnd_raw: RawHandle) -> WindowResult<Rect> {
        let mut rect = RECT::default();
        // SAFETY: GetWindowRect writes into our local RECT.
        unsafe { GetWindowRect(hwnd(hwnd_raw), &mut rect) }
            .map_err(|e| WindowError::os("GetWindowRect", e))?;
        Ok(Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn move_window(&self, hwnd_raw: RawHandle, x: i32, y: i32) -> WindowResult<()> {
        self.set_window_pos(
            hwnd_raw,
            None,
            (x, y, 0, 0),
            SWP_NOSIZE | SWP_NOZORDER | SWP_NOOWNERZORDER,
            "move window",
        )
    }

    fn resize_window(&self, hwnd_raw: RawHandle, width: i32, height: i32) -> WindowResult<()> {
        self.set_window_pos(
            hwnd_raw,
            None,
            (0, 0, width, height),
            SWP_NOMOVE | SWP_NOZORDER | SWP_NOOWNERZORDER,
            "resize window",
        )
    }

    fn set_topmost(&self, hwnd_raw: RawHandle, topmost: bool) -> WindowResult<()> {
        let insert_after = if topmost { HWND_TOPMOST } else { HWND_NOTOPMOST };
        self.set_window_pos(
            hwnd_raw,
            Some(insert_after),
            (0, 0, 0, 0),
            SWP_NOMOVE | SWP_NOSIZE | SWP_FRAMECHANGED | SWP_NOOWNERZORDER,
            "set topmost",
        )
    }

    fn show(&self, hwnd_raw: RawHandle, command: ShowCommand) {
        let cmd = match command {
            ShowCommand::Show => SW_SHOW,
            ShowCommand::Maximize => SW_MAXIMIZE,
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Restore => SW_RESTORE,
        };
        // The return value is the previous visibility, not an error.
        unsafe {
            let _ = ShowWindow(hwnd(hwnd_raw), cmd);
        }
    }

    fn focus(&self, hwnd_raw: RawHandle) {
        unsafe {
            let _ = SetForegroundWindow(hwnd(hwnd_raw));
            let _ = SetFocus(Some(hwnd(hwnd_raw)));
        }
    }

    fn post_char(&self, hwnd_raw: RawHandle, unit: u16) -> WindowResult<()> {
        unsafe {
            PostMessageW(
                Some(hwnd(hwnd_raw)),
                WM_IME_CHAR,
                WPARAM(unit as usize),
                LPARAM(0),
            )
        }
        .map_err(|e| WindowError::os("PostMessageW", e))
    }

    fn extend_frame_into_client(&self, hwnd_raw: RawHandle, whole_client: bool) -> WindowResult<()> {
        // -1 on every side means "the whole client area"; 0 resets.
        let inset = if whole_client { -1 } else { 0 };
        let margins = MARGINS {
            cxLeftWidth: inset,
            cxRightWidth: inset,
            cyTopHeight: inset,
            cyBottomHeight: inset,
        };
        unsafe { DwmExtendFrameIntoClientArea(hwnd(hwnd_raw), &margins) }
            .map_err(|e| WindowError::os("DwmExtendFrameIntoClientArea", e))
    }

    fn set_color_key(&self, hwnd_raw: RawHandle, key: Option<Rgb>) -> WindowResult<()> {
        let (color, flags) = match key {
            Some(key) => (COLORREF(key.to_colorref()), LWA_COLORKEY),
            None => (COLORREF(0), LAYERED_WINDOW_ATTRIBUTES_FLAGS(0)),
        };
        unsafe { SetLayeredWindowAttributes(hwnd(hwnd_raw), color, 0xFF, flags) }
            .map_err(|e| WindowError::os("SetLayeredWindowAttributes", e))
    }

    fn active_window(&self) -> Option<RawHandle> {
        let active = unsafe { GetActiveWindow() };
        (!active.is_invalid()).then(|| raw(active))
    }

    fn root_window(&self, hwnd_raw: RawHandle) -> RawHandle {
        let root = unsafe { GetAncestor(hwnd(hwnd_raw), GA_ROOT) };
        if root.is_invalid() {
            hwnd_raw
        } else {
            raw(root)
        }
    }

    fn top_level_windows(&self) -> WindowResult<Vec<RawHandle>> {
        enumerate::top_level_windows()
    }

    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<RawHandle> {
        enumerate::find_window(class, title)
    }

    fn title(&self, hwnd_raw: RawHandle) -> String {
        // SAFETY: GetWindowTextLengthW and GetWindowTextW only read window text.
        unsafe {
            let length = GetWindowTextLengthW(hwnd(hwnd_raw));
            if length <= 0 {
                return String::new();
            }
            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(hwnd(hwnd_raw), &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    fn class_name(&self, hwnd_raw: RawHandle) -> String {
        // 256 is the maximum class name length in Win32.
        let mut buffer = [0u16; 256];
        let length = unsafe { RealGetWindowClassW(hwnd(hwnd_raw), &mut buffer) };
        String::from_utf16_lossy(&buffer[..length as usize])
    }

    fn process_id(&self, hwnd_raw: RawHandle) -> u32 {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(hwnd(hwnd_raw), Some(&mut pid)) };
        pid
    }

    fn process_name(&self, pid: u32) -> WindowResult<String> {
        process::process_name(pid)
    }

    fn current_process_id(&self) -> u32 {
        unsafe { GetCurrentProcessId() }
    }

    fn cursor_visible(&self) -> bool {
        let mut info = CURSORINFO {
            cbSize: std::mem::size_of::<CURSORINFO>() as u32,
            ..Default::default()
        };
        match unsafe { GetCursorInfo(&mut info) } {
            Ok(()) => info.flags.0 & CURSOR_SHOWING.0 != 0,
            // Without information, assume the usual case.
            Err(_) => true,
        }
    }

    fn cursor_position(&self) -> Vec2 {
        let mut point = POINT::default();
        if unsafe { GetCursorPos(&mut point) }.is_ok() {
            Vec2::new(point.x as f32, point.y as f32)
        } else {
            Vec2::ZERO
        }
    }

    fn install_message_hook(&self) -> WindowResult<HookHandle> {
        hook::install()
    }

    fn remove_message_hook(&self, hook: HookHandle) {
        hook::uninstall(hook);
    }

    fn set_drop_message_filter(&self, hwnd_raw: RawHandle, allow: bool) -> WindowResult<()> {
        let action = if allow { MSGFLT_ALLOW } else { MSGFLT_RESET };
        for message in [WM_DROPFILES, WM_COPYDATA, WM_COPYGLOBALDATA] {
            unsafe { ChangeWindowMessageFilterEx(hwnd(hwnd_raw), message, action, None) }
                .map_err(|e| WindowError::os("ChangeWindowMessageFilterEx", e))?;
        }
        Ok(())
    }

    fn open_file_dialog(&self, owner: Option<RawHandle>, filter: &str) -> Option<PathBuf> {
        dialog::open_file(owner.map(hwnd), filter)
    }

    fn save_file_dialog(&self, owner: Option<RawHandle>, filter: &str) -> Option<PathBuf> {
        dialog::save_file(owner.map(hwnd), filter)
    }
}
