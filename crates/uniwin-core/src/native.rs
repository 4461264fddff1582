//! Native window control layer.
//!
//! Owns one OS window handle and applies transparency, borderless,
//! click-through, z-order, show-state and file-drop changes to it. Every
//! mutating call is a silent no-op while no live handle is held.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{HookHandle, RawHandle, ShowCommand, WindowApi};
use crate::dialog::{self, DEFAULT_FILTER};
use crate::drop_registry::{DropRegistry, FilesDropped, RegistrationId};
use crate::handle::WindowHandle;
use crate::style::{
    BORDERLESS_STYLE, SHOW_STATE_BITS, WS_EX_ACCEPTFILES, WS_EX_LAYERED, WS_EX_TOPMOST,
    WS_EX_TRANSPARENT, WindowStyleSnapshot,
};
use crate::{Rgb, Vec2};

/// How the window background is made see-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransparencyMode {
    /// Borderless only; nothing is made see-through.
    None,
    /// Compositor frame extended over the whole client area; per-pixel alpha.
    #[default]
    Alpha,
    /// Layered window with a single transparent color.
    ColorKey,
}

/// What the hosting environment lets the layer do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    pub decorations_removable: bool,
    pub click_through_available: bool,
    pub color_key_available: bool,
    /// Put the original style, position and z-order back on dispose.
    pub restore_on_dispose: bool,
}

impl HostCapabilities {
    /// A stand-alone application that owns its window outright.
    pub const fn standalone() -> Self {
        Self {
            decorations_removable: true,
            click_through_available: true,
            color_key_available: true,
            restore_on_dispose: true,
        }
    }

    /// Running inside an editor's game view: the window belongs to the
    /// editor, so only non-destructive changes are made.
    pub const fn embedded_editor() -> Self {
        Self {
            decorations_removable: false,
            click_through_available: false,
            color_key_available: false,
            restore_on_dispose: false,
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::standalone()
    }
}

pub struct NativeWindow<A: WindowApi> {
    api: A,
    caps: HostCapabilities,
    window: Option<WindowHandle>,
    styles: WindowStyleSnapshot,
    style_before_borderless: Option<u32>,
    original_position: Vec2,
    original_size: Vec2,
    transparency_mode: TransparencyMode,
    /// Mode applied by the last enable; drives the next disable.
    active_mode: TransparencyMode,
    transparent: bool,
    topmost: bool,
    color_key: Rgb,
    hook: Option<HookHandle>,
    registration: Option<RegistrationId>,
    registry: Arc<DropRegistry>,
    files_dropped: Arc<FilesDropped>,
    drop_filter_relaxed: bool,
}

impl<A: WindowApi> NativeWindow<A> {
    /// Creates a layer that routes drops through the process-wide registry.
    pub fn new(api: A, caps: HostCapabilities) -> Self {
        Self::with_registry(
            api,
            caps,
            DropRegistry::global(),
            Arc::new(FilesDropped::default()),
        )
    }

    pub fn with_registry(
        api: A,
        caps: HostCapabilities,
        registry: Arc<DropRegistry>,
        files_dropped: Arc<FilesDropped>,
    ) -> Self {
        Self {
            api,
            caps,
            window: None,
            styles: WindowStyleSnapshot::default(),
            style_before_borderless: None,
            original_position: Vec2::ZERO,
            original_size: Vec2::ZERO,
            transparency_mode: TransparencyMode::default(),
            active_mode: TransparencyMode::None,
            transparent: false,
            topmost: false,
            color_key: Rgb::DEFAULT_KEY,
            hook: None,
            registration: None,
            registry,
            files_dropped,
            drop_filter_relaxed: false,
        }
    }

    // -- acquisition --------------------------------------------------

    /// Adopts `window` as the controlled window, releasing any previous one.
    pub fn set_window(&mut self, window: Option<WindowHandle>) {
        self.dispose();
        let Some(window) = window else {
            return;
        };

        log::info!("controlling {window}");
        let hwnd = window.hwnd;
        self.window = Some(window);
        self.store_geometry();
        let style = self.api.style(hwnd) & !SHOW_STATE_BITS;
        self.styles = WindowStyleSnapshot::capture(style, self.api.ex_style(hwnd));
    }

    /// Tears down file drop and, when the host allows it, puts the window
    /// back the way it was found. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        let active = self.is_active();
        self.end_file_drop();

        if active {
            if self.drop_filter_relaxed {
                self.allow_elevated_drop_sources(false);
            }
            if self.caps.restore_on_dispose {
                self.reset();
            }
        }

        if let Some(window) = self.window.take() {
            log::info!("released HWND:0x{:X}", window.hwnd);
        }
        self.styles = WindowStyleSnapshot::default();
        self.style_before_borderless = None;
        self.active_mode = TransparencyMode::None;
        self.transparent = false;
        self.topmost = false;
        self.drop_filter_relaxed = false;
    }

    /// Disables transparency and topmost, restores the show state and
    /// reinstates the original style and geometry.
    pub fn reset(&mut self) {
        self.enable_transparent(false);
        self.enable_topmost(false);
        self.restore();
        self.restore_window_state();
    }

    fn restore_window_state(&mut self) {
        let Some(hwnd) = self.live() else {
            return;
        };
        self.styles.current_style = self.styles.original_style;
        self.styles.current_ex_style = self.styles.original_ex_style;
        self.api.set_style(hwnd, self.styles.current_style);
        self.api.set_ex_style(hwnd, self.styles.current_ex_style);

        if self.original_size != Vec2::ZERO {
            self.set_position(self.original_position);
            self.set_size(self.original_size);
        }
        self.api.show(hwnd, ShowCommand::Show);
    }

    /// The held handle, whether or not it is still valid.
    pub fn hwnd(&self) -> Option<RawHandle> {
        self.window.as_ref().map(|w| w.hwnd)
    }

    pub fn window(&self) -> Option<&WindowHandle> {
        self.window.as_ref()
    }

    /// Whether a handle is held and still identifies a window.
    pub fn is_active(&self) -> bool {
        self.live().is_some()
    }

    fn live(&self) -> Option<RawHandle> {
        self.hwnd().filter(|&hwnd| self.api.is_window(hwnd))
    }

    /// Whether the OS-active window is the one held here.
    pub fn check_active_window(&self) -> bool {
        self.hwnd().is_some() && self.api.active_window() == self.hwnd()
    }

    pub fn focus(&self) {
        if let Some(hwnd) = self.live() {
            self.api.focus(hwnd);
        }
    }

    /// Posts `key` as IME character input, one message per UTF-16 unit.
    pub fn send_key(&self, key: char) {
        let Some(hwnd) = self.live() else {
            return;
        };
        let mut units = [0u16; 2];
        for &unit in key.encode_utf16(&mut units).iter() {
            if let Err(e) = self.api.post_char(hwnd, unit) {
                log::warn!("posting {key:?} failed: {e}");
                return;
            }
        }
    }

    pub fn styles(&self) -> WindowStyleSnapshot {
        self.styles
    }

    pub fn files_dropped(&self) -> &Arc<FilesDropped> {
        &self.files_dropped
    }

    // -- geometry -----------------------------------------------------

    pub fn original_position(&self) -> Vec2 {
        self.original_position
    }

    pub fn original_size(&self) -> Vec2 {
        self.original_size
    }

    fn store_geometry(&mut self) {
        let Some(hwnd) = self.live() else {
            return;
        };
        if self.api.is_maximized(hwnd) || self.api.is_minimized(hwnd) {
            return;
        }
        match self.api.rect(hwnd) {
            Ok(rect) => {
                self.original_position = rect.position();
                self.original_size = rect.size();
            }
            Err(e) => log::warn!("could not read window rectangle: {e}"),
        }
    }

    /// Top-left corner in screen pixels, or zero when inactive.
    pub fn position(&self) -> Vec2 {
        self.live()
            .and_then(|hwnd| self.api.rect(hwnd).ok())
            .map_or(Vec2::ZERO, |rect| rect.position())
    }

    /// Outer size in pixels, or zero when inactive.
    pub fn size(&self) -> Vec2 {
        self.live()
            .and_then(|hwnd| self.api.rect(hwnd).ok())
            .map_or(Vec2::ZERO, |rect| rect.size())
    }

    pub fn set_position(&self, position: Vec2) {
        let Some(hwnd) = self.live() else {
            return;
        };
        let (x, y) = position.to_pixels();
        if let Err(e) = self.api.move_window(hwnd, x, y) {
            log::warn!("move to ({x}, {y}) failed: {e}");
        }
    }

    pub fn set_size(&self, size: Vec2) {
        let Some(hwnd) = self.live() else {
            return;
        };
        let (width, height) = size.to_pixels();
        if let Err(e) = self.api.resize_window(hwnd, width, height) {
            log::warn!("resize to {width}x{height} failed: {e}");
        }
    }

    // -- z-order and show state ----------------------------------------

    pub fn enable_topmost(&mut self, topmost: bool) {
        let Some(hwnd) = self.live() else {
            return;
        };
        if let Err(e) = self.api.set_topmost(hwnd, topmost) {
            log::warn!("set topmost={topmost} failed: {e}");
            return;
        }
        self.topmost = topmost;
        if topmost {
            self.styles.current_ex_style |= WS_EX_TOPMOST;
        } else {
            self.styles.current_ex_style &= !WS_EX_TOPMOST;
        }
    }

    pub fn is_topmost(&self) -> bool {
        self.is_active() && self.topmost
    }

    pub fn is_maximized(&self) -> bool {
        self.live().is_some_and(|hwnd| self.api.is_maximized(hwnd))
    }

    pub fn is_minimized(&self) -> bool {
        self.live().is_some_and(|hwnd| self.api.is_minimized(hwnd))
    }

    pub fn maximize(&mut self) {
        self.show(ShowCommand::Maximize);
    }

    pub fn minimize(&mut self) {
        self.show(ShowCommand::Minimize);
    }

    pub fn restore(&mut self) {
        self.show(ShowCommand::Restore);
    }

    fn show(&mut self, command: ShowCommand) {
        let Some(hwnd) = self.live() else {
            return;
        };
        self.api.show(hwnd, command);
        // The OS rewrites the show-state bits; keep everything else.
        self.styles.current_style = self.api.style(hwnd) & !SHOW_STATE_BITS;
    }

    // -- transparency ---------------------------------------------------

    /// Selects the mode the next [`enable_transparent(true)`](Self::enable_transparent)
    /// applies. An already active mode stays in effect until disabled.
    pub fn set_transparency_mode(&mut self, mode: TransparencyMode) {
        self.transparency_mode = mode;
    }

    pub fn transparency_mode(&self) -> TransparencyMode {
        self.transparency_mode
    }

    /// Mode currently applied to the window (`None` while opaque).
    pub fn active_transparency_mode(&self) -> TransparencyMode {
        self.active_mode
    }

    pub fn is_transparent(&self) -> bool {
        self.is_active() && self.transparent
    }

    pub fn set_color_key(&mut self, key: Rgb) {
        self.color_key = key;
        if self.active_mode != TransparencyMode::ColorKey || !self.caps.color_key_available {
            return;
        }
        let Some(hwnd) = self.live() else {
            return;
        };
        if let Err(e) = self.api.set_color_key(hwnd, Some(key)) {
            log::warn!("color key update failed: {e}");
        }
    }

    pub fn color_key(&self) -> Rgb {
        self.color_key
    }

    /// Makes the window background see-through (borderless plus the
    /// configured mode), or undoes it.
    pub fn enable_transparent(&mut self, enable: bool) {
        let Some(hwnd) = self.live() else {
            return;
        };

        let was_maximized = self.api.is_maximized(hwnd);
        if was_maximized {
            self.restore();
        }
        self.store_geometry();

        if enable {
            if self.active_mode != TransparencyMode::None {
                self.disable_mode(hwnd, self.active_mode);
            }
            self.enable_borderless(true);
            self.enable_mode(hwnd, self.transparency_mode);
            self.active_mode = self.transparency_mode;
        } else {
            self.disable_mode(hwnd, self.active_mode);
            self.enable_borderless(false);
            self.enable_click_through(false);
            self.active_mode = TransparencyMode::None;
        }
        self.transparent = enable;

        if was_maximized {
            self.maximize();
        } else {
            // Nudge the size so the host notices the client area changed.
            let size = self.size();
            self.set_size(size + Vec2::new(1.0, 1.0));
            self.set_size(size);
        }
        self.api.show(hwnd, ShowCommand::Show);
    }

    fn enable_borderless(&mut self, enable: bool) {
        if !self.caps.decorations_removable {
            return;
        }
        let Some(hwnd) = self.live() else {
            return;
        };

        if enable {
            if self.style_before_borderless.is_none() {
                self.style_before_borderless = Some(self.styles.current_style);
            }
            self.styles.current_style = BORDERLESS_STYLE;
        } else {
            self.styles.current_style = self
                .style_before_borderless
                .take()
                .unwrap_or(self.styles.original_style);
        }
        self.api.set_style(hwnd, self.styles.current_style);
    }

    fn enable_mode(&mut self, hwnd: RawHandle, mode: TransparencyMode) {
        match mode {
            TransparencyMode::None => {}
            TransparencyMode::Alpha => {
                if let Err(e) = self.api.extend_frame_into_client(hwnd, true) {
                    log::warn!("extending frame into client area failed: {e}");
                }
            }
            TransparencyMode::ColorKey => {
                if !self.caps.color_key_available {
                    log::debug!("color key transparency unavailable in this host");
                    return;
                }
                if let Err(e) = self.api.set_color_key(hwnd, Some(self.color_key)) {
                    log::warn!("setting color key {} failed: {e}", self.color_key);
                }
                self.styles.current_ex_style |= WS_EX_LAYERED;
                self.api.set_ex_style(hwnd, self.styles.current_ex_style);
            }
        }
    }

    fn disable_mode(&mut self, hwnd: RawHandle, mode: TransparencyMode) {
        match mode {
            TransparencyMode::None => {}
            TransparencyMode::Alpha => {
                if let Err(e) = self.api.extend_frame_into_client(hwnd, false) {
                    log::warn!("resetting frame extension failed: {e}");
                }
            }
            TransparencyMode::ColorKey => {
                if !self.caps.color_key_available {
                    return;
                }
                if let Err(e) = self.api.set_color_key(hwnd, None) {
                    log::warn!("clearing color key failed: {e}");
                }
                self.styles.current_ex_style = self
                    .styles
                    .ex_with_original_bits(self.styles.current_ex_style, WS_EX_LAYERED);
                self.api.set_ex_style(hwnd, self.styles.current_ex_style);
            }
        }
    }

    /// Lets mouse input fall through to whatever is behind the window.
    ///
    /// Ignored while color-key transparency is active, and when the host
    /// does not allow click-through.
    pub fn enable_click_through(&mut self, enable: bool) {
        if self.active_mode == TransparencyMode::ColorKey || !self.caps.click_through_available {
            return;
        }
        let Some(hwnd) = self.live() else {
            return;
        };

        const MASK: u32 = WS_EX_TRANSPARENT | WS_EX_LAYERED;
        self.styles.current_ex_style = if enable {
            self.styles.current_ex_style | MASK
        } else {
            self.styles
                .ex_with_original_bits(self.styles.current_ex_style, MASK)
        };
        self.api.set_ex_style(hwnd, self.styles.current_ex_style);
    }

    pub fn is_click_through(&self) -> bool {
        self.is_active() && self.styles.current_ex_style & WS_EX_TRANSPARENT != 0
    }

    /// Reasserts the commanded styles if something else changed them.
    ///
    /// Skipped while minimized or maximized, where the OS owns the styles.
    pub fn update(&mut self) {
        let Some(hwnd) = self.live() else {
            return;
        };
        if self.api.is_minimized(hwnd) || self.api.is_maximized(hwnd) {
            return;
        }

        let mut drifted = false;
        let style = self.api.style(hwnd);
        if style != self.styles.current_style {
            log::debug!(
                "style drifted to 0x{style:08X}, reasserting 0x{:08X}",
                self.styles.current_style
            );
            self.api.set_style(hwnd, self.styles.current_style);
            drifted = true;
        }
        // SetWindowPos applies the topmost bit asynchronously, and
        // SetWindowLongPtrW cannot change it anyway.
        let ex_style = self.api.ex_style(hwnd);
        if (ex_style ^ self.styles.current_ex_style) & !WS_EX_TOPMOST != 0 {
            log::debug!(
                "ex style drifted to 0x{ex_style:08X}, reasserting 0x{:08X}",
                self.styles.current_ex_style
            );
            self.api.set_ex_style(hwnd, self.styles.current_ex_style);
            drifted = true;
        }
        if drifted {
            self.api.show(hwnd, ShowCommand::Show);
        }
    }

    // -- file drop -------------------------------------------------------

    /// Starts accepting files dropped from the shell.
    ///
    /// If the message hook cannot be installed the failure is logged and
    /// file drop stays off.
    pub fn begin_file_drop(&mut self) {
        let Some(hwnd) = self.live() else {
            self.end_file_drop();
            return;
        };

        if self.registration.is_none() {
            self.registration = Some(self.registry.register(hwnd, self.files_dropped.clone()));
        }
        if self.hook.is_none() {
            match self.api.install_message_hook() {
                Ok(hook) => self.hook = Some(hook),
                Err(e) => {
                    log::error!("file drop disabled: {e}");
                    self.end_file_drop();
                    return;
                }
            }
        }

        self.styles.current_ex_style |= WS_EX_ACCEPTFILES;
        self.api.set_ex_style(hwnd, self.styles.current_ex_style);
    }

    /// Stops accepting dropped files. Always deregisters, even when the
    /// window is already gone.
    pub fn end_file_drop(&mut self) {
        if let Some(hook) = self.hook.take() {
            self.api.remove_message_hook(hook);
        }
        if let Some(id) = self.registration.take() {
            self.registry.unregister(id);
        }

        let Some(hwnd) = self.live() else {
            return;
        };
        self.styles.current_ex_style = self
            .styles
            .ex_with_original_bits(self.styles.current_ex_style, WS_EX_ACCEPTFILES);
        self.api.set_ex_style(hwnd, self.styles.current_ex_style);
    }

    pub fn file_drop_enabled(&self) -> bool {
        self.hook.is_some()
    }

    /// Lets drops from lower-integrity processes through when this process
    /// runs elevated, or puts the default message filter back.
    pub fn allow_elevated_drop_sources(&mut self, allow: bool) {
        let Some(hwnd) = self.live() else {
            return;
        };
        match self.api.set_drop_message_filter(hwnd, allow) {
            Ok(()) => self.drop_filter_relaxed = allow,
            Err(e) => log::warn!("changing drop message filter failed: {e}"),
        }
    }

    // -- dialogs -----------------------------------------------------------

    /// Shows the native open-file dialog. `filter` is pipe-delimited
    /// (`"Images|*.png|All files|*.*"`).
    pub fn show_open_file_dialog(&self, filter: Option<&str>) -> Option<PathBuf> {
        let filter = dialog::native_filter(filter.unwrap_or(DEFAULT_FILTER));
        self.api.open_file_dialog(self.live(), &filter)
    }

    /// Shows the native save-file dialog. `filter` is pipe-delimited.
    pub fn show_save_file_dialog(&self, filter: Option<&str>) -> Option<PathBuf> {
        let filter = dialog::native_filter(filter.unwrap_or(DEFAULT_FILTER));
        self.api.save_file_dialog(self.live(), &filter)
    }
}

impl<A: WindowApi> Drop for NativeWindow<A> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "native_tests.rs"]
mod tests;
