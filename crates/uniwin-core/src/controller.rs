//! Frame-synchronized controller.
//!
//! Drives a [`NativeWindow`] from the host's per-frame loop: acquires and
//! verifies the window, runs drag-to-move and the hit test, gates
//! click-through and mirrors the feature flags for the host.

use std::path::PathBuf;
use std::sync::Arc;

use crate::api::WindowApi;
use crate::drag::DragTracker;
use crate::drop_registry::{DropRegistry, FilesDropped};
use crate::event::{BackgroundRequest, WindowState};
use crate::handle::{self, WindowHandle};
use crate::hit_test::{ClickThroughGate, ContentProbe, HitContext, HitTest, HitTestPolicy};
use crate::input::FrameInput;
use crate::native::{HostCapabilities, NativeWindow, TransparencyMode};
use crate::{Rgb, Vec2};

/// Where the controller is in finding its own window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    /// No live handle.
    NotAcquired,
    /// A handle was adopted but not yet confirmed as the active window.
    Unverified,
    Verified,
}

type StateListener = Box<dyn FnMut(&WindowState)>;
type BackgroundListener = Box<dyn FnMut(BackgroundRequest)>;

pub struct WindowController<A: WindowApi + Clone> {
    api: A,
    caps: HostCapabilities,
    native: NativeWindow<A>,
    registry: Arc<DropRegistry>,
    files_dropped: Arc<FilesDropped>,
    verified: bool,

    // Cached flags; applied to the window on acquisition.
    transparent: bool,
    transparency_mode: TransparencyMode,
    color_key: Rgb,
    topmost: bool,
    maximized: bool,
    minimized: bool,
    file_drop: bool,
    allow_elevated_drop: bool,
    drag_move: bool,

    hit_test: HitTest,
    on_content: bool,
    click_through: bool,
    drag: DragTracker,

    state_listeners: Vec<StateListener>,
    background_listeners: Vec<BackgroundListener>,
}

impl<A: WindowApi + Clone> WindowController<A> {
    pub fn new(api: A, caps: HostCapabilities) -> Self {
        Self::with_registry(api, caps, DropRegistry::global())
    }

    pub fn with_registry(api: A, caps: HostCapabilities, registry: Arc<DropRegistry>) -> Self {
        let files_dropped = Arc::new(FilesDropped::default());
        let native =
            NativeWindow::with_registry(api.clone(), caps, registry.clone(), files_dropped.clone());
        Self {
            api,
            caps,
            native,
            registry,
            files_dropped,
            verified: false,
            transparent: false,
            transparency_mode: TransparencyMode::default(),
            color_key: Rgb::DEFAULT_KEY,
            topmost: false,
            maximized: false,
            minimized: false,
            file_drop: false,
            allow_elevated_drop: false,
            drag_move: true,
            hit_test: HitTest::default(),
            on_content: false,
            click_through: false,
            drag: DragTracker::default(),
            state_listeners: Vec::new(),
            background_listeners: Vec::new(),
        }
    }

    // -- frame loop ------------------------------------------------------

    /// Runs once per frame, before rendering.
    pub fn update(&mut self, input: &FrameInput) {
        if input.any_input {
            self.update_window(input.app_focused);
        }
        self.drag_move(input);
        self.update_click_through();
        self.native.update();
    }

    /// Runs once per frame after rendering, when the frame can be probed.
    pub fn end_frame(&mut self, input: &FrameInput, probe: &mut dyn ContentProbe) {
        let ctx = HitContext {
            screen_size: input.screen_size,
            transparent: self.transparent,
            mode: self.effective_mode(),
        };

        if let Some(touch) = self.drag.take_pending_touch()
            && self.hit_test.is_on_content(touch.position, &ctx, probe)
        {
            self.on_content = true;
            self.drag.claim_touch(touch.id);
            return;
        }
        self.on_content = self.hit_test.is_on_content(input.pointer, &ctx, probe);
    }

    /// Call when the application gains or loses OS focus.
    pub fn on_focus_changed(&mut self, focused: bool) {
        if focused {
            self.update_window(true);
        }
    }

    /// Tries to adopt this process's active window. Returns whether a
    /// window was adopted.
    pub fn acquire(&mut self, app_focused: bool) -> bool {
        self.verified = false;
        // A freshly adopted window starts without WS_EX_TRANSPARENT.
        self.click_through = false;
        if !app_focused {
            return false;
        }
        let Some(window) = handle::find_own_window(&self.api) else {
            log::debug!("own window not found; retrying on next input");
            return false;
        };

        self.native.set_window(Some(window));
        self.apply_cached_state();
        self.notify_state_changed();
        true
    }

    fn update_window(&mut self, app_focused: bool) {
        if !self.native.is_active() {
            self.acquire(app_focused);
        } else if !self.verified {
            if self.native.check_active_window() {
                log::debug!("window verified");
                self.verified = true;
            } else {
                log::info!("adopted window is not the active one; reacquiring");
                self.native.reset();
                self.native.dispose();
                self.native = NativeWindow::with_registry(
                    self.api.clone(),
                    self.caps,
                    self.registry.clone(),
                    self.files_dropped.clone(),
                );
                self.acquire(app_focused);
            }
        }
    }

    fn apply_cached_state(&mut self) {
        self.native.set_transparency_mode(self.transparency_mode);
        self.native.set_color_key(self.color_key);
        self.native.enable_topmost(self.topmost);

        if self.maximized {
            self.native.maximize();
        } else if self.minimized {
            self.native.minimize();
        }
        self.maximized = self.native.is_maximized();
        self.minimized = self.native.is_minimized();

        if self.transparent {
            self.native.enable_transparent(true);
        }
        if self.file_drop {
            self.native.begin_file_drop();
        }
        if self.allow_elevated_drop {
            self.native.allow_elevated_drop_sources(true);
        }
    }

    fn drag_move(&mut self, input: &FrameInput) {
        if !self.native.is_active() {
            self.drag.cancel();
            return;
        }
        let blocked = !self.drag_move || input.fullscreen || self.native.is_maximized();
        if let Some(delta) = self.drag.update(input, blocked) {
            let position = self.native.position() + delta;
            self.native.set_position(position);
        }
    }

    fn update_click_through(&mut self) {
        let gate = ClickThroughGate {
            on_content: self.on_content,
            cursor_visible: self.api.cursor_visible(),
            transparent: self.transparent,
            dragging: self.drag.is_dragging(),
        };
        let next = gate.decide(self.click_through);
        if next != self.click_through {
            log::debug!("click-through {}", if next { "on" } else { "off" });
            self.native.enable_click_through(next);
            self.click_through = next;
        }
    }

    fn effective_mode(&self) -> TransparencyMode {
        if self.native.is_transparent() {
            self.native.active_transparency_mode()
        } else {
            self.transparency_mode
        }
    }

    // -- setters ----------------------------------------------------------

    pub fn set_transparent(&mut self, transparent: bool) {
        self.transparent = transparent;
        self.native.enable_transparent(transparent);
        if !transparent {
            self.click_through = false;
        }
        self.notify_background();
        self.notify_state_changed();
    }

    /// Switches mode; while transparent this is a disable followed by an
    /// enable under the new mode.
    pub fn set_transparency_mode(&mut self, mode: TransparencyMode) {
        let changed = mode != self.transparency_mode;
        self.transparency_mode = mode;
        self.native.set_transparency_mode(mode);
        if changed && self.transparent && self.native.is_active() {
            self.native.enable_transparent(false);
            self.native.enable_transparent(true);
            self.click_through = false;
        }
        self.notify_background();
        self.notify_state_changed();
    }

    pub fn set_color_key(&mut self, key: Rgb) {
        self.color_key = key;
        self.native.set_color_key(key);
        if self.transparent && self.transparency_mode == TransparencyMode::ColorKey {
            self.notify_background();
        }
    }

    pub fn set_topmost(&mut self, topmost: bool) {
        self.topmost = topmost;
        if self.native.is_active() {
            self.native.enable_topmost(topmost);
            self.topmost = self.native.is_topmost();
        }
        self.notify_state_changed();
    }

    pub fn set_maximized(&mut self, maximized: bool) {
        if self.native.is_active() {
            if maximized {
                self.native.maximize();
            } else if self.native.is_maximized() {
                self.native.restore();
            }
            self.maximized = self.native.is_maximized();
            self.minimized = self.native.is_minimized();
        } else {
            self.maximized = maximized;
        }
        self.notify_state_changed();
    }

    pub fn set_minimized(&mut self, minimized: bool) {
        if self.native.is_active() {
            if minimized {
                self.native.minimize();
            } else if self.native.is_minimized() {
                self.native.restore();
            }
            self.minimized = self.native.is_minimized();
            self.maximized = self.native.is_maximized();
        } else {
            self.minimized = minimized;
        }
        self.notify_state_changed();
    }

    pub fn begin_file_drop(&mut self) {
        self.file_drop = true;
        if self.native.is_active() {
            self.native.begin_file_drop();
            self.file_drop = self.native.file_drop_enabled();
        }
        self.notify_state_changed();
    }

    pub fn end_file_drop(&mut self) {
        self.file_drop = false;
        self.native.end_file_drop();
        self.notify_state_changed();
    }

    pub fn set_file_drop(&mut self, enabled: bool) {
        if enabled {
            self.begin_file_drop();
        } else {
            self.end_file_drop();
        }
    }

    pub fn set_allow_elevated_drop_sources(&mut self, allow: bool) {
        self.allow_elevated_drop = allow;
        self.native.allow_elevated_drop_sources(allow);
    }

    pub fn set_drag_move(&mut self, enabled: bool) {
        self.drag_move = enabled;
        if !enabled {
            self.drag.cancel();
        }
    }

    pub fn set_hit_test_policy(&mut self, policy: HitTestPolicy) {
        self.hit_test.policy = policy;
    }

    /// Sets the alpha cutoff for the opacity hit test (clamped to 0..=1).
    pub fn set_opacity_cutoff(&mut self, cutoff: f32) {
        self.hit_test.opacity_cutoff = cutoff.clamp(0.0, 1.0);
    }

    pub fn set_raycast_distance(&mut self, distance: f32) {
        self.hit_test.raycast_distance = distance;
    }

    // -- window operations --------------------------------------------------

    pub fn focus(&self) {
        self.native.focus();
    }

    /// Puts the window back to its original look.
    pub fn reset(&mut self) {
        self.native.reset();
        self.transparent = false;
        self.topmost = false;
        self.maximized = false;
        self.minimized = false;
        self.click_through = false;
        self.notify_background();
        self.notify_state_changed();
    }

    pub fn position(&self) -> Vec2 {
        self.native.position()
    }

    pub fn set_position(&self, position: Vec2) {
        self.native.set_position(position);
    }

    /// System cursor position in screen pixels.
    pub fn cursor_position(&self) -> Vec2 {
        self.api.cursor_position()
    }

    /// Posts `key` to the window as IME character input.
    pub fn send_key(&self, key: char) {
        self.native.send_key(key);
    }

    pub fn size(&self) -> Vec2 {
        self.native.size()
    }

    pub fn set_size(&self, size: Vec2) {
        self.native.set_size(size);
    }

    pub fn show_open_file_dialog(&self, filter: Option<&str>) -> Option<PathBuf> {
        self.native.show_open_file_dialog(filter)
    }

    pub fn show_save_file_dialog(&self, filter: Option<&str>) -> Option<PathBuf> {
        self.native.show_save_file_dialog(filter)
    }

    /// Releases the window, restoring it when the host allows.
    pub fn dispose(&mut self) {
        self.native.dispose();
        self.verified = false;
    }

    // -- queries ----------------------------------------------------------------

    pub fn acquisition(&self) -> Acquisition {
        match (self.native.is_active(), self.verified) {
            (false, _) => Acquisition::NotAcquired,
            (true, false) => Acquisition::Unverified,
            (true, true) => Acquisition::Verified,
        }
    }

    pub fn window(&self) -> Option<&WindowHandle> {
        self.native.window()
    }

    pub fn native(&self) -> &NativeWindow<A> {
        &self.native
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    pub fn transparency_mode(&self) -> TransparencyMode {
        self.transparency_mode
    }

    pub fn color_key(&self) -> Rgb {
        self.color_key
    }

    pub fn is_topmost(&self) -> bool {
        if self.native.is_active() {
            self.native.is_topmost()
        } else {
            self.topmost
        }
    }

    pub fn is_maximized(&self) -> bool {
        if self.native.is_active() {
            self.native.is_maximized()
        } else {
            self.maximized
        }
    }

    pub fn is_minimized(&self) -> bool {
        if self.native.is_active() {
            self.native.is_minimized()
        } else {
            self.minimized
        }
    }

    pub fn is_file_drop_enabled(&self) -> bool {
        if self.native.is_active() {
            self.native.file_drop_enabled()
        } else {
            self.file_drop
        }
    }

    pub fn is_click_through(&self) -> bool {
        self.click_through
    }

    pub fn is_on_content(&self) -> bool {
        self.on_content
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn drag_move_enabled(&self) -> bool {
        self.drag_move
    }

    pub fn hit_test(&self) -> HitTest {
        self.hit_test
    }

    pub fn state(&self) -> WindowState {
        WindowState {
            transparent: self.transparent,
            transparency_mode: self.transparency_mode,
            topmost: self.is_topmost(),
            maximized: self.is_maximized(),
            minimized: self.is_minimized(),
            click_through: self.click_through,
            file_drop: self.is_file_drop_enabled(),
        }
    }

    // -- events -------------------------------------------------------------------

    pub fn on_state_changed(&mut self, listener: impl FnMut(&WindowState) + 'static) {
        self.state_listeners.push(Box::new(listener));
    }

    pub fn on_background_changed(&mut self, listener: impl FnMut(BackgroundRequest) + 'static) {
        self.background_listeners.push(Box::new(listener));
    }

    /// Adds a handler for files dropped onto the window. Handlers run on
    /// the window's thread, from inside the message hook.
    pub fn on_files_dropped(&self, handler: impl Fn(&[PathBuf]) + Send + Sync + 'static) {
        self.files_dropped.subscribe(handler);
    }

    fn notify_state_changed(&mut self) {
        let state = self.state();
        for listener in &mut self.state_listeners {
            listener(&state);
        }
    }

    fn notify_background(&mut self) {
        let request =
            BackgroundRequest::for_state(self.transparent, self.transparency_mode, self.color_key);
        for listener in &mut self.background_listeners {
            listener(request);
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
