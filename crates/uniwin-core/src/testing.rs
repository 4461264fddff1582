//! In-memory window system used by unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::rc::Rc;

use crate::api::{HookHandle, RawHandle, ShowCommand, WindowApi};
use crate::hit_test::ContentProbe;
use crate::style::{
    WS_EX_TOPMOST, WS_MAXIMIZE, WS_MINIMIZE, WS_OVERLAPPEDWINDOW, WS_VISIBLE,
};
use crate::{Rect, Rgb, Vec2, WindowError, WindowResult};

/// Process id the fake reports for the test process.
pub const FAKE_PID: u32 = 1000;

/// A side effect recorded by [`FakeApi`], in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetStyle(u32),
    SetExStyle(u32),
    Move(i32, i32),
    Resize(i32, i32),
    Show(ShowCommand),
    ExtendFrame(bool),
    ColorKey(Option<Rgb>),
    Topmost(bool),
    DropFilter(bool),
    Char(u16),
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub title: String,
    pub class_name: String,
    pub process_id: u32,
    pub parent: Option<RawHandle>,
    pub style: u32,
    pub ex_style: u32,
    pub rect: Rect,
    pub maximized: bool,
    pub minimized: bool,
    pub topmost: bool,
    pub frame_extended: bool,
    pub color_key: Option<Rgb>,
}

impl FakeWindow {
    /// An ordinary captioned, resizable, visible window at 100,100 (800x600).
    pub fn decorated(title: &str) -> Self {
        Self {
            title: title.to_string(),
            class_name: "FakeWindowClass".to_string(),
            process_id: FAKE_PID,
            parent: None,
            style: WS_VISIBLE | WS_OVERLAPPEDWINDOW,
            ex_style: 0,
            rect: Rect::new(100, 100, 800, 600),
            maximized: false,
            minimized: false,
            topmost: false,
            frame_extended: false,
            color_key: None,
        }
    }

    pub fn owned_by(mut self, pid: u32) -> Self {
        self.process_id = pid;
        self
    }

    pub fn child_of(mut self, parent: RawHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    pub fn with_ex_style(mut self, ex_style: u32) -> Self {
        self.ex_style = ex_style;
        self
    }
}

#[derive(Debug, Default)]
struct FakeState {
    windows: BTreeMap<RawHandle, FakeWindow>,
    next_handle: RawHandle,
    active: Option<RawHandle>,
    cursor_hidden: bool,
    cursor: Vec2,
    hooks: Vec<HookHandle>,
    next_hook: usize,
    hook_failure: bool,
    process_names: HashMap<u32, String>,
    dialog_result: Option<PathBuf>,
    last_filter: Option<String>,
    calls: Vec<Call>,
}

/// Shared-state fake; clones observe the same windows.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    state: Rc<RefCell<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        let api = Self::default();
        api.set_process_name(FAKE_PID, "game");
        api
    }

    pub fn add_window(&self, window: FakeWindow) -> RawHandle {
        let mut state = self.state.borrow_mut();
        state.next_handle += 0x10;
        let hwnd = state.next_handle;
        state.windows.insert(hwnd, window);
        hwnd
    }

    /// Adds a window owned by this process and makes it active.
    pub fn add_active_window(&self, title: &str) -> RawHandle {
        let hwnd = self.add_window(FakeWindow::decorated(title));
        self.set_active(Some(hwnd));
        hwnd
    }

    pub fn destroy(&self, hwnd: RawHandle) {
        let mut state = self.state.borrow_mut();
        state.windows.remove(&hwnd);
        if state.active == Some(hwnd) {
            state.active = None;
        }
    }

    pub fn set_active(&self, hwnd: Option<RawHandle>) {
        self.state.borrow_mut().active = hwnd;
    }

    pub fn set_cursor_visible(&self, visible: bool) {
        self.state.borrow_mut().cursor_hidden = !visible;
    }

    pub fn set_cursor_position(&self, position: Vec2) {
        self.state.borrow_mut().cursor = position;
    }

    pub fn set_hook_failure(&self, fail: bool) {
        self.state.borrow_mut().hook_failure = fail;
    }

    pub fn set_process_name(&self, pid: u32, name: &str) {
        self.state
            .borrow_mut()
            .process_names
            .insert(pid, name.to_string());
    }

    pub fn set_dialog_result(&self, path: Option<PathBuf>) {
        self.state.borrow_mut().dialog_result = path;
    }

    pub fn last_dialog_filter(&self) -> Option<String> {
        self.state.borrow().last_filter.clone()
    }

    /// Snapshot of a window's state.
    ///
    /// Panics if the handle does not exist.
    pub fn window(&self, hwnd: RawHandle) -> FakeWindow {
        self.state.borrow().windows[&hwnd].clone()
    }

    /// Changes live styles behind the control layer's back.
    pub fn force_styles(&self, hwnd: RawHandle, style: u32, ex_style: u32) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&hwnd) {
            w.style = style;
            w.ex_style = ex_style;
        }
    }

    pub fn installed_hooks(&self) -> usize {
        self.state.borrow().hooks.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn with_window<T>(&self, hwnd: RawHandle, f: impl FnOnce(&mut FakeWindow) -> T) -> Option<T> {
        self.state.borrow_mut().windows.get_mut(&hwnd).map(f)
    }

    fn require<T>(
        &self,
        hwnd: RawHandle,
        f: impl FnOnce(&mut FakeWindow) -> T,
    ) -> WindowResult<T> {
        self.with_window(hwnd, f)
            .ok_or_else(|| WindowError::os("fake", "invalid window handle"))
    }
}

impl WindowApi for FakeApi {
    fn is_window(&self, hwnd: RawHandle) -> bool {
        self.state.borrow().windows.contains_key(&hwnd)
    }

    fn is_maximized(&self, hwnd: RawHandle) -> bool {
        self.with_window(hwnd, |w| w.maximized).unwrap_or(false)
    }

    fn is_minimized(&self, hwnd: RawHandle) -> bool {
        self.with_window(hwnd, |w| w.minimized).unwrap_or(false)
    }

    fn style(&self, hwnd: RawHandle) -> u32 {
        self.with_window(hwnd, |w| w.style).unwrap_or(0)
    }

    fn ex_style(&self, hwnd: RawHandle) -> u32 {
        self.with_window(hwnd, |w| w.ex_style).unwrap_or(0)
    }

    fn set_style(&self, hwnd: RawHandle, style: u32) {
        self.record(Call::SetStyle(style));
        self.with_window(hwnd, |w| w.style = style);
    }

    fn set_ex_style(&self, hwnd: RawHandle, ex_style: u32) {
        self.record(Call::SetExStyle(ex_style));
        self.with_window(hwnd, |w| w.ex_style = ex_style);
    }

    fn rect(&self, hwnd: RawHandle) -> WindowResult<Rect> {
        self.require(hwnd, |w| w.rect)
    }

    fn move_window(&self, hwnd: RawHandle, x: i32, y: i32) -> WindowResult<()> {
        self.record(Call::Move(x, y));
        self.require(hwnd, |w| {
            w.rect.x = x;
            w.rect.y = y;
        })
    }

    fn resize_window(&self, hwnd: RawHandle, width: i32, height: i32) -> WindowResult<()> {
        self.record(Call::Resize(width, height));
        self.require(hwnd, |w| {
            w.rect.width = width;
            w.rect.height = height;
        })
    }

    fn set_topmost(&self, hwnd: RawHandle, topmost: bool) -> WindowResult<()> {
        self.record(Call::Topmost(topmost));
        self.require(hwnd, |w| {
            w.topmost = topmost;
            if topmost {
                w.ex_style |= WS_EX_TOPMOST;
            } else {
                w.ex_style &= !WS_EX_TOPMOST;
            }
        })
    }

    fn post_char(&self, hwnd: RawHandle, unit: u16) -> WindowResult<()> {
        self.record(Call::Char(unit));
        self.require(hwnd, |_| ())
    }

    fn show(&self, hwnd: RawHandle, command: ShowCommand) {
        self.record(Call::Show(command));
        self.with_window(hwnd, |w| match command {
            ShowCommand::Show => {}
            ShowCommand::Maximize => {
                w.maximized = true;
                w.minimized = false;
                w.style = (w.style | WS_MAXIMIZE) & !WS_MINIMIZE;
            }
            ShowCommand::Minimize => {
                w.minimized = true;
                w.style |= WS_MINIMIZE;
            }
            ShowCommand::Restore => {
                w.maximized = false;
                w.minimized = false;
                w.style &= !(WS_MAXIMIZE | WS_MINIMIZE);
            }
        });
    }

    fn focus(&self, hwnd: RawHandle) {
        if self.is_window(hwnd) {
            self.set_active(Some(hwnd));
        }
    }

    fn extend_frame_into_client(&self, hwnd: RawHandle, whole_client: bool) -> WindowResult<()> {
        self.record(Call::ExtendFrame(whole_client));
        self.require(hwnd, |w| w.frame_extended = whole_client)
    }

    fn set_color_key(&self, hwnd: RawHandle, key: Option<Rgb>) -> WindowResult<()> {
        self.record(Call::ColorKey(key));
        self.require(hwnd, |w| w.color_key = key)
    }

    fn active_window(&self) -> Option<RawHandle> {
        self.state.borrow().active
    }

    fn root_window(&self, hwnd: RawHandle) -> RawHandle {
        let state = self.state.borrow();
        let mut current = hwnd;
        while let Some(parent) = state.windows.get(&current).and_then(|w| w.parent) {
            current = parent;
        }
        current
    }

    fn top_level_windows(&self) -> WindowResult<Vec<RawHandle>> {
        Ok(self
            .state
            .borrow()
            .windows
            .iter()
            .filter(|(_, w)| w.parent.is_none())
            .map(|(&hwnd, _)| hwnd)
            .collect())
    }

    fn find_window(&self, class: Option<&str>, title: Option<&str>) -> Option<RawHandle> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|(_, w)| {
                w.parent.is_none()
                    && class.is_none_or(|c| w.class_name == c)
                    && title.is_none_or(|t| w.title == t)
            })
            .map(|(&hwnd, _)| hwnd)
    }

    fn title(&self, hwnd: RawHandle) -> String {
        self.with_window(hwnd, |w| w.title.clone()).unwrap_or_default()
    }

    fn class_name(&self, hwnd: RawHandle) -> String {
        self.with_window(hwnd, |w| w.class_name.clone())
            .unwrap_or_default()
    }

    fn process_id(&self, hwnd: RawHandle) -> u32 {
        self.with_window(hwnd, |w| w.process_id).unwrap_or(0)
    }

    fn process_name(&self, pid: u32) -> WindowResult<String> {
        self.state
            .borrow()
            .process_names
            .get(&pid)
            .cloned()
            .ok_or(WindowError::NotFound)
    }

    fn current_process_id(&self) -> u32 {
        FAKE_PID
    }

    fn cursor_visible(&self) -> bool {
        !self.state.borrow().cursor_hidden
    }

    fn cursor_position(&self) -> Vec2 {
        self.state.borrow().cursor
    }

    fn install_message_hook(&self) -> WindowResult<HookHandle> {
        let mut state = self.state.borrow_mut();
        if state.hook_failure {
            return Err(WindowError::HookInstall("access denied".into()));
        }
        state.next_hook += 1;
        let hook = HookHandle(state.next_hook);
        state.hooks.push(hook);
        Ok(hook)
    }

    fn remove_message_hook(&self, hook: HookHandle) {
        self.state.borrow_mut().hooks.retain(|h| *h != hook);
    }

    fn set_drop_message_filter(&self, hwnd: RawHandle, allow: bool) -> WindowResult<()> {
        self.record(Call::DropFilter(allow));
        self.require(hwnd, |_| ())
    }

    fn open_file_dialog(&self, _owner: Option<RawHandle>, filter: &str) -> Option<PathBuf> {
        let mut state = self.state.borrow_mut();
        state.last_filter = Some(filter.to_string());
        state.dialog_result.clone()
    }

    fn save_file_dialog(&self, owner: Option<RawHandle>, filter: &str) -> Option<PathBuf> {
        self.open_file_dialog(owner, filter)
    }
}

/// Scripted content probe for hit-test tests.
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    pub alpha: f32,
    pub readback_fails: bool,
    pub ui_hit: bool,
    pub scene_hit: bool,
    pub reads: usize,
}

impl FakeProbe {
    pub fn opaque() -> Self {
        Self {
            alpha: 1.0,
            ..Self::default()
        }
    }

    pub fn clear() -> Self {
        Self::default()
    }
}

impl ContentProbe for FakeProbe {
    fn read_alpha(&mut self, pos: Vec2) -> WindowResult<f32> {
        self.reads += 1;
        if self.readback_fails {
            let (x, y) = pos.to_pixels();
            return Err(WindowError::PixelReadback { x, y });
        }
        Ok(self.alpha)
    }

    fn ui_hit(&mut self, _pos: Vec2) -> bool {
        self.ui_hit
    }

    fn scene_hit(&mut self, _pos: Vec2, _max_distance: f32) -> bool {
        self.scene_hit
    }
}
