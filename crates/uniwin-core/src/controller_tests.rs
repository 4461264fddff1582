use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use super::*;
use crate::api::{RawHandle, ShowCommand};
use crate::input::{MouseButtons, Touch, TouchPhase};
use crate::style::BORDERLESS_STYLE;
use crate::testing::{Call, FakeApi, FakeProbe, FakeWindow};

fn setup() -> (FakeApi, RawHandle, WindowController<FakeApi>, Arc<DropRegistry>) {
    let api = FakeApi::new();
    let hwnd = api.add_active_window("Game");
    let registry = Arc::new(DropRegistry::new());
    let controller =
        WindowController::with_registry(api.clone(), HostCapabilities::standalone(), registry.clone());
    (api, hwnd, controller, registry)
}

fn frame() -> FrameInput {
    FrameInput {
        app_focused: true,
        any_input: true,
        pointer: Vec2::new(400.0, 300.0),
        screen_size: Vec2::new(800.0, 600.0),
        ..FrameInput::default()
    }
}

fn mouse_frame(x: f32, y: f32, pressed: bool) -> FrameInput {
    FrameInput {
        pointer: Vec2::new(x, y),
        mouse: MouseButtons {
            primary_pressed: pressed,
            primary_held: true,
            ..MouseButtons::default()
        },
        ..frame()
    }
}

fn touch_frame(x: f32, y: f32, phase: TouchPhase) -> FrameInput {
    FrameInput {
        touches: vec![Touch {
            id: 1,
            position: Vec2::new(x, y),
            phase,
        }],
        ..frame()
    }
}

fn count_notifications(controller: &mut WindowController<FakeApi>) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let sink = count.clone();
    controller.on_state_changed(move |_| sink.set(sink.get() + 1));
    count
}

// -- acquisition ----------------------------------------------------------

#[test]
fn acquires_then_verifies_on_following_frame() {
    // Arrange
    let (_api, hwnd, mut controller, _) = setup();

    // Act / Assert
    assert_eq!(controller.acquisition(), Acquisition::NotAcquired);
    controller.update(&frame());
    assert_eq!(controller.acquisition(), Acquisition::Unverified);
    assert_eq!(controller.window().map(|w| w.hwnd), Some(hwnd));
    controller.update(&frame());
    assert_eq!(controller.acquisition(), Acquisition::Verified);
}

#[test]
fn acquisition_waits_for_focus_and_input() {
    let (_api, _hwnd, mut controller, _) = setup();

    controller.update(&FrameInput {
        app_focused: false,
        ..frame()
    });
    assert_eq!(controller.acquisition(), Acquisition::NotAcquired);

    controller.update(&FrameInput {
        any_input: false,
        ..frame()
    });
    assert_eq!(controller.acquisition(), Acquisition::NotAcquired);
}

#[test]
fn focus_gain_triggers_acquisition() {
    let (_api, _hwnd, mut controller, _) = setup();

    controller.on_focus_changed(true);

    assert_eq!(controller.acquisition(), Acquisition::Unverified);
}

#[test]
fn verification_mismatch_reacquires_exactly_once() {
    // Arrange
    let (api, first, mut controller, _) = setup();
    controller.update(&frame());
    let second = api.add_window(FakeWindow::decorated("Game (real)"));
    api.set_active(Some(second));
    let notifications = count_notifications(&mut controller);

    // Act
    controller.update(&frame());

    // Assert
    assert_ne!(first, second);
    assert_eq!(controller.window().map(|w| w.hwnd), Some(second));
    assert_eq!(controller.acquisition(), Acquisition::Unverified);
    assert_eq!(notifications.get(), 1);

    controller.update(&frame());
    assert_eq!(controller.acquisition(), Acquisition::Verified);
    assert_eq!(notifications.get(), 1);
}

#[test]
fn mismatch_with_foreign_window_drops_back_to_not_acquired() {
    let (api, _hwnd, mut controller, _) = setup();
    controller.update(&frame());
    let foreign = api.add_window(FakeWindow::decorated("Browser").owned_by(77));
    api.set_active(Some(foreign));

    controller.update(&frame());

    assert_eq!(controller.acquisition(), Acquisition::NotAcquired);
}

#[test]
fn destroyed_window_is_reacquired() {
    let (api, first, mut controller, _) = setup();
    controller.update(&frame());
    controller.update(&frame());
    api.destroy(first);
    let replacement = api.add_active_window("Game");

    controller.update(&frame());

    assert_eq!(controller.window().map(|w| w.hwnd), Some(replacement));
}

#[test]
fn click_through_is_reapplied_to_replacement_window() {
    // Arrange
    let (api, first, mut controller) = transparent_controller();
    controller.end_frame(&frame(), &mut FakeProbe::clear());
    controller.update(&frame());
    assert!(controller.is_click_through());
    api.destroy(first);
    let replacement = api.add_active_window("Game");

    // Act
    for _ in 0..3 {
        controller.end_frame(&frame(), &mut FakeProbe::clear());
        controller.update(&frame());
    }

    // Assert
    let live = api.window(replacement).ex_style & crate::style::WS_EX_TRANSPARENT != 0;
    assert_eq!(controller.is_click_through(), live);
    assert!(live);
}

#[test]
fn cursor_position_comes_from_window_system() {
    let (api, _hwnd, controller, _) = setup();
    api.set_cursor_position(Vec2::new(320.0, 240.0));

    assert_eq!(controller.cursor_position(), Vec2::new(320.0, 240.0));
}

#[test]
fn queued_flags_apply_on_acquisition() {
    // Arrange
    let (api, hwnd, mut controller, registry) = setup();
    controller.set_topmost(true);
    controller.set_transparent(true);
    controller.begin_file_drop();

    // Act
    controller.update(&frame());

    // Assert
    let window = api.window(hwnd);
    assert!(window.topmost);
    assert_eq!(window.style, BORDERLESS_STYLE);
    assert!(window.frame_extended);
    assert!(registry.is_registered(hwnd));
    assert!(controller.is_file_drop_enabled());
}

#[test]
fn queued_maximize_applies_on_acquisition() {
    let (api, hwnd, mut controller, _) = setup();
    controller.set_maximized(true);
    assert!(controller.is_maximized());

    controller.update(&frame());

    assert!(api.window(hwnd).maximized);
    assert!(controller.is_maximized());
}

// -- setters ----------------------------------------------------------------

#[test]
fn each_setter_raises_one_notification() {
    // Arrange
    let (_api, _hwnd, mut controller, _) = setup();
    controller.update(&frame());
    let notifications = count_notifications(&mut controller);

    // Act
    controller.set_transparent(true);
    controller.set_transparency_mode(TransparencyMode::ColorKey);
    controller.set_topmost(true);
    controller.set_maximized(true);
    controller.set_minimized(true);
    controller.begin_file_drop();
    controller.end_file_drop();

    // Assert
    assert_eq!(notifications.get(), 7);
}

#[test]
fn listener_sees_updated_state() {
    let (_api, _hwnd, mut controller, _) = setup();
    controller.update(&frame());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    controller.on_state_changed(move |state| sink.borrow_mut().push(*state));

    controller.set_topmost(true);

    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].topmost);
}

#[test]
fn mode_change_while_transparent_reapplies() {
    // Arrange
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&frame());
    controller.set_transparent(true);
    api.clear_calls();

    // Act
    controller.set_transparency_mode(TransparencyMode::ColorKey);

    // Assert
    let calls = api.calls();
    let undo = calls.iter().position(|c| *c == Call::ExtendFrame(false));
    let apply = calls
        .iter()
        .position(|c| *c == Call::ColorKey(Some(Rgb::DEFAULT_KEY)));
    assert!(undo.is_some() && apply.is_some());
    assert!(undo < apply);
    assert_eq!(api.window(hwnd).color_key, Some(Rgb::DEFAULT_KEY));
    assert_eq!(
        controller.native().active_transparency_mode(),
        TransparencyMode::ColorKey
    );
}

#[test]
fn background_requests_follow_transparency() {
    // Arrange
    let (_api, _hwnd, mut controller, _) = setup();
    let requests = Rc::new(RefCell::new(Vec::new()));
    let sink = requests.clone();
    controller.on_background_changed(move |r| sink.borrow_mut().push(r));

    // Act
    controller.set_transparent(true);
    controller.set_transparency_mode(TransparencyMode::ColorKey);
    controller.set_color_key(Rgb::new(0, 255, 0));
    controller.set_transparent(false);

    // Assert
    assert_eq!(
        *requests.borrow(),
        vec![
            BackgroundRequest::Clear,
            BackgroundRequest::Key(Rgb::DEFAULT_KEY),
            BackgroundRequest::Key(Rgb::new(0, 255, 0)),
            BackgroundRequest::Original,
        ]
    );
}

#[test]
fn maximize_and_minimize_forward_when_active() {
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&frame());
    api.clear_calls();

    controller.set_maximized(true);
    controller.set_maximized(false);
    controller.set_minimized(true);

    assert_eq!(
        api.calls(),
        vec![
            Call::Show(ShowCommand::Maximize),
            Call::Show(ShowCommand::Restore),
            Call::Show(ShowCommand::Minimize),
        ]
    );
    assert!(api.window(hwnd).minimized);
    assert!(controller.is_minimized());
}

// -- click-through ----------------------------------------------------------

fn transparent_controller() -> (FakeApi, RawHandle, WindowController<FakeApi>) {
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&frame());
    controller.set_transparent(true);
    (api, hwnd, controller)
}

#[test]
fn click_through_engages_over_clear_pixels() {
    // Arrange
    let (api, hwnd, mut controller) = transparent_controller();

    // Act
    controller.end_frame(&frame(), &mut FakeProbe::clear());
    controller.update(&frame());

    // Assert
    assert!(controller.is_click_through());
    assert_ne!(api.window(hwnd).ex_style & crate::style::WS_EX_TRANSPARENT, 0);

    controller.end_frame(&frame(), &mut FakeProbe::opaque());
    controller.update(&frame());
    assert!(!controller.is_click_through());
}

#[test]
fn hidden_cursor_disables_click_through() {
    let (api, _hwnd, mut controller) = transparent_controller();
    controller.end_frame(&frame(), &mut FakeProbe::clear());
    controller.update(&frame());

    api.set_cursor_visible(false);
    controller.update(&frame());

    assert!(!controller.is_click_through());
}

#[test]
fn disabling_transparency_forces_click_through_off() {
    let (_api, _hwnd, mut controller) = transparent_controller();
    controller.end_frame(&frame(), &mut FakeProbe::clear());
    controller.update(&frame());
    assert!(controller.is_click_through());

    controller.set_transparent(false);

    assert!(!controller.is_click_through());
    assert!(!controller.state().click_through);
}

#[test]
fn opaque_window_never_clicks_through() {
    let (_api, _hwnd, mut controller, _) = setup();
    controller.update(&frame());

    for mut probe in [
        FakeProbe::clear(),
        FakeProbe::opaque(),
        FakeProbe {
            readback_fails: true,
            ..FakeProbe::default()
        },
    ] {
        for pointer in [Vec2::new(400.0, 300.0), Vec2::new(-10.0, 900.0)] {
            let input = FrameInput {
                pointer,
                ..frame()
            };
            controller.end_frame(&input, &mut probe);
            controller.update(&input);
            assert!(!controller.is_click_through());
        }
    }
}

// -- drag-to-move -----------------------------------------------------------

#[test]
fn mouse_drag_moves_window_with_inverted_y() {
    // Arrange
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&mouse_frame(10.0, 10.0, true));

    // Act
    controller.update(&mouse_frame(15.0, 30.0, false));

    // Assert
    assert_eq!(api.window(hwnd).rect.position(), Vec2::new(105.0, 80.0));
    assert!(controller.is_dragging());
}

#[test]
fn drag_is_blocked_while_maximized() {
    let (api, _hwnd, mut controller, _) = setup();
    controller.update(&frame());
    controller.set_maximized(true);
    api.clear_calls();

    controller.update(&mouse_frame(10.0, 10.0, true));
    controller.update(&mouse_frame(50.0, 50.0, false));

    assert!(!api.calls().iter().any(|c| matches!(c, Call::Move(..))));
    assert!(!controller.is_dragging());
}

#[test]
fn drag_disabled_does_not_move() {
    let (api, hwnd, mut controller, _) = setup();
    controller.set_drag_move(false);

    controller.update(&mouse_frame(10.0, 10.0, true));
    controller.update(&mouse_frame(50.0, 50.0, false));

    assert_eq!(api.window(hwnd).rect.position(), Vec2::new(100.0, 100.0));
}

#[test]
fn touch_on_content_is_claimed_for_dragging() {
    // Arrange
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&touch_frame(100.0, 100.0, TouchPhase::Began));
    controller.end_frame(&touch_frame(100.0, 100.0, TouchPhase::Began), &mut FakeProbe::opaque());

    // Act
    controller.update(&touch_frame(110.0, 90.0, TouchPhase::Moved));
    controller.update(&touch_frame(120.0, 80.0, TouchPhase::Moved));

    // Assert
    assert!(controller.is_on_content());
    assert_eq!(api.window(hwnd).rect.position(), Vec2::new(110.0, 110.0));
}

#[test]
fn touch_off_content_is_not_claimed() {
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&touch_frame(-5.0, 100.0, TouchPhase::Began));
    controller.end_frame(&touch_frame(-5.0, 100.0, TouchPhase::Began), &mut FakeProbe::opaque());

    controller.update(&touch_frame(20.0, 100.0, TouchPhase::Moved));

    assert!(!controller.is_dragging());
    assert_eq!(api.window(hwnd).rect.position(), Vec2::new(100.0, 100.0));
}

// -- file drop ----------------------------------------------------------------

#[test]
fn dropped_files_reach_controller_listener_once() {
    // Arrange
    let (_api, hwnd, mut controller, registry) = setup();
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = received.clone();
    controller.on_files_dropped(move |paths| sink.lock().unwrap().push(paths.to_vec()));
    controller.update(&frame());
    controller.begin_file_drop();
    let paths = vec![PathBuf::from("C:\\a.txt"), PathBuf::from("C:\\b.png")];

    // Act
    registry.dispatch(hwnd, &paths);

    // Assert
    assert_eq!(received.lock().unwrap().as_slice(), &[paths]);
}

#[test]
fn file_drop_survives_reacquisition() {
    // Arrange
    let (api, first, mut controller, registry) = setup();
    controller.update(&frame());
    controller.begin_file_drop();
    let second = api.add_active_window("Game (real)");

    // Act
    controller.update(&frame());

    // Assert
    assert!(!registry.is_registered(first));
    assert!(registry.is_registered(second));
    assert_eq!(registry.len(), 1);
    assert_eq!(api.installed_hooks(), 1);
}

#[test]
fn reset_restores_original_window() {
    let (api, hwnd, mut controller, _) = setup();
    controller.update(&frame());
    controller.set_transparent(true);
    controller.set_topmost(true);

    controller.reset();

    let window = api.window(hwnd);
    assert_eq!(window.style, crate::style::WS_VISIBLE | crate::style::WS_OVERLAPPEDWINDOW);
    assert_eq!(window.ex_style, 0);
    assert!(!controller.is_transparent());
    assert!(!controller.is_topmost());
}
