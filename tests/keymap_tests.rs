// Host-side tests for pure keyboard/wheel mapping and overlay text.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod keymap {
    include!("../src/keymap.rs");
}
mod text {
    include!("../src/text.rs");
}

use keymap::*;
use text::*;
use tour_core::{ConstraintMode, ControlState, InputEvent, LockState, StepDirection};

#[test]
fn arrow_and_page_keys_step_along_the_path() {
    for key in ["ArrowDown", "PageDown"] {
        assert_eq!(
            shortcut_for_key(key),
            Some(InputEvent::Step(StepDirection::Forward))
        );
    }
    for key in ["ArrowUp", "PageUp"] {
        assert_eq!(
            shortcut_for_key(key),
            Some(InputEvent::Step(StepDirection::Backward))
        );
    }
}

#[test]
fn digits_jump_to_waypoints() {
    assert_eq!(waypoint_for_digit("1"), Some(0));
    assert_eq!(waypoint_for_digit("9"), Some(8));
    assert_eq!(waypoint_for_digit("0"), None);
    assert_eq!(waypoint_for_digit("12"), None);
    assert_eq!(shortcut_for_key("3"), Some(InputEvent::JumpToWaypoint(2)));
    assert_eq!(shortcut_for_key("Home"), Some(InputEvent::JumpToWaypoint(0)));
}

#[test]
fn mode_toggles_are_case_insensitive() {
    assert_eq!(shortcut_for_key("m"), Some(InputEvent::ToggleMode));
    assert_eq!(shortcut_for_key("M"), Some(InputEvent::ToggleMode));
    assert_eq!(shortcut_for_key("f"), Some(InputEvent::ToggleFreeFly));
    assert_eq!(shortcut_for_key("F"), Some(InputEvent::ToggleFreeFly));
}

#[test]
fn other_keys_request_control() {
    for key in ["w", "a", "Shift", " ", "Escape"] {
        assert_eq!(
            event_for_key(key),
            InputEvent::KeyDown {
                key: key.to_string()
            }
        );
    }
}

#[test]
fn wheel_deltas_are_normalized_to_pixels() {
    assert_eq!(wheel_delta_px(100.0, 0, 800.0), 100.0);
    assert_eq!(wheel_delta_px(3.0, 1, 800.0), 48.0);
    assert_eq!(wheel_delta_px(-1.0, 2, 800.0), -800.0);
    assert_eq!(wheel_delta_px(f64::NAN, 0, 800.0), 0.0);
    assert_eq!(wheel_delta_px(f64::INFINITY, 1, 800.0), 0.0);
}

#[test]
fn overlay_labels() {
    assert_eq!(progress_label(42.4), "42%");
    assert_eq!(progress_label(130.0), "100%");
    assert_eq!(progress_label(-3.0), "0%");
    assert_eq!(mode_label(ConstraintMode::Auto), "Mode: auto");
    assert_eq!(mode_label(ConstraintMode::PathConstrained), "Mode: on rails");
    assert_eq!(free_fly_label(true), "Free fly: on");
}

#[test]
fn control_hint_tracks_lock_state() {
    let mut state = ControlState {
        lock: LockState::PathLocked,
        mode: ConstraintMode::Auto,
        free_fly: false,
    };
    assert!(control_hint(&state, false).contains("look around"));
    state.mode = ConstraintMode::PathConstrained;
    assert_eq!(control_hint(&state, false), "Scroll to move.");
    state.lock = LockState::UserControlled;
    assert!(control_hint(&state, false).starts_with("Free look"));
    assert!(control_hint(&state, true).starts_with("Returning"));
}
