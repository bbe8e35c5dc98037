use tour_core::{ConstraintMode, ControlState, LockState};

pub fn progress_label(percent: f32) -> String {
    format!("{:.0}%", percent.clamp(0.0, 100.0))
}

pub fn mode_label(mode: ConstraintMode) -> &'static str {
    match mode {
        ConstraintMode::Auto => "Mode: auto",
        ConstraintMode::PathConstrained => "Mode: on rails",
    }
}

pub fn free_fly_label(free_fly: bool) -> &'static str {
    if free_fly {
        "Free fly: on"
    } else {
        "Free fly: off"
    }
}

/// One-line status for the hint overlay.
pub fn control_hint(state: &ControlState, handing_back: bool) -> &'static str {
    if handing_back {
        return "Returning to the tour…";
    }
    match (state.lock, state.can_acquire()) {
        (LockState::UserControlled, _) => "Free look. Scroll to return to the tour.",
        (LockState::PathLocked, true) => "Scroll to move. Click or press a key to look around.",
        (LockState::PathLocked, false) => "Scroll to move.",
    }
}
