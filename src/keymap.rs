use tour_core::{InputEvent, StepDirection};

// Pixels per line when the browser reports wheel deltas in lines.
const WHEEL_LINE_PX: f64 = 16.0;

/// Keys the tour handles itself. Everything else is forwarded to the engine
/// as a plain key press, which asks for free camera control.
#[inline]
pub fn shortcut_for_key(key: &str) -> Option<InputEvent> {
    match key {
        "ArrowDown" | "PageDown" => Some(InputEvent::Step(StepDirection::Forward)),
        "ArrowUp" | "PageUp" => Some(InputEvent::Step(StepDirection::Backward)),
        "Home" => Some(InputEvent::JumpToWaypoint(0)),
        "m" | "M" => Some(InputEvent::ToggleMode),
        "f" | "F" => Some(InputEvent::ToggleFreeFly),
        _ => waypoint_for_digit(key).map(InputEvent::JumpToWaypoint),
    }
}

/// Digit keys 1-9 jump to the first nine waypoints.
#[inline]
pub fn waypoint_for_digit(key: &str) -> Option<usize> {
    match key.as_bytes() {
        [d @ b'1'..=b'9'] => Some((d - b'1') as usize),
        _ => None,
    }
}

pub fn event_for_key(key: &str) -> InputEvent {
    shortcut_for_key(key).unwrap_or_else(|| InputEvent::KeyDown {
        key: key.to_string(),
    })
}

/// Wheel delta in pixels regardless of the browser's delta mode
/// (0 = pixels, 1 = lines, 2 = pages).
pub fn wheel_delta_px(delta_y: f64, delta_mode: u32, page_height: f64) -> f32 {
    let px = match delta_mode {
        1 => delta_y * WHEEL_LINE_PX,
        2 => delta_y * page_height,
        _ => delta_y,
    };
    if px.is_finite() {
        px as f32
    } else {
        0.0
    }
}
