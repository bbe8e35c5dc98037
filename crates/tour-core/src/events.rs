use crate::control::ConstraintMode;
use crate::orientation::CameraPose;
use crate::scroll::StepDirection;
use std::collections::VecDeque;
use std::fmt;

/// Discrete input delivered by a frontend.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown,
    KeyDown { key: String },
    Wheel { delta: f32 },
    Step(StepDirection),
    SetMode(ConstraintMode),
    ToggleMode,
    SetFreeFly(bool),
    ToggleFreeFly,
    JumpToWaypoint(usize),
    /// Camera pose reported by the external free-fly controller.
    FreeCamera(CameraPose),
}

impl fmt::Display for InputEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputEvent::PointerDown => write!(f, "PointerDown"),
            InputEvent::KeyDown { key } => write!(f, "KeyDown key={key}"),
            InputEvent::Wheel { delta } => write!(f, "Wheel delta={delta:.3}"),
            InputEvent::Step(dir) => write!(f, "Step {dir:?}"),
            InputEvent::SetMode(mode) => write!(f, "SetMode {mode:?}"),
            InputEvent::ToggleMode => write!(f, "ToggleMode"),
            InputEvent::SetFreeFly(on) => write!(f, "SetFreeFly {on}"),
            InputEvent::ToggleFreeFly => write!(f, "ToggleFreeFly"),
            InputEvent::JumpToWaypoint(i) => write!(f, "JumpToWaypoint {i}"),
            InputEvent::FreeCamera(pose) => write!(
                f,
                "FreeCamera pos=({:.2},{:.2},{:.2})",
                pose.position.x, pose.position.y, pose.position.z
            ),
        }
    }
}

/// Single-consumer queue drained at the start of each tick, which serializes
/// input handlers with the frame callback.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<InputEvent> {
        self.events.drain(..).collect()
    }
}
