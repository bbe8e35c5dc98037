//! Path-based camera navigation and proximity-triggered interactions for 3D
//! tours.
//!
//! Platform-independent: the web and native frontends feed [`InputEvent`]s
//! into a [`Navigator`], call [`Navigator::tick`] once per frame with an
//! [`EffectBackend`], and apply the returned camera pose.

pub mod config;
pub mod constants;
pub mod control;
pub mod effects;
pub mod error;
pub mod events;
pub mod navigator;
pub mod orientation;
pub mod path;
pub mod scroll;
pub mod triggers;
pub mod waypoint;

pub use config::{NavigationConfig, NavigationOverrides};
pub use control::{ConstraintMode, ControlOutcome, ControlState, HandBackPolicy, LockState};
pub use effects::{
    EffectBackend, EffectDispatcher, EffectSignal, ReadyNotice, SoundHandle, SoundRequest,
};
pub use error::{EffectError, TourError};
pub use events::{EventQueue, InputEvent};
pub use navigator::{FrameReport, Navigator};
pub use orientation::CameraPose;
pub use path::TourPath;
pub use scroll::{ScrollState, StepDirection};
pub use triggers::{TriggerEdge, TriggerTransition, TriggerZoneTracker};
pub use waypoint::{
    ActivationMode, AudioPayload, DistanceModel, Hotspot, InfoPayload, Interaction,
    InteractionKind, TourDocument, Waypoint,
};
