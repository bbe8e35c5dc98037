//! The navigation context: one aggregate that owns path, scroll, control,
//! trigger and effect state and advances them once per frame.

use crate::config::NavigationConfig;
use crate::control::{ControlArbiter, ControlOutcome, ControlState, LockState};
use crate::effects::{EffectBackend, EffectDispatcher, EffectSignal};
use crate::error::TourError;
use crate::events::{EventQueue, InputEvent};
use crate::orientation::{target_pose, CameraPose};
use crate::path::TourPath;
use crate::scroll::ScrollState;
use crate::triggers::{Transitions, TriggerEdge, TriggerZoneTracker};
use crate::waypoint::{Interaction, Waypoint};
use fnv::FnvHashSet;
use std::time::Duration;

/// Everything a frontend needs after one tick.
#[derive(Clone, Debug)]
pub struct FrameReport {
    pub pose: CameraPose,
    pub progress: f32,
    pub progress_percent: f32,
    pub active_triggers: Vec<usize>,
    pub transitions: Transitions,
    pub signals: Vec<EffectSignal>,
    pub control: ControlState,
    pub handing_back: bool,
    pub info_text: Option<String>,
    /// Resource failures to surface in the UI.
    pub warnings: Vec<String>,
}

pub struct Navigator {
    config: NavigationConfig,
    waypoints: Vec<Waypoint>,
    path: TourPath,
    scroll: ScrollState,
    control: ControlArbiter,
    triggers: TriggerZoneTracker,
    effects: EffectDispatcher,
    camera: CameraPose,
    queue: EventQueue,
    pending: Vec<EffectSignal>,
}

impl Navigator {
    pub fn new(waypoints: Vec<Waypoint>, config: NavigationConfig) -> Result<Self, TourError> {
        if waypoints.is_empty() {
            return Err(TourError::EmptyTour);
        }
        let path = TourPath::build(&waypoints, config.samples_per_segment);
        let scroll = ScrollState::new(path.sample_count(), config.smoothing);
        let control = ControlArbiter::new(
            config.initial_mode,
            config.initial_free_fly,
            config.handback_policy,
            config.handback_duration(),
        );
        let triggers = TriggerZoneTracker::new(config.trigger_radius);
        let camera = target_pose(0.0, &path);
        log::info!(
            "[nav] ready: waypoints={} samples={} mode={:?}",
            waypoints.len(),
            path.sample_count(),
            config.initial_mode
        );
        Ok(Self {
            config,
            waypoints,
            path,
            scroll,
            control,
            triggers,
            effects: EffectDispatcher::new(),
            camera,
            queue: EventQueue::default(),
            pending: Vec::new(),
        })
    }

    pub fn config(&self) -> &NavigationConfig {
        &self.config
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn path(&self) -> &TourPath {
        &self.path
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn camera(&self) -> &CameraPose {
        &self.camera
    }

    pub fn control_state(&self) -> ControlState {
        self.control.state()
    }

    pub fn is_handing_back(&self) -> bool {
        self.control.is_handing_back()
    }

    pub fn effects(&self) -> &EffectDispatcher {
        &self.effects
    }

    pub fn active_triggers(&self) -> Vec<usize> {
        self.triggers.active().collect()
    }

    /// Replace the waypoint list wholesale and rebuild the path.
    ///
    /// Every active zone is exited against the old list first, so exit
    /// effects run and the next tick re-enters whatever the camera still
    /// occupies. Effects belonging to interactions that no longer exist are
    /// released, and a running hand-back is re-aimed at the new path. An empty
    /// list is rejected and the current tour is kept.
    pub fn set_waypoints(
        &mut self,
        waypoints: Vec<Waypoint>,
        backend: &mut dyn EffectBackend,
    ) -> Result<(), TourError> {
        if waypoints.is_empty() {
            return Err(TourError::EmptyTour);
        }
        for index in self.triggers.active() {
            if let Some(waypoint) = self.waypoints.get(index) {
                self.effects
                    .dispatch(TriggerEdge::Exit, waypoint, backend, &mut self.pending);
            }
        }
        self.triggers.reset();

        let path = TourPath::build(&waypoints, self.config.samples_per_segment);
        self.scroll.resize(path.sample_count());
        self.path = path;
        self.waypoints = waypoints;
        self.control.retarget_hand_back(&self.path, &mut self.scroll);
        let keep: FnvHashSet<&str> = self
            .waypoints
            .iter()
            .flat_map(|w| w.interactions.iter().map(|i| i.id.as_str()))
            .collect();
        self.effects.retain_ids(&keep, backend);
        log::info!(
            "[nav] waypoints replaced: count={} samples={}",
            self.waypoints.len(),
            self.path.sample_count()
        );
        Ok(())
    }

    /// Queue input for the next tick.
    pub fn push_event(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Apply one input event immediately.
    pub fn handle_event(&mut self, event: InputEvent) -> ControlOutcome {
        log::trace!("[nav] {event}");
        match event {
            InputEvent::PointerDown | InputEvent::KeyDown { .. } => self.control.request_control(),
            InputEvent::Wheel { delta } => self.on_wheel(delta),
            InputEvent::Step(direction) => {
                if self.control.follows_path() {
                    self.scroll.step(direction, self.config.step_fraction);
                    ControlOutcome::Unchanged
                } else {
                    ControlOutcome::Ignored
                }
            }
            InputEvent::SetMode(mode) => self.control.set_mode(mode),
            InputEvent::ToggleMode => {
                let mode = self.control.state().mode.toggled();
                self.control.set_mode(mode)
            }
            InputEvent::SetFreeFly(on) => self.control.set_free_fly(on),
            InputEvent::ToggleFreeFly => {
                let on = !self.control.state().free_fly;
                self.control.set_free_fly(on)
            }
            InputEvent::JumpToWaypoint(index) => {
                match self.path.waypoint_progress(index) {
                    Some(progress) if self.control.follows_path() => {
                        self.scroll.set_target(progress);
                        ControlOutcome::Unchanged
                    }
                    _ => ControlOutcome::Ignored,
                }
            }
            InputEvent::FreeCamera(pose) => {
                if self.control.accepts_free_movement() {
                    self.camera = CameraPose::new(pose.position, pose.orientation);
                    ControlOutcome::Unchanged
                } else {
                    ControlOutcome::Ignored
                }
            }
        }
    }

    fn on_wheel(&mut self, delta: f32) -> ControlOutcome {
        if self.control.is_handing_back() {
            log::debug!("[nav] wheel suppressed during hand-back");
            return ControlOutcome::Ignored;
        }
        match self.control.state().lock {
            LockState::UserControlled => {
                self.control
                    .begin_reacquisition(&self.camera, &self.path, &mut self.scroll)
            }
            LockState::PathLocked => {
                self.scroll.apply_wheel(delta, self.config.scroll_speed);
                ControlOutcome::Unchanged
            }
        }
    }

    /// Advance one frame: drain input, move the camera, evaluate trigger zones
    /// and fire their effects.
    pub fn tick(&mut self, dt: Duration, backend: &mut dyn EffectBackend) -> FrameReport {
        for event in self.queue.drain() {
            self.handle_event(event);
        }

        if let Some(pose) = self.control.advance(dt) {
            self.camera = pose;
        } else if self.control.follows_path() {
            self.scroll.tick();
            let target = target_pose(self.scroll.progress(), &self.path);
            self.camera.ease_toward(
                &target,
                self.config.position_damping,
                self.config.rotation_damping,
            );
        }
        backend.update_listener(&self.camera);

        let mut signals = std::mem::take(&mut self.pending);
        let transitions = if self.control.follows_path() {
            self.triggers.evaluate(self.camera.position, &self.waypoints)
        } else {
            Transitions::new()
        };
        for transition in &transitions {
            if let Some(waypoint) = self.waypoints.get(transition.waypoint) {
                self.effects
                    .dispatch(transition.edge, waypoint, backend, &mut signals);
            }
        }
        self.effects.poll(backend, &mut signals);

        let warnings = signals
            .iter()
            .filter_map(|s| match s {
                EffectSignal::Failed { error, .. } => Some(error.to_string()),
                _ => None,
            })
            .collect();

        FrameReport {
            pose: self.camera,
            progress: self.scroll.progress(),
            progress_percent: self.scroll.percent(),
            active_triggers: self.active_triggers(),
            transitions,
            signals,
            control: self.control.state(),
            handing_back: self.control.is_handing_back(),
            info_text: self.effects.info_text().map(str::to_string),
            warnings,
        }
    }

    /// Start an audio interaction by id (the UI play button). Signals show up
    /// in the next frame report.
    pub fn play_interaction(&mut self, id: &str, backend: &mut dyn EffectBackend) -> bool {
        let Some((waypoint, interaction)) = self.find_interaction(id) else {
            return false;
        };
        let anchor = waypoint.position;
        let interaction = interaction.clone();
        self.effects
            .play(&interaction, anchor, backend, &mut self.pending);
        true
    }

    pub fn stop_interaction(&mut self, id: &str, backend: &mut dyn EffectBackend) {
        self.effects.stop(id, backend, &mut self.pending);
    }

    /// Release every live effect; the feature is being torn down.
    pub fn shutdown(&mut self, backend: &mut dyn EffectBackend) {
        self.effects.shutdown(backend);
        self.triggers.reset();
        log::info!("[nav] shut down");
    }

    fn find_interaction(&self, id: &str) -> Option<(&Waypoint, &Interaction)> {
        self.waypoints.iter().find_map(|w| {
            w.interactions
                .iter()
                .find(|i| i.id == id)
                .map(|i| (w, i))
        })
    }
}
