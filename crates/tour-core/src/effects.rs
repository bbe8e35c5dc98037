//! Enter/exit side effects for waypoint interactions.
//!
//! The dispatcher decides *when* a sound starts or stops and what the info
//! overlay shows; an [`EffectBackend`] owns the actual audio resources. Sound
//! creation is fire-and-forget: the backend hands out a handle immediately and
//! reports readiness later through [`EffectBackend::drain_ready`], which the
//! dispatcher folds back into its registry on the next tick.

use crate::error::EffectError;
use crate::orientation::CameraPose;
use crate::triggers::TriggerEdge;
use crate::waypoint::{AudioPayload, Interaction, InteractionKind, Waypoint};
use fnv::{FnvHashMap, FnvHashSet};
use glam::Vec3;

/// Opaque backend handle for one sound instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// Everything a backend needs to create a sound.
#[derive(Clone, Copy, Debug)]
pub struct SoundRequest<'a> {
    pub interaction_id: &'a str,
    pub payload: &'a AudioPayload,
    /// World position for spatial sounds, `None` for plain playback.
    pub anchor: Option<Vec3>,
}

/// Asynchronous load result reported by a backend.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadyNotice {
    pub handle: SoundHandle,
    pub result: Result<(), String>,
}

/// Audio playback seam. Implemented over WebAudio in the browser, by a logging
/// stub in the native player and by a recorder in tests.
pub trait EffectBackend {
    /// Start loading a sound. Must not block.
    fn create_sound(&mut self, request: &SoundRequest<'_>) -> Result<SoundHandle, EffectError>;
    fn play(&mut self, handle: SoundHandle);
    fn stop(&mut self, handle: SoundHandle);
    /// Drop the resource; the handle is dead afterwards.
    fn release(&mut self, handle: SoundHandle);
    fn is_playing(&self, handle: SoundHandle) -> bool;
    /// Load results that arrived since the last call.
    fn drain_ready(&mut self) -> Vec<ReadyNotice>;
    /// Keep the spatial listener on the camera.
    fn update_listener(&mut self, _pose: &CameraPose) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundState {
    Loading,
    Ready,
}

#[derive(Clone, Copy, Debug)]
pub struct LiveSound {
    pub handle: SoundHandle,
    pub state: SoundState,
    pub start_when_ready: bool,
}

/// Interaction id → live sound. At most one handle per id.
#[derive(Debug, Default)]
pub struct ActiveEffectRegistry {
    sounds: FnvHashMap<String, LiveSound>,
}

impl ActiveEffectRegistry {
    pub fn get(&self, id: &str) -> Option<&LiveSound> {
        self.sounds.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sounds.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sounds.keys().map(String::as_str)
    }

    fn id_for(&self, handle: SoundHandle) -> Option<String> {
        self.sounds
            .iter()
            .find(|(_, s)| s.handle == handle)
            .map(|(id, _)| id.clone())
    }
}

/// Observable result of dispatching an interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectSignal {
    SoundCreated { id: String },
    SoundStarted { id: String },
    SoundStopped { id: String },
    InfoShown { id: String, text: String },
    InfoCleared,
    Unsupported { id: String, kind: &'static str },
    Failed { id: String, error: EffectError },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct InfoText {
    id: String,
    text: String,
}

#[derive(Debug, Default)]
pub struct EffectDispatcher {
    registry: ActiveEffectRegistry,
    info: Option<InfoText>,
}

impl EffectDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ActiveEffectRegistry {
        &self.registry
    }

    /// Text in the shared info slot, if any.
    pub fn info_text(&self) -> Option<&str> {
        self.info.as_ref().map(|i| i.text.as_str())
    }

    /// Run every interaction of `waypoint` for one enter/exit edge, in list
    /// order. A failing interaction never stops its siblings.
    pub fn dispatch(
        &mut self,
        edge: TriggerEdge,
        waypoint: &Waypoint,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        for interaction in &waypoint.interactions {
            match edge {
                TriggerEdge::Enter => self.enter(interaction, waypoint.position, backend, out),
                TriggerEdge::Exit => self.exit(interaction, backend, out),
            }
        }
    }

    fn enter(
        &mut self,
        interaction: &Interaction,
        anchor: Vec3,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        let id = interaction.id.as_str();
        match &interaction.kind {
            InteractionKind::Audio(payload) => {
                self.enter_audio(id, payload, anchor, backend, out);
            }
            InteractionKind::Info(info) => {
                self.info = Some(InfoText {
                    id: id.to_string(),
                    text: info.text.clone(),
                });
                out.push(EffectSignal::InfoShown {
                    id: id.to_string(),
                    text: info.text.clone(),
                });
            }
            InteractionKind::Animation(_) | InteractionKind::Custom(_) => {
                let kind = interaction.kind.tag();
                log::info!("[effects] `{kind}` interaction `{id}` is not implemented");
                out.push(EffectSignal::Unsupported {
                    id: id.to_string(),
                    kind,
                });
            }
        }
    }

    fn enter_audio(
        &mut self,
        id: &str,
        payload: &AudioPayload,
        anchor: Vec3,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        if let Some(live) = self.registry.sounds.get_mut(id) {
            match live.state {
                // Still loading; it starts on readiness if autoplay asked for it.
                SoundState::Loading => {}
                SoundState::Ready if backend.is_playing(live.handle) => {}
                SoundState::Ready => {
                    if payload.autoplay {
                        backend.play(live.handle);
                        log::debug!("[audio] restart `{id}`");
                        out.push(EffectSignal::SoundStarted { id: id.to_string() });
                    }
                }
            }
            return;
        }
        self.create_sound(id, payload, anchor, payload.autoplay, backend, out);
    }

    fn create_sound(
        &mut self,
        id: &str,
        payload: &AudioPayload,
        anchor: Vec3,
        start_when_ready: bool,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        let request = SoundRequest {
            interaction_id: id,
            payload,
            anchor: payload.spatial.then_some(anchor),
        };
        match backend.create_sound(&request) {
            Ok(handle) => {
                log::debug!("[audio] created `{id}` from {}", payload.source);
                self.registry.sounds.insert(
                    id.to_string(),
                    LiveSound {
                        handle,
                        state: SoundState::Loading,
                        start_when_ready,
                    },
                );
                out.push(EffectSignal::SoundCreated { id: id.to_string() });
            }
            Err(error) => {
                log::warn!("[audio] {error}");
                out.push(EffectSignal::Failed {
                    id: id.to_string(),
                    error,
                });
            }
        }
    }

    fn exit(
        &mut self,
        interaction: &Interaction,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        match &interaction.kind {
            // Spatial sounds, and plain sounds without stop-on-exit, keep playing.
            InteractionKind::Audio(payload) if payload.stops_on_exit() => {
                if self.stop_and_release(&interaction.id, backend) {
                    out.push(EffectSignal::SoundStopped {
                        id: interaction.id.clone(),
                    });
                }
            }
            InteractionKind::Audio(_) => {}
            InteractionKind::Info(_) => {
                self.info = None;
                out.push(EffectSignal::InfoCleared);
            }
            InteractionKind::Animation(_) | InteractionKind::Custom(_) => {
                out.push(EffectSignal::Unsupported {
                    id: interaction.id.clone(),
                    kind: interaction.kind.tag(),
                });
            }
        }
    }

    /// Fold backend load results into the registry.
    pub fn poll(&mut self, backend: &mut dyn EffectBackend, out: &mut Vec<EffectSignal>) {
        for notice in backend.drain_ready() {
            let Some(id) = self.registry.id_for(notice.handle) else {
                // Released before it finished loading.
                continue;
            };
            match notice.result {
                Ok(()) => {
                    let Some(live) = self.registry.sounds.get_mut(&id) else {
                        continue;
                    };
                    live.state = SoundState::Ready;
                    if live.start_when_ready {
                        live.start_when_ready = false;
                        backend.play(live.handle);
                        log::debug!("[audio] `{id}` ready, playing");
                        out.push(EffectSignal::SoundStarted { id });
                    }
                }
                Err(reason) => {
                    self.registry.sounds.remove(&id);
                    backend.release(notice.handle);
                    let error = EffectError::Load {
                        id: id.clone(),
                        reason,
                    };
                    log::warn!("[audio] {error}");
                    out.push(EffectSignal::Failed { id, error });
                }
            }
        }
    }

    /// Manual start, e.g. for sounds without autoplay.
    pub fn play(
        &mut self,
        interaction: &Interaction,
        anchor: Vec3,
        backend: &mut dyn EffectBackend,
        out: &mut Vec<EffectSignal>,
    ) {
        let InteractionKind::Audio(payload) = &interaction.kind else {
            return;
        };
        let id = interaction.id.as_str();
        match self.registry.sounds.get_mut(id) {
            Some(live) if live.state == SoundState::Loading => live.start_when_ready = true,
            Some(live) => {
                if !backend.is_playing(live.handle) {
                    backend.play(live.handle);
                    out.push(EffectSignal::SoundStarted { id: id.to_string() });
                }
            }
            None => self.create_sound(id, payload, anchor, true, backend, out),
        }
    }

    /// Manual stop; releases the sound regardless of its exit policy.
    pub fn stop(&mut self, id: &str, backend: &mut dyn EffectBackend, out: &mut Vec<EffectSignal>) {
        if self.stop_and_release(id, backend) {
            out.push(EffectSignal::SoundStopped { id: id.to_string() });
        }
    }

    /// Drop effects whose interaction ids are not in `keep`, after the
    /// waypoint list was replaced.
    pub fn retain_ids(&mut self, keep: &FnvHashSet<&str>, backend: &mut dyn EffectBackend) {
        let stale: Vec<String> = self
            .registry
            .ids()
            .filter(|id| !keep.contains(id))
            .map(str::to_string)
            .collect();
        for id in stale {
            log::debug!("[audio] releasing `{id}`, interaction removed");
            self.stop_and_release(&id, backend);
        }
        if let Some(info) = &self.info {
            if !keep.contains(info.id.as_str()) {
                self.info = None;
            }
        }
    }

    /// Stop and release everything, clear the info slot.
    pub fn shutdown(&mut self, backend: &mut dyn EffectBackend) {
        for (_, live) in self.registry.sounds.drain() {
            backend.stop(live.handle);
            backend.release(live.handle);
        }
        self.info = None;
    }

    fn stop_and_release(&mut self, id: &str, backend: &mut dyn EffectBackend) -> bool {
        match self.registry.sounds.remove(id) {
            Some(live) => {
                backend.stop(live.handle);
                backend.release(live.handle);
                log::debug!("[audio] stopped `{id}`");
                true
            }
            None => false,
        }
    }
}
