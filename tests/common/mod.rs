// Shared fixtures for the host-side tests: a recording effect backend and a
// few tour builders.

#![allow(dead_code)]

use glam::{Quat, Vec3};
use std::collections::{HashMap, HashSet};
use tour_core::{
    AudioPayload, CameraPose, EffectBackend, EffectError, Interaction, NavigationConfig,
    ReadyNotice, SoundHandle, SoundRequest, Waypoint,
};

/// Effect backend that records every call. Sounds load instantly unless
/// `manual_ready` is set, in which case `finish_loading` releases them.
#[derive(Default)]
pub struct RecordingBackend {
    next: u64,
    pub created: Vec<(String, SoundHandle)>,
    pub played: Vec<SoundHandle>,
    pub stopped: Vec<SoundHandle>,
    pub released: Vec<SoundHandle>,
    pub anchors: HashMap<String, Option<Vec3>>,
    pub listener: Option<CameraPose>,
    pub manual_ready: bool,
    pub fail_create: HashSet<String>,
    pub fail_load: HashSet<String>,
    playing: HashSet<SoundHandle>,
    loading: Vec<(SoundHandle, String)>,
    notices: Vec<ReadyNotice>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manual() -> Self {
        Self {
            manual_ready: true,
            ..Self::default()
        }
    }

    pub fn finish_loading(&mut self) {
        for (handle, source) in std::mem::take(&mut self.loading) {
            let notice = self.notice(handle, &source);
            self.notices.push(notice);
        }
    }

    pub fn created_for(&self, id: &str) -> usize {
        self.created.iter().filter(|(i, _)| i == id).count()
    }

    pub fn handle_for(&self, id: &str) -> Option<SoundHandle> {
        self.created
            .iter()
            .rev()
            .find(|(i, _)| i == id)
            .map(|(_, h)| *h)
    }

    pub fn is_playing_id(&self, id: &str) -> bool {
        self.handle_for(id)
            .is_some_and(|h| self.playing.contains(&h))
    }

    fn notice(&self, handle: SoundHandle, source: &str) -> ReadyNotice {
        let result = if self.fail_load.contains(source) {
            Err(format!("cannot decode {source}"))
        } else {
            Ok(())
        };
        ReadyNotice { handle, result }
    }
}

impl EffectBackend for RecordingBackend {
    fn create_sound(&mut self, request: &SoundRequest<'_>) -> Result<SoundHandle, EffectError> {
        let source = request.payload.source.clone();
        if self.fail_create.contains(&source) {
            return Err(EffectError::Create {
                source_ref: source,
                reason: "refused".into(),
            });
        }
        self.next += 1;
        let handle = SoundHandle(self.next);
        self.created
            .push((request.interaction_id.to_string(), handle));
        self.anchors
            .insert(request.interaction_id.to_string(), request.anchor);
        if self.manual_ready {
            self.loading.push((handle, source));
        } else {
            let notice = self.notice(handle, &source);
            self.notices.push(notice);
        }
        Ok(handle)
    }

    fn play(&mut self, handle: SoundHandle) {
        self.played.push(handle);
        self.playing.insert(handle);
    }

    fn stop(&mut self, handle: SoundHandle) {
        self.stopped.push(handle);
        self.playing.remove(&handle);
    }

    fn release(&mut self, handle: SoundHandle) {
        self.released.push(handle);
        self.playing.remove(&handle);
        self.loading.retain(|(h, _)| *h != handle);
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.playing.contains(&handle)
    }

    fn drain_ready(&mut self) -> Vec<ReadyNotice> {
        std::mem::take(&mut self.notices)
    }

    fn update_listener(&mut self, pose: &CameraPose) {
        self.listener = Some(*pose);
    }
}

pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

pub fn vec_close(a: Vec3, b: Vec3, eps: f32) -> bool {
    a.distance(b) <= eps
}

/// Same rotation, either sign.
pub fn quat_close(a: Quat, b: Quat, eps: f32) -> bool {
    1.0 - a.dot(b).abs() <= eps
}

pub fn yaw(rad: f32) -> Quat {
    Quat::from_rotation_y(rad)
}

/// `n` waypoints on the -Z axis, `spacing` apart, starting at the origin.
pub fn straight_waypoints(n: usize, spacing: f32) -> Vec<Waypoint> {
    (0..n)
        .map(|i| Waypoint::new(Vec3::new(0.0, 0.0, -(i as f32) * spacing), Quat::IDENTITY))
        .collect()
}

pub fn spatial_audio(source: &str) -> AudioPayload {
    AudioPayload {
        spatial: true,
        ..AudioPayload::new(source)
    }
}

pub fn plain_audio(source: &str, stop_on_exit: bool) -> AudioPayload {
    AudioPayload {
        stop_on_exit,
        ..AudioPayload::new(source)
    }
}

pub fn audio(id: &str, payload: AudioPayload) -> Interaction {
    Interaction::audio(id, payload)
}

/// Config with both smoothing stages disabled, so the camera sits exactly on
/// the target pose after every tick.
pub fn snappy_config() -> NavigationConfig {
    NavigationConfig {
        smoothing: 1.0,
        position_damping: 1.0,
        rotation_damping: 1.0,
        ..NavigationConfig::default()
    }
}
