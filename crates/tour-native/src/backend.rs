//! Effect backend for the headless player. Nothing is decoded; sounds become
//! ready on the next poll and playback is only logged.

use std::collections::BTreeMap;
use tour_core::{
    CameraPose, EffectBackend, EffectError, ReadyNotice, SoundHandle, SoundRequest,
};

struct NativeSound {
    id: String,
    source: String,
    spatial: bool,
    playing: bool,
}

#[derive(Default)]
pub struct LoggingBackend {
    next_handle: u64,
    sounds: BTreeMap<u64, NativeSound>,
    ready: Vec<ReadyNotice>,
    pub started: u32,
}

impl LoggingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_sounds(&self) -> usize {
        self.sounds.len()
    }
}

impl EffectBackend for LoggingBackend {
    fn create_sound(&mut self, request: &SoundRequest<'_>) -> Result<SoundHandle, EffectError> {
        let source = request.payload.source.trim();
        if source.is_empty() {
            return Err(EffectError::Create {
                source_ref: request.interaction_id.to_string(),
                reason: "empty source".into(),
            });
        }
        self.next_handle += 1;
        let handle = SoundHandle(self.next_handle);
        self.sounds.insert(
            handle.0,
            NativeSound {
                id: request.interaction_id.to_string(),
                source: source.to_string(),
                spatial: request.anchor.is_some(),
                playing: false,
            },
        );
        self.ready.push(ReadyNotice {
            handle,
            result: Ok(()),
        });
        Ok(handle)
    }

    fn play(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.get_mut(&handle.0) {
            sound.playing = true;
            self.started += 1;
            let kind = if sound.spatial { "spatial" } else { "plain" };
            log::info!("[audio] play `{}` ({kind}) {}", sound.id, sound.source);
        }
    }

    fn stop(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.get_mut(&handle.0) {
            if sound.playing {
                log::info!("[audio] stop `{}`", sound.id);
            }
            sound.playing = false;
        }
    }

    fn release(&mut self, handle: SoundHandle) {
        self.sounds.remove(&handle.0);
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.sounds.get(&handle.0).is_some_and(|s| s.playing)
    }

    fn drain_ready(&mut self) -> Vec<ReadyNotice> {
        std::mem::take(&mut self.ready)
    }

    fn update_listener(&mut self, pose: &CameraPose) {
        let p = pose.position;
        log::trace!("[audio] listener at ({:.2},{:.2},{:.2})", p.x, p.y, p.z);
    }
}
