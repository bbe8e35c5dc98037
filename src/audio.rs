use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;
use tour_core::{
    AudioPayload, CameraPose, DistanceModel, EffectBackend, EffectError, ReadyNotice, SoundHandle,
    SoundRequest,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

type Listener = Closure<dyn FnMut()>;

/// One `<audio>` element routed element -> gain -> [panner] -> destination.
struct WebSound {
    element: web::HtmlAudioElement,
    source: web::MediaElementAudioSourceNode,
    gain: web::GainNode,
    panner: Option<web::PannerNode>,
    // `canplaythrough` and `error` handlers; unregistered on release.
    listeners: [(&'static str, Listener); 2],
}

impl WebSound {
    fn teardown(&self) {
        for (event, listener) in &self.listeners {
            _ = self
                .element
                .remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
        _ = self.element.pause();
        _ = self.source.disconnect();
        _ = self.gain.disconnect();
        if let Some(panner) = &self.panner {
            _ = panner.disconnect();
        }
        _ = self.element.remove_attribute("src");
        self.element.load();
    }
}

/// [`EffectBackend`] over WebAudio. Load results arrive through media element
/// callbacks and are queued until the navigator drains them.
pub struct WebAudioBackend {
    ctx: web::AudioContext,
    next_handle: u64,
    sounds: BTreeMap<u64, WebSound>,
    ready: Rc<RefCell<Vec<ReadyNotice>>>,
}

fn js_err(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

fn distance_model(model: DistanceModel) -> web::DistanceModelType {
    match model {
        DistanceModel::Linear => web::DistanceModelType::Linear,
        DistanceModel::Inverse => web::DistanceModelType::Inverse,
        DistanceModel::Exponential => web::DistanceModelType::Exponential,
    }
}

fn create_panner(
    ctx: &web::AudioContext,
    payload: &AudioPayload,
    anchor: glam::Vec3,
) -> Result<web::PannerNode, JsValue> {
    let panner = web::PannerNode::new(ctx)?;
    panner.set_panning_model(web::PanningModelType::Hrtf);
    panner.set_distance_model(distance_model(payload.distance_model));
    panner.set_ref_distance(payload.ref_distance as f64);
    panner.set_max_distance(payload.max_distance as f64);
    panner.set_rolloff_factor(payload.rolloff_factor as f64);
    panner.position_x().set_value(anchor.x);
    panner.position_y().set_value(anchor.y);
    panner.position_z().set_value(anchor.z);
    Ok(panner)
}

impl WebAudioBackend {
    pub fn new() -> Result<Self, JsValue> {
        let ctx = web::AudioContext::new()?;
        Ok(Self {
            ctx,
            next_handle: 1,
            sounds: BTreeMap::new(),
            ready: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Browsers start the context suspended until a user gesture.
    pub fn resume(&self) {
        if self.ctx.state() == web::AudioContextState::Suspended {
            _ = self.ctx.resume();
        }
    }

    fn build(&self, handle: SoundHandle, request: &SoundRequest<'_>) -> Result<WebSound, JsValue> {
        let payload = request.payload;
        let element = web::HtmlAudioElement::new()?;
        element.set_cross_origin(Some("anonymous"));
        element.set_preload("auto");
        element.set_loop(payload.looping);

        let source = self.ctx.create_media_element_source(&element)?;
        let gain = web::GainNode::new(&self.ctx)?;
        gain.gain().set_value(payload.volume);
        let panner = match self.wire(&source, &gain, request) {
            Ok(panner) => panner,
            Err(e) => {
                _ = source.disconnect();
                _ = gain.disconnect();
                return Err(e);
            }
        };

        let listeners = self.watch_load(handle, &element);
        element.set_src(&payload.source);
        element.load();
        Ok(WebSound {
            element,
            source,
            gain,
            panner,
            listeners,
        })
    }

    fn wire(
        &self,
        source: &web::MediaElementAudioSourceNode,
        gain: &web::GainNode,
        request: &SoundRequest<'_>,
    ) -> Result<Option<web::PannerNode>, JsValue> {
        source.connect_with_audio_node(gain)?;
        let Some(anchor) = request.anchor else {
            gain.connect_with_audio_node(&self.ctx.destination())?;
            return Ok(None);
        };
        let panner = create_panner(&self.ctx, request.payload, anchor)?;
        gain.connect_with_audio_node(&panner)?;
        if let Err(e) = panner.connect_with_audio_node(&self.ctx.destination()) {
            _ = panner.disconnect();
            return Err(e);
        }
        Ok(Some(panner))
    }

    // Report the first of `canplaythrough` / `error`, once.
    fn watch_load(
        &self,
        handle: SoundHandle,
        element: &web::HtmlAudioElement,
    ) -> [(&'static str, Listener); 2] {
        let reported = Rc::new(Cell::new(false));

        let ready = self.ready.clone();
        let done = reported.clone();
        let on_ready = Closure::wrap(Box::new(move || {
            if !done.replace(true) {
                ready.borrow_mut().push(ReadyNotice {
                    handle,
                    result: Ok(()),
                });
            }
        }) as Box<dyn FnMut()>);

        let ready = self.ready.clone();
        let el = element.clone();
        let on_error = Closure::wrap(Box::new(move || {
            if !reported.replace(true) {
                let reason = el
                    .error()
                    .map(|e| format!("media error {}", e.code()))
                    .unwrap_or_else(|| "media error".to_string());
                ready.borrow_mut().push(ReadyNotice {
                    handle,
                    result: Err(reason),
                });
            }
        }) as Box<dyn FnMut()>);

        let listeners = [("canplaythrough", on_ready), ("error", on_error)];
        for (event, listener) in &listeners {
            _ = element.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
        }
        listeners
    }
}

impl EffectBackend for WebAudioBackend {
    fn create_sound(&mut self, request: &SoundRequest<'_>) -> Result<SoundHandle, EffectError> {
        let source = &request.payload.source;
        if source.is_empty() {
            return Err(EffectError::Create {
                source_ref: String::new(),
                reason: "empty source".to_string(),
            });
        }
        let handle = SoundHandle(self.next_handle);
        let sound = self.build(handle, request).map_err(|e| EffectError::Create {
            source_ref: source.clone(),
            reason: js_err(e),
        })?;
        self.next_handle += 1;
        self.sounds.insert(handle.0, sound);
        log::debug!(
            "[audio] loading `{}` from {source} spatial={}",
            request.interaction_id,
            request.anchor.is_some()
        );
        Ok(handle)
    }

    fn play(&mut self, handle: SoundHandle) {
        let Some(sound) = self.sounds.get(&handle.0) else {
            return;
        };
        self.resume();
        if let Err(e) = sound.element.play() {
            log::warn!("[audio] play failed: {}", js_err(e));
        }
    }

    fn stop(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.get(&handle.0) {
            _ = sound.element.pause();
            sound.element.set_current_time(0.0);
        }
    }

    fn release(&mut self, handle: SoundHandle) {
        if let Some(sound) = self.sounds.remove(&handle.0) {
            sound.teardown();
        }
    }

    fn is_playing(&self, handle: SoundHandle) -> bool {
        self.sounds
            .get(&handle.0)
            .map(|s| !s.element.paused() && !s.element.ended())
            .unwrap_or(false)
    }

    fn drain_ready(&mut self) -> Vec<ReadyNotice> {
        std::mem::take(&mut *self.ready.borrow_mut())
    }

    #[allow(deprecated)]
    fn update_listener(&mut self, pose: &CameraPose) {
        let listener = self.ctx.listener();
        let p = pose.position;
        let f = pose.forward();
        let u = pose.up();
        listener.set_position(p.x as f64, p.y as f64, p.z as f64);
        listener.set_orientation(
            f.x as f64, f.y as f64, f.z as f64, u.x as f64, u.y as f64, u.z as f64,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_core::AudioPayload;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    fn fire(element: &web::HtmlAudioElement, event: &str) {
        if let Ok(ev) = web::Event::new(event) {
            _ = element.dispatch_event(&ev);
        }
    }

    fn create(backend: &mut WebAudioBackend, payload: &AudioPayload) -> SoundHandle {
        let request = SoundRequest {
            interaction_id: "narration",
            payload,
            anchor: None,
        };
        match backend.create_sound(&request) {
            Ok(handle) => handle,
            Err(e) => panic!("create_sound: {e}"),
        }
    }

    #[wasm_bindgen_test]
    fn readiness_is_reported_once() {
        let Ok(mut backend) = WebAudioBackend::new() else {
            panic!("no AudioContext");
        };
        let payload = AudioPayload::new("data:,");
        let handle = create(&mut backend, &payload);
        let element = backend.sounds[&handle.0].element.clone();

        fire(&element, "canplaythrough");
        fire(&element, "error");
        assert_eq!(
            backend.drain_ready(),
            vec![ReadyNotice {
                handle,
                result: Ok(())
            }]
        );
    }

    #[wasm_bindgen_test]
    fn released_sounds_stop_listening() {
        let Ok(mut backend) = WebAudioBackend::new() else {
            panic!("no AudioContext");
        };
        let payload = AudioPayload::new("data:,");
        let handle = create(&mut backend, &payload);
        let element = backend.sounds[&handle.0].element.clone();

        backend.release(handle);
        assert!(backend.sounds.is_empty());
        fire(&element, "canplaythrough");
        fire(&element, "error");
        assert!(backend.drain_ready().is_empty());
        assert!(!backend.is_playing(handle));
    }

    #[wasm_bindgen_test]
    fn failed_creation_registers_nothing() {
        let Ok(mut backend) = WebAudioBackend::new() else {
            panic!("no AudioContext");
        };
        let payload = AudioPayload::new("");
        let request = SoundRequest {
            interaction_id: "silent",
            payload: &payload,
            anchor: None,
        };
        assert!(backend.create_sound(&request).is_err());
        assert!(backend.sounds.is_empty());
    }
}
