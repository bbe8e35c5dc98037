#![cfg(target_arch = "wasm32")]
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use tour_core::{CameraPose, InputEvent, NavigationConfig, Navigator, TourDocument};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

mod audio;
mod constants;
mod dom;
mod events;
mod frame;
mod keymap;
mod overlay;
mod text;

use audio::WebAudioBackend;
use constants::{TOUR_CONFIG_ID, TOUR_DATA_ID, TOUR_SRC_ATTR};

pub(crate) struct App {
    pub navigator: Navigator,
    pub backend: WebAudioBackend,
    pub running: bool,
}

pub(crate) type SharedApp = Rc<RefCell<App>>;

thread_local! {
    static APP: RefCell<Option<SharedApp>> = const { RefCell::new(None) };
    static POSE_CALLBACK: frame::PoseCallback = Rc::new(RefCell::new(None));
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    let app = APP.with(|slot| slot.borrow().clone())?;
    let mut app = app.borrow_mut();
    Some(f(&mut app))
}

fn js_error(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

async fn fetch_text(window: &web::Window, url: &str) -> anyhow::Result<String> {
    let resp = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_error)?;
    let resp: web::Response = resp.dyn_into().map_err(js_error)?;
    if !resp.ok() {
        anyhow::bail!("GET {url} returned {}", resp.status());
    }
    let text = JsFuture::from(resp.text().map_err(js_error)?)
        .await
        .map_err(js_error)?;
    text.as_string()
        .ok_or_else(|| anyhow::anyhow!("GET {url} returned a non-text body"))
}

async fn load_tour(window: &web::Window, document: &web::Document) -> anyhow::Result<TourDocument> {
    let el = document
        .get_element_by_id(TOUR_DATA_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{TOUR_DATA_ID}"))?;
    let json = match el.get_attribute(TOUR_SRC_ATTR) {
        Some(url) => {
            log::info!("[tour] fetching {url}");
            fetch_text(window, &url).await?
        }
        None => el.text_content().unwrap_or_default(),
    };
    Ok(TourDocument::from_json_str(&json)?)
}

fn load_config(document: &web::Document) -> NavigationConfig {
    let Some(json) = document
        .get_element_by_id(TOUR_CONFIG_ID)
        .and_then(|el| el.text_content())
    else {
        return NavigationConfig::default();
    };
    match NavigationConfig::from_json_str(&json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("[config] {e}; using defaults");
            NavigationConfig::default()
        }
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("tour-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let config = load_config(&document);
    let tour = load_tour(&window, &document).await?;
    log::info!(
        "[tour] {} waypoints, {} hotspots",
        tour.waypoints.len(),
        tour.hotspots.len()
    );
    let navigator = Navigator::new(tour.waypoints, config)?;
    let backend = WebAudioBackend::new().map_err(js_error)?;

    let app = Rc::new(RefCell::new(App {
        navigator,
        backend,
        running: true,
    }));
    APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

    events::wire_all(&app, &document);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        app,
        document,
        pose_callback: POSE_CALLBACK.with(Rc::clone),
        overlay: overlay::OverlayState::default(),
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}

/// Register `fn(Float32Array[px, py, pz, qx, qy, qz, qw])`, called every frame
/// the tour drives the camera.
#[wasm_bindgen]
pub fn set_pose_callback(callback: js_sys::Function) {
    POSE_CALLBACK.with(|slot| *slot.borrow_mut() = Some(callback));
}

/// Camera pose from the page's free-fly controller while the user has control.
#[wasm_bindgen]
pub fn report_free_camera(px: f32, py: f32, pz: f32, qx: f32, qy: f32, qz: f32, qw: f32) {
    let pose = CameraPose::new(
        glam::Vec3::new(px, py, pz),
        glam::Quat::from_xyzw(qx, qy, qz, qw),
    );
    with_app(|app| app.navigator.push_event(InputEvent::FreeCamera(pose)));
}

/// Replace the tour's waypoints, e.g. from an editor preview.
#[wasm_bindgen]
pub fn load_waypoints(json: &str) -> Result<(), JsValue> {
    let tour = TourDocument::from_json_str(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_app(|app| {
        let App {
            navigator, backend, ..
        } = app;
        navigator.set_waypoints(tour.waypoints, backend)
    })
    .ok_or_else(|| JsValue::from_str("tour not started"))?
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn play_interaction(id: &str) -> bool {
    with_app(|app| {
        app.backend.resume();
        let App {
            navigator, backend, ..
        } = app;
        navigator.play_interaction(id, backend)
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn stop_interaction(id: &str) {
    with_app(|app| {
        let App {
            navigator, backend, ..
        } = app;
        navigator.stop_interaction(id, backend);
    });
}

/// Stop all sounds and freeze the tour.
#[wasm_bindgen]
pub fn shutdown() {
    with_app(|app| {
        app.running = false;
        let App {
            navigator, backend, ..
        } = app;
        navigator.shutdown(backend);
    });
}
