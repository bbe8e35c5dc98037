use crate::constants::MAX_FRAME_DT_SECS;
use crate::overlay::OverlayState;
use crate::SharedApp;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tour_core::{CameraPose, FrameReport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type PoseCallback = Rc<RefCell<Option<js_sys::Function>>>;

pub struct FrameContext {
    pub app: SharedApp,
    pub document: web::Document,
    pub pose_callback: PoseCallback,
    pub overlay: OverlayState,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_secs = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SECS);
        self.last_instant = now;

        let Some(report) = self.tick(Duration::from_secs_f32(dt_secs)) else {
            return;
        };
        for transition in &report.transitions {
            log::debug!(
                "[trigger] {:?} waypoint {} at {:.1}%",
                transition.edge,
                transition.waypoint,
                report.progress_percent
            );
        }
        for warning in &report.warnings {
            log::warn!("[audio] {warning}");
        }

        // The free-fly controller owns the camera while the user does.
        if report.control.is_path_locked() || report.handing_back {
            self.emit_pose(&report.pose);
        }
        self.overlay.update(&self.document, &report, dt_secs);
    }

    fn tick(&self, dt: Duration) -> Option<FrameReport> {
        let mut app = self.app.borrow_mut();
        let app = &mut *app;
        app.running
            .then(|| app.navigator.tick(dt, &mut app.backend))
    }

    // Called without the app borrowed; the callback may call back into us.
    fn emit_pose(&self, pose: &CameraPose) {
        let Some(callback) = self.pose_callback.borrow().clone() else {
            return;
        };
        let p = pose.position;
        let q = pose.orientation;
        let values = [p.x, p.y, p.z, q.x, q.y, q.z, q.w];
        let array = js_sys::Float32Array::from(&values[..]);
        if let Err(e) = callback.call1(&JsValue::NULL, &array) {
            log::warn!("[frame] pose callback threw: {e:?}");
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(window) = web::window() else {
        return;
    };
    if let Some(closure) = tick.borrow().as_ref() {
        _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}
