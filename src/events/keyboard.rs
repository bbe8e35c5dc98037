use crate::keymap::{event_for_key, shortcut_for_key};
use crate::SharedApp;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn handle_keydown(ev: &web::KeyboardEvent, app: &SharedApp) {
    if ev.repeat() || ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return;
    }
    let key = ev.key();
    if shortcut_for_key(&key).is_some() {
        ev.prevent_default();
    }
    let event = event_for_key(&key);
    log::debug!("[keys] {event}");
    let mut app = app.borrow_mut();
    app.backend.resume();
    app.navigator.push_event(event);
}

pub fn wire_keydown(app: SharedApp) {
    if let Some(window) = web::window() {
        let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
            handle_keydown(&ev, &app);
        }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
