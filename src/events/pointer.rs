use crate::dom;
use crate::keymap::wheel_delta_px;
use crate::SharedApp;
use tour_core::InputEvent;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn is_button(target: Option<web::EventTarget>) -> bool {
    target
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| el.closest("button").ok().flatten().is_some())
        .unwrap_or(false)
}

pub fn wire_pointerdown(app: SharedApp) {
    let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
        // Overlay buttons have their own handlers.
        if is_button(ev.target()) {
            return;
        }
        let mut app = app.borrow_mut();
        app.backend.resume();
        app.navigator.push_event(InputEvent::PointerDown);
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        _ = wnd.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn wire_wheel(app: SharedApp) {
    let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
        let delta = wheel_delta_px(ev.delta_y(), ev.delta_mode(), dom::viewport_height());
        if delta == 0.0 {
            return;
        }
        // The tour owns scrolling; keep the page still.
        ev.prevent_default();
        app.borrow_mut()
            .navigator
            .push_event(InputEvent::Wheel { delta });
    }) as Box<dyn FnMut(_)>);

    if let Some(wnd) = web::window() {
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(false);
        _ = wnd.add_event_listener_with_callback_and_add_event_listener_options(
            "wheel",
            closure.as_ref().unchecked_ref(),
            &opts,
        );
    }
    closure.forget();
}
