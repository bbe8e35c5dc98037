use crate::constants::HIDDEN_CLASS;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let closure = wasm_bindgen::closure::Closure::wrap(
            Box::new(move || handler()) as Box<dyn FnMut()>
        );
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    } else {
        log::debug!("[dom] no #{element_id}, button not wired");
    }
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_hidden(document: &web::Document, element_id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(element_id) {
        let cl = el.class_list();
        _ = if hidden {
            cl.add_1(HIDDEN_CLASS)
        } else {
            cl.remove_1(HIDDEN_CLASS)
        };
    }
}

/// Viewport height in CSS pixels, used to scale page-mode wheel deltas.
pub fn viewport_height() -> f64 {
    web::window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(800.0)
}
