use crate::constants::{BTN_FREE_FLY_ID, BTN_MODE_ID, BTN_NEXT_ID, BTN_PREV_ID};
use crate::dom;
use crate::SharedApp;
use tour_core::{InputEvent, StepDirection};
use web_sys as web;

pub fn wire_buttons(app: &SharedApp, document: &web::Document) {
    let buttons = [
        (BTN_NEXT_ID, InputEvent::Step(StepDirection::Forward)),
        (BTN_PREV_ID, InputEvent::Step(StepDirection::Backward)),
        (BTN_MODE_ID, InputEvent::ToggleMode),
        (BTN_FREE_FLY_ID, InputEvent::ToggleFreeFly),
    ];
    for (id, event) in buttons {
        let app = app.clone();
        dom::add_click_listener(document, id, move || {
            let mut app = app.borrow_mut();
            app.backend.resume();
            app.navigator.push_event(event.clone());
        });
    }
}
