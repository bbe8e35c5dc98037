mod buttons;
mod keyboard;
mod pointer;

use crate::SharedApp;
use web_sys as web;

pub fn wire_all(app: &SharedApp, document: &web::Document) {
    pointer::wire_pointerdown(app.clone());
    pointer::wire_wheel(app.clone());
    keyboard::wire_keydown(app.clone());
    buttons::wire_buttons(app, document);
}
