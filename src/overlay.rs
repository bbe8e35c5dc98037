use crate::constants::{
    FREE_FLY_ID, HINT_ID, INFO_PANEL_ID, MODE_ID, PROGRESS_ID, WARNING_HOLD_SECS, WARNING_ID,
};
use crate::dom;
use crate::text;
use tour_core::{ControlState, FrameReport};
use web_sys as web;

/// Last values written to the DOM; only changes are pushed.
#[derive(Default)]
pub struct OverlayState {
    progress: Option<String>,
    info: Option<Option<String>>,
    control: Option<(ControlState, bool)>,
    warning_left: f32,
}

impl OverlayState {
    pub fn update(&mut self, document: &web::Document, report: &FrameReport, dt_secs: f32) {
        let progress = text::progress_label(report.progress_percent);
        if self.progress.as_ref() != Some(&progress) {
            dom::set_text(document, PROGRESS_ID, &progress);
            self.progress = Some(progress);
        }

        if self.info.as_ref() != Some(&report.info_text) {
            match &report.info_text {
                Some(info) => {
                    dom::set_text(document, INFO_PANEL_ID, info);
                    dom::set_hidden(document, INFO_PANEL_ID, false);
                }
                None => dom::set_hidden(document, INFO_PANEL_ID, true),
            }
            self.info = Some(report.info_text.clone());
        }

        let control = (report.control, report.handing_back);
        if self.control != Some(control) {
            let (state, handing_back) = control;
            dom::set_text(document, HINT_ID, text::control_hint(&state, handing_back));
            dom::set_text(document, MODE_ID, text::mode_label(state.mode));
            dom::set_text(document, FREE_FLY_ID, text::free_fly_label(state.free_fly));
            self.control = Some(control);
        }

        self.update_warning(document, &report.warnings, dt_secs);
    }

    fn update_warning(&mut self, document: &web::Document, warnings: &[String], dt_secs: f32) {
        if let Some(last) = warnings.last() {
            dom::set_text(document, WARNING_ID, last);
            dom::set_hidden(document, WARNING_ID, false);
            self.warning_left = WARNING_HOLD_SECS;
        } else if self.warning_left > 0.0 {
            self.warning_left -= dt_secs;
            if self.warning_left <= 0.0 {
                dom::set_hidden(document, WARNING_ID, true);
            }
        }
    }
}
