//! DOM ids and frame limits shared by the web frontend.

// Element carrying the tour JSON, inline or via `data-src`.
pub const TOUR_DATA_ID: &str = "tour-data";
pub const TOUR_SRC_ATTR: &str = "data-src";
// Optional inline `NavigationConfig` JSON.
pub const TOUR_CONFIG_ID: &str = "tour-config";

pub const INFO_PANEL_ID: &str = "tour-info";
pub const PROGRESS_ID: &str = "tour-progress";
pub const HINT_ID: &str = "tour-hint";
pub const MODE_ID: &str = "tour-mode";
pub const FREE_FLY_ID: &str = "tour-free-fly";
pub const WARNING_ID: &str = "tour-warning";

pub const BTN_NEXT_ID: &str = "tour-next";
pub const BTN_PREV_ID: &str = "tour-prev";
pub const BTN_MODE_ID: &str = "tour-mode-toggle";
pub const BTN_FREE_FLY_ID: &str = "tour-free-fly-toggle";

// CSS class toggled to show or hide overlay panels.
pub const HIDDEN_CLASS: &str = "hidden";

// Long frames (tab in background) are clamped so easing does not jump.
pub const MAX_FRAME_DT_SECS: f32 = 0.1;

// Warnings stay on screen this long.
pub const WARNING_HOLD_SECS: f32 = 4.0;
