use crate::constants::*;
use crate::control::{ConstraintMode, HandBackPolicy};
use crate::error::TourError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tuning for a navigation session. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NavigationConfig {
    #[serde(default = "NavigationConfig::default_smoothing")]
    pub smoothing: f32,
    #[serde(default = "NavigationConfig::default_scroll_speed")]
    pub scroll_speed: f32,
    #[serde(default = "NavigationConfig::default_step_fraction")]
    pub step_fraction: f32,
    #[serde(default = "NavigationConfig::default_position_damping")]
    pub position_damping: f32,
    #[serde(default = "NavigationConfig::default_rotation_damping")]
    pub rotation_damping: f32,
    #[serde(default = "NavigationConfig::default_trigger_radius")]
    pub trigger_radius: f32,
    #[serde(default = "NavigationConfig::default_samples_per_segment")]
    pub samples_per_segment: usize,
    #[serde(default = "NavigationConfig::default_handback_duration_secs")]
    pub handback_duration_secs: f32,
    #[serde(default)]
    pub handback_policy: HandBackPolicy,
    #[serde(default)]
    pub initial_mode: ConstraintMode,
    #[serde(default)]
    pub initial_free_fly: bool,
}

/// Command-line style overrides applied on top of a loaded config.
#[derive(Debug, Clone, Default)]
pub struct NavigationOverrides {
    pub scroll_speed: Option<f32>,
    pub trigger_radius: Option<f32>,
    pub mode: Option<ConstraintMode>,
    pub free_fly: Option<bool>,
}

impl NavigationConfig {
    const fn default_smoothing() -> f32 {
        SCROLL_SMOOTHING
    }

    const fn default_scroll_speed() -> f32 {
        SCROLL_SPEED
    }

    const fn default_step_fraction() -> f32 {
        STEP_FRACTION
    }

    const fn default_position_damping() -> f32 {
        POSITION_DAMPING
    }

    const fn default_rotation_damping() -> f32 {
        ROTATION_DAMPING
    }

    const fn default_trigger_radius() -> f32 {
        TRIGGER_RADIUS
    }

    const fn default_samples_per_segment() -> usize {
        SAMPLES_PER_SEGMENT
    }

    const fn default_handback_duration_secs() -> f32 {
        HANDBACK_DURATION_SECS
    }

    pub fn handback_duration(&self) -> Duration {
        Duration::try_from_secs_f32(self.handback_duration_secs.max(0.0))
            .unwrap_or_else(|_| Duration::from_secs_f32(HANDBACK_DURATION_SECS))
    }

    pub fn from_json_str(json: &str) -> Result<Self, TourError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| TourError::parse("navigation config", e))?;
        Ok(cfg.sanitized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TourError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| TourError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| TourError::parse(path.display().to_string(), e))?;
        Ok(cfg.sanitized())
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("[config] {err}; falling back to defaults");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &NavigationOverrides) {
        if let Some(speed) = overrides.scroll_speed {
            self.scroll_speed = speed;
        }
        if let Some(radius) = overrides.trigger_radius {
            self.trigger_radius = radius.max(0.0);
        }
        if let Some(mode) = overrides.mode {
            self.initial_mode = mode;
        }
        if let Some(free_fly) = overrides.free_fly {
            self.initial_free_fly = free_fly;
        }
    }

    // Damping and smoothing factors outside (0, 1] either freeze or overshoot.
    fn sanitized(mut self) -> Self {
        self.smoothing = clamp_factor(self.smoothing, SCROLL_SMOOTHING);
        self.position_damping = clamp_factor(self.position_damping, POSITION_DAMPING);
        self.rotation_damping = clamp_factor(self.rotation_damping, ROTATION_DAMPING);
        self.step_fraction = self.step_fraction.clamp(0.0, 1.0);
        self.trigger_radius = self.trigger_radius.max(0.0);
        self.samples_per_segment = self.samples_per_segment.max(2);
        if !self.handback_duration_secs.is_finite() {
            self.handback_duration_secs = HANDBACK_DURATION_SECS;
        }
        self.handback_duration_secs = self.handback_duration_secs.max(0.0);
        self
    }
}

fn clamp_factor(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value.min(1.0)
    } else {
        log::warn!("[config] factor {value} out of range, using {fallback}");
        fallback
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            smoothing: Self::default_smoothing(),
            scroll_speed: Self::default_scroll_speed(),
            step_fraction: Self::default_step_fraction(),
            position_damping: Self::default_position_damping(),
            rotation_damping: Self::default_rotation_damping(),
            trigger_radius: Self::default_trigger_radius(),
            samples_per_segment: Self::default_samples_per_segment(),
            handback_duration_secs: Self::default_handback_duration_secs(),
            handback_policy: HandBackPolicy::default(),
            initial_mode: ConstraintMode::default(),
            initial_free_fly: false,
        }
    }
}

impl NavigationOverrides {
    pub fn is_empty(&self) -> bool {
        self.scroll_speed.is_none()
            && self.trigger_radius.is_none()
            && self.mode.is_none()
            && self.free_fly.is_none()
    }
}
