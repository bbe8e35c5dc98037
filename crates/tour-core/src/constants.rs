// Navigation tuning defaults shared by the web and native frontends.
// `NavigationConfig` falls back to these when a field is missing.

// Path sampling
pub const SAMPLES_PER_SEGMENT: usize = 10; // dense samples per waypoint-to-waypoint span
pub const CATMULL_ROM_ALPHA: f32 = 0.5; // centripetal parameterization

// Scroll progress smoothing
pub const SCROLL_SMOOTHING: f32 = 0.1; // p += (target - p) * α per tick
pub const SCROLL_SPEED: f32 = 0.05; // progress units per wheel delta unit
pub const STEP_FRACTION: f32 = 0.1; // discrete step = 10% of the path

// Camera easing toward the path pose (per tick)
pub const POSITION_DAMPING: f32 = 0.1;
pub const ROTATION_DAMPING: f32 = 0.05;

// Proximity triggers
pub const TRIGGER_RADIUS: f32 = 1.0; // world units

// Hand-back from free control to the path
pub const HANDBACK_DURATION_SECS: f32 = 1.0;

// Audio payload defaults (mirror WebAudio PannerNode defaults)
pub const AUDIO_VOLUME: f32 = 1.0;
pub const AUDIO_REF_DISTANCE: f32 = 1.0;
pub const AUDIO_MAX_DISTANCE: f32 = 10_000.0;
pub const AUDIO_ROLLOFF_FACTOR: f32 = 1.0;
