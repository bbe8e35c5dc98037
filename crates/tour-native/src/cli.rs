use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tour_core::{ConstraintMode, NavigationOverrides};

// Frame rates outside this range are clamped; non-finite values fall back to 60.
const MIN_FPS: f32 = 1.0;
const MAX_FPS: f32 = 1000.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Auto,
    Constrained,
}

impl From<ModeArg> for ConstraintMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => ConstraintMode::Auto,
            ModeArg::Constrained => ConstraintMode::PathConstrained,
        }
    }
}

/// Play a tour headlessly: scroll along the path and log what fires.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Tour document (JSON with `waypoints` and `hotspots`).
    #[arg(short, long)]
    pub tour: PathBuf,
    /// Navigation config JSON; defaults are used when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value = "1200")]
    pub ticks: u32,
    #[arg(long, default_value = "60")]
    pub fps: f32,
    /// Wheel delta injected every frame.
    #[arg(short, long, default_value = "1.0")]
    pub wheel: f32,
    #[arg(long)]
    pub trigger_radius: Option<f32>,
    #[arg(short, long)]
    pub mode: Option<ModeArg>,
    #[arg(long)]
    pub free_fly: bool,
    /// Take control at this frame, wander off the path, then scroll back.
    #[arg(long)]
    pub detour_at: Option<u32>,
    /// Print the effective config as JSON and exit.
    #[arg(long)]
    pub dump_config: bool,
}

impl Cli {
    pub fn overrides(&self) -> NavigationOverrides {
        NavigationOverrides {
            scroll_speed: None,
            trigger_radius: self.trigger_radius,
            mode: self.mode.map(ConstraintMode::from),
            free_fly: self.free_fly.then_some(true),
        }
    }

    pub fn frame_dt(&self) -> std::time::Duration {
        let fps = if self.fps.is_finite() {
            self.fps.clamp(MIN_FPS, MAX_FPS)
        } else {
            60.0
        };
        std::time::Duration::from_secs_f32(1.0 / fps)
    }
}
