use anyhow::Context;
use clap::Parser;
use glam::Vec3;
use tour_core::{
    CameraPose, EffectSignal, FrameReport, InputEvent, NavigationConfig, Navigator, TourDocument,
    TriggerEdge,
};

mod backend;
mod cli;

use backend::LoggingBackend;
use cli::Cli;

// Frames spent off the path during `--detour-at`.
const DETOUR_FRAMES: u32 = 30;
const DETOUR_OFFSET: Vec3 = Vec3::new(0.0, 2.0, 3.0);
// Progress this close to the end counts as arrived.
const ARRIVAL_EPSILON: f32 = 1e-3;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!("{e:?}");
        std::process::exit(1);
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<NavigationConfig> {
    let mut config = match &cli.config {
        Some(path) => NavigationConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NavigationConfig::default(),
    };
    let overrides = cli.overrides();
    if !overrides.is_empty() {
        log::info!("[config] applying overrides {overrides:?}");
        config.apply_overrides(&overrides);
    }
    Ok(config)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    if cli.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let document = TourDocument::load(&cli.tour)
        .with_context(|| format!("loading tour {}", cli.tour.display()))?;
    log::info!(
        "[tour] {} waypoints, {} hotspots",
        document.waypoints.len(),
        document.hotspots.len()
    );

    let mut navigator =
        Navigator::new(document.waypoints, config).context("building navigator")?;
    let mut backend = LoggingBackend::new();
    let dt = cli.frame_dt();
    let max_progress = navigator.path().max_progress();

    let mut frames = 0u32;
    for frame in 0..cli.ticks {
        frames = frame + 1;
        drive_input(cli, frame, &mut navigator);
        let report = navigator.tick(dt, &mut backend);
        log_report(frame, &report);

        let arrived = max_progress - report.progress <= ARRIVAL_EPSILON;
        if arrived && report.control.is_path_locked() && !report.handing_back {
            log::info!("[tour] reached the end at frame {frame}");
            break;
        }
    }

    let camera = *navigator.camera();
    log::info!(
        "[tour] stopped after {frames} frames at {:.1}% pos=({:.2},{:.2},{:.2}) sounds started={} live={}",
        navigator.scroll().percent(),
        camera.position.x,
        camera.position.y,
        camera.position.z,
        backend.started,
        backend.live_sounds()
    );
    navigator.shutdown(&mut backend);
    Ok(())
}

fn drive_input(cli: &Cli, frame: u32, navigator: &mut Navigator) {
    let Some(start) = cli.detour_at else {
        navigator.push_event(InputEvent::Wheel { delta: cli.wheel });
        return;
    };
    if frame == start {
        navigator.push_event(InputEvent::PointerDown);
    } else if frame > start && frame < start + DETOUR_FRAMES {
        if navigator.control_state().is_path_locked() {
            // Control was refused (constrained mode); keep scrolling.
            navigator.push_event(InputEvent::Wheel { delta: cli.wheel });
            return;
        }
        let camera = *navigator.camera();
        let step = DETOUR_OFFSET / DETOUR_FRAMES as f32;
        navigator.push_event(InputEvent::FreeCamera(CameraPose::new(
            camera.position + step,
            camera.orientation,
        )));
    } else {
        navigator.push_event(InputEvent::Wheel { delta: cli.wheel });
    }
}

fn log_report(frame: u32, report: &FrameReport) {
    for transition in &report.transitions {
        let edge = match transition.edge {
            TriggerEdge::Enter => "enter",
            TriggerEdge::Exit => "exit",
        };
        log::info!(
            "[trigger] frame {frame}: {edge} waypoint {} at {:.1}%",
            transition.waypoint,
            report.progress_percent
        );
    }
    for signal in &report.signals {
        match signal {
            EffectSignal::InfoShown { id, text } => log::info!("[info] `{id}`: {text}"),
            EffectSignal::InfoCleared => log::info!("[info] cleared"),
            EffectSignal::Unsupported { id, kind } => {
                log::debug!("[effects] skipped `{id}` ({kind})")
            }
            other => log::debug!("[effects] {other:?}"),
        }
    }
    for warning in &report.warnings {
        log::warn!("[effects] {warning}");
    }
}
