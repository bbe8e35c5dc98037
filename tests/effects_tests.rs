// Host-side tests for interaction effects: audio lifecycle, info slot and
// failure isolation.

mod common;

use common::*;
use fnv::FnvHashSet;
use glam::{Quat, Vec3};
use tour_core::effects::SoundState;
use tour_core::{
    EffectDispatcher, EffectError, EffectSignal, Interaction, InteractionKind, TriggerEdge,
    TriggerZoneTracker, Waypoint,
};

fn waypoint_with(interactions: Vec<Interaction>) -> Waypoint {
    let mut wp = Waypoint::new(Vec3::ZERO, Quat::IDENTITY);
    wp.interactions = interactions;
    wp
}

fn enter(d: &mut EffectDispatcher, wp: &Waypoint, backend: &mut RecordingBackend) -> Vec<EffectSignal> {
    let mut out = Vec::new();
    d.dispatch(TriggerEdge::Enter, wp, backend, &mut out);
    d.poll(backend, &mut out);
    out
}

fn exit(d: &mut EffectDispatcher, wp: &Waypoint, backend: &mut RecordingBackend) -> Vec<EffectSignal> {
    let mut out = Vec::new();
    d.dispatch(TriggerEdge::Exit, wp, backend, &mut out);
    d.poll(backend, &mut out);
    out
}

#[test]
fn repeated_enter_never_creates_a_second_handle() {
    let wp = waypoint_with(vec![audio("theme", plain_audio("theme.mp3", false))]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();

    enter(&mut d, &wp, &mut backend);
    enter(&mut d, &wp, &mut backend);
    assert_eq!(backend.created_for("theme"), 1);
    assert_eq!(backend.played.len(), 1);
    assert_eq!(d.registry().len(), 1);
}

#[test]
fn repeated_enter_while_still_loading_is_a_no_op() {
    let wp = waypoint_with(vec![audio("theme", plain_audio("theme.mp3", false))]);
    let mut backend = RecordingBackend::manual();
    let mut d = EffectDispatcher::new();

    let first = enter(&mut d, &wp, &mut backend);
    assert_eq!(
        first,
        vec![EffectSignal::SoundCreated {
            id: "theme".into()
        }]
    );
    enter(&mut d, &wp, &mut backend);
    assert_eq!(backend.created_for("theme"), 1);
    assert_eq!(
        d.registry().get("theme").map(|s| s.state),
        Some(SoundState::Loading)
    );

    backend.finish_loading();
    let mut out = Vec::new();
    d.poll(&mut backend, &mut out);
    assert_eq!(
        out,
        vec![EffectSignal::SoundStarted {
            id: "theme".into()
        }]
    );
    assert!(backend.is_playing_id("theme"));
}

#[test]
fn sound_without_autoplay_waits_for_a_manual_start() {
    let mut payload = plain_audio("narration.ogg", false);
    payload.autoplay = false;
    let interaction = audio("narration", payload);
    let wp = waypoint_with(vec![interaction.clone()]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();

    enter(&mut d, &wp, &mut backend);
    assert_eq!(backend.created_for("narration"), 1);
    assert!(!backend.is_playing_id("narration"));

    let mut out = Vec::new();
    d.play(&interaction, wp.position, &mut backend, &mut out);
    assert!(backend.is_playing_id("narration"));
    assert_eq!(backend.created_for("narration"), 1);
}

#[test]
fn finished_plain_sound_replays_on_the_same_handle() {
    let wp = waypoint_with(vec![audio("chime", plain_audio("chime.wav", false))]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();

    enter(&mut d, &wp, &mut backend);
    let handle = backend.handle_for("chime");
    exit(&mut d, &wp, &mut backend);
    assert!(backend.is_playing_id("chime"), "no stop-on-exit, keeps playing");

    // Playback ends on its own.
    if let Some(h) = handle {
        tour_core::EffectBackend::stop(&mut backend, h);
    }
    let out = enter(&mut d, &wp, &mut backend);
    assert_eq!(
        out,
        vec![EffectSignal::SoundStarted {
            id: "chime".into()
        }]
    );
    assert_eq!(backend.created_for("chime"), 1);
    assert_eq!(backend.handle_for("chime"), handle);
}

#[test]
fn exit_stops_only_plain_stop_on_exit_sounds() {
    // Camera 0.5 from both zones, then 2.0 away.
    let waypoints = vec![
        Waypoint::new(Vec3::ZERO, Quat::IDENTITY)
            .with_interaction(audio("ambience", spatial_audio("birds.mp3"))),
        Waypoint::new(Vec3::new(0.0, 0.2, 0.0), Quat::IDENTITY)
            .with_interaction(audio("voice", plain_audio("guide.mp3", true))),
    ];
    let mut tracker = TriggerZoneTracker::new(1.0);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    let mut run = |camera: Vec3, backend: &mut RecordingBackend, d: &mut EffectDispatcher| {
        let mut out = Vec::new();
        for t in tracker.evaluate(camera, &waypoints) {
            d.dispatch(t.edge, &waypoints[t.waypoint], backend, &mut out);
        }
        d.poll(backend, &mut out);
        out
    };

    run(Vec3::new(0.5, 0.0, 0.0), &mut backend, &mut d);
    assert!(backend.is_playing_id("ambience"));
    assert!(backend.is_playing_id("voice"));
    assert_eq!(backend.anchors.get("ambience"), Some(&Some(Vec3::ZERO)));
    assert_eq!(backend.anchors.get("voice"), Some(&None));

    let out = run(Vec3::new(2.0, 0.0, 0.0), &mut backend, &mut d);
    assert!(backend.is_playing_id("ambience"));
    assert!(!backend.is_playing_id("voice"));
    assert!(out.contains(&EffectSignal::SoundStopped {
        id: "voice".into()
    }));
    assert!(d.registry().contains("ambience"));
    assert!(!d.registry().contains("voice"));
}

#[test]
fn spatial_sounds_ignore_stop_on_exit() {
    let mut payload = spatial_audio("fountain.mp3");
    payload.stop_on_exit = true;
    let wp = waypoint_with(vec![audio("fountain", payload)]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();

    enter(&mut d, &wp, &mut backend);
    exit(&mut d, &wp, &mut backend);
    assert!(backend.is_playing_id("fountain"));
    assert!(backend.stopped.is_empty());
}

#[test]
fn info_text_follows_the_zone() {
    let wp = waypoint_with(vec![Interaction::info("about", "Built in 1642.")]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();

    let out = enter(&mut d, &wp, &mut backend);
    assert_eq!(d.info_text(), Some("Built in 1642."));
    assert_eq!(
        out,
        vec![EffectSignal::InfoShown {
            id: "about".into(),
            text: "Built in 1642.".into()
        }]
    );
    let out = exit(&mut d, &wp, &mut backend);
    assert_eq!(d.info_text(), None);
    assert_eq!(out, vec![EffectSignal::InfoCleared]);
    assert!(backend.created.is_empty());
}

#[test]
fn later_info_overwrites_the_shared_slot() {
    let a = waypoint_with(vec![Interaction::info("a", "first")]);
    let b = waypoint_with(vec![Interaction::info("b", "second")]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    enter(&mut d, &a, &mut backend);
    enter(&mut d, &b, &mut backend);
    assert_eq!(d.info_text(), Some("second"));
}

#[test]
fn animation_and_custom_interactions_are_reported_unsupported() {
    let wp = waypoint_with(vec![
        Interaction {
            id: "spin".into(),
            kind: InteractionKind::Animation(serde_json::json!({ "clip": "spin" })),
        },
        Interaction {
            id: "hook".into(),
            kind: InteractionKind::Custom(serde_json::Value::Null),
        },
    ]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    let out = enter(&mut d, &wp, &mut backend);
    assert_eq!(
        out,
        vec![
            EffectSignal::Unsupported {
                id: "spin".into(),
                kind: "animation"
            },
            EffectSignal::Unsupported {
                id: "hook".into(),
                kind: "custom"
            },
        ]
    );
    assert!(backend.created.is_empty());
}

#[test]
fn failed_creation_does_not_block_siblings() {
    let wp = waypoint_with(vec![
        audio("broken", plain_audio("missing.mp3", false)),
        Interaction::info("note", "still here"),
        audio("fine", plain_audio("fine.mp3", false)),
    ]);
    let mut backend = RecordingBackend::new();
    backend.fail_create.insert("missing.mp3".into());
    let mut d = EffectDispatcher::new();

    let out = enter(&mut d, &wp, &mut backend);
    assert!(matches!(
        out.first(),
        Some(EffectSignal::Failed {
            error: EffectError::Create { .. },
            ..
        })
    ));
    assert_eq!(d.info_text(), Some("still here"));
    assert!(backend.is_playing_id("fine"));
    assert!(!d.registry().contains("broken"));
}

#[test]
fn load_failure_releases_the_handle() {
    let wp = waypoint_with(vec![audio("bad", plain_audio("corrupt.mp3", false))]);
    let mut backend = RecordingBackend::new();
    backend.fail_load.insert("corrupt.mp3".into());
    let mut d = EffectDispatcher::new();

    let out = enter(&mut d, &wp, &mut backend);
    let handle = backend.handle_for("bad");
    assert!(out.iter().any(|s| matches!(
        s,
        EffectSignal::Failed {
            error: EffectError::Load { .. },
            ..
        }
    )));
    assert!(!d.registry().contains("bad"));
    assert_eq!(backend.released.last().copied(), handle);

    // The next visit tries again.
    backend.fail_load.clear();
    enter(&mut d, &wp, &mut backend);
    assert_eq!(backend.created_for("bad"), 2);
    assert!(backend.is_playing_id("bad"));
}

#[test]
fn manual_stop_releases_regardless_of_exit_policy() {
    let wp = waypoint_with(vec![audio("loop", spatial_audio("loop.mp3"))]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    enter(&mut d, &wp, &mut backend);

    let mut out = Vec::new();
    d.stop("loop", &mut backend, &mut out);
    assert_eq!(
        out,
        vec![EffectSignal::SoundStopped {
            id: "loop".into()
        }]
    );
    assert!(d.registry().is_empty());
    assert_eq!(backend.released.len(), 1);

    out.clear();
    d.stop("loop", &mut backend, &mut out);
    assert!(out.is_empty());
}

#[test]
fn released_before_ready_is_ignored() {
    let wp = waypoint_with(vec![audio("slow", plain_audio("slow.mp3", false))]);
    let mut backend = RecordingBackend::manual();
    let mut d = EffectDispatcher::new();
    enter(&mut d, &wp, &mut backend);

    let mut out = Vec::new();
    d.stop("slow", &mut backend, &mut out);
    backend.finish_loading();
    out.clear();
    d.poll(&mut backend, &mut out);
    assert!(out.is_empty());
    assert!(backend.played.is_empty());
}

#[test]
fn retain_ids_prunes_removed_interactions() {
    let wp = waypoint_with(vec![
        audio("keep", plain_audio("keep.mp3", false)),
        audio("drop", plain_audio("drop.mp3", false)),
        Interaction::info("gone", "old text"),
    ]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    enter(&mut d, &wp, &mut backend);

    let keep: FnvHashSet<&str> = ["keep"].into_iter().collect();
    d.retain_ids(&keep, &mut backend);
    assert!(d.registry().contains("keep"));
    assert!(!d.registry().contains("drop"));
    assert_eq!(d.info_text(), None);
    assert!(!backend.is_playing_id("drop"));
}

#[test]
fn shutdown_releases_everything() {
    let wp = waypoint_with(vec![
        audio("a", spatial_audio("a.mp3")),
        audio("b", plain_audio("b.mp3", false)),
        Interaction::info("i", "text"),
    ]);
    let mut backend = RecordingBackend::new();
    let mut d = EffectDispatcher::new();
    enter(&mut d, &wp, &mut backend);
    d.shutdown(&mut backend);
    assert!(d.registry().is_empty());
    assert_eq!(d.info_text(), None);
    assert_eq!(backend.released.len(), 2);
    assert!(!backend.is_playing_id("a"));
    assert!(!backend.is_playing_id("b"));
}
