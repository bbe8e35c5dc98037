// Host-side tests for scroll progress smoothing and clamping.

mod common;

use common::approx;
use tour_core::{ScrollState, StepDirection};

fn in_range(s: &ScrollState) -> bool {
    (0.0..=s.max()).contains(&s.progress()) && (0.0..=s.max()).contains(&s.target())
}

#[test]
fn progress_and_target_stay_clamped_for_any_input() {
    let deltas = [
        0.5,
        -3.0,
        1e9,
        -1e9,
        f32::MAX,
        -f32::MAX,
        f32::INFINITY,
        f32::NAN,
        42.0,
    ];
    for count in [1usize, 2, 10, 57] {
        let mut s = ScrollState::new(count, 0.1);
        for &d in &deltas {
            s.apply_wheel(d, 0.05);
            s.tick();
            assert!(in_range(&s), "count={count} delta={d}");
            s.step(StepDirection::Forward, 0.1);
            s.tick();
            assert!(in_range(&s), "count={count} after step forward");
            for _ in 0..25 {
                s.step(StepDirection::Backward, 0.1);
            }
            s.tick();
            assert!(in_range(&s), "count={count} after steps back");
        }
    }
}

#[test]
fn progress_eases_toward_target_without_landing() {
    let mut s = ScrollState::new(10, 0.1);
    s.set_target(9.0);
    s.tick();
    assert!(approx(s.progress(), 0.9, 1e-6));
    for _ in 0..20 {
        s.tick();
    }
    assert!(s.progress() < 9.0);
    for _ in 0..300 {
        s.tick();
    }
    assert!(approx(s.progress(), 9.0, 1e-3));
}

#[test]
fn wheel_moves_target_by_delta_times_speed() {
    let mut s = ScrollState::new(20, 0.1);
    s.apply_wheel(10.0, 0.05);
    assert!(approx(s.target(), 0.5, 1e-6));
    s.apply_wheel(-2.0, 0.05);
    assert!(approx(s.target(), 0.4, 1e-6));
    assert_eq!(s.progress(), 0.0);
}

#[test]
fn step_is_a_fraction_of_the_whole_path() {
    let mut s = ScrollState::new(20, 0.1);
    s.step(StepDirection::Forward, 0.1);
    assert!(approx(s.target(), 1.9, 1e-5));
    s.step(StepDirection::Backward, 0.1);
    s.step(StepDirection::Backward, 0.1);
    assert_eq!(s.target(), 0.0);
}

#[test]
fn single_sample_path_pins_progress_to_zero() {
    let mut s = ScrollState::new(1, 0.1);
    s.set_target(100.0);
    s.apply_wheel(50.0, 1.0);
    s.step(StepDirection::Forward, 0.5);
    s.tick();
    assert_eq!(s.target(), 0.0);
    assert_eq!(s.progress(), 0.0);
    assert_eq!(s.percent(), 0.0);
}

#[test]
fn set_exact_moves_both_values() {
    let mut s = ScrollState::new(11, 0.1);
    s.set_exact(4.25);
    assert_eq!(s.progress(), 4.25);
    assert_eq!(s.target(), 4.25);
    s.set_exact(-5.0);
    assert_eq!(s.progress(), 0.0);
}

#[test]
fn percent_reports_position_along_the_path() {
    let mut s = ScrollState::new(21, 0.1);
    s.set_exact(10.0);
    assert!(approx(s.percent(), 50.0, 1e-4));
    s.set_exact(20.0);
    assert!(approx(s.percent(), 100.0, 1e-4));
}

#[test]
fn resize_reclamps_for_a_shorter_path() {
    let mut s = ScrollState::new(40, 0.1);
    s.set_exact(35.0);
    s.resize(10);
    assert_eq!(s.max(), 9.0);
    assert_eq!(s.progress(), 9.0);
    assert_eq!(s.target(), 9.0);
    s.resize(1);
    assert_eq!(s.progress(), 0.0);
}
