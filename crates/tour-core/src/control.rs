//! Path-locked vs. user-controlled arbitration and the eased hand-back.

use crate::orientation::{target_pose, CameraPose};
use crate::path::TourPath;
use crate::scroll::ScrollState;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LockState {
    PathLocked,
    UserControlled,
}

/// How strongly the camera is bound to the path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintMode {
    /// Any pointer/key press releases the camera to the user.
    #[default]
    Auto,
    /// The camera stays on the path unless free-fly is enabled.
    PathConstrained,
}

impl ConstraintMode {
    pub fn toggled(self) -> Self {
        match self {
            ConstraintMode::Auto => ConstraintMode::PathConstrained,
            ConstraintMode::PathConstrained => ConstraintMode::Auto,
        }
    }
}

/// Whether a control request may cut a running hand-back short.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandBackPolicy {
    /// Requests are ignored until the tween finishes.
    #[default]
    Atomic,
    /// A granted request cancels the tween where it stands.
    Interruptible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControlState {
    pub lock: LockState,
    pub mode: ConstraintMode,
    pub free_fly: bool,
}

impl ControlState {
    pub fn can_acquire(&self) -> bool {
        match self.mode {
            ConstraintMode::Auto => true,
            ConstraintMode::PathConstrained => self.free_fly,
        }
    }

    pub fn is_path_locked(&self) -> bool {
        self.lock == LockState::PathLocked
    }
}

/// Ease-in/ease-out cubic on [0, 1].
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

/// Fixed-duration eased tween from a free camera pose back onto the path.
#[derive(Clone, Debug)]
pub struct HandBack {
    from: CameraPose,
    to: CameraPose,
    progress: f32,
    elapsed: Duration,
    duration: Duration,
}

impl HandBack {
    pub fn new(from: CameraPose, to: CameraPose, progress: f32, duration: Duration) -> Self {
        Self {
            from,
            to,
            progress,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Path progress this hand-back lands on.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn target(&self) -> &CameraPose {
        &self.to
    }

    pub fn fraction(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Aim at a new landing pose, restarting the tween from wherever the
    /// camera currently is.
    pub fn retarget(&mut self, to: CameraPose, progress: f32) {
        let eased = ease_in_out_cubic(self.fraction());
        self.from = CameraPose::interpolate(&self.from, &self.to, eased);
        self.to = to;
        self.progress = progress;
        self.elapsed = Duration::ZERO;
    }

    /// Advance by `dt` and return the pose to apply this tick.
    pub fn advance(&mut self, dt: Duration) -> CameraPose {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        CameraPose::interpolate(&self.from, &self.to, ease_in_out_cubic(self.fraction()))
    }
}

/// Continuous progress value for a free camera position.
///
/// Finds the nearest sample by squared distance (first occurrence wins ties),
/// then projects the camera onto the neighbouring segments and keeps the closer
/// projection, so the result tracks the segment the camera actually sits
/// beside instead of snapping to an integer sample.
pub fn progress_near(samples: &[Vec3], position: Vec3) -> f32 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mut nearest = 0usize;
    let mut best = f32::MAX;
    for (i, s) in samples.iter().enumerate() {
        let d = s.distance_squared(position);
        if d < best {
            best = d;
            nearest = i;
        }
    }

    let mut result = nearest as f32;
    let mut result_dist = f32::MAX;
    if let Some(next) = samples.get(nearest + 1) {
        let (f, d) = project_onto(samples[nearest], *next, position);
        result = nearest as f32 + f;
        result_dist = d;
    }
    if nearest > 0 {
        let (f, d) = project_onto(samples[nearest - 1], samples[nearest], position);
        if d < result_dist {
            result = (nearest - 1) as f32 + f;
        }
    }
    result
}

// Fraction along a→b of the projection of p (clamped), and the squared
// distance from p to that projected point.
#[inline]
fn project_onto(a: Vec3, b: Vec3, p: Vec3) -> (f32, f32) {
    let seg = b - a;
    let len_sq = seg.length_squared();
    if len_sq <= f32::EPSILON {
        return (0.0, a.distance_squared(p));
    }
    let f = ((p - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    (f, (a + seg * f).distance_squared(p))
}

/// What a control request or toggle did, for logging and UI reflection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlOutcome {
    Granted,
    Ignored,
    AlreadyControlled,
    HandBackStarted,
    HandBackInterrupted,
    ForcedPathLock,
    Unchanged,
}

/// Tracks who drives the camera and runs the hand-back tween.
#[derive(Clone, Debug)]
pub struct ControlArbiter {
    state: ControlState,
    policy: HandBackPolicy,
    duration: Duration,
    hand_back: Option<HandBack>,
}

impl ControlArbiter {
    pub fn new(mode: ConstraintMode, free_fly: bool, policy: HandBackPolicy, duration: Duration) -> Self {
        Self {
            state: ControlState {
                lock: LockState::PathLocked,
                mode,
                free_fly,
            },
            policy,
            duration,
            hand_back: None,
        }
    }

    #[inline]
    pub fn state(&self) -> ControlState {
        self.state
    }

    pub fn is_handing_back(&self) -> bool {
        self.hand_back.is_some()
    }

    pub fn hand_back(&self) -> Option<&HandBack> {
        self.hand_back.as_ref()
    }

    /// Path-follow runs only when locked and no tween owns the camera.
    pub fn follows_path(&self) -> bool {
        self.state.is_path_locked() && self.hand_back.is_none()
    }

    /// Free movement is accepted only while the user holds the camera.
    pub fn accepts_free_movement(&self) -> bool {
        self.state.lock == LockState::UserControlled && self.hand_back.is_none()
    }

    /// Pointer or key press.
    pub fn request_control(&mut self) -> ControlOutcome {
        if !self.state.can_acquire() {
            return ControlOutcome::Ignored;
        }
        if self.hand_back.is_some() {
            return match self.policy {
                HandBackPolicy::Atomic => ControlOutcome::Ignored,
                HandBackPolicy::Interruptible => {
                    self.hand_back = None;
                    self.state.lock = LockState::UserControlled;
                    log::info!("[control] hand-back interrupted by user input");
                    ControlOutcome::HandBackInterrupted
                }
            };
        }
        match self.state.lock {
            LockState::UserControlled => ControlOutcome::AlreadyControlled,
            LockState::PathLocked => {
                self.state.lock = LockState::UserControlled;
                log::info!("[control] user took control (mode={:?})", self.state.mode);
                ControlOutcome::Granted
            }
        }
    }

    /// Wheel input while the user holds the camera: snap scroll state to the
    /// nearest point on the path and start easing the camera back onto it.
    pub fn begin_reacquisition(
        &mut self,
        camera: &CameraPose,
        path: &TourPath,
        scroll: &mut ScrollState,
    ) -> ControlOutcome {
        if self.state.lock != LockState::UserControlled || self.hand_back.is_some() {
            return ControlOutcome::Unchanged;
        }
        let progress = progress_near(path.samples(), camera.position);
        scroll.set_exact(progress);
        let to = target_pose(scroll.progress(), path);
        log::info!(
            "[control] re-acquiring path at progress {:.3} over {:?}",
            scroll.progress(),
            self.duration
        );
        self.hand_back = Some(HandBack::new(*camera, to, scroll.progress(), self.duration));
        ControlOutcome::HandBackStarted
    }

    /// The path was rebuilt under a running hand-back: land on the point of
    /// the new path nearest the old landing spot.
    pub fn retarget_hand_back(&mut self, path: &TourPath, scroll: &mut ScrollState) {
        let Some(hand_back) = self.hand_back.as_mut() else {
            return;
        };
        let progress = progress_near(path.samples(), hand_back.target().position);
        scroll.set_exact(progress);
        let to = target_pose(scroll.progress(), path);
        log::info!(
            "[control] hand-back re-aimed at progress {:.3}",
            scroll.progress()
        );
        hand_back.retarget(to, scroll.progress());
    }

    /// Advance a running hand-back. Returns the pose to apply, if any; the
    /// arbiter re-locks to the path on the tick the tween completes.
    pub fn advance(&mut self, dt: Duration) -> Option<CameraPose> {
        let hand_back = self.hand_back.as_mut()?;
        let pose = hand_back.advance(dt);
        if hand_back.is_finished() {
            self.hand_back = None;
            self.state.lock = LockState::PathLocked;
            log::info!("[control] hand-back complete, path locked");
        }
        Some(pose)
    }

    pub fn set_mode(&mut self, mode: ConstraintMode) -> ControlOutcome {
        self.state.mode = mode;
        self.enforce_constraint()
    }

    pub fn set_free_fly(&mut self, free_fly: bool) -> ControlOutcome {
        self.state.free_fly = free_fly;
        self.enforce_constraint()
    }

    // Constrained without free-fly snaps straight back to the path, no tween.
    fn enforce_constraint(&mut self) -> ControlOutcome {
        if self.state.mode == ConstraintMode::PathConstrained
            && !self.state.free_fly
            && (self.state.lock == LockState::UserControlled || self.hand_back.is_some())
        {
            self.hand_back = None;
            self.state.lock = LockState::PathLocked;
            log::info!("[control] constrained without free-fly, path locked");
            return ControlOutcome::ForcedPathLock;
        }
        ControlOutcome::Unchanged
    }
}
