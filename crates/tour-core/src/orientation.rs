//! Pose at a progress value, and the camera's eased follow of that pose.

use crate::path::TourPath;
use glam::{Quat, Vec3};

/// Camera position plus unit orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation: renormalize(orientation),
        }
    }

    /// Second smoothing stage: ease toward `target` with independent position
    /// and rotation factors. Runs on top of the scroll smoothing, which is what
    /// gives the camera its trailing lag.
    pub fn ease_toward(&mut self, target: &CameraPose, position_damping: f32, rotation_damping: f32) {
        self.position = self.position.lerp(target.position, position_damping);
        self.orientation = slerp_shortest(self.orientation, target.orientation, rotation_damping);
    }

    /// Straight interpolation between two poses, used by the hand-back tween.
    pub fn interpolate(from: &CameraPose, to: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            position: from.position.lerp(to.position, t),
            orientation: slerp_shortest(from.orientation, to.orientation, t),
        }
    }

    /// Forward vector (-Z in camera space), for audio listener alignment.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }
}

/// Shortest-arc slerp, renormalized.
pub fn slerp_shortest(from: Quat, to: Quat, t: f32) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    renormalize(from.slerp(to, t.clamp(0.0, 1.0)))
}

#[inline]
fn renormalize(q: Quat) -> Quat {
    let len = q.length();
    if len.is_finite() && len > 0.0 {
        q / len
    } else {
        Quat::IDENTITY
    }
}

/// Blended orientation for `progress` over a path of `sample_count` samples.
///
/// The progress fraction is mapped onto waypoint segments and the two keyframes
/// bounding that segment are slerped. Keyframes are per waypoint, not per
/// sample.
pub fn blend_orientation(progress: f32, sample_count: usize, keyframes: &[Quat]) -> Quat {
    let n = keyframes.len();
    match n {
        0 => return Quat::IDENTITY,
        1 => return renormalize(keyframes[0]),
        _ => {}
    }
    let t = if sample_count <= 1 {
        0.0
    } else {
        (progress / (sample_count - 1) as f32).clamp(0.0, 1.0)
    };
    let seg_t = t * (n - 1) as f32;
    let seg_index = (seg_t.floor() as usize).min(n - 2);
    let local_t = seg_t - seg_index as f32;
    let from = keyframes[seg_index];
    let to = keyframes.get(seg_index + 1).copied().unwrap_or(keyframes[n - 1]);
    slerp_shortest(from, to, local_t)
}

/// Linear interpolation between the samples bracketing `progress`.
pub fn interpolate_position(progress: f32, samples: &[Vec3]) -> Vec3 {
    let Some(last) = samples.len().checked_sub(1) else {
        return Vec3::ZERO;
    };
    let p = progress.clamp(0.0, last as f32);
    let lo = p.floor() as usize;
    let hi = (lo + 1).min(last);
    samples[lo].lerp(samples[hi], p - lo as f32)
}

/// Pose the path prescribes at `progress`.
pub fn target_pose(progress: f32, path: &TourPath) -> CameraPose {
    CameraPose {
        position: interpolate_position(progress, path.samples()),
        orientation: blend_orientation(progress, path.sample_count(), path.rotations()),
    }
}
