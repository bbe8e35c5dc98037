//! Waypoint list → dense sampled curve plus per-waypoint rotation keyframes.

use crate::constants::{CATMULL_ROM_ALPHA, SAMPLES_PER_SEGMENT};
use crate::waypoint::Waypoint;
use glam::{Quat, Vec3};

/// Sampled path and the rotation keyframes it was built with.
///
/// A `TourPath` is immutable once built. Structural edits to the waypoint list
/// build a fresh value that replaces the old one in a single assignment, so a
/// reader never sees samples from one list and keyframes from another.
#[derive(Clone, Debug)]
pub struct TourPath {
    samples: Vec<Vec3>,
    rotations: Vec<Quat>,
    samples_per_segment: usize,
}

impl TourPath {
    pub fn build(waypoints: &[Waypoint], samples_per_segment: usize) -> Self {
        let positions: Vec<Vec3> = waypoints.iter().map(|w| w.position).collect();
        let rotations: Vec<Quat> = waypoints.iter().map(Waypoint::orientation).collect();
        let spp = samples_per_segment.max(2);
        let samples = sample_curve(&positions, spp);
        log::debug!(
            "[path] rebuilt: waypoints={} samples={}",
            waypoints.len(),
            samples.len()
        );
        Self::new(samples, rotations, waypoints.len(), spp)
    }

    pub fn new(
        samples: Vec<Vec3>,
        rotations: Vec<Quat>,
        waypoint_count: usize,
        samples_per_segment: usize,
    ) -> Self {
        assert!(!samples.is_empty(), "path must hold at least one sample");
        assert_eq!(
            rotations.len(),
            waypoint_count,
            "rotation keyframes out of sync with waypoints"
        );
        Self {
            samples,
            rotations,
            samples_per_segment,
        }
    }

    #[inline]
    pub fn samples(&self) -> &[Vec3] {
        &self.samples
    }

    #[inline]
    pub fn rotations(&self) -> &[Quat] {
        &self.rotations
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn waypoint_count(&self) -> usize {
        self.rotations.len()
    }

    /// Upper bound of the progress range, `sample_count - 1`.
    #[inline]
    pub fn max_progress(&self) -> f32 {
        (self.samples.len() - 1) as f32
    }

    pub fn samples_per_segment(&self) -> usize {
        self.samples_per_segment
    }

    /// Progress value at which the curve passes waypoint `index`.
    pub fn waypoint_progress(&self, index: usize) -> Option<f32> {
        let n = self.waypoint_count();
        if index >= n {
            return None;
        }
        if n < 2 {
            return Some(0.0);
        }
        Some(index as f32 * self.max_progress() / (n - 1) as f32)
    }
}

/// Number of dense samples produced for `waypoint_count` waypoints.
pub fn sample_count_for(waypoint_count: usize, samples_per_segment: usize) -> usize {
    if waypoint_count <= 1 {
        1
    } else {
        (waypoint_count - 1) * samples_per_segment.max(2)
    }
}

impl Default for TourPath {
    fn default() -> Self {
        Self::new(
            vec![Vec3::ZERO],
            vec![Quat::IDENTITY],
            1,
            SAMPLES_PER_SEGMENT,
        )
    }
}

fn sample_curve(points: &[Vec3], samples_per_segment: usize) -> Vec<Vec3> {
    match points.len() {
        0 => vec![Vec3::ZERO],
        1 => vec![points[0]],
        n => {
            let count = sample_count_for(n, samples_per_segment);
            let last = (count - 1) as f32;
            (0..count)
                .map(|i| catmull_rom_point(points, i as f32 / last))
                .collect()
        }
    }
}

/// Point on the open centripetal Catmull-Rom spline through `points` at
/// global parameter `t` in [0, 1]. Segments are equally weighted in `t`.
pub fn catmull_rom_point(points: &[Vec3], t: f32) -> Vec3 {
    let n = points.len();
    match n {
        0 => return Vec3::ZERO,
        1 => return points[0],
        _ => {}
    }
    let p = (n - 1) as f32 * t.clamp(0.0, 1.0);
    let mut seg = p.floor() as usize;
    let mut weight = p - seg as f32;
    if seg >= n - 1 {
        seg = n - 2;
        weight = 1.0;
    }

    let p1 = points[seg];
    let p2 = points[seg + 1];
    // Phantom end points mirror the first/last span.
    let p0 = if seg > 0 { points[seg - 1] } else { p1 + (p1 - p2) };
    let p3 = if seg + 2 < n {
        points[seg + 2]
    } else {
        p2 + (p2 - p1)
    };

    let mut dt1 = knot_interval(p1, p2);
    if dt1 < 1e-4 {
        dt1 = 1.0;
    }
    let mut dt0 = knot_interval(p0, p1);
    if dt0 < 1e-4 {
        dt0 = dt1;
    }
    let mut dt2 = knot_interval(p2, p3);
    if dt2 < 1e-4 {
        dt2 = dt1;
    }

    let m1 = ((p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1) * dt1;
    let m2 = ((p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2) * dt1;
    hermite(p1, p2, m1, m2, weight)
}

#[inline]
fn knot_interval(a: Vec3, b: Vec3) -> f32 {
    a.distance(b).powf(CATMULL_ROM_ALPHA)
}

#[inline]
fn hermite(p1: Vec3, p2: Vec3, m1: Vec3, m2: Vec3, t: f32) -> Vec3 {
    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;
    p1 + m1 * t + c2 * (t * t) + c3 * (t * t * t)
}
