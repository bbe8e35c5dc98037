use crate::waypoint::Waypoint;
use glam::Vec3;
use smallvec::SmallVec;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerEdge {
    Enter,
    Exit,
}

/// A waypoint crossing its trigger radius this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerTransition {
    pub waypoint: usize,
    pub edge: TriggerEdge,
}

pub type Transitions = SmallVec<[TriggerTransition; 4]>;

/// Set of waypoints whose trigger zone currently contains the camera.
/// Zones may overlap, so any number of waypoints can be active at once.
#[derive(Clone, Debug)]
pub struct TriggerZoneTracker {
    radius: f32,
    active: BTreeSet<usize>,
}

impl TriggerZoneTracker {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            active: BTreeSet::new(),
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(0.0);
    }

    pub fn is_active(&self, waypoint: usize) -> bool {
        self.active.contains(&waypoint)
    }

    /// Active waypoint indices in ascending order.
    pub fn active(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.active.iter().copied()
    }

    /// Compare the camera against every waypoint and record enter/exit edges,
    /// in waypoint order.
    pub fn evaluate(&mut self, camera: Vec3, waypoints: &[Waypoint]) -> Transitions {
        let mut out = Transitions::new();
        for (i, wp) in waypoints.iter().enumerate() {
            let inside = camera.distance(wp.position) <= self.radius;
            let was_active = self.active.contains(&i);
            if inside && !was_active {
                self.active.insert(i);
                log::debug!("[trigger] enter waypoint {i}");
                out.push(TriggerTransition {
                    waypoint: i,
                    edge: TriggerEdge::Enter,
                });
            } else if !inside && was_active {
                self.active.remove(&i);
                log::debug!("[trigger] exit waypoint {i}");
                out.push(TriggerTransition {
                    waypoint: i,
                    edge: TriggerEdge::Exit,
                });
            }
        }
        out
    }

    /// Forget every active zone. Used when the waypoint list is replaced and
    /// indices no longer refer to the same waypoints.
    pub fn reset(&mut self) {
        self.active.clear();
    }
}
