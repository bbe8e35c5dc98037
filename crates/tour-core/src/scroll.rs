use crate::constants::SCROLL_SMOOTHING;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

impl StepDirection {
    fn sign(self) -> f32 {
        match self {
            StepDirection::Forward => 1.0,
            StepDirection::Backward => -1.0,
        }
    }
}

/// Continuous index into the path samples, eased toward a target each tick.
///
/// Progress approaches the target asymptotically (`p += (target - p) * α`) and
/// never lands on it exactly; callers compare with a tolerance. Both values are
/// clamped to `[0, sample_count - 1]` on every write.
#[derive(Clone, Debug)]
pub struct ScrollState {
    progress: f32,
    target: f32,
    smoothing: f32,
    max: f32,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new(1, SCROLL_SMOOTHING)
    }
}

impl ScrollState {
    pub fn new(sample_count: usize, smoothing: f32) -> Self {
        Self {
            progress: 0.0,
            target: 0.0,
            smoothing,
            max: max_for(sample_count),
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Ease progress one tick toward the target.
    pub fn tick(&mut self) {
        self.progress += (self.target - self.progress) * self.smoothing;
        self.progress = self.clamp(self.progress);
    }

    /// Continuous wheel/drag input.
    pub fn apply_wheel(&mut self, delta: f32, speed: f32) {
        if !delta.is_finite() {
            return;
        }
        self.set_target(self.target + delta * speed);
    }

    /// Discrete step of `fraction` of the whole path.
    pub fn step(&mut self, direction: StepDirection, fraction: f32) {
        self.set_target(self.target + direction.sign() * fraction * self.max);
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = self.clamp(target);
    }

    /// Jump both progress and target, as the hand-back does.
    pub fn set_exact(&mut self, progress: f32) {
        let p = self.clamp(progress);
        self.progress = p;
        self.target = p;
    }

    /// Re-fit to a rebuilt path.
    pub fn resize(&mut self, sample_count: usize) {
        self.max = max_for(sample_count);
        self.progress = self.clamp(self.progress);
        self.target = self.clamp(self.target);
    }

    /// Progress as a percentage of the path, 0 for a single-sample path.
    pub fn percent(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.progress / self.max * 100.0
        }
    }

    #[inline]
    fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return 0.0;
        }
        value.clamp(0.0, self.max)
    }
}

#[inline]
fn max_for(sample_count: usize) -> f32 {
    sample_count.saturating_sub(1) as f32
}
