//! Policies that decide how many particles the pool should hold.
//!
//! Controllers never touch the physics. They look at a measurement (frame
//! rate, or a user-chosen ratio), return a [`PoolAdjustment`], and
//! [`apply_adjustment`] carries it out on a [`ParticlePool`].

use crate::{bound::Bound, particle::ParticlePool};
use rand::Rng;
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolAdjustment {
    Grow(usize),
    Shrink(usize),
    Hold,
}

/// Grows the pool while frames are fast and shrinks it when they are slow.
///
/// The decision uses the mean over a rolling window of measured frame
/// rates, so a single slow frame does not drop particles.
#[derive(Clone, Debug)]
pub struct FrameRateController {
    samples: VecDeque<f32>,
    pub window: usize,
    /// Mean frame rate above which particles are added.
    pub grow_above: f32,
    /// Mean frame rate below which particles are removed.
    pub shrink_below: f32,
    /// Particles added or removed per decision.
    pub batch: usize,
}

impl Default for FrameRateController {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(60),
            window: 60,
            grow_above: 55.0,
            shrink_below: 45.0,
            batch: 3,
        }
    }
}

impl FrameRateController {
    /// Records one frame-rate sample and returns the resulting decision.
    ///
    /// Non-finite samples are ignored.
    pub fn observe(&mut self, fps: f32) -> PoolAdjustment {
        if fps.is_finite() {
            self.samples.push_back(fps);
            while self.samples.len() > self.window.max(1) {
                self.samples.pop_front();
            }
        }

        match self.mean() {
            Some(mean) if mean > self.grow_above => PoolAdjustment::Grow(self.batch),
            Some(mean) if mean < self.shrink_below => PoolAdjustment::Shrink(self.batch),
            _ => PoolAdjustment::Hold,
        }
    }

    /// Mean of the current window, or `None` before the first sample.
    pub fn mean(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f32>() / self.samples.len() as f32)
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

/// Steers the pool toward a fixed fraction of `max_particles`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RatioController {
    /// Target fraction in `[0, 1]`; values outside are clamped.
    pub ratio: f32,
    pub max_particles: usize,
    /// Most particles added or removed per decision.
    pub batch: usize,
}

impl RatioController {
    pub fn new(ratio: f32, max_particles: usize) -> Self {
        Self {
            ratio,
            max_particles,
            batch: 3,
        }
    }

    pub fn target(&self) -> usize {
        let ratio = if self.ratio.is_finite() {
            self.ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        (ratio * self.max_particles as f32).round() as usize
    }

    pub fn adjust(&self, current: usize) -> PoolAdjustment {
        let target = self.target();
        let step = self.batch.max(1);
        if current < target {
            PoolAdjustment::Grow((target - current).min(step))
        } else if current > target {
            PoolAdjustment::Shrink((current - target).min(step))
        } else {
            PoolAdjustment::Hold
        }
    }
}

/// Adds particles at random positions in `bound`, or removes the oldest.
///
/// ### Returns
/// The signed change in pool size.
pub fn apply_adjustment(
    pool: &mut ParticlePool,
    adjustment: PoolAdjustment,
    bound: &Bound,
    rng: &mut impl Rng,
) -> isize {
    match adjustment {
        PoolAdjustment::Grow(n) => {
            pool.spawn_random(n, bound, rng);
            n as isize
        }
        PoolAdjustment::Shrink(n) => -(pool.remove_particles(n) as isize),
        PoolAdjustment::Hold => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn frame_rate_controller_follows_mean() {
        let mut ctl = FrameRateController::default();
        assert_eq!(ctl.mean(), None);

        assert_eq!(ctl.observe(60.0), PoolAdjustment::Grow(3));
        assert_eq!(ctl.observe(30.0), PoolAdjustment::Shrink(3));
        // Mean of 60, 30, 60 is 50: inside the dead band.
        assert_eq!(ctl.observe(60.0), PoolAdjustment::Hold);
        assert_eq!(ctl.mean(), Some(50.0));
    }

    #[test]
    fn frame_rate_window_forgets_old_samples() {
        let mut ctl = FrameRateController {
            window: 3,
            ..FrameRateController::default()
        };
        for _ in 0..10 {
            ctl.observe(10.0);
        }
        ctl.observe(60.0);
        ctl.observe(60.0);
        assert_eq!(ctl.observe(60.0), PoolAdjustment::Grow(3));

        ctl.reset();
        assert_eq!(ctl.mean(), None);
    }

    #[test]
    fn frame_rate_ignores_non_finite_samples() {
        let mut ctl = FrameRateController::default();
        assert_eq!(ctl.observe(f32::INFINITY), PoolAdjustment::Hold);
        assert_eq!(ctl.mean(), None);
    }

    #[test]
    fn ratio_controller_moves_in_batches() {
        let ctl = RatioController::new(0.5, 100);
        assert_eq!(ctl.target(), 50);
        assert_eq!(ctl.adjust(0), PoolAdjustment::Grow(3));
        assert_eq!(ctl.adjust(49), PoolAdjustment::Grow(1));
        assert_eq!(ctl.adjust(50), PoolAdjustment::Hold);
        assert_eq!(ctl.adjust(80), PoolAdjustment::Shrink(3));

        assert_eq!(RatioController::new(2.0, 10).target(), 10);
        assert_eq!(RatioController::new(f32::NAN, 10).target(), 0);
    }

    #[test]
    fn apply_adjustment_changes_pool() {
        let bound = Bound::from_size(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(0);
        let mut pool = ParticlePool::new();

        assert_eq!(apply_adjustment(&mut pool, PoolAdjustment::Grow(5), &bound, &mut rng), 5);
        assert_eq!(pool.len(), 5);
        assert_eq!(apply_adjustment(&mut pool, PoolAdjustment::Shrink(8), &bound, &mut rng), -5);
        assert!(pool.is_empty());
        assert_eq!(apply_adjustment(&mut pool, PoolAdjustment::Hold, &bound, &mut rng), 0);
    }
}
