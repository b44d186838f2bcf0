//! External forces applied to every particle each frame.
//!
//! A [`Forcing`] is evaluated exactly once per particle per frame and must
//! not depend on evaluation order. Any closure
//! `Fn(ParticleId, &Particle) -> Vec2` is a [`Forcing`].

use crate::{particle::Particle, types::ParticleId};
use glam::Vec2;

pub trait Forcing {
    fn force(&self, id: ParticleId, particle: &Particle) -> Vec2;
}

impl<F> Forcing for F
where
    F: Fn(ParticleId, &Particle) -> Vec2,
{
    #[inline]
    fn force(&self, id: ParticleId, particle: &Particle) -> Vec2 {
        self(id, particle)
    }
}

/// No external force.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoForce;

impl Forcing for NoForce {
    #[inline]
    fn force(&self, _id: ParticleId, _particle: &Particle) -> Vec2 {
        Vec2::ZERO
    }
}

/// Uniform pull along an orientation vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gravity {
    /// Orientation vector; `(0, 1)` points down the screen.
    pub direction: Vec2,
    pub strength: f32,
}

impl Gravity {
    /// Straight down, with `y` growing downward.
    pub fn down(strength: f32) -> Self {
        Self {
            direction: Vec2::Y,
            strength,
        }
    }

    /// Gravity following a device accelerometer reading (m/s²).
    ///
    /// The x axis is mirrored because device and screen x axes point in
    /// opposite directions when the device is held upright.
    pub fn from_accelerometer(ax: f32, ay: f32, strength: f32) -> Self {
        Self {
            direction: Vec2::new(-ax / 10.0, ay / 10.0),
            strength,
        }
    }
}

impl Forcing for Gravity {
    #[inline]
    fn force(&self, _id: ParticleId, _particle: &Particle) -> Vec2 {
        self.direction * self.strength
    }
}

/// Gravity plus a constant-magnitude pull toward a pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerAttractor {
    pub gravity: Gravity,
    pub target: Vec2,
    pub strength: f32,
}

impl Forcing for PointerAttractor {
    fn force(&self, id: ParticleId, particle: &Particle) -> Vec2 {
        let pull = (self.target - particle.position).normalize_or_zero() * self.strength;
        self.gravity.force(id, particle) + pull
    }
}
