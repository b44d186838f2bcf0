use crate::{bound::Bound, types::ParticleId};
use glam::Vec2;
use rand::Rng;
use std::ops::{Index, IndexMut};

/// A single fluid particle.
///
/// Velocity is implicit: it is the difference between `position` and
/// `previous`. `previous` is `None` until the particle has been stepped once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub previous: Option<Vec2>,
}

impl Particle {
    /// A particle at rest at `position` that has never been stepped.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            previous: None,
        }
    }

    /// Displacement over the last step, or zero before the first step.
    pub fn velocity(&self) -> Vec2 {
        self.previous
            .map_or(Vec2::ZERO, |previous| self.position - previous)
    }
}

/// Contiguous particle storage.
///
/// The physics never adds or removes particles; an outside policy does,
/// through [`add_particle`](Self::add_particle) and
/// [`remove_particles`](Self::remove_particles). Removing particles shifts
/// the remaining ids down.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
    pub particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions(positions: Vec<Vec2>) -> Self {
        let particles = positions.into_iter().map(Particle::at).collect();
        Self { particles }
    }

    /// Appends a particle at `position` and returns its id.
    pub fn add_particle(&mut self, position: Vec2) -> ParticleId {
        let id = self.particles.len();
        self.particles.push(Particle::at(position));
        id
    }

    /// Removes up to `count` of the oldest particles.
    ///
    /// ### Returns
    /// How many particles were actually removed.
    pub fn remove_particles(&mut self, count: usize) -> usize {
        let n = count.min(self.particles.len());
        self.particles.drain(..n);
        n
    }

    /// Appends `count` particles at uniformly random positions in `bound`.
    pub fn spawn_random(&mut self, count: usize, bound: &Bound, rng: &mut impl Rng) {
        self.particles.reserve(count);
        for _ in 0..count {
            self.add_particle(bound.random_point(rng));
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.particles.iter().map(|p| p.position)
    }
}

impl Index<ParticleId> for ParticlePool {
    type Output = Particle;

    fn index(&self, id: ParticleId) -> &Particle {
        &self.particles[id]
    }
}

impl IndexMut<ParticleId> for ParticlePool {
    fn index_mut(&mut self, id: ParticleId) -> &mut Particle {
        &mut self.particles[id]
    }
}
