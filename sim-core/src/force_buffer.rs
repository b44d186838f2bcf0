use crate::types::ParticleId;
use glam::Vec2;

/// Per-particle net force accumulated over one frame.
///
/// Entry `i` belongs to the particle with [`ParticleId`] `i`. Pairwise
/// repulsion adds `+push` to one side and `-push` to the other, so the sum
/// over all entries only carries the external and boundary terms.
#[derive(Debug, Default)]
pub struct ForceBuffer {
    force: Vec<Vec2>,
}

impl ForceBuffer {
    /// Creates a zeroed buffer for `len` particles.
    pub fn with_len(len: usize) -> Self {
        Self {
            force: vec![Vec2::ZERO; len],
        }
    }

    /// Resizes to `len` entries and zeroes every entry, even if the length
    /// was already correct.
    pub fn ensure_len(&mut self, len: usize) {
        if self.force.len() != len {
            self.force.resize(len, Vec2::ZERO);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for f in &mut self.force {
            *f = Vec2::ZERO;
        }
    }

    pub fn len(&self) -> usize {
        self.force.len()
    }

    pub fn is_empty(&self) -> bool {
        self.force.is_empty()
    }

    /// ### Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    pub fn add(&mut self, id: ParticleId, force: Vec2) {
        self.force[id] += force;
    }

    #[inline]
    pub fn get(&self, id: ParticleId) -> Vec2 {
        self.force[id]
    }

    /// Sum of every entry.
    pub fn net(&self) -> Vec2 {
        self.force.iter().copied().sum()
    }
}
