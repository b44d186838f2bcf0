/// Identifier for a particle in a [`crate::particle::ParticlePool`].
///
/// This is an index into the pool's contiguous storage, and is only
/// meaningful until the pool is next resized.
pub type ParticleId = usize;

/// Identifier for a node in a [`crate::quadtree::QuadTree`] arena.
pub type QuadNodeId = usize;
