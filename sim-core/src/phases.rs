//! Per-frame update pipeline for the particle fluid.
//!
//! A frame runs:
//! 1. [`rebuild_index`] — reset the quadtree to the simulation bound,
//!    insert every particle's current position and flag the ones outside.
//! 2. Force and integration, depending on [`PairResolution`]:
//!    - [`accumulate_forces`] then [`integrate_all`] (deferred), or
//!    - [`immediate_pass`], which resolves and integrates particle by
//!      particle.
//!
//! [`frame_step`] runs the whole thing. Afterwards the index still holds
//! the positions from before the step until the next rebuild.

use crate::{
    bound::Bound,
    collision::{NeighborScratch, collision_force},
    config::{Config, PairResolution},
    force_buffer::ForceBuffer,
    forcing::Forcing,
    motion::integrate,
    particle::ParticlePool,
    quadtree::QuadTree,
    types::ParticleId,
};

/// Counters describing one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Particles inserted into the index.
    pub indexed: usize,
    /// Particles outside the bound, left out of the index this frame.
    pub dropped: usize,
    /// Particle pairs within repulsion range.
    pub pairs: usize,
}

/// Buffers reused from frame to frame.
#[derive(Debug, Default)]
pub struct FrameScratch {
    pub forces: ForceBuffer,
    pub neighbors: NeighborScratch,
    /// `unindexed[id]` is set when particle `id` was dropped by the last
    /// [`rebuild_index`].
    pub unindexed: Vec<bool>,
}

impl FrameScratch {
    /// Whether particle `id` made it into the index. Ids the last rebuild
    /// never saw count as indexed.
    pub fn is_indexed(&self, id: ParticleId) -> bool {
        !self.unindexed.get(id).copied().unwrap_or(false)
    }
}

/// Rebuilds `index` from scratch over `bound`.
///
/// Particles outside `bound` cannot be inserted. They are flagged in
/// `unindexed` so they can look up their neighbors themselves, and they
/// still feel the walls.
///
/// ### Returns
/// Stats with `indexed` and `dropped` filled in; `pairs` is zero.
pub fn rebuild_index(
    index: &mut QuadTree,
    pool: &ParticlePool,
    bound: Bound,
    cfg: &Config,
    unindexed: &mut Vec<bool>,
) -> FrameStats {
    index.set_limits(cfg.capacity, cfg.max_depth);
    index.reset(bound);
    unindexed.clear();
    unindexed.reserve(pool.len());

    let mut dropped = 0;
    for (id, position) in pool.positions().enumerate() {
        let missed = !index.insert(position, id);
        dropped += usize::from(missed);
        unindexed.push(missed);
    }
    if dropped > 0 {
        log::debug!("{dropped} of {} particles outside {bound:?}", pool.len());
    }
    FrameStats {
        indexed: pool.len() - dropped,
        dropped,
        pairs: 0,
    }
}

/// Computes every particle's net force into `scratch.forces` without moving
/// anything.
///
/// Each pair within range is found once; the particle that finds it gets
/// `+push` and the other `-push`.
///
/// ### Returns
/// Number of pairs found.
pub fn accumulate_forces(
    pool: &ParticlePool,
    index: &QuadTree,
    bound: &Bound,
    cfg: &Config,
    forcing: &impl Forcing,
    scratch: &mut FrameScratch,
) -> usize {
    scratch.forces.ensure_len(pool.len());

    let mut pairs = 0;
    for (id, particle) in pool.iter().enumerate() {
        let external = forcing.force(id, particle);
        let force = collision_force(
            id,
            scratch.is_indexed(id),
            external,
            pool,
            index,
            bound,
            cfg,
            &mut scratch.neighbors,
        );
        scratch.forces.add(id, force);

        for contact in &scratch.neighbors.contacts {
            scratch.forces.add(contact.other, -contact.push);
        }
        pairs += scratch.neighbors.contacts.len();
    }
    pairs
}

/// Integrates every particle with its buffered force.
///
/// ### Panics
/// Panics if `forces` is shorter than `pool`.
pub fn integrate_all(pool: &mut ParticlePool, forces: &ForceBuffer, cfg: &Config) {
    for (id, particle) in pool.particles.iter_mut().enumerate() {
        integrate(particle, forces.get(id), cfg);
    }
}

/// Resolves and integrates particles one at a time, in id order.
///
/// The reaction of each push is subtracted straight from the neighbor's
/// position, so a particle processed later starts from a position already
/// nudged by earlier ones.
///
/// ### Returns
/// Number of pairs found.
pub fn immediate_pass(
    pool: &mut ParticlePool,
    index: &QuadTree,
    bound: &Bound,
    cfg: &Config,
    forcing: &impl Forcing,
    scratch: &mut FrameScratch,
) -> usize {
    let mut pairs = 0;
    for id in 0..pool.len() {
        let external = forcing.force(id, &pool[id]);
        let indexed = scratch.is_indexed(id);
        let neighbors = &mut scratch.neighbors;
        let force = collision_force(id, indexed, external, pool, index, bound, cfg, neighbors);

        for contact in &neighbors.contacts {
            pool[contact.other].position -= contact.push;
        }
        pairs += neighbors.contacts.len();

        integrate(&mut pool[id], force, cfg);
    }
    pairs
}

/// Advances every particle in `pool` by one frame.
///
/// ### Parameters
/// - `pool` - Particles to move in place.
/// - `index` - Rebuilt here; left holding this frame's pre-step positions.
/// - `bound` - Simulation area: both the walls and the index root.
/// - `cfg` - Physics parameters and pair resolution mode.
/// - `forcing` - External force, evaluated once per particle.
/// - `scratch` - Reused buffers.
pub fn frame_step(
    pool: &mut ParticlePool,
    index: &mut QuadTree,
    bound: Bound,
    cfg: &Config,
    forcing: &impl Forcing,
    scratch: &mut FrameScratch,
) -> FrameStats {
    let mut stats = rebuild_index(index, pool, bound, cfg, &mut scratch.unindexed);

    stats.pairs = match cfg.resolution {
        PairResolution::Deferred => {
            let pairs = accumulate_forces(pool, index, &bound, cfg, forcing, scratch);
            integrate_all(pool, &scratch.forces, cfg);
            pairs
        }
        PairResolution::Immediate => immediate_pass(pool, index, &bound, cfg, forcing, scratch),
    };

    log::trace!(
        "frame: {} indexed, {} dropped, {} pairs",
        stats.indexed,
        stats.dropped,
        stats.pairs
    );
    stats
}
