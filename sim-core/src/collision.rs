//! Containment and repulsion forces.
//!
//! Both are linear springs on penetration depth: a particle closer than
//! `radius` to a wall, or closer than `2 * radius` to another particle, is
//! pushed back in proportion to the overlap, scaled by `bounce`.

use crate::{
    bound::Bound,
    config::Config,
    particle::ParticlePool,
    quadtree::{QuadEntry, QuadTree},
    types::ParticleId,
};
use glam::Vec2;

/// Repulsion between the particle being resolved and one neighbor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub other: ParticleId,
    /// Force on the particle being resolved. The neighbor receives `-push`.
    pub push: Vec2,
}

/// Reusable buffers for neighbor lookups, kept across particles and frames.
#[derive(Debug, Default)]
pub struct NeighborScratch {
    found: Vec<QuadEntry>,
    pub contacts: Vec<Contact>,
}

impl NeighborScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Spring force pushing a particle back inside `bound`.
///
/// For each wall, `d` is the distance from `position` to the wall along its
/// inward normal (negative once the particle is outside). When `d < radius`
/// the wall pushes inward with magnitude `(radius - d) * bounce`.
pub fn boundary_force(position: Vec2, bound: &Bound, cfg: &Config) -> Vec2 {
    let walls = [
        (position.x - bound.x, Vec2::X),
        (position.y - bound.y, Vec2::Y),
        (bound.right() - position.x, Vec2::NEG_X),
        (bound.bottom() - position.y, Vec2::NEG_Y),
    ];

    let mut force = Vec2::ZERO;
    for (d, normal) in walls {
        if d < cfg.radius {
            force += normal * ((d - cfg.radius) * -cfg.bounce);
        }
    }
    force
}

/// Repulsion on a particle at `p` from one at `q`, or `None` when they are
/// at least `cfg.field()` apart.
///
/// Particles closer than `cfg.min_distance` have no usable direction
/// between them; they are pushed apart along `+x` (and the other along
/// `-x`).
pub fn pair_push(p: Vec2, q: Vec2, cfg: &Config) -> Option<Vec2> {
    let delta = p - q;
    let dist = delta.length();
    let field = cfg.field();
    if dist >= field {
        return None;
    }

    let dir = if dist >= cfg.min_distance {
        delta / dist
    } else {
        Vec2::X
    };
    Some(dir * ((dist - field) * (-cfg.bounce / 2.0)))
}

/// Query window that catches every particle within repulsion range of
/// `position`.
pub fn neighbor_window(position: Vec2, cfg: &Config) -> Bound {
    Bound::around(position, cfg.field())
}

/// Collects repulsion contacts between particle `id` and its neighbors in
/// `index`.
///
/// An indexed particle only pairs with neighbors that come after it in
/// iteration order, so each pair between indexed particles is found
/// exactly once per frame. A particle left out of the index (`indexed ==
/// false`) is invisible to everyone else, so it pairs with every neighbor
/// it finds. The index narrows the candidates; distances are measured on
/// the live positions in `pool`, which may already have moved this frame.
///
/// ### Returns
/// The sum of all pushes on `id`. The contacts themselves are left in
/// `scratch.contacts` so the caller can apply the reactions.
pub fn neighbor_force(
    id: ParticleId,
    indexed: bool,
    pool: &ParticlePool,
    index: &QuadTree,
    cfg: &Config,
    scratch: &mut NeighborScratch,
) -> Vec2 {
    let position = pool[id].position;

    scratch.found.clear();
    scratch.contacts.clear();
    index.query_into(&neighbor_window(position, cfg), &mut scratch.found);

    let mut total = Vec2::ZERO;
    for entry in &scratch.found {
        debug_assert!(entry.id < pool.len(), "stale index entry {}", entry.id);
        if entry.id == id || (indexed && entry.id < id) {
            continue;
        }
        if let Some(push) = pair_push(position, pool[entry.id].position, cfg) {
            total += push;
            scratch.contacts.push(Contact {
                other: entry.id,
                push,
            });
        }
    }
    total
}

/// Net force on particle `id`: `external` plus wall containment plus
/// neighbor repulsion.
///
/// See [`neighbor_force`] for `indexed` and for what is left in
/// `scratch.contacts`.
#[allow(clippy::too_many_arguments)]
pub fn collision_force(
    id: ParticleId,
    indexed: bool,
    external: Vec2,
    pool: &ParticlePool,
    index: &QuadTree,
    bound: &Bound,
    cfg: &Config,
    scratch: &mut NeighborScratch,
) -> Vec2 {
    let position = pool[id].position;
    external
        + boundary_force(position, bound, cfg)
        + neighbor_force(id, indexed, pool, index, cfg, scratch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> Bound {
        Bound::from_size(200.0, 100.0)
    }

    #[test]
    fn interior_particle_feels_no_walls() {
        let cfg = Config::default();
        assert_eq!(boundary_force(Vec2::new(100.0, 50.0), &area(), &cfg), Vec2::ZERO);
        // Exactly one radius from a wall is not yet touching it.
        assert_eq!(boundary_force(Vec2::new(6.0, 50.0), &area(), &cfg), Vec2::ZERO);
    }

    #[test]
    fn each_wall_pushes_inward() {
        let cfg = Config::default().with_radius(4.0).with_bounce(0.5);
        let b = area();

        let left = boundary_force(Vec2::new(2.0, 50.0), &b, &cfg);
        let top = boundary_force(Vec2::new(100.0, 2.0), &b, &cfg);
        let right = boundary_force(Vec2::new(198.0, 50.0), &b, &cfg);
        let bottom = boundary_force(Vec2::new(100.0, 98.0), &b, &cfg);

        assert_eq!(left, Vec2::new(1.0, 0.0));
        assert_eq!(top, Vec2::new(0.0, 1.0));
        assert_eq!(right, Vec2::new(-1.0, 0.0));
        assert_eq!(bottom, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn half_radius_overlap_gives_quarter_radius_force() {
        let r = 6.0;
        let cfg = Config::default().with_radius(r).with_bounce(0.5);
        let f = boundary_force(Vec2::new(r / 2.0, 50.0), &area(), &cfg);
        assert!((f - Vec2::new(0.25 * r, 0.0)).length() < 1e-6);
    }

    #[test]
    fn corner_particle_is_pushed_by_two_walls() {
        let cfg = Config::default().with_radius(4.0).with_bounce(0.5);
        let f = boundary_force(Vec2::new(2.0, 2.0), &area(), &cfg);
        assert_eq!(f, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn escaped_particle_is_still_pulled_back() {
        let cfg = Config::default().with_radius(4.0).with_bounce(0.5);
        let f = boundary_force(Vec2::new(-2.0, 50.0), &area(), &cfg);
        assert_eq!(f, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn pair_push_inside_field() {
        let cfg = Config::default().with_radius(6.0).with_bounce(0.4);
        let push = pair_push(Vec2::new(0.0, 0.0), Vec2::new(8.0, 0.0), &cfg);

        // (8 - 12) * (-0.4 / 2) = 0.8, directed away from the neighbor.
        let push = push.unwrap_or(Vec2::ZERO);
        assert!((push - Vec2::new(-0.8, 0.0)).length() < 1e-6);
    }

    #[test]
    fn pair_push_outside_field_is_none() {
        let cfg = Config::default().with_radius(6.0);
        assert_eq!(pair_push(Vec2::ZERO, Vec2::new(12.0, 0.0), &cfg), None);
        assert_eq!(pair_push(Vec2::ZERO, Vec2::new(30.0, 1.0), &cfg), None);
    }

    #[test]
    fn coincident_pair_gets_finite_push() {
        let cfg = Config::default().with_radius(6.0).with_bounce(0.4);
        let push = pair_push(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0), &cfg);
        let push = push.unwrap_or(Vec2::ZERO);
        assert!(push.is_finite());
        assert!((push - Vec2::new(12.0 * 0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn neighbor_force_only_counts_later_particles() {
        let cfg = Config::default().with_radius(6.0).with_bounce(0.4);
        let pool = ParticlePool::from_positions(vec![
            Vec2::new(50.0, 50.0),
            Vec2::new(58.0, 50.0),
            Vec2::new(90.0, 50.0),
        ]);
        let mut index = QuadTree::with_bound(area());
        for (i, p) in pool.positions().enumerate() {
            index.insert(p, i);
        }
        let mut scratch = NeighborScratch::new();

        let f0 = neighbor_force(0, true, &pool, &index, &cfg, &mut scratch);
        assert!((f0 - Vec2::new(-0.8, 0.0)).length() < 1e-6);
        assert_eq!(scratch.contacts.len(), 1);
        assert_eq!(scratch.contacts[0].other, 1);

        // Particle 1 already met particle 0 from the other side.
        let f1 = neighbor_force(1, true, &pool, &index, &cfg, &mut scratch);
        assert_eq!(f1, Vec2::ZERO);
        assert!(scratch.contacts.is_empty());
    }

    #[test]
    fn collision_force_sums_all_terms() {
        let cfg = Config::default().with_radius(4.0).with_bounce(0.5);
        let pool = ParticlePool::from_positions(vec![Vec2::new(2.0, 50.0), Vec2::new(8.0, 50.0)]);
        let mut index = QuadTree::with_bound(area());
        for (i, p) in pool.positions().enumerate() {
            index.insert(p, i);
        }
        let mut scratch = NeighborScratch::new();

        let f = collision_force(
            0,
            true,
            Vec2::new(0.0, 0.1),
            &pool,
            &index,
            &area(),
            &cfg,
            &mut scratch,
        );

        // wall: (4 - 2) * 0.5 = 1 along +x
        // neighbor: (6 - 8) * (-0.25) = 0.5 along -x
        assert!((f - Vec2::new(0.5, 0.1)).length() < 1e-6);
    }

    #[test]
    fn unindexed_particle_pairs_with_earlier_neighbors() {
        let cfg = Config::default().with_radius(6.0).with_bounce(0.4);
        let pool = ParticlePool::from_positions(vec![
            Vec2::new(50.0, 92.0),
            Vec2::new(50.0, 100.5),
        ]);
        // Particle 1 lies past the bottom wall and is not in the index.
        let mut index = QuadTree::with_bound(area());
        assert!(index.insert(pool[0].position, 0));
        assert!(!index.insert(pool[1].position, 1));
        let mut scratch = NeighborScratch::new();

        // Particle 0 cannot see it.
        assert_eq!(neighbor_force(0, true, &pool, &index, &cfg, &mut scratch), Vec2::ZERO);

        // (8.5 - 12) * (-0.2) = 0.7, pushing particle 1 further down.
        let f1 = neighbor_force(1, false, &pool, &index, &cfg, &mut scratch);
        assert!((f1 - Vec2::new(0.0, 0.7)).length() < 1e-5);
        assert_eq!(scratch.contacts.len(), 1);
        assert_eq!(scratch.contacts[0].other, 0);
    }
}
