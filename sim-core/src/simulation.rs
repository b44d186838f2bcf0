use crate::{
    bound::Bound,
    config::Config,
    error::{Error, Result},
    forcing::Forcing,
    particle::ParticlePool,
    phases::{self, FrameScratch, FrameStats},
    quadtree::QuadTree,
};
use rand::Rng;

/// A particle fluid confined to a rectangular area.
///
/// Owns the particle pool, the quadtree and the scratch buffers, and runs
/// [`phases::frame_step`] on [`step`](Self::step).
#[derive(Debug)]
pub struct Simulation {
    pool: ParticlePool,
    index: QuadTree,
    scratch: FrameScratch,
    cfg: Config,
    bound: Bound,
    frame: u64,
    last_stats: FrameStats,
}

impl Simulation {
    /// Creates an empty simulation.
    ///
    /// ### Errors
    /// - [`Error::DegenerateBound`] if `bound` has no area.
    /// - [`Error::InvalidParam`] if `cfg` fails [`Config::validate`].
    pub fn new(bound: Bound, cfg: Config) -> Result<Self> {
        check_bound(&bound)?;
        cfg.validate()?;
        log::debug!("new simulation over {bound:?} with {cfg:?}");

        Ok(Self {
            pool: ParticlePool::new(),
            index: QuadTree::new(bound, cfg.capacity, cfg.max_depth),
            scratch: FrameScratch::default(),
            cfg,
            bound,
            frame: 0,
            last_stats: FrameStats::default(),
        })
    }

    /// Creates a simulation with `count` particles at random positions.
    pub fn with_random_particles(
        bound: Bound,
        cfg: Config,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        let mut sim = Self::new(bound, cfg)?;
        sim.pool.spawn_random(count, &bound, rng);
        Ok(sim)
    }

    /// Advances one frame under `forcing`.
    pub fn step(&mut self, forcing: &impl Forcing) -> FrameStats {
        self.last_stats = phases::frame_step(
            &mut self.pool,
            &mut self.index,
            self.bound,
            &self.cfg,
            forcing,
            &mut self.scratch,
        );
        self.frame += 1;
        self.last_stats
    }

    /// Moves the walls. Particles outside the new bound are pushed back in
    /// over the following frames.
    pub fn resize(&mut self, bound: Bound) -> Result<()> {
        check_bound(&bound)?;
        if bound != self.bound {
            log::debug!("resizing simulation to {bound:?}");
            self.bound = bound;
        }
        Ok(())
    }

    /// Replaces the physics parameters after validating them.
    pub fn set_config(&mut self, cfg: Config) -> Result<()> {
        cfg.validate()?;
        if cfg != self.cfg {
            log::debug!("config changed: {cfg:?}");
            self.cfg = cfg;
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn bound(&self) -> Bound {
        self.bound
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.pool
    }

    /// Mutable access for pool size policies and manual spawning.
    pub fn particles_mut(&mut self) -> &mut ParticlePool {
        &mut self.pool
    }

    /// The quadtree as of the last frame (pre-step positions).
    pub fn index(&self) -> &QuadTree {
        &self.index
    }

    /// Number of frames stepped so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }
}

fn check_bound(bound: &Bound) -> Result<()> {
    let ok = [bound.x, bound.y, bound.width, bound.height]
        .iter()
        .all(|v| v.is_finite())
        && bound.width > 0.0
        && bound.height > 0.0;
    if ok {
        Ok(())
    } else {
        Err(Error::DegenerateBound {
            width: bound.width,
            height: bound.height,
        })
    }
}
