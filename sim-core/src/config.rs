use crate::{
    error::{Error, Result},
    quadtree::{DEFAULT_CAPACITY, DEFAULT_MAX_DEPTH},
};

/// How pairwise repulsion is applied within a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PairResolution {
    /// Accumulate every push into a per-particle force buffer, then
    /// integrate all particles. Result does not depend on particle order.
    #[default]
    Deferred,
    /// Apply the reaction of each push straight to the neighbor's position
    /// while iterating, integrating each particle as soon as its forces are
    /// known. Later particles see earlier ones' adjustments.
    Immediate,
}

/// Physics parameters shared by every particle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Radius of every particle. Repulsion starts at `2 * radius`.
    pub radius: f32,
    /// Fraction of velocity lost per frame.
    pub friction: f32,
    /// Upper bound on inertial displacement per frame.
    pub max_speed: f32,
    /// Spring strength for wall and neighbor penetration.
    pub bounce: f32,
    /// Scale applied to the orientation vector by [`crate::forcing::Gravity`].
    pub gravity: f32,
    /// Entries per quadtree leaf before it splits.
    pub capacity: usize,
    /// Depth at which quadtree leaves stop splitting.
    pub max_depth: u32,
    /// Distance below which two particles are treated as coincident.
    pub min_distance: f32,
    pub resolution: PairResolution,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            radius: 6.0,
            friction: 0.005,
            max_speed: 10.0,
            bounce: 0.4,
            gravity: 0.08,
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
            min_distance: 1e-4,
            resolution: PairResolution::Deferred,
        }
    }
}

impl Config {
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_bounce(mut self, bounce: f32) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_resolution(mut self, resolution: PairResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Distance within which two particles repel each other.
    #[inline]
    pub fn field(&self) -> f32 {
        self.radius * 2.0
    }

    /// Checks every parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        positive("radius", self.radius)?;
        positive("max_speed", self.max_speed)?;
        positive("min_distance", self.min_distance)?;
        finite("gravity", self.gravity)?;

        finite("friction", self.friction)?;
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(Error::InvalidParam(format!(
                "friction must be in [0, 1], got {}",
                self.friction
            )));
        }

        finite("bounce", self.bounce)?;
        if self.bounce < 0.0 {
            return Err(Error::InvalidParam(format!(
                "bounce must be >= 0, got {}",
                self.bounce
            )));
        }

        if self.capacity == 0 {
            return Err(Error::InvalidParam("capacity must be >= 1".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::InvalidParam("max_depth must be >= 1".to_string()));
        }
        Ok(())
    }
}

fn finite(name: &str, v: f32) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidParam(format!("{name} must be finite, got {v}")))
    }
}

fn positive(name: &str, v: f32) -> Result<()> {
    finite(name, v)?;
    if v > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParam(format!("{name} must be > 0, got {v}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.field(), 12.0);
        assert_eq!(cfg.resolution, PairResolution::Deferred);
    }

    #[test]
    fn builders_set_fields() {
        let cfg = Config::default()
            .with_radius(3.0)
            .with_friction(0.0)
            .with_bounce(0.5)
            .with_capacity(4)
            .with_resolution(PairResolution::Immediate);
        assert_eq!(cfg.radius, 3.0);
        assert_eq!(cfg.friction, 0.0);
        assert_eq!(cfg.bounce, 0.5);
        assert_eq!(cfg.capacity, 4);
        assert_eq!(cfg.resolution, PairResolution::Immediate);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let bad = [
            Config::default().with_radius(0.0),
            Config::default().with_radius(f32::NAN),
            Config::default().with_friction(1.5),
            Config::default().with_friction(-0.1),
            Config::default().with_max_speed(0.0),
            Config::default().with_bounce(-1.0),
            Config::default().with_gravity(f32::INFINITY),
            Config::default().with_capacity(0),
            Config::default().with_max_depth(0),
        ];
        for cfg in bad {
            assert!(
                matches!(cfg.validate(), Err(Error::InvalidParam(_))),
                "expected rejection for {cfg:?}"
            );
        }
    }
}
