//! Position-based (Verlet-style) particle integration.

use crate::{config::Config, particle::Particle, vector::VectorExt};
use glam::Vec2;

/// Advances `particle` by one frame under `force`.
///
/// 1. The inertial displacement `position - previous` is damped by
///    `cfg.friction` and clamped to `cfg.max_speed`, then added to the
///    position. On a particle's first step there is no previous position
///    and so no inertia.
/// 2. `previous` becomes the position from before this call.
/// 3. `force` is added as-is. It is not subject to the speed clamp.
///
/// ### Parameters
/// - `particle` - Particle to advance in place.
/// - `force` - Net force for this frame, already including external,
///   boundary and neighbor terms.
/// - `cfg` - Supplies `friction` and `max_speed`.
pub fn integrate(particle: &mut Particle, force: Vec2, cfg: &Config) {
    let saved = particle.position;

    if let Some(previous) = particle.previous {
        let mut velocity = particle.position;
        velocity
            .sub_vec(previous)
            .scale(1.0 - cfg.friction)
            .clamp_length_to(cfg.max_speed);
        particle.position.add_vec(velocity);
    }
    particle.previous = Some(saved);

    particle.position.add_vec(force);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moving(position: Vec2, previous: Vec2) -> Particle {
        Particle {
            position,
            previous: Some(previous),
        }
    }

    #[test]
    fn first_step_has_no_inertia() {
        let cfg = Config::default();
        let mut p = Particle::at(Vec2::new(5.0, 5.0));

        integrate(&mut p, Vec2::new(0.0, 1.0), &cfg);

        assert_eq!(p.previous, Some(Vec2::new(5.0, 5.0)));
        assert_eq!(p.position, Vec2::new(5.0, 6.0));
    }

    #[test]
    fn inertia_is_damped_by_friction() {
        let cfg = Config::default().with_friction(0.5);
        let mut p = moving(Vec2::new(4.0, 0.0), Vec2::new(0.0, 0.0));

        integrate(&mut p, Vec2::ZERO, &cfg);

        assert_eq!(p.position, Vec2::new(6.0, 0.0));
        assert_eq!(p.previous, Some(Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn zero_friction_keeps_velocity() {
        let cfg = Config::default().with_friction(0.0);
        let mut p = moving(Vec2::new(1.0, 1.0), Vec2::new(0.0, 0.0));

        for _ in 0..5 {
            integrate(&mut p, Vec2::ZERO, &cfg);
        }

        assert!((p.position - Vec2::new(6.0, 6.0)).length() < 1e-5);
        assert!((p.velocity() - Vec2::new(1.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn inertial_speed_is_clamped_preserving_direction() {
        let cfg = Config::default().with_friction(0.0).with_max_speed(10.0);
        let mut p = moving(Vec2::new(30.0, 40.0), Vec2::new(0.0, 0.0));

        integrate(&mut p, Vec2::ZERO, &cfg);

        let step = p.position - Vec2::new(30.0, 40.0);
        assert!((step.length() - 10.0).abs() < 1e-4);
        assert!((step.normalize() - Vec2::new(0.6, 0.8)).length() < 1e-5);
    }

    #[test]
    fn applied_force_is_exempt_from_clamp() {
        let cfg = Config::default().with_friction(0.0).with_max_speed(1.0);
        let mut p = moving(Vec2::new(0.0, 0.0), Vec2::new(-5.0, 0.0));

        integrate(&mut p, Vec2::new(20.0, 0.0), &cfg);

        // One unit of clamped inertia plus the full force.
        assert!((p.position - Vec2::new(21.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn free_motion_never_speeds_up() {
        let cfg = Config::default();
        let mut p = moving(Vec2::new(3.0, -2.0), Vec2::new(0.0, 0.0));
        let mut last = p.velocity().length();

        for frame in 0..1000 {
            integrate(&mut p, Vec2::ZERO, &cfg);
            let speed = p.velocity().length();
            assert!(
                speed <= last + 1e-6,
                "speed grew at frame {frame}: {last} -> {speed}"
            );
            last = speed;
        }
        assert!(last < Vec2::new(3.0, -2.0).length() * 0.01);
    }
}
