//! In-place, chainable arithmetic on [`Vector2`].
//!
//! Positions are plain [`glam::Vec2`] values. The particle update mutates
//! them step by step, so [`VectorExt`] adds `&mut self` methods that return
//! the same vector for chaining:
//!
//! ```
//! use sim_core::vector::{Vector2, VectorExt};
//!
//! let mut v = Vector2::new(1.0, 2.0);
//! v.add_xy(2.0, 2.0).scale(2.0);
//! assert_eq!(v, Vector2::new(6.0, 8.0));
//! assert_eq!(v.length(), 10.0);
//! ```

use glam::Vec2;

/// The 2-D vector type used for positions, velocities and forces.
pub type Vector2 = Vec2;

/// Chainable in-place operations on [`Vector2`].
pub trait VectorExt {
    fn set_xy(&mut self, x: f32, y: f32) -> &mut Self;
    fn set_from(&mut self, other: Vector2) -> &mut Self;
    fn add_xy(&mut self, x: f32, y: f32) -> &mut Self;
    fn add_vec(&mut self, other: Vector2) -> &mut Self;
    fn sub_xy(&mut self, x: f32, y: f32) -> &mut Self;
    fn sub_vec(&mut self, other: Vector2) -> &mut Self;
    fn scale(&mut self, factor: f32) -> &mut Self;

    /// Rescales to `max` if the length exceeds it. Direction is preserved.
    fn clamp_length_to(&mut self, max: f32) -> &mut Self;

    fn distance_to(&self, other: Vector2) -> f32;
}

impl VectorExt for Vec2 {
    #[inline]
    fn set_xy(&mut self, x: f32, y: f32) -> &mut Self {
        self.x = x;
        self.y = y;
        self
    }

    #[inline]
    fn set_from(&mut self, other: Vector2) -> &mut Self {
        *self = other;
        self
    }

    #[inline]
    fn add_xy(&mut self, x: f32, y: f32) -> &mut Self {
        self.x += x;
        self.y += y;
        self
    }

    #[inline]
    fn add_vec(&mut self, other: Vector2) -> &mut Self {
        *self += other;
        self
    }

    #[inline]
    fn sub_xy(&mut self, x: f32, y: f32) -> &mut Self {
        self.x -= x;
        self.y -= y;
        self
    }

    #[inline]
    fn sub_vec(&mut self, other: Vector2) -> &mut Self {
        *self -= other;
        self
    }

    #[inline]
    fn scale(&mut self, factor: f32) -> &mut Self {
        *self *= factor;
        self
    }

    #[inline]
    fn clamp_length_to(&mut self, max: f32) -> &mut Self {
        let len = self.length();
        if len > max {
            *self *= max / len;
        }
        self
    }

    #[inline]
    fn distance_to(&self, other: Vector2) -> f32 {
        (*self - other).length()
    }
}
