//! Core 2-D particle fluid simulation library.
//!
//! Main components:
//! - [`vector`] — chainable in-place arithmetic on 2-D vectors.
//! - [`bound`] — axis-aligned rectangles for areas and queries.
//! - [`quadtree`] — per-frame spatial index over particle positions.
//! - [`particle`] — particle state and the particle pool.
//! - [`motion`] — Verlet-style integration with friction and speed clamp.
//! - [`collision`] — wall containment and neighbor repulsion.
//! - [`forcing`] — external forces (gravity, pointer steering).
//! - [`force_buffer`] — per-particle force accumulator.
//! - [`phases`] — the per-frame pipeline.
//! - [`simulation`] — owns pool, index and config and steps them.
//! - [`policy`] — pool size controllers.
//! - [`config`] — physics parameters.
//! - [`error`] — error type for construction and validation.
//! - [`types`] — shared ids.

pub mod bound;
pub mod collision;
pub mod config;
pub mod error;
pub mod force_buffer;
pub mod forcing;
pub mod motion;
pub mod particle;
pub mod phases;
pub mod policy;
pub mod quadtree;
pub mod simulation;
pub mod types;
pub mod vector;

pub use error::{Error, Result};
