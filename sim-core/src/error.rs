use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring a simulation.
///
/// The per-frame path never fails; these only come out of construction and
/// validation.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A configuration value is non-finite or out of range.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// The simulation area has a non-positive or non-finite extent.
    #[error("degenerate bound: {width} x {height}")]
    DegenerateBound { width: f32, height: f32 },
}
