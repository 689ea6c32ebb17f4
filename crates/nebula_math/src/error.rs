//! Error types for the checked math entry points
//!
//! The default operations never fail; they follow IEEE-754 and let
//! `Inf`/`NaN` propagate. The `try_*`/`checked_*` variants report
//! degenerate input through these types instead.

use thiserror::Error;

/// Numeric degeneracy detected by a checked operation
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MathError {
    /// Vector too short to normalize
    #[error("cannot normalize a vector of length {length}")]
    ZeroLength { length: f32 },

    /// Matrix determinant too close to zero
    #[error("matrix is singular (determinant {determinant})")]
    SingularMatrix { determinant: f32 },

    /// Projection bounds with a zero span
    #[error("degenerate projection bounds: {0}")]
    DegenerateProjection(&'static str),

    /// Lines or planes without a unique intersection
    #[error("primitives are parallel or degenerate")]
    Parallel,

    /// Matrix is expected to be affine
    #[error("matrix is not affine")]
    NotAffine,

    /// Sample timestamps out of order
    #[error("packet time {packet} is after current time {current}")]
    InvalidTimestamps { packet: f64, current: f64 },
}

/// Out-of-range access on a lane, row or table index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for {kind} (len {len})")]
pub struct IndexError {
    pub kind: &'static str,
    pub index: usize,
    pub len: usize,
}

impl IndexError {
    #[inline]
    pub(crate) const fn new(kind: &'static str, index: usize, len: usize) -> Self {
        Self { kind, index, len }
    }
}

/// Result type for checked math operations
pub type Result<T> = core::result::Result<T, MathError>;
