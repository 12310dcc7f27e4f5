//! Error types for the geometry engine and the color codec.
//!
//! Catalogue loading and rendering report failures through `anyhow`; the
//! numerical core uses the typed errors below so callers can tell a
//! singular frame from a malformed vector.

use thiserror::Error;

/// Failure of a matrix or coordinate operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("shape mismatch in {op}: {left:?} vs {right:?}")]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    /// A row of the input has a different length than the first row.
    #[error("ragged matrix: row {row} has {found} columns, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Inversion requested on a non-square matrix.
    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// No usable pivot was found for the given column.
    #[error("singular matrix: no non-zero pivot in column {column}")]
    Singular { column: usize },

    /// Normalization of a zero-length vector.
    #[error("cannot normalize a zero-length vector")]
    ZeroNorm,

    /// The operand is not a column vector of the expected dimension.
    #[error("expected a {expected}-vector, got a {rows}x{cols} matrix")]
    NotAVector {
        expected: usize,
        rows: usize,
        cols: usize,
    },

    /// Input lies outside the domain of a coordinate conversion.
    #[error("domain error in {op}: {message}")]
    Domain {
        op: &'static str,
        message: &'static str,
    },
}

/// Failure to decode or encode a 24-bit color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid hex color {0:?}: expected 6 hex digits")]
    InvalidHex(String),

    #[error("packed color {0:#x} exceeds 24 bits")]
    OutOfRange(u32),
}
