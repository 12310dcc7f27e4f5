//! Cartesian/spherical conversion and rotation-matrix synthesis.
//!
//! # Conventions
//!
//! - Spherical vectors are `(rho, theta, phi)`: `rho` is the Euclidean norm,
//!   `theta` the longitude in `[0, 2π)` measured in the x-y plane, and
//!   `phi` the latitude in `[-π/2, π/2]`.
//! - Rotation angles are `alpha` about the y-axis, `beta` about the z-axis
//!   and `gamma` about the x-axis, composed in that order.

use std::f64::consts::{PI, TAU};

use crate::error::GeometryError;
use crate::matrix::Matrix;

/// Roll applied by [`rotation_factors`] when none is given.
pub const DEFAULT_ROLL: f64 = -PI / 2.0;

/// Convert a Cartesian 3-vector to `(rho, theta, phi)`.
///
/// `theta = atan(y/x)`, moved into `[0, 2π)` by quadrant: `+2π` when
/// `x > 0` and `y < 0`, `+π` when `x < 0`. Fails when `x = 0` or `rho = 0`;
/// catalogue stars never sit exactly on the projection axis.
pub fn to_polar(v: &Matrix) -> Result<Matrix, GeometryError> {
    let (x, y, z) = v.unpack3()?;
    let rho = (x * x + y * y + z * z).sqrt();
    if rho == 0.0 {
        return Err(GeometryError::Domain {
            op: "to_polar",
            message: "zero-length vector",
        });
    }
    if x == 0.0 {
        return Err(GeometryError::Domain {
            op: "to_polar",
            message: "x component is zero",
        });
    }

    let mut theta = (y / x).atan();
    if x < 0.0 {
        theta += PI;
    } else if y < 0.0 {
        theta += TAU;
    }
    let phi = (z / rho).asin();
    Ok(Matrix::vector(&[rho, theta, phi]))
}

/// Convert `(rho, theta, phi)` back to a Cartesian 3-vector.
pub fn to_cartesian(v: &Matrix) -> Result<Matrix, GeometryError> {
    let (rho, theta, phi) = v.unpack3()?;
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Ok(Matrix::vector(&[
        rho * cos_theta * cos_phi,
        rho * sin_theta * cos_phi,
        rho * sin_phi,
    ]))
}

/// Orientation matrix for `alpha` (about y), `beta` (about z) and
/// `gamma` (about x).
///
/// The entries are the closed form of the composed rotation; the order of
/// composition matters.
pub fn rotation_matrix(alpha: f64, beta: f64, gamma: f64) -> Matrix {
    let (sa, ca) = alpha.sin_cos();
    let (sb, cb) = beta.sin_cos();
    let (sg, cg) = gamma.sin_cos();
    Matrix::from_rows([
        [ca * cb, -sb, sa * cb],
        [ca * sb * cg + sa * sg, cb * cg, sa * sb * cg - ca * sg],
        [ca * sb * sg - sa * cg, cb * sg, sa * sb * sg + ca * cg],
    ])
}

/// [`rotation_matrix`] taking the angles packed as a 3-vector.
pub fn rotation_matrix_from(angles: &Matrix) -> Result<Matrix, GeometryError> {
    let (alpha, beta, gamma) = angles.unpack3()?;
    Ok(rotation_matrix(alpha, beta, gamma))
}

/// Angles `(alpha, beta, gamma)` that roughly point a frame at `direction`.
///
/// `alpha = atan(z/x)` and `beta = -atan(x·y / (x² + z²) / cos(alpha))`,
/// plus `π` when `x < 0`; `gamma` is passed through. This is a closed-form
/// approximation for a single target with a fixed roll, not a general
/// Euler decomposition.
pub fn rotation_factors(direction: &Matrix, gamma: f64) -> Result<Matrix, GeometryError> {
    let (x, y, z) = direction.unpack3()?;
    if x == 0.0 {
        return Err(GeometryError::Domain {
            op: "rotation_factors",
            message: "x component is zero",
        });
    }
    let alpha = (z / x).atan();
    let mut beta = -((x * y) / (x * x + z * z) / alpha.cos()).atan();
    if x < 0.0 {
        beta += PI;
    }
    Ok(Matrix::vector(&[alpha, beta, gamma]))
}
