//! # firmament
//!
//! Star-chart projection of a 3D constellation catalogue.
//!
//! Every catalogue star has a fixed Cartesian position. A reference frame
//! (a constellation's stored orientation, or one of 16 preset orientations)
//! rotates the stars, which are then converted to spherical angles and
//! mapped onto a fixed 1572 × 1572 pixel chart.
//!
//! ## Example
//!
//! ```no_run
//! use firmament::{ChartConfig, Firmament, RenderMode};
//!
//! // Reads stellar-, vectoral- and aggregational-catalogue.csv
//! let mut sky = Firmament::load("data").unwrap();
//!
//! // Everything as seen from constellation 1, in catalogue colors
//! sky.render(RenderMode::TrueColor, 1, "orion.png", &ChartConfig::default())
//!     .unwrap();
//!
//! // All-sky page 4 of 16
//! sky.render(RenderMode::Pages, 4, "page-4.png", &ChartConfig::default())
//!     .unwrap();
//! ```
//!
//! ## Pipeline
//!
//! 1. **Load** — three header-less CSV tables are parsed into constellations,
//!    stars and line figures ([`Firmament::from_tables`]).
//! 2. **Rotate** — each star's catalogue position is multiplied by the
//!    reference frame ([`Star::rotate`]).
//! 3. **Project** — the rotated position is converted to `(rho, theta, phi)`
//!    and mapped to a pixel, or dropped when it falls outside the chart
//!    ([`Star::position`]).
//! 4. **Draw** — visible stars become filled circles sized by magnitude.

pub mod catalogue;
pub mod color;
pub mod constellation;
pub mod error;
pub mod firmament;
pub mod matrix;
#[cfg(feature = "image")]
pub mod render;
pub mod star;
pub mod transform;

pub use catalogue::Table;
pub use color::{Color, Palette};
pub use constellation::{Constellation, Vector};
pub use error::{ColorError, GeometryError};
pub use firmament::Firmament;
pub use matrix::Matrix;
#[cfg(feature = "image")]
pub use render::{preset_orientation, Canvas, ChartConfig, RenderMode, PRESET_ORIENTATIONS};
pub use star::{designation_color, display_size, Pixel, Star, CANVAS_SIZE, PIXELS_PER_RADIAN};
pub use transform::{
    rotation_factors, rotation_matrix, rotation_matrix_from, to_cartesian, to_polar, DEFAULT_ROLL,
};
