//! Catalogue stars and their projection onto the chart canvas.
//!
//! A star keeps its catalogue position untouched and caches a *working
//! position*: the catalogue position rotated into the current reference
//! frame. Rendering is a two-step protocol, [`Star::rotate`] then
//! [`Star::position`]; `position` always reads whatever frame was applied
//! last (the catalogue frame until the first rotation).
//!
//! # Projection
//!
//! The working position is converted to `(rho, theta, phi)` and mapped onto
//! a fixed `CANVAS_SIZE`² grid at `PIXELS_PER_RADIAN`:
//!
//! ```text
//! x = 1571 - round(((theta + π/4) mod 2π) · 1000)
//! y = round((((phi + 3π/4) mod π) - π/2) · 1000)
//! ```
//!
//! `round` sends exact halves to the even neighbour.
//!
//! Points landing outside `[0, CANVAS_SIZE)` on either axis are not drawn.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use nalgebra::Vector3;

use crate::color::{Color, Palette};
use crate::error::GeometryError;
use crate::matrix::Matrix;
use crate::transform::to_polar;

/// Width and height of the chart canvas, in pixels.
pub const CANVAS_SIZE: u32 = 1572;

/// Angular scale of the chart.
pub const PIXELS_PER_RADIAN: f64 = 1000.0;

/// Integer pixel on the chart canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
}

impl Pixel {
    /// `Some` when `(x, y)` lies inside the visible window.
    pub fn in_window(x: i64, y: i64) -> Option<Pixel> {
        let window = 0..CANVAS_SIZE as i64;
        if window.contains(&x) && window.contains(&y) {
            Some(Pixel {
                x: x as u32,
                y: y as u32,
            })
        } else {
            None
        }
    }
}

/// Angle to whole pixels; exact halves go to the even pixel.
fn to_pixels(angle: f64) -> i64 {
    (angle * PIXELS_PER_RADIAN).round_ties_even() as i64
}

/// Project a Cartesian 3-vector onto the canvas.
///
/// Returns `Ok(None)` when the point falls outside the visible window.
pub fn project(v: &Matrix) -> Result<Option<Pixel>, GeometryError> {
    let (_, theta, phi) = to_polar(v)?.unpack3()?;
    let x = (CANVAS_SIZE - 1) as i64 - to_pixels((theta + FRAC_PI_4).rem_euclid(TAU));
    let y = to_pixels((phi + 3.0 * FRAC_PI_4).rem_euclid(PI) - FRAC_PI_2);
    Ok(Pixel::in_window(x, y))
}

/// Display color keyed on the last character of a spectral designation.
///
/// Upper-case letters outside the table are gray; anything else (digits,
/// lower case, an empty designation) is white.
pub fn designation_color(designation: &str) -> Palette {
    match designation.chars().last() {
        Some('A') => Palette::Red,
        Some('B') => Palette::Orange,
        Some('G') => Palette::Yellow,
        Some('D') => Palette::Green,
        Some('E') => Palette::Turquoise,
        Some('Z') => Palette::Blue,
        Some('H') => Palette::Purple,
        Some('V') => Palette::Pink,
        Some('I') => Palette::Brown,
        Some(c) if c.is_ascii_uppercase() => Palette::Gray,
        _ => Palette::White,
    }
}

/// Circle radius for a visual magnitude.
///
/// Thresholds are tested in order. The `< 0.0` step sits after `< 0.8`
/// and therefore never matches; anything below 0.8 draws at 10.
pub fn display_size(magnitude: f64) -> f64 {
    if magnitude < 0.8 {
        10.0
    } else if magnitude < 0.0 {
        8.0
    } else if magnitude < 1.2 {
        6.0
    } else if magnitude < 2.0 {
        5.0
    } else if magnitude < 3.0 {
        4.0
    } else if magnitude < 5.0 {
        2.0
    } else if magnitude < 6.0 {
        1.0
    } else {
        0.5
    }
}

/// A star from the stellar catalogue.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    index: u32,
    cindex: u32,
    sindex: u32,
    cartesian: Vector3<f64>,
    working: Vector3<f64>,
    color: Color,
    designation: String,
    magnitude: f64,
    designation_color: Color,
    size: f64,
}

impl Star {
    /// Create a star; the working position starts at the catalogue position.
    pub fn new(
        index: u32,
        cindex: u32,
        sindex: u32,
        cartesian: Vector3<f64>,
        color: Color,
        designation: impl Into<String>,
        magnitude: f64,
    ) -> Self {
        let designation = designation.into();
        Self {
            index,
            cindex,
            sindex,
            cartesian,
            working: cartesian,
            color,
            designation_color: designation_color(&designation).color(),
            designation,
            magnitude,
            size: display_size(magnitude),
        }
    }

    /// Global catalogue id.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Id of the owning constellation.
    pub fn cindex(&self) -> u32 {
        self.cindex
    }

    /// Index within the owning constellation.
    pub fn sindex(&self) -> u32 {
        self.sindex
    }

    pub fn cartesian(&self) -> Vector3<f64> {
        self.cartesian
    }

    pub fn working_position(&self) -> Vector3<f64> {
        self.working
    }

    /// Catalogue (true) color.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn designation_color(&self) -> Color {
        self.designation_color
    }

    /// Display radius in pixels.
    pub fn size(&self) -> f64 {
        self.size
    }

    /// Catalogue position rotated by `frame`, without touching the cache.
    pub fn rotated(&self, frame: &Matrix) -> Result<Vector3<f64>, GeometryError> {
        frame
            .multiply(&Matrix::from(self.cartesian))?
            .to_vector3()
    }

    /// Set the working position to `frame · cartesian`.
    pub fn rotate(&mut self, frame: &Matrix) -> Result<(), GeometryError> {
        self.working = self.rotated(frame)?;
        Ok(())
    }

    /// Restore the working position to the catalogue frame.
    pub fn reset(&mut self) {
        self.working = self.cartesian;
    }

    /// Pixel of the working position, or `None` when it is off-canvas.
    pub fn position(&self) -> Result<Option<Pixel>, GeometryError> {
        project(&Matrix::from(self.working))
    }
}
