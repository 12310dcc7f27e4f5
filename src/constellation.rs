//! Constellations: a named group of stars, the line figures joining them,
//! and the reference frame used when the constellation is the viewpoint.

use std::collections::HashMap;

use tracing::warn;

use crate::color::Color;
use crate::error::GeometryError;
use crate::matrix::Matrix;
use crate::star::{project, Pixel, Star};

/// A line segment from one catalogue star to another.
///
/// Endpoints are copied from the stars' catalogue positions at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    origin: Matrix,
    target: Matrix,
    color: Color,
}

impl Vector {
    pub fn new(origin: &Star, target: &Star, color: Color) -> Self {
        Self {
            origin: Matrix::from(origin.cartesian()),
            target: Matrix::from(target.cartesian()),
            color,
        }
    }

    pub fn origin(&self) -> &Matrix {
        &self.origin
    }

    pub fn target(&self) -> &Matrix {
        &self.target
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Both endpoints rotated by `frame` and projected, or `None` when either
    /// endpoint is off-canvas.
    pub fn project(&self, frame: &Matrix) -> Result<Option<(Pixel, Pixel)>, GeometryError> {
        let from = project(&frame.multiply(&self.origin)?)?;
        let to = project(&frame.multiply(&self.target)?)?;
        Ok(from.zip(to))
    }
}

/// A constellation and everything it owns.
#[derive(Debug, Clone)]
pub struct Constellation {
    cindex: u32,
    name: String,
    abbreviation: String,
    color: Color,
    frame: Matrix,
    stars: Vec<Star>,
    by_designation: HashMap<String, usize>,
    vectors: Vec<Vector>,
}

impl Constellation {
    pub fn new(
        cindex: u32,
        name: impl Into<String>,
        abbreviation: impl Into<String>,
        frame: Matrix,
        color: Color,
    ) -> Self {
        Self {
            cindex,
            name: name.into(),
            abbreviation: abbreviation.into(),
            color,
            frame,
            stars: Vec::new(),
            by_designation: HashMap::new(),
            vectors: Vec::new(),
        }
    }

    pub fn cindex(&self) -> u32 {
        self.cindex
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Reference frame used when this constellation is the viewpoint.
    pub fn frame(&self) -> &Matrix {
        &self.frame
    }

    /// Number of stars.
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Stars in insertion order.
    pub fn stars(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    pub fn stars_mut(&mut self) -> impl Iterator<Item = &mut Star> {
        self.stars.iter_mut()
    }

    pub fn vectors(&self) -> &[Vector] {
        &self.vectors
    }

    pub fn get(&self, designation: &str) -> Option<&Star> {
        self.by_designation
            .get(designation)
            .map(|&idx| &self.stars[idx])
    }

    /// Add a star keyed by its designation.
    ///
    /// A repeated designation replaces the earlier star in place.
    pub fn add_star(&mut self, star: Star) {
        match self.by_designation.get(star.designation()) {
            Some(&idx) => {
                warn!(
                    "Constellation {} ({}): designation {:?} repeated, replacing star {} with {}",
                    self.cindex,
                    self.abbreviation,
                    star.designation(),
                    self.stars[idx].index(),
                    star.index()
                );
                self.stars[idx] = star;
            }
            None => {
                self.by_designation
                    .insert(star.designation().to_string(), self.stars.len());
                self.stars.push(star);
            }
        }
    }

    /// Append a line figure drawn in this constellation's color.
    pub fn add_vector(&mut self, origin: &Star, target: &Star) {
        self.vectors.push(Vector::new(origin, target, self.color));
    }

    /// Append an already-built line figure.
    pub fn push_vector(&mut self, vector: Vector) {
        self.vectors.push(vector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use nalgebra::Vector3;

    fn star(index: u32, designation: &str, x: f64, y: f64, z: f64) -> Star {
        Star::new(
            index,
            7,
            index,
            Vector3::new(x, y, z),
            Palette::White.color(),
            designation,
            2.5,
        )
    }

    fn orion() -> Constellation {
        Constellation::new(
            7,
            "Orion",
            "Ori",
            Matrix::identity(3),
            Palette::Blue.color(),
        )
    }

    #[test]
    fn stars_are_keyed_by_designation() {
        let mut c = orion();
        assert!(c.is_empty());
        c.add_star(star(1, "alpha", 1.0, 0.1, 0.0));
        c.add_star(star(2, "beta", 1.0, -0.1, 0.0));
        assert_eq!(c.len(), 2);
        assert_eq!(c.get("beta").map(Star::index), Some(2));
        assert!(c.get("gamma").is_none());
        let order: Vec<u32> = c.stars().map(Star::index).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn repeated_designation_replaces_in_place() {
        let mut c = orion();
        c.add_star(star(1, "alpha", 1.0, 0.0, 0.0));
        c.add_star(star(2, "beta", 1.0, 0.0, 0.0));
        c.add_star(star(3, "alpha", 1.0, 0.0, 0.0));
        assert_eq!(c.len(), 2);
        let order: Vec<u32> = c.stars().map(Star::index).collect();
        assert_eq!(order, vec![3, 2]);
    }

    #[test]
    fn vectors_take_constellation_color() {
        let mut c = orion();
        let a = star(1, "alpha", 1.0, 0.0, 0.0);
        let b = star(2, "beta", 2.0, 1.0, 0.0);
        c.add_vector(&a, &b);
        let v = &c.vectors()[0];
        assert_eq!(v.color(), Palette::Blue.color());
        assert_eq!(v.origin(), &Matrix::vector(&[1.0, 0.0, 0.0]));
        assert_eq!(v.target(), &Matrix::vector(&[2.0, 1.0, 0.0]));
    }

    #[test]
    fn vector_projection_requires_both_endpoints() {
        let a = star(1, "alpha", 1.0, 0.0, 0.0);
        let b = star(2, "beta", 1.0, 0.05, 0.0);
        let hidden = star(3, "gamma", -1.0, 0.0, 0.0);
        let frame = Matrix::identity(3);

        let (from, to) = Vector::new(&a, &b, Color::default())
            .project(&frame)
            .unwrap()
            .expect("both endpoints visible");
        assert_eq!(from, Pixel { x: 786, y: 785 });
        assert!(to.x < from.x);
        assert_eq!(to.y, from.y);

        assert!(Vector::new(&a, &hidden, Color::default())
            .project(&frame)
            .unwrap()
            .is_none());
    }
}
