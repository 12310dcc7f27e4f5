//! The whole sky: every constellation keyed by its catalogue id.
//!
//! Construction is three passes over the catalogue tables, and the order is
//! load-bearing:
//!
//! 1. constellations are created,
//! 2. each star is attached to the constellation named by its `cindex`,
//! 3. each vector is resolved by `(cindex, designation)` on both ends.
//!
//! A star or vector that references a missing constellation or designation
//! aborts construction.
//!
//! Constellations keep the order of the constellation table, and that is the
//! order render passes draw in: later stars paint over earlier ones.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::catalogue::{parse_constellation, parse_star, parse_vector, Table};
use crate::constellation::{Constellation, Vector};
use crate::error::GeometryError;
use crate::matrix::Matrix;
use crate::star::Star;

/// Default file name of the star table.
pub const STELLAR_CATALOGUE: &str = "stellar-catalogue.csv";
/// Default file name of the vector (line figure) table.
pub const VECTORAL_CATALOGUE: &str = "vectoral-catalogue.csv";
/// Default file name of the constellation table.
pub const AGGREGATIONAL_CATALOGUE: &str = "aggregational-catalogue.csv";

#[derive(Debug, Clone, Default)]
pub struct Firmament {
    constellations: Vec<Constellation>,
    by_cindex: HashMap<u32, usize>,
}

impl Firmament {
    /// Build the sky from already-loaded tables.
    pub fn from_tables(stars: &Table, vectors: &Table, constellations: &Table) -> Result<Self> {
        let mut firmament = Self::default();
        firmament.populate_constellations(constellations)?;
        firmament.populate_stars(stars)?;
        firmament.populate_vectors(vectors)?;
        info!(
            "Built firmament: {} constellations, {} stars, {} vectors",
            firmament.len(),
            firmament.star_count(),
            firmament.vector_count()
        );
        Ok(firmament)
    }

    /// Load the three default catalogue files from `dir`.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        info!("Loading catalogues from {}", dir.display());
        let stars = Table::from_path(dir.join(STELLAR_CATALOGUE))?;
        let vectors = Table::from_path(dir.join(VECTORAL_CATALOGUE))?;
        let constellations = Table::from_path(dir.join(AGGREGATIONAL_CATALOGUE))?;
        Self::from_tables(&stars, &vectors, &constellations)
    }

    fn populate_constellations(&mut self, table: &Table) -> Result<()> {
        for (row, record) in table.iter().enumerate() {
            let constellation = parse_constellation(record)
                .with_context(|| format!("Constellation table row {}", row + 1))?;
            let cindex = constellation.cindex();
            match self.by_cindex.get(&cindex) {
                Some(&idx) => {
                    warn!("Constellation {} defined twice; keeping row {}", cindex, row + 1);
                    self.constellations[idx] = constellation;
                }
                None => {
                    self.by_cindex.insert(cindex, self.constellations.len());
                    self.constellations.push(constellation);
                }
            }
        }
        Ok(())
    }

    fn populate_stars(&mut self, table: &Table) -> Result<()> {
        for (row, record) in table.iter().enumerate() {
            let star = parse_star(record).with_context(|| format!("Star table row {}", row + 1))?;
            let owner = self.get_mut(star.cindex()).with_context(|| {
                format!(
                    "Star table row {}: star {} references unknown constellation {}",
                    row + 1,
                    star.index(),
                    star.cindex()
                )
            })?;
            owner.add_star(star);
        }
        Ok(())
    }

    fn populate_vectors(&mut self, table: &Table) -> Result<()> {
        for (row, record) in table.iter().enumerate() {
            let rec = parse_vector(record).with_context(|| format!("Vector table row {}", row + 1))?;
            let color = self
                .get(rec.cindex)
                .with_context(|| {
                    format!(
                        "Vector table row {}: unknown constellation {}",
                        row + 1,
                        rec.cindex
                    )
                })?
                .color();
            let origin = self
                .find_star(rec.origin_cindex, &rec.origin)
                .with_context(|| format!("Vector table row {}: origin", row + 1))?;
            let target = self
                .find_star(rec.target_cindex, &rec.target)
                .with_context(|| format!("Vector table row {}: target", row + 1))?;
            let vector = Vector::new(origin, target, color);
            if let Some(owner) = self.get_mut(rec.cindex) {
                owner.push_vector(vector);
            }
        }
        Ok(())
    }

    /// Star `designation` of constellation `cindex`.
    pub fn find_star(&self, cindex: u32, designation: &str) -> Result<&Star> {
        self.get(cindex)
            .with_context(|| format!("unknown constellation {cindex}"))?
            .get(designation)
            .with_context(|| {
                format!("designation {designation:?} not found in constellation {cindex}")
            })
    }

    pub fn get(&self, cindex: u32) -> Option<&Constellation> {
        self.by_cindex.get(&cindex).map(|&idx| &self.constellations[idx])
    }

    fn get_mut(&mut self, cindex: u32) -> Option<&mut Constellation> {
        let idx = *self.by_cindex.get(&cindex)?;
        self.constellations.get_mut(idx)
    }

    /// Constellations in catalogue order.
    pub fn constellations(&self) -> impl Iterator<Item = &Constellation> {
        self.constellations.iter()
    }

    pub fn constellations_mut(&mut self) -> impl Iterator<Item = &mut Constellation> {
        self.constellations.iter_mut()
    }

    /// Number of constellations.
    pub fn len(&self) -> usize {
        self.constellations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constellations.is_empty()
    }

    pub fn star_count(&self) -> usize {
        self.constellations().map(Constellation::len).sum()
    }

    pub fn vector_count(&self) -> usize {
        self.constellations().map(|c| c.vectors().len()).sum()
    }

    /// Rotate every star's working position into `frame`.
    pub fn rotate_all(&mut self, frame: &Matrix) -> Result<(), GeometryError> {
        for constellation in self.constellations.iter_mut() {
            for star in constellation.stars_mut() {
                star.rotate(frame)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;

    const CONSTELLATIONS: &str = "\
1,Orion,Ori,1,0,0,0,1,0,0,0,1,69D8FF
2,Lyra,Lyr,0,1,0,-1,0,0,0,0,1,FF66FF
";
    const STARS: &str = "\
10,1,0,1.0,0.10,0.0,FF0000,B1A,0.5
11,1,1,1.0,0.20,0.05,00B050,O9D,2.1
20,2,0,0.9,-0.3,0.2,FFFFFF,A0V,0.03
";
    const VECTORS: &str = "\
1,1,B1A,1,O9D
2,2,A0V,1,B1A
";

    fn table(data: &str) -> Table {
        Table::from_reader(data.as_bytes()).unwrap()
    }

    fn build(stars: &str, vectors: &str) -> Result<Firmament> {
        Firmament::from_tables(&table(stars), &table(vectors), &table(CONSTELLATIONS))
    }

    #[test]
    fn three_pass_construction() {
        let f = build(STARS, VECTORS).unwrap();
        assert_eq!(f.len(), 2);
        assert_eq!(f.star_count(), 3);
        assert_eq!(f.vector_count(), 2);

        let ori = f.get(1).unwrap();
        assert_eq!(ori.abbreviation(), "Ori");
        assert_eq!(ori.len(), 2);
        assert_eq!(ori.get("O9D").map(Star::index), Some(11));

        // A cross-constellation line belongs to the row's cindex and color.
        let lyr = f.get(2).unwrap();
        assert_eq!(lyr.vectors().len(), 1);
        assert_eq!(lyr.vectors()[0].color(), Palette::Pink.color());
        assert_eq!(
            lyr.frame(),
            &Matrix::from_rows([[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
        );
    }

    #[test]
    fn constellations_keep_table_order() {
        let constellations = "\
5,Cygnus,Cyg,1,0,0,0,1,0,0,0,1,FFFFFF
2,Lyra,Lyr,1,0,0,0,1,0,0,0,1,FF66FF
9,Aquila,Aql,1,0,0,0,1,0,0,0,1,FF0000
2,Lyra,Lyr,1,0,0,0,1,0,0,0,1,00B050
";
        let f = Firmament::from_tables(&table(""), &table(""), &table(constellations)).unwrap();
        let order: Vec<u32> = f.constellations().map(Constellation::cindex).collect();
        // A repeated cindex replaces the entry but keeps its first slot.
        assert_eq!(order, vec![5, 2, 9]);
        assert_eq!(f.get(2).unwrap().color(), Palette::Green.color());
        assert_eq!(f.len(), 3);
    }

    #[test]
    fn star_with_unknown_constellation_is_fatal() {
        let err = build("10,9,0,1.0,0.1,0.0,FF0000,B1A,0.5\n", "").unwrap_err();
        assert!(
            err.to_string().contains("unknown constellation 9"),
            "{err:#}"
        );
    }

    #[test]
    fn dangling_vector_endpoint_is_fatal() {
        let err = build(STARS, "1,1,B1A,1,XXX\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("target"), "{msg}");
        assert!(msg.contains("\"XXX\" not found in constellation 1"), "{msg}");

        // The designation exists, but in another constellation.
        assert!(build(STARS, "1,2,B1A,1,O9D\n").is_err());
        assert!(build(STARS, "7,1,B1A,1,O9D\n").is_err());
    }

    #[test]
    fn malformed_star_row_is_fatal() {
        let err = build("10,1,0,1.0,abc,0.0,FF0000,B1A,0.5\n", "").unwrap_err();
        assert!(format!("{err:#}").contains("Star table row 1"), "{err:#}");
    }

    #[test]
    fn rotate_all_moves_every_star() {
        let mut f = build(STARS, VECTORS).unwrap();
        let flip = Matrix::from_rows([[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 1.0]]);
        f.rotate_all(&flip).unwrap();
        for star in f.constellations().flat_map(Constellation::stars) {
            let c = star.cartesian();
            let w = star.working_position();
            assert_eq!((w.x, w.y, w.z), (-c.x, -c.y, c.z));
        }
    }
}
