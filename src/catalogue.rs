//! Tabular catalogue input.
//!
//! The chart is built from three header-less CSV tables:
//!
//! | Table | Columns |
//! |---|---|
//! | constellations | `cindex, name, abbreviation, R11, R12, R13, R21, R22, R23, R31, R32, R33, rgb` |
//! | stars | `index, cindex, sindex, x, y, z, rgb, designation, magnitude` |
//! | vectors | `cindex, origin cindex, origin designation, target cindex, target designation` |
//!
//! `rgb` is a 6-digit hex color. Fields are trimmed; blank lines are skipped.
//! Any malformed field or wrong column count is an error.

use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use anyhow::{ensure, Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use nalgebra::Vector3;

use crate::color::Color;
use crate::constellation::Constellation;
use crate::matrix::Matrix;
use crate::star::Star;

pub const CONSTELLATION_COLUMNS: usize = 13;
pub const STAR_COLUMNS: usize = 9;
pub const VECTOR_COLUMNS: usize = 5;

/// Rows of string fields read from a header-less CSV source.
#[derive(Debug, Clone, Default)]
pub struct Table {
    rows: Vec<StringRecord>,
}

impl Table {
    fn builder() -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true).trim(Trim::All);
        builder
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = Self::builder()
            .from_path(path)
            .with_context(|| format!("Failed to open table {}", path.display()))?;
        Self::collect(reader).with_context(|| format!("Failed to read table {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::collect(Self::builder().from_reader(reader))
    }

    fn collect<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let rows = reader
            .records()
            .collect::<Result<Vec<StringRecord>, csv::Error>>()?;
        Ok(Self { rows })
    }

    /// `(rows, columns)`, where columns is the width of the first row.
    pub fn size(&self) -> (usize, usize) {
        (self.rows.len(), self.rows.first().map_or(0, StringRecord::len))
    }

    /// Field at column `col` of row `row`.
    pub fn value(&self, col: usize, row: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A vector row before its endpoints are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRecord {
    /// Constellation that owns the line.
    pub cindex: u32,
    pub origin_cindex: u32,
    pub origin: String,
    pub target_cindex: u32,
    pub target: String,
}

fn expect_columns(record: &StringRecord, expected: usize) -> Result<()> {
    ensure!(
        record.len() == expected,
        "expected {} columns, found {}",
        expected,
        record.len()
    );
    Ok(())
}

fn field<T>(record: &StringRecord, idx: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = record
        .get(idx)
        .with_context(|| format!("missing field {name}"))?;
    raw.parse::<T>()
        .with_context(|| format!("invalid {name} {raw:?}"))
}

pub fn parse_constellation(record: &StringRecord) -> Result<Constellation> {
    expect_columns(record, CONSTELLATION_COLUMNS)?;
    let mut r = [[0.0; 3]; 3];
    for (k, cell) in r.iter_mut().flatten().enumerate() {
        let name = format!("R{}{}", k / 3 + 1, k % 3 + 1);
        *cell = field(record, 3 + k, &name)?;
    }
    Ok(Constellation::new(
        field(record, 0, "cindex")?,
        field::<String>(record, 1, "name")?,
        field::<String>(record, 2, "abbreviation")?,
        Matrix::from_rows(r),
        field::<Color>(record, 12, "rgb")?,
    ))
}

pub fn parse_star(record: &StringRecord) -> Result<Star> {
    expect_columns(record, STAR_COLUMNS)?;
    Ok(Star::new(
        field(record, 0, "index")?,
        field(record, 1, "cindex")?,
        field(record, 2, "sindex")?,
        Vector3::new(
            field(record, 3, "x")?,
            field(record, 4, "y")?,
            field(record, 5, "z")?,
        ),
        field::<Color>(record, 6, "rgb")?,
        field::<String>(record, 7, "designation")?,
        field(record, 8, "magnitude")?,
    ))
}

pub fn parse_vector(record: &StringRecord) -> Result<VectorRecord> {
    expect_columns(record, VECTOR_COLUMNS)?;
    Ok(VectorRecord {
        cindex: field(record, 0, "cindex")?,
        origin_cindex: field(record, 1, "origin cindex")?,
        origin: field(record, 2, "origin designation")?,
        target_cindex: field(record, 3, "target cindex")?,
        target: field(record, 4, "target designation")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;

    fn table(data: &str) -> Table {
        Table::from_reader(data.as_bytes()).unwrap()
    }

    #[test]
    fn table_reads_headerless_rows() {
        let t = table("1, Orion ,Ori\n\n2,Lyra,Lyr\n");
        assert_eq!(t.size(), (2, 3));
        assert_eq!(t.value(1, 0), Some("Orion"));
        assert_eq!(t.value(2, 1), Some("Lyr"));
        assert_eq!(t.value(3, 1), None);
        assert_eq!(t.value(0, 5), None);
        assert_eq!(t.iter().count(), t.len());
        assert!(Table::default().is_empty());
    }

    #[test]
    fn parses_constellation_row() {
        let t = table("4,Orion,Ori,1,0,0,0,0,1,0,-1,0,5DB3CB\n");
        let c = parse_constellation(&t.rows()[0]).unwrap();
        assert_eq!(c.cindex(), 4);
        assert_eq!(c.name(), "Orion");
        assert_eq!(c.abbreviation(), "Ori");
        assert_eq!(c.color(), Palette::Turquoise.color());
        assert_eq!(
            c.frame(),
            &Matrix::from_rows([[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]])
        );
    }

    #[test]
    fn parses_star_row() {
        let t = table("12,4,0,0.5,-0.25,0.1,FF0000,B2III,1.64\n");
        let s = parse_star(&t.rows()[0]).unwrap();
        assert_eq!((s.index(), s.cindex(), s.sindex()), (12, 4, 0));
        assert_eq!(s.cartesian(), Vector3::new(0.5, -0.25, 0.1));
        assert_eq!(s.color(), Palette::Red.color());
        assert_eq!(s.designation(), "B2III");
        assert_eq!(s.designation_color(), Palette::Brown.color());
        assert_eq!(s.size(), 5.0);
    }

    #[test]
    fn parses_vector_row() {
        let t = table("4,4,B2III,5,A0V\n");
        let v = parse_vector(&t.rows()[0]).unwrap();
        assert_eq!(
            v,
            VectorRecord {
                cindex: 4,
                origin_cindex: 4,
                origin: "B2III".into(),
                target_cindex: 5,
                target: "A0V".into(),
            }
        );
    }

    #[test]
    fn malformed_rows_are_errors() {
        let t = table("12,4,0,0.5,oops,0.1,FF0000,B2III,1.64\n12,4,0\n1,1,a,1,b\n");
        let err = parse_star(&t.rows()[0]).unwrap_err();
        assert!(format!("{err:#}").contains("invalid y"), "{err:#}");
        let err = parse_star(&t.rows()[1]).unwrap_err();
        assert!(err.to_string().contains("expected 9 columns"), "{err}");
        assert!(parse_constellation(&t.rows()[2]).is_err());
    }

    #[test]
    fn bad_color_is_an_error() {
        let t = table("12,4,0,0.5,0.2,0.1,XYZ,B2III,1.64\n");
        let err = parse_star(&t.rows()[0]).unwrap_err();
        assert!(format!("{err:#}").contains("invalid rgb"), "{err:#}");
    }
}
