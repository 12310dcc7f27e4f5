//! Raster star charts.
//!
//! Each render mode picks a reference frame, rotates every star into it,
//! projects it onto the canvas and draws a filled circle of the star's
//! display size. Stars that project off-canvas are skipped.
//!
//! | Mode | Frame | Background | Star color |
//! |---|---|---|---|
//! | 0 `TrueColor` | reference constellation | `background` | catalogue color |
//! | 1 `Constellation` | reference constellation | `background` | owning constellation's color |
//! | 2 `Designation` | reference constellation | `background` | designation color in the reference constellation, white elsewhere |
//! | 3 `Pages` | preset orientation | `page_background` | `page_ink` |
//! | 4 `Figures` | preset orientation | `background` | catalogue color, over constellation lines |
//!
//! Requires the `image` feature.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::RgbImage;
use tracing::{debug, info};

use crate::color::{Color, Palette};
use crate::firmament::Firmament;
use crate::matrix::Matrix;
use crate::star::{Pixel, Star, CANVAS_SIZE};

const H: f64 = 0.866025403784;
const S: f64 = 0.57735026919;
const T: f64 = 0.707106781187;
const Q: f64 = 0.408248290464;
const W: f64 = 0.816496580928;

/// Fixed orientations for all-sky paging, indexed 0-15.
pub const PRESET_ORIENTATIONS: [[[f64; 3]; 3]; 16] = [
    [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, -1.0, 0.0]],
    [[0.5, H, 0.0], [0.0, 0.0, 1.0], [H, -0.5, 0.0]],
    [[-0.5, H, 0.0], [0.0, 0.0, 1.0], [H, 0.5, 0.0]],
    [[-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
    [[-0.5, -H, 0.0], [0.0, 0.0, 1.0], [-H, 0.5, 0.0]],
    [[0.5, -H, 0.0], [0.0, 0.0, 1.0], [-H, -0.5, 0.0]],
    [[S, S, S], [-T, 0.0, T], [Q, -W, Q]],
    [[-S, S, S], [T, 0.0, T], [Q, W, -Q]],
    [[-S, -S, S], [T, 0.0, T], [-Q, W, Q]],
    [[S, -S, S], [-T, 0.0, T], [-Q, -W, -Q]],
    [[S, S, -S], [T, 0.0, T], [Q, -W, -Q]],
    [[-S, S, -S], [-T, 0.0, T], [Q, W, Q]],
    [[-S, -S, -S], [-T, 0.0, T], [-Q, W, -Q]],
    [[S, -S, -S], [T, 0.0, T], [-Q, -W, Q]],
    [[0.0, 0.0, 1.0], [-1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
    [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0]],
];

/// Preset orientation `index`, if it exists.
pub fn preset_orientation(index: usize) -> Option<Matrix> {
    PRESET_ORIENTATIONS.get(index).copied().map(Matrix::from_rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    TrueColor,
    Constellation,
    Designation,
    Pages,
    Figures,
}

impl TryFrom<u8> for RenderMode {
    type Error = anyhow::Error;

    fn try_from(mode: u8) -> Result<Self> {
        Ok(match mode {
            0 => RenderMode::TrueColor,
            1 => RenderMode::Constellation,
            2 => RenderMode::Designation,
            3 => RenderMode::Pages,
            4 => RenderMode::Figures,
            _ => bail!("Unknown render mode {mode}; expected 0-4"),
        })
    }
}

/// Colors and line style for rendered charts.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Canvas fill for modes 0, 1, 2 and 4.
    /// Default: black
    pub background: Color,

    /// Canvas fill for paging mode.
    /// Default: white
    pub page_background: Color,

    /// Star color for paging mode.
    /// Default: black
    pub page_ink: Color,

    /// Width of constellation lines in pixels.
    /// Default: 1
    pub line_width: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            background: Palette::Black.color(),
            page_background: Palette::White.color(),
            page_ink: Palette::Black.color(),
            line_width: 1,
        }
    }
}

/// RGB drawing surface.
///
/// A [`Pixel`]'s `x` selects the image row and `y` the column. Shapes are
/// clipped at the canvas edge.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, background.into()),
        }
    }

    /// A `CANVAS_SIZE`² canvas.
    pub fn chart(background: Color) -> Self {
        Self::new(CANVAS_SIZE, CANVAS_SIZE, background)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Color at `pixel`, or `None` outside the canvas.
    pub fn pixel(&self, pixel: Pixel) -> Option<Color> {
        self.image
            .get_pixel_checked(pixel.y, pixel.x)
            .map(|p| Color::new(p[0], p[1], p[2]))
    }

    fn put(&mut self, row: i64, col: i64, color: Color) {
        let (Ok(row), Ok(col)) = (u32::try_from(row), u32::try_from(col)) else {
            return;
        };
        if row < self.height() && col < self.width() {
            self.image.put_pixel(col, row, color.into());
        }
    }

    fn disc(&mut self, row: i64, col: i64, radius: f64, color: Color) {
        let radius = radius.max(0.0);
        let reach = radius.floor() as i64;
        let r2 = radius * radius;
        for dr in -reach..=reach {
            for dc in -reach..=reach {
                if ((dr * dr + dc * dc) as f64) <= r2 {
                    self.put(row + dr, col + dc, color);
                }
            }
        }
    }

    /// Filled circle of `radius` pixels centred on `center`.
    pub fn draw_circle(&mut self, center: Pixel, radius: f64, color: Color) {
        self.disc(center.x as i64, center.y as i64, radius, color);
    }

    /// Straight line of roughly `width` pixels between two points.
    pub fn draw_line(&mut self, from: Pixel, to: Pixel, width: u32, color: Color) {
        let (r0, c0) = (from.x as f64, from.y as f64);
        let (r1, c1) = (to.x as f64, to.y as f64);
        let steps = (r1 - r0).abs().max((c1 - c0).abs()).ceil().max(1.0) as i64;
        let radius = (width.max(1) as f64 - 1.0) / 2.0;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let row = (r0 + t * (r1 - r0)).round() as i64;
            let col = (c0 + t * (c1 - c0)).round() as i64;
            self.disc(row, col, radius, color);
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image
            .save(path)
            .with_context(|| format!("Failed to save chart to {}", path.display()))
    }
}

impl Firmament {
    /// Render a chart and save it to `path`.
    ///
    /// `reference` is a constellation id for modes 0-2 and a preset index
    /// for modes 3-4. A negative reference draws nothing and returns
    /// `Ok(false)`.
    pub fn render<P: AsRef<Path>>(
        &mut self,
        mode: RenderMode,
        reference: i64,
        path: P,
        config: &ChartConfig,
    ) -> Result<bool> {
        let Some(canvas) = self.draw(mode, reference, config)? else {
            return Ok(false);
        };
        canvas.save(path.as_ref())?;
        info!("Saved {:?} chart to {}", mode, path.as_ref().display());
        Ok(true)
    }

    /// Render a chart into a new canvas without saving it.
    pub fn draw(
        &mut self,
        mode: RenderMode,
        reference: i64,
        config: &ChartConfig,
    ) -> Result<Option<Canvas>> {
        if reference < 0 {
            debug!("Negative reference {}; nothing to draw", reference);
            return Ok(None);
        }

        let canvas = match mode {
            RenderMode::TrueColor => {
                let frame = self.reference_frame(reference)?;
                let mut canvas = Canvas::chart(config.background);
                self.draw_stars(&mut canvas, &frame, |_, _, star| star.color())?;
                canvas
            }
            RenderMode::Constellation => {
                let frame = self.reference_frame(reference)?;
                let mut canvas = Canvas::chart(config.background);
                self.draw_stars(&mut canvas, &frame, |_, owner_color, _| owner_color)?;
                canvas
            }
            RenderMode::Designation => {
                let frame = self.reference_frame(reference)?;
                let mut canvas = Canvas::chart(config.background);
                self.draw_stars(&mut canvas, &frame, |cindex, _, star| {
                    if cindex as i64 == reference {
                        star.designation_color()
                    } else {
                        Palette::White.color()
                    }
                })?;
                canvas
            }
            RenderMode::Pages => {
                let frame = preset_frame(reference)?;
                let mut canvas = Canvas::chart(config.page_background);
                let ink = config.page_ink;
                self.draw_stars(&mut canvas, &frame, |_, _, _| ink)?;
                canvas
            }
            RenderMode::Figures => {
                let frame = preset_frame(reference)?;
                let mut canvas = Canvas::chart(config.background);
                self.draw_figures(&mut canvas, &frame, config.line_width)?;
                self.draw_stars(&mut canvas, &frame, |_, _, star| star.color())?;
                canvas
            }
        };
        Ok(Some(canvas))
    }

    fn reference_frame(&self, reference: i64) -> Result<Matrix> {
        let frame = u32::try_from(reference)
            .ok()
            .and_then(|cindex| self.get(cindex))
            .map(|c| c.frame().clone())
            .with_context(|| format!("Unknown reference constellation {reference}"))?;
        Ok(frame)
    }

    fn draw_stars<F>(&mut self, canvas: &mut Canvas, frame: &Matrix, color_of: F) -> Result<()>
    where
        F: Fn(u32, Color, &Star) -> Color,
    {
        let (mut drawn, mut clipped) = (0usize, 0usize);
        for constellation in self.constellations_mut() {
            let (cindex, owner_color) = (constellation.cindex(), constellation.color());
            for star in constellation.stars_mut() {
                star.rotate(frame)?;
                match star.position()? {
                    Some(pixel) => {
                        canvas.draw_circle(pixel, star.size(), color_of(cindex, owner_color, star));
                        drawn += 1;
                    }
                    None => clipped += 1,
                }
            }
        }
        debug!("Drew {} stars, {} off-canvas", drawn, clipped);
        Ok(())
    }

    fn draw_figures(&self, canvas: &mut Canvas, frame: &Matrix, width: u32) -> Result<()> {
        let mut drawn = 0usize;
        for vector in self.constellations().flat_map(|c| c.vectors()) {
            if let Some((from, to)) = vector.project(frame)? {
                canvas.draw_line(from, to, width, vector.color());
                drawn += 1;
            }
        }
        debug!("Drew {} of {} constellation lines", drawn, self.vector_count());
        Ok(())
    }
}

fn preset_frame(reference: i64) -> Result<Matrix> {
    usize::try_from(reference)
        .ok()
        .and_then(preset_orientation)
        .with_context(|| {
            format!(
                "Preset orientation {reference} out of range 0-{}",
                PRESET_ORIENTATIONS.len() - 1
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_rotations() {
        for (i, preset) in PRESET_ORIENTATIONS.iter().enumerate() {
            let m = Matrix::from_rows(*preset);
            let rrt = &m * &m.transpose();
            assert!(
                rrt.approx_eq(&Matrix::identity(3), 5),
                "preset {i} is not orthonormal"
            );
        }
        assert!(preset_orientation(15).is_some());
        assert!(preset_orientation(16).is_none());
    }

    #[test]
    fn mode_from_index() {
        assert_eq!(RenderMode::try_from(0).unwrap(), RenderMode::TrueColor);
        assert_eq!(RenderMode::try_from(3).unwrap(), RenderMode::Pages);
        assert_eq!(RenderMode::try_from(4).unwrap(), RenderMode::Figures);
        assert!(RenderMode::try_from(5).is_err());
    }

    #[test]
    fn circle_is_filled_and_clipped() {
        let bg = Palette::Black.color();
        let red = Palette::Red.color();
        let mut canvas = Canvas::new(20, 10, bg);
        canvas.draw_circle(Pixel { x: 5, y: 5 }, 2.0, red);
        assert_eq!(canvas.pixel(Pixel { x: 5, y: 5 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 7, y: 5 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 5, y: 3 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 7, y: 7 }), Some(bg));

        // Partially off the bottom edge; x is the row.
        canvas.draw_circle(Pixel { x: 9, y: 18 }, 3.0, red);
        assert_eq!(canvas.pixel(Pixel { x: 9, y: 18 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 10, y: 18 }), None);
    }

    #[test]
    fn circle_clips_at_top_left_corner() {
        let bg = Palette::Black.color();
        let red = Palette::Red.color();
        let mut canvas = Canvas::new(8, 8, bg);
        canvas.draw_circle(Pixel { x: 0, y: 0 }, 3.0, red);
        assert_eq!(canvas.pixel(Pixel { x: 0, y: 0 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 3, y: 0 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 0, y: 3 }), Some(red));
        assert_eq!(canvas.pixel(Pixel { x: 3, y: 3 }), Some(bg));
        assert_eq!(canvas.pixel(Pixel { x: 7, y: 7 }), Some(bg));
    }

    #[test]
    fn half_pixel_radius_marks_one_pixel() {
        let mut canvas = Canvas::new(5, 5, Color::default());
        canvas.draw_circle(Pixel { x: 2, y: 2 }, 0.5, Palette::White.color());
        let lit = canvas.image().pixels().filter(|p| p[0] == 255).count();
        assert_eq!(lit, 1);
    }

    #[test]
    fn line_connects_endpoints() {
        let bg = Color::default();
        let ink = Palette::Green.color();
        let mut canvas = Canvas::new(30, 30, bg);
        canvas.draw_line(Pixel { x: 2, y: 3 }, Pixel { x: 20, y: 25 }, 1, ink);
        assert_eq!(canvas.pixel(Pixel { x: 2, y: 3 }), Some(ink));
        assert_eq!(canvas.pixel(Pixel { x: 20, y: 25 }), Some(ink));
        assert_eq!(canvas.pixel(Pixel { x: 25, y: 2 }), Some(bg));

        let mut wide = Canvas::new(30, 30, bg);
        wide.draw_line(Pixel { x: 10, y: 2 }, Pixel { x: 10, y: 20 }, 3, ink);
        assert_eq!(wide.pixel(Pixel { x: 11, y: 10 }), Some(ink));
        assert_eq!(wide.pixel(Pixel { x: 9, y: 10 }), Some(ink));
        assert_eq!(wide.pixel(Pixel { x: 13, y: 10 }), Some(bg));
    }

    #[test]
    fn chart_canvas_has_fixed_size() {
        let canvas = Canvas::chart(Palette::White.color());
        assert_eq!((canvas.width(), canvas.height()), (CANVAS_SIZE, CANVAS_SIZE));
    }
}
