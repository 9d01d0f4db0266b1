//! Fixed-stride sampling of a painted cell mask into an occupancy matrix.

use image::GrayImage;

use crate::config::PipelineConfig;
use crate::error::GeometryError;

/// Rectangular occupancy table, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMatrix {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl GridMatrix {
    /// Builds a matrix from rows, rejecting any row whose length differs from the first.
    #[cfg(test)]
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, GeometryError> {
        let mut builder = GridBuilder::default();
        for row in rows {
            builder.push_row(row)?;
        }
        Ok(builder.finish())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major `'1'`/`'0'` string with no separators.
    pub fn bitstring(&self) -> String {
        self.cells.iter().map(|&c| if c { '1' } else { '0' }).collect()
    }
}

/// Accumulates rows while enforcing a constant row width.
#[derive(Debug, Default)]
struct GridBuilder {
    width: Option<usize>,
    height: usize,
    cells: Vec<bool>,
}

impl GridBuilder {
    fn push_row(&mut self, row: Vec<bool>) -> Result<(), GeometryError> {
        match self.width {
            None => self.width = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(GeometryError::RaggedRow {
                    row: self.height,
                    expected,
                    found: row.len(),
                });
            }
            Some(_) => {}
        }
        self.cells.extend(row);
        self.height += 1;
        Ok(())
    }

    fn finish(self) -> GridMatrix {
        GridMatrix {
            width: self.width.unwrap_or(0),
            height: self.height,
            cells: self.cells,
        }
    }
}

/// Samples one pixel per cell on a fixed stride.
///
/// The first sample sits at `cell_size / 2 + first_anchor` on both axes; every
/// later row restarts its column at `cell_size / 2 + row_anchor`. After each
/// sample a `marker_size` square is flipped in `mask` so visited cells show up
/// in debug dumps. Each point is sampled once, before it is flipped.
///
/// `config` must have passed [`PipelineConfig::validate`]; a zero stride never
/// advances.
pub fn rasterize(mask: &mut GrayImage, config: &PipelineConfig) -> Result<GridMatrix, GeometryError> {
    let (width, height) = mask.dimensions();
    let stride = config.stride();
    let half = config.cell_size / 2;

    let mut builder = GridBuilder::default();
    let mut cx = half.saturating_add(config.first_anchor);
    let mut cy = half.saturating_add(config.first_anchor);

    while cy < height {
        let mut row = Vec::new();
        while cx < width {
            row.push(mask.get_pixel(cx, cy)[0] != 0);
            flip_marker(mask, cx, cy, config.marker_size);
            cx = cx.saturating_add(stride);
        }
        builder.push_row(row)?;
        cx = half.saturating_add(config.row_anchor);
        cy = cy.saturating_add(stride);
    }

    Ok(builder.finish())
}

/// XORs a `size`×`size` square starting at `(x, y)` with 255, clipped to the image.
fn flip_marker(mask: &mut GrayImage, x: u32, y: u32, size: u32) {
    let (width, height) = mask.dimensions();
    for py in y..y.saturating_add(size).min(height) {
        for px in x..x.saturating_add(size).min(width) {
            let pixel = mask.get_pixel_mut(px, py);
            pixel[0] ^= 255;
        }
    }
}
