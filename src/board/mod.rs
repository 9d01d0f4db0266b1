//! Board image decoding.
//!
//! This module provides:
//! - Cell border isolation and square contour detection
//! - Row grouping and solid cell painting
//! - Fixed-stride rasterization into a `GridMatrix`

pub mod contours;
pub mod raster;

pub use raster::GridMatrix;

use image::GrayImage;

use crate::config::PipelineConfig;
use crate::error::GeometryError;
use contours::{find_cell_boxes, group_rows, paint_cells, threshold_band};
use raster::rasterize;

/// Result of decoding one board image.
#[derive(Debug, Clone)]
pub struct DecodedBoard {
    pub grid: GridMatrix,
    /// Painted mask with visited cells flipped
    pub mask: GrayImage,
    /// Number of rows found by contour grouping
    pub detected_rows: usize,
    /// Number of accepted square contours
    pub detected_cells: usize,
}

/// High-level function: grayscale board → occupancy matrix.
///
/// Thresholds on the grid-line band, paints every near-square external contour
/// solid, then samples the mask on the configured stride.
pub fn decode_board(image: &GrayImage, config: &PipelineConfig) -> Result<DecodedBoard, GeometryError> {
    let mut mask = threshold_band(image, config.grid_gray, config.band_tolerance);

    let boxes = find_cell_boxes(&mask, config.aspect_min, config.aspect_max);
    let detected_cells = boxes.len();
    let rows = group_rows(boxes, config.row_tolerance);
    paint_cells(&mut mask, &rows);

    let grid = rasterize(&mut mask, config)?;

    Ok(DecodedBoard {
        grid,
        mask,
        detected_rows: rows.len(),
        detected_cells,
    })
}
