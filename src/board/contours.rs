//! Cell detection on a board image.
//!
//! Isolates the drawn cell borders by intensity, keeps near-square external
//! contours, groups them into rows and paints every accepted cell solid so the
//! rasterizer can sample cell interiors reliably.

use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Axis-aligned bounding box of one detected cell, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CellBox {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Cells that fell into the same vertical bucket, left to right.
#[derive(Debug, Clone)]
pub struct CellRow {
    pub cells: Vec<CellBox>,
}

/// Binarizes an image on an intensity band around `gray`.
///
/// Pixels within `gray * (1 - tolerance) ..= gray * (1 + tolerance)` become 255,
/// all others 0.
pub fn threshold_band(img: &GrayImage, gray: u8, tolerance: f32) -> GrayImage {
    let lower = gray as f32 * (1.0 - tolerance);
    let upper = gray as f32 * (1.0 + tolerance);
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let v = pixel[0] as f32;
        if v >= lower && v <= upper {
            output.put_pixel(x, y, Luma([255]));
        }
    }

    output
}

/// Finds the bounding boxes of all external contours that are near-perfect squares.
///
/// Boxes use inclusive extents, so a contour spanning columns 10..=69 is 60 wide.
/// Anything outside `[aspect_min, aspect_max]` is dropped silently.
pub fn find_cell_boxes(mask: &GrayImage, aspect_min: f64, aspect_max: f64) -> Vec<CellBox> {
    find_contours::<u32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|contour| {
            let first = contour.points.first()?;
            let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
            for p in &contour.points {
                min_x = min_x.min(p.x);
                min_y = min_y.min(p.y);
                max_x = max_x.max(p.x);
                max_y = max_y.max(p.y);
            }
            Some(CellBox {
                x: min_x,
                y: min_y,
                width: max_x - min_x + 1,
                height: max_y - min_y + 1,
            })
        })
        .filter(|b| {
            let ratio = b.aspect_ratio();
            ratio >= aspect_min && ratio <= aspect_max
        })
        .collect()
}

/// Orders boxes by `(y / tolerance, x)` and splits them into rows.
///
/// Two rows whose `y` straddle a bucket boundary can be split or merged; the
/// layout constants are tuned against this bucketing.
pub fn group_rows(mut boxes: Vec<CellBox>, tolerance: u32) -> Vec<CellRow> {
    let tolerance = tolerance.max(1);
    boxes.sort_by_key(|b| (b.y / tolerance, b.x));

    boxes
        .chunk_by(|a, b| a.y / tolerance == b.y / tolerance)
        .map(|cells| CellRow {
            cells: cells.to_vec(),
        })
        .collect()
}

/// Paints every cell as a filled rectangle covering `(x, y)..=(x + w, y + h)`.
pub fn paint_cells(mask: &mut GrayImage, rows: &[CellRow]) {
    for cell in rows.iter().flat_map(|r| r.cells.iter()) {
        let rect = Rect::at(cell.x as i32, cell.y as i32).of_size(cell.width + 1, cell.height + 1);
        draw_filled_rect_mut(mask, rect, Luma([255]));
    }
}
