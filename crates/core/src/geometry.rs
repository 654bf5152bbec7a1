//! Canvas sizing and coordinate projection.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Region, REGION_SCALE};

/// Output drawing surface for one image's slide, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: f64,
    pub height: f64,
}

impl CanvasSpec {
    /// Size a canvas of the given width to the source image's aspect ratio.
    pub fn for_source(canvas_width: f64, width_px: f64, height_px: f64) -> Result<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width_px) || !valid(height_px) {
            return Err(Error::InvalidDimensions {
                width: width_px,
                height: height_px,
            });
        }
        if !valid(canvas_width) {
            return Err(Error::InvalidInput(format!(
                "canvas width must be positive, got {canvas_width}"
            )));
        }

        let aspect = width_px / height_px;
        Ok(Self {
            width: canvas_width,
            height: canvas_width / aspect,
        })
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// A rectangle covering the whole canvas.
    pub fn full_frame(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Axis-aligned rectangle in canvas units, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow by `dx` on the left and right and `dy` on the top and bottom.
    pub fn padded(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            w: self.w + 2.0 * dx,
            h: self.h + 2.0 * dy,
        }
    }

    /// Scale width and height by `factor` while keeping the center fixed.
    pub fn scaled_about_center(&self, factor: f64) -> Self {
        let dx = self.w * (factor - 1.0) / 2.0;
        let dy = self.h * (factor - 1.0) / 2.0;
        self.padded(dx, dy)
    }
}

/// Project a normalized 0–1000 region onto the canvas.
pub fn project_region(region: &Region, canvas: &CanvasSpec) -> Rect {
    Rect {
        x: region.left / REGION_SCALE * canvas.width,
        y: region.top / REGION_SCALE * canvas.height,
        w: region.width() / REGION_SCALE * canvas.width,
        h: region.height() / REGION_SCALE * canvas.height,
    }
}
