//! Coordinate normalization between logical and device space

use strata_core::{Matrix, Rect};

use crate::config::{Origin, PixelOffsetMode, SurfaceConfig};

/// Kind of paint operation, for pixel-grid alignment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintMode {
    Fill,
    Stroke,
}

/// Maps logical coordinates onto a native surface
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateSystem {
    origin: Origin,
    pixel_offset: PixelOffsetMode,
    scale_factor: f64,
    /// Logical surface height, the flip axis for bottom-left origins
    height: f64,
}

impl CoordinateSystem {
    pub fn new(config: &SurfaceConfig, bounds: Rect) -> Self {
        Self {
            origin: config.origin,
            pixel_offset: config.pixel_offset,
            scale_factor: config.scale_factor,
            height: bounds.height(),
        }
    }

    /// Transform every fresh native session starts from
    ///
    /// Logical coordinates are flipped first (bottom-left surfaces only), then
    /// scaled to device pixels.
    pub fn initial_transform(&self) -> Matrix {
        let scale = Matrix::scale(self.scale_factor, self.scale_factor);
        match self.origin {
            Origin::TopLeft => scale,
            Origin::BottomLeft => {
                scale.multiply(&Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, self.height))
            }
        }
    }

    /// Device-space offset applied to a paint operation
    pub fn pixel_offset(&self, mode: PaintMode) -> (f64, f64) {
        match (self.pixel_offset, mode) {
            (PixelOffsetMode::None, PaintMode::Stroke) => (0.5, 0.5),
            _ => (0.0, 0.0),
        }
    }

    /// Full logical-to-device transform for painting with `local` active
    pub fn paint_transform(&self, local: &Matrix, mode: PaintMode) -> Matrix {
        let device = self.initial_transform().multiply(local);
        let (dx, dy) = self.pixel_offset(mode);
        if dx == 0.0 && dy == 0.0 {
            device
        } else {
            device.then(&Matrix::translate(dx, dy))
        }
    }
}
