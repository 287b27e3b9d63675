//! Interface to the volume collaborator that owns the 3D sample grid.
//!
//! The collaborator is the only party that changes slice geometry. Every
//! navigation command returns whether anything actually moved; commands at
//! a volume boundary are silent no-ops that return `false`.

use ndarray::Array2;

use crate::crosshair::CrosshairLine;
use crate::enums::Orientation;

/// Calibration reported once when a view attaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelInfo {
    /// Number of sample rows in every slice buffer.
    pub sample_grid: f32,
    pub rescale_slope: f32,
    pub rescale_intercept: f32,
    pub min_valid: f32,
    pub max_valid: f32,
}

/// World position and raw value under a slice sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    pub world: (i32, i32, i32),
    pub raw: i32,
}

pub trait DataCube {
    fn pixel_info(&self) -> PixelInfo;

    /// Fill `out` (rows = `sample_grid`, columns = 7/4 of that) with the raw
    /// samples of the requested slice.
    fn slice(&self, orientation: Orientation, out: &mut Array2<i32>);

    fn line_info(&self, orientation: Orientation) -> CrosshairLine;

    fn coord(&self, orientation: Orientation, x: i32, y: i32) -> Probe;

    fn move_center(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool;

    /// Move the plane perpendicular to `axis`, as seen from `orientation`.
    fn move_slice(&mut self, orientation: Orientation, axis: Orientation, delta: f32) -> bool;

    fn rotate_slice(&mut self, orientation: Orientation, delta_rad: f32) -> bool;

    fn zoom_slice(&mut self, orientation: Orientation, delta_y: i32) -> bool;

    fn slice_panning(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool;

    fn toggle_border_line(&mut self, orientation: Orientation);
}
