//! Axis-aligned volume collaborator.
//!
//! Slices are resampled on an isotropic grid, so voxels are square in every
//! view whatever the slice thickness. All three views share one crosshair
//! centre; each view keeps its own zoom, origin and border flag. Oblique
//! reslicing is not supported, so rotation requests are always refused.

use crate::crosshair::CrosshairLine;
use crate::cube::{DataCube, PixelInfo, Probe};
use crate::enums::{Interpolation, Orientation};
use crate::interpolator::Interpolator;
use crate::mapper;

use ndarray::Array2;
use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Zip;
use ndarray::s;

pub const MIN_ZOOM: f32 = 0.25;
pub const MAX_ZOOM: f32 = 8.0;
/// Zoom factor per pixel of vertical pointer motion, applied exponentially.
const ZOOM_RATE: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
struct ViewTransform {
    zoom: f32,
    /// Plane position shown at the buffer centre, isotropic units.
    origin: (f32, f32),
    border: bool,
}

pub struct Volume {
    pub data: Array3<i16>,
    pub spacing: (f32, f32, f32),
    pub interpolated_dim: (u32, u32, u32),
    pub interpolation: Interpolation,
    rescale: (f32, f32),
    value_range: (i16, i16),
    /// Crosshair centre in isotropic units, indexed by `Orientation::axis_index`.
    center: [f32; 3],
    views: [ViewTransform; 3],
}

impl Volume {
    pub fn new(data: Array3<i16>, spacing: (f32, f32, f32)) -> Self {
        let original_dim = data.dim();
        let interpolated_dim = Interpolator::get_isotropic_dimensions(spacing, original_dim);
        let value_range = (
            data.iter().copied().min().unwrap_or(0),
            data.iter().copied().max().unwrap_or(0),
        );

        let mut volume = Self {
            data,
            spacing,
            interpolated_dim,
            interpolation: Interpolation::default(),
            rescale: (1.0, 0.0),
            value_range,
            center: [0.0; 3],
            views: [ViewTransform {
                zoom: 1.0,
                origin: (0.0, 0.0),
                border: false,
            }; 3],
        };
        volume.center = Orientation::ALL.map(|axis| (volume.extent(axis) / 2) as f32);
        for orientation in Orientation::ALL {
            let (u, v) = plane_axes(orientation);
            volume.views[orientation.axis_index()].origin = (volume.center(u), volume.center(v));
        }
        volume
    }

    pub fn with_rescale(mut self, slope: f32, intercept: f32) -> Self {
        self.rescale = (slope, intercept);
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    /// Crosshair position along `axis`, in isotropic units.
    pub fn center(&self, axis: Orientation) -> f32 {
        self.center[axis.axis_index()]
    }

    pub fn zoom(&self, orientation: Orientation) -> f32 {
        self.views[orientation.axis_index()].zoom
    }

    fn sample_grid(&self) -> f32 {
        let (z, y, x) = self.interpolated_dim;
        z.max(y).max(x) as f32
    }

    /// Isotropic extent along `axis`.
    fn extent(&self, axis: Orientation) -> u32 {
        let (z, y, x) = self.interpolated_dim;
        match axis {
            Orientation::Axial => z,
            Orientation::Sagittal => x,
            Orientation::Coronal => y,
        }
    }

    /// Stored voxels along `axis`.
    fn stored_len(&self, axis: Orientation) -> usize {
        let (z, y, x) = self.data.dim();
        match axis {
            Orientation::Axial => z,
            Orientation::Sagittal => x,
            Orientation::Coronal => y,
        }
    }

    /// Stored voxels per isotropic unit along `axis`. The first and last
    /// isotropic positions land on the first and last stored voxel.
    fn data_per_unit(&self, axis: Orientation) -> f32 {
        let extent = self.extent(axis);
        if extent < 2 {
            return 0.0;
        }
        self.stored_len(axis).saturating_sub(1) as f32 / (extent - 1) as f32
    }

    fn outside(&self) -> i32 {
        i32::from(self.value_range.0) - 1
    }

    /// Stored plane through `index`, rows along the view's vertical axis.
    fn get_slice_from_axis(&self, index: usize, orientation: Orientation) -> Option<ArrayView2<'_, i16>> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        let plane = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            // columns run along z, rows along y
            Orientation::Sagittal => self.data.slice(s![.., .., index]).reversed_axes(),
        };
        Some(plane)
    }

    fn is_valid_index(&self, index: usize, orientation: Orientation) -> bool {
        index < self.stored_len(orientation)
    }

    fn plane_index(&self, orientation: Orientation) -> usize {
        let stored = self.center(orientation) * self.data_per_unit(orientation);
        let last = self.stored_len(orientation).saturating_sub(1);
        (stored.max(0.0).round() as usize).min(last)
    }

    /// Isotropic plane position under a buffer sample of `orientation`.
    fn plane_position(&self, orientation: Orientation, column: f32, row: f32) -> (f32, f32) {
        let view = self.views[orientation.axis_index()];
        let (rows, columns) = mapper::buffer_dim(self.sample_grid());
        (
            view.origin.0 + (column - (columns / 2) as f32) / view.zoom,
            view.origin.1 + (row - (rows / 2) as f32) / view.zoom,
        )
    }

    fn sample(&self, plane: &ArrayView2<'_, i16>, orientation: Orientation, u: f32, v: f32) -> i32 {
        let (u_axis, v_axis) = plane_axes(orientation);
        let last_u = self.extent(u_axis).saturating_sub(1) as f32;
        let last_v = self.extent(v_axis).saturating_sub(1) as f32;
        if !(0.0..=last_u).contains(&u) || !(0.0..=last_v).contains(&v) {
            return self.outside();
        }
        let (height, width) = plane.dim();
        let (last_x, last_y) = ((width - 1) as f32, (height - 1) as f32);
        let x = (u * self.data_per_unit(u_axis)).min(last_x);
        let y = (v * self.data_per_unit(v_axis)).min(last_y);
        if self.views[orientation.axis_index()].border
            && (x < 1.0 || y < 1.0 || x > last_x - 1.0 || y > last_y - 1.0)
        {
            return i32::from(self.value_range.1);
        }
        let value = match self.interpolation {
            Interpolation::Bilinear => Interpolator::bilinear_interpolate(plane, y, x),
            Interpolation::None => Interpolator::nearest(plane, y, x),
        };
        value.round() as i32
    }

    fn shift_center(&mut self, axis: Orientation, delta: f32) -> bool {
        let last = self.extent(axis).saturating_sub(1) as f32;
        let current = self.center[axis.axis_index()];
        let moved = (current + delta).clamp(0.0, last);
        if (moved - current).abs() <= f32::EPSILON {
            return false;
        }
        self.center[axis.axis_index()] = moved;
        true
    }
}

/// Isotropic axes along the buffer columns and rows of `orientation`.
fn plane_axes(orientation: Orientation) -> (Orientation, Orientation) {
    match orientation {
        Orientation::Axial => (Orientation::Sagittal, Orientation::Coronal),
        Orientation::Coronal => (Orientation::Sagittal, Orientation::Axial),
        Orientation::Sagittal => (Orientation::Axial, Orientation::Coronal),
    }
}

impl DataCube for Volume {
    fn pixel_info(&self) -> PixelInfo {
        PixelInfo {
            sample_grid: self.sample_grid(),
            rescale_slope: self.rescale.0,
            rescale_intercept: self.rescale.1,
            min_valid: f32::from(self.value_range.0),
            max_valid: f32::from(self.value_range.1),
        }
    }

    fn slice(&self, orientation: Orientation, out: &mut Array2<i32>) {
        let Some(plane) = self.get_slice_from_axis(self.plane_index(orientation), orientation) else {
            out.fill(self.outside());
            return;
        };
        Zip::indexed(out).par_for_each(|(row, column), sample| {
            let (u, v) = self.plane_position(orientation, column as f32, row as f32);
            *sample = self.sample(&plane, orientation, u, v);
        });
    }

    fn line_info(&self, orientation: Orientation) -> CrosshairLine {
        let view = self.views[orientation.axis_index()];
        let (u, v) = plane_axes(orientation);
        let (rows, columns) = mapper::buffer_dim(self.sample_grid());
        CrosshairLine {
            anchor_x: (columns / 2) as f32 + (self.center(u) - view.origin.0) * view.zoom,
            anchor_y: (rows / 2) as f32 + (self.center(v) - view.origin.1) * view.zoom,
            angle_rad: 0.0,
        }
    }

    fn coord(&self, orientation: Orientation, x: i32, y: i32) -> Probe {
        let (u_axis, v_axis) = plane_axes(orientation);
        let (u, v) = self.plane_position(orientation, x as f32, y as f32);

        let mut position = self.center;
        position[u_axis.axis_index()] = u;
        position[v_axis.axis_index()] = v;
        let [z, x, y] = position.map(|p| p.floor() as i32);

        let raw = match self.get_slice_from_axis(self.plane_index(orientation), orientation) {
            Some(plane) => self.sample(&plane, orientation, u, v),
            None => self.outside(),
        };
        Probe {
            world: (x, y, z),
            raw,
        }
    }

    fn move_center(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool {
        let zoom = self.zoom(orientation);
        let (u, v) = plane_axes(orientation);
        let moved_u = self.shift_center(u, dx / zoom);
        let moved_v = self.shift_center(v, dy / zoom);
        moved_u || moved_v
    }

    fn move_slice(&mut self, orientation: Orientation, axis: Orientation, delta: f32) -> bool {
        // wheel steps along the view's own axis are whole planes
        let delta = if axis == orientation {
            delta
        } else {
            delta / self.zoom(orientation)
        };
        self.shift_center(axis, delta)
    }

    fn rotate_slice(&mut self, orientation: Orientation, delta_rad: f32) -> bool {
        log::debug!("{orientation:?} rotation by {delta_rad} rad refused: volume is axis-aligned");
        false
    }

    fn zoom_slice(&mut self, orientation: Orientation, delta_y: i32) -> bool {
        let view = &mut self.views[orientation.axis_index()];
        let zoom = (view.zoom * (-(delta_y as f32) * ZOOM_RATE).exp()).clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - view.zoom).abs() <= f32::EPSILON {
            return false;
        }
        view.zoom = zoom;
        true
    }

    fn slice_panning(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool {
        let (u, v) = plane_axes(orientation);
        let (last_u, last_v) = (
            self.extent(u).saturating_sub(1) as f32,
            self.extent(v).saturating_sub(1) as f32,
        );
        let view = &mut self.views[orientation.axis_index()];
        let origin = (
            (view.origin.0 + dx / view.zoom).clamp(0.0, last_u),
            (view.origin.1 + dy / view.zoom).clamp(0.0, last_v),
        );
        if origin == view.origin {
            return false;
        }
        view.origin = origin;
        true
    }

    fn toggle_border_line(&mut self, orientation: Orientation) {
        let view = &mut self.views[orientation.axis_index()];
        view.border = !view.border;
    }
}
