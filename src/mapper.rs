//! Screen/volume coordinate mapping.
//!
//! Every slice view has a fixed 7:4 (width:height) aspect ratio. The scale
//! between screen pixels and volume samples is derived from the height
//! alone, so the same factor applies on both axes.

/// Width:height aspect ratio of every slice canvas and slice buffer.
pub const ASPECT_RATIO: (u32, u32) = (7, 4);

/// Canvas width for a given canvas height.
pub fn canvas_width(height: u32) -> u32 {
    height * ASPECT_RATIO.0 / ASPECT_RATIO.1
}

/// Slice buffer dimensions `(rows, columns)` for a given sample grid.
pub fn buffer_dim(sample_grid: f32) -> (usize, usize) {
    let rows = sample_grid.round().max(1.0);
    let columns = (sample_grid * ASPECT_RATIO.0 as f32 / ASPECT_RATIO.1 as f32)
        .round()
        .max(1.0);
    (rows as usize, columns as usize)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    display_size: u32,
    sample_grid: f32,
}

impl CoordinateMapper {
    /// `display_size` is the canvas height in pixels, `sample_grid` the
    /// number of sample rows in the slice buffer. Both must be positive.
    pub fn new(display_size: u32, sample_grid: f32) -> Self {
        Self {
            display_size,
            sample_grid,
        }
    }

    pub fn display_size(&self) -> u32 {
        self.display_size
    }

    pub fn sample_grid(&self) -> f32 {
        self.sample_grid
    }

    /// Canvas dimensions `(width, height)` in screen pixels.
    pub fn canvas_size(&self) -> (u32, u32) {
        (canvas_width(self.display_size), self.display_size)
    }

    pub fn screen_to_volume(&self, sx: f32, sy: f32) -> (f32, f32) {
        let scale = self.sample_grid / self.display_size as f32;
        (sx * scale, sy * scale)
    }

    pub fn volume_to_screen(&self, vx: f32, vy: f32) -> (f32, f32) {
        let scale = self.display_size as f32 / self.sample_grid;
        (vx * scale, vy * scale)
    }

    /// Integer pixel to integer sample, truncating toward zero.
    pub fn screen_pixel_to_sample(&self, sx: i32, sy: i32) -> (i32, i32) {
        let (vx, vy) = self.screen_to_volume(sx as f32, sy as f32);
        (vx as i32, vy as i32)
    }

    /// Sample position to integer pixel, truncating toward zero.
    pub fn sample_to_screen_pixel(&self, vx: f32, vy: f32) -> (i32, i32) {
        let (sx, sy) = self.volume_to_screen(vx, vy);
        (sx as i32, sy as i32)
    }

    pub fn clamp_to_canvas(&self, sx: i32, sy: i32) -> (i32, i32) {
        let (width, height) = self.canvas_size();
        (
            sx.clamp(0, width.saturating_sub(1) as i32),
            sy.clamp(0, height.saturating_sub(1) as i32),
        )
    }
}
