//! Intensity windowing: raw stored samples to displayable 8-bit intensities.

use std::fmt;
use std::ops::RangeInclusive;

use image::{GrayImage, ImageBuffer};
use ndarray::{Array2, ArrayView2, Zip};
use web_time::Instant;

pub const DEFAULT_WINDOW_LEVEL: i32 = 50;
pub const DEFAULT_WINDOW_WIDTH: i32 = 350;
pub const WINDOW_LEVEL_RANGE: RangeInclusive<i32> = -1000..=3096;
pub const WINDOW_WIDTH_RANGE: RangeInclusive<i32> = 10..=4000;

/// Output for samples below the calibrated range.
pub const SATURATED: u8 = 255;

/// Calibration constants reported once by the volume collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub rescale_slope: f32,
    pub rescale_intercept: f32,
    pub min_valid: f32,
    pub max_valid: f32,
}

impl Calibration {
    /// Convert a raw stored value into calibrated (Hounsfield) units.
    #[inline]
    pub fn to_hounsfield(&self, raw: f32) -> f32 {
        self.rescale_slope.mul_add(raw, self.rescale_intercept)
    }
}

/// Window level/width pair. Both values are clamped on every construction,
/// so `width` never drops below 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Windowing {
    level: i32,
    width: i32,
}

impl Windowing {
    pub fn new(level: i32, width: i32) -> Self {
        Self {
            level: level.clamp(*WINDOW_LEVEL_RANGE.start(), *WINDOW_LEVEL_RANGE.end()),
            width: width.clamp(*WINDOW_WIDTH_RANGE.start(), *WINDOW_WIDTH_RANGE.end()),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Shift width and level by the given amounts, clamping the result.
    pub fn adjusted(self, delta_level: i32, delta_width: i32) -> Self {
        Self::new(
            self.level.saturating_add(delta_level),
            self.width.saturating_add(delta_width),
        )
    }

    /// Lower bound of the window in calibrated units.
    fn lower(&self) -> f32 {
        (self.level - self.width / 2) as f32
    }
}

impl Default for Windowing {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_LEVEL, DEFAULT_WINDOW_WIDTH)
    }
}

impl fmt::Display for Windowing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WL: {}\nWW: {}", self.level, self.width)
    }
}

/// Window a single raw sample.
#[inline]
pub fn window_sample(raw: i32, calibration: &Calibration, windowing: Windowing) -> u8 {
    let value = raw as f32;
    if value < calibration.min_valid {
        return SATURATED;
    }
    let width = windowing.width as f32;
    let t = (calibration.to_hounsfield(value) - windowing.lower()).clamp(0.0, width);
    (t * 255.0 / width).round() as u8
}

/// Window a whole slice buffer. The result has the same dimensions as `raw`
/// (`rows` = image height) and depends on nothing but the arguments.
pub fn apply(
    raw: ArrayView2<'_, i32>,
    calibration: &Calibration,
    windowing: Windowing,
) -> Option<GrayImage> {
    let started = Instant::now();
    let (height, width) = raw.dim();
    let mut windowed = Array2::<u8>::zeros((height, width));

    Zip::from(&mut windowed)
        .and(&raw)
        .par_for_each(|out, &sample| *out = window_sample(sample, calibration, windowing));

    log::trace!(
        "windowed {}x{} slice ({}) in {:?}",
        width,
        height,
        windowing.to_string().replace('\n', ", "),
        started.elapsed()
    );

    let (pixels, _) = windowed.into_raw_vec_and_offset();
    ImageBuffer::from_raw(width as u32, height as u32, pixels)
}
