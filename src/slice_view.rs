//! A single reformatted slice view: buffers, windowing, crosshair overlay
//! and pointer handling for one orientation.
//!
//! The view never draws. [`SliceView::render`] hands back the windowed
//! buffer plus the overlay geometry, and [`SliceView::handle_event`] returns
//! the notifications a presentation layer should forward. The volume
//! collaborator is passed to every call that needs it.

use std::path::Path;

use image::GrayImage;
use image::imageops::{self, FilterType};
use ndarray::Array2;
use thiserror::Error;

use crate::crosshair::{CrosshairGeometry, HIT_TOLERANCE, OverlayLine};
use crate::cube::DataCube;
use crate::enums::{Arms, Orientation};
use crate::interaction::{
    CursorInfo, CursorUpdate, Gesture, InteractionController, Notification, PointerEvent, Viewport,
};
use crate::mapper::{self, CoordinateMapper};
use crate::windowing::{self, Calibration, Windowing};

#[derive(Debug, Error)]
pub enum SliceViewError {
    #[error("Display size must be positive")]
    InvalidDisplaySize,

    #[error("Invalid sample grid: {0}")]
    InvalidSampleGrid(f32),

    #[error("Placeholder image error: {0}")]
    Placeholder(#[from] image::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceViewConfig {
    /// Canvas height in pixels; the width follows the 7:4 aspect.
    pub display_size: u32,
    /// Arm hit tolerance in screen pixels.
    pub hit_tolerance: f32,
    pub default_windowing: Windowing,
    pub line_visible: bool,
}

impl Default for SliceViewConfig {
    fn default() -> Self {
        Self {
            display_size: 512,
            hit_tolerance: HIT_TOLERANCE,
            default_windowing: Windowing::default(),
            line_visible: true,
        }
    }
}

impl SliceViewConfig {
    pub fn with_display_size(mut self, display_size: u32) -> Self {
        self.display_size = display_size;
        self
    }

    pub fn with_hit_tolerance(mut self, hit_tolerance: f32) -> Self {
        self.hit_tolerance = hit_tolerance;
        self
    }

    pub fn with_default_windowing(mut self, windowing: Windowing) -> Self {
        self.default_windowing = windowing;
        self
    }

    pub fn with_line_visible(mut self, line_visible: bool) -> Self {
        self.line_visible = line_visible;
        self
    }
}

/// Images shown while no volume is attached.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    pub blank: Option<GrayImage>,
    pub loading: Option<GrayImage>,
}

impl Placeholders {
    pub fn load(
        blank: impl AsRef<Path>,
        loading: impl AsRef<Path>,
    ) -> Result<Self, SliceViewError> {
        Ok(Self {
            blank: Some(image::open(blank)?.to_luma8()),
            loading: Some(image::open(loading)?.to_luma8()),
        })
    }
}

/// What to put on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame<'a> {
    /// A placeholder already resized to the canvas.
    Placeholder(GrayImage),
    Slice {
        /// Windowed buffer at native sample resolution.
        image: &'a GrayImage,
        /// Canvas `(width, height)` the buffer is stretched onto.
        canvas: (u32, u32),
        /// Overlay lines in canvas pixels, empty while the crosshair is hidden.
        overlay: Vec<OverlayLine>,
    },
}

#[derive(Debug)]
struct Attached {
    calibration: Calibration,
    mapper: CoordinateMapper,
    raw: Array2<i32>,
    display: GrayImage,
    crosshair: CrosshairGeometry,
}

impl Attached {
    fn fetch_slice<C: DataCube + ?Sized>(&mut self, cube: &C, orientation: Orientation) {
        cube.slice(orientation, &mut self.raw);
    }

    fn sync_line<C: DataCube + ?Sized>(&mut self, cube: &C, orientation: Orientation, tolerance: f32) {
        self.crosshair = CrosshairGeometry::new(cube.line_info(orientation), &self.mapper, tolerance);
    }

    fn rewindow(&mut self, windowing: Windowing) -> Notification {
        match windowing::apply(self.raw.view(), &self.calibration, windowing) {
            Some(display) => self.display = display,
            None => log::warn!("slice buffer {:?} could not be windowed", self.raw.dim()),
        }
        Notification::WindowingInfo(windowing)
    }

    fn cursor_info<C: DataCube + ?Sized>(
        &self,
        cube: &C,
        orientation: Orientation,
        update: CursorUpdate,
    ) -> Option<CursorInfo> {
        let CursorUpdate::At(x, y) = update else {
            return None;
        };
        let (sample_x, sample_y) = self.mapper.screen_pixel_to_sample(x, y);
        let probe = cube.coord(orientation, sample_x, sample_y);
        Some(CursorInfo {
            world: probe.world,
            intensity: self.calibration.to_hounsfield(probe.raw as f32),
        })
    }
}

#[derive(Debug)]
enum ViewState {
    Blank,
    Loading,
    Attached(Box<Attached>),
}

#[derive(Debug)]
pub struct SliceView {
    orientation: Orientation,
    config: SliceViewConfig,
    placeholders: Placeholders,
    windowing: Windowing,
    line_visible: bool,
    controller: InteractionController,
    state: ViewState,
}

impl SliceView {
    pub fn new(orientation: Orientation, config: SliceViewConfig) -> Result<Self, SliceViewError> {
        if config.display_size == 0 {
            return Err(SliceViewError::InvalidDisplaySize);
        }
        Ok(Self {
            orientation,
            config,
            placeholders: Placeholders::default(),
            windowing: config.default_windowing,
            line_visible: config.line_visible,
            controller: InteractionController::default(),
            state: ViewState::Blank,
        })
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Whether a volume is attached. Detached views ignore all input.
    pub fn is_valid(&self) -> bool {
        matches!(self.state, ViewState::Attached(_))
    }

    pub fn windowing(&self) -> Windowing {
        self.windowing
    }

    pub fn line_visible(&self) -> bool {
        self.line_visible
    }

    pub fn gesture(&self) -> Gesture {
        self.controller.gesture()
    }

    pub fn hover(&self) -> Option<Arms> {
        self.controller.hover()
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (mapper::canvas_width(self.config.display_size), self.config.display_size)
    }

    pub fn raw_buffer(&self) -> Option<&Array2<i32>> {
        self.attached().map(|attached| &attached.raw)
    }

    pub fn display_buffer(&self) -> Option<&GrayImage> {
        self.attached().map(|attached| &attached.display)
    }

    pub fn crosshair(&self) -> Option<CrosshairGeometry> {
        self.attached().map(|attached| attached.crosshair)
    }

    fn attached(&self) -> Option<&Attached> {
        match &self.state {
            ViewState::Attached(attached) => Some(attached),
            _ => None,
        }
    }

    /// Show the loading placeholder until the next [`attach`](Self::attach).
    pub fn mark_loading(&mut self) {
        self.controller.reset();
        self.state = ViewState::Loading;
    }

    pub fn detach(&mut self) {
        self.controller.reset();
        self.state = ViewState::Blank;
    }

    /// Read calibration, allocate buffers and fetch the first slice.
    /// Windowing starts over from the configured defaults.
    pub fn attach<C: DataCube + ?Sized>(
        &mut self,
        cube: &C,
    ) -> Result<Vec<Notification>, SliceViewError> {
        let info = cube.pixel_info();
        if !(info.sample_grid >= 1.0) {
            return Err(SliceViewError::InvalidSampleGrid(info.sample_grid));
        }

        let calibration = Calibration {
            rescale_slope: info.rescale_slope,
            rescale_intercept: info.rescale_intercept,
            min_valid: info.min_valid,
            max_valid: info.max_valid,
        };
        let mapper = CoordinateMapper::new(self.config.display_size, info.sample_grid);
        let raw = Array2::zeros(mapper::buffer_dim(info.sample_grid));
        let crosshair =
            CrosshairGeometry::new(cube.line_info(self.orientation), &mapper, self.config.hit_tolerance);

        log::debug!(
            "{:?} view attached: {:?} buffer, canvas {:?}, {:?}",
            self.orientation,
            raw.dim(),
            mapper.canvas_size(),
            calibration
        );

        self.windowing = self.config.default_windowing;
        self.controller.reset();
        self.state = ViewState::Attached(Box::new(Attached {
            calibration,
            mapper,
            raw,
            display: GrayImage::new(0, 0),
            crosshair,
        }));
        Ok(self.refresh(cube))
    }

    /// Re-read the slice and crosshair, e.g. after a sibling view moved them.
    pub fn refresh<C: DataCube + ?Sized>(&mut self, cube: &C) -> Vec<Notification> {
        let ViewState::Attached(attached) = &mut self.state else {
            return Vec::new();
        };
        attached.fetch_slice(cube, self.orientation);
        attached.sync_line(cube, self.orientation, self.config.hit_tolerance);
        vec![attached.rewindow(self.windowing)]
    }

    pub fn handle_event<C: DataCube + ?Sized>(
        &mut self,
        event: PointerEvent,
        cube: &mut C,
    ) -> Vec<Notification> {
        let ViewState::Attached(attached) = &mut self.state else {
            return Vec::new();
        };
        let viewport = Viewport {
            orientation: self.orientation,
            mapper: attached.mapper,
            crosshair: attached.crosshair,
            line_visible: self.line_visible,
            windowing: self.windowing,
        };
        let response = self.controller.handle(event, &viewport, cube);

        let mut notifications = Vec::new();
        if response.refresh_slice {
            attached.fetch_slice(&*cube, self.orientation);
        }
        if let Some(windowing) = response.windowing {
            self.windowing = windowing;
        }
        if response.refresh_slice || response.windowing.is_some() {
            notifications.push(attached.rewindow(self.windowing));
        }
        if response.refresh_slice || response.redraw {
            attached.sync_line(&*cube, self.orientation, self.config.hit_tolerance);
        }
        notifications.extend(response.notifications);
        if let Some(update) = response.cursor {
            let info = attached.cursor_info(&*cube, self.orientation, update);
            notifications.push(Notification::CursorInfo(info));
        }
        notifications
    }

    /// Apply a windowing chosen elsewhere, e.g. committed on a sibling view.
    pub fn set_windowing(&mut self, level: i32, width: i32) -> Vec<Notification> {
        self.windowing = Windowing::new(level, width);
        match &mut self.state {
            ViewState::Attached(attached) => vec![attached.rewindow(self.windowing)],
            _ => Vec::new(),
        }
    }

    pub fn reset_windowing(&mut self) -> Vec<Notification> {
        let defaults = self.config.default_windowing;
        self.set_windowing(defaults.level(), defaults.width())
    }

    pub fn toggle_slice_line(&mut self) {
        self.line_visible = !self.line_visible;
    }

    pub fn toggle_border_line<C: DataCube + ?Sized>(&mut self, cube: &mut C) -> Vec<Notification> {
        if !self.is_valid() {
            return Vec::new();
        }
        cube.toggle_border_line(self.orientation);
        self.refresh(&*cube)
    }

    pub fn render(&self) -> Frame<'_> {
        let placeholder = match &self.state {
            ViewState::Attached(attached) => {
                let overlay = if self.line_visible {
                    let reach = 4.0 * self.config.display_size as f32;
                    attached
                        .crosshair
                        .overlay(self.orientation, self.controller.highlighted(), reach)
                        .to_vec()
                } else {
                    Vec::new()
                };
                return Frame::Slice {
                    image: &attached.display,
                    canvas: attached.mapper.canvas_size(),
                    overlay,
                };
            }
            ViewState::Blank => self.placeholders.blank.as_ref(),
            ViewState::Loading => self
                .placeholders
                .loading
                .as_ref()
                .or(self.placeholders.blank.as_ref()),
        };

        let (width, height) = self.canvas_size();
        Frame::Placeholder(match placeholder {
            Some(image) => imageops::resize(image, width, height, FilterType::Triangle),
            None => GrayImage::new(width, height),
        })
    }
}
