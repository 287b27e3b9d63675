//! Test doubles shared by the unit tests.

use std::cell::Cell;

use ndarray::Array2;

use crate::crosshair::CrosshairLine;
use crate::cube::{DataCube, PixelInfo, Probe};
use crate::enums::Orientation;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Command {
    MoveCenter(Orientation, f32, f32),
    MoveSlice(Orientation, Orientation, f32),
    Rotate(Orientation, f32),
    Zoom(Orientation, i32),
    Pan(Orientation, f32, f32),
    ToggleBorder(Orientation),
}

/// Records every navigation command. Accepted commands bump the sample
/// value written by the next `slice` call, so refreshes are observable.
#[derive(Debug)]
pub(crate) struct RecordingCube {
    pub(crate) info: PixelInfo,
    pub(crate) line: CrosshairLine,
    pub(crate) accept: bool,
    pub(crate) fill: i32,
    pub(crate) commands: Vec<Command>,
    pub(crate) slice_reads: Cell<usize>,
}

impl Default for RecordingCube {
    fn default() -> Self {
        Self {
            info: PixelInfo {
                sample_grid: 200.0,
                rescale_slope: 1.0,
                rescale_intercept: -1024.0,
                min_valid: 0.0,
                max_valid: 4095.0,
            },
            line: CrosshairLine {
                anchor_x: 100.0,
                anchor_y: 100.0,
                angle_rad: 0.0,
            },
            accept: true,
            // 50 HU, the centre of the default window
            fill: 1074,
            commands: Vec::new(),
            slice_reads: Cell::new(0),
        }
    }
}

impl RecordingCube {
    pub(crate) fn rejecting() -> Self {
        Self {
            accept: false,
            ..Self::default()
        }
    }

    fn record(&mut self, command: Command) -> bool {
        self.commands.push(command);
        if self.accept {
            self.fill += 1;
        }
        self.accept
    }
}

impl DataCube for RecordingCube {
    fn pixel_info(&self) -> PixelInfo {
        self.info
    }

    fn slice(&self, _orientation: Orientation, out: &mut Array2<i32>) {
        self.slice_reads.set(self.slice_reads.get() + 1);
        out.fill(self.fill);
    }

    fn line_info(&self, _orientation: Orientation) -> CrosshairLine {
        self.line
    }

    fn coord(&self, orientation: Orientation, x: i32, y: i32) -> Probe {
        Probe {
            world: (x, y, orientation.axis_index() as i32),
            raw: self.fill,
        }
    }

    fn move_center(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool {
        self.record(Command::MoveCenter(orientation, dx, dy))
    }

    fn move_slice(&mut self, orientation: Orientation, axis: Orientation, delta: f32) -> bool {
        self.record(Command::MoveSlice(orientation, axis, delta))
    }

    fn rotate_slice(&mut self, orientation: Orientation, delta_rad: f32) -> bool {
        self.record(Command::Rotate(orientation, delta_rad))
    }

    fn zoom_slice(&mut self, orientation: Orientation, delta_y: i32) -> bool {
        self.record(Command::Zoom(orientation, delta_y))
    }

    fn slice_panning(&mut self, orientation: Orientation, dx: f32, dy: f32) -> bool {
        self.record(Command::Pan(orientation, dx, dy))
    }

    fn toggle_border_line(&mut self, orientation: Orientation) {
        self.record(Command::ToggleBorder(orientation));
    }
}
