//! # DICOM slice view library
//!
//! This crate provides interactive reformatted slice views over volumes
//! built from multiple DICOM files.

//!
//! Each [`SliceView`] shows one of the three medical axes:
//!  - Axial
//!  - Coronal
//!  - Sagittal
//!
//! A view owns the windowed display buffer of its slice, the mapping between
//! canvas pixels and volume samples and the crosshair drawn on top of it.
//! Pointer input runs through an [`InteractionController`] which turns drags,
//! double clicks and wheel steps into navigation commands on a [`DataCube`].
//! The cube decides whether a command changes anything; views then refresh
//! their slice and report what happened as [`Notification`]s.
//!
//! Windowing maps calibrated Hounsfield units to 8-bit grey levels and is
//! computed in parallel using rayon. [`Volume`] is an axis-aligned cube
//! loaded by the [`VolumeLoader`] from a folder where each ".dcm" file is
//! read from. DICOM files are assumed to have the following attributes:
//!   - Axial data set
//!   - No multiframe (always the first frame is used)
//!   - Images from the same series (Series Instance UID) and acquisition
//!     (Acquisition Number)
//!
//! # Examples
//!
//! ## Scrolling through a volume
//!
//! Load all DICOM files from the dicom/ directory sorted by InstanceNumber,
//! attach an axial view and step one slice up with the mouse wheel.
//!
//! ```no_run
//! # use dicom_slice_view::{Orientation, PointerEvent, SliceView, SliceViewConfig, SortBy, VolumeLoader};
//! let mut volume = VolumeLoader::load_from_directory("dicom", SortBy::InstanceNumber)
//!     .expect("should have loaded files from directory");
//! let mut view = SliceView::new(Orientation::Axial, SliceViewConfig::default())
//!     .expect("default config is valid");
//! view.attach(&volume).expect("volume should have a sample grid");
//!
//! for notification in view.handle_event(PointerEvent::Wheel { x: 0, y: 0, delta_y: 120 }, &mut volume) {
//!     println!("{notification}");
//! }
//! view.display_buffer()
//!     .expect("view is attached")
//!     .save("axial.png")
//!     .expect("should have written image");
//! ```

pub mod crosshair;
pub mod cube;
pub mod enums;
pub mod interaction;
mod interpolator;
pub mod mapper;
pub mod slice_view;
#[cfg(test)]
mod test_utils;
pub mod volume;
pub mod volume_loader;
pub mod windowing;

pub use crosshair::{CrosshairGeometry, CrosshairLine, OverlayLine};
pub use cube::{DataCube, PixelInfo, Probe};
pub use enums::{Arm, Arms, Buttons, Interpolation, LineMove, Orientation, PointerButton, SortBy};
pub use interaction::{CursorInfo, Gesture, InteractionController, Notification, PointerEvent};
pub use mapper::CoordinateMapper;
pub use slice_view::{Frame, Placeholders, SliceView, SliceViewConfig, SliceViewError};
pub use volume::Volume;
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
pub use windowing::{Calibration, Windowing};
