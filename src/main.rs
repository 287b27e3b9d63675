use std::path::PathBuf;

use dicom_slice_view::{
    Frame, LineMove, Notification, Orientation, PointerEvent, SliceView, SliceViewConfig, SortBy,
    VolumeLoader,
};
use image::imageops::{self, FilterType};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let directory = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("dicom"), PathBuf::from);
    let mut volume = VolumeLoader::load_from_directory(&directory, SortBy::InstanceNumber)
        .expect("should have loaded files from directory");

    let mut views = Orientation::ALL.map(|orientation| {
        SliceView::new(orientation, SliceViewConfig::default())
            .expect("default config should be valid")
    });
    for view in &mut views {
        for notification in view.attach(&volume).expect("volume should be attachable") {
            log::info!("{:?}: {notification}", view.orientation());
        }
    }

    // one wheel step on the axial view moves the line shown in the other two
    let [axial, others @ ..] = &mut views;
    let wheel = PointerEvent::Wheel {
        x: 0,
        y: 0,
        delta_y: 120,
    };
    for notification in axial.handle_event(wheel, &mut volume) {
        log::info!("Axial: {notification}");
        if notification == Notification::LineMoved(LineMove::Wheel) {
            for view in others.iter_mut() {
                view.refresh(&volume);
            }
        }
    }

    for view in &views {
        let name = format!("{:?}", view.orientation()).to_lowercase();
        let Frame::Slice {
            image,
            canvas: (width, height),
            overlay,
        } = view.render()
        else {
            log::warn!("{name} view has no slice");
            continue;
        };
        for line in &overlay {
            log::debug!("{name} overlay {line:?}");
        }
        imageops::resize(image, width, height, FilterType::Triangle)
            .save(format!("{name}.png"))
            .expect("should have written image");
    }
}
