//! Crosshair geometry in screen space: anchor, pointer angle, arm
//! hit-testing and the overlay lines drawn through the anchor.
//!
//! Angles are measured clockwise from +x in screen space (y grows downward).
//! The horizontal arm runs along the crosshair angle `θ`, the vertical arm
//! along `θ + π/2`.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use image::Rgb;

use crate::enums::{Arm, Arms, Orientation};
use crate::mapper::CoordinateMapper;

/// Pointer tolerance in screen pixels, as arc length around the anchor.
pub const HIT_TOLERANCE: f32 = 4.0;
pub const ARM_WIDTH: f32 = 2.0;
pub const ARM_WIDTH_HIGHLIGHTED: f32 = 5.0;

/// Crosshair position as reported by the volume collaborator, in sample
/// coordinates of the slice buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CrosshairLine {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub angle_rad: f32,
}

/// One half-arm of the overlay, from the anchor outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLine {
    pub arm: Arm,
    pub from: (f32, f32),
    pub to: (f32, f32),
    pub color: Rgb<u8>,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrosshairGeometry {
    anchor: (i32, i32),
    angle: f32,
    tolerance: f32,
}

impl CrosshairGeometry {
    pub fn new(line: CrosshairLine, mapper: &CoordinateMapper, tolerance: f32) -> Self {
        Self {
            anchor: mapper.sample_to_screen_pixel(line.anchor_x, line.anchor_y),
            angle: line.angle_rad,
            tolerance,
        }
    }

    /// Anchor in screen pixels.
    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn pointer_angle(&self, px: i32, py: i32) -> f32 {
        pointer_angle(px, py, self.anchor.0, self.anchor.1)
    }

    /// Angular offsets `(horizontal, vertical)` of the pointer from each arm,
    /// both in `[0, π/2]` and summing to `π/2`.
    pub fn arm_offsets(&self, px: i32, py: i32) -> (f32, f32) {
        let mut horizontal = (self.angle - self.pointer_angle(px, py)).rem_euclid(TAU);
        if horizontal > PI {
            horizontal = TAU - horizontal;
        }
        if horizontal > FRAC_PI_2 {
            horizontal = PI - horizontal;
        }
        (horizontal, FRAC_PI_2 - horizontal)
    }

    /// Which arms the pointer is on. The tolerance is compared against the
    /// arc length at the pointer's radius, so it stays constant in pixels
    /// at any distance from the anchor.
    pub fn hit_test(&self, px: i32, py: i32) -> Option<Arms> {
        let (horizontal, vertical) = self.arm_offsets(px, py);
        let radius = ((px - self.anchor.0) as f32).hypot((py - self.anchor.1) as f32);
        Arms::from_flags(
            vertical * radius <= self.tolerance,
            horizontal * radius <= self.tolerance,
        )
    }

    /// The four half-arms through the anchor, each `reach` pixels long.
    /// Arms in `highlighted` are drawn thicker. Each arm carries the colour
    /// of the axis it moves.
    pub fn overlay(
        &self,
        orientation: Orientation,
        highlighted: Option<Arms>,
        reach: f32,
    ) -> [OverlayLine; 4] {
        let ray = |arm: Arm, angle: f32| {
            let (x, y) = (self.anchor.0 as f32, self.anchor.1 as f32);
            let width = if highlighted.is_some_and(|arms| arms.contains(arm)) {
                ARM_WIDTH_HIGHLIGHTED
            } else {
                ARM_WIDTH
            };
            OverlayLine {
                arm,
                from: (x, y),
                to: (x + reach * angle.cos(), y + reach * angle.sin()),
                color: orientation.arm_axis(arm).line_color(),
                width,
            }
        };

        [
            ray(Arm::Vertical, self.angle + FRAC_PI_2),
            ray(Arm::Vertical, self.angle + 3.0 * FRAC_PI_2),
            ray(Arm::Horizontal, self.angle),
            ray(Arm::Horizontal, self.angle + PI),
        ]
    }
}

/// Angle of the pointer around the anchor in `[0, 2π)`, clockwise from +x.
/// Pointers on either axis through the anchor are resolved by the sign of
/// the other coordinate.
pub fn pointer_angle(px: i32, py: i32, anchor_x: i32, anchor_y: i32) -> f32 {
    let (dx, dy) = (px - anchor_x, py - anchor_y);
    if dx == 0 {
        return if dy >= 0 { FRAC_PI_2 } else { 3.0 * FRAC_PI_2 };
    }
    if dy == 0 {
        return if dx > 0 { 0.0 } else { PI };
    }
    let angle = (dy as f32).atan2(dx as f32).rem_euclid(TAU);
    if angle >= TAU { 0.0 } else { angle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn geometry(angle_rad: f32) -> CrosshairGeometry {
        let mapper = CoordinateMapper::new(100, 100.0);
        let line = CrosshairLine {
            anchor_x: 50.0,
            anchor_y: 50.0,
            angle_rad,
        };
        CrosshairGeometry::new(line, &mapper, HIT_TOLERANCE)
    }

    #[test]
    fn pointer_angle_covers_all_quadrants() {
        assert_abs_diff_eq!(pointer_angle(10, 0, 0, 0), 0.0);
        assert_abs_diff_eq!(pointer_angle(0, 10, 0, 0), FRAC_PI_2);
        assert_abs_diff_eq!(pointer_angle(-10, 0, 0, 0), PI);
        assert_abs_diff_eq!(pointer_angle(0, -10, 0, 0), 3.0 * FRAC_PI_2);
        assert_abs_diff_eq!(pointer_angle(10, 10, 0, 0), PI / 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pointer_angle(-10, 10, 0, 0), 3.0 * PI / 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pointer_angle(-10, -10, 0, 0), 5.0 * PI / 4.0, epsilon = 1e-6);
        assert_abs_diff_eq!(pointer_angle(10, -10, 0, 0), 7.0 * PI / 4.0, epsilon = 1e-6);
    }

    #[test]
    fn pointer_angle_is_in_range() {
        for py in -20..20 {
            for px in -20..20 {
                let angle = pointer_angle(px, py, 0, 0);
                assert!((0.0..TAU).contains(&angle), "({px}, {py}) -> {angle}");
            }
        }
    }

    #[test]
    fn anchor_hits_both_arms() {
        assert_eq!(geometry(0.3).hit_test(50, 50), Some(Arms::Both));
    }

    #[test]
    fn hit_test_separates_arms() {
        let crosshair = geometry(0.0);
        assert_eq!(crosshair.hit_test(90, 52), Some(Arms::Horizontal));
        assert_eq!(crosshair.hit_test(10, 50), Some(Arms::Horizontal));
        assert_eq!(crosshair.hit_test(50, 10), Some(Arms::Vertical));
        assert_eq!(crosshair.hit_test(53, 90), Some(Arms::Vertical));
        assert_eq!(crosshair.hit_test(80, 80), None);
        assert_eq!(crosshair.hit_test(90, 56), None);
    }

    #[test]
    fn hit_test_follows_rotation() {
        let crosshair = geometry(PI / 4.0);
        assert_eq!(crosshair.hit_test(80, 80), Some(Arms::Horizontal));
        assert_eq!(crosshair.hit_test(20, 80), Some(Arms::Vertical));
        assert_eq!(crosshair.hit_test(90, 50), None);
    }

    #[test]
    fn tolerance_is_constant_in_pixels() {
        let crosshair = geometry(0.0);
        // 3 px off the arm is inside both near and far from the anchor
        assert_eq!(crosshair.hit_test(60, 53), Some(Arms::Horizontal));
        assert_eq!(crosshair.hit_test(150, 53), Some(Arms::Horizontal));
    }

    #[test]
    fn overlay_arms_point_along_crosshair() {
        let crosshair = geometry(0.0);
        let lines = crosshair.overlay(Orientation::Axial, Some(Arms::Vertical), 400.0);

        assert_eq!(lines[0].arm, Arm::Vertical);
        assert_abs_diff_eq!(lines[0].to.0, 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(lines[0].to.1, 450.0, epsilon = 1e-3);
        assert_abs_diff_eq!(lines[1].to.1, -350.0, epsilon = 1e-3);
        assert_abs_diff_eq!(lines[2].to.0, 450.0, epsilon = 1e-3);
        assert_abs_diff_eq!(lines[3].to.0, -350.0, epsilon = 1e-3);

        assert_eq!(lines[0].width, ARM_WIDTH_HIGHLIGHTED);
        assert_eq!(lines[2].width, ARM_WIDTH);
    }

    #[test]
    fn arm_colours_follow_the_moved_axis() {
        let crosshair = geometry(0.0);
        let colours = |orientation| {
            let lines = crosshair.overlay(orientation, None, 10.0);
            (lines[0].color, lines[2].color)
        };
        let (red, green, blue) = (Rgb([255, 0, 0]), Rgb([0, 255, 0]), Rgb([0, 0, 255]));
        assert_eq!(colours(Orientation::Axial), (green, blue));
        assert_eq!(colours(Orientation::Sagittal), (red, blue));
        assert_eq!(colours(Orientation::Coronal), (green, red));
    }
}
