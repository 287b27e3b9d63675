//! Pointer gesture state machine.
//!
//! A press captures the pointer position and whichever crosshair arms are
//! hovered at that moment. The pressed button and the captured arms then
//! decide the gesture for the following moves:
//!
//! | button    | arm captured      | no arm captured     |
//! |-----------|-------------------|---------------------|
//! | primary   | drag the arm(s)   | zoom                |
//! | secondary | rotate crosshair  | adjust windowing    |
//! | middle    | pan               | pan                 |
//!
//! Navigation commands go straight to the volume collaborator; the
//! [`Response`] tells the owning view what to refresh and what to report.
//! Nothing is refreshed or reported when the collaborator reports that a
//! command did not move anything.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

use crate::crosshair::CrosshairGeometry;
use crate::cube::DataCube;
use crate::enums::{Arm, Arms, Buttons, LineMove, Orientation, PointerButton};
use crate::mapper::CoordinateMapper;
use crate::windowing::Windowing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    Idle,
    Hover(Arms),
    DraggingLine(Arms),
    Rotating(Arms),
    Zooming,
    Panning,
    AdjustingWindow,
}

impl Gesture {
    fn button(self) -> Option<PointerButton> {
        match self {
            Gesture::Idle | Gesture::Hover(_) => None,
            Gesture::DraggingLine(_) | Gesture::Zooming => Some(PointerButton::Primary),
            Gesture::Rotating(_) | Gesture::AdjustingWindow => Some(PointerButton::Secondary),
            Gesture::Panning => Some(PointerButton::Middle),
        }
    }

    fn captured(self) -> Option<Arms> {
        match self {
            Gesture::DraggingLine(arms) | Gesture::Rotating(arms) => Some(arms),
            _ => None,
        }
    }

    fn resting(hover: Option<Arms>) -> Self {
        hover.map_or(Gesture::Idle, Gesture::Hover)
    }
}

/// Pointer input in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { x: i32, y: i32, button: PointerButton },
    Move { x: i32, y: i32, buttons: Buttons },
    Release { x: i32, y: i32, button: PointerButton },
    DoubleClick { x: i32, y: i32 },
    Wheel { x: i32, y: i32, delta_y: i32 },
    Leave,
}

/// World coordinates and calibrated intensity under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorInfo {
    pub world: (i32, i32, i32),
    pub intensity: f32,
}

impl fmt::Display for CursorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.world;
        write!(f, "Coord: ({x}, {y}, {z})\nIntensity(HU): {:.0}", self.intensity)
    }
}

/// Reports for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// `None` once the pointer has left the canvas.
    CursorInfo(Option<CursorInfo>),
    WindowingInfo(Windowing),
    LineMoved(LineMove),
    /// Dependent views should refresh.
    ZoomPanChanged,
    WindowingCommitted(Windowing),
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::CursorInfo(Some(info)) => fmt::Display::fmt(info, f),
            Notification::CursorInfo(None) => Ok(()),
            Notification::WindowingInfo(windowing) => fmt::Display::fmt(windowing, f),
            Notification::LineMoved(cause) => write!(f, "line moved ({cause:?})"),
            Notification::ZoomPanChanged => f.write_str("zoom/pan changed"),
            Notification::WindowingCommitted(windowing) => {
                write!(f, "windowing committed ({}, {})", windowing.level(), windowing.width())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorUpdate {
    At(i32, i32),
    Outside,
}

/// What the view has to do after an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// Overlay state changed.
    pub redraw: bool,
    /// The slice buffer must be fetched again.
    pub refresh_slice: bool,
    /// New windowing to apply.
    pub windowing: Option<Windowing>,
    pub notifications: Vec<Notification>,
    pub cursor: Option<CursorUpdate>,
}

/// Per-event snapshot of the view the controller acts on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub orientation: Orientation,
    pub mapper: CoordinateMapper,
    pub crosshair: CrosshairGeometry,
    pub line_visible: bool,
    pub windowing: Windowing,
}

impl Viewport {
    fn hit_test(&self, x: i32, y: i32) -> Option<Arms> {
        if self.line_visible {
            self.crosshair.hit_test(x, y)
        } else {
            None
        }
    }

    fn screen_delta(&self, dx: i32, dy: i32) -> (f32, f32) {
        self.mapper.screen_to_volume(dx as f32, dy as f32)
    }
}

#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    gesture: Gesture,
    hover: Option<Arms>,
    last: (i32, i32),
    last_angle: f32,
    windowing_dirty: bool,
}

impl InteractionController {
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn hover(&self) -> Option<Arms> {
        self.hover
    }

    /// Arms to draw thick: hovered or captured by the current gesture.
    pub fn highlighted(&self) -> Option<Arms> {
        let captured = self.gesture.captured();
        let has = |arm| {
            self.hover.is_some_and(|arms| arms.contains(arm))
                || captured.is_some_and(|arms| arms.contains(arm))
        };
        Arms::from_flags(has(Arm::Vertical), has(Arm::Horizontal))
    }

    pub fn windowing_dirty(&self) -> bool {
        self.windowing_dirty
    }

    /// Drop every transient flag, e.g. when the view is detached.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn handle<C: DataCube + ?Sized>(
        &mut self,
        event: PointerEvent,
        viewport: &Viewport,
        cube: &mut C,
    ) -> Response {
        let mut response = Response::default();
        match event {
            PointerEvent::Press { x, y, button } => self.press(x, y, button, viewport),
            PointerEvent::Move { x, y, buttons } => {
                self.pointer_move(x, y, buttons, viewport, cube, &mut response)
            }
            PointerEvent::Release { .. } => self.release(viewport, &mut response),
            PointerEvent::DoubleClick { x, y } => self.double_click(x, y, viewport, cube, &mut response),
            PointerEvent::Wheel { x, y, delta_y } => {
                self.wheel(x, y, delta_y, viewport, cube, &mut response)
            }
            PointerEvent::Leave => {
                self.gesture = Gesture::Idle;
                self.hover = None;
                response.redraw = true;
                response.cursor = Some(CursorUpdate::Outside);
            }
        }
        response
    }

    /// A press of another button mid-gesture is ignored. Pressing the
    /// gesture's own button again means its release was lost, so the
    /// gesture starts over.
    fn press(&mut self, x: i32, y: i32, button: PointerButton, viewport: &Viewport) {
        if let Some(active) = self.gesture.button().filter(|&active| active != button) {
            log::trace!(
                "{:?} {button:?} press ignored during {active:?} {:?}",
                viewport.orientation,
                self.gesture
            );
            return;
        }
        let (x, y) = viewport.mapper.clamp_to_canvas(x, y);
        self.last = (x, y);
        self.last_angle = viewport.crosshair.pointer_angle(x, y);

        let captured = if viewport.line_visible { self.hover } else { None };
        self.gesture = match (button, captured) {
            (PointerButton::Primary, Some(arms)) => Gesture::DraggingLine(arms),
            (PointerButton::Primary, None) => Gesture::Zooming,
            (PointerButton::Secondary, Some(arms)) => Gesture::Rotating(arms),
            (PointerButton::Secondary, None) => Gesture::AdjustingWindow,
            (PointerButton::Middle, _) => Gesture::Panning,
        };
        log::trace!("{:?} press at ({x}, {y}): {:?}", viewport.orientation, self.gesture);
    }

    fn release(&mut self, viewport: &Viewport, response: &mut Response) {
        if self.gesture.captured().is_some() {
            response.redraw = true;
        }
        self.gesture = Gesture::resting(self.hover);
        if std::mem::take(&mut self.windowing_dirty) {
            log::debug!(
                "{:?} windowing committed: {}, {}",
                viewport.orientation,
                viewport.windowing.level(),
                viewport.windowing.width()
            );
            response
                .notifications
                .push(Notification::WindowingCommitted(viewport.windowing));
        }
    }

    fn pointer_move<C: DataCube + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        buttons: Buttons,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        let (x, y) = viewport.mapper.clamp_to_canvas(x, y);

        let hover = viewport.hit_test(x, y);
        if hover != self.hover {
            self.hover = hover;
            response.redraw = true;
        }

        match self.gesture.button() {
            None => self.gesture = Gesture::resting(hover),
            // the release happened outside of our sight
            Some(button) if !buttons.is_held(button) => self.release(viewport, response),
            Some(_) => {}
        }

        match self.gesture {
            Gesture::DraggingLine(arms) => self.drag_line(arms, x, y, viewport, cube, response),
            Gesture::Rotating(_) if viewport.line_visible => self.rotate(x, y, viewport, cube, response),
            Gesture::Zooming => self.zoom(y, viewport, cube, response),
            Gesture::Panning => self.pan(x, y, viewport, cube, response),
            Gesture::AdjustingWindow => self.adjust_window(x, y, viewport, response),
            _ => {}
        }

        response.cursor = Some(CursorUpdate::At(x, y));
    }

    fn drag_line<C: DataCube + ?Sized>(
        &mut self,
        arms: Arms,
        x: i32,
        y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        let orientation = viewport.orientation;
        let (dx, dy) = viewport.screen_delta(x - self.last.0, y - self.last.1);
        let theta = viewport.crosshair.angle();

        let moved_vertical = arms.contains(Arm::Vertical) && {
            let normal = theta + FRAC_PI_2;
            let distance = dx * normal.sin() - dy * normal.cos();
            cube.move_slice(orientation, orientation.vertical_arm_axis(), distance)
        };
        let moved_horizontal = arms.contains(Arm::Horizontal) && {
            let distance = dy * theta.cos() - dx * theta.sin();
            cube.move_slice(orientation, orientation.horizontal_arm_axis(), distance)
        };

        if let Some(moved) = Arms::from_flags(moved_vertical, moved_horizontal) {
            self.last = (x, y);
            response.redraw = true;
            response.notifications.push(Notification::LineMoved(moved.into()));
        } else {
            log::trace!("{orientation:?} line drag blocked at volume boundary");
        }
    }

    /// Positive rotation is clockwise on screen.
    fn rotate<C: DataCube + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        let angle = viewport.crosshair.pointer_angle(x, y);
        let delta = signed_angle_delta(self.last_angle, angle);
        if delta == 0.0 {
            return;
        }
        if cube.rotate_slice(viewport.orientation, delta) {
            self.last = (x, y);
            self.last_angle = angle;
            response.redraw = true;
            response.notifications.push(Notification::LineMoved(LineMove::Both));
        }
    }

    fn zoom<C: DataCube + ?Sized>(
        &mut self,
        y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        if cube.zoom_slice(viewport.orientation, y - self.last.1) {
            self.last.1 = y;
            response.refresh_slice = true;
            response.notifications.push(Notification::ZoomPanChanged);
        }
    }

    fn pan<C: DataCube + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        let (dx, dy) = viewport.screen_delta(self.last.0 - x, self.last.1 - y);
        if cube.slice_panning(viewport.orientation, dx, dy) {
            self.last = (x, y);
            response.refresh_slice = true;
            response.notifications.push(Notification::ZoomPanChanged);
        }
    }

    /// Horizontal motion widens the window, upward motion raises the level.
    fn adjust_window(&mut self, x: i32, y: i32, viewport: &Viewport, response: &mut Response) {
        let windowing = viewport
            .windowing
            .adjusted(self.last.1 - y, x - self.last.0);
        self.last = (x, y);
        if windowing != viewport.windowing {
            self.windowing_dirty = true;
            response.windowing = Some(windowing);
        }
    }

    fn double_click<C: DataCube + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        let (x, y) = viewport.mapper.clamp_to_canvas(x, y);
        let (anchor_x, anchor_y) = viewport.crosshair.anchor();
        let (dx, dy) = viewport.screen_delta(x - anchor_x, y - anchor_y);
        if cube.move_center(viewport.orientation, dx, dy) {
            response.refresh_slice = true;
            response.notifications.push(Notification::LineMoved(LineMove::Both));
            response.cursor = Some(CursorUpdate::At(x, y));
        }
    }

    fn wheel<C: DataCube + ?Sized>(
        &mut self,
        x: i32,
        y: i32,
        delta_y: i32,
        viewport: &Viewport,
        cube: &mut C,
        response: &mut Response,
    ) {
        if delta_y == 0 {
            return;
        }
        let orientation = viewport.orientation;
        let step = delta_y.signum() as f32;
        if cube.move_slice(orientation, orientation, step) {
            let (x, y) = viewport.mapper.clamp_to_canvas(x, y);
            response.refresh_slice = true;
            response.notifications.push(Notification::LineMoved(LineMove::Wheel));
            response.cursor = Some(CursorUpdate::At(x, y));
        } else {
            log::trace!("{orientation:?} wheel step {step} blocked at volume boundary");
        }
    }
}

/// Shortest signed rotation from `from` to `to`, both in `[0, 2π)`.
pub fn signed_angle_delta(from: f32, to: f32) -> f32 {
    let mut magnitude = (to - from).abs();
    if magnitude > PI {
        magnitude = TAU - magnitude;
    }
    if (to - from).rem_euclid(TAU) < PI {
        magnitude
    } else {
        -magnitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crosshair::{CrosshairLine, HIT_TOLERANCE};
    use crate::test_utils::{Command, RecordingCube};
    use approx::assert_abs_diff_eq;

    const PRIMARY: Buttons = Buttons {
        primary: true,
        secondary: false,
        middle: false,
    };
    const SECONDARY: Buttons = Buttons {
        primary: false,
        secondary: true,
        middle: false,
    };
    const MIDDLE: Buttons = Buttons {
        primary: false,
        secondary: false,
        middle: true,
    };

    /// 1:2 screen to volume scale, crosshair at screen (50, 50).
    fn viewport(orientation: Orientation) -> Viewport {
        let mapper = CoordinateMapper::new(100, 200.0);
        let line = CrosshairLine {
            anchor_x: 100.0,
            anchor_y: 100.0,
            angle_rad: 0.0,
        };
        Viewport {
            orientation,
            mapper,
            crosshair: CrosshairGeometry::new(line, &mapper, HIT_TOLERANCE),
            line_visible: true,
            windowing: Windowing::default(),
        }
    }

    fn hover_and_press(
        controller: &mut InteractionController,
        viewport: &Viewport,
        cube: &mut RecordingCube,
        (x, y): (i32, i32),
        button: PointerButton,
    ) {
        let hover = PointerEvent::Move {
            x,
            y,
            buttons: Buttons::NONE,
        };
        controller.handle(hover, viewport, cube);
        controller.handle(PointerEvent::Press { x, y, button }, viewport, cube);
    }

    #[test]
    fn hovering_an_arm_requests_redraw_once() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        let on_arm = PointerEvent::Move {
            x: 50,
            y: 20,
            buttons: Buttons::NONE,
        };

        let first = controller.handle(on_arm, &viewport, &mut cube);
        assert!(first.redraw);
        assert_eq!(controller.gesture(), Gesture::Hover(Arms::Vertical));
        assert_eq!(first.cursor, Some(CursorUpdate::At(50, 20)));

        let second = controller.handle(on_arm, &viewport, &mut cube);
        assert!(!second.redraw);
        assert!(cube.commands.is_empty());
    }

    #[test]
    fn hidden_crosshair_cannot_be_hovered() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = Viewport {
            line_visible: false,
            ..viewport(Orientation::Axial)
        };
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 50), PointerButton::Primary);
        assert_eq!(controller.hover(), None);
        assert_eq!(controller.gesture(), Gesture::Zooming);
    }

    #[test]
    fn vertical_drag_moves_one_orthogonal_axis() {
        for orientation in Orientation::ALL {
            let mut controller = InteractionController::default();
            let mut cube = RecordingCube::default();
            let viewport = viewport(orientation);
            hover_and_press(&mut controller, &viewport, &mut cube, (50, 20), PointerButton::Primary);
            assert_eq!(controller.gesture(), Gesture::DraggingLine(Arms::Vertical));

            let drag = PointerEvent::Move {
                x: 55,
                y: 20,
                buttons: PRIMARY,
            };
            let response = controller.handle(drag, &viewport, &mut cube);

            assert_eq!(cube.commands.len(), 1);
            let Command::MoveSlice(from, axis, distance) = cube.commands[0] else {
                panic!("expected a slice move, got {:?}", cube.commands[0]);
            };
            assert_eq!(from, orientation);
            assert_ne!(axis, orientation);
            assert_eq!(axis, orientation.vertical_arm_axis());
            assert_abs_diff_eq!(distance, 10.0, epsilon = 1e-4);
            assert_eq!(
                response.notifications,
                vec![Notification::LineMoved(LineMove::Vertical)]
            );
            assert!(response.redraw);
            assert!(!response.refresh_slice);
        }
    }

    #[test]
    fn horizontal_drag_projects_onto_the_arm_normal() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Coronal);
        hover_and_press(&mut controller, &viewport, &mut cube, (80, 50), PointerButton::Primary);
        assert_eq!(controller.gesture(), Gesture::DraggingLine(Arms::Horizontal));

        let drag = PointerEvent::Move {
            x: 90,
            y: 47,
            buttons: PRIMARY,
        };
        let response = controller.handle(drag, &viewport, &mut cube);

        let Command::MoveSlice(_, axis, distance) = cube.commands[0] else {
            panic!("expected a slice move");
        };
        assert_eq!(axis, Orientation::Axial);
        assert_abs_diff_eq!(distance, -6.0, epsilon = 1e-4);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Horizontal)]
        );
    }

    #[test]
    fn dragging_the_centre_moves_both_arms() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 50), PointerButton::Primary);
        assert_eq!(controller.gesture(), Gesture::DraggingLine(Arms::Both));

        let drag = PointerEvent::Move {
            x: 52,
            y: 53,
            buttons: PRIMARY,
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        assert_eq!(cube.commands.len(), 2);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Both)]
        );
    }

    #[test]
    fn blocked_drag_reports_nothing_and_keeps_anchor() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::rejecting();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 20), PointerButton::Primary);

        for x in [52, 54] {
            let drag = PointerEvent::Move {
                x,
                y: 20,
                buttons: PRIMARY,
            };
            let response = controller.handle(drag, &viewport, &mut cube);
            assert!(response.notifications.is_empty());
            assert!(!response.refresh_slice);
        }
        // motion accumulates from the press point
        let Command::MoveSlice(_, _, distance) = cube.commands[1] else {
            panic!("expected a slice move");
        };
        assert_abs_diff_eq!(distance, 8.0, epsilon = 1e-4);
    }

    #[test]
    fn primary_drag_on_canvas_zooms() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Sagittal);
        hover_and_press(&mut controller, &viewport, &mut cube, (80, 80), PointerButton::Primary);
        assert_eq!(controller.gesture(), Gesture::Zooming);

        let drag = PointerEvent::Move {
            x: 81,
            y: 70,
            buttons: PRIMARY,
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        assert_eq!(cube.commands, vec![Command::Zoom(Orientation::Sagittal, -10)]);
        assert!(response.refresh_slice);
        assert_eq!(response.notifications, vec![Notification::ZoomPanChanged]);
    }

    #[test]
    fn middle_drag_pans_against_pointer_motion() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 50), PointerButton::Middle);
        assert_eq!(controller.gesture(), Gesture::Panning);

        let drag = PointerEvent::Move {
            x: 53,
            y: 49,
            buttons: MIDDLE,
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        assert_eq!(cube.commands, vec![Command::Pan(Orientation::Axial, -6.0, 2.0)]);
        assert!(response.refresh_slice);
        assert_eq!(response.notifications, vec![Notification::ZoomPanChanged]);
    }

    #[test]
    fn secondary_drag_on_arm_rotates() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (90, 50), PointerButton::Secondary);
        assert_eq!(controller.gesture(), Gesture::Rotating(Arms::Horizontal));

        // quarter turn clockwise on screen
        let drag = PointerEvent::Move {
            x: 50,
            y: 90,
            buttons: SECONDARY,
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        let Command::Rotate(_, delta) = cube.commands[0] else {
            panic!("expected a rotation");
        };
        assert_abs_diff_eq!(delta, FRAC_PI_2, epsilon = 1e-5);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Both)]
        );
    }

    #[test]
    fn secondary_drag_on_canvas_adjusts_windowing_until_release() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let mut viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (80, 80), PointerButton::Secondary);
        assert_eq!(controller.gesture(), Gesture::AdjustingWindow);

        let drag = PointerEvent::Move {
            x: 90,
            y: 75,
            buttons: SECONDARY,
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        let windowing = response.windowing.expect("windowing should change");
        assert_eq!((windowing.level(), windowing.width()), (55, 360));
        assert!(controller.windowing_dirty());
        assert!(cube.commands.is_empty());

        viewport.windowing = windowing;
        let release = PointerEvent::Release {
            x: 90,
            y: 75,
            button: PointerButton::Secondary,
        };
        let response = controller.handle(release, &viewport, &mut cube);
        assert_eq!(
            response.notifications,
            vec![Notification::WindowingCommitted(windowing)]
        );
        assert!(!controller.windowing_dirty());

        let response = controller.handle(release, &viewport, &mut cube);
        assert!(response.notifications.is_empty());
    }

    #[test]
    fn windowing_stays_clamped() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let mut viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (0, 0), PointerButton::Secondary);

        for (x, y) in [(174, 0), (0, 99), (174, 99), (0, 0), (174, 0), (0, 0)] {
            let drag = PointerEvent::Move {
                x: x * 40,
                y: y * 40,
                buttons: SECONDARY,
            };
            if let Some(windowing) = controller.handle(drag, &viewport, &mut cube).windowing {
                viewport.windowing = windowing;
            }
            assert!((-1000..=3096).contains(&viewport.windowing.level()));
            assert!((10..=4000).contains(&viewport.windowing.width()));
        }
    }

    #[test]
    fn wheel_steps_own_axis() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Coronal);

        let up = PointerEvent::Wheel {
            x: 10,
            y: 10,
            delta_y: 120,
        };
        let response = controller.handle(up, &viewport, &mut cube);
        assert_eq!(
            cube.commands,
            vec![Command::MoveSlice(Orientation::Coronal, Orientation::Coronal, 1.0)]
        );
        assert!(response.refresh_slice);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Wheel)]
        );
        assert_eq!(response.cursor, Some(CursorUpdate::At(10, 10)));

        let still = PointerEvent::Wheel {
            x: 10,
            y: 10,
            delta_y: 0,
        };
        assert_eq!(controller.handle(still, &viewport, &mut cube), Response::default());
        assert_eq!(cube.commands.len(), 1);
    }

    #[test]
    fn blocked_wheel_changes_nothing() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::rejecting();
        let viewport = viewport(Orientation::Axial);
        let down = PointerEvent::Wheel {
            x: 10,
            y: 10,
            delta_y: -1,
        };
        assert_eq!(controller.handle(down, &viewport, &mut cube), Response::default());
    }

    #[test]
    fn double_click_recentres_on_pointer() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        let click = PointerEvent::DoubleClick { x: 60, y: 45 };
        let response = controller.handle(click, &viewport, &mut cube);
        assert_eq!(cube.commands, vec![Command::MoveCenter(Orientation::Axial, 20.0, -10.0)]);
        assert!(response.refresh_slice);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Both)]
        );
        assert_eq!(response.cursor, Some(CursorUpdate::At(60, 45)));
    }

    #[test]
    fn leave_clears_hover_and_capture() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 20), PointerButton::Primary);

        let response = controller.handle(PointerEvent::Leave, &viewport, &mut cube);
        assert!(response.redraw);
        assert_eq!(response.cursor, Some(CursorUpdate::Outside));
        assert_eq!(controller.gesture(), Gesture::Idle);
        assert_eq!(controller.highlighted(), None);
    }

    #[test]
    fn second_button_does_not_hijack_a_drag() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 20), PointerButton::Primary);

        let secondary = PointerEvent::Press {
            x: 50,
            y: 20,
            button: PointerButton::Secondary,
        };
        let response = controller.handle(secondary, &viewport, &mut cube);
        assert_eq!(response, Response::default());
        assert_eq!(controller.gesture(), Gesture::DraggingLine(Arms::Vertical));

        let drag = PointerEvent::Move {
            x: 55,
            y: 20,
            buttons: Buttons {
                primary: true,
                secondary: true,
                middle: false,
            },
        };
        let response = controller.handle(drag, &viewport, &mut cube);
        assert_eq!(cube.commands.len(), 1);
        let Command::MoveSlice(Orientation::Axial, Orientation::Sagittal, distance) = cube.commands[0]
        else {
            panic!("expected a sagittal slice move, got {:?}", cube.commands[0]);
        };
        assert_abs_diff_eq!(distance, 10.0, epsilon = 1e-4);
        assert_eq!(
            response.notifications,
            vec![Notification::LineMoved(LineMove::Vertical)]
        );
        assert!(!controller.windowing_dirty());
    }

    #[test]
    fn missed_release_ends_gesture_on_next_move() {
        let mut controller = InteractionController::default();
        let mut cube = RecordingCube::default();
        let viewport = viewport(Orientation::Axial);
        hover_and_press(&mut controller, &viewport, &mut cube, (50, 20), PointerButton::Primary);

        let hover = PointerEvent::Move {
            x: 60,
            y: 20,
            buttons: Buttons::NONE,
        };
        controller.handle(hover, &viewport, &mut cube);
        assert!(cube.commands.is_empty());
        assert_eq!(controller.gesture(), Gesture::Idle);
    }

    #[test]
    fn signed_delta_takes_the_short_way_round() {
        assert_abs_diff_eq!(signed_angle_delta(0.1, 0.3), 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(signed_angle_delta(0.3, 0.1), -0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(signed_angle_delta(TAU - 0.1, 0.1), 0.2, epsilon = 1e-5);
        assert_abs_diff_eq!(signed_angle_delta(0.1, TAU - 0.1), -0.2, epsilon = 1e-5);
    }
}
