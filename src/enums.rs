use image::Rgb;

/// One of the three orthogonal reformation planes. Each plane is named by
/// the physical axis it is perpendicular to: axial (z), sagittal (x) and
/// coronal (y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Axial,
    Coronal,
    Sagittal,
}

impl Orientation {
    pub const ALL: [Orientation; 3] = [
        Orientation::Axial,
        Orientation::Sagittal,
        Orientation::Coronal,
    ];

    /// Axis index used by the volume collaborator: 0 = z, 1 = x, 2 = y.
    pub fn axis_index(self) -> usize {
        match self {
            Orientation::Axial => 0,
            Orientation::Sagittal => 1,
            Orientation::Coronal => 2,
        }
    }

    /// Axis moved when the vertical arm of this view's crosshair is dragged.
    pub fn vertical_arm_axis(self) -> Orientation {
        match self {
            Orientation::Axial | Orientation::Coronal => Orientation::Sagittal,
            Orientation::Sagittal => Orientation::Axial,
        }
    }

    /// Axis moved when the horizontal arm of this view's crosshair is dragged.
    pub fn horizontal_arm_axis(self) -> Orientation {
        match self {
            Orientation::Axial | Orientation::Sagittal => Orientation::Coronal,
            Orientation::Coronal => Orientation::Axial,
        }
    }

    pub fn arm_axis(self, arm: Arm) -> Orientation {
        match arm {
            Arm::Vertical => self.vertical_arm_axis(),
            Arm::Horizontal => self.horizontal_arm_axis(),
        }
    }

    /// Colour of this physical axis, shared by every view that draws it.
    pub fn line_color(self) -> Rgb<u8> {
        match self {
            Orientation::Axial => Rgb([255, 0, 0]),
            Orientation::Sagittal => Rgb([0, 255, 0]),
            Orientation::Coronal => Rgb([0, 0, 255]),
        }
    }
}

/// A single arm of the crosshair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arm {
    Vertical,
    Horizontal,
}

/// A non-empty set of crosshair arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arms {
    Vertical,
    Horizontal,
    Both,
}

impl Arms {
    pub fn from_flags(vertical: bool, horizontal: bool) -> Option<Self> {
        match (vertical, horizontal) {
            (true, true) => Some(Arms::Both),
            (true, false) => Some(Arms::Vertical),
            (false, true) => Some(Arms::Horizontal),
            (false, false) => None,
        }
    }

    pub fn contains(self, arm: Arm) -> bool {
        matches!(
            (self, arm),
            (Arms::Both, _) | (Arms::Vertical, Arm::Vertical) | (Arms::Horizontal, Arm::Horizontal)
        )
    }
}

/// Why the crosshair moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMove {
    Vertical,
    Horizontal,
    Both,
    Wheel,
}

impl From<Arms> for LineMove {
    fn from(arms: Arms) -> Self {
        match arms {
            Arms::Vertical => LineMove::Vertical,
            Arms::Horizontal => LineMove::Horizontal,
            Arms::Both => LineMove::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Buttons held during a pointer move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buttons {
    pub primary: bool,
    pub secondary: bool,
    pub middle: bool,
}

impl Buttons {
    pub const NONE: Buttons = Buttons {
        primary: false,
        secondary: false,
        middle: false,
    };

    pub fn only(button: PointerButton) -> Self {
        let mut buttons = Self::NONE;
        match button {
            PointerButton::Primary => buttons.primary = true,
            PointerButton::Secondary => buttons.secondary = true,
            PointerButton::Middle => buttons.middle = true,
        }
        buttons
    }

    pub fn is_held(&self, button: PointerButton) -> bool {
        match button {
            PointerButton::Primary => self.primary,
            PointerButton::Secondary => self.secondary,
            PointerButton::Middle => self.middle,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Bilinear,
    // TODO: trilinear sampling across neighbouring planes
    None,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}
