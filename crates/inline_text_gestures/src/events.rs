//! Pointer input consumed by recognizers and the intents they emit.

use egui::{Modifiers, Pos2, Vec2};
use std::fmt;
use std::time::Duration;

/// Identity of one pointer contact for the lifetime of its down..up sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl fmt::Display for PointerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pointer {}", self.0)
    }
}

/// Pressed-button bitmask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(pub u32);

impl Buttons {
    pub const NONE: Self = Self(0);
    pub const PRIMARY: Self = Self(1);
    pub const SECONDARY: Self = Self(1 << 1);
    pub const MIDDLE: Self = Self(1 << 2);

    /// # Returns
    /// `true` when every button in `other` is pressed.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// # Returns
    /// `true` when no button is pressed.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Input device behind a pointer; picks the slops a gesture uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PointerDeviceKind {
    Mouse,
    #[default]
    Touch,
    Stylus,
    Trackpad,
}

impl PointerDeviceKind {
    /// Mice report positions precisely enough for tighter slops.
    pub fn is_precise(self) -> bool {
        matches!(self, Self::Mouse)
    }
}

/// Fields shared by every pointer event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerData {
    pub pointer: PointerId,
    /// Position in global (screen) coordinates.
    pub position: Pos2,
    /// Position in the receiving widget's coordinates.
    pub local_position: Pos2,
    pub buttons: Buttons,
    pub kind: PointerDeviceKind,
    /// Monotonic event time; all recognizer timers run on this clock.
    pub timestamp: Duration,
    pub modifiers: Modifiers,
}

impl PointerData {
    /// Primary-button touch contact with local == global position.
    ///
    /// # Arguments
    /// - `pointer`: Identity shared by every event of one contact.
    /// - `position`: Global position of the sample.
    /// - `timestamp`: Time on the clock recognizer timers run on.
    pub fn new(pointer: PointerId, position: Pos2, timestamp: Duration) -> Self {
        Self {
            pointer,
            position,
            local_position: position,
            buttons: Buttons::PRIMARY,
            kind: PointerDeviceKind::Touch,
            timestamp,
            modifiers: Modifiers::NONE,
        }
    }

    /// Same sample from another kind of device.
    pub fn with_kind(mut self, kind: PointerDeviceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_buttons(mut self, buttons: Buttons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_local_position(mut self, local_position: Pos2) -> Self {
        self.local_position = local_position;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Raw pointer input fed to recognizers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(PointerData),
    Move(PointerData),
    Up(PointerData),
    Cancel(PointerData),
}

impl PointerEvent {
    /// # Returns
    /// The sample carried by the event, whatever its kind.
    pub fn data(&self) -> &PointerData {
        match self {
            Self::Down(data) | Self::Move(data) | Self::Up(data) | Self::Cancel(data) => data,
        }
    }

    pub fn pointer(&self) -> PointerId {
        self.data().pointer
    }

    pub fn timestamp(&self) -> Duration {
        self.data().timestamp
    }
}

/// Where and how a tap went down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapDragDownDetails {
    pub global_position: Pos2,
    pub local_position: Pos2,
    pub kind: PointerDeviceKind,
    pub consecutive_tap_count: u32,
}

/// Where and how a tap came up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapDragUpDetails {
    pub global_position: Pos2,
    pub local_position: Pos2,
    pub kind: PointerDeviceKind,
    pub consecutive_tap_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapDragStartDetails {
    pub timestamp: Duration,
    pub global_position: Pos2,
    pub local_position: Pos2,
    pub kind: PointerDeviceKind,
    pub consecutive_tap_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapDragUpdateDetails {
    pub timestamp: Duration,
    /// Movement since the previous update, projected onto the drag axis.
    pub delta: Vec2,
    pub global_position: Pos2,
    pub local_position: Pos2,
    /// Total movement since the pointer went down, projected onto the drag axis.
    pub offset_from_origin: Vec2,
    pub consecutive_tap_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TapDragEndDetails {
    /// Release velocity in logical pixels per second.
    pub velocity: Vec2,
    /// Velocity along the drag axis; `None` for free drags.
    pub primary_velocity: Option<f32>,
    pub consecutive_tap_count: u32,
}

/// Intents emitted by [`crate::TapAndDragGestureRecognizer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapDragEvent {
    TapDown(TapDragDownDetails),
    TapUp(TapDragUpDetails),
    TapCancel,
    DragStart(TapDragStartDetails),
    DragUpdate(TapDragUpdateDetails),
    DragEnd(TapDragEndDetails),
    DragCancel,
}

impl TapDragEvent {
    /// # Returns
    /// Stable snake_case name used in logs and replay output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TapDown(_) => "tap_down",
            Self::TapUp(_) => "tap_up",
            Self::TapCancel => "tap_cancel",
            Self::DragStart(_) => "drag_start",
            Self::DragUpdate(_) => "drag_update",
            Self::DragEnd(_) => "drag_end",
            Self::DragCancel => "drag_cancel",
        }
    }

    /// Tap count attached to the event.
    ///
    /// # Returns
    /// `None` for the cancel events, which carry no details.
    pub fn consecutive_tap_count(&self) -> Option<u32> {
        match self {
            Self::TapDown(details) => Some(details.consecutive_tap_count),
            Self::TapUp(details) => Some(details.consecutive_tap_count),
            Self::DragStart(details) => Some(details.consecutive_tap_count),
            Self::DragUpdate(details) => Some(details.consecutive_tap_count),
            Self::DragEnd(details) => Some(details.consecutive_tap_count),
            Self::TapCancel | Self::DragCancel => None,
        }
    }
}
