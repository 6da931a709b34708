//! Pointer and keyboard input for inline_text: gesture arena, tap/drag
//! recognition, consecutive-tap tracking, and the keyboard reducer.

/// Gesture arena and verdict queue.
pub mod arena;
/// Pointer events and emitted intents.
pub mod events;
/// Keyboard events to editing commands.
pub mod keys;
/// Tap/drag recognizer.
pub mod recognizer;
/// Consecutive-tap tracker.
pub mod tracker;
/// Release-velocity estimation.
pub mod velocity;

pub use arena::{ArenaVerdict, GestureArena, GestureArenaManager, GestureDisposition, MemberId};
pub use events::{
    Buttons, PointerData, PointerDeviceKind, PointerEvent, PointerId, TapDragDownDetails,
    TapDragEndDetails, TapDragEvent, TapDragStartDetails, TapDragUpDetails, TapDragUpdateDetails,
};
pub use keys::commands_from_events;
pub use recognizer::{DragAxis, DragStartBehavior, GesturePhase, TapAndDragGestureRecognizer};
pub use tracker::ConsecutiveTapTracker;
pub use velocity::VelocityTracker;
