//! Compound tap + drag recognizer with consecutive-tap counting.
//!
//! One primary pointer is tracked at a time. While the pointer is undecided
//! the recognizer waits for either the arena's verdict or enough travel to
//! claim a drag. Emitted intents are queued and collected with
//! [`TapAndDragGestureRecognizer::drain_events`].

use crate::arena::{ArenaVerdict, GestureArena, GestureDisposition, MemberId};
use crate::events::{
    PointerData, PointerDeviceKind, PointerEvent, PointerId, TapDragDownDetails, TapDragEndDetails,
    TapDragEvent, TapDragStartDetails, TapDragUpDetails, TapDragUpdateDetails,
};
use crate::tracker::ConsecutiveTapTracker;
use crate::velocity::VelocityTracker;
use egui::{Pos2, Vec2};
use inline_text_core::constants::{PRECISE_POINTER_HIT_SLOP, PRECISE_POINTER_PAN_SLOP};
use inline_text_core::GestureConfig;
use std::collections::HashMap;
use std::mem;
use std::time::Duration;
use tracing::{debug, trace};

/// Axis a drag is measured and reported along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragAxis {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

impl DragAxis {
    fn project(self, delta: Vec2) -> Vec2 {
        match self {
            Self::Free => delta,
            Self::Horizontal => Vec2::new(delta.x, 0.0),
            Self::Vertical => Vec2::new(0.0, delta.y),
        }
    }
}

/// Where a drag reports its start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragStartBehavior {
    /// At the pointer-down position, followed by an update covering the
    /// travel needed to recognize the drag.
    #[default]
    Down,
    /// At the position where the drag was recognized.
    Start,
}

/// Recognizer state as seen from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// No pointer tracked.
    Ready,
    /// Tracking a pointer whose arena is undecided.
    Possible,
    /// The arena was won for the tracked pointer.
    Accepted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DragState {
    /// Could still be a tap or a drag.
    Possible,
    /// Travelled far enough to drag; waiting for the arena.
    Claimed,
    Dragging,
}

/// Per-pointer record, created on down and dropped on the terminal transition.
#[derive(Debug)]
struct PointerTrack {
    down: PointerData,
    last: PointerData,
    up: Option<PointerData>,
    drag: DragState,
    won_arena: bool,
    tap_down_sent: bool,
    tap_cancelled: bool,
    past_slop_tolerance: bool,
    /// Signed travel along the drag axis, for axis-locked drags.
    axis_travel: f32,
    /// Series count when the pointer went down; a drag keeps reporting it.
    tap_count: u32,
    /// Provisional tap-down timer, armed until the arena rules or the
    /// pointer commits to a drag or release.
    tap_down_deadline: Option<Duration>,
    velocity: VelocityTracker,
}

impl PointerTrack {
    fn new(down: PointerData, tap_count: u32, tap_down_deadline: Duration) -> Self {
        let mut velocity = VelocityTracker::new();
        velocity.add(down.timestamp, down.position);
        Self {
            down,
            last: down,
            up: None,
            drag: DragState::Possible,
            won_arena: false,
            tap_down_sent: false,
            tap_cancelled: false,
            past_slop_tolerance: false,
            axis_travel: 0.0,
            tap_count,
            tap_down_deadline: Some(down.timestamp + tap_down_deadline),
            velocity,
        }
    }

    fn travelled(&self) -> f32 {
        self.down.position.distance(self.last.position)
    }

    fn drag_distance(&self, axis: DragAxis) -> f32 {
        match axis {
            DragAxis::Free => self.travelled(),
            DragAxis::Horizontal | DragAxis::Vertical => self.axis_travel.abs(),
        }
    }

    fn has_fired(&self) -> bool {
        self.tap_down_sent || self.drag == DragState::Dragging
    }
}

enum MoveOutcome {
    Nothing,
    Claim,
    Reject,
}

/// Disambiguates taps from drags and counts consecutive taps.
#[derive(Debug)]
pub struct TapAndDragGestureRecognizer {
    member: MemberId,
    config: GestureConfig,
    pub drag_axis: DragAxis,
    pub drag_start_behavior: DragStartBehavior,
    /// Travel allowed before the arena is won; exceeding it without reaching
    /// the drag threshold withdraws the recognizer.
    pub pre_accept_slop_tolerance: Option<f32>,
    /// Same as `pre_accept_slop_tolerance`, after the arena is won.
    pub post_accept_slop_tolerance: Option<f32>,
    /// Travel past which a release no longer counts as a tap-up.
    pub slop_tolerance: Option<f32>,
    tracker: ConsecutiveTapTracker,
    tracks: HashMap<PointerId, PointerTrack>,
    primary: Option<PointerId>,
    events: Vec<TapDragEvent>,
    disposed: bool,
}

impl TapAndDragGestureRecognizer {
    /// Create a recognizer entering arenas as `member`.
    ///
    /// Every slop tolerance starts at the configured touch slop.
    ///
    /// # Arguments
    /// - `member`: Arena identity used for every pointer this recognizer tracks.
    /// - `config`: Timeouts and slops for tap counting and drag detection.
    ///
    /// # Returns
    /// An idle recognizer in [`GesturePhase::Ready`].
    pub fn new(member: MemberId, config: GestureConfig) -> Self {
        Self {
            member,
            tracker: ConsecutiveTapTracker::new(&config),
            slop_tolerance: Some(config.touch_slop),
            pre_accept_slop_tolerance: Some(config.touch_slop),
            post_accept_slop_tolerance: Some(config.touch_slop),
            config,
            drag_axis: DragAxis::Free,
            drag_start_behavior: DragStartBehavior::Down,
            tracks: HashMap::new(),
            primary: None,
            events: Vec::new(),
            disposed: false,
        }
    }

    /// # Returns
    /// The arena identity passed to [`TapAndDragGestureRecognizer::new`].
    pub fn member(&self) -> MemberId {
        self.member
    }

    /// # Returns
    /// Where the primary pointer stands relative to its arena.
    pub fn phase(&self) -> GesturePhase {
        match self.primary.and_then(|pointer| self.tracks.get(&pointer)) {
            None => GesturePhase::Ready,
            Some(track) if track.won_arena => GesturePhase::Accepted,
            Some(_) => GesturePhase::Possible,
        }
    }

    /// Latest position of the tracked primary pointer.
    ///
    /// # Returns
    /// `None` when no pointer is tracked.
    pub fn primary_position(&self) -> Option<Pos2> {
        self.primary
            .and_then(|pointer| self.tracks.get(&pointer))
            .map(|track| track.last.position)
    }

    /// Taps in the current series.
    ///
    /// # Returns
    /// 0 when no series is running, including after the pointer wandered.
    pub fn consecutive_tap_count(&self) -> u32 {
        self.tracker.count()
    }

    /// Earliest timer the driver must poll for.
    ///
    /// # Returns
    /// The sooner of the primary pointer's tap-down deadline and the series
    /// expiry, or `None` when no timer is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        let tap_down = self
            .primary
            .and_then(|pointer| self.tracks.get(&pointer))
            .and_then(|track| track.tap_down_deadline);
        match (tap_down, self.tracker.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Take every intent emitted so far.
    ///
    /// # Returns
    /// The queued intents in emission order; the queue is left empty.
    pub fn drain_events(&mut self) -> Vec<TapDragEvent> {
        mem::take(&mut self.events)
    }

    /// Start tracking a pointer-down.
    ///
    /// A second pointer arriving while one is tracked is entered into its
    /// arena and withdrawn at once.
    ///
    /// # Arguments
    /// - `down`: The pointer-down sample.
    /// - `arena`: Arena the pointer is entered into.
    pub fn add_pointer(&mut self, down: &PointerData, arena: &mut dyn GestureArena) {
        if self.disposed {
            return;
        }
        arena.add(down.pointer, self.member);
        if self.primary.is_some() {
            debug!(pointer = %down.pointer, "ignoring secondary pointer");
            arena.resolve(down.pointer, self.member, GestureDisposition::Rejected);
            return;
        }
        let count = self
            .tracker
            .on_down(down.position, down.buttons, down.timestamp);
        self.tracks.insert(
            down.pointer,
            PointerTrack::new(*down, count, self.config.tap_down_deadline),
        );
        self.primary = Some(down.pointer);
        debug!(pointer = %down.pointer, count, "tracking pointer");
    }

    /// Route one pointer event.
    ///
    /// # Arguments
    /// - `event`: Down, move, up or cancel for any pointer.
    /// - `arena`: Arena receiving claims and withdrawals for the pointer.
    pub fn handle_event(&mut self, event: &PointerEvent, arena: &mut dyn GestureArena) {
        if self.disposed {
            return;
        }
        match event {
            PointerEvent::Down(data) => self.add_pointer(data, arena),
            PointerEvent::Move(data) => self.handle_move(data, arena),
            PointerEvent::Up(data) => self.handle_up(data),
            PointerEvent::Cancel(data) => {
                if self.tracks.contains_key(&data.pointer) {
                    debug!(pointer = %data.pointer, "pointer cancelled");
                    arena.resolve(data.pointer, self.member, GestureDisposition::Rejected);
                    self.abandon(data.pointer, false);
                }
            }
        }
    }

    /// Forward an arena verdict addressed to this recognizer.
    ///
    /// # Arguments
    /// - `verdict`: A verdict drained from the arena; other members' verdicts
    ///   are ignored.
    pub fn handle_verdict(&mut self, verdict: &ArenaVerdict) {
        if verdict.member != self.member {
            return;
        }
        match verdict.disposition {
            GestureDisposition::Accepted => self.accept_gesture(verdict.pointer),
            GestureDisposition::Rejected => self.reject_gesture(verdict.pointer),
        }
    }

    /// The arena picked this recognizer for `pointer`.
    ///
    /// Reports the tap-down if it is still pending, then completes whatever
    /// the pointer already did while undecided: a claimed drag starts, a
    /// release finishes the tap.
    ///
    /// # Arguments
    /// - `pointer`: The pointer whose arena was won.
    pub fn accept_gesture(&mut self, pointer: PointerId) {
        if self.disposed || self.primary != Some(pointer) {
            return;
        }
        let Some(track) = self.tracks.get_mut(&pointer) else {
            return;
        };
        if track.won_arena {
            return;
        }
        track.won_arena = true;
        track.tap_down_deadline = None;
        debug!(%pointer, "accepted");
        self.send_tap_down(pointer);

        let Some(track) = self.tracks.get(&pointer) else {
            return;
        };
        let (drag, up) = (track.drag, track.up);
        if drag == DragState::Claimed {
            self.start_drag(pointer);
            if up.is_some() {
                self.end_drag(pointer);
            }
        } else if let Some(up) = up {
            self.finish_tap(pointer, &up);
        }
    }

    /// The arena ruled against this recognizer for `pointer`.
    ///
    /// # Arguments
    /// - `pointer`: The pointer whose arena was lost.
    pub fn reject_gesture(&mut self, pointer: PointerId) {
        if self.disposed {
            return;
        }
        if self.tracks.contains_key(&pointer) {
            debug!(%pointer, "rejected");
            self.abandon(pointer, true);
        }
    }

    /// Fire timers that are due at `now`.
    ///
    /// # Arguments
    /// - `now`: Current time on the pointer events' clock.
    /// - `arena`: Arena to claim when a slow tap in a series hits its deadline.
    pub fn poll_timers(&mut self, now: Duration, arena: &mut dyn GestureArena) {
        if self.disposed {
            return;
        }
        let due = self
            .primary
            .and_then(|pointer| self.tracks.get_mut(&pointer))
            .filter(|track| track.tap_down_deadline.is_some_and(|deadline| now >= deadline));
        if let Some(track) = due {
            track.tap_down_deadline = None;
            self.did_exceed_deadline(arena);
        }
        if self.tracker.poll(now) {
            debug!("tap series expired");
        }
    }

    /// Stop every timer and forget all pointers. Safe to call repeatedly.
    ///
    /// Pending tap-down deadlines go with their pointer tracks; later events
    /// and polls are ignored.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.tracker.stop_timer();
        self.tracks.clear();
        self.primary = None;
        debug!(member = %self.member, "disposed");
    }

    /// # Returns
    /// `true` once [`TapAndDragGestureRecognizer::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn did_exceed_deadline(&mut self, arena: &mut dyn GestureArena) {
        let Some(pointer) = self.primary else {
            return;
        };
        let Some(track) = self.tracks.get(&pointer) else {
            return;
        };
        if track.won_arena || track.drag != DragState::Possible {
            return;
        }
        let in_series = track.tap_count > 1;
        trace!(%pointer, "tap-down deadline reached");
        self.send_tap_down(pointer);
        if in_series {
            arena.resolve(pointer, self.member, GestureDisposition::Accepted);
        }
    }

    fn handle_move(&mut self, data: &PointerData, arena: &mut dyn GestureArena) {
        let axis = self.drag_axis;
        let pan_slop = self.pan_slop(data.kind);
        let hit_slop = self.hit_slop(data.kind);
        let Some(track) = self.tracks.get_mut(&data.pointer) else {
            return;
        };
        if track.up.is_some() {
            return;
        }
        let delta = data.position - track.last.position;
        track.last = *data;
        track.velocity.add(data.timestamp, data.position);
        track.axis_travel += match axis {
            DragAxis::Horizontal => delta.x,
            DragAxis::Vertical => delta.y,
            DragAxis::Free => 0.0,
        };

        let outcome = match track.drag {
            DragState::Dragging => {
                let details = TapDragUpdateDetails {
                    timestamp: data.timestamp,
                    delta: axis.project(delta),
                    global_position: data.position,
                    local_position: data.local_position,
                    offset_from_origin: axis.project(data.position - track.down.position),
                    consecutive_tap_count: track.tap_count,
                };
                self.events.push(TapDragEvent::DragUpdate(details));
                MoveOutcome::Nothing
            }
            DragState::Claimed => MoveOutcome::Nothing,
            DragState::Possible => {
                let travelled = track.travelled();
                if self.slop_tolerance.is_some_and(|slop| travelled > slop) {
                    track.past_slop_tolerance = true;
                }
                let tolerance = if track.won_arena {
                    self.post_accept_slop_tolerance
                } else {
                    self.pre_accept_slop_tolerance
                };
                if track.drag_distance(axis) > pan_slop {
                    track.drag = DragState::Claimed;
                    track.tap_down_deadline = None;
                    MoveOutcome::Claim
                } else if tolerance.is_some_and(|limit| travelled > limit) {
                    MoveOutcome::Reject
                } else {
                    MoveOutcome::Nothing
                }
            }
        };
        let won_arena = track.won_arena;
        self.tracker.on_move(data.position, hit_slop);

        match outcome {
            MoveOutcome::Nothing => {}
            MoveOutcome::Claim => {
                debug!(pointer = %data.pointer, "drag threshold reached");
                arena.resolve(data.pointer, self.member, GestureDisposition::Accepted);
                if won_arena {
                    self.start_drag(data.pointer);
                }
            }
            MoveOutcome::Reject => {
                debug!(pointer = %data.pointer, "moved past tap tolerance");
                arena.resolve(data.pointer, self.member, GestureDisposition::Rejected);
                self.abandon(data.pointer, true);
            }
        }
    }

    fn handle_up(&mut self, data: &PointerData) {
        let Some(track) = self.tracks.get_mut(&data.pointer) else {
            return;
        };
        track.last = *data;
        track.up = Some(*data);
        track.velocity.add(data.timestamp, data.position);
        track.tap_down_deadline = None;
        let (drag, won_arena) = (track.drag, track.won_arena);
        if drag == DragState::Possible {
            self.tracker.on_up(data.position, data.timestamp);
        }
        match (drag, won_arena) {
            (DragState::Dragging, _) => self.end_drag(data.pointer),
            (DragState::Possible, true) => self.finish_tap(data.pointer, data),
            // Undecided: keep the track until the arena rules.
            _ => trace!(pointer = %data.pointer, "up before arena resolution"),
        }
    }

    fn send_tap_down(&mut self, pointer: PointerId) {
        let Some(track) = self.tracks.get_mut(&pointer) else {
            return;
        };
        if track.tap_down_sent {
            return;
        }
        track.tap_down_sent = true;
        self.events.push(TapDragEvent::TapDown(TapDragDownDetails {
            global_position: track.down.position,
            local_position: track.down.local_position,
            kind: track.down.kind,
            consecutive_tap_count: track.tap_count,
        }));
    }

    fn finish_tap(&mut self, pointer: PointerId, up: &PointerData) {
        let Some(track) = self.tracks.remove(&pointer) else {
            return;
        };
        if track.past_slop_tolerance {
            if track.tap_down_sent {
                self.events.push(TapDragEvent::TapCancel);
            }
        } else {
            self.events.push(TapDragEvent::TapUp(TapDragUpDetails {
                global_position: up.position,
                local_position: up.local_position,
                kind: up.kind,
                consecutive_tap_count: track.tap_count,
            }));
        }
        self.release_primary(pointer);
    }

    fn start_drag(&mut self, pointer: PointerId) {
        let behavior = self.drag_start_behavior;
        let axis = self.drag_axis;
        let Some(track) = self.tracks.get_mut(&pointer) else {
            return;
        };
        let count = track.tap_count;
        track.drag = DragState::Dragging;
        if track.tap_down_sent && !track.tap_cancelled {
            track.tap_cancelled = true;
            self.events.push(TapDragEvent::TapCancel);
        }
        let origin = match behavior {
            DragStartBehavior::Down => track.down,
            DragStartBehavior::Start => track.last,
        };
        self.events.push(TapDragEvent::DragStart(TapDragStartDetails {
            timestamp: origin.timestamp,
            global_position: origin.position,
            local_position: origin.local_position,
            kind: origin.kind,
            consecutive_tap_count: count,
        }));
        let catch_up = axis.project(track.last.position - origin.position);
        if catch_up != Vec2::ZERO {
            self.events.push(TapDragEvent::DragUpdate(TapDragUpdateDetails {
                timestamp: track.last.timestamp,
                delta: catch_up,
                global_position: track.last.position,
                local_position: track.last.local_position,
                offset_from_origin: axis.project(track.last.position - track.down.position),
                consecutive_tap_count: count,
            }));
        }
        debug!(%pointer, count, "drag started");
    }

    fn end_drag(&mut self, pointer: PointerId) {
        let axis = self.drag_axis;
        let Some(track) = self.tracks.remove(&pointer) else {
            return;
        };
        let velocity = axis.project(track.velocity.velocity());
        let primary_velocity = match axis {
            DragAxis::Free => None,
            DragAxis::Horizontal => Some(velocity.x),
            DragAxis::Vertical => Some(velocity.y),
        };
        self.events.push(TapDragEvent::DragEnd(TapDragEndDetails {
            velocity,
            primary_velocity,
            consecutive_tap_count: track.tap_count,
        }));
        debug!(%pointer, ?velocity, "drag ended");
        self.release_primary(pointer);
    }

    /// Drop `pointer` after rejection or cancellation, cancelling whatever
    /// was already reported.
    fn abandon(&mut self, pointer: PointerId, reset_series_if_silent: bool) {
        let Some(track) = self.tracks.remove(&pointer) else {
            return;
        };
        if track.tap_down_sent && !track.tap_cancelled {
            self.events.push(TapDragEvent::TapCancel);
        }
        if track.drag == DragState::Dragging {
            self.events.push(TapDragEvent::DragCancel);
        }
        if reset_series_if_silent && !track.has_fired() {
            self.tracker.reset();
        }
        self.release_primary(pointer);
    }

    fn release_primary(&mut self, pointer: PointerId) {
        if self.primary == Some(pointer) {
            self.primary = None;
        }
    }

    fn pan_slop(&self, kind: PointerDeviceKind) -> f32 {
        if kind.is_precise() {
            PRECISE_POINTER_PAN_SLOP
        } else {
            self.config.pan_slop()
        }
    }

    fn hit_slop(&self, kind: PointerDeviceKind) -> f32 {
        if kind.is_precise() {
            PRECISE_POINTER_HIT_SLOP
        } else {
            self.config.touch_slop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::GestureArenaManager;

    const MEMBER: MemberId = MemberId(7);
    const RIVAL: MemberId = MemberId(8);

    fn at(x: f32, y: f32, ms: u64) -> PointerData {
        PointerData::new(PointerId(1), Pos2::new(x, y), Duration::from_millis(ms))
    }

    fn dispatch(recognizer: &mut TapAndDragGestureRecognizer, arena: &mut GestureArenaManager) {
        for verdict in arena.drain_verdicts() {
            recognizer.handle_verdict(&verdict);
        }
    }

    #[test]
    fn contested_tap_reports_down_and_up_once_swept() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.add(PointerId(1), RIVAL);
        arena.close(PointerId(1));
        dispatch(&mut recognizer, &mut arena);
        assert_eq!(recognizer.phase(), GesturePhase::Possible);

        recognizer.handle_event(&PointerEvent::Up(at(0.0, 0.0, 40)), &mut arena);
        assert!(recognizer.drain_events().is_empty());
        arena.sweep(PointerId(1));
        dispatch(&mut recognizer, &mut arena);
        let names: Vec<&str> = recognizer.drain_events().iter().map(TapDragEvent::name).collect();
        assert_eq!(names, vec!["tap_down", "tap_up"]);
        assert_eq!(recognizer.phase(), GesturePhase::Ready);
    }

    #[test]
    fn deadline_reports_a_provisional_tap_down() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.add(PointerId(1), RIVAL);
        arena.close(PointerId(1));
        assert_eq!(recognizer.next_deadline(), Some(Duration::from_millis(500)));

        recognizer.poll_timers(Duration::from_millis(499), &mut arena);
        assert!(recognizer.drain_events().is_empty());
        recognizer.poll_timers(Duration::from_millis(500), &mut arena);
        let names: Vec<&str> = recognizer.drain_events().iter().map(TapDragEvent::name).collect();
        assert_eq!(names, vec!["tap_down"]);
        assert_eq!(recognizer.next_deadline(), None);
    }

    #[test]
    fn losing_the_arena_cancels_only_what_was_reported() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.add(PointerId(1), RIVAL);
        arena.close(PointerId(1));
        arena.resolve(PointerId(1), RIVAL, GestureDisposition::Accepted);
        dispatch(&mut recognizer, &mut arena);
        assert!(recognizer.drain_events().is_empty());
        assert_eq!(recognizer.phase(), GesturePhase::Ready);
        // Lost before anything fired: the series starts over.
        assert_eq!(recognizer.consecutive_tap_count(), 0);
    }

    #[test]
    fn secondary_pointer_is_withdrawn() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        let second = PointerData::new(PointerId(2), Pos2::new(50.0, 50.0), Duration::from_millis(5));
        recognizer.handle_event(&PointerEvent::Down(second), &mut arena);
        let verdicts = arena.drain_verdicts();
        assert!(verdicts.iter().any(|verdict| verdict.pointer == PointerId(2)
            && verdict.disposition == GestureDisposition::Rejected));
        assert_eq!(recognizer.primary_position(), Some(Pos2::new(0.0, 0.0)));
    }

    #[test]
    fn axis_locked_drag_ignores_cross_axis_travel() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.drag_axis = DragAxis::Horizontal;
        recognizer.slop_tolerance = None;
        recognizer.post_accept_slop_tolerance = None;
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.close(PointerId(1));
        dispatch(&mut recognizer, &mut arena);
        recognizer.drain_events();

        recognizer.handle_event(&PointerEvent::Move(at(0.0, 80.0, 10)), &mut arena);
        assert!(recognizer.drain_events().is_empty());
        recognizer.handle_event(&PointerEvent::Move(at(40.0, 80.0, 20)), &mut arena);
        let events = recognizer.drain_events();
        let names: Vec<&str> = events.iter().map(TapDragEvent::name).collect();
        assert_eq!(names, vec!["tap_cancel", "drag_start", "drag_update"]);
        match events[2] {
            TapDragEvent::DragUpdate(details) => assert_eq!(details.delta, Vec2::new(40.0, 0.0)),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn cancelled_pointer_takes_its_tap_down_timer_along() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.add(PointerId(1), RIVAL);
        arena.close(PointerId(1));
        assert_eq!(recognizer.next_deadline(), Some(Duration::from_millis(500)));

        recognizer.handle_event(&PointerEvent::Cancel(at(0.0, 0.0, 100)), &mut arena);
        assert_eq!(recognizer.next_deadline(), None);
        recognizer.poll_timers(Duration::from_millis(600), &mut arena);
        assert!(recognizer.drain_events().is_empty());
    }

    #[test]
    fn tap_down_timer_belongs_to_the_primary_pointer() {
        let mut arena = GestureArenaManager::new();
        let mut recognizer = TapAndDragGestureRecognizer::new(MEMBER, GestureConfig::default());
        recognizer.handle_event(&PointerEvent::Down(at(0.0, 0.0, 0)), &mut arena);
        arena.add(PointerId(1), RIVAL);
        arena.close(PointerId(1));
        let second = PointerData::new(PointerId(2), Pos2::new(50.0, 50.0), Duration::from_millis(200));
        recognizer.handle_event(&PointerEvent::Down(second), &mut arena);
        assert_eq!(recognizer.next_deadline(), Some(Duration::from_millis(500)));

        // A drag claim disarms the timer before the arena has ruled.
        recognizer.handle_event(&PointerEvent::Move(at(40.0, 0.0, 250)), &mut arena);
        assert_eq!(recognizer.phase(), GesturePhase::Possible);
        assert_eq!(recognizer.next_deadline(), None);
    }
}
