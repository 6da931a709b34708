use egui::{Pos2, Vec2};
use inline_text_core::GestureConfig;
use inline_text_gestures::{
    ArenaVerdict, GestureArena, GestureArenaManager, GestureDisposition, GesturePhase, MemberId,
    PointerData, PointerDeviceKind, PointerEvent, PointerId, TapAndDragGestureRecognizer,
    TapDragEvent,
};
use std::time::Duration;

const POINTER: PointerId = PointerId(1);

/// Drives one recognizer the way an event loop would: close the arena after
/// each down, sweep after each up, and forward verdicts straight away.
struct Harness {
    arena: GestureArenaManager,
    recognizer: TapAndDragGestureRecognizer,
    kind: PointerDeviceKind,
}

impl Harness {
    fn new(config: GestureConfig) -> Self {
        Self {
            arena: GestureArenaManager::new(),
            recognizer: TapAndDragGestureRecognizer::new(MemberId(1), config),
            kind: PointerDeviceKind::Touch,
        }
    }

    fn data(&self, x: f32, y: f32, ms: u64) -> PointerData {
        PointerData::new(POINTER, Pos2::new(x, y), Duration::from_millis(ms)).with_kind(self.kind)
    }

    fn dispatch(&mut self) {
        for verdict in self.arena.drain_verdicts() {
            self.recognizer.handle_verdict(&verdict);
        }
    }

    fn send(&mut self, event: PointerEvent) {
        self.recognizer.poll_timers(event.timestamp(), &mut self.arena);
        self.dispatch();
        self.recognizer.handle_event(&event, &mut self.arena);
        match event {
            PointerEvent::Down(_) => self.arena.close(POINTER),
            PointerEvent::Up(_) => self.arena.sweep(POINTER),
            _ => {}
        }
        self.dispatch();
    }

    fn down(&mut self, x: f32, y: f32, ms: u64) {
        let data = self.data(x, y, ms);
        self.send(PointerEvent::Down(data));
    }

    fn move_to(&mut self, x: f32, y: f32, ms: u64) {
        let data = self.data(x, y, ms);
        self.send(PointerEvent::Move(data));
    }

    fn up(&mut self, x: f32, y: f32, ms: u64) {
        let data = self.data(x, y, ms);
        self.send(PointerEvent::Up(data));
    }

    fn cancel(&mut self, ms: u64) {
        let data = self.data(0.0, 0.0, ms);
        self.send(PointerEvent::Cancel(data));
    }

    fn tap(&mut self, x: f32, y: f32, ms: u64) {
        self.down(x, y, ms);
        self.up(x, y, ms + 30);
    }

    fn advance(&mut self, ms: u64) {
        self.recognizer
            .poll_timers(Duration::from_millis(ms), &mut self.arena);
        self.dispatch();
    }

    fn names(&mut self) -> Vec<&'static str> {
        self.recognizer
            .drain_events()
            .iter()
            .map(TapDragEvent::name)
            .collect()
    }

    fn tap_down_counts(&mut self) -> Vec<u32> {
        self.recognizer
            .drain_events()
            .into_iter()
            .filter_map(|event| match event {
                TapDragEvent::TapDown(details) => Some(details.consecutive_tap_count),
                _ => None,
            })
            .collect()
    }
}

#[test]
fn single_tap_reports_down_then_up() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(10.0, 10.0, 0);
    assert_eq!(harness.names(), vec!["tap_down", "tap_up"]);
    assert_eq!(harness.recognizer.consecutive_tap_count(), 1);
}

#[test]
fn taps_within_the_timeout_count_up_and_reset_after_it() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(10.0, 10.0, 0);
    harness.tap(12.0, 11.0, 150);
    assert_eq!(harness.tap_down_counts(), vec![1, 2]);

    harness.tap(12.0, 11.0, 180 + 301);
    assert_eq!(harness.tap_down_counts(), vec![1]);
}

#[test]
fn series_timer_expires_without_another_tap() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    assert_eq!(
        harness.recognizer.next_deadline(),
        Some(Duration::from_millis(330))
    );
    harness.advance(331);
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
    assert_eq!(harness.recognizer.next_deadline(), None);
}

#[test]
fn distant_second_tap_starts_a_new_series() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.tap(200.0, 0.0, 100);
    assert_eq!(harness.tap_down_counts(), vec![1, 1]);
}

#[test]
fn drag_cancels_the_tap_and_never_reports_tap_up() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.down(0.0, 0.0, 0);
    harness.move_to(10.0, 0.0, 10);
    harness.move_to(50.0, 0.0, 20);
    harness.move_to(60.0, 0.0, 30);
    harness.up(60.0, 0.0, 40);

    let events = harness.recognizer.drain_events();
    let names: Vec<&str> = events.iter().map(TapDragEvent::name).collect();
    assert_eq!(
        names,
        vec![
            "tap_down",
            "tap_cancel",
            "drag_start",
            "drag_update",
            "drag_update",
            "drag_end"
        ]
    );
    match events[2] {
        TapDragEvent::DragStart(details) => {
            assert_eq!(details.global_position, Pos2::new(0.0, 0.0));
            assert_eq!(details.consecutive_tap_count, 1);
        }
        other => panic!("expected drag start, got {:?}", other),
    }
    match events[3] {
        TapDragEvent::DragUpdate(details) => assert_eq!(details.delta, Vec2::new(50.0, 0.0)),
        other => panic!("expected drag update, got {:?}", other),
    }
    match events[5] {
        TapDragEvent::DragEnd(details) => assert!(details.velocity.x > 0.0),
        other => panic!("expected drag end, got {:?}", other),
    }
}

#[test]
fn drag_carries_the_count_frozen_at_its_start() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.down(0.0, 0.0, 100);
    harness.move_to(80.0, 0.0, 120);
    harness.up(80.0, 0.0, 140);
    let counts: Vec<Option<u32>> = harness
        .recognizer
        .drain_events()
        .iter()
        .filter(|event| matches!(event, TapDragEvent::DragStart(_) | TapDragEvent::DragEnd(_)))
        .map(TapDragEvent::consecutive_tap_count)
        .collect();
    assert_eq!(counts, vec![Some(2), Some(2)]);
}

#[test]
fn finished_drag_leaves_no_series_behind() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.down(0.0, 0.0, 100);
    harness.move_to(80.0, 0.0, 120);
    harness.up(80.0, 0.0, 140);
    harness.names();
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
    assert_eq!(harness.recognizer.next_deadline(), None);

    harness.advance(3_600_000);
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
    harness.tap(0.0, 0.0, 3_600_100);
    assert_eq!(harness.tap_down_counts(), vec![1]);
}

#[test]
fn mouse_drags_start_after_a_couple_of_pixels() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.kind = PointerDeviceKind::Mouse;
    harness.down(0.0, 0.0, 0);
    harness.move_to(2.0, 0.0, 10);
    assert_eq!(harness.names(), vec!["tap_down"]);
    harness.move_to(3.0, 0.0, 20);
    assert_eq!(harness.names(), vec!["tap_cancel", "drag_start", "drag_update"]);
}

#[test]
fn touch_between_tap_and_drag_slop_withdraws_silently() {
    let mut harness = Harness::new(GestureConfig::default());
    let down = harness.data(0.0, 0.0, 0);
    harness
        .recognizer
        .handle_event(&PointerEvent::Down(down), &mut harness.arena);
    harness.arena.add(POINTER, MemberId(2));
    harness.arena.close(POINTER);
    harness.dispatch();

    // Past the 18px tap slop, short of the 36px drag slop.
    let wander = harness.data(25.0, 0.0, 10);
    harness
        .recognizer
        .handle_event(&PointerEvent::Move(wander), &mut harness.arena);
    let verdicts = harness.arena.drain_verdicts();
    assert!(verdicts.contains(&ArenaVerdict {
        pointer: POINTER,
        member: MemberId(1),
        disposition: GestureDisposition::Rejected,
    }));
    for verdict in &verdicts {
        harness.recognizer.handle_verdict(verdict);
    }
    assert_eq!(harness.recognizer.phase(), GesturePhase::Ready);

    harness.up(25.0, 0.0, 20);
    assert!(harness.names().is_empty());
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
}

#[test]
fn pre_accept_tolerance_withdraws_the_recognizer() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.recognizer.pre_accept_slop_tolerance = Some(5.0);
    let down = harness.data(0.0, 0.0, 0);
    harness
        .recognizer
        .handle_event(&PointerEvent::Down(down), &mut harness.arena);
    harness.arena.add(POINTER, MemberId(2));
    harness.arena.close(POINTER);
    harness.dispatch();

    let wander = harness.data(8.0, 0.0, 10);
    harness
        .recognizer
        .handle_event(&PointerEvent::Move(wander), &mut harness.arena);
    harness.dispatch();
    assert!(harness.names().is_empty());
    assert_eq!(harness.recognizer.phase(), GesturePhase::Ready);
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
}

#[test]
fn cancel_in_place_keeps_the_series() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.names();
    harness.down(0.0, 0.0, 100);
    harness.cancel(120);
    assert_eq!(harness.names(), vec!["tap_down", "tap_cancel"]);
    assert_eq!(harness.recognizer.consecutive_tap_count(), 2);
    assert_eq!(harness.recognizer.next_deadline(), None);
}

#[test]
fn cancelled_drag_reports_cancels_and_ends_the_series() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.names();
    harness.down(0.0, 0.0, 100);
    harness.move_to(60.0, 0.0, 110);
    harness.cancel(120);
    assert_eq!(
        harness.names(),
        vec!["tap_down", "tap_cancel", "drag_start", "drag_update", "drag_cancel"]
    );
    assert_eq!(harness.recognizer.consecutive_tap_count(), 0);
}

#[test]
fn max_consecutive_tap_wraps_the_count() {
    let config = GestureConfig {
        max_consecutive_tap: Some(3),
        ..GestureConfig::default()
    };
    let mut harness = Harness::new(config);
    for i in 0..5 {
        harness.tap(0.0, 0.0, i * 100);
    }
    assert_eq!(harness.tap_down_counts(), vec![1, 2, 3, 1, 2]);
}

#[test]
fn dispose_is_idempotent_and_silences_timers() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.names();
    harness.recognizer.dispose();
    harness.recognizer.dispose();
    assert!(harness.recognizer.is_disposed());
    assert_eq!(harness.recognizer.next_deadline(), None);

    harness.advance(10_000);
    harness.down(0.0, 0.0, 10_100);
    harness.up(0.0, 0.0, 10_130);
    assert!(harness.names().is_empty());
}

#[test]
fn slow_second_tap_in_a_contested_arena_is_accepted_at_the_deadline() {
    let mut harness = Harness::new(GestureConfig::default());
    harness.tap(0.0, 0.0, 0);
    harness.names();

    let down = harness.data(0.0, 0.0, 100);
    harness
        .recognizer
        .handle_event(&PointerEvent::Down(down), &mut harness.arena);
    harness.arena.add(POINTER, MemberId(2));
    harness.arena.close(POINTER);
    harness.dispatch();
    assert!(harness.names().is_empty());

    harness.advance(600);
    let events = harness.recognizer.drain_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].consecutive_tap_count(), Some(2));
    assert_eq!(harness.recognizer.phase(), GesturePhase::Accepted);
}
