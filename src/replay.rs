//! Scripted replay of pointer sequences and span edits.
//!
//! Scripts are JSON documents. Gesture scripts drive one
//! [`TapAndDragGestureRecognizer`] the way an event loop would: the arena is
//! closed after each down and swept after each up, timers are polled at every
//! step's timestamp, and verdicts are forwarded as soon as they appear.

use anyhow::{bail, Context, Result};
use egui::Pos2;
use inline_text_core::editing::{apply_command, EditCommand, EditContext, TextEditingValue};
use inline_text_core::{GestureConfig, Replacement, ReplacementManager, TextRange};
use inline_text_gestures::{
    DragAxis, GestureArenaManager, MemberId, PointerData, PointerDeviceKind, PointerEvent,
    PointerId, TapAndDragGestureRecognizer, TapDragEvent,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

const REPLAY_MEMBER: MemberId = MemberId(1);

/// Read and parse a JSON script.
///
/// # Arguments
/// - `path`: Script file on disk.
///
/// # Returns
/// The parsed script.
///
/// # Errors
/// Fails when the file cannot be read or is not a valid script; the error
/// names the path.
pub fn load_script<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse script {}", path.display()))
}

fn default_pointer() -> u64 {
    1
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptDeviceKind {
    Mouse,
    #[default]
    Touch,
    Stylus,
    Trackpad,
}

impl From<ScriptDeviceKind> for PointerDeviceKind {
    fn from(value: ScriptDeviceKind) -> Self {
        match value {
            ScriptDeviceKind::Mouse => Self::Mouse,
            ScriptDeviceKind::Touch => Self::Touch,
            ScriptDeviceKind::Stylus => Self::Stylus,
            ScriptDeviceKind::Trackpad => Self::Trackpad,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptDragAxis {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

impl From<ScriptDragAxis> for DragAxis {
    fn from(value: ScriptDragAxis) -> Self {
        match value {
            ScriptDragAxis::Free => Self::Free,
            ScriptDragAxis::Horizontal => Self::Horizontal,
            ScriptDragAxis::Vertical => Self::Vertical,
        }
    }
}

/// One step of a pointer script. Times are milliseconds on the event clock.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GestureStep {
    Down {
        #[serde(default = "default_pointer")]
        pointer: u64,
        x: f32,
        y: f32,
        t_ms: u64,
        #[serde(default)]
        kind: ScriptDeviceKind,
    },
    Move {
        #[serde(default = "default_pointer")]
        pointer: u64,
        x: f32,
        y: f32,
        t_ms: u64,
    },
    Up {
        #[serde(default = "default_pointer")]
        pointer: u64,
        x: f32,
        y: f32,
        t_ms: u64,
    },
    Cancel {
        #[serde(default = "default_pointer")]
        pointer: u64,
        t_ms: u64,
    },
    /// Let time pass without input so timers can fire.
    Advance { t_ms: u64 },
}

impl GestureStep {
    fn t_ms(&self) -> u64 {
        match self {
            Self::Down { t_ms, .. }
            | Self::Move { t_ms, .. }
            | Self::Up { t_ms, .. }
            | Self::Cancel { t_ms, .. }
            | Self::Advance { t_ms } => *t_ms,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GestureScript {
    #[serde(default)]
    pub drag_axis: ScriptDragAxis,
    /// Overrides the recognizer's pre-accept tolerance when present.
    #[serde(default)]
    pub pre_accept_slop_tolerance: Option<f32>,
    /// Overrides the recognizer's post-accept tolerance when present.
    #[serde(default)]
    pub post_accept_slop_tolerance: Option<f32>,
    pub steps: Vec<GestureStep>,
}

/// One emitted gesture intent, flattened for printing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GestureRecord {
    /// Time of the step that produced the event.
    pub t_ms: u64,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<[f32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<[f32; 2]>,
}

impl GestureRecord {
    fn from_event(t_ms: u64, event: &TapDragEvent) -> Self {
        let mut record = Self {
            t_ms,
            event: event.name(),
            count: event.consecutive_tap_count(),
            position: None,
            delta: None,
            velocity: None,
        };
        match event {
            TapDragEvent::TapDown(details) => record.position = Some(point(details.global_position)),
            TapDragEvent::TapUp(details) => record.position = Some(point(details.global_position)),
            TapDragEvent::DragStart(details) => {
                record.position = Some(point(details.global_position))
            }
            TapDragEvent::DragUpdate(details) => {
                record.position = Some(point(details.global_position));
                record.delta = Some([details.delta.x, details.delta.y]);
            }
            TapDragEvent::DragEnd(details) => {
                record.velocity = Some([details.velocity.x, details.velocity.y]);
            }
            TapDragEvent::TapCancel | TapDragEvent::DragCancel => {}
        }
        record
    }
}

fn point(position: Pos2) -> [f32; 2] {
    [position.x, position.y]
}

impl fmt::Display for GestureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}ms {}", self.t_ms, self.event)?;
        if let Some(count) = self.count {
            write!(f, " count={}", count)?;
        }
        if let Some([x, y]) = self.position {
            write!(f, " at=({:.1}, {:.1})", x, y)?;
        }
        if let Some([dx, dy]) = self.delta {
            write!(f, " delta=({:.1}, {:.1})", dx, dy)?;
        }
        if let Some([vx, vy]) = self.velocity {
            write!(f, " velocity=({:.1}, {:.1})", vx, vy)?;
        }
        Ok(())
    }
}

/// Drive a recognizer through `script` and collect what it emitted.
///
/// Timers are polled at each step's time before the step is applied.
///
/// # Returns
/// One record per emitted intent, stamped with the step that produced it.
pub fn run_gesture_script(script: &GestureScript, config: GestureConfig) -> Vec<GestureRecord> {
    let mut arena = GestureArenaManager::new();
    let mut recognizer = TapAndDragGestureRecognizer::new(REPLAY_MEMBER, config);
    recognizer.drag_axis = script.drag_axis.into();
    if let Some(tolerance) = script.pre_accept_slop_tolerance {
        recognizer.pre_accept_slop_tolerance = Some(tolerance);
    }
    if let Some(tolerance) = script.post_accept_slop_tolerance {
        recognizer.post_accept_slop_tolerance = Some(tolerance);
    }

    let mut kinds: HashMap<u64, PointerDeviceKind> = HashMap::new();
    let mut records = Vec::new();

    for step in &script.steps {
        let t_ms = step.t_ms();
        let now = Duration::from_millis(t_ms);
        recognizer.poll_timers(now, &mut arena);
        dispatch(&mut recognizer, &mut arena);

        let at = |pointer: u64, x: f32, y: f32, kind: PointerDeviceKind| {
            PointerData::new(PointerId(pointer), Pos2::new(x, y), now).with_kind(kind)
        };
        let event = match *step {
            GestureStep::Down {
                pointer,
                x,
                y,
                kind,
                ..
            } => {
                let kind = PointerDeviceKind::from(kind);
                kinds.insert(pointer, kind);
                Some(PointerEvent::Down(at(pointer, x, y, kind)))
            }
            GestureStep::Move { pointer, x, y, .. } => {
                let kind = kinds.get(&pointer).copied().unwrap_or_default();
                Some(PointerEvent::Move(at(pointer, x, y, kind)))
            }
            GestureStep::Up { pointer, x, y, .. } => {
                let kind = kinds.remove(&pointer).unwrap_or_default();
                Some(PointerEvent::Up(at(pointer, x, y, kind)))
            }
            GestureStep::Cancel { pointer, .. } => {
                let kind = kinds.remove(&pointer).unwrap_or_default();
                Some(PointerEvent::Cancel(at(pointer, 0.0, 0.0, kind)))
            }
            GestureStep::Advance { .. } => None,
        };

        if let Some(event) = event {
            recognizer.handle_event(&event, &mut arena);
            match event {
                PointerEvent::Down(data) => arena.close(data.pointer),
                PointerEvent::Up(data) => arena.sweep(data.pointer),
                PointerEvent::Move(_) | PointerEvent::Cancel(_) => {}
            }
            dispatch(&mut recognizer, &mut arena);
        }

        records.extend(
            recognizer
                .drain_events()
                .iter()
                .map(|event| GestureRecord::from_event(t_ms, event)),
        );
    }

    debug!(steps = script.steps.len(), events = records.len(), "gesture replay finished");
    records
}

fn dispatch(recognizer: &mut TapAndDragGestureRecognizer, arena: &mut GestureArenaManager) {
    for verdict in arena.drain_verdicts() {
        recognizer.handle_verdict(&verdict);
    }
}

/// One step of a span script. Spans are addressed by a script-local label,
/// which is also stored as the span's payload.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SpanStep {
    /// Add a span, or move it when the label is already tracked.
    Set {
        label: String,
        start: usize,
        end: usize,
    },
    Remove { label: String },
    /// Text of `len` bytes inserted at `at`.
    Insert { at: usize, len: usize },
    /// Text in `[start, end)` deleted.
    Delete { start: usize, end: usize },
    /// Editing command applied to the script's text; spans follow the edit.
    Edit { command: EditCommand },
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct SpanScript {
    /// Text that `edit` steps operate on. The caret starts at its end.
    #[serde(default)]
    pub text: String,
    pub steps: Vec<SpanStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpanRecord {
    pub label: String,
    pub start: usize,
    pub end: usize,
}

impl fmt::Display for SpanRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.label, self.start, self.end)
    }
}

/// Final state of a span replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SpanReport {
    pub text: String,
    /// Live spans in start order.
    pub spans: Vec<SpanRecord>,
}

/// Apply every step of `script` to a fresh manager.
///
/// # Errors
/// Fails on an inverted range, an unknown label, or a manager whose
/// invariants no longer hold after a step.
pub fn run_span_script(script: &SpanScript) -> Result<SpanReport> {
    let mut manager: ReplacementManager<String> = ReplacementManager::new();
    let mut handles: HashMap<String, Replacement<String>> = HashMap::new();
    let mut value = TextEditingValue::with_caret_at_end(script.text.clone());
    let context = EditContext::default();

    for (index, step) in script.steps.iter().enumerate() {
        apply_span_step(&mut manager, &mut handles, &mut value, &context, step)
            .with_context(|| format!("span step {} failed", index + 1))?;
        manager
            .check_invariants()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("span invariants broken after step {}", index + 1))?;
    }

    let spans: Vec<SpanRecord> = manager
        .iter()
        .map(|span| SpanRecord {
            label: span.payload.clone(),
            start: span.range.start,
            end: span.range.end,
        })
        .collect();
    info!(spans = spans.len(), "span replay finished");
    Ok(SpanReport {
        text: value.text,
        spans,
    })
}

fn apply_span_step(
    manager: &mut ReplacementManager<String>,
    handles: &mut HashMap<String, Replacement<String>>,
    value: &mut TextEditingValue,
    context: &EditContext<'_>,
    step: &SpanStep,
) -> Result<()> {
    match step {
        SpanStep::Set { label, start, end } => {
            let range = TextRange::new(*start, *end)?;
            let replacement = match handles.get(label) {
                Some(existing) => existing.clone().with_range(range),
                None => Replacement::new(range, label.clone()),
            };
            manager.set_span(replacement.clone())?;
            handles.insert(label.clone(), replacement);
        }
        SpanStep::Remove { label } => {
            let Some(handle) = handles.remove(label) else {
                bail!("no span labelled {:?}", label);
            };
            manager.remove_span(handle.id())?;
        }
        SpanStep::Insert { at, len } => manager.insert_text(*at, *len),
        SpanStep::Delete { start, end } => manager.delete_text(TextRange::new(*start, *end)?),
        SpanStep::Edit { command } => {
            let outcome = apply_command(value, command, context);
            if let Some(edit) = outcome.edit {
                manager.apply_edit(&edit);
            }
            *value = outcome.value;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gesture_steps_parse_with_defaults() {
        let script: GestureScript = serde_json::from_str(
            r#"{"steps": [
                {"op": "down", "x": 1, "y": 2, "t_ms": 0, "kind": "mouse"},
                {"op": "move", "pointer": 3, "x": 4, "y": 5, "t_ms": 10},
                {"op": "advance", "t_ms": 900}
            ]}"#,
        )
        .expect("script");
        assert_eq!(script.drag_axis, ScriptDragAxis::Free);
        assert_eq!(
            script.steps[0],
            GestureStep::Down {
                pointer: 1,
                x: 1.0,
                y: 2.0,
                t_ms: 0,
                kind: ScriptDeviceKind::Mouse,
            }
        );
        assert_eq!(script.steps[2].t_ms(), 900);
    }

    #[test]
    fn records_render_one_line_per_event() {
        let script: GestureScript = serde_json::from_str(
            r#"{"steps": [
                {"op": "down", "x": 10, "y": 20, "t_ms": 0},
                {"op": "up", "x": 10, "y": 20, "t_ms": 40}
            ]}"#,
        )
        .expect("script");
        let lines: Vec<String> = run_gesture_script(&script, GestureConfig::default())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            lines,
            vec![
                "     0ms tap_down count=1 at=(10.0, 20.0)",
                "    40ms tap_up count=1 at=(10.0, 20.0)",
            ]
        );
    }

    #[test]
    fn unset_tolerances_keep_the_recognizer_defaults() {
        let script: GestureScript = serde_json::from_str(
            r#"{"steps": [
                {"op": "down", "x": 0, "y": 0, "t_ms": 0},
                {"op": "move", "x": 25, "y": 0, "t_ms": 10},
                {"op": "up", "x": 25, "y": 0, "t_ms": 20}
            ]}"#,
        )
        .expect("script");
        let events: Vec<(u64, &str)> = run_gesture_script(&script, GestureConfig::default())
            .iter()
            .map(|record| (record.t_ms, record.event))
            .collect();
        // Past the tap slop after winning: withdrawn on the move itself.
        assert_eq!(events, vec![(0, "tap_down"), (10, "tap_cancel")]);

        let relaxed = GestureScript {
            post_accept_slop_tolerance: Some(30.0),
            ..script
        };
        let events: Vec<(u64, &str)> = run_gesture_script(&relaxed, GestureConfig::default())
            .iter()
            .map(|record| (record.t_ms, record.event))
            .collect();
        // Still tracked, but the release is too far away for a tap-up.
        assert_eq!(events, vec![(0, "tap_down"), (20, "tap_cancel")]);
    }

    #[test]
    fn deadline_fires_during_advance() {
        let script = GestureScript {
            steps: vec![
                GestureStep::Down {
                    pointer: 1,
                    x: 0.0,
                    y: 0.0,
                    t_ms: 0,
                    kind: ScriptDeviceKind::Touch,
                },
                GestureStep::Up {
                    pointer: 1,
                    x: 0.0,
                    y: 0.0,
                    t_ms: 20,
                },
                GestureStep::Advance { t_ms: 400 },
                GestureStep::Down {
                    pointer: 1,
                    x: 0.0,
                    y: 0.0,
                    t_ms: 500,
                    kind: ScriptDeviceKind::Touch,
                },
            ],
            ..GestureScript::default()
        };
        let counts: Vec<(u64, Option<u32>)> = run_gesture_script(&script, GestureConfig::default())
            .into_iter()
            .filter(|record| record.event == "tap_down")
            .map(|record| (record.t_ms, record.count))
            .collect();
        // The series timer ran out during the advance.
        assert_eq!(counts, vec![(0, Some(1)), (500, Some(1))]);
    }

    #[test]
    fn span_script_tracks_labels_through_edits() {
        let script: SpanScript = serde_json::from_str(
            r#"{"text": "hello world", "steps": [
                {"op": "set", "label": "greeting", "start": 0, "end": 5},
                {"op": "set", "label": "target", "start": 6, "end": 11},
                {"op": "insert", "at": 0, "len": 2},
                {"op": "set", "label": "greeting", "start": 0, "end": 7},
                {"op": "delete", "start": 7, "end": 8},
                {"op": "remove", "label": "greeting"}
            ]}"#,
        )
        .expect("script");
        let report = run_span_script(&script).expect("replay");
        assert_eq!(
            report.spans,
            vec![SpanRecord {
                label: "target".to_string(),
                start: 7,
                end: 12,
            }]
        );
    }

    #[test]
    fn edit_steps_move_spans_with_the_text() {
        let script: SpanScript = serde_json::from_str(
            r#"{"text": "ab", "steps": [
                {"op": "set", "label": "b", "start": 1, "end": 2},
                {"op": "edit", "command": {"command": "move_caret", "direction": "backward", "granularity": "document"}},
                {"op": "edit", "command": {"command": "insert_text", "text": "xyz"}}
            ]}"#,
        )
        .expect("script");
        let report = run_span_script(&script).expect("replay");
        assert_eq!(report.text, "xyzab");
        assert_eq!(report.spans[0].to_string(), "b [4, 5)");
    }

    #[test]
    fn span_script_errors_name_the_step() {
        let script = SpanScript {
            steps: vec![SpanStep::Remove {
                label: "ghost".to_string(),
            }],
            ..SpanScript::default()
        };
        let err = run_span_script(&script).expect_err("unknown label");
        assert_eq!(err.to_string(), "span step 1 failed");
        assert!(format!("{:#}", err).contains("ghost"));
    }
}
