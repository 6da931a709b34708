//! Caret movement and deletion built on the boundary engine.
//!
//! Every command works on an immutable snapshot: boundaries are built fresh
//! from the current text and dropped once the command is applied.

use crate::boundary::{
    CharacterBoundary, CodeUnitBoundary, DocumentBoundary, HardLineLayout, LineBoundary,
    LineMetrics, MixedBoundary, ParagraphBoundary, PushBoundary, TextBoundary, WordBoundary,
};
use crate::text::{Direction, TextPosition, TextRange, TextSelection};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Text plus selection, the unit every edit command transforms.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEditingValue {
    pub text: String,
    #[serde(default)]
    pub selection: TextSelection,
}

impl TextEditingValue {
    /// # Arguments
    /// - `text`: Buffer contents.
    /// - `selection`: Selection over `text`; clamped when commands run.
    pub fn new(text: impl Into<String>, selection: TextSelection) -> Self {
        Self {
            text: text.into(),
            selection,
        }
    }

    /// Value with a collapsed caret after the last byte.
    pub fn with_caret_at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let selection = TextSelection::collapsed(text.len());
        Self { text, selection }
    }
}

/// Unit a caret move or deletion steps over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Character,
    Word,
    Line,
    Paragraph,
    Document,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditCommand {
    /// Replace the selection with text.
    InsertText { text: String },
    Delete {
        direction: Direction,
        granularity: Granularity,
    },
    MoveCaret {
        direction: Direction,
        granularity: Granularity,
        #[serde(default)]
        extend: bool,
    },
    SelectAll,
    CollapseSelection,
}

/// Buffer change: `range` (in the old text) was replaced by `inserted_len`
/// bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    pub range: TextRange,
    pub inserted_len: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditOutcome {
    pub value: TextEditingValue,
    /// `None` when the text did not change.
    pub edit: Option<TextEdit>,
}

/// Layout and obscuring state shared by a run of commands.
#[derive(Clone, Copy)]
pub struct EditContext<'a> {
    pub layout: &'a dyn LineMetrics,
    /// Hidden text never reveals clusters or word shapes.
    pub obscure_text: bool,
}

impl Default for EditContext<'static> {
    fn default() -> Self {
        Self {
            layout: &HardLineLayout,
            obscure_text: false,
        }
    }
}

impl<'a> EditContext<'a> {
    /// # Arguments
    /// - `layout`: Decides where visual lines break for line-granular commands.
    ///
    /// # Returns
    /// A context over plain, unobscured text.
    pub fn new(layout: &'a dyn LineMetrics) -> Self {
        Self {
            layout,
            obscure_text: false,
        }
    }

    /// # Arguments
    /// - `obscure_text`: Whether the text is hidden, as in a password field.
    pub fn obscured(mut self, obscure_text: bool) -> Self {
        self.obscure_text = obscure_text;
        self
    }
}

/// Boundary used for `granularity` over `text`.
///
/// Obscured text only exposes scalar values and the whole document.
///
/// # Arguments
/// - `text`: Snapshot the boundary borrows.
/// - `granularity`: Unit to step over.
/// - `context`: Supplies the line layout and the obscuring flag.
///
/// # Returns
/// A boxed boundary valid for as long as `text`.
pub fn boundary_for<'a>(
    text: &'a str,
    granularity: Granularity,
    context: &EditContext<'a>,
) -> Box<dyn TextBoundary + 'a> {
    if context.obscure_text {
        return match granularity {
            Granularity::Character => Box::new(CodeUnitBoundary::new(text)),
            _ => Box::new(DocumentBoundary::new(text)),
        };
    }
    match granularity {
        Granularity::Character => Box::new(CharacterBoundary::new(text)),
        Granularity::Word => Box::new(WordBoundary::new(text)),
        Granularity::Line => Box::new(LineBoundary::new(text, context.layout)),
        Granularity::Paragraph => Box::new(ParagraphBoundary::new(text)),
        Granularity::Document => Box::new(DocumentBoundary::new(text)),
    }
}

/// Apply one command to `value`.
///
/// # Arguments
/// - `value`: Text and selection before the command.
/// - `command`: Edit or caret movement to perform.
/// - `context`: Line layout and obscuring state.
///
/// # Returns
/// The new value and, when the text changed, the edit that produced it so
/// span trackers can follow along.
pub fn apply_command(
    value: &TextEditingValue,
    command: &EditCommand,
    context: &EditContext<'_>,
) -> EditOutcome {
    let text = value.text.as_str();
    let selection = value.selection.clamped(text);
    trace!(?command, ?selection, "apply edit command");
    match command {
        EditCommand::InsertText { text: inserted } => {
            replace_range(text, selection.range(), inserted)
        }
        EditCommand::Delete {
            direction,
            granularity,
        } => {
            let range = if selection.is_collapsed() {
                deletion_range(text, selection.extent, *direction, *granularity, context)
            } else {
                selection.range()
            };
            if range.is_empty() {
                unchanged(text, selection)
            } else {
                replace_range(text, range, "")
            }
        }
        EditCommand::MoveCaret {
            direction,
            granularity,
            extend,
        } => {
            let moved = move_selection(text, selection, *direction, *granularity, *extend, context);
            unchanged(text, moved)
        }
        EditCommand::SelectAll => unchanged(text, TextSelection::new(0, text.len())),
        EditCommand::CollapseSelection => unchanged(
            text,
            TextSelection {
                base: selection.extent,
                ..selection
            },
        ),
    }
}

fn unchanged(text: &str, selection: TextSelection) -> EditOutcome {
    EditOutcome {
        value: TextEditingValue::new(text, selection),
        edit: None,
    }
}

fn replace_range(text: &str, range: TextRange, inserted: &str) -> EditOutcome {
    let mut next = String::with_capacity(text.len() - range.len() + inserted.len());
    next.push_str(&text[..range.start]);
    next.push_str(inserted);
    next.push_str(&text[range.end..]);
    let edit = (!range.is_empty() || !inserted.is_empty()).then_some(TextEdit {
        range,
        inserted_len: inserted.len(),
    });
    EditOutcome {
        value: TextEditingValue::new(next, TextSelection::collapsed(range.start + inserted.len())),
        edit,
    }
}

/// Range removed by a delete from a collapsed caret.
///
/// The near edge stays on a character boundary; the far edge is pushed
/// strictly past the caret by the requested granularity.
fn deletion_range(
    text: &str,
    caret: usize,
    direction: Direction,
    granularity: Granularity,
    context: &EditContext<'_>,
) -> TextRange {
    let near = boundary_for(text, Granularity::Character, context);
    let far = boundary_for(text, granularity, context);
    match direction {
        Direction::Forward => MixedBoundary::new(near, PushBoundary::forward(far))
            .text_boundary_at(caret)
            .as_range()
            .unwrap_or(TextRange::collapsed(caret)),
        Direction::Backward => {
            let end = near.leading_boundary_at(caret).unwrap_or(caret);
            let start = PushBoundary::backward(far)
                .leading_boundary_at(end)
                .unwrap_or(end);
            TextRange::spanning(start, end)
        }
    }
}

fn move_selection(
    text: &str,
    selection: TextSelection,
    direction: Direction,
    granularity: Granularity,
    extend: bool,
    context: &EditContext<'_>,
) -> TextSelection {
    if !extend && !selection.is_collapsed() && granularity == Granularity::Character {
        let range = selection.range();
        return TextSelection::collapsed(match direction {
            Direction::Backward => range.start,
            Direction::Forward => range.end,
        });
    }
    let target = caret_target(text, selection.extent_position(), direction, granularity, context);
    TextSelection {
        base: if extend { selection.base } else { target.offset },
        extent: target.offset,
        affinity: target.affinity,
    }
}

/// Where a caret at `from` lands after one step.
///
/// Line and document steps go to the edge of the enclosing unit, so repeating
/// them is a no-op. Other granularities always make progress.
fn caret_target(
    text: &str,
    from: TextPosition,
    direction: Direction,
    granularity: Granularity,
    context: &EditContext<'_>,
) -> TextPosition {
    let len = text.len();
    let boundary = boundary_for(text, granularity, context);
    match (granularity, direction) {
        (Granularity::Line | Granularity::Document, Direction::Forward) => {
            let end = boundary.text_boundary_at_position(from).end.unwrap_or(len);
            TextPosition::upstream(end)
        }
        (Granularity::Line | Granularity::Document, Direction::Backward) => {
            let start = boundary.text_boundary_at_position(from).start.unwrap_or(0);
            TextPosition::downstream(start)
        }
        (_, Direction::Forward) => TextPosition::downstream(
            PushBoundary::forward(boundary)
                .trailing_boundary_at(from.offset)
                .unwrap_or(len),
        ),
        (_, Direction::Backward) => TextPosition::downstream(
            PushBoundary::backward(boundary)
                .leading_boundary_at(from.offset)
                .unwrap_or(0),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::MonospaceWrapLayout;
    use crate::text::TextAffinity;

    fn run(value: &TextEditingValue, command: EditCommand) -> EditOutcome {
        apply_command(value, &command, &EditContext::default())
    }

    fn delete(direction: Direction, granularity: Granularity) -> EditCommand {
        EditCommand::Delete {
            direction,
            granularity,
        }
    }

    fn move_caret(direction: Direction, granularity: Granularity, extend: bool) -> EditCommand {
        EditCommand::MoveCaret {
            direction,
            granularity,
            extend,
        }
    }

    #[test]
    fn insert_replaces_selection_and_reports_edit() {
        let value = TextEditingValue::new("hello world", TextSelection::new(0, 5));
        let outcome = run(
            &value,
            EditCommand::InsertText {
                text: "bye".to_string(),
            },
        );
        assert_eq!(outcome.value.text, "bye world");
        assert_eq!(outcome.value.selection, TextSelection::collapsed(3));
        assert_eq!(
            outcome.edit,
            Some(TextEdit {
                range: TextRange { start: 0, end: 5 },
                inserted_len: 3,
            })
        );
    }

    #[test]
    fn backspace_removes_a_whole_cluster_unless_obscured() {
        let value = TextEditingValue::with_caret_at_end("ae\u{301}");
        let outcome = run(&value, delete(Direction::Backward, Granularity::Character));
        assert_eq!(outcome.value.text, "a");
        assert_eq!(outcome.value.selection, TextSelection::collapsed(1));

        let hidden = EditContext::default().obscured(true);
        let outcome = apply_command(
            &value,
            &delete(Direction::Backward, Granularity::Character),
            &hidden,
        );
        assert_eq!(outcome.value.text, "ae");
    }

    #[test]
    fn delete_at_document_edges_is_a_no_op() {
        let value = TextEditingValue::new("abc", TextSelection::collapsed(0));
        let outcome = run(&value, delete(Direction::Backward, Granularity::Word));
        assert_eq!(outcome.edit, None);
        assert_eq!(outcome.value, value);

        let value = TextEditingValue::with_caret_at_end("abc");
        let outcome = run(&value, delete(Direction::Forward, Granularity::Character));
        assert_eq!(outcome.edit, None);
    }

    #[test]
    fn word_deletion_pushes_past_the_caret() {
        let value = TextEditingValue::with_caret_at_end("hello world");
        let outcome = run(&value, delete(Direction::Backward, Granularity::Word));
        assert_eq!(outcome.value.text, "hello ");

        let value = TextEditingValue::new("hello world", TextSelection::collapsed(0));
        let outcome = run(&value, delete(Direction::Forward, Granularity::Word));
        assert_eq!(outcome.value.text, " world");
        assert_eq!(
            outcome.edit.map(|edit| edit.range),
            Some(TextRange { start: 0, end: 5 })
        );
    }

    #[test]
    fn obscured_word_deletion_clears_to_the_document_edge() {
        let value = TextEditingValue::new("secret pw", TextSelection::collapsed(0));
        let hidden = EditContext::default().obscured(true);
        let outcome = apply_command(
            &value,
            &delete(Direction::Forward, Granularity::Word),
            &hidden,
        );
        assert_eq!(outcome.value.text, "");
    }

    #[test]
    fn word_moves_step_through_segments() {
        let mut value = TextEditingValue::new("hello world", TextSelection::collapsed(0));
        let mut seen = Vec::new();
        for _ in 0..4 {
            value = run(&value, move_caret(Direction::Forward, Granularity::Word, false)).value;
            seen.push(value.selection.extent);
        }
        assert_eq!(seen, vec![5, 6, 11, 11]);
    }

    #[test]
    fn extending_keeps_the_base() {
        let value = TextEditingValue::new("hello world", TextSelection::collapsed(0));
        let outcome = run(&value, move_caret(Direction::Forward, Granularity::Word, true));
        assert_eq!(outcome.value.selection, TextSelection::new(0, 5));
    }

    #[test]
    fn character_move_collapses_a_selection_to_its_edge() {
        let value = TextEditingValue::new("abcdef", TextSelection::new(5, 2));
        let forward = run(&value, move_caret(Direction::Forward, Granularity::Character, false));
        assert_eq!(forward.value.selection, TextSelection::collapsed(5));
        let backward = run(&value, move_caret(Direction::Backward, Granularity::Character, false));
        assert_eq!(backward.value.selection, TextSelection::collapsed(2));
    }

    #[test]
    fn line_moves_respect_soft_wrap_affinity() {
        let layout = MonospaceWrapLayout::new(3);
        let context = EditContext::new(&layout);
        let value = TextEditingValue::new("abcdef", TextSelection::collapsed(1));

        let end = apply_command(
            &value,
            &move_caret(Direction::Forward, Granularity::Line, false),
            &context,
        )
        .value;
        assert_eq!(end.selection.extent, 3);
        assert_eq!(end.selection.affinity, TextAffinity::Upstream);

        let again = apply_command(
            &end,
            &move_caret(Direction::Forward, Granularity::Line, false),
            &context,
        )
        .value;
        assert_eq!(again.selection.extent, 3);

        let home = apply_command(
            &end,
            &move_caret(Direction::Backward, Granularity::Line, false),
            &context,
        )
        .value;
        assert_eq!(home.selection, TextSelection::collapsed(0));

        let second_row = TextEditingValue::new("abcdef", TextSelection::collapsed(4));
        let home = apply_command(
            &second_row,
            &move_caret(Direction::Backward, Granularity::Line, false),
            &context,
        )
        .value;
        assert_eq!(home.selection, TextSelection::collapsed(3));
    }

    #[test]
    fn paragraph_moves_skip_terminators() {
        let value = TextEditingValue::new("ab\ncd", TextSelection::collapsed(2));
        let forward = run(&value, move_caret(Direction::Forward, Granularity::Paragraph, false));
        assert_eq!(forward.value.selection.extent, 5);
        let backward = run(
            &forward.value,
            move_caret(Direction::Backward, Granularity::Paragraph, false),
        );
        assert_eq!(backward.value.selection.extent, 3);
    }

    #[test]
    fn select_all_and_collapse() {
        let value = TextEditingValue::new("abc", TextSelection::collapsed(1));
        let all = run(&value, EditCommand::SelectAll).value;
        assert_eq!(all.selection, TextSelection::new(0, 3));
        let collapsed = run(&all, EditCommand::CollapseSelection).value;
        assert_eq!(collapsed.selection, TextSelection::collapsed(3));
    }
}
