//! Keyboard reducer: egui input events to editing commands.

use inline_text_core::editing::{EditCommand, Granularity};
use inline_text_core::text::Direction;

fn word_modifier(modifiers: egui::Modifiers) -> bool {
    modifiers.ctrl || modifiers.alt
}

fn caret(direction: Direction, granularity: Granularity, extend: bool) -> EditCommand {
    EditCommand::MoveCaret {
        direction,
        granularity,
        extend,
    }
}

fn stepped(modifiers: egui::Modifiers) -> Granularity {
    if word_modifier(modifiers) {
        Granularity::Word
    } else {
        Granularity::Character
    }
}

/// Convert egui input events into editing commands.
///
/// Vertical arrows without a word modifier need rendered geometry and are
/// left to the layout owner.
///
/// # Arguments
/// - `events`: One frame of egui input.
/// - `focused`: Whether the text field has keyboard focus.
///
/// # Returns
/// Commands in input order; empty when unfocused.
pub fn commands_from_events(events: &[egui::Event], focused: bool) -> Vec<EditCommand> {
    if !focused {
        return Vec::new();
    }
    let mut out = Vec::new();
    for event in events {
        match event {
            egui::Event::Text(text) | egui::Event::Paste(text) => {
                if !text.is_empty() {
                    out.push(EditCommand::InsertText { text: text.clone() });
                }
            }
            egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => {
                let modifiers = *modifiers;
                let extend = modifiers.shift;
                if modifiers.command {
                    match key {
                        egui::Key::A => out.push(EditCommand::SelectAll),
                        egui::Key::ArrowUp | egui::Key::Home => {
                            out.push(caret(Direction::Backward, Granularity::Document, extend))
                        }
                        egui::Key::ArrowDown | egui::Key::End => {
                            out.push(caret(Direction::Forward, Granularity::Document, extend))
                        }
                        _ => {}
                    }
                    continue;
                }
                match key {
                    egui::Key::ArrowLeft => {
                        out.push(caret(Direction::Backward, stepped(modifiers), extend))
                    }
                    egui::Key::ArrowRight => {
                        out.push(caret(Direction::Forward, stepped(modifiers), extend))
                    }
                    egui::Key::ArrowUp if word_modifier(modifiers) => {
                        out.push(caret(Direction::Backward, Granularity::Paragraph, extend))
                    }
                    egui::Key::ArrowDown if word_modifier(modifiers) => {
                        out.push(caret(Direction::Forward, Granularity::Paragraph, extend))
                    }
                    egui::Key::Home => out.push(caret(Direction::Backward, Granularity::Line, extend)),
                    egui::Key::End => out.push(caret(Direction::Forward, Granularity::Line, extend)),
                    egui::Key::Backspace => out.push(EditCommand::Delete {
                        direction: Direction::Backward,
                        granularity: stepped(modifiers),
                    }),
                    egui::Key::Delete => out.push(EditCommand::Delete {
                        direction: Direction::Forward,
                        granularity: stepped(modifiers),
                    }),
                    egui::Key::Enter => out.push(EditCommand::InsertText {
                        text: "\n".to_string(),
                    }),
                    egui::Key::Tab => out.push(EditCommand::InsertText {
                        text: "\t".to_string(),
                    }),
                    egui::Key::Escape => out.push(EditCommand::CollapseSelection),
                    _ => {}
                }
            }
            _ => {}
        }
    }
    out
}
