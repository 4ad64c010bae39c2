//! Command execution (:q, :w, :e, editing, view and feature toggles).

use super::DispatchResult;
use super::command_parser::ParsedCommand;
use core_events::DocumentId;
use core_model::EditorModel;
use core_trailing::ToggleArg;

pub(super) fn execute(cmd: ParsedCommand, model: &mut EditorModel) -> DispatchResult {
    // Commands that don't need an active document.
    match &cmd {
        ParsedCommand::Edit(path) => {
            return match model.open_file(path) {
                Ok(doc) => DispatchResult::dirty().with_message(format!("Opened {doc}")),
                Err(e) => {
                    tracing::error!(target: "io", path = %path.display(), error = %e, "file_open_error");
                    DispatchResult::dirty().with_message("Open failed")
                }
            };
        }
        ParsedCommand::Buffer(raw) => {
            let doc = DocumentId(*raw);
            return if model.set_active(doc) {
                DispatchResult::dirty()
            } else {
                DispatchResult::clean().with_message(format!("No document {doc}"))
            };
        }
        ParsedCommand::GlobalTrailingNewline(arg) => {
            let on = model.toggle_global(*arg);
            return DispatchResult::dirty().with_message(format!(
                "Global trailing newline mode {}",
                on_off(on)
            ));
        }
        _ => {}
    }

    let Some(doc) = model.active() else {
        return DispatchResult::clean().with_message("No document");
    };

    match cmd {
        ParsedCommand::Quit => {
            model.close(doc);
            if model.active().is_none() {
                DispatchResult::quit()
            } else {
                DispatchResult::dirty()
            }
        }
        ParsedCommand::Write => {
            model.save(doc);
            DispatchResult::dirty().with_message("Wrote")
        }
        ParsedCommand::Revert => {
            model.revert(doc);
            DispatchResult::dirty().with_message("Reverted")
        }
        ParsedCommand::Append(text) => {
            model.append(doc, &text);
            DispatchResult::dirty()
        }
        ParsedCommand::Newline => {
            model.append(doc, "\n");
            DispatchResult::dirty()
        }
        ParsedCommand::DeleteLast => {
            model.delete_last(doc);
            DispatchResult::dirty()
        }
        ParsedCommand::SetNumber(on) => {
            model.set_line_numbers(doc, on);
            DispatchResult::dirty()
        }
        ParsedCommand::SetMode(mode) => {
            model.set_mode(doc, &mode);
            DispatchResult::dirty()
        }
        ParsedCommand::Goto(line) => {
            model.move_cursor(doc, line - 1);
            DispatchResult::dirty()
        }
        ParsedCommand::TrailingNewline(arg) => toggle_trailing(model, doc, arg),
        ParsedCommand::Edit(_) | ParsedCommand::Buffer(_) | ParsedCommand::GlobalTrailingNewline(_) => {
            DispatchResult::clean()
        }
    }
}

fn toggle_trailing(model: &mut EditorModel, doc: DocumentId, arg: ToggleArg) -> DispatchResult {
    let on = model.toggle_trailing(doc, arg);
    tracing::info!(target: "runtime.command", doc = %doc, on, "trailing_newline_mode");
    DispatchResult::dirty().with_message(format!("Trailing newline mode {}", on_off(on)))
}

fn on_off(on: bool) -> &'static str {
    if on { "enabled" } else { "disabled" }
}
