//! Command dispatch onto the `EditorModel`.
//!
//! Every command targets the active document. Commands that need a document
//! when none is open produce a status message instead of failing.

pub mod command_parser;
mod command;

use command_parser::{CommandParser, ParsedCommand};
use core_model::EditorModel;

/// Result of dispatching a single command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
    /// Short status line text (errors, confirmations).
    pub message: Option<String>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            message: None,
        }
    }
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

/// Apply a parsed command.
pub fn dispatch(cmd: ParsedCommand, model: &mut EditorModel) -> DispatchResult {
    tracing::debug!(target: "runtime.command", ?cmd, "dispatch");
    command::execute(cmd, model)
}

/// Parse and apply a raw command line. Parse failures become status messages.
pub fn execute_line(raw: &str, model: &mut EditorModel) -> DispatchResult {
    match CommandParser::parse(raw) {
        Ok(cmd) => dispatch(cmd, model),
        Err(e) => {
            tracing::warn!(target: "runtime.command", error = %e, "command_parse_failed");
            DispatchResult::clean().with_message(e.to_string())
        }
    }
}
