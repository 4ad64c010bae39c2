//! Command layer: parse `:` command lines and apply them to the `EditorModel`.

pub mod dispatcher;

pub use dispatcher::command_parser::{CommandError, CommandParser, ParsedCommand};
pub use dispatcher::{DispatchResult, dispatch, execute_line};
