//! Structured command line parsing.
//!
//! Converts a raw command line (always beginning with ':') into a
//! `ParsedCommand`. Parsing is pure: no side effects, and failures are typed
//! `CommandError`s which the dispatcher turns into status messages.
//!
//! Toggle arguments follow the numeric prefix convention: no argument toggles,
//! a positive integer enables, zero or a negative integer disables. The words
//! `on`/`true`/`t` and `off`/`false`/`nil` are accepted as well.

use core_trailing::ToggleArg;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Close the active document.
    Quit,
    Write,
    /// Revert the active document to its saved content (`:e!`).
    Revert,
    Edit(PathBuf),
    /// Switch the active document by numeric id (`:b N`).
    Buffer(u64),
    /// Append text; `\n` and `\t` escapes are expanded.
    Append(String),
    Newline,
    DeleteLast,
    SetNumber(bool),
    SetMode(String),
    /// Move the cursor to a 1-based line.
    Goto(usize),
    TrailingNewline(ToggleArg),
    GlobalTrailingNewline(ToggleArg),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("not a command line: {0:?}")]
    NotACommand(String),
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{command}: missing argument")]
    MissingArgument { command: &'static str },
    #[error("{command}: invalid argument {value:?}")]
    InvalidArgument { command: &'static str, value: String },
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> Result<ParsedCommand, CommandError> {
        let s = raw.trim_end_matches(['\n', '\r']).trim_start();
        let Some(body) = s.strip_prefix(':') else {
            return Err(CommandError::NotACommand(s.to_string()));
        };
        let (name, rest) = match body.find(char::is_whitespace) {
            Some(idx) => (&body[..idx], body[idx..].trim_start()),
            None => (body, ""),
        };
        match name {
            "q" | "quit" => Ok(ParsedCommand::Quit),
            "w" | "write" => Ok(ParsedCommand::Write),
            "e!" => Ok(ParsedCommand::Revert),
            "e" | "edit" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { command: "e" });
                }
                Ok(ParsedCommand::Edit(PathBuf::from(rest.trim_end())))
            }
            "b" | "buffer" => {
                let id = rest.trim();
                if id.is_empty() {
                    return Err(CommandError::MissingArgument { command: "b" });
                }
                id.parse::<u64>()
                    .map(ParsedCommand::Buffer)
                    .map_err(|_| CommandError::InvalidArgument {
                        command: "b",
                        value: id.to_string(),
                    })
            }
            "append" | "a" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument { command: "append" });
                }
                Ok(ParsedCommand::Append(unescape(rest)))
            }
            "newline" => Ok(ParsedCommand::Newline),
            "delete-last" | "x" => Ok(ParsedCommand::DeleteLast),
            "set" => match rest.trim() {
                "number" | "nu" => Ok(ParsedCommand::SetNumber(true)),
                "nonumber" | "nonu" => Ok(ParsedCommand::SetNumber(false)),
                "" => Err(CommandError::MissingArgument { command: "set" }),
                other => Err(CommandError::InvalidArgument {
                    command: "set",
                    value: other.to_string(),
                }),
            },
            "setf" => {
                let mode = rest.trim();
                if mode.is_empty() {
                    return Err(CommandError::MissingArgument { command: "setf" });
                }
                Ok(ParsedCommand::SetMode(mode.to_string()))
            }
            "goto" => {
                let n = rest.trim();
                match n.parse::<usize>() {
                    Ok(line) if line >= 1 => Ok(ParsedCommand::Goto(line)),
                    _ if n.is_empty() => Err(CommandError::MissingArgument { command: "goto" }),
                    _ => Err(CommandError::InvalidArgument {
                        command: "goto",
                        value: n.to_string(),
                    }),
                }
            }
            "trailing-newline-mode" => {
                parse_toggle("trailing-newline-mode", rest).map(ParsedCommand::TrailingNewline)
            }
            "global-trailing-newline-mode" => parse_toggle("global-trailing-newline-mode", rest)
                .map(ParsedCommand::GlobalTrailingNewline),
            "" => Err(CommandError::Unknown(String::new())),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_toggle(command: &'static str, arg: &str) -> Result<ToggleArg, CommandError> {
    let arg = arg.trim();
    match arg {
        "" | "toggle" => return Ok(ToggleArg::Toggle),
        "on" | "true" | "t" => return Ok(ToggleArg::Enable),
        "off" | "false" | "nil" => return Ok(ToggleArg::Disable),
        _ => {}
    }
    arg.parse::<i64>()
        .map(|n| ToggleArg::from_prefix(Some(n)))
        .map_err(|_| CommandError::InvalidArgument {
            command,
            value: arg.to_string(),
        })
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_and_write() {
        assert_eq!(CommandParser::parse(":q"), Ok(ParsedCommand::Quit));
        assert_eq!(CommandParser::parse(":w"), Ok(ParsedCommand::Write));
        assert_eq!(CommandParser::parse(":e!"), Ok(ParsedCommand::Revert));
    }

    #[test]
    fn parse_edit() {
        match CommandParser::parse(":e  foo.txt") {
            Ok(ParsedCommand::Edit(p)) => assert_eq!(p, PathBuf::from("foo.txt")),
            other => panic!("expected Edit, got {:?}", other),
        }
        assert_eq!(
            CommandParser::parse(":e"),
            Err(CommandError::MissingArgument { command: "e" })
        );
    }

    #[test]
    fn parse_toggle_arguments() {
        let p = |s| CommandParser::parse(s);
        assert_eq!(
            p(":trailing-newline-mode"),
            Ok(ParsedCommand::TrailingNewline(ToggleArg::Toggle))
        );
        assert_eq!(
            p(":trailing-newline-mode 1"),
            Ok(ParsedCommand::TrailingNewline(ToggleArg::Enable))
        );
        assert_eq!(
            p(":trailing-newline-mode 0"),
            Ok(ParsedCommand::TrailingNewline(ToggleArg::Disable))
        );
        assert_eq!(
            p(":trailing-newline-mode -3"),
            Ok(ParsedCommand::TrailingNewline(ToggleArg::Disable))
        );
        assert_eq!(
            p(":trailing-newline-mode true"),
            Ok(ParsedCommand::TrailingNewline(ToggleArg::Enable))
        );
        assert_eq!(
            p(":global-trailing-newline-mode off"),
            Ok(ParsedCommand::GlobalTrailingNewline(ToggleArg::Disable))
        );
        assert!(matches!(
            p(":trailing-newline-mode maybe"),
            Err(CommandError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn parse_append_unescapes() {
        assert_eq!(
            CommandParser::parse(":append ab\\ncd\\n"),
            Ok(ParsedCommand::Append("ab\ncd\n".into()))
        );
        assert_eq!(
            CommandParser::parse(":append a\\\\n"),
            Ok(ParsedCommand::Append("a\\n".into()))
        );
    }

    #[test]
    fn parse_set_and_goto() {
        assert_eq!(CommandParser::parse(":set nonumber"), Ok(ParsedCommand::SetNumber(false)));
        assert_eq!(CommandParser::parse(":set nu"), Ok(ParsedCommand::SetNumber(true)));
        assert_eq!(CommandParser::parse(":goto 4"), Ok(ParsedCommand::Goto(4)));
        assert!(CommandParser::parse(":goto 0").is_err());
        assert_eq!(CommandParser::parse(":setf rust"), Ok(ParsedCommand::SetMode("rust".into())));
        assert_eq!(CommandParser::parse(":b 2"), Ok(ParsedCommand::Buffer(2)));
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            CommandParser::parse(":doesnotexist"),
            Err(CommandError::Unknown("doesnotexist".into()))
        );
        assert!(matches!(CommandParser::parse("q"), Err(CommandError::NotACommand(_))));
        assert_eq!(
            CommandError::Unknown("zz".into()).to_string(),
            "unknown command: zz"
        );
    }
}
