//! Status line composition.
//!
//! Format: `[mode] <name>[*] Ln X/N TN:on|off[ G] :<message>`.
//! * `<name>` is the base file name for file-backed documents, the buffer
//!   name otherwise, or `[No Name]` when both are empty.
//! * `*` appears only when the document is dirty.
//! * `G` appears while global trailing newline mode is on.
//! * The message part is omitted when there is nothing to report.
//!
//! Two stages: `compose_status` produces ordered `StatusSegment`s and
//! `format_status` renders them.

use std::borrow::Cow;
use std::fmt::Write as _;

/// What the status line needs to know about the active document.
pub struct StatusContext<'a> {
    pub mode: &'a str,
    pub name: &'a str,
    pub file_name: Option<&'a std::path::Path>,
    pub dirty: bool,
    /// 0-based cursor line.
    pub line: usize,
    pub line_count: usize,
    pub trailing_enabled: bool,
    pub global_enabled: bool,
    pub message: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'a str),
    /// Name including the dirty marker.
    Name(Cow<'a, str>),
    Position { line_1: usize, total: usize },
    Trailing { enabled: bool, global: bool },
    Message(&'a str),
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let base: Cow<'a, str> = match ctx.file_name.and_then(|p| p.file_name()).and_then(|s| s.to_str()) {
        Some(name) => name.into(),
        None if !ctx.name.is_empty() => ctx.name.into(),
        None => "[No Name]".into(),
    };
    let name = if ctx.dirty {
        Cow::Owned(format!("{base}*"))
    } else {
        base
    };

    let mut out = Vec::with_capacity(5);
    out.push(StatusSegment::Mode(ctx.mode));
    out.push(StatusSegment::Name(name));
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        total: ctx.line_count,
    });
    out.push(StatusSegment::Trailing {
        enabled: ctx.trailing_enabled,
        global: ctx.global_enabled,
    });
    if let Some(msg) = ctx.message.filter(|m| !m.is_empty()) {
        out.push(StatusSegment::Message(msg));
    }
    out
}

pub fn format_status(segments: &[StatusSegment<'_>]) -> String {
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                let _ = write!(s, "[{m}]");
            }
            StatusSegment::Name(name) => {
                let _ = write!(s, " {name}");
            }
            StatusSegment::Position { line_1, total } => {
                let _ = write!(s, " Ln {line_1}/{total}");
            }
            StatusSegment::Trailing { enabled, global } => {
                s.push_str(if *enabled { " TN:on" } else { " TN:off" });
                if *global {
                    s.push_str(" G");
                }
            }
            StatusSegment::Message(msg) => {
                let _ = write!(s, " :{msg}");
            }
        }
    }
    s
}
