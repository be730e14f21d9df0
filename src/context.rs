//! # Event Context and Line Formatting
//!
//! A [`Context`] carries everything about a log event except the message
//! text: severity, channel, and the optional source location captured at the
//! call site. [`Context::format`] assembles the final line according to a
//! set of [`OutputFlags`], so different backends attached to one channel can
//! render the same event differently (a console sink may skip timestamps
//! that a file sink wants).

use std::fmt::Write as _;
use std::process;
use std::thread;

use chrono::Local;

use crate::level::Level;

/// Selects which fields [`Context::format`] renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFlags {
    /// Local wall-clock timestamp with millisecond precision.
    pub timestamp: bool,
    /// Single-character severity signature (see [`Level::signature`]).
    pub signature: bool,
    /// `[pid:thread]` tag.
    pub thread_id: bool,
    /// `file(line): ` source location, when the context has one.
    pub location: bool,
    /// `Error: ` / `Critical: ` prefix for error-grade events.
    pub error_prefix: bool,
    /// Trailing newline.
    pub eol: bool,
}

impl Default for OutputFlags {
    /// Timestamp, signature and trailing newline; everything else off.
    fn default() -> Self {
        OutputFlags {
            timestamp: true,
            signature: true,
            thread_id: false,
            location: false,
            error_prefix: false,
            eol: true,
        }
    }
}

/// Metadata of a single log event.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// Event severity.
    pub level: Level,
    /// Name of the logical channel the event belongs to.
    pub channel: &'a str,
    /// Source file of the call site, if captured.
    pub file: Option<&'a str>,
    /// Source line of the call site.
    pub line: u32,
}

impl<'a> Context<'a> {
    pub fn new(level: Level, channel: &'a str) -> Self {
        Context {
            level,
            channel,
            file: None,
            line: 0,
        }
    }

    /// Attaches the call-site location, typically via `file!()`/`line!()`.
    pub fn with_location(mut self, file: &'a str, line: u32) -> Self {
        self.file = Some(file);
        self.line = line;
        self
    }

    /// Renders `text` into a finished log line.
    ///
    /// Field order: timestamp, signature, `[pid:thread]`, `file(line): `,
    /// error prefix, message text, newline. Fields whose flag is off, or
    /// whose data the context does not carry, are skipped without leaving
    /// gaps.
    pub fn format(&self, text: &str, flags: &OutputFlags) -> String {
        let mut line = String::with_capacity(text.len() + 48);

        if flags.timestamp {
            let _ = write!(line, "{} ", Local::now().format("%H:%M:%S%.3f"));
        }

        if flags.signature {
            line.push(self.level.signature());
            line.push(' ');
        }

        if flags.thread_id {
            let _ = write!(line, "[{:X}:{}] ", process::id(), thread_label());
        }

        if flags.location {
            if let Some(file) = self.file {
                let _ = write!(line, "{}({}): ", file, self.line);
            }
        }

        if flags.error_prefix {
            line.push_str(self.level.error_prefix());
        }

        line.push_str(text);

        if flags.eol {
            line.push('\n');
        }

        line
    }
}

fn thread_label() -> String {
    let current = thread::current();
    match current.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", current.id()),
    }
}
