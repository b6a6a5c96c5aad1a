//! Structured line-oriented logging
//!
//! One event per line, emitted synchronously as flat JSON with the event
//! name and severity first and caller-supplied fields in the order given.
//! INFO goes to stdout, WARN and ERROR to stderr. No buffering and no
//! background threads, so log order matches operation order.

use std::fmt;
use std::io::{self, Write};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Normal operation
    Info,
    /// Lenient fallback taken (e.g. unsorted result, skipped index entry)
    Warn,
    /// Operation failed
    Error,
}

impl Severity {
    /// String form used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Synchronous structured logger.
pub struct Logger;

impl Logger {
    /// Logs at INFO level.
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stdout(), Severity::Info, event, fields);
    }

    /// Logs at WARN level.
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stderr(), Severity::Warn, event, fields);
    }

    /// Logs at ERROR level.
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::write_line(&mut io::stderr(), Severity::Error, event, fields);
    }

    fn write_line<W: Write>(writer: &mut W, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let mut line = String::with_capacity(128);
        line.push_str("{\"event\":\"");
        escape_into(&mut line, event);
        line.push_str("\",\"severity\":\"");
        line.push_str(severity.as_str());
        line.push('"');
        for (key, value) in fields {
            line.push_str(",\"");
            escape_into(&mut line, key);
            line.push_str("\":\"");
            escape_into(&mut line, value);
            line.push('"');
        }
        line.push_str("}\n");

        // A failed log write must never fail the operation being logged.
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}
