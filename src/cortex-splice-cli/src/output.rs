//! Rendering of the splice outcome on stdout.

use std::io::{self, Write};

use cortex_splice::{ErrorKind, SpliceReport, SpliceResult};
use serde::Serialize;

/// Exit status for file-access and decoding failures.
const EXIT_FAILURE: u8 = 1;
/// Exit status for unusable arguments (same as clap's usage errors).
const EXIT_USAGE: u8 = 2;

/// What the command reports back to its caller.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<'a> {
    Success { report: &'a SpliceReport },
    Error { kind: ErrorKind, message: String },
}

impl<'a> Outcome<'a> {
    pub fn from_result(result: &'a SpliceResult<SpliceReport>) -> Self {
        match result {
            Ok(report) => Outcome::Success { report },
            Err(e) => Outcome::Error {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }

    /// Text mode prints the diff (dry run) then `Success`, or `Error: <cause>`.
    pub fn render(&self, out: &mut impl Write, json: bool) -> io::Result<()> {
        if json {
            serde_json::to_writer(&mut *out, self)?;
            writeln!(out)?;
            return out.flush();
        }

        match self {
            Outcome::Success { report } => {
                if let Some(diff) = &report.diff {
                    write!(out, "{diff}")?;
                }
                writeln!(out, "Success")?;
            }
            Outcome::Error { message, .. } => {
                writeln!(out, "Error: {message}")?;
            }
        }
        out.flush()
    }

    pub fn exit_status(&self) -> u8 {
        match self {
            Outcome::Success { .. } => 0,
            Outcome::Error {
                kind: ErrorKind::Argument,
                ..
            } => EXIT_USAGE,
            Outcome::Error { .. } => EXIT_FAILURE,
        }
    }
}
