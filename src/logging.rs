//! Progress logging
//!
//! Every phase transition of a run is emitted as a `tracing` event. When the
//! engine is verbose the same message is also written as a timestamped line,
//! `YYYY-MM-DD HH:MM:SS - <message>`, to stdout or a caller-supplied writer.

use std::fmt::{self, Display};
use std::io::{self, Write};

use chrono::Local;

/// Timestamp layout of verbose progress lines
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Phase-transition logger owned by the engine
pub struct ProgressLog {
    verbose: bool,
    sink: Box<dyn Write + Send>,
}

impl ProgressLog {
    /// Log to stdout when `verbose` is set
    pub fn stdout(verbose: bool) -> Self {
        Self::to_writer(verbose, io::stdout())
    }

    /// Log to any writer when `verbose` is set
    pub fn to_writer<W: Write + Send + 'static>(verbose: bool, sink: W) -> Self {
        Self {
            verbose,
            sink: Box::new(sink),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Record one progress message
    pub fn log(&mut self, message: impl Display) {
        tracing::debug!(target: "evo_min::progress", "{}", message);
        if !self.verbose {
            return;
        }
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT), &message);
        if let Err(e) = writeln!(self.sink, "{line}") {
            tracing::warn!(error = %e, "failed to write progress line");
        }
    }
}

impl fmt::Debug for ProgressLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressLog")
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::stdout(false)
    }
}

fn format_line(timestamp: &dyn Display, message: &dyn Display) -> String {
    format!("{timestamp} - {message}")
}
