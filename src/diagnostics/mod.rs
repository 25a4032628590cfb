//! Server-side mirrors of handled errors
//!
//! Two outputs exist: a dump of the stack trace to the diagnostic stream, and
//! an append-only error log file (see [`ErrorLog`]).

use std::io::{self, Write};
use std::path::Path;

mod error_log;

pub use error_log::{ErrorLog, format_entry};

/// Receives diagnostic output produced while handling an error
///
/// Implementations must not panic; nothing they do reaches the client.
pub trait Diagnostics: Send + Sync + 'static {
    /// Write a stack trace to the diagnostic stream
    fn dump(&self, stack: &str);

    /// Called when appending to the error log failed
    fn log_append_failed(&self, path: &Path, error: &io::Error) {
        tracing::warn!(path = %path.display(), "Failed to append to error log: {}", error);
    }
}

/// Dumps stack traces to standard error
#[derive(Clone, Copy, Debug, Default)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
    fn dump(&self, stack: &str) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "{}", stack);
    }
}
