use super::Diagnostics;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Format one error log entry
///
/// `2026-10-19T08:15:30.123Z - Error Happened: \n<stack>\n`
pub fn format_entry(at: DateTime<Utc>, stack: &str) -> String {
    format!(
        "{} - Error Happened: \n{}\n",
        at.to_rfc3339_opts(SecondsFormat::Millis, true),
        stack
    )
}

/// Append-only error log
///
/// Appends are fire-and-forget: [`ErrorLog::append`] returns immediately and
/// failures are only reported to the [`Diagnostics`] observer.
#[derive(Clone)]
pub struct ErrorLog {
    path: Arc<PathBuf>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self {
            path: Arc::new(path.into()),
            diagnostics,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start appending an entry for `stack` in the background
    pub fn append(&self, stack: &str) {
        let entry = format_entry(Utc::now(), stack);
        let this = self.clone();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = this.write_async(&entry).await {
                        this.diagnostics.log_append_failed(&this.path, &e);
                    }
                });
            }
            Err(_) => {
                std::thread::spawn(move || {
                    if let Err(e) = this.write_blocking(&entry) {
                        this.diagnostics.log_append_failed(&this.path, &e);
                    }
                });
            }
        }
    }

    async fn write_async(&self, entry: &str) -> io::Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_path())
            .await?;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    fn write_blocking(&self, entry: &str) -> io::Result<()> {
        use std::io::Write;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path.as_path())?;
        file.write_all(entry.as_bytes())
    }
}
