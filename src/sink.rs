use std::{
    io::{self, Write},
    path::PathBuf,
};

use log::{error, info};

use crate::errors::ExportError;

/// Destination for the generated migration text.
pub trait OutputSink {
    fn write(&self, text: &str) -> Result<(), ExportError>;
    /// Short human-readable name used in notifications.
    fn describe(&self) -> String;
}

pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&self, text: &str) -> Result<(), ExportError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| ExportError::Sink(e.to_string()))
    }

    fn describe(&self) -> String {
        "stdout".to_string()
    }
}

pub struct FileSink {
    pub path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSink for FileSink {
    fn write(&self, text: &str) -> Result<(), ExportError> {
        std::fs::write(&self.path, text)
            .map_err(|e| ExportError::Sink(format!("{}: {}", self.path.display(), e)))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// User-facing messages: blocking alerts for failures, one-liners for success.
pub trait Notifier {
    fn alert(&self, title: &str, message: &str);
    fn notify(&self, message: &str);
}

/// Routes notifications through the `log` facade.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, title: &str, message: &str) {
        error!("{}: {}", title, message);
    }

    fn notify(&self, message: &str) {
        info!("{}", message);
    }
}
