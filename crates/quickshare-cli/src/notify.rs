//! User-facing notifications and progress rendering.

use std::io::Write;

use crate::format::{format_eta, format_size, format_speed};
use crate::output;
use crate::progress::ProgressUpdate;

/// Severity of a one-line notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Neutral status
    Info,
    /// The operation succeeded
    Success,
    /// Something worth attention, the operation continues
    Warning,
    /// The operation failed
    Error,
}

/// Sink for notifications and transfer progress.
pub trait Notifier: Send + Sync {
    /// Show a one-line message.
    fn notify(&self, level: Level, message: &str);

    /// Show the current state of a transfer.
    fn progress(&self, label: &str, update: &ProgressUpdate);

    /// End a progress display started by [`Notifier::progress`].
    fn finish_progress(&self);
}

/// Writes to the terminal. Progress redraws a single stderr line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    /// Create a notifier; `quiet` suppresses progress lines.
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

/// One progress line, e.g. `Uploading  42% 1.5 MB / 3.6 MB  2 MB/s  ETA 2s`.
pub fn progress_line(label: &str, update: &ProgressUpdate) -> String {
    format!(
        "{label} {:>3}% {} / {}  {}  ETA {}",
        update.percent.round() as u64,
        format_size(update.loaded),
        format_size(update.total),
        format_speed(update.speed),
        format_eta(update.eta_seconds),
    )
}

impl Notifier for TerminalNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Success => output::print_success(message),
            Level::Warning => output::print_warning(message),
            Level::Error => output::print_error(message),
        }
    }

    fn progress(&self, label: &str, update: &ProgressUpdate) {
        if self.quiet {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K{}", progress_line(label, update));
        let _ = stderr.flush();
    }

    fn finish_progress(&self) {
        if self.quiet {
            return;
        }
        eprintln!();
    }
}
