use std::fmt;
use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Side channel for user-facing messages.
///
/// The pipeline never owns UI; whoever embeds it decides how a
/// notification is shown (toast, status bar, stderr).
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);

    fn error(&self, message: &str) {
        self.notify(Severity::Error, message);
    }
}

/// Forwards notifications to the `log` crate.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info | Severity::Success => log::info!("{message}"),
            Severity::Warning => log::warn!("{message}"),
            Severity::Error => log::error!("{message}"),
        }
    }
}

/// Keeps every notification in memory, in arrival order.
#[derive(Default)]
pub struct CollectingNotifier {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries
            .lock()
            .map(|e| e.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.entries()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }
}

impl Notifier for CollectingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((severity, message.to_string()));
        }
    }
}
