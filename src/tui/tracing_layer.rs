use crate::tui::UILogEntry;
use chrono::Local;
use tokio::sync::mpsc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;

// Pulls the message and any structured fields out of a tracing event
struct LogEntryVisitor {
    timestamp: String,
    level: Level,
    target: String,
    message: Option<String>,
    fields: Vec<String>,
}

impl LogEntryVisitor {
    fn new(level: Level, target: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level,
            target,
            message: None,
            fields: Vec::new(),
        }
    }

    fn into_entry(self) -> Option<UILogEntry> {
        let mut message = self.message?;
        if !self.fields.is_empty() {
            message = format!("{} {}", message, self.fields.join(" "));
        }
        Some(UILogEntry {
            timestamp: self.timestamp,
            level: self.level,
            target: self.target,
            message,
        })
    }
}

impl tracing::field::Visit for LogEntryVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }
}

/// Forwards every event to the in-app Logs view while the terminal is in raw mode.
pub struct TuiLogCollectorLayer {
    sender: mpsc::UnboundedSender<UILogEntry>,
}

impl TuiLogCollectorLayer {
    pub fn new(sender: mpsc::UnboundedSender<UILogEntry>) -> Self {
        Self { sender }
    }
}

impl<S: Subscriber> Layer<S> for TuiLogCollectorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = LogEntryVisitor::new(*meta.level(), meta.target().to_string());
        event.record(&mut visitor);

        if let Some(log_entry) = visitor.into_entry() {
            // The receiver is gone once the TUI has shut down; nothing left to show the entry.
            let _ = self.sender.send(log_entry);
        }
    }
}
