use std::sync::Arc;

use log::{info, warn, Logger};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

/// A toast-style message for the visitor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            description: description.into(),
            severity: Severity::Error,
        }
    }
}

/// Displays notifications. Fire-and-forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log instead of a screen.
pub struct LogSink {
    logger: Arc<Logger>,
}

impl LogSink {
    pub fn new(logger: Arc<Logger>) -> Self {
        LogSink { logger }
    }
}

impl NotificationSink for LogSink {
    fn notify(&self, notification: Notification) {
        let Notification {
            title, description, ..
        } = &notification;

        match notification.severity {
            Severity::Info => info!(self.logger, "{}", title; "description" => description),
            Severity::Error => warn!(self.logger, "{}", title; "description" => description),
        }
    }
}
