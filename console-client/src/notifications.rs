//! Operator-facing notifications raised by controllers.

use chrono::{DateTime, Utc};
use console_core::ConsoleError;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAction {
    Retry,
    Reauthenticate,
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub action: Option<NotificationAction>,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            message: message.into(),
            action: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sending half of the notification stream.
///
/// Cloned into every controller. Delivery never fails the operation that
/// raised it; a dropped receiver only means nobody is watching.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, notification: Notification) {
        if self.tx.send(notification).is_err() {
            tracing::debug!("Notification receiver dropped");
        }
    }

    pub fn success(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(NotificationLevel::Success, title, message));
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) {
        self.notify(Notification::new(NotificationLevel::Info, title, message));
    }

    /// Raise an error notification describing `err`.
    ///
    /// Session-fatal errors carry `Reauthenticate`, retryable ones `Retry`.
    pub fn failure(&self, title: impl Into<String>, err: &ConsoleError) {
        let mut notification = Notification::new(NotificationLevel::Error, title, err.to_string());
        if err.is_session_fatal() {
            notification = notification.with_action(NotificationAction::Reauthenticate);
        } else if err.is_retryable() {
            notification = notification.with_action(NotificationAction::Retry);
        }
        self.notify(notification);
    }
}
