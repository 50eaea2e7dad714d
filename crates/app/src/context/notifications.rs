//! User-facing command outcome notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a [`Notification`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Outcome of one command, published on the context's broadcast channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub command: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Successful outcome of `command`
    pub fn success(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, command, message)
    }

    /// Failed outcome of `command`
    pub fn error(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, command, message)
    }

    /// Whether this reports a failure
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }

    fn new(level: NotificationLevel, command: impl Into<String>, message: impl Into<String>) -> Self {
        Self { level, command: command.into(), message: message.into(), timestamp: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_level_in_snake_case() {
        let json = serde_json::to_value(Notification::error("endpoints::add", "limit")).unwrap();
        assert_eq!(json["level"], "error");
        assert_eq!(json["command"], "endpoints::add");
        assert!(json.get("timestamp").is_some());
    }
}
