use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One chat turn. `timestamp` is ISO-8601 UTC with millisecond precision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

impl Message {
    /// Builds a turn stamped with the current wall-clock time.
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self::at(role, content, Utc::now())
    }

    pub fn at(role: Role, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Local wall-clock time of the turn, e.g. `14:03:27`.
    /// Falls back to the raw timestamp if it does not parse.
    pub fn local_time(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}
