use std::fmt;

/// Locally minted session identifier: `session-{unix_millis}`.
///
/// Used as the UI key for a session and as the effective session id until
/// the server issues its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn from_millis(millis: i64) -> Self {
        Self(format!("session-{millis}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
