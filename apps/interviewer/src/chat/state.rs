use crate::models::SessionToken;

/// Lifecycle of one bound chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Bound to a session token, start not yet issued.
    Idle,
    /// Start call outstanding.
    Starting,
    AwaitingInput,
    /// Respond call outstanding.
    Sending,
    Ended,
}

impl ChatState {
    /// A remote call is outstanding; the send affordance is disabled.
    pub fn is_pending(self) -> bool {
        matches!(self, ChatState::Starting | ChatState::Sending)
    }
}

/// Captured when a remote call is issued and checked when its result is
/// applied. A result whose ticket no longer matches the controller's current
/// binding is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub(crate) epoch: u64,
    pub(crate) token: SessionToken,
}

/// What happened to a completion handed back to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result was applied and its message appended.
    Applied,
    /// The session moved on after the call was issued; nothing changed.
    Stale,
    /// The action was not available in the current state; no call was made.
    NotIssued,
}
