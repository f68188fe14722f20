//! Chat controller. Owns the session lifecycle and the turn exchange.
//!
//! Every remote operation is split in two: `begin_*` performs the local
//! transition and returns what the call needs plus a `Ticket`; `finish_*`
//! applies the result if the ticket is still relevant. The async drivers
//! (`start`, `send`, `end`) chain the two around the service call.
//!
//! Remote failures never reach the caller. Each one is replaced with canned
//! content so the conversation can always continue.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::chat::fallback::FallbackPicker;
use crate::chat::prompts::{opening_fallback, COMPLETION_FALLBACK, CLARIFY_FALLBACK};
use crate::chat::state::{ChatState, Outcome, Ticket};
use crate::errors::ServiceError;
use crate::models::{Message, Profile, Role, SessionToken};
use crate::service::{EndSessionResponse, InterviewService, RespondResponse, StartSessionResponse};
use crate::store::MessageStore;

/// A start call ready to be issued.
#[derive(Debug, Clone)]
pub struct PendingStart {
    pub ticket: Ticket,
    pub profile: Profile,
}

/// A respond call ready to be issued. The user turn is already appended.
#[derive(Debug, Clone)]
pub struct PendingReply {
    pub ticket: Ticket,
    pub session_id: String,
    pub text: String,
}

/// An end call ready to be issued. The session is already `Ended`.
#[derive(Debug, Clone)]
pub struct PendingEnd {
    pub ticket: Ticket,
    pub session_id: String,
}

/// Handed to the shell when a session terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    /// Never empty.
    pub feedback: String,
    pub session_id: String,
    /// Full end response, when the end call succeeded.
    pub analysis: Option<EndSessionResponse>,
}

#[derive(Debug)]
struct BoundSession {
    token: SessionToken,
    profile: Profile,
    server_id: Option<String>,
    state: ChatState,
    started: bool,
}

/// The token a start was issued for. Outlives `unbind` so re-binding the
/// same token resumes the session instead of starting it again.
#[derive(Debug)]
struct StartRecord {
    token: SessionToken,
    server_id: Option<String>,
    ended: bool,
}

impl BoundSession {
    fn effective_id(&self) -> String {
        self.server_id
            .clone()
            .unwrap_or_else(|| self.token.as_str().to_string())
    }
}

pub struct ChatController {
    service: Arc<dyn InterviewService>,
    store: MessageStore,
    picker: FallbackPicker,
    /// Bumped on every rebind/unbind; invalidates outstanding tickets.
    epoch: u64,
    session: Option<BoundSession>,
    last_started: Option<StartRecord>,
    input: String,
}

impl ChatController {
    pub fn new(service: Arc<dyn InterviewService>, store: MessageStore, picker: FallbackPicker) -> Self {
        Self {
            service,
            store,
            picker,
            epoch: 0,
            session: None,
            last_started: None,
            input: String::new(),
        }
    }

    // ── binding ────────────────────────────────────────────────────────────

    /// Attaches the controller to a session. Rebinding the bound token is a
    /// no-op, and rebinding a token that was already started resumes it
    /// without a second start. A different token resets everything and
    /// invalidates calls issued for the old one.
    pub fn bind(&mut self, token: SessionToken, profile: Profile) {
        if self.session.as_ref().is_some_and(|s| s.token == token) {
            debug!("bind ignored: already bound to {token}");
            return;
        }
        self.epoch += 1;
        self.input.clear();

        let (state, server_id, started) = match self.last_started.as_ref().filter(|r| r.token == token) {
            Some(record) if record.ended => (ChatState::Ended, record.server_id.clone(), true),
            Some(record) => (ChatState::AwaitingInput, record.server_id.clone(), true),
            None => (ChatState::Idle, None, false),
        };
        if started {
            info!("Chat resumed {token} ({})", profile.institution);
        } else {
            info!("Chat bound to {token} ({})", profile.institution);
        }
        self.session = Some(BoundSession {
            token,
            profile,
            server_id,
            state,
            started,
        });
    }

    /// Detaches from any session. Outstanding calls become stale.
    pub fn unbind(&mut self) {
        if self.session.take().is_some() {
            debug!("Chat unbound");
        }
        self.epoch += 1;
        self.input.clear();
    }

    // ── queries ────────────────────────────────────────────────────────────

    pub fn state(&self) -> ChatState {
        self.session.as_ref().map_or(ChatState::Idle, |s| s.state)
    }

    #[cfg(test)]
    pub fn server_session_id(&self) -> Option<&str> {
        self.session.as_ref().and_then(|s| s.server_id.as_deref())
    }

    /// Server-issued id when known, else the local token.
    pub fn effective_session_id(&self) -> Option<String> {
        self.session.as_ref().map(BoundSession::effective_id)
    }

    pub fn is_started(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.started)
    }

    pub fn is_pending(&self) -> bool {
        self.state().is_pending()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send affordance: awaiting input and the trimmed input is non-empty.
    pub fn can_send(&self) -> bool {
        self.state() == ChatState::AwaitingInput && !self.input.trim().is_empty()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.store.messages()
    }

    // ── start ──────────────────────────────────────────────────────────────

    /// Idle → Starting. Returns `None` if a start is in flight, already
    /// done, a server id exists, the token was started before, or nothing
    /// is bound.
    pub fn begin_start(&mut self) -> Option<PendingStart> {
        let epoch = self.epoch;
        let session = self.session.as_mut()?;
        let seen = self.last_started.as_ref().is_some_and(|r| r.token == session.token);
        if session.state != ChatState::Idle || session.started || session.server_id.is_some() || seen {
            debug!("start skipped for {}: state={:?}", session.token, session.state);
            return None;
        }
        session.state = ChatState::Starting;
        self.last_started = Some(StartRecord {
            token: session.token.clone(),
            server_id: None,
            ended: false,
        });
        Some(PendingStart {
            ticket: Ticket {
                epoch,
                token: session.token.clone(),
            },
            profile: session.profile.clone(),
        })
    }

    /// Starting → AwaitingInput, appending exactly one opening message.
    pub fn finish_start(
        &mut self,
        ticket: &Ticket,
        result: Result<StartSessionResponse, ServiceError>,
    ) -> Outcome {
        let Some(session) = Self::relevant(&mut self.session, self.epoch, ticket, ChatState::Starting) else {
            debug!("dropping stale start result for {}", ticket.token);
            return Outcome::Stale;
        };

        let opening = match result {
            Ok(resp) => {
                if !resp.session_id.trim().is_empty() {
                    info!("Server session {} for {}", resp.session_id, session.token);
                    if let Some(record) = self.last_started.as_mut().filter(|r| r.token == session.token) {
                        record.server_id = Some(resp.session_id.clone());
                    }
                    session.server_id = Some(resp.session_id);
                }
                resp.question
                    .filter(|q| !q.trim().is_empty())
                    .unwrap_or_else(|| opening_fallback(&session.profile.institution))
            }
            Err(e) => {
                warn!("start_session failed for {}, using fallback greeting: {e}", session.token);
                opening_fallback(&session.profile.institution)
            }
        };

        session.state = ChatState::AwaitingInput;
        session.started = true;
        self.store.append(Message::now(Role::Assistant, opening));
        Outcome::Applied
    }

    pub async fn start(&mut self) -> Outcome {
        let Some(pending) = self.begin_start() else {
            return Outcome::NotIssued;
        };
        let result = self.service.start_session(&pending.profile).await;
        self.finish_start(&pending.ticket, result)
    }

    // ── respond ────────────────────────────────────────────────────────────

    /// AwaitingInput → Sending. Appends the user turn and clears the input.
    /// Blank input issues nothing and appends nothing.
    pub fn begin_send(&mut self) -> Option<PendingReply> {
        if !self.can_send() {
            return None;
        }
        let epoch = self.epoch;
        let text = self.input.trim().to_string();
        let session = self.session.as_mut()?;

        self.input.clear();
        session.state = ChatState::Sending;
        let pending = PendingReply {
            ticket: Ticket {
                epoch,
                token: session.token.clone(),
            },
            session_id: session.effective_id(),
            text,
        };
        self.store.append(Message::now(Role::User, pending.text.clone()));
        Some(pending)
    }

    /// Sending → AwaitingInput, appending exactly one interviewer turn.
    pub fn finish_send(
        &mut self,
        ticket: &Ticket,
        result: Result<RespondResponse, ServiceError>,
    ) -> Outcome {
        let Some(session) = Self::relevant(&mut self.session, self.epoch, ticket, ChatState::Sending) else {
            debug!("dropping stale respond result for {}", ticket.token);
            return Outcome::Stale;
        };

        let reply = match result {
            Ok(resp) => resp.next_turn().unwrap_or(CLARIFY_FALLBACK).to_string(),
            Err(e) => {
                warn!("respond failed for {}, using canned follow-up: {e}", session.token);
                self.picker.follow_up().to_string()
            }
        };

        session.state = ChatState::AwaitingInput;
        self.store.append(Message::now(Role::Assistant, reply));
        Outcome::Applied
    }

    pub async fn send(&mut self, text: &str) -> Outcome {
        self.set_input(text);
        let Some(pending) = self.begin_send() else {
            return Outcome::NotIssued;
        };
        let result = self.service.respond(&pending.session_id, &pending.text).await;
        self.finish_send(&pending.ticket, result)
    }

    // ── end ────────────────────────────────────────────────────────────────

    /// Any state → Ended. Returns `None` if nothing is bound or the session
    /// has already ended.
    pub fn begin_end(&mut self) -> Option<PendingEnd> {
        let epoch = self.epoch;
        let session = self.session.as_mut()?;
        if session.state == ChatState::Ended {
            return None;
        }
        session.state = ChatState::Ended;
        self.input.clear();
        if let Some(record) = self.last_started.as_mut().filter(|r| r.token == session.token) {
            record.ended = true;
        }
        Some(PendingEnd {
            ticket: Ticket {
                epoch,
                token: session.token.clone(),
            },
            session_id: session.effective_id(),
        })
    }

    /// Builds the termination summary whether or not the end call succeeded.
    /// Returns `None` only when the controller was rebound or unbound while
    /// the call was outstanding.
    pub fn finish_end(
        &mut self,
        ticket: &Ticket,
        session_id: String,
        result: Result<EndSessionResponse, ServiceError>,
    ) -> Option<SessionSummary> {
        if Self::relevant(&mut self.session, self.epoch, ticket, ChatState::Ended).is_none() {
            debug!("dropping stale end result for {}", ticket.token);
            return None;
        }

        let summary = match result {
            Ok(resp) => SessionSummary {
                feedback: resp.feedback().unwrap_or(COMPLETION_FALLBACK).to_string(),
                session_id,
                analysis: Some(resp),
            },
            Err(e) => {
                warn!("end_session failed for {session_id}, using default feedback: {e}");
                SessionSummary {
                    feedback: COMPLETION_FALLBACK.to_string(),
                    session_id,
                    analysis: None,
                }
            }
        };
        info!("Session {} ended", summary.session_id);
        Some(summary)
    }

    pub async fn end(&mut self) -> Option<SessionSummary> {
        let pending = self.begin_end()?;
        let result = self.service.end_session(&pending.session_id).await;
        self.finish_end(&pending.ticket, pending.session_id, result)
    }

    /// The bound session, if `ticket` still belongs to it and it is in
    /// `expected`. Borrows only the session slot so callers can keep using
    /// the store and picker.
    fn relevant<'a>(
        session: &'a mut Option<BoundSession>,
        epoch: u64,
        ticket: &Ticket,
        expected: ChatState,
    ) -> Option<&'a mut BoundSession> {
        if ticket.epoch != epoch {
            return None;
        }
        session
            .as_mut()
            .filter(|s| s.token == ticket.token && s.state == expected)
    }
}
