//! Shell: the top-level view switch between landing, wizard, and chat.
//!
//! Exactly one view is active at a time. The shell owns the identity of the
//! current session (local token and profile) and the message store handle
//! that the chat controller writes into.

use chrono::Utc;
use tracing::info;

use crate::chat::SessionSummary;
use crate::models::{CompletedProfile, Profile, SessionToken};
use crate::store::MessageStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Landing,
    Wizard,
    Chat,
}

pub struct Shell {
    store: MessageStore,
    session_token: Option<SessionToken>,
    profile: Option<CompletedProfile>,
    wizard_visible: bool,
    /// Summary of the last ended session, waiting to be shown.
    notice: Option<SessionSummary>,
    last_minted_ms: i64,
}

impl Shell {
    pub fn new(store: MessageStore) -> Self {
        Self {
            store,
            session_token: None,
            profile: None,
            wizard_visible: false,
            notice: None,
            last_minted_ms: 0,
        }
    }

    pub fn view(&self) -> View {
        if self.wizard_visible {
            View::Wizard
        } else if self.session_token.is_some() {
            View::Chat
        } else {
            View::Landing
        }
    }

    pub fn store(&self) -> &MessageStore {
        &self.store
    }

    pub fn session_token(&self) -> Option<&SessionToken> {
        self.session_token.as_ref()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref().map(|p| &p.profile)
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.profile_id.as_deref())
    }

    pub fn start_setup(&mut self) {
        self.wizard_visible = true;
    }

    pub fn cancel_setup(&mut self) {
        self.wizard_visible = false;
    }

    /// Clears history, mints a fresh token, stores the profile, and hides
    /// the wizard, in that order, so no earlier turn leaks into the new
    /// session.
    pub fn complete_setup(&mut self, completed: CompletedProfile) -> SessionToken {
        self.store.clear();
        let token = self.mint_token();
        info!(
            "Session {token} minted for {} (profile_id={:?})",
            completed.profile.institution, completed.profile_id
        );
        self.session_token = Some(token.clone());
        self.profile = Some(completed);
        self.wizard_visible = false;
        token
    }

    /// Records the summary for display and returns to landing.
    pub fn end_session(&mut self, summary: SessionSummary) {
        self.notice = Some(summary);
        self.session_token = None;
        self.profile = None;
    }

    /// Unconditionally abandons any session or wizard progress.
    pub fn go_home(&mut self) {
        self.session_token = None;
        self.profile = None;
        self.wizard_visible = false;
        self.notice = None;
    }

    /// Summary to surface once; cleared on read.
    pub fn take_notice(&mut self) -> Option<SessionSummary> {
        self.notice.take()
    }

    /// `session-{unix_millis}`, strictly increasing within this shell.
    fn mint_token(&mut self) -> SessionToken {
        let now = Utc::now().timestamp_millis();
        let millis = now.max(self.last_minted_ms + 1);
        self.last_minted_ms = millis;
        SessionToken::from_millis(millis)
    }
}
