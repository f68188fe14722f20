//! Scripted in-memory interview service for controller tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::ServiceError;
use crate::models::Profile;
use crate::service::{
    EndSessionResponse, InterviewService, ProfileResponse, RespondResponse, StartSessionResponse,
};

/// A call the service received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Start { institution: String },
    Submit { institution: String },
    Respond { session_id: String, text: String },
    End { session_id: String },
}

/// Each operation either answers with its configured reply or, when the
/// reply is `None`, fails with a 503.
#[derive(Default)]
pub struct ScriptedService {
    pub start: Option<StartSessionResponse>,
    pub submit: Option<ProfileResponse>,
    pub respond: Option<RespondResponse>,
    pub end: Option<EndSessionResponse>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    /// Every call fails.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Every call succeeds with plausible content.
    pub fn healthy() -> Self {
        Self {
            start: Some(StartSessionResponse {
                session_id: "srv-1".to_string(),
                question: Some("자기소개를 부탁드립니다.".to_string()),
            }),
            submit: Some(ProfileResponse {
                profile_id: "profile-1".to_string(),
                status: Some("success".to_string()),
                message: None,
            }),
            respond: Some(RespondResponse {
                question: Some("그 과정에서 무엇을 배웠나요?".to_string()),
                response: None,
            }),
            end: Some(EndSessionResponse {
                feedback: Some("좋은 면접이었습니다.".to_string()),
                ..Default::default()
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unavailable() -> ServiceError {
    ServiceError::Api {
        status: 503,
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl InterviewService for ScriptedService {
    async fn start_session(&self, profile: &Profile) -> Result<StartSessionResponse, ServiceError> {
        self.record(Call::Start {
            institution: profile.institution.clone(),
        });
        self.start.clone().ok_or_else(unavailable)
    }

    async fn submit_profile(&self, profile: &Profile) -> Result<ProfileResponse, ServiceError> {
        self.record(Call::Submit {
            institution: profile.institution.clone(),
        });
        self.submit.clone().ok_or_else(unavailable)
    }

    async fn respond(&self, session_id: &str, text: &str) -> Result<RespondResponse, ServiceError> {
        self.record(Call::Respond {
            session_id: session_id.to_string(),
            text: text.to_string(),
        });
        self.respond.clone().ok_or_else(unavailable)
    }

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse, ServiceError> {
        self.record(Call::End {
            session_id: session_id.to_string(),
        });
        self.end.clone().ok_or_else(unavailable)
    }
}
