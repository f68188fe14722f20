//! Interview service: the remote side that generates questions and feedback.
//!
//! All remote interactions go through the `InterviewService` trait so the
//! controllers never touch HTTP directly and tests can swap in a scripted
//! implementation. The default backend is `HttpInterviewService`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ServiceError;
use crate::models::Profile;

pub mod http;
#[cfg(test)]
pub mod testing;

pub use http::HttpInterviewService;

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct ProfileEnvelope<'a> {
    pub profile: &'a Profile,
}

#[derive(Debug, Serialize)]
pub(crate) struct RespondRequest<'a> {
    pub session_id: &'a str,
    pub response: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StartSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub profile_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RespondResponse {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl RespondResponse {
    /// Next interviewer turn: `question` wins over `response`. Blank
    /// strings count as absent.
    pub fn next_turn(&self) -> Option<&str> {
        non_blank(self.question.as_deref()).or_else(|| non_blank(self.response.as_deref()))
    }
}

/// End-of-session analysis. Only `feedback` is interpreted; everything
/// else the service returns is kept verbatim in `analysis`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct EndSessionResponse {
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub total_exchanges: Option<u32>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(flatten)]
    pub analysis: Map<String, Value>,
}

impl EndSessionResponse {
    pub fn feedback(&self) -> Option<&str> {
        non_blank(self.feedback.as_deref())
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The remote interview service. Carried by the controllers as
/// `Arc<dyn InterviewService>`.
///
/// Implementations report failures as `ServiceError`; callers decide how to
/// degrade. There is no retry policy at this layer.
#[async_trait]
pub trait InterviewService: Send + Sync {
    async fn start_session(&self, profile: &Profile) -> Result<StartSessionResponse, ServiceError>;

    async fn submit_profile(&self, profile: &Profile) -> Result<ProfileResponse, ServiceError>;

    async fn respond(&self, session_id: &str, text: &str) -> Result<RespondResponse, ServiceError>;

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse, ServiceError>;
}
