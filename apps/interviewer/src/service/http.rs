use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::errors::ServiceError;
use crate::models::Profile;
use crate::service::{
    EndSessionResponse, InterviewService, ProfileEnvelope, ProfileResponse, RespondRequest,
    RespondResponse, StartSessionResponse,
};

const START_PATH: &str = "/api/interview/start-personalized";
const PROFILE_PATH: &str = "/api/interview/profile";
const RESPOND_PATH: &str = "/api/interview/respond";
const END_PATH: &str = "/api/interview/end";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// JSON-over-HTTP client for the interview service.
///
/// No timeout and no retries: a hung call stays pending, and a failed call
/// is reported once to the caller.
#[derive(Clone)]
pub struct HttpInterviewService {
    client: Client,
    base_url: String,
}

impl HttpInterviewService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InterviewService for HttpInterviewService {
    async fn start_session(&self, profile: &Profile) -> Result<StartSessionResponse, ServiceError> {
        let response = self
            .client
            .post(self.url(START_PATH))
            .json(&ProfileEnvelope { profile })
            .send()
            .await?;
        let parsed: StartSessionResponse = decode(response).await?;
        debug!("start_session succeeded: session_id={}", parsed.session_id);
        Ok(parsed)
    }

    async fn submit_profile(&self, profile: &Profile) -> Result<ProfileResponse, ServiceError> {
        let response = self
            .client
            .post(self.url(PROFILE_PATH))
            .json(&ProfileEnvelope { profile })
            .send()
            .await?;
        let parsed: ProfileResponse = decode(response).await?;
        debug!("submit_profile succeeded: profile_id={}", parsed.profile_id);
        Ok(parsed)
    }

    async fn respond(&self, session_id: &str, text: &str) -> Result<RespondResponse, ServiceError> {
        let response = self
            .client
            .post(self.url(RESPOND_PATH))
            .json(&RespondRequest {
                session_id,
                response: text,
            })
            .send()
            .await?;
        let parsed: RespondResponse = decode(response).await?;
        debug!("respond succeeded for session {session_id}");
        Ok(parsed)
    }

    async fn end_session(&self, session_id: &str) -> Result<EndSessionResponse, ServiceError> {
        let response = self
            .client
            .post(self.url(END_PATH))
            .query(&[("session_id", session_id)])
            .send()
            .await?;
        let parsed: EndSessionResponse = decode(response).await?;
        debug!(
            "end_session succeeded for session {session_id}: {} analysis fields",
            parsed.analysis.len()
        );
        Ok(parsed)
    }
}

/// Maps non-2xx to `ServiceError::Api` and parses the body otherwise.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        // Prefer the `detail` message of a JSON error body
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(ServiceError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::models::{Difficulty, InterviewType};

    /// Bodies and query strings the stub received, keyed by path.
    type Seen = Arc<Mutex<Vec<(String, Value)>>>;

    fn profile() -> Profile {
        Profile {
            kind: InterviewType::University,
            institution: "서울대학교".to_string(),
            fields: vec!["공학".to_string()],
            keywords: vec![],
            additional_style: String::new(),
            uploaded_files: vec![],
            difficulty: Difficulty::High,
        }
    }

    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn spawn_stub() -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                START_PATH,
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((START_PATH.to_string(), body));
                    Json(json!({
                        "session_id": Uuid::new_v4().to_string(),
                        "question": "자기소개를 해주세요."
                    }))
                }),
            )
            .route(
                PROFILE_PATH,
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((PROFILE_PATH.to_string(), body));
                    Json(json!({
                        "profile_id": "p-42",
                        "status": "success",
                        "message": "프로필이 성공적으로 저장되었습니다."
                    }))
                }),
            )
            .route(
                RESPOND_PATH,
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push((RESPOND_PATH.to_string(), body));
                    Json(json!({"question": "왜 공학인가요?"}))
                }),
            )
            .route(
                END_PATH,
                post(
                    |State(seen): State<Seen>, Query(q): Query<HashMap<String, String>>| async move {
                        seen.lock().unwrap().push((END_PATH.to_string(), json!(q)));
                        Json(json!({
                            "session_id": q.get("session_id").cloned().unwrap_or_default(),
                            "interview_type": "university",
                            "duration_minutes": 4,
                            "total_exchanges": 2,
                            "feedback": "수고하셨습니다."
                        }))
                    },
                ),
            )
            .with_state(seen.clone());
        (spawn(app).await, seen)
    }

    #[tokio::test]
    async fn test_start_session_posts_profile_envelope() {
        let (base, seen) = spawn_stub().await;
        let svc = HttpInterviewService::new(base).unwrap();

        let resp = svc.start_session(&profile()).await.unwrap();
        assert!(!resp.session_id.is_empty());
        assert_eq!(resp.question.as_deref(), Some("자기소개를 해주세요."));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].0, START_PATH);
        assert_eq!(seen[0].1["profile"]["type"], "university");
        assert_eq!(seen[0].1["profile"]["fields"], json!(["공학"]));
        assert_eq!(seen[0].1["profile"]["difficulty"], "high");
    }

    #[tokio::test]
    async fn test_submit_profile_returns_id() {
        let (base, _) = spawn_stub().await;
        let svc = HttpInterviewService::new(base).unwrap();
        let resp = svc.submit_profile(&profile()).await.unwrap();
        assert_eq!(resp.profile_id, "p-42");
        assert_eq!(resp.status.as_deref(), Some("success"));
    }

    #[tokio::test]
    async fn test_respond_sends_session_and_text() {
        let (base, seen) = spawn_stub().await;
        let svc = HttpInterviewService::new(base).unwrap();

        let resp = svc.respond("s-1", "안녕하세요").await.unwrap();
        assert_eq!(resp.next_turn(), Some("왜 공학인가요?"));

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0].1,
            json!({"session_id": "s-1", "response": "안녕하세요"})
        );
    }

    #[tokio::test]
    async fn test_end_session_passes_id_as_query() {
        let (base, seen) = spawn_stub().await;
        let svc = HttpInterviewService::new(format!("{base}/")).unwrap();

        let resp = svc.end_session("session-1700000000000").await.unwrap();
        assert_eq!(resp.feedback(), Some("수고하셨습니다."));
        assert_eq!(resp.total_exchanges, Some(2));
        assert_eq!(
            resp.analysis.get("session_id"),
            Some(&json!("session-1700000000000"))
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1, json!({"session_id": "session-1700000000000"}));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error_with_detail() {
        let app = Router::new().route(
            RESPOND_PATH,
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"detail": "세션을 찾을 수 없습니다."})),
                )
            }),
        );
        let svc = HttpInterviewService::new(spawn(app).await).unwrap();

        match svc.respond("missing", "hi").await {
            Err(ServiceError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "세션을 찾을 수 없습니다.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_plain_error_body_is_kept_verbatim() {
        let app = Router::new().route(
            END_PATH,
            post(|| async { (StatusCode::NOT_FOUND, "gone") }),
        );
        let svc = HttpInterviewService::new(spawn(app).await).unwrap();

        let err = svc.end_session("x").await.unwrap_err();
        match err {
            ServiceError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "gone");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let app = Router::new().route(START_PATH, post(|| async { "not json" }));
        let svc = HttpInterviewService::new(spawn(app).await).unwrap();

        let err = svc.start_session(&profile()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        // Bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let svc = HttpInterviewService::new(format!("http://{addr}")).unwrap();
        let err = svc.submit_profile(&profile()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Http(_)));
    }
}
