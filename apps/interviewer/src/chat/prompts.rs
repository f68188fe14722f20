// Canned interviewer lines substituted when the service gives nothing usable.

/// Institution placeholder used when the profile has none.
pub const UNKNOWN_INSTITUTION: &str = "지원 기관";

/// Follow-up question used when a successful reply carries neither `question` nor `response`.
pub const CLARIFY_FALLBACK: &str = "흥미로운 답변이네요. 더 자세히 설명해 주실 수 있나요?";

/// Follow-ups chosen at random when the respond call fails.
pub const FOLLOW_UP_FALLBACKS: [&str; 4] = [
    "흥미로운 답변이네요. 조금 더 구체적으로 설명해 주실 수 있나요?",
    "좋은 경험이었을 것 같습니다. 그 과정에서 어떤 어려움이 있었나요?",
    "훌륭합니다. 그 경험을 통해 무엇을 배웠나요?",
    "이해했습니다. 앞으로의 계획은 어떻게 되시나요?",
];

/// Feedback shown when the end call fails or returns no feedback.
pub const COMPLETION_FALLBACK: &str = "면접이 완료되었습니다. 수고하셨습니다!";

/// Opening question used when the start call fails or returns no question.
pub fn opening_fallback(institution: &str) -> String {
    let institution = match institution.trim() {
        "" => UNKNOWN_INSTITUTION,
        name => name,
    };
    format!("안녕하세요! {institution} 면접에 오신 것을 환영합니다. 자기소개를 부탁드립니다.")
}
