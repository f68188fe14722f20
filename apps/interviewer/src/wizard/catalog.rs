// Static catalogs shown by the setup wizard.

use crate::models::InterviewType;

/// Selectable interest fields for step 3. Exactly one is chosen.
pub const MAJOR_FIELDS: &[&str] = &[
    "인문학",
    "사회과학",
    "자연과학",
    "공학",
    "교육학",
    "의료",
    "예체능",
    "생태학",
    "정보·데이터과학",
    "융합창업",
    "미디어디자인",
];

pub fn is_known_field(field: &str) -> bool {
    MAJOR_FIELDS.contains(&field)
}

/// Example institution names per interview type.
pub fn institution_examples(kind: InterviewType) -> &'static [&'static str] {
    match kind {
        InterviewType::GiftedCenter => &[
            "서울시교육청 영재교육원",
            "경기도교육청 영재교육원",
            "부산광역시교육청 영재교육원",
            "인천광역시교육청 영재교육원",
        ],
        InterviewType::ScienceHigh => &[
            "서울과학고등학교",
            "경기과학고등학교",
            "대구과학고등학교",
            "한국과학영재학교",
        ],
        InterviewType::University => &["서울대학교", "연세대학교", "고려대학교", "KAIST", "POSTECH"],
        InterviewType::Quiz => &["퀴즈대회", "과학경시대회", "수학올림피아드", "토론대회"],
        InterviewType::Other => &["면접 기관명", "지원 기관", "목표 기관"],
    }
}

/// Placeholder for the institution input: the first example for the chosen
/// type, or a generic hint before a type is chosen.
pub fn institution_placeholder(kind: Option<InterviewType>) -> &'static str {
    kind.and_then(|k| institution_examples(k).first().copied())
        .unwrap_or("지원 기관명")
}

/// Up to three suggested institutions for the chosen type.
pub fn institution_suggestions(kind: InterviewType) -> &'static [&'static str] {
    let examples = institution_examples(kind);
    &examples[..examples.len().min(3)]
}

/// Heading for each wizard step (1-based).
pub fn step_title(step: u8) -> &'static str {
    match step {
        1 => "원하는 면접 유형을 선택하세요.",
        2 => "지원하는 기관명을 입력하세요.",
        3 => "관심있는 영역 및 진로희망을 선택하세요.",
        4 => "관심있는 주제의 키워드를 입력하세요.",
        5 => "자기소개서 또는 탐구 보고서가 있다면 파일을 업로드해주세요.",
        6 => "추가 구체적으로 원하는 스타일이 있다면 작성해주세요.",
        _ => "",
    }
}
