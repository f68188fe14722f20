use colored::Colorize;

use crate::chat::SessionSummary;
use crate::models::{InterviewType, Message, Profile, Role};
use crate::wizard::catalog::{self, MAJOR_FIELDS};
use crate::wizard::{WizardController, TOTAL_STEPS};

const BAR_WIDTH: usize = 20;

pub fn banner() {
    println!();
    println!("{}", "🤖 AI 면접관".bright_cyan().bold());
    println!();
}

pub fn landing() {
    println!("{}", "AI와 함께하는 면접 연습".bold());
    println!("개인 맞춤형 AI 면접관과 실전 같은 면접을 연습해보세요.");
    println!(
        "{} 면접 시작하기   {} 종료",
        "[Enter]".yellow(),
        "/quit".yellow()
    );
}

pub fn notice(summary: &SessionSummary) {
    println!();
    println!("{}", "── 면접 결과 ──".bright_cyan());
    println!("{}", summary.feedback);
    if let Some(stats) = summary_stats(summary) {
        println!("{}", stats.dimmed());
    }
    println!();
}

/// Exchange count and duration from the end analysis, when reported.
pub fn summary_stats(summary: &SessionSummary) -> Option<String> {
    let analysis = summary.analysis.as_ref()?;
    let mut parts = Vec::new();
    if let Some(n) = analysis.total_exchanges {
        parts.push(format!("총 교환 횟수: {n}회"));
    }
    if let Some(minutes) = analysis.duration_minutes {
        parts.push(format!("면접 시간: {minutes}분"));
    }
    (!parts.is_empty()).then(|| parts.join("  ·  "))
}

pub fn hint(text: &str) {
    println!("{} {}", "!".yellow(), text);
}

/// `[██████░░░░…]` sized to `BAR_WIDTH`.
pub fn progress_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

pub fn wizard_step(wizard: &WizardController) {
    let step = wizard.step();
    let draft = wizard.draft();

    println!();
    println!(
        "단계 {step} / {TOTAL_STEPS}  {}  {}% 완료",
        progress_bar(wizard.progress_percent()),
        wizard.progress_percent()
    );
    println!("{}", catalog::step_title(step).bold());

    match step {
        1 => {
            for (i, kind) in InterviewType::ALL.iter().enumerate() {
                let marker = if draft.kind == Some(*kind) { "●" } else { "○" };
                println!(
                    "  {marker} {}. {} {}",
                    i + 1,
                    kind.label(),
                    format!("({})", kind.difficulty().label()).dimmed()
                );
            }
            if let Some(difficulty) = draft.difficulty {
                println!("  난이도: {}", difficulty.label().bright_green());
            }
        }
        2 => {
            println!("  예) {}", catalog::institution_placeholder(draft.kind));
            if let Some(kind) = draft.kind {
                println!(
                    "  추천: {}",
                    catalog::institution_suggestions(kind).join(", ")
                );
            }
            if !draft.institution.trim().is_empty() {
                println!("  현재: {}", draft.institution.bright_green());
            }
        }
        3 => {
            for (i, field) in MAJOR_FIELDS.iter().enumerate() {
                let marker = if draft.field.as_deref() == Some(*field) { "●" } else { "○" };
                println!("  {marker} {:>2}. {field}", i + 1);
            }
            if let Some(field) = &draft.field {
                println!("  ✅ 선택된 분야: {}", field.bright_green());
            }
        }
        4 => {
            if draft.keywords.is_empty() {
                println!("  {}", "(키워드 없음)".dimmed());
            } else {
                println!("  {}", draft.keywords.join(" · ").bright_green());
            }
            println!(
                "  여러 개의 키워드를 입력할 수 있습니다. (선택사항)  {}",
                "-키워드 로 삭제".dimmed()
            );
        }
        5 => {
            for file in &draft.uploaded_files {
                println!(
                    "  📎 {} {}",
                    file.name.bright_green(),
                    format!("({}, {} KB)", file.mime_type, file.size.div_ceil(1024)).dimmed()
                );
            }
            println!(
                "  파일 경로를 입력하면 첨부됩니다. (선택사항)  {}",
                "-파일이름 으로 삭제".dimmed()
            );
            println!("  {}", "파일 내용은 면접 서버로 전송되지 않습니다.".dimmed());
        }
        6 => {
            println!("  예) 관심이 있는 주제 위주로 질문해 주세요, 초등학생 수준으로 맞춰 주세요");
            println!("  이 내용은 선택사항입니다.");
        }
        _ => {}
    }

    println!(
        "{} {}   {} {}   {}",
        "[Enter]".yellow(),
        wizard.next_label(),
        "/back".yellow(),
        wizard.previous_label(),
        "/home".yellow()
    );
}

/// `{institution} 면접 - {type}` as shown under the chat title.
pub fn chat_subtitle(profile: &Profile) -> String {
    format!(
        "{} 면접 - {}",
        profile.institution,
        profile.kind.header_label()
    )
}

pub fn chat_header(profile: &Profile, session_id: &str, profile_id: Option<&str>) {
    println!();
    println!("{}", "AI 면접관과의 대화".bright_cyan().bold());
    println!("{}", chat_subtitle(profile));
    if !profile.fields.is_empty() {
        println!("관심 영역: {}", profile.fields.join(", "));
    }
    println!("{}", format!("세션 ID: {session_id}").dimmed());
    if let Some(id) = profile_id {
        println!("{}", format!("프로필 ID: {id}").dimmed());
    }
    println!(
        "{}",
        "💡 팁: 구체적이고 솔직한 답변을 해주세요. /end 면접 종료, /help 도움말".dimmed()
    );
    println!();
}

pub fn message(msg: &Message) {
    let label = match msg.role {
        Role::User => "나".bright_green(),
        Role::Assistant => "AI 면접관".bright_blue(),
    };
    println!("{} {}", label.bold(), msg.local_time().dimmed());
    println!("{}", msg.content);
    println!();
}

pub fn pending() {
    println!("{}", "AI 면접관 전송중...".dimmed());
}

pub fn transcript(messages: &[Message]) {
    println!();
    println!("{}", "대화 기록".bright_cyan());
    for msg in messages {
        message(msg);
    }
}

pub fn chat_help() {
    println!();
    println!("{}", "명령어".bright_cyan());
    println!("  {:10} 면접 종료 및 피드백 받기", "/end".yellow());
    println!("  {:10} 대화 기록 다시 보기", "/history".yellow());
    println!("  {:10} 처음 화면으로 (진행 중인 면접 포기)", "/home".yellow());
    println!("  {:10} 프로그램 종료", "/quit".yellow());
    println!();
}
