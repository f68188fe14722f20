//! Interactive terminal client.
//!
//! Renders the shell's active view and feeds line input into the wizard and
//! chat controllers. All state lives in those controllers; this module only
//! reads lines, dispatches them, and prints what changed.

mod render;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::chat::{ChatController, ChatState, FallbackPicker};
use crate::models::{InterviewType, Role, UploadedFile};
use crate::service::InterviewService;
use crate::shell::{Shell, View};
use crate::store::MessageStore;
use crate::wizard::catalog::MAJOR_FIELDS;
use crate::wizard::{WizardController, WizardTransition};

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// One read from the editor.
#[derive(Debug, PartialEq)]
enum Line {
    Text(String),
    /// Ctrl-C: drop the line and prompt again.
    Interrupted,
    /// Ctrl-D or closed input.
    Closed,
}

impl Line {
    fn from_readline(result: rustyline::Result<String>) -> Result<Self> {
        match result {
            Ok(text) => Ok(Line::Text(text)),
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => Ok(Line::Closed),
            Err(e) => Err(anyhow::anyhow!("Readline error: {e}")),
        }
    }

    /// The entered text, or the flow to take without acting on anything.
    fn into_text(self) -> std::result::Result<String, Flow> {
        match self {
            Line::Text(text) => Ok(text),
            Line::Interrupted => Err(Flow::Continue),
            Line::Closed => Err(Flow::Quit),
        }
    }
}

/// Effect of one line of input on the current wizard step.
#[derive(Debug, PartialEq)]
enum StepInput {
    /// Try to move forward.
    Advance,
    /// Input applied; stay on this step.
    Stay,
    Invalid(&'static str),
}

/// A line typed during the interview.
#[derive(Debug, PartialEq)]
enum ChatCommand<'a> {
    Quit,
    Home,
    Help,
    History,
    End,
    Unknown(&'a str),
    Answer(&'a str),
}

fn parse_chat_line(line: &str) -> ChatCommand<'_> {
    let input = line.trim();
    match input {
        "/quit" | "/q" | "/exit" => ChatCommand::Quit,
        "/home" => ChatCommand::Home,
        "/help" | "/h" => ChatCommand::Help,
        "/history" => ChatCommand::History,
        "/end" => ChatCommand::End,
        _ if input.starts_with('/') => ChatCommand::Unknown(input),
        _ => ChatCommand::Answer(input),
    }
}

/// Runs the client until the user quits or input closes.
pub async fn run(service: Arc<dyn InterviewService>, picker: FallbackPicker) -> Result<()> {
    let mut terminal = Terminal::new(service, picker)?;
    terminal.run().await
}

struct Terminal {
    service: Arc<dyn InterviewService>,
    shell: Shell,
    wizard: Option<WizardController>,
    chat: ChatController,
    editor: DefaultEditor,
    /// Messages of the current session already printed.
    printed: usize,
}

impl Terminal {
    fn new(service: Arc<dyn InterviewService>, picker: FallbackPicker) -> Result<Self> {
        let store = MessageStore::new();
        let editor = DefaultEditor::new()
            .map_err(|e| anyhow::anyhow!("Failed to initialize readline: {e}"))?;
        Ok(Self {
            chat: ChatController::new(service.clone(), store.clone(), picker),
            shell: Shell::new(store),
            service,
            wizard: None,
            editor,
            printed: 0,
        })
    }

    async fn run(&mut self) -> Result<()> {
        render::banner();
        loop {
            let flow = match self.shell.view() {
                View::Landing => self.landing()?,
                View::Wizard => self.wizard_turn().await?,
                View::Chat => self.chat_turn().await?,
            };
            if flow == Flow::Quit {
                break;
            }
        }
        println!("안녕히 가세요!");
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> Result<Line> {
        let line = Line::from_readline(self.editor.readline(prompt))?;
        match &line {
            Line::Text(text) if !text.trim().is_empty() => {
                let _ = self.editor.add_history_entry(text.as_str());
            }
            Line::Interrupted => println!("^C"),
            _ => {}
        }
        Ok(line)
    }

    fn go_home(&mut self) {
        self.shell.go_home();
        self.chat.unbind();
        self.wizard = None;
        self.printed = 0;
    }

    fn landing(&mut self) -> Result<Flow> {
        if let Some(summary) = self.shell.take_notice() {
            render::notice(&summary);
        }
        render::landing();

        let line = match self.read_line(&format!("{} ", ">".bright_green()))?.into_text() {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        match line.trim() {
            "/quit" | "/q" | "/exit" => return Ok(Flow::Quit),
            "" | "/start" => {
                self.shell.start_setup();
                self.wizard = Some(WizardController::new(self.service.clone()));
            }
            other => render::hint(&format!("알 수 없는 입력입니다: {other}")),
        }
        Ok(Flow::Continue)
    }

    async fn wizard_turn(&mut self) -> Result<Flow> {
        let wizard = self
            .wizard
            .get_or_insert_with(|| WizardController::new(self.service.clone()));
        render::wizard_step(wizard);

        let line = match self.read_line(&format!("{} ", ">".bright_green()))?.into_text() {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };
        match line.trim() {
            "/quit" | "/q" | "/exit" => return Ok(Flow::Quit),
            "/home" => {
                self.go_home();
                return Ok(Flow::Continue);
            }
            _ => {}
        }
        let Some(wizard) = self.wizard.as_mut() else {
            return Ok(Flow::Continue);
        };

        let transition = match line.trim() {
            "/back" => wizard.previous(),
            _ => match apply_step_input(wizard, &line) {
                StepInput::Advance => wizard.next().await,
                StepInput::Stay => return Ok(Flow::Continue),
                StepInput::Invalid(reason) => {
                    render::hint(reason);
                    return Ok(Flow::Continue);
                }
            },
        };

        match transition {
            WizardTransition::Advanced(step) | WizardTransition::Retreated(step) => {
                debug!("wizard moved to step {step}");
            }
            WizardTransition::Blocked => render::hint("필수 항목을 먼저 입력해주세요."),
            WizardTransition::Cancelled => {
                self.shell.cancel_setup();
                self.wizard = None;
            }
            WizardTransition::Completed(completed) => {
                let profile = completed.profile.clone();
                let token = self.shell.complete_setup(completed);
                self.chat.bind(token, profile);
                self.wizard = None;
                self.printed = 0;
            }
        }
        Ok(Flow::Continue)
    }

    async fn chat_turn(&mut self) -> Result<Flow> {
        let token = self.shell.session_token().cloned();
        let profile = self.shell.profile().cloned();
        let (Some(token), Some(profile)) = (token, profile) else {
            self.go_home();
            return Ok(Flow::Continue);
        };
        // Idempotent when already bound to this token
        self.chat.bind(token, profile.clone());

        if !self.chat.is_started() && !self.chat.is_pending() {
            render::pending();
            self.chat.start().await;
            let session_id = self.chat.effective_session_id().unwrap_or_default();
            render::chat_header(&profile, &session_id, self.shell.profile_id());
            self.flush_messages(true);
        }

        let line = match self.read_line(&format!("{} ", "나>".bright_green()))?.into_text() {
            Ok(line) => line,
            Err(flow) => return Ok(flow),
        };

        match parse_chat_line(&line) {
            ChatCommand::Quit => return Ok(Flow::Quit),
            ChatCommand::Home => self.go_home(),
            ChatCommand::Help => render::chat_help(),
            ChatCommand::History => {
                if self.shell.store().is_empty() {
                    render::hint("대화 기록이 없습니다.");
                } else {
                    render::transcript(&self.chat.messages());
                }
            }
            ChatCommand::End => {
                render::pending();
                match self.chat.end().await {
                    Some(summary) => {
                        self.shell.end_session(summary);
                        self.chat.unbind();
                        self.printed = 0;
                    }
                    None => self.go_home(),
                }
            }
            ChatCommand::Unknown(command) => {
                render::hint(&format!("알 수 없는 명령어입니다: {command} (/help 참고)"));
            }
            ChatCommand::Answer(text) => {
                if self.chat.is_pending() {
                    render::hint("면접관의 응답을 기다리는 중입니다.");
                    return Ok(Flow::Continue);
                }
                self.chat.set_input(text);
                if self.chat.can_send() {
                    render::pending();
                    let text = self.chat.input().to_string();
                    self.chat.send(&text).await;
                    // The user's own line is already on screen
                    self.flush_messages(false);
                } else if self.chat.state() == ChatState::Ended {
                    render::hint("종료된 면접입니다. /home 으로 돌아가세요.");
                }
            }
        }
        Ok(Flow::Continue)
    }

    /// Prints turns appended since the last flush.
    fn flush_messages(&mut self, include_user: bool) {
        if self.shell.store().len() <= self.printed {
            return;
        }
        let messages = self.chat.messages();
        for msg in messages.iter().skip(self.printed) {
            if include_user || msg.role == Role::Assistant {
                render::message(msg);
            }
        }
        self.printed = messages.len();
    }
}

/// Applies one line of wizard input to the current step.
fn apply_step_input(wizard: &mut WizardController, line: &str) -> StepInput {
    let input = line.trim();
    match wizard.step() {
        1 => {
            if input.is_empty() {
                return StepInput::Advance;
            }
            match parse_choice(input, InterviewType::ALL.len()) {
                Some(i) => {
                    wizard.set_type(InterviewType::ALL[i]);
                    StepInput::Advance
                }
                None => StepInput::Invalid("1~5 중에서 선택하세요."),
            }
        }
        2 => {
            if !input.is_empty() {
                wizard.set_institution(input);
            }
            StepInput::Advance
        }
        3 => {
            if input.is_empty() {
                return StepInput::Advance;
            }
            let field = parse_choice(input, MAJOR_FIELDS.len())
                .map(|i| MAJOR_FIELDS[i])
                .unwrap_or(input);
            if wizard.select_field(field) {
                StepInput::Advance
            } else {
                StepInput::Invalid("목록에 있는 분야를 선택하세요.")
            }
        }
        4 => {
            if input.is_empty() {
                return StepInput::Advance;
            }
            if let Some(keyword) = input.strip_prefix('-') {
                if wizard.remove_keyword(keyword.trim()) {
                    StepInput::Stay
                } else {
                    StepInput::Invalid("등록되지 않은 키워드입니다.")
                }
            } else if wizard.add_keyword(input) {
                StepInput::Stay
            } else {
                StepInput::Invalid("이미 추가된 키워드입니다.")
            }
        }
        5 => {
            if input.is_empty() {
                return StepInput::Advance;
            }
            if let Some(name) = input.strip_prefix('-') {
                return if wizard.detach_file(name.trim()) {
                    StepInput::Stay
                } else {
                    StepInput::Invalid("첨부되지 않은 파일입니다.")
                };
            }
            match UploadedFile::from_path(Path::new(input)) {
                Ok(file) => {
                    if wizard.attach_file(file) {
                        StepInput::Stay
                    } else {
                        StepInput::Invalid("이미 첨부된 파일입니다.")
                    }
                }
                Err(e) => {
                    debug!("cannot attach {input}: {e}");
                    StepInput::Invalid("파일을 열 수 없습니다.")
                }
            }
        }
        6 => {
            if !input.is_empty() {
                wizard.set_additional_style(input);
            }
            StepInput::Advance
        }
        _ => StepInput::Advance,
    }
}

/// 1-based menu number to a 0-based index.
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;
    use crate::service::testing::ScriptedService;

    fn wizard() -> WizardController {
        WizardController::new(Arc::new(ScriptedService::failing()))
    }

    #[test]
    fn test_parse_choice_bounds() {
        assert_eq!(parse_choice("1", 5), Some(0));
        assert_eq!(parse_choice("5", 5), Some(4));
        assert_eq!(parse_choice("0", 5), None);
        assert_eq!(parse_choice("6", 5), None);
        assert_eq!(parse_choice("abc", 5), None);
    }

    #[test]
    fn test_type_step_accepts_menu_number() {
        let mut w = wizard();
        assert_eq!(apply_step_input(&mut w, "3"), StepInput::Advance);
        assert_eq!(w.draft().kind, Some(InterviewType::University));
        assert_eq!(w.draft().difficulty, Some(Difficulty::High));
        assert!(matches!(apply_step_input(&mut w, "9"), StepInput::Invalid(_)));
    }

    #[tokio::test]
    async fn test_field_step_accepts_number_or_name() {
        let mut w = wizard();
        w.set_type(InterviewType::Quiz);
        w.next().await;
        w.set_institution("수학올림피아드");
        w.next().await;
        assert_eq!(w.step(), 3);

        assert_eq!(apply_step_input(&mut w, "4"), StepInput::Advance);
        assert_eq!(w.draft().field.as_deref(), Some("공학"));
        assert_eq!(apply_step_input(&mut w, "의료"), StepInput::Advance);
        assert_eq!(w.draft().field.as_deref(), Some("의료"));
        assert!(matches!(apply_step_input(&mut w, "점성술"), StepInput::Invalid(_)));
    }

    #[tokio::test]
    async fn test_keyword_step_adds_and_removes() {
        let mut w = wizard();
        w.set_type(InterviewType::Quiz);
        w.next().await;
        w.set_institution("토론대회");
        w.next().await;
        w.select_field("교육학");
        w.next().await;
        assert_eq!(w.step(), 4);

        assert_eq!(apply_step_input(&mut w, "토론"), StepInput::Stay);
        assert!(matches!(apply_step_input(&mut w, "토론"), StepInput::Invalid(_)));
        assert_eq!(apply_step_input(&mut w, "-토론"), StepInput::Stay);
        assert!(w.draft().keywords.is_empty());
        assert_eq!(apply_step_input(&mut w, ""), StepInput::Advance);
    }

    async fn at_step(n: u8) -> WizardController {
        let mut w = wizard();
        w.set_type(InterviewType::University);
        w.set_institution("서울대학교");
        w.select_field("공학");
        while w.step() < n {
            w.next().await;
        }
        w
    }

    #[test]
    fn test_interrupt_never_reads_as_input() {
        let line = Line::from_readline(Err(ReadlineError::Interrupted)).unwrap();
        assert_eq!(line, Line::Interrupted);
        assert_eq!(line.into_text(), Err(Flow::Continue));

        let line = Line::from_readline(Err(ReadlineError::Eof)).unwrap();
        assert_eq!(line.into_text(), Err(Flow::Quit));

        // An empty Enter is real input
        let line = Line::from_readline(Ok(String::new())).unwrap();
        assert_eq!(line.into_text(), Ok(String::new()));
    }

    #[test]
    fn test_parse_chat_line_commands() {
        assert_eq!(parse_chat_line(" /end "), ChatCommand::End);
        assert_eq!(parse_chat_line("/h"), ChatCommand::Help);
        assert_eq!(parse_chat_line("/history"), ChatCommand::History);
        assert_eq!(parse_chat_line("/home"), ChatCommand::Home);
        assert_eq!(parse_chat_line("/exit"), ChatCommand::Quit);
    }

    #[test]
    fn test_unknown_slash_command_is_not_an_answer() {
        assert_eq!(parse_chat_line("/ned"), ChatCommand::Unknown("/ned"));
        assert_eq!(
            parse_chat_line("  저는 로봇을 좋아합니다. "),
            ChatCommand::Answer("저는 로봇을 좋아합니다.")
        );
        assert_eq!(parse_chat_line("   "), ChatCommand::Answer(""));
    }

    #[tokio::test]
    async fn test_file_step_attaches_and_detaches() {
        let mut w = at_step(5).await;
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");

        assert_eq!(apply_step_input(&mut w, manifest), StepInput::Stay);
        assert_eq!(w.draft().uploaded_files.len(), 1);
        assert!(matches!(apply_step_input(&mut w, manifest), StepInput::Invalid(_)));
        assert!(matches!(
            apply_step_input(&mut w, "/no/such/file.pdf"),
            StepInput::Invalid(_)
        ));

        assert_eq!(apply_step_input(&mut w, "-Cargo.toml"), StepInput::Stay);
        assert!(w.draft().uploaded_files.is_empty());
        assert_eq!(apply_step_input(&mut w, ""), StepInput::Advance);
    }
}
