use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Kind of interview being practised. Drives the difficulty level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    GiftedCenter,
    ScienceHigh,
    University,
    Quiz,
    Other,
}

impl InterviewType {
    pub const ALL: [InterviewType; 5] = [
        InterviewType::GiftedCenter,
        InterviewType::ScienceHigh,
        InterviewType::University,
        InterviewType::Quiz,
        InterviewType::Other,
    ];

    /// Fixed difficulty lookup. Not user-editable.
    pub fn difficulty(self) -> Difficulty {
        match self {
            InterviewType::GiftedCenter => Difficulty::Elementary,
            InterviewType::ScienceHigh => Difficulty::Middle,
            InterviewType::University => Difficulty::High,
            InterviewType::Quiz => Difficulty::Middle,
            InterviewType::Other => Difficulty::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::GiftedCenter => "gifted_center",
            InterviewType::ScienceHigh => "science_high",
            InterviewType::University => "university",
            InterviewType::Quiz => "quiz",
            InterviewType::Other => "other",
        }
    }

    /// Label shown on the type-selection step.
    pub fn label(self) -> &'static str {
        match self {
            InterviewType::GiftedCenter => "영재교육원 면접",
            InterviewType::ScienceHigh => "영재학교, 과학고 면접",
            InterviewType::University => "대학 입시 면접",
            InterviewType::Quiz => "퀴즈",
            InterviewType::Other => "기타",
        }
    }

    /// Shorter label used in the chat header.
    pub fn header_label(self) -> &'static str {
        match self {
            InterviewType::GiftedCenter => "영재교육원",
            InterviewType::ScienceHigh => "영재학교/과학고",
            InterviewType::University => "대학입시",
            InterviewType::Quiz => "퀴즈",
            InterviewType::Other => "기타",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Elementary,
    Middle,
    High,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Elementary => "초등 수준",
            Difficulty::Middle => "중등 수준",
            Difficulty::High => "고등 수준",
        }
    }
}

/// A document attached during setup. Only metadata is collected; the body
/// is never read, and profiles sent to the service carry an empty list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub content: String,
    pub size: u64,
}

impl UploadedFile {
    /// Describes a local regular file by name, guessed type, and size.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            id: None,
            mime_type: mime_type_for(&name).to_string(),
            name,
            content: String::new(),
            size: meta.len(),
        })
    }
}

fn mime_type_for(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "hwp" => "application/x-hwp",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// The assembled interview context. Immutable once handed to the chat.
///
/// Serialized in the camelCase shape the interview service expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "type")]
    pub kind: InterviewType,
    pub institution: String,
    /// Single selected field, kept as a one-element list on the wire.
    pub fields: Vec<String>,
    pub keywords: Vec<String>,
    pub additional_style: String,
    pub uploaded_files: Vec<UploadedFile>,
    pub difficulty: Difficulty,
}

/// Result of finishing the wizard: the profile plus the id the service
/// assigned to it, when the best-effort submission succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedProfile {
    pub profile: Profile,
    pub profile_id: Option<String>,
}
