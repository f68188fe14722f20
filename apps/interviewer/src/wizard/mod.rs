//! Setup wizard: a fixed six-step linear form that collects a `Profile`.
//!
//! Steps: 1 type, 2 institution, 3 field, 4 keywords, 5 files, 6 style.
//! Steps 1–3 gate the forward action; 4–6 are optional content.
//!
//! Finishing the last step submits the profile to the interview service.
//! That submission is best-effort: if it fails the wizard still completes,
//! just without a server-assigned profile id.

pub mod catalog;

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::ValidationError;
use crate::models::{CompletedProfile, Difficulty, InterviewType, Profile, UploadedFile};
use crate::service::InterviewService;

pub const FIRST_STEP: u8 = 1;
pub const TOTAL_STEPS: u8 = 6;

/// Mutable profile under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub kind: Option<InterviewType>,
    pub institution: String,
    pub field: Option<String>,
    /// Ordered set: insertion order, no duplicates.
    pub keywords: Vec<String>,
    pub additional_style: String,
    /// Attachments collected on step 5, unique by name. Kept local.
    pub uploaded_files: Vec<UploadedFile>,
    /// Always `kind.map(InterviewType::difficulty)`.
    pub difficulty: Option<Difficulty>,
}

impl ProfileDraft {
    /// Freezes the draft into a `Profile`, checking the required fields.
    pub fn assemble(&self) -> Result<Profile, ValidationError> {
        let kind = self.kind.ok_or(ValidationError::MissingType)?;
        let institution = self.institution.trim();
        if institution.is_empty() {
            return Err(ValidationError::EmptyInstitution);
        }
        let field = self.field.clone().ok_or(ValidationError::MissingField)?;

        Ok(Profile {
            kind,
            institution: institution.to_string(),
            fields: vec![field],
            keywords: self.keywords.clone(),
            additional_style: self.additional_style.clone(),
            // File bodies are not sent; the service gets an empty list
            uploaded_files: Vec::new(),
            difficulty: kind.difficulty(),
        })
    }
}

/// What a navigation action did.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardTransition {
    Advanced(u8),
    Retreated(u8),
    /// The current step is incomplete; nothing changed.
    Blocked,
    Completed(CompletedProfile),
    Cancelled,
}

pub struct WizardController {
    service: Arc<dyn InterviewService>,
    step: u8,
    draft: ProfileDraft,
}

impl WizardController {
    pub fn new(service: Arc<dyn InterviewService>) -> Self {
        Self {
            service,
            step: FIRST_STEP,
            draft: ProfileDraft::default(),
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn draft(&self) -> &ProfileDraft {
        &self.draft
    }

    pub fn is_final_step(&self) -> bool {
        self.step == TOTAL_STEPS
    }

    /// Rounded completion percentage shown in the progress bar.
    pub fn progress_percent(&self) -> u8 {
        ((u32::from(self.step) * 100 + u32::from(TOTAL_STEPS) / 2) / u32::from(TOTAL_STEPS)) as u8
    }

    pub fn next_label(&self) -> &'static str {
        if self.is_final_step() {
            "면접 시작"
        } else {
            "다음"
        }
    }

    pub fn previous_label(&self) -> &'static str {
        if self.step == FIRST_STEP {
            "취소"
        } else {
            "이전"
        }
    }

    // ── draft editing ──────────────────────────────────────────────────────

    /// Sets the interview type and recomputes difficulty from it.
    pub fn set_type(&mut self, kind: InterviewType) {
        self.draft.kind = Some(kind);
        self.draft.difficulty = Some(kind.difficulty());
    }

    pub fn set_institution(&mut self, institution: impl Into<String>) {
        self.draft.institution = institution.into();
    }

    /// Selects the single interest field. Unknown fields are rejected and
    /// leave the current selection untouched.
    pub fn select_field(&mut self, field: &str) -> bool {
        if !catalog::is_known_field(field) {
            return false;
        }
        self.draft.field = Some(field.to_string());
        true
    }

    /// Appends a trimmed keyword unless it is blank or already present.
    pub fn add_keyword(&mut self, text: &str) -> bool {
        let keyword = text.trim();
        if keyword.is_empty() || self.draft.keywords.iter().any(|k| k == keyword) {
            return false;
        }
        self.draft.keywords.push(keyword.to_string());
        true
    }

    pub fn remove_keyword(&mut self, text: &str) -> bool {
        let before = self.draft.keywords.len();
        self.draft.keywords.retain(|k| k != text);
        self.draft.keywords.len() != before
    }

    /// Adds an attachment unless one with the same name is already present.
    pub fn attach_file(&mut self, file: UploadedFile) -> bool {
        if self.draft.uploaded_files.iter().any(|f| f.name == file.name) {
            return false;
        }
        self.draft.uploaded_files.push(file);
        true
    }

    pub fn detach_file(&mut self, name: &str) -> bool {
        let before = self.draft.uploaded_files.len();
        self.draft.uploaded_files.retain(|f| f.name != name);
        self.draft.uploaded_files.len() != before
    }

    pub fn set_additional_style(&mut self, style: impl Into<String>) {
        self.draft.additional_style = style.into();
    }

    // ── navigation ─────────────────────────────────────────────────────────

    /// Whether the forward action is enabled on `step`.
    pub fn can_advance(&self, step: u8) -> bool {
        match step {
            1 => self.draft.kind.is_some(),
            2 => !self.draft.institution.trim().is_empty(),
            3 => self.draft.field.is_some(),
            4..=TOTAL_STEPS => true,
            _ => false,
        }
    }

    pub fn can_proceed(&self) -> bool {
        self.can_advance(self.step)
    }

    /// Moves forward one step, or on the last step submits the profile and
    /// completes.
    pub async fn next(&mut self) -> WizardTransition {
        if !self.can_proceed() {
            return WizardTransition::Blocked;
        }
        if self.step < TOTAL_STEPS {
            self.step += 1;
            return WizardTransition::Advanced(self.step);
        }

        let profile = match self.draft.assemble() {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Wizard cannot complete: {e}");
                return WizardTransition::Blocked;
            }
        };

        let profile_id = self.submit(&profile).await;
        WizardTransition::Completed(CompletedProfile {
            profile,
            profile_id,
        })
    }

    /// Moves back one step, or cancels from the first step.
    pub fn previous(&mut self) -> WizardTransition {
        if self.step > FIRST_STEP {
            self.step -= 1;
            WizardTransition::Retreated(self.step)
        } else {
            WizardTransition::Cancelled
        }
    }

    /// Best-effort persistence. A single attempt; failure yields `None`.
    async fn submit(&self, profile: &Profile) -> Option<String> {
        match self.service.submit_profile(profile).await {
            Ok(resp) => {
                info!(
                    "Profile saved: profile_id={} type={} status={} {}",
                    resp.profile_id,
                    profile.kind.as_str(),
                    resp.status.as_deref().unwrap_or("-"),
                    resp.message.as_deref().unwrap_or_default()
                );
                Some(resp.profile_id)
            }
            Err(e) => {
                warn!("Profile submission failed, continuing without profile id: {e}");
                None
            }
        }
    }
}
