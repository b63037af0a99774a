//! Profile wizard state machine.
//!
//! [`FormEngine`] owns the working [`FormDraft`] and moves through
//! `Loading -> Editing(step) -> Submitting -> Done`. Navigation forward is
//! gated by validation of the current step's fields; the last step validates
//! the whole profile and submits it. Every change to the draft is handed to a
//! background [`DraftWriter`] so the user can resume later.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use image::ImageFormat;
use kismet_api::{ApiError, PhotoUpload, ProfileApi};
use kismet_core::draft::ProfileImage;
use kismet_core::i18n::Message;
use kismet_core::payload::{SubmissionPayload, ZeroIdPolicy};
use kismet_core::steps::{clamp_step, ProfileStep, TOTAL_STEPS};
use kismet_core::validation::{cross_field, ProfileSchema, ValidationResult};
use kismet_core::FormDraft;
use kismet_store::{DraftStore, DraftWriter};

use crate::config::WizardConfig;
use crate::context::AppContext;
use crate::error::EngineError;
use crate::presentation::{ErrorNotice, ErrorPanel, NoticeKind};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Shown when validation fails without a specific message.
pub const FILL_REQUIRED: Message = Message::new(
    "profile.errors.fill_required",
    "Please fill in all required fields correctly",
);

/// Shown for any submission failure that is not field validation.
pub const SUBMIT_FAILED: Message = Message::new(
    "profile.errors.submit_failed",
    "Failed to update profile. Please try again.",
);

const IMAGE_UNREADABLE: Message =
    Message::new("profile.photo.unreadable", "Could not read the selected image");
const IMAGE_UNSUPPORTED: Message = Message::new(
    "profile.photo.unsupported",
    "Please choose a JPEG, PNG or WebP image",
);
const IMAGE_TOO_LARGE: Message =
    Message::new("profile.photo.too_large", "The selected image is too large");
const IMAGE_UPLOAD_FAILED: Message =
    Message::new("profile.photo.upload_failed", "Failed to upload profile photo");

/// Type assumed for avatars whose URL has no recognizable extension.
const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

// ---------------------------------------------------------------------------
// States and outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    Loading,
    Editing(ProfileStep),
    /// A submission started from `from` is in flight.
    Submitting { from: ProfileStep },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Validation passed; now on this step.
    Moved(ProfileStep),
    /// Validation failed; the step did not change.
    Blocked { messages: Vec<String> },
    /// The last step passed validation and a submission ran.
    Submitted(SubmitOutcome),
    /// Not editing, nothing happened.
    Ignored,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Profile saved. `photo_error` is set when the photo upload failed.
    Completed { photo_error: Option<String> },
    /// Client-side validation failed; nothing was sent.
    Invalid { messages: Vec<String> },
    /// The server rejected the data (HTTP 422).
    Rejected { messages: Vec<String> },
    /// Any other failure.
    Failed { message: String },
    /// Another submission is still running.
    InFlight,
    /// Not editing, nothing happened.
    Ignored,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct FormEngine {
    ctx: Arc<AppContext>,
    api: Arc<dyn ProfileApi>,
    store: DraftStore,
    schema: ProfileSchema,
    draft_ttl: chrono::Duration,
    max_image_bytes: u64,
    zero_id_policy: ZeroIdPolicy,

    phase: EnginePhase,
    draft: FormDraft,
    errors: ValidationResult,
    panel: ErrorPanel,
    image_error: Option<String>,
    fade_generation: u64,
    scroll_to_top: bool,
    writer: Option<DraftWriter>,
}

impl FormEngine {
    pub fn new(
        ctx: Arc<AppContext>,
        api: Arc<dyn ProfileApi>,
        store: DraftStore,
        config: &WizardConfig,
    ) -> Self {
        Self {
            ctx,
            api,
            store,
            schema: ProfileSchema::new(),
            draft_ttl: config.draft_ttl(),
            max_image_bytes: config.max_image_bytes,
            zero_id_policy: config.zero_id_policy,
            phase: EnginePhase::Loading,
            draft: FormDraft::default(),
            errors: ValidationResult::valid(),
            panel: ErrorPanel::default(),
            image_error: None,
            fade_generation: 0,
            scroll_to_top: false,
            writer: None,
        }
    }

    // ---- accessors ----

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// The step being edited, or the one a running submission started from.
    pub fn current_step(&self) -> Option<ProfileStep> {
        match self.phase {
            EnginePhase::Editing(step) | EnginePhase::Submitting { from: step } => Some(step),
            EnginePhase::Loading | EnginePhase::Done => None,
        }
    }

    /// `(current step number, total steps)` for a progress indicator.
    pub fn progress(&self) -> Option<(u8, u8)> {
        self.current_step().map(|s| (s.to_number(), TOTAL_STEPS))
    }

    /// Localized title and description of the current step.
    pub fn step_heading(&self) -> Option<(String, String)> {
        let descriptor = self.current_step()?.descriptor();
        let t = self.ctx.translator();
        Some((descriptor.title.resolve(t), descriptor.description.resolve(t)))
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    /// Field errors from the last failed validation.
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn error_panel(&self) -> &ErrorPanel {
        &self.panel
    }

    pub fn dismiss_errors(&mut self) {
        self.panel.dismiss();
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, EnginePhase::Submitting { .. })
    }

    pub fn is_done(&self) -> bool {
        self.phase == EnginePhase::Done
    }

    pub fn is_rtl(&self) -> bool {
        self.ctx.translator().is_rtl()
    }

    pub fn image_error(&self) -> Option<&str> {
        self.image_error.as_deref()
    }

    pub fn clear_image_error(&mut self) {
        self.image_error = None;
    }

    /// Incremented on every step change so the view can restart its fade-in.
    pub fn fade_generation(&self) -> u64 {
        self.fade_generation
    }

    /// Whether the view should scroll to the top. Reading resets the request.
    pub fn take_scroll_to_top(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_top)
    }

    // ---- lifecycle ----

    /// Restore a fresh saved draft or start over, then enter `Editing`.
    pub async fn initialize(&mut self) {
        self.phase = EnginePhase::Loading;
        let user_id = self.ctx.user_id().map(str::to_string);

        let (step, draft) = match self.store.load(user_id.as_deref()).await {
            Some(record) if record.is_fresh(Utc::now(), self.draft_ttl) => {
                let step = clamp_step(record.step);
                tracing::info!(
                    user_id = user_id.as_deref().unwrap_or_default(),
                    step = step.to_number(),
                    "Resuming saved profile draft"
                );
                (step, record.form_data)
            }
            Some(record) => {
                tracing::info!(
                    user_id = user_id.as_deref().unwrap_or_default(),
                    age_hours = record.age(Utc::now()).num_hours(),
                    "Discarding stale profile draft"
                );
                self.store.clear(user_id.as_deref()).await;
                (ProfileStep::Personal, self.default_draft().await)
            }
            None => (ProfileStep::Personal, self.default_draft().await),
        };

        self.draft = draft;
        self.errors = ValidationResult::valid();
        self.panel.dismiss();
        self.image_error = None;

        if let Some(user_id) = user_id {
            if self.writer.is_none() {
                self.writer = Some(DraftWriter::spawn(self.store.clone(), user_id));
            }
        }
        self.phase = EnginePhase::Editing(step);
    }

    /// Wait until every queued draft write has landed.
    pub async fn flush_draft(&self) {
        if let Some(writer) = &self.writer {
            writer.flush().await;
        }
    }

    /// Write any pending draft and stop the background writer.
    pub async fn shutdown(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.shutdown().await;
        }
    }

    async fn default_draft(&self) -> FormDraft {
        let profile_image = self
            .ctx
            .avatar_url()
            .await
            .map(|url| ProfileImage::new(url.clone(), mime_for_url(&url)));
        FormDraft {
            profile_image,
            ..Default::default()
        }
    }

    // ---- field mutation ----

    /// Apply `edit` to the draft.
    pub fn update(&mut self, edit: impl FnOnce(&mut FormDraft)) -> Result<(), EngineError> {
        self.ensure_editing()?;
        edit(&mut self.draft);
        self.persist();
        Ok(())
    }

    /// Set one field by name, clearing its previous error.
    pub fn set_value(&mut self, field: &str, value: serde_json::Value) -> Result<(), EngineError> {
        self.ensure_editing()?;
        self.draft.set_value(field, value)?;
        self.errors.errors.retain(|v| v.field != field);
        self.errors.is_valid = self.errors.errors.is_empty();
        self.persist();
        Ok(())
    }

    // ---- navigation ----

    /// Validate the current step and move forward, or submit from the last step.
    pub async fn advance(&mut self) -> AdvanceOutcome {
        let EnginePhase::Editing(step) = self.phase else {
            return AdvanceOutcome::Ignored;
        };

        let mut result = self.validate_step(step);
        if step.is_last() {
            result.extend(self.validate_full().errors);
        }

        if !result.is_valid {
            let messages = self.surface_validation(&result);
            tracing::debug!(step = step.to_number(), failures = result.errors.len(), "Step blocked");
            self.persist();
            return AdvanceOutcome::Blocked { messages };
        }

        self.errors = ValidationResult::valid();
        self.panel.dismiss();

        if step.is_last() {
            self.persist();
            return AdvanceOutcome::Submitted(self.submit().await);
        }

        let next = step.next();
        self.enter_step(next);
        self.persist();
        tracing::debug!(from = step.to_number(), to = next.to_number(), "Advanced");
        AdvanceOutcome::Moved(next)
    }

    /// Go back one step without validating.
    pub fn retreat(&mut self) -> Option<ProfileStep> {
        let EnginePhase::Editing(step) = self.phase else {
            return None;
        };
        let previous = step.previous();
        if previous != step {
            self.enter_step(previous);
        }
        self.panel.dismiss();
        self.persist();
        Some(previous)
    }

    fn enter_step(&mut self, step: ProfileStep) {
        self.phase = EnginePhase::Editing(step);
        self.fade_generation += 1;
        self.scroll_to_top = true;
    }

    // ---- submission ----

    /// Validate everything and send the profile.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let from = match self.phase {
            EnginePhase::Editing(step) => step,
            EnginePhase::Submitting { .. } => {
                tracing::warn!("Submission already in flight");
                return SubmitOutcome::InFlight;
            }
            EnginePhase::Loading | EnginePhase::Done => return SubmitOutcome::Ignored,
        };

        let result = self.validate_full();
        if !result.is_valid {
            let messages = self.surface_validation(&result);
            return SubmitOutcome::Invalid { messages };
        }
        self.errors = ValidationResult::valid();
        self.panel.dismiss();

        let payload = SubmissionPayload::from_draft(&self.draft, self.zero_id_policy);
        self.phase = EnginePhase::Submitting { from };
        tracing::info!(user_id = self.ctx.user_id().unwrap_or_default(), "Submitting profile");

        match self.api.update_profile(&payload).await {
            Ok(()) => self.complete().await,
            Err(e) => {
                tracing::warn!(error = %e, "Profile submission failed");
                self.phase = EnginePhase::Editing(from);
                self.surface_submit_error(&e)
            }
        }
    }

    async fn complete(&mut self) -> SubmitOutcome {
        let photo_error = self.upload_photo().await;

        self.shutdown().await;
        self.store.clear(self.ctx.user_id()).await;

        match self.api.fetch_profile().await {
            Ok(profile) => self.ctx.set_profile(profile).await,
            Err(e) => tracing::warn!(error = %e, "Failed to refresh profile after submission"),
        }

        self.phase = EnginePhase::Done;
        tracing::info!(user_id = self.ctx.user_id().unwrap_or_default(), "Profile completed");
        SubmitOutcome::Completed { photo_error }
    }

    /// Upload a photo picked on this device. Remote avatars are skipped.
    async fn upload_photo(&mut self) -> Option<String> {
        let image = self.draft.profile_image.clone()?;
        let path = image.local_path()?;

        let upload = match tokio::fs::read(path).await {
            Ok(bytes) => PhotoUpload::multipart(bytes, file_name(path), image.mime_type.clone()),
            Err(e) => {
                tracing::warn!(error = %e, path, "Failed to read profile photo for upload");
                return Some(self.set_image_error(IMAGE_UPLOAD_FAILED));
            }
        };

        match self.api.update_profile_photo(upload).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Profile photo upload failed");
                Some(self.set_image_error(IMAGE_UPLOAD_FAILED))
            }
        }
    }

    fn surface_submit_error(&mut self, error: &ApiError) -> SubmitOutcome {
        let t = self.ctx.translator();
        let field_messages = error.field_messages();

        if error.is_validation() {
            let messages = if field_messages.is_empty() {
                vec![FILL_REQUIRED.resolve(t)]
            } else {
                field_messages
            };
            self.panel
                .show(ErrorNotice::new(NoticeKind::Validation, messages.clone()));
            return SubmitOutcome::Rejected { messages };
        }

        let message = SUBMIT_FAILED.resolve(t);
        self.panel
            .show(ErrorNotice::new(NoticeKind::Submission, vec![message.clone()]));
        SubmitOutcome::Failed { message }
    }

    // ---- validation ----

    fn validate_step(&self, step: ProfileStep) -> ValidationResult {
        let t = self.ctx.translator();
        let mut result = self.schema.trigger(&self.draft, step.owned_fields(), t);
        result.extend(cross_field::step_checks(
            step,
            &self.draft,
            Utc::now().date_naive(),
            t,
        ));
        result
    }

    fn validate_full(&self) -> ValidationResult {
        let t = self.ctx.translator();
        let mut result = self.schema.validate_all(&self.draft, t);
        result.extend(cross_field::all_checks(&self.draft, Utc::now().date_naive(), t));
        result
    }

    /// Record `result` and show its messages, falling back to a generic one.
    fn surface_validation(&mut self, result: &ValidationResult) -> Vec<String> {
        let mut messages = result.messages();
        if messages.is_empty() {
            messages.push(FILL_REQUIRED.resolve(self.ctx.translator()));
        }
        self.errors = result.clone();
        self.panel
            .show(ErrorNotice::new(NoticeKind::Validation, messages.clone()));
        messages
    }

    // ---- profile photo ----

    /// Use the image at `path` as the profile photo.
    ///
    /// Only JPEG, PNG and WebP files within the configured size are accepted.
    /// On failure the photo is left unchanged and a localized message is
    /// available from [`FormEngine::image_error`].
    pub async fn select_image(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        self.ensure_editing()?;
        let path = path.as_ref();

        match self.inspect_image(path).await {
            Ok(mime_type) => {
                self.image_error = None;
                self.draft.profile_image = Some(ProfileImage::new(
                    format!("file://{}", path.display()),
                    mime_type,
                ));
                self.persist();
                Ok(())
            }
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "Rejected profile photo");
                let message = match &e {
                    EngineError::ImageTooLarge { .. } => IMAGE_TOO_LARGE,
                    EngineError::UnsupportedImage => IMAGE_UNSUPPORTED,
                    _ => IMAGE_UNREADABLE,
                };
                self.set_image_error(message);
                Err(e)
            }
        }
    }

    async fn inspect_image(&self, path: &Path) -> Result<&'static str, EngineError> {
        let read_error = |source| EngineError::ImageRead {
            path: path.to_path_buf(),
            source,
        };

        let size = tokio::fs::metadata(path).await.map_err(read_error)?.len();
        if size > self.max_image_bytes {
            return Err(EngineError::ImageTooLarge {
                size,
                limit: self.max_image_bytes,
            });
        }

        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        match image::guess_format(&bytes) {
            Ok(format @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => {
                Ok(format.to_mime_type())
            }
            _ => Err(EngineError::UnsupportedImage),
        }
    }

    fn set_image_error(&mut self, message: Message) -> String {
        let text = message.resolve(self.ctx.translator());
        self.image_error = Some(text.clone());
        text
    }

    // ---- helpers ----

    fn ensure_editing(&self) -> Result<(), EngineError> {
        match self.phase {
            EnginePhase::Editing(_) => Ok(()),
            EnginePhase::Loading => Err(EngineError::WrongPhase("loading")),
            EnginePhase::Submitting { .. } => Err(EngineError::WrongPhase("submitting")),
            EnginePhase::Done => Err(EngineError::WrongPhase("done")),
        }
    }

    fn persist(&self) {
        if let (Some(writer), Some(step)) = (&self.writer, self.current_step()) {
            writer.enqueue(step.to_number(), self.draft.clone());
        }
    }
}

/// MIME type implied by a URL's file extension.
fn mime_for_url(url: &str) -> &'static str {
    let path = url.split(&['?', '#'][..]).next().unwrap_or(url);
    ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or(DEFAULT_IMAGE_MIME)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo")
        .to_string()
}
