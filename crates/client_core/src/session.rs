//! Pure state machine behind the intake form: `(session, event) -> transition`.

use shared::{
    domain::{FormField, FormState, ImageAttachment, IMAGE_HARD_CAP_BYTES},
    error::FileTooLarge,
    protocol::SubmissionStatus,
};

use crate::{
    error::{SubmitError, TransportError},
    validation::validate,
};

/// Result of one network attempt, fed back into the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome(Result<(), TransportError>);

impl SubmissionOutcome {
    pub fn accepted() -> Self {
        Self(Ok(()))
    }

    pub fn failed(error: TransportError) -> Self {
        Self(Err(error))
    }

    /// For a `PendingSubmission` that was dropped without being sent.
    pub fn abandoned() -> Self {
        Self(Err(TransportError::Abandoned))
    }

    pub fn is_accepted(&self) -> bool {
        self.0.is_ok()
    }

    pub fn error(&self) -> Option<&TransportError> {
        self.0.as_ref().err()
    }
}

impl From<Result<(), TransportError>> for SubmissionOutcome {
    fn from(value: Result<(), TransportError>) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    FieldChanged { field: FormField, value: String },
    ImageSelected(Option<ImageAttachment>),
    SubmitRequested,
    SubmitSettled(SubmissionOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    FieldUpdated,
    ImageAccepted,
    ImageCleared,
    ImageRejected(FileTooLarge),
    /// Carries the snapshot that must be sent.
    SubmissionStarted(FormState),
    SubmitBlocked(SubmitError),
    Settled(SubmissionStatus),
    /// A settle arrived while nothing was pending.
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct FormSession {
    form: FormState,
    status: SubmissionStatus,
    file_input_token: u64,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// Changes whenever the presentation layer must clear its file input.
    pub fn file_input_token(&self) -> u64 {
        self.file_input_token
    }

    pub fn reduce(&mut self, event: FormEvent) -> Transition {
        match event {
            FormEvent::FieldChanged { field, value } => {
                self.set_field(field, value);
                Transition::FieldUpdated
            }
            FormEvent::ImageSelected(None) => {
                self.form.image = None;
                Transition::ImageCleared
            }
            FormEvent::ImageSelected(Some(image)) => match self.select_image(image) {
                Ok(()) => Transition::ImageAccepted,
                Err(rejected) => Transition::ImageRejected(rejected),
            },
            FormEvent::SubmitRequested => match self.request_submit() {
                Ok(snapshot) => Transition::SubmissionStarted(snapshot),
                Err(blocked) => Transition::SubmitBlocked(blocked),
            },
            FormEvent::SubmitSettled(outcome) => match self.settle(outcome) {
                Some(status) => Transition::Settled(status),
                None => Transition::Ignored,
            },
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    pub fn clear_image(&mut self) {
        self.form.image = None;
    }

    /// Hard gate: an oversized image never enters the form.
    pub fn select_image(&mut self, image: ImageAttachment) -> Result<(), FileTooLarge> {
        if image.exceeds_hard_cap() {
            self.bump_file_input_token();
            return Err(FileTooLarge {
                filename: image.filename().to_string(),
                size_bytes: image.size_bytes(),
                limit_bytes: IMAGE_HARD_CAP_BYTES,
            });
        }
        self.form.image = Some(image);
        Ok(())
    }

    /// Guards re-entrancy and validates before entering `Pending`.
    pub fn request_submit(&mut self) -> Result<FormState, SubmitError> {
        if self.status.is_pending() {
            return Err(SubmitError::AlreadyPending);
        }
        validate(&self.form)?;
        self.status = SubmissionStatus::Pending;
        Ok(self.form.clone())
    }

    /// Returns `None` when no submission is pending.
    pub fn settle(&mut self, outcome: SubmissionOutcome) -> Option<SubmissionStatus> {
        if !self.status.is_pending() {
            return None;
        }

        if outcome.is_accepted() {
            self.form = FormState::default();
            self.bump_file_input_token();
            self.status = SubmissionStatus::Success;
        } else {
            self.status = SubmissionStatus::Failure;
        }
        Some(self.status)
    }

    fn bump_file_input_token(&mut self) {
        self.file_input_token = self.file_input_token.wrapping_add(1);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
