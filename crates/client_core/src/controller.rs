use std::{io, sync::Arc};

use shared::{
    domain::{FormField, FormState, ImageAttachment},
    error::{FileTooLarge, UnknownField},
    protocol::SubmissionStatus,
};
use tracing::{info, warn};

use crate::{
    config::Settings,
    error::{ConfigError, SubmitError},
    escalation::{escalate, LinkOpener, MessagingChannel},
    payload::build_payload,
    session::{FormSession, SubmissionOutcome},
    transport::{ComplaintTransport, HttpComplaintTransport},
};

/// Owns the intake form and mediates between input events and the complaint endpoint.
pub struct SubmissionController {
    session: FormSession,
    transport: Arc<dyn ComplaintTransport>,
    messaging: MessagingChannel,
}

impl SubmissionController {
    pub fn new(transport: Arc<dyn ComplaintTransport>) -> Self {
        Self {
            session: FormSession::new(),
            transport,
            messaging: MessagingChannel::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let transport = HttpComplaintTransport::new(settings)?;
        Ok(Self::new(Arc::new(transport))
            .with_messaging_channel(MessagingChannel::from_settings(settings)))
    }

    pub fn with_messaging_channel(mut self, messaging: MessagingChannel) -> Self {
        self.messaging = messaging;
        self
    }

    pub fn form(&self) -> &FormState {
        self.session.form()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.session.status()
    }

    pub fn file_input_token(&self) -> u64 {
        self.session.file_input_token()
    }

    pub fn session(&self) -> &FormSession {
        &self.session
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        self.session.set_field(field, value);
    }

    pub fn update_field_by_name(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), UnknownField> {
        let field = name.parse::<FormField>()?;
        self.update_field(field, value);
        Ok(())
    }

    pub fn select_image(&mut self, image: Option<ImageAttachment>) -> Result<(), FileTooLarge> {
        let Some(image) = image else {
            self.session.clear_image();
            return Ok(());
        };

        let over_soft_cap = image.exceeds_soft_cap();
        let size_bytes = image.size_bytes();
        if let Err(rejected) = self.session.select_image(image) {
            warn!(
                size_bytes = rejected.size_bytes,
                limit_bytes = rejected.limit_bytes,
                "rejected oversized image"
            );
            return Err(rejected);
        }

        if over_soft_cap {
            warn!(size_bytes, "image is above the advisory size; suggest messaging instead");
        }
        Ok(())
    }

    /// Validates and enters `Pending`. The returned handle does not borrow the controller,
    /// so fields stay editable while it is in flight.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitError> {
        let form = self.session.request_submit().inspect_err(|err| {
            if let SubmitError::Validation(failure) = err {
                let fields: Vec<&str> = failure.fields().map(FormField::as_str).collect();
                info!(?fields, "submission blocked by validation");
            }
        })?;

        info!(
            has_image = form.image.is_some(),
            "submitting complaint"
        );
        Ok(PendingSubmission {
            form,
            transport: Arc::clone(&self.transport),
        })
    }

    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) -> SubmissionStatus {
        if let Some(err) = outcome.error() {
            warn!(error = %err, "complaint submission failed");
        }

        match self.session.settle(outcome) {
            Some(status) => {
                info!(?status, "complaint submission settled");
                status
            }
            None => {
                warn!("ignoring submission outcome with nothing pending");
                self.session.status()
            }
        }
    }

    pub async fn submit(&mut self) -> Result<SubmissionStatus, SubmitError> {
        let pending = self.begin_submission()?;
        let outcome = pending.send().await;
        Ok(self.finish_submission(outcome))
    }

    pub fn messaging_link(&self) -> String {
        self.messaging.link()
    }

    pub fn escalate_to_messaging(&self, opener: &dyn LinkOpener) -> io::Result<String> {
        escalate(&self.messaging, opener)
    }
}

/// A validated snapshot on its way to the endpoint.
pub struct PendingSubmission {
    form: FormState,
    transport: Arc<dyn ComplaintTransport>,
}

impl PendingSubmission {
    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub async fn send(self) -> SubmissionOutcome {
        let result = match build_payload(&self.form).await {
            Ok(payload) => self.transport.submit(payload).await,
            Err(err) => Err(err),
        };
        SubmissionOutcome::from(result)
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
