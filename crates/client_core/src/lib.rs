//! Client side of the complaint intake form: form state, validation, attachment gating,
//! multipart submission and the messaging fallback.

pub mod config;
pub mod controller;
pub mod error;
pub mod escalation;
pub mod payload;
pub mod session;
pub mod transport;
pub mod validation;

pub use config::{load_settings, Settings};
pub use controller::{PendingSubmission, SubmissionController};
pub use error::{ConfigError, SubmitError, TransportError};
pub use escalation::{LinkOpener, MessagingChannel, NoopLinkOpener, SystemLinkOpener};
pub use payload::SubmissionPayload;
pub use session::{FormEvent, FormSession, SubmissionOutcome, Transition};
pub use transport::{ComplaintTransport, HttpComplaintTransport, MissingComplaintTransport};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
