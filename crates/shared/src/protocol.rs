use serde::{Deserialize, Serialize};

pub const SUBMIT_COMPLAINT_PATH: &str = "/api/submit-complaint";
pub const HEALTH_PATH: &str = "/api/health";
pub const IMAGE_PART_NAME: &str = "image";

/// Outcome of the most recent submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failure,
}

impl SubmissionStatus {
    pub fn is_pending(self) -> bool {
        self == SubmissionStatus::Pending
    }

    pub fn user_message(self) -> Option<&'static str> {
        match self {
            SubmissionStatus::Idle => None,
            SubmissionStatus::Pending => Some("Submitting..."),
            SubmissionStatus::Success => Some(
                "Your complaint has been submitted successfully! We will get back to you soon.",
            ),
            SubmissionStatus::Failure => Some(
                "There was an error submitting your complaint. Please try again or contact us directly.",
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&SubmissionStatus::Failure).expect("serialize"),
            "\"failure\""
        );
        assert_eq!(SubmissionStatus::default(), SubmissionStatus::Idle);
    }

    #[test]
    fn idle_has_no_message() {
        assert!(SubmissionStatus::Idle.user_message().is_none());
        assert!(SubmissionStatus::Failure
            .user_message()
            .expect("message")
            .contains("try again"));
    }

    #[test]
    fn parses_health_payload() {
        let health: HealthResponse = serde_json::from_str(
            r#"{"status":"healthy","service":"Rose Villa Complaint System"}"#,
        )
        .expect("health");
        assert!(health.is_healthy());
    }
}
