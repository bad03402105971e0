use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::FormField;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationReason {
    Missing,
    MalformedEmail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub reason: ValidationReason,
}

impl FieldError {
    pub fn new(field: FormField, reason: ValidationReason) -> Self {
        Self { field, reason }
    }

    pub fn message(&self) -> String {
        match self.reason {
            ValidationReason::Missing => format!("{} is required", self.field.label()),
            ValidationReason::MalformedEmail => {
                format!("{} must be a valid email address", self.field.label())
            }
        }
    }
}

/// One or more required fields failed local checks; nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "validation failed: {}",
    .errors.iter().map(FieldError::message).collect::<Vec<_>>().join("; ")
)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.iter().map(|error| error.field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.fields().any(|candidate| candidate == field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{filename} is {size_bytes} bytes, over the {limit_bytes} byte limit")]
pub struct FileTooLarge {
    pub filename: String,
    pub size_bytes: u64,
    pub limit_bytes: u64,
}

impl FileTooLarge {
    pub fn user_message(&self) -> String {
        format!(
            "File size is too large. Maximum size allowed is {}MB.",
            self.limit_bytes / (1024 * 1024)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IMAGE_HARD_CAP_BYTES;

    #[test]
    fn file_too_large_alert_names_the_limit_in_megabytes() {
        let err = FileTooLarge {
            filename: "huge.jpg".into(),
            size_bytes: 150 * 1024 * 1024,
            limit_bytes: IMAGE_HARD_CAP_BYTES,
        };
        assert_eq!(
            err.user_message(),
            "File size is too large. Maximum size allowed is 100MB."
        );
    }

    #[test]
    fn validation_failure_lists_every_field() {
        let failure = ValidationFailure {
            errors: vec![
                FieldError::new(FormField::Name, ValidationReason::Missing),
                FieldError::new(FormField::Email, ValidationReason::MalformedEmail),
            ],
        };
        assert!(failure.contains(FormField::Email));
        assert!(!failure.contains(FormField::Room));
        assert_eq!(
            failure.to_string(),
            "validation failed: Full Name is required; Email Address must be a valid email address"
        );
    }
}
