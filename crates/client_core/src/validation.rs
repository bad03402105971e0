use std::sync::LazyLock;

use regex::Regex;
use shared::{
    domain::{FormField, FormState},
    error::{FieldError, ValidationFailure, ValidationReason},
};

// Same shape browsers accept for `<input type="email">`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Checks every required field and collects all failures rather than stopping at the first.
pub fn validate(form: &FormState) -> Result<(), ValidationFailure> {
    let mut errors = Vec::new();

    for field in FormField::ALL {
        let value = form.field(field).trim();
        if field.is_required() && value.is_empty() {
            errors.push(FieldError::new(field, ValidationReason::Missing));
            continue;
        }
        if field == FormField::Email && !is_valid_email(value) {
            errors.push(FieldError::new(field, ValidationReason::MalformedEmail));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationFailure { errors })
    }
}
