//! Turns a form snapshot into the multipart body sent to the complaint endpoint.

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use shared::{
    domain::{AttachmentSource, FormField, FormState, ImageAttachment},
    protocol::IMAGE_PART_NAME,
};

use crate::error::TransportError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    pub fields: Vec<(FormField, String)>,
    pub image: Option<ImagePart>,
}

impl SubmissionPayload {
    /// Part names in the order they are written to the body.
    pub fn part_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.fields.iter().map(|(field, _)| field.as_str()).collect();
        if self.image.is_some() {
            names.push(IMAGE_PART_NAME);
        }
        names
    }

    pub fn value(&self, field: FormField) -> Option<&str> {
        self.fields
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn into_multipart(self) -> Form {
        let mut form = Form::new();
        for (field, value) in self.fields {
            form = form.text(field.as_str(), value);
        }

        if let Some(image) = self.image {
            let length = image.bytes.len() as u64;
            let part = Part::stream_with_length(image.bytes.clone(), length)
                .file_name(image.filename.clone());
            let part = match part.mime_str(&image.mime_type) {
                Ok(part) => part,
                Err(err) => {
                    tracing::warn!(
                        mime_type = %image.mime_type,
                        error = %err,
                        "sending attachment without content type"
                    );
                    Part::stream_with_length(image.bytes, length).file_name(image.filename)
                }
            };
            form = form.part(IMAGE_PART_NAME, part);
        }

        form
    }
}

/// Non-empty text fields, in form order. Values are sent as entered, except the email,
/// which is trimmed the same way an email input sanitizes its value.
pub fn field_parts(form: &FormState) -> Vec<(FormField, String)> {
    FormField::ALL
        .into_iter()
        .filter_map(|field| {
            let value = match field {
                FormField::Email => form.field(field).trim(),
                _ => form.field(field),
            };
            (!value.is_empty()).then(|| (field, value.to_string()))
        })
        .collect()
}

pub async fn build_payload(form: &FormState) -> Result<SubmissionPayload, TransportError> {
    let image = match &form.image {
        Some(attachment) => Some(load_image(attachment).await?),
        None => None,
    };

    Ok(SubmissionPayload {
        fields: field_parts(form),
        image,
    })
}

async fn load_image(attachment: &ImageAttachment) -> Result<ImagePart, TransportError> {
    let bytes = match attachment.source() {
        AttachmentSource::Memory(bytes) => bytes.clone(),
        AttachmentSource::File(path) => {
            tokio::fs::read(path)
                .await
                .map_err(|e| TransportError::Attachment {
                    filename: attachment.filename().to_string(),
                    reason: e.to_string(),
                })?
                .into()
        }
    };

    Ok(ImagePart {
        filename: attachment.filename().to_string(),
        mime_type: attachment.mime_type().to_string(),
        bytes,
    })
}

#[cfg(test)]
#[path = "tests/payload_tests.rs"]
mod tests;
