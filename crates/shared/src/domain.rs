use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::UnknownField;

pub const IMAGE_HARD_CAP_BYTES: u64 = 100 * 1024 * 1024;
pub const IMAGE_SOFT_CAP_BYTES: u64 = 3 * 1024 * 1024;

pub const SOFT_CAP_ADVISORY: &str =
    "Upload images less than 3 MB only. If it's bigger than 3 MB, please use WhatsApp.";

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Phone,
    Floor,
    Room,
    Complaint,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Name,
        FormField::Email,
        FormField::Phone,
        FormField::Floor,
        FormField::Room,
        FormField::Complaint,
    ];

    /// Multipart part name for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Floor => "floor",
            FormField::Room => "room",
            FormField::Complaint => "complaint",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Full Name",
            FormField::Email => "Email Address",
            FormField::Phone => "Phone Number",
            FormField::Floor => "Floor Number",
            FormField::Room => "Room Number",
            FormField::Complaint => "Complaint Details",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::Phone)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == value)
            .ok_or_else(|| UnknownField(value.to_string()))
    }
}

/// Where the bytes of a selected image live until the payload is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    File(PathBuf),
    Memory(Bytes),
}

/// A selected image. Only metadata is held; file-backed content is read at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    filename: String,
    mime_type: String,
    size_bytes: u64,
    source: AttachmentSource,
}

impl ImageAttachment {
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self {
            mime_type: guess_mime_type(&filename),
            filename,
            size_bytes: metadata.len(),
            source: AttachmentSource::File(path.to_path_buf()),
        })
    }

    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        let bytes = bytes.into();
        Self {
            mime_type: guess_mime_type(&filename),
            filename,
            size_bytes: bytes.len() as u64,
            source: AttachmentSource::Memory(bytes),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn source(&self) -> &AttachmentSource {
        &self.source
    }

    pub fn exceeds_hard_cap(&self) -> bool {
        self.size_bytes > IMAGE_HARD_CAP_BYTES
    }

    pub fn exceeds_soft_cap(&self) -> bool {
        self.size_bytes > IMAGE_SOFT_CAP_BYTES
    }
}

fn guess_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string())
}

/// Everything the resident has entered so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub floor: String,
    pub room: String,
    pub complaint: String,
    pub image: Option<ImageAttachment>,
}

impl FormState {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::Floor => &self.floor,
            FormField::Room => &self.room,
            FormField::Complaint => &self.complaint,
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let slot = match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::Floor => &mut self.floor,
            FormField::Room => &mut self.room,
            FormField::Complaint => &mut self.complaint,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        self == &FormState::default()
    }
}
