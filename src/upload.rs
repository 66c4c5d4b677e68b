//! Inputs handed over by the form collaborator.
//!
//! A submission is captured as a [`StampRequest`] and passed by value into
//! [`pipeline::run`](crate::pipeline::run). Nothing here is mutated by the
//! pipeline; the request is consumed and discarded once the artifact exists.

use crate::assets::WatermarkVariant;
use std::path::PathBuf;
use thiserror::Error;

/// Where the uploaded photo bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    /// Already in memory (e.g. received over the wire).
    Bytes(Vec<u8>),
    /// A file on disk, read when the decoder runs.
    File(PathBuf),
}

/// The user's photo: an opaque payload plus its declared media type.
///
/// The media type is what the form reported; decoding sniffs the real
/// format from the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpload {
    pub source: PayloadSource,
    pub media_type: String,
}

impl RawUpload {
    pub fn from_bytes(bytes: Vec<u8>, media_type: impl Into<String>) -> Self {
        Self {
            source: PayloadSource::Bytes(bytes),
            media_type: media_type.into(),
        }
    }

    /// Reference a file, declaring its media type from the extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let media_type = image::ImageFormat::from_path(&path)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        Self {
            source: PayloadSource::File(path),
            media_type,
        }
    }

    /// Load the payload bytes. A file that cannot be read surfaces here.
    pub async fn read(self) -> std::io::Result<Vec<u8>> {
        match self.source {
            PayloadSource::Bytes(bytes) => Ok(bytes),
            PayloadSource::File(path) => tokio::fs::read(&path).await,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),
}

/// The three free-text fields the user typed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMetadata {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserMetadata {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Form-side checks: every field present, email roughly email-shaped.
    ///
    /// The pipeline never calls this; filename derivation is total.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.first_name.trim().is_empty() {
            return Err(MetadataError::Missing("first name"));
        }
        if self.last_name.trim().is_empty() {
            return Err(MetadataError::Missing("last name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(MetadataError::Missing("email"));
        }
        if !is_email_shaped(email) {
            return Err(MetadataError::InvalidEmail(email.to_string()));
        }
        Ok(())
    }
}

fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

/// One submission: everything the pipeline needs, passed by value.
#[derive(Debug, Clone)]
pub struct StampRequest {
    pub metadata: UserMetadata,
    pub photo: RawUpload,
    pub variant: WatermarkVariant,
}
