use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, DocumentBackend};
use crate::util::format_file_size;

/// Media types the backend can ingest: PDF, plain text, and the two Word
/// document formats.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] = [
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// A raw file as produced by whatever picker sits above this layer.
#[derive(Clone, Debug)]
pub struct FileHandle {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// The single active upload candidate. `id` stays empty until the backend
/// assigns one; `uploaded == true` implies `id` is non-empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileSession {
    pub id: String,
    pub name: String,
    pub size: String,
    pub media_type: String,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub uploaded: bool,
}

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("unsupported file type: {0}. Please upload PDF, DOCX or TXT.")]
    UnsupportedType(String),
    #[error("an upload is already in progress")]
    UploadInFlight,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFile,
    #[error("file already uploaded")]
    AlreadyUploaded,
    #[error("an upload is already in progress")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The payload `begin_upload` hands to the driver for the remote call.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Lifecycle of exactly one candidate file:
/// empty -> selected -> uploading -> uploaded, with selected -> empty via
/// `remove` or replacement and uploading -> selected on failure (retryable).
#[derive(Debug, Default)]
pub struct UploadSession {
    file: Option<FileSession>,
    in_flight: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(&self) -> Option<&FileSession> {
        self.file.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    /// The id to query against, present once the upload succeeded.
    pub fn file_id(&self) -> Option<&str> {
        self.file
            .as_ref()
            .filter(|f| f.uploaded)
            .map(|f| f.id.as_str())
    }

    /// Validates the handle and makes it the active candidate, discarding any
    /// previous one. Rejection leaves the session untouched.
    pub fn select(&mut self, handle: FileHandle) -> Result<(), SelectError> {
        if self.in_flight {
            return Err(SelectError::UploadInFlight);
        }
        if !ACCEPTED_MEDIA_TYPES.contains(&handle.media_type.as_str()) {
            warn!(media_type = %handle.media_type, "rejected file selection");
            return Err(SelectError::UnsupportedType(handle.media_type));
        }
        info!(name = %handle.name, bytes = handle.data.len(), "file selected");
        self.file = Some(FileSession {
            id: String::new(),
            size: format_file_size(handle.data.len() as u64),
            name: handle.name,
            media_type: handle.media_type,
            data: handle.data,
            uploaded: false,
        });
        Ok(())
    }

    /// Clears the candidate; no-op when there is none. Refused mid-upload so
    /// the in-flight request keeps a consistent session to settle into.
    pub fn remove(&mut self) -> Result<(), SelectError> {
        if self.in_flight {
            return Err(SelectError::UploadInFlight);
        }
        self.file = None;
        Ok(())
    }

    /// Starts an upload, returning the request payload to send. Returns
    /// `None` when there is nothing to do: no file, already uploaded, or an
    /// upload already in flight (rapid repeated calls issue one request).
    pub fn begin_upload(&mut self) -> Option<UploadRequest> {
        let file = self.file.as_ref()?;
        if file.uploaded || self.in_flight {
            return None;
        }
        self.in_flight = true;
        Some(UploadRequest {
            name: file.name.clone(),
            media_type: file.media_type.clone(),
            data: file.data.clone(),
        })
    }

    /// Settles the in-flight upload. Success stores the assigned id and marks
    /// the session uploaded; failure reverts to the selected state so the
    /// same candidate can be retried. An empty id counts as failure: the
    /// session never reports uploaded without an id to query against.
    pub fn finish_upload(&mut self, outcome: Result<String, ApiError>) -> Result<(), UploadError> {
        self.in_flight = false;
        match outcome {
            Ok(file_id) if file_id.is_empty() => {
                warn!("upload response carried no file id");
                Err(UploadError::Api(ApiError::MalformedBody(
                    "empty file_id".to_string(),
                )))
            }
            Ok(file_id) => {
                if let Some(file) = self.file.as_mut() {
                    info!(%file_id, name = %file.name, "upload complete");
                    file.id = file_id;
                    file.uploaded = true;
                }
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "upload failed");
                Err(UploadError::Api(err))
            }
        }
    }

    /// Drives a full upload against the backend and returns the assigned id.
    pub async fn upload(&mut self, backend: &dyn DocumentBackend) -> Result<String, UploadError> {
        let request = match self.begin_upload() {
            Some(request) => request,
            None if self.file.is_none() => return Err(UploadError::NoFile),
            None if self.in_flight => return Err(UploadError::InFlight),
            None => return Err(UploadError::AlreadyUploaded),
        };
        let outcome = backend
            .upload(&request.name, &request.media_type, request.data)
            .await;
        self.finish_upload(outcome)?;
        Ok(self
            .file_id()
            .unwrap_or_default()
            .to_string())
    }
}
