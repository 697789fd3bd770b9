//! Remote document backend.
//!
//! The backend exposes exactly two operations: a multipart file upload that
//! returns a file id, and a JSON query against a previously uploaded file
//! that returns an answer. Both are modeled behind [`DocumentBackend`] so
//! session logic can be driven by a scripted backend in tests.

mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use http::HttpBackend;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend error {status}: {body}")]
    Backend { status: u16, body: String },
    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait DocumentBackend {
    /// Uploads the raw file and returns the id the backend assigned to it.
    async fn upload(&self, name: &str, media_type: &str, data: Vec<u8>) -> ApiResult<String>;

    /// Asks a question against an uploaded file and returns the answer text.
    async fn query(&self, file_id: &str, question: &str) -> ApiResult<String>;
}
