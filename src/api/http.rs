use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult, DocumentBackend};

pub struct HttpBackend {
    client: Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    file_id: &'a str,
    question: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    file_id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    answer: String,
}

pub fn parse_upload_body(body: &str) -> ApiResult<String> {
    let parsed = serde_json::from_str::<UploadResponse>(body)
        .map_err(|err| ApiError::MalformedBody(err.to_string()))?;
    if parsed.file_id.is_empty() {
        return Err(ApiError::MalformedBody("empty file_id".to_string()));
    }
    Ok(parsed.file_id)
}

pub fn parse_query_body(body: &str) -> ApiResult<String> {
    serde_json::from_str::<QueryResponse>(body)
        .map(|parsed| parsed.answer)
        .map_err(|err| ApiError::MalformedBody(err.to_string()))
}

#[async_trait]
impl DocumentBackend for HttpBackend {
    async fn upload(&self, name: &str, media_type: &str, data: Vec<u8>) -> ApiResult<String> {
        let part = Part::bytes(data)
            .file_name(name.to_string())
            .mime_str(media_type)
            .map_err(ApiError::Http)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.endpoint))
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            parse_upload_body(&body)
        } else {
            Err(ApiError::Backend {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn query(&self, file_id: &str, question: &str) -> ApiResult<String> {
        let response = self
            .client
            .post(format!("{}/query", self.endpoint))
            .json(&QueryRequest { file_id, question })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            parse_query_body(&body)
        } else {
            Err(ApiError::Backend {
                status: status.as_u16(),
                body,
            })
        }
    }
}
