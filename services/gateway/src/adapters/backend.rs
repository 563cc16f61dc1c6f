//! services/gateway/src/adapters/backend.rs
//!
//! This module contains the adapter for the backend AI service.
//! It implements the `AssistantBackend` port from the `core` crate over the
//! service's two raw HTTP endpoints.

use crate::config::Config;
use assistant_core::ports::{
    AssistantBackend, DocumentUpload, PortError, PortResult, QueryOutcome, QueryRequest,
};
use async_trait::async_trait;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `AssistantBackend` against the deployment's
/// HTTP API. Every request carries the configured bearer token; failures are
/// never retried here.
#[derive(Clone)]
pub struct HttpBackendAdapter {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment_id: String,
}

impl HttpBackendAdapter {
    /// Creates a new adapter. A trailing slash on the endpoint is tolerated.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment_id: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            deployment_id: deployment_id.into(),
        }
    }

    /// Creates an adapter wired to the deployment described by `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.api_endpoint.as_str(),
            config.api_key.as_str(),
            config.deployment_id.as_str(),
        )
    }

    /// Passes through an HTTP 200 response; anything else becomes a
    /// `PortError::Status` carrying the body text verbatim.
    async fn expect_ok(response: Response) -> PortResult<Response> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response
                .text()
                .await
                .map_err(|e| PortError::Transport(e.to_string()))?;
            return Err(PortError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

//=========================================================================================
// Wire Format (private to this adapter)
//=========================================================================================

#[derive(Serialize)]
struct QueryRequestBody<'a> {
    query: &'a str,
    deployment_id: &'a str,
    document_ids: &'a [String],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct UploadResponseBody {
    #[serde(default)]
    document_id: String,
}

#[derive(Deserialize)]
struct QueryResponseBody {
    #[serde(default)]
    response: String,
    #[serde(default)]
    sources: Vec<String>,
}

//=========================================================================================
// `AssistantBackend` Trait Implementation
//=========================================================================================

#[async_trait]
impl AssistantBackend for HttpBackendAdapter {
    /// Sends a multipart upload request and returns the backend-assigned
    /// document id (empty when the backend omits the field).
    async fn upload_document(&self, upload: DocumentUpload) -> PortResult<String> {
        debug!(
            "Uploading '{}' ({} bytes) to the backend",
            upload.file_name,
            upload.bytes.len()
        );

        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)
            .map_err(|e| PortError::Transport(format!("invalid mime type: {}", e)))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("deployment_id", self.deployment_id.clone());

        let response = self
            .client
            .post(format!("{}/documents/upload", self.endpoint))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let body: UploadResponseBody = Self::expect_ok(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;
        Ok(body.document_id)
    }

    /// Sends one question, scoped to the given document ids, and returns the
    /// parsed answer. Absent `response`/`sources` fields default to empty.
    async fn query(&self, request: QueryRequest) -> PortResult<QueryOutcome> {
        debug!(
            "Querying the backend with {} document(s) in scope",
            request.document_ids.len()
        );

        let body = QueryRequestBody {
            query: &request.question,
            deployment_id: &self.deployment_id,
            document_ids: &request.document_ids,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/ai/query", self.endpoint))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.to_string()))?;

        let body: QueryResponseBody = Self::expect_ok(response)
            .await?
            .json()
            .await
            .map_err(|e| PortError::Malformed(e.to_string()))?;
        Ok(QueryOutcome {
            response: body.response,
            sources: body.sources,
        })
    }
}
