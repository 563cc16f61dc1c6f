//! crates/assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete HTTP client used to reach the
//! backend AI service.

use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// The three variants mirror the ways a backend call can fail: the request
/// never completed, the backend answered with a non-200 status, or the body
/// could not be parsed as the expected JSON.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Request to the backend failed: {0}")]
    Transport(String),
    /// The backend's response body is surfaced verbatim as the error text.
    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed backend response: {0}")]
    Malformed(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Request / Response Payloads
//=========================================================================================

/// A file handed to the backend for ingestion.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// One question for the backend, scoped to the given uploaded documents.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub question: String,
    pub document_ids: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl QueryRequest {
    /// Builds a request with the stock generation parameters
    /// (1000 tokens, temperature 0.7).
    pub fn new(question: impl Into<String>, document_ids: Vec<String>) -> Self {
        Self {
            question: question.into(),
            document_ids,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// The backend's answer to a query. Both fields default to empty when the
/// backend omits them; substituting user-facing fallback text is the web
/// layer's job, not the port's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOutcome {
    pub response: String,
    pub sources: Vec<String>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The backend AI service, reachable only through its two HTTP endpoints.
///
/// Implementations must not retry automatically: every failure is terminal
/// for that single user action.
#[async_trait]
pub trait AssistantBackend: Send + Sync {
    /// Uploads a document for later retrieval and returns its
    /// backend-assigned id. An HTTP 200 with no `document_id` field yields
    /// an empty string, which callers treat as a failed upload.
    async fn upload_document(&self, upload: DocumentUpload) -> PortResult<String>;

    /// Answers a question against the uploaded documents.
    async fn query(&self, request: QueryRequest) -> PortResult<QueryOutcome>;
}
