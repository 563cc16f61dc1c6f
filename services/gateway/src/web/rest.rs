//! services/gateway/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. Each handler is one explicit
//! user action on a chat session: submit a question, upload files, remove a
//! document, clear the chat, export the history.

use crate::web::chat_turn::run_chat_turn;
use crate::web::state::{AppState, SessionState};
use assistant_core::domain::{ChatExport, DocumentDescriptor, Message, Role};
use assistant_core::ports::DocumentUpload;
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        create_session_handler,
        get_session_handler,
        delete_session_handler,
        post_message_handler,
        upload_documents_handler,
        remove_document_handler,
        clear_messages_handler,
        export_chat_handler,
    ),
    components(
        schemas(
            CreateSessionResponse,
            IndustryView,
            SessionSnapshot,
            MessageView,
            DocumentView,
            PostMessagePayload,
            ChatTurnResponse,
            UploadResponse,
            UploadError,
        )
    ),
    tags(
        (name = "Assistant Gateway API", description = "API endpoints for the document chat assistant.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The industry preset copy a client needs to render the page chrome.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct IndustryView {
    pub key: String,
    pub title: String,
    pub icon: String,
    pub placeholder: String,
    pub sample_questions: Vec<String>,
    pub document_types: Vec<String>,
}

/// The response payload sent after successfully creating a session.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub deployment_id: String,
    pub deployment_name: String,
    pub industry: IndustryView,
}

/// One chat message as rendered to the client. `sources` is omitted when
/// the message carries none.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageView {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl From<&Message> for MessageView {
    fn from(message: &Message) -> Self {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        Self {
            role: role.to_string(),
            content: message.content.clone(),
            timestamp: message.timestamp,
            sources: message.sources.clone(),
        }
    }
}

/// One uploaded-document descriptor as rendered to the client.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct DocumentView {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&DocumentDescriptor> for DocumentView {
    fn from(document: &DocumentDescriptor) -> Self {
        Self {
            id: document.id.clone(),
            name: document.name.clone(),
            mime_type: document.mime_type.clone(),
            size_bytes: document.size_bytes,
            uploaded_at: document.uploaded_at,
        }
    }
}

/// A full snapshot of a session, including the footer counters.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub messages: Vec<MessageView>,
    pub documents: Vec<DocumentView>,
    pub message_count: usize,
    pub document_count: usize,
    pub last_activity: Option<DateTime<Utc>>,
}

/// A submitted question. Generation parameters are optional and default to
/// the stock values (1000 tokens, temperature 0.7).
#[derive(Deserialize, Serialize, ToSchema)]
pub struct PostMessagePayload {
    pub content: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// What one chat turn appended: the user message and the assistant's reply.
/// `error` carries the backend failure notice when the reply is the
/// connectivity fallback.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatTurnResponse {
    pub messages: Vec<MessageView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A per-file upload failure notice.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UploadError {
    pub file_name: String,
    pub message: String,
}

/// The outcome of a multi-file upload: descriptors for the files the backend
/// accepted, and a notice for every file it did not.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub uploaded: Vec<DocumentView>,
    pub errors: Vec<UploadError>,
}

//=========================================================================================
// Handler Helpers
//=========================================================================================

/// Resolves a session id against the registry, mapping a miss to a 404.
async fn fetch_session(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<Arc<Mutex<SessionState>>, (StatusCode, String)> {
    app_state.sessions.get(session_id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("Unknown session: {}", session_id),
        )
    })
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Create a new chat session.
///
/// Returns the fresh session id along with the deployment identity and the
/// industry preset copy the client renders in its sidebar.
#[utoipa::path(
    post,
    path = "/sessions",
    responses(
        (status = 201, description = "Session created successfully", body = CreateSessionResponse)
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session_id = app_state.sessions.create().await;
    info!("Created chat session {}", session_id);

    let industry = app_state.industry;
    let response = CreateSessionResponse {
        session_id,
        deployment_id: app_state.config.deployment_id.clone(),
        deployment_name: app_state.config.deployment_name.clone(),
        industry: IndustryView {
            key: industry.key.to_string(),
            title: industry.title.to_string(),
            icon: industry.icon.to_string(),
            placeholder: industry.placeholder.to_string(),
            sample_questions: industry
                .sample_questions
                .iter()
                .map(|q| q.to_string())
                .collect(),
            document_types: industry
                .document_types
                .iter()
                .map(|t| t.to_string())
                .collect(),
        },
    };
    (StatusCode::CREATED, Json(response))
}

/// Fetch the current state of a session: message log, document list, and
/// the activity counters.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}",
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to inspect.")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = fetch_session(&app_state, session_id).await?;
    let session = session_lock.lock().await;

    let snapshot = SessionSnapshot {
        session_id,
        messages: session.messages().iter().map(MessageView::from).collect(),
        documents: session.documents().iter().map(DocumentView::from).collect(),
        message_count: session.messages().len(),
        document_count: session.documents().len(),
        last_activity: session.last_activity(),
    };
    Ok(Json(snapshot))
}

/// Close a session, dropping its state and cancelling any in-flight work.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}",
    responses(
        (status = 204, description = "Session closed"),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to close.")
    )
)]
pub async fn delete_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if app_state.sessions.remove(session_id).await {
        info!("Closed chat session {}", session_id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("Unknown session: {}", session_id),
        ))
    }
}

/// Submit a question and receive the appended message pair.
///
/// The backend is queried with every currently uploaded document in scope.
/// A backend failure still answers 200: the assistant message is the fixed
/// connectivity fallback and `error` carries the notice.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/messages",
    request_body = PostMessagePayload,
    responses(
        (status = 200, description = "The appended user/assistant message pair", body = ChatTurnResponse),
        (status = 400, description = "Empty message content"),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to post into.")
    )
)]
pub async fn post_message_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<PostMessagePayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.content.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Message content must not be empty".to_string(),
        ));
    }
    let session_lock = fetch_session(&app_state, session_id).await?;

    let outcome = run_chat_turn(
        &app_state,
        session_lock,
        payload.content,
        payload.max_tokens.unwrap_or(1000),
        payload.temperature.unwrap_or(0.7),
    )
    .await;

    let response = ChatTurnResponse {
        messages: vec![
            MessageView::from(&outcome.user_message),
            MessageView::from(&outcome.assistant_message),
        ],
        error: outcome.error,
    };
    Ok(Json(response))
}

/// Upload one or more documents for the backend to analyze.
///
/// Accepts a multipart/form-data request; files are forwarded to the backend
/// strictly one at a time, in field order. Files the backend rejects are
/// reported in `errors` and do not join the document list.
#[utoipa::path(
    post,
    path = "/sessions/{session_id}/documents",
    request_body(content_type = "multipart/form-data", description = "The documents to upload."),
    responses(
        (status = 200, description = "Uploaded descriptors plus per-file failure notices", body = UploadResponse),
        (status = 400, description = "Unreadable multipart body"),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to attach documents to.")
    )
)]
pub async fn upload_documents_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = fetch_session(&app_state, session_id).await?;
    // Held across the whole batch: uploads for one session are sequential.
    let mut session = session_lock.lock().await;

    let mut uploaded = Vec::new();
    let mut errors = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            // Non-file parts (stray form fields) are not uploads.
            None => continue,
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        let size_bytes = bytes.len() as u64;

        let upload = DocumentUpload {
            file_name: file_name.clone(),
            mime_type: mime_type.clone(),
            bytes: bytes.to_vec(),
        };
        match app_state.backend.upload_document(upload).await {
            Ok(document_id) if !document_id.is_empty() => {
                let descriptor = DocumentDescriptor {
                    name: file_name.clone(),
                    id: document_id.clone(),
                    mime_type,
                    size_bytes,
                    uploaded_at: Utc::now(),
                };
                if session.add_document(descriptor.clone()) {
                    info!(
                        "Uploaded '{}' as document {} for session {}",
                        file_name, document_id, session_id
                    );
                    uploaded.push(DocumentView::from(&descriptor));
                } else {
                    errors.push(UploadError {
                        file_name,
                        message: format!("Document {} is already in this session", document_id),
                    });
                }
            }
            Ok(_) => {
                errors.push(UploadError {
                    message: format!("Failed to upload '{}'", file_name),
                    file_name,
                });
            }
            Err(e) => {
                error!("Upload of '{}' failed for session {}: {}", file_name, session_id, e);
                errors.push(UploadError {
                    file_name,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(Json(UploadResponse { uploaded, errors }))
}

/// Remove an uploaded document from the session.
///
/// This only drops the client-side descriptor; no backend call is made and
/// the message log is untouched.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}/documents/{document_id}",
    responses(
        (status = 204, description = "Document removed"),
        (status = 404, description = "Unknown session or document id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session."),
        ("document_id" = String, Path, description = "The backend-assigned document id.")
    )
)]
pub async fn remove_document_handler(
    State(app_state): State<Arc<AppState>>,
    Path((session_id, document_id)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = fetch_session(&app_state, session_id).await?;
    let mut session = session_lock.lock().await;

    if session.remove_document(&document_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("Unknown document: {}", document_id),
        ))
    }
}

/// Clear the chat, emptying the message log. Uploaded documents remain.
#[utoipa::path(
    delete,
    path = "/sessions/{session_id}/messages",
    responses(
        (status = 204, description = "Message log cleared"),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to clear.")
    )
)]
pub async fn clear_messages_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = fetch_session(&app_state, session_id).await?;
    session_lock.lock().await.clear_messages();
    Ok(StatusCode::NO_CONTENT)
}

/// Download the chat history as a JSON document.
///
/// The response carries a `Content-Disposition` header naming the file
/// `chat_history_{deployment id prefix}_{timestamp}.json`.
#[utoipa::path(
    get,
    path = "/sessions/{session_id}/export",
    responses(
        (status = 200, description = "The chat-history export document"),
        (status = 404, description = "Unknown session id")
    ),
    params(
        ("session_id" = Uuid, Path, description = "The chat session to export.")
    )
)]
pub async fn export_chat_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_lock = fetch_session(&app_state, session_id).await?;
    let session = session_lock.lock().await;

    let export = ChatExport::new(
        app_state.config.deployment_id.as_str(),
        app_state.config.deployment_name.as_str(),
        app_state.config.industry_template.as_str(),
        session.messages(),
    );
    let disposition = format!("attachment; filename=\"{}\"", export.file_name());
    Ok((
        [(header::CONTENT_DISPOSITION, disposition)],
        Json(export),
    ))
}
