//! services/gateway/src/web/state.rs
//!
//! Defines the application's shared and session-specific states.

use crate::config::Config;
use assistant_core::domain::{DocumentDescriptor, Message};
use assistant_core::industry::IndustryConfig;
use assistant_core::ports::AssistantBackend;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// The preset resolved from `INDUSTRY_TEMPLATE` at startup.
    pub industry: &'static IndustryConfig,
    pub backend: Arc<dyn AssistantBackend>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(config: Arc<Config>, backend: Arc<dyn AssistantBackend>) -> Self {
        let industry = IndustryConfig::for_template(&config.industry_template);
        Self {
            config,
            industry,
            backend,
            sessions: SessionRegistry::new(),
        }
    }
}

//=========================================================================================
// SessionState (Specific to One Chat Session)
//=========================================================================================

/// The state for a single chat session: the ordered message log and the
/// descriptors of the documents uploaded so far. Nothing here is persisted;
/// exporting the chat history is the only durability mechanism.
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    messages: Vec<Message>,
    documents: Vec<DocumentDescriptor>,
    /// Hook for cancelling in-flight backend work when the session is
    /// closed. Not yet consulted mid-request.
    pub cancellation_token: CancellationToken,
}

impl SessionState {
    /// Creates an empty session: no messages, no documents.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            messages: Vec::new(),
            documents: Vec::new(),
            cancellation_token: CancellationToken::new(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn documents(&self) -> &[DocumentDescriptor] {
        &self.documents
    }

    /// Appends to the message log. The log is append-only; entries are never
    /// edited or removed individually.
    pub fn append_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Adds a document descriptor. The list is unique by backend-assigned
    /// id; a duplicate id is rejected and the existing descriptor kept.
    pub fn add_document(&mut self, document: DocumentDescriptor) -> bool {
        if self.documents.iter().any(|d| d.id == document.id) {
            return false;
        }
        self.documents.push(document);
        true
    }

    /// Removes the descriptor with the given backend id, if present.
    pub fn remove_document(&mut self, document_id: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != document_id);
        self.documents.len() != before
    }

    /// Empties the message log. Uploaded documents are unaffected.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
    }

    /// The ids of every currently listed document, in upload order.
    pub fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    /// Timestamp of the most recent message, if any.
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.timestamp)
    }
}

//=========================================================================================
// SessionRegistry (Per-Session Isolation)
//=========================================================================================

/// In-memory registry of live chat sessions, keyed by session id.
///
/// Each session sits behind its own `Mutex`, so operations on one session
/// serialize while distinct sessions proceed independently.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<Mutex<SessionState>>>>>,
}

impl SessionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh session and returns its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(SessionState::new(id)));
        let mut sessions = self.sessions.write().await;
        sessions.insert(id, session);
        id
    }

    /// Gets a live session by id.
    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<SessionState>>> {
        let sessions = self.sessions.read().await;
        sessions.get(&session_id).cloned()
    }

    /// Removes a session from the registry and cancels its token.
    pub async fn remove(&self, session_id: Uuid) -> bool {
        let removed = {
            let mut sessions = self.sessions.write().await;
            sessions.remove(&session_id)
        };
        match removed {
            Some(session) => {
                session.lock().await.cancellation_token.cancel();
                true
            }
            None => false,
        }
    }
}
