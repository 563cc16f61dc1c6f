//! services/gateway/src/web/chat_turn.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! handling a single question-and-answer turn of a chat session.

use crate::web::state::{AppState, SessionState};
use assistant_core::domain::{
    format_assistant_reply, Message, CONNECTIVITY_ERROR_REPLY, EMPTY_REPLY_FALLBACK,
};
use assistant_core::ports::QueryRequest;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{error, info};

/// What a single turn appended to the log, plus the error notice when the
/// backend call failed. The notice is informational: the turn itself always
/// completes with an assistant message.
#[derive(Debug)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    pub error: Option<String>,
}

/// Runs one chat turn: appends the user's message, queries the backend with
/// every currently listed document in scope, and appends the assistant's
/// reply (or the fixed fallback text when the backend fails or answers with
/// nothing).
///
/// The session lock is held across the backend await so concurrent
/// submissions to the same session cannot interleave their message pairs.
pub async fn run_chat_turn(
    app_state: &AppState,
    session_lock: Arc<Mutex<SessionState>>,
    content: String,
    max_tokens: u32,
    temperature: f32,
) -> TurnOutcome {
    let start_time = Instant::now();
    let mut session = session_lock.lock().await;

    let user_message = Message::user(content.clone());
    session.append_message(user_message.clone());

    let mut request = QueryRequest::new(content, session.document_ids());
    request.max_tokens = max_tokens;
    request.temperature = temperature;

    let (assistant_message, turn_error) = match app_state.backend.query(request).await {
        Ok(outcome) => {
            let content = if outcome.response.is_empty() {
                EMPTY_REPLY_FALLBACK.to_string()
            } else {
                format_assistant_reply(&outcome.response)
            };
            (Message::assistant(content, outcome.sources), None)
        }
        Err(e) => {
            error!("Backend query failed for session {}: {}", session.id, e);
            (
                Message::assistant(CONNECTIVITY_ERROR_REPLY, Vec::new()),
                Some(e.to_string()),
            )
        }
    };

    session.append_message(assistant_message.clone());
    info!(
        "Chat turn for session {} took {:?} ({} messages in log)",
        session.id,
        start_time.elapsed(),
        session.messages().len()
    );

    TurnOutcome {
        user_message,
        assistant_message,
        error: turn_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::web::state::SessionRegistry;
    use assistant_core::domain::Role;
    use assistant_core::ports::{
        AssistantBackend, DocumentUpload, PortError, PortResult, QueryOutcome,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// A backend double that replays a scripted sequence of query results
    /// and records every request it sees.
    #[derive(Default)]
    struct ScriptedBackend {
        query_results: Mutex<VecDeque<PortResult<QueryOutcome>>>,
        seen_queries: Mutex<Vec<QueryRequest>>,
    }

    impl ScriptedBackend {
        fn with_results(results: Vec<PortResult<QueryOutcome>>) -> Arc<Self> {
            Arc::new(Self {
                query_results: Mutex::new(results.into()),
                seen_queries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AssistantBackend for ScriptedBackend {
        async fn upload_document(&self, _upload: DocumentUpload) -> PortResult<String> {
            Ok("doc_123".to_string())
        }

        async fn query(&self, request: QueryRequest) -> PortResult<QueryOutcome> {
            self.seen_queries.lock().await.push(request);
            self.query_results
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Ok(QueryOutcome::default()))
        }
    }

    fn test_config() -> Arc<Config> {
        Arc::new(Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            api_endpoint: "http://localhost:8000".to_string(),
            api_key: String::new(),
            deployment_id: "dep-test".to_string(),
            deployment_name: "AI Assistant".to_string(),
            industry_template: "general".to_string(),
        })
    }

    async fn app_with(backend: Arc<ScriptedBackend>) -> (AppState, Arc<Mutex<SessionState>>) {
        let app_state = AppState {
            config: test_config(),
            industry: assistant_core::industry::IndustryConfig::for_template("general"),
            backend,
            sessions: SessionRegistry::new(),
        };
        let session_id = app_state.sessions.create().await;
        let session = app_state.sessions.get(session_id).await.unwrap();
        (app_state, session)
    }

    #[tokio::test]
    async fn successful_turns_append_two_messages_each() {
        let backend = ScriptedBackend::with_results(vec![
            Ok(QueryOutcome {
                response: "First answer".to_string(),
                sources: vec!["a.pdf".to_string()],
            }),
            Ok(QueryOutcome {
                response: "Second answer".to_string(),
                sources: Vec::new(),
            }),
        ]);
        let (app_state, session) = app_with(backend).await;

        for question in ["one", "two"] {
            run_chat_turn(&app_state, session.clone(), question.to_string(), 1000, 0.7).await;
        }

        let session = session.lock().await;
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
        );
        assert_eq!(session.messages()[1].content, "First answer");
        assert_eq!(session.messages()[1].sources, vec!["a.pdf".to_string()]);
    }

    #[tokio::test]
    async fn failed_turn_appends_the_connectivity_fallback_without_sources() {
        let backend = ScriptedBackend::with_results(vec![Err(PortError::Status {
            status: 503,
            body: "upstream down".to_string(),
        })]);
        let (app_state, session) = app_with(backend).await;

        let outcome =
            run_chat_turn(&app_state, session.clone(), "hello".to_string(), 1000, 0.7).await;

        assert_eq!(outcome.assistant_message.content, CONNECTIVITY_ERROR_REPLY);
        assert!(outcome.assistant_message.sources.is_empty());
        let notice = outcome.error.expect("failed turn must surface a notice");
        assert!(notice.contains("503"));
        assert!(notice.contains("upstream down"));
        assert_eq!(session.lock().await.messages().len(), 2);
    }

    #[tokio::test]
    async fn empty_backend_response_is_replaced_by_the_fallback() {
        let backend = ScriptedBackend::with_results(vec![Ok(QueryOutcome::default())]);
        let (app_state, session) = app_with(backend).await;

        let outcome =
            run_chat_turn(&app_state, session, "hello".to_string(), 1000, 0.7).await;

        assert_eq!(outcome.assistant_message.content, EMPTY_REPLY_FALLBACK);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn dashed_lists_in_replies_are_bulleted() {
        let backend = ScriptedBackend::with_results(vec![Ok(QueryOutcome {
            response: "Points:\n- one\n- two".to_string(),
            sources: Vec::new(),
        })]);
        let (app_state, session) = app_with(backend).await;

        let outcome = run_chat_turn(&app_state, session, "list".to_string(), 1000, 0.7).await;
        assert_eq!(outcome.assistant_message.content, "Points:\n• one\n• two");
    }

    #[tokio::test]
    async fn queries_carry_the_listed_document_ids_and_parameters() {
        let backend = ScriptedBackend::with_results(vec![Ok(QueryOutcome::default())]);
        let (app_state, session) = app_with(backend.clone()).await;

        {
            let mut locked = session.lock().await;
            locked.add_document(assistant_core::domain::DocumentDescriptor {
                name: "report.pdf".to_string(),
                id: "doc_123".to_string(),
                mime_type: "application/pdf".to_string(),
                size_bytes: 2048,
                uploaded_at: chrono::Utc::now(),
            });
        }

        run_chat_turn(
            &app_state,
            session,
            "Summarize this document".to_string(),
            500,
            0.2,
        )
        .await;

        let seen = backend.seen_queries.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].question, "Summarize this document");
        assert_eq!(seen[0].document_ids, vec!["doc_123".to_string()]);
        assert_eq!(seen[0].max_tokens, 500);
        assert_eq!(seen[0].temperature, 0.2);
    }
}
