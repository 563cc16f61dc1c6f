//! crates/assistant_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any web framework or HTTP client; the
//! only serialization concern living here is the chat-history export, which
//! is itself a wire contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of an assistant reply when the backend answers with an
/// empty response body.
pub const EMPTY_REPLY_FALLBACK: &str = "Sorry, I couldn't generate a response.";

/// Shown in place of an assistant reply when the backend cannot be reached
/// or answers with an error. Failed turns still append a message, so the
/// log never carries a hole where an answer should be.
pub const CONNECTIVITY_ERROR_REPLY: &str =
    "Sorry, I'm having trouble connecting to the AI service. Please try again.";

/// The author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single entry in a session's message log.
///
/// Messages are immutable once appended and are only ever removed by a
/// full clear of the log.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Citations returned by the backend. Only assistant messages carry
    /// sources; a failed turn's fallback message has none.
    pub sources: Vec<String>,
}

impl Message {
    /// Creates a user message stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
        }
    }

    /// Creates an assistant message stamped with the current time.
    pub fn assistant(content: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
            sources,
        }
    }
}

/// A client-side record referencing a file stored by the backend under its
/// backend-assigned id.
#[derive(Debug, Clone)]
pub struct DocumentDescriptor {
    pub name: String,
    pub id: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// Applies the light display formatting assistant replies get before they
/// join the log: dashed list markers become bullet points.
pub fn format_assistant_reply(text: &str) -> String {
    text.replace("\n-", "\n•")
}

//=========================================================================================
// Chat History Export
//=========================================================================================

/// The downloadable chat-history artifact.
///
/// `industry` carries the raw `INDUSTRY_TEMPLATE` value the deployment was
/// started with, even when that value did not match a known preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExport {
    pub deployment_id: String,
    pub deployment_name: String,
    pub industry: String,
    pub exported_at: DateTime<Utc>,
    pub messages: Vec<ExportedMessage>,
}

/// One message as it appears in the export document. Unlike the in-memory
/// `Message`, `sources` is always serialized, as an empty list when the
/// message carried none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub sources: Vec<String>,
}

impl From<&Message> for ExportedMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
            timestamp: Some(message.timestamp),
            sources: message.sources.clone(),
        }
    }
}

impl ChatExport {
    /// Builds an export snapshot of a message log, stamped now.
    pub fn new(
        deployment_id: impl Into<String>,
        deployment_name: impl Into<String>,
        industry: impl Into<String>,
        messages: &[Message],
    ) -> Self {
        Self {
            deployment_id: deployment_id.into(),
            deployment_name: deployment_name.into(),
            industry: industry.into(),
            exported_at: Utc::now(),
            messages: messages.iter().map(ExportedMessage::from).collect(),
        }
    }

    /// The download filename for this export:
    /// `chat_history_{first 8 chars of deployment id}_{yyyymmdd_HHMMSS}.json`.
    pub fn file_name(&self) -> String {
        let id_prefix: String = self.deployment_id.chars().take(8).collect();
        format!(
            "chat_history_{}_{}.json",
            id_prefix,
            self.exported_at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_assistant_reply_converts_dashes_to_bullets() {
        let raw = "Key points:\n- first\n- second";
        assert_eq!(format_assistant_reply(raw), "Key points:\n• first\n• second");
    }

    #[test]
    fn format_assistant_reply_leaves_plain_text_alone() {
        let raw = "A hyphen-ated answer with no list.";
        assert_eq!(format_assistant_reply(raw), raw);
    }

    #[test]
    fn export_round_trips_roles_content_and_sources() {
        let messages = vec![
            Message::user("Summarize this document"),
            Message::assistant("Here is a summary.", vec!["report.pdf, p. 2".to_string()]),
            Message::assistant(CONNECTIVITY_ERROR_REPLY, Vec::new()),
        ];
        let export = ChatExport::new("dep-1", "AI Assistant", "general", &messages);

        let json = serde_json::to_string(&export).unwrap();
        let parsed: ChatExport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.messages.len(), 3);
        for (original, exported) in messages.iter().zip(&parsed.messages) {
            assert_eq!(exported.role, original.role);
            assert_eq!(exported.content, original.content);
            assert_eq!(exported.sources, original.sources);
        }
    }

    #[test]
    fn export_serializes_missing_sources_as_empty_list() {
        let export = ChatExport::new("dep-1", "AI Assistant", "general", &[Message::user("hi")]);
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(value["messages"][0]["sources"], serde_json::json!([]));
        assert_eq!(value["messages"][0]["role"], "user");
    }

    #[test]
    fn export_file_name_truncates_the_deployment_id() {
        let export = ChatExport::new("deployment-1234", "AI Assistant", "legal", &[]);
        let name = export.file_name();
        assert!(name.starts_with("chat_history_deployme_"));
        assert!(name.ends_with(".json"));
    }

    #[test]
    fn export_file_name_tolerates_a_short_deployment_id() {
        let export = ChatExport::new("dep", "AI Assistant", "legal", &[]);
        assert!(export.file_name().starts_with("chat_history_dep_"));
    }
}
