pub mod domain;
pub mod industry;
pub mod ports;

pub use domain::{
    ChatExport, DocumentDescriptor, ExportedMessage, Message, Role, format_assistant_reply,
    CONNECTIVITY_ERROR_REPLY, EMPTY_REPLY_FALLBACK,
};
pub use industry::IndustryConfig;
pub use ports::{AssistantBackend, DocumentUpload, PortError, PortResult, QueryOutcome, QueryRequest};
