//! Chat transport seam
//!
//! `reply` is the response relay: the text goes out as one message, with no
//! chunking, truncation or formatting.

use std::path::Path;

use async_trait::async_trait;

use crate::error::TransportError;

/// Opaque conversation identity supplied by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(pub i64);

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Fetch an attachment into `destination`
    async fn download(&self, file_id: &str, destination: &Path) -> Result<(), TransportError>;

    /// Send `text` to the conversation as a single message
    async fn reply(&self, conversation: ConversationId, text: &str) -> Result<(), TransportError>;
}
