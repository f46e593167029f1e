//! Document model
//!
//! Attachments as they arrive from the chat transport, the scoped local copy
//! each handler owns, and the error type shared by the PDF layer.

mod attachment;
mod error;

pub use attachment::{sanitize_file_name, Attachment, AttachmentKind, TempAttachment};
pub use error::{DocumentError, DocumentResult};
