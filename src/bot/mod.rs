//! Chat intake
//!
//! Resolves Telegram messages into `IncomingEvent`s and runs each through the
//! `IntakePipeline`. The transport sits behind `ChatTransport` so the
//! pipeline runs unchanged against an in-memory stand-in.

mod event;
mod intake;
pub mod messages;
mod telegram;
mod transport;

pub use event::{is_pdf_document, parse_command, Command, IncomingEvent};
pub use intake::IntakePipeline;
pub use telegram::{run, TelegramTransport};
pub use transport::{ChatTransport, ConversationId};
