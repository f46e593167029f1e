//! Telegram transport and update loop

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;
use tokio::io::AsyncWriteExt;

use crate::error::TransportError;

use super::event::{is_pdf_document, parse_command, Command, IncomingEvent};
use super::intake::IntakePipeline;
use super::transport::{ChatTransport, ConversationId};

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn download(&self, file_id: &str, destination: &Path) -> Result<(), TransportError> {
        let file = self
            .bot
            .get_file(FileId(file_id.to_string()))
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;

        let mut dst = tokio::fs::File::create(destination)
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;

        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| TransportError::Download(e.to_string()))?;

        dst.flush()
            .await
            .map_err(|e| TransportError::Download(e.to_string()))
    }

    async fn reply(&self, conversation: ConversationId, text: &str) -> Result<(), TransportError> {
        self.bot
            .send_message(ChatId(conversation.0), text)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;
        Ok(())
    }
}

/// Map a Telegram message onto the event it asks for; anything else is ignored
fn event_from_message(msg: &Message) -> Option<IncomingEvent> {
    if let Some(text) = msg.text() {
        return match parse_command(text)? {
            Command::Start => Some(IncomingEvent::Start {
                first_name: msg.from.as_ref().map(|user| user.first_name.clone()),
            }),
            Command::Help => Some(IncomingEvent::Help),
        };
    }

    if let Some(document) = msg.document() {
        let mime = document.mime_type.as_ref().map(|m| m.essence_str());
        if !is_pdf_document(mime, document.file_name.as_deref()) {
            return None;
        }
        return Some(IncomingEvent::Document {
            file_id: document.file.id.to_string(),
            file_name: document.file_name.clone(),
        });
    }

    // Telegram sends several resolutions of one photo
    let largest = msg
        .photo()?
        .iter()
        .max_by_key(|size| u64::from(size.width) * u64::from(size.height))?;
    Some(IncomingEvent::Photo {
        file_id: largest.file.id.to_string(),
    })
}

/// Long-poll Telegram until the process is interrupted
pub async fn run(bot: Bot, pipeline: Arc<IntakePipeline>) {
    tracing::info!("Starting Telegram long polling");

    let handler = Update::filter_message().endpoint(
        |bot: Bot, msg: Message, pipeline: Arc<IntakePipeline>| async move {
            if let Some(event) = event_from_message(&msg) {
                tracing::debug!(chat = msg.chat.id.0, "Received {:?}", event);
                let transport = TelegramTransport::new(bot);
                pipeline
                    .handle(&transport, ConversationId(msg.chat.id.0), event)
                    .await;
            }
            respond(())
        },
    );

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![pipeline])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    tracing::info!("Telegram dispatcher stopped");
}
