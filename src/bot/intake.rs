//! Intake pipeline
//!
//! Each attachment goes through the same ordered steps: download into a
//! scoped temporary file, acknowledge, acquire text, gate on length, extract,
//! relay. The temporary file is owned by a guard that removes it on every
//! exit path.

use std::path::PathBuf;

use crate::acquisition::TextAcquirer;
use crate::document::{Attachment, AttachmentKind, TempAttachment};
use crate::error::PipelineError;
use crate::extraction::FieldExtractor;

use super::event::IncomingEvent;
use super::messages;
use super::transport::{ChatTransport, ConversationId};

pub struct IntakePipeline {
    acquirer: TextAcquirer,
    extractor: FieldExtractor,
    min_viable_chars: usize,
    temp_dir: PathBuf,
}

impl IntakePipeline {
    pub fn new(
        acquirer: TextAcquirer,
        extractor: FieldExtractor,
        min_viable_chars: usize,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            acquirer,
            extractor,
            min_viable_chars,
            temp_dir,
        }
    }

    /// Route one event to its handler. Never fails: every error becomes a
    /// chat notice.
    pub async fn handle(
        &self,
        transport: &dyn ChatTransport,
        conversation: ConversationId,
        event: IncomingEvent,
    ) {
        match event {
            IncomingEvent::Start { first_name } => {
                relay(transport, conversation, &messages::greeting(first_name.as_deref())).await
            }
            IncomingEvent::Help => relay(transport, conversation, messages::HELP).await,
            IncomingEvent::Document { file_id, file_name } => {
                let name = file_name.unwrap_or_else(|| format!("{}.pdf", file_id));
                self.handle_document(transport, conversation, &file_id, &name)
                    .await
            }
            IncomingEvent::Photo { file_id } => {
                self.handle_photo(transport, conversation, &file_id).await
            }
        }
    }

    pub async fn handle_document(
        &self,
        transport: &dyn ChatTransport,
        conversation: ConversationId,
        file_id: &str,
        file_name: &str,
    ) {
        self.process(transport, conversation, AttachmentKind::Pdf, file_id, file_name)
            .await
    }

    pub async fn handle_photo(
        &self,
        transport: &dyn ChatTransport,
        conversation: ConversationId,
        file_id: &str,
    ) {
        let name = format!("{}.jpg", file_id);
        self.process(transport, conversation, AttachmentKind::Image, file_id, &name)
            .await
    }

    async fn process(
        &self,
        transport: &dyn ChatTransport,
        conversation: ConversationId,
        kind: AttachmentKind,
        file_id: &str,
        name: &str,
    ) {
        let temp = TempAttachment::reserve(&self.temp_dir, conversation.0, name);

        let reply = match self
            .run(transport, conversation, kind, file_id, name, &temp)
            .await
        {
            Ok(result) => {
                tracing::info!(chat = conversation.0, "Extracted {} {}", kind.label(), name);
                result
            }
            Err(PipelineError::AcquisitionInsufficient { chars, required }) => {
                tracing::info!(
                    chat = conversation.0,
                    "{}: {} characters of text (< {}), not calling the model",
                    name,
                    chars,
                    required
                );
                messages::could_not_extract(kind).to_string()
            }
            Err(e) => {
                tracing::error!(chat = conversation.0, "Failed to process {}: {}", name, e);
                messages::error_notice(kind, &e.to_string())
            }
        };

        relay(transport, conversation, &reply).await;
        drop(temp);
    }

    async fn run(
        &self,
        transport: &dyn ChatTransport,
        conversation: ConversationId,
        kind: AttachmentKind,
        file_id: &str,
        name: &str,
        temp: &TempAttachment,
    ) -> Result<String, PipelineError> {
        transport.download(file_id, temp.path()).await?;
        relay(transport, conversation, messages::received(kind)).await;

        let bytes = temp.read().await?;
        let text = self
            .acquirer
            .acquire_text(&Attachment::new(kind, name, bytes))
            .await;

        let chars = text.chars().count();
        if chars < self.min_viable_chars {
            return Err(PipelineError::AcquisitionInsufficient {
                chars,
                required: self.min_viable_chars,
            });
        }

        Ok(self.extractor.extract_fields(&text).await?)
    }
}

/// Send a message; a failed send can only be logged
async fn relay(transport: &dyn ChatTransport, conversation: ConversationId, text: &str) {
    if let Err(e) = transport.reply(conversation, text).await {
        tracing::error!(chat = conversation.0, "{}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use crate::acquisition::testing::{StubLoader, StubPdf};
    use crate::config::{AcquisitionConfig, ModelConfig};
    use crate::error::TransportError;
    use crate::extraction::testing::StubCompletion;
    use crate::extraction::{ModelError, RetryPolicy};
    use crate::ocr::{MockProvider, OcrProviderTrait, OcrService};

    const CHAT: ConversationId = ConversationId(42);

    /// Records replies and the temporary paths it was asked to fill
    struct StubTransport {
        content: Vec<u8>,
        fail_download: bool,
        replies: Mutex<Vec<String>>,
        downloads: Mutex<Vec<PathBuf>>,
    }

    impl StubTransport {
        fn serving(content: &[u8]) -> Self {
            Self {
                content: content.to_vec(),
                fail_download: false,
                replies: Mutex::new(Vec::new()),
                downloads: Mutex::new(Vec::new()),
            }
        }

        fn replies(&self) -> Vec<String> {
            self.replies.lock().clone()
        }

        fn downloaded_path(&self) -> PathBuf {
            self.downloads.lock()[0].clone()
        }
    }

    #[async_trait]
    impl ChatTransport for StubTransport {
        async fn download(&self, _file_id: &str, destination: &Path) -> Result<(), TransportError> {
            self.downloads.lock().push(destination.to_path_buf());
            if self.fail_download {
                return Err(TransportError::Download("file is too big".into()));
            }
            tokio::fs::write(destination, &self.content)
                .await
                .map_err(|e| TransportError::Download(e.to_string()))
        }

        async fn reply(&self, _conversation: ConversationId, text: &str) -> Result<(), TransportError> {
            self.replies.lock().push(text.to_string());
            Ok(())
        }
    }

    struct Harness {
        pipeline: IntakePipeline,
        completion: Arc<StubCompletion>,
        ocr: Arc<MockProvider>,
        _dir: tempfile::TempDir,
    }

    fn harness(pdf: Option<Arc<StubPdf>>, ocr: MockProvider, completion: StubCompletion) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let ocr = Arc::new(ocr);
        let completion = Arc::new(completion);

        let acquirer = TextAcquirer::new(
            Arc::new(StubLoader(pdf)),
            Arc::new(OcrService::with_providers(
                "eng",
                vec![ocr.clone() as Arc<dyn OcrProviderTrait>],
            )),
            AcquisitionConfig::default(),
        );
        let model_config = ModelConfig {
            retry: RetryPolicy::none(),
            ..ModelConfig::default()
        };
        let extractor = FieldExtractor::new(completion.clone(), &model_config);

        Harness {
            pipeline: IntakePipeline::new(acquirer, extractor, 50, dir.path().to_path_buf()),
            completion,
            ocr,
            _dir: dir,
        }
    }

    fn document(name: &str) -> IncomingEvent {
        IncomingEvent::Document {
            file_id: "BQACAgIAAxkBAAI".into(),
            file_name: Some(name.into()),
        }
    }

    #[tokio::test]
    async fn test_text_layer_pdf_is_relayed_without_ocr() {
        let layer = "Load 12345, Rate $2000, 500 miles. Pickup Dallas TX, delivery Denver CO. \
                     Shipper ACME Foods, receiver Mile High Grocers.";
        let h = harness(
            Some(StubPdf::with_text(&[layer])),
            MockProvider::returning("unused"),
            StubCompletion::new(),
        );
        let transport = StubTransport::serving(b"%PDF-1.4");

        h.pipeline.handle(&transport, CHAT, document("ratecon.pdf")).await;

        assert_eq!(
            transport.replies(),
            vec![
                messages::received(AttachmentKind::Pdf).to_string(),
                StubCompletion::answer_for(&format!("RATE CONFIRMATION TEXT:\n{}", layer)),
            ]
        );
        assert_eq!(h.ocr.call_count(), 0);
        assert_eq!(h.completion.call_count(), 1);
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_scanned_pdf_sends_ocr_text_to_model() {
        let ocr_text = "Load 99, REF A1. Pickup 06/01 08:00 Fresno CA, delivery 06/02 Reno NV.";
        let h = harness(
            Some(StubPdf::with_text(&[""])),
            MockProvider::returning(ocr_text),
            StubCompletion::new(),
        );
        let transport = StubTransport::serving(b"%PDF-1.4");

        h.pipeline.handle(&transport, CHAT, document("scan.pdf")).await;

        assert_eq!(h.ocr.call_count(), 1);
        let request = h.completion.last_request.lock().clone().unwrap();
        assert!(request
            .user
            .ends_with(&format!("--- Page 1 ---\n{}\n", ocr_text)));
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_blurry_photo_is_gated_before_model() {
        let h = harness(None, MockProvider::returning("L0ad 9 REF"), StubCompletion::new());
        let transport = StubTransport::serving(b"\xFF\xD8\xFF\xE0");

        h.pipeline
            .handle(&transport, CHAT, IncomingEvent::Photo { file_id: "AgAD".into() })
            .await;

        assert_eq!(
            transport.replies(),
            vec![
                messages::received(AttachmentKind::Image).to_string(),
                messages::could_not_extract(AttachmentKind::Image).to_string(),
            ]
        );
        assert_eq!(h.completion.call_count(), 0);
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_model_failure_on_photo_reports_and_cleans_up() {
        let h = harness(
            None,
            MockProvider::returning(&"REF# 4455 Load 777 Rate $1800 ".repeat(3)),
            StubCompletion::failing_with(vec![ModelError::Request("quota exceeded".into())]),
        );
        let transport = StubTransport::serving(b"\xFF\xD8\xFF\xE0");

        h.pipeline
            .handle(&transport, CHAT, IncomingEvent::Photo { file_id: "AgAD".into() })
            .await;

        let replies = transport.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(
            replies[1],
            "⚠️ Error processing image: Completion request failed: quota exceeded"
        );
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_model_failure_on_document_uses_plain_prefix() {
        let h = harness(
            Some(StubPdf::with_text(&[&"Load 12345 Rate $2000 ".repeat(6)])),
            MockProvider::returning("unused"),
            StubCompletion::failing_with(vec![ModelError::EmptyResponse]),
        );
        let transport = StubTransport::serving(b"%PDF-1.4");

        h.pipeline.handle(&transport, CHAT, document("r.pdf")).await;

        let replies = transport.replies();
        assert!(replies[1].starts_with("⚠️ Error: "));
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_download_failure_skips_ack_and_model() {
        let h = harness(
            Some(StubPdf::with_text(&["unused"])),
            MockProvider::returning("unused"),
            StubCompletion::new(),
        );
        let mut transport = StubTransport::serving(b"");
        transport.fail_download = true;

        h.pipeline.handle(&transport, CHAT, document("big.pdf")).await;

        assert_eq!(
            transport.replies(),
            vec!["⚠️ Error: Failed to download attachment: file is too big".to_string()]
        );
        assert_eq!(h.completion.call_count(), 0);
        assert!(!transport.downloaded_path().exists());
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let layer = "Load 55512 REF 9981 Pickup Austin TX 06/03 Delivery Tulsa OK 06/04 \
                     Rate $1450 Miles 460 Notes: call on arrival";
        let h = harness(
            Some(StubPdf::with_text(&[layer])),
            MockProvider::returning("unused"),
            StubCompletion::new(),
        );

        let first = StubTransport::serving(b"%PDF-1.4");
        let second = StubTransport::serving(b"%PDF-1.4");
        h.pipeline.handle(&first, CHAT, document("a.pdf")).await;
        h.pipeline.handle(&second, CHAT, document("a.pdf")).await;

        assert_eq!(first.replies(), second.replies());
        assert_ne!(first.downloaded_path(), second.downloaded_path());
    }

    #[tokio::test]
    async fn test_start_and_help_touch_nothing_else() {
        let h = harness(None, MockProvider::returning("unused"), StubCompletion::new());
        let transport = StubTransport::serving(b"");

        h.pipeline
            .handle(
                &transport,
                CHAT,
                IncomingEvent::Start {
                    first_name: Some("Sam".into()),
                },
            )
            .await;
        h.pipeline.handle(&transport, CHAT, IncomingEvent::Help).await;

        let replies = transport.replies();
        assert_eq!(replies[0], messages::greeting(Some("Sam")));
        assert_eq!(replies[1], messages::HELP);
        assert!(transport.downloads.lock().is_empty());
        assert_eq!(h.completion.call_count(), 0);
        assert_eq!(h.ocr.call_count(), 0);
    }
}
