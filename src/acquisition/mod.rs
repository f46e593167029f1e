//! Text acquisition
//!
//! Turns an attachment into plain text. PDFs are read from their text layer
//! first; when that yields fewer than `min_text_chars` characters every page
//! is rasterized and run through OCR instead. Images go straight to OCR.
//!
//! Failures never escape this module: an unreadable page or a failed OCR call
//! contributes no text and is logged. The caller sees only a short (possibly
//! empty) string.

use std::sync::Arc;

use crate::config::AcquisitionConfig;
use crate::document::{Attachment, AttachmentKind};
use crate::ocr::OcrService;
use crate::pdf::{PageSource, PdfLoader};

pub struct TextAcquirer {
    pdf_loader: Arc<dyn PdfLoader>,
    ocr: Arc<OcrService>,
    config: AcquisitionConfig,
}

impl TextAcquirer {
    pub fn new(
        pdf_loader: Arc<dyn PdfLoader>,
        ocr: Arc<OcrService>,
        config: AcquisitionConfig,
    ) -> Self {
        Self {
            pdf_loader,
            ocr,
            config,
        }
    }

    /// Extract trimmed plain text from an attachment
    pub async fn acquire_text(&self, attachment: &Attachment) -> String {
        match attachment.kind {
            AttachmentKind::Image => self.ocr_image(&attachment.bytes, &attachment.name).await,
            AttachmentKind::Pdf => self.pdf_text(attachment).await,
        }
    }

    async fn ocr_image(&self, image: &[u8], name: &str) -> String {
        match self.ocr.recognize(image).await {
            Ok(result) => result.text.trim().to_string(),
            Err(e) => {
                tracing::warn!("OCR failed for {}: {}", name, e);
                String::new()
            }
        }
    }

    async fn pdf_text(&self, attachment: &Attachment) -> String {
        let source = match self
            .pdf_loader
            .load(attachment.bytes.clone(), &attachment.name)
            .await
        {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Could not open PDF {}: {}", attachment.name, e);
                return String::new();
            }
        };

        let text_layer = read_text_layer(source.as_ref(), &attachment.name).await;
        let chars = text_layer.chars().count();
        if chars >= self.config.min_text_chars {
            tracing::debug!("{}: {} characters from text layer", attachment.name, chars);
            return text_layer;
        }

        tracing::info!(
            "{}: text layer has {} characters (< {}), running OCR on {} page(s)",
            attachment.name,
            chars,
            self.config.min_text_chars,
            source.page_count()
        );
        self.ocr_pages(source.as_ref(), &attachment.name).await
    }

    /// Rasterize and OCR each page, joined with `--- Page N ---` markers
    ///
    /// Pages that yield no text are left out entirely, marker included.
    async fn ocr_pages(&self, source: &dyn PageSource, name: &str) -> String {
        let mut sections = Vec::new();

        for page_index in 0..source.page_count() {
            let image = match source
                .render_page(page_index, self.config.raster_scale)
                .await
            {
                Ok(image) => image,
                Err(e) => {
                    tracing::warn!("{}: failed to rasterize page {}: {}", name, page_index + 1, e);
                    continue;
                }
            };

            let text = self.ocr_image(&image, name).await;
            if !text.is_empty() {
                sections.push(format!("--- Page {} ---\n{}", page_index + 1, text));
            }
        }

        sections.join("\n\n").trim().to_string()
    }
}

/// Concatenate the text layer of every page; unreadable pages count as empty
async fn read_text_layer(source: &dyn PageSource, name: &str) -> String {
    let mut pages = Vec::with_capacity(source.page_count());

    for page_index in 0..source.page_count() {
        match source.page_text(page_index).await {
            Ok(text) => pages.push(text),
            Err(e) => {
                tracing::warn!("{}: no text from page {}: {}", name, page_index + 1, e);
            }
        }
    }

    pages.join("\n").trim().to_string()
}


#[cfg(test)]
mod tests {
    use super::testing::{StubLoader, StubPdf};
    use super::*;
    use crate::ocr::{MockProvider, OcrProviderTrait};
    use std::sync::atomic::AtomicUsize;

    fn acquirer(pdf: Option<Arc<StubPdf>>, ocr: Arc<MockProvider>) -> TextAcquirer {
        TextAcquirer::new(
            Arc::new(StubLoader(pdf)),
            Arc::new(OcrService::with_providers(
                "eng",
                vec![ocr as Arc<dyn OcrProviderTrait>],
            )),
            AcquisitionConfig::default(),
        )
    }

    fn pdf(bytes: &[u8]) -> Attachment {
        Attachment::new(AttachmentKind::Pdf, "ratecon.pdf", bytes.to_vec())
    }

    #[tokio::test]
    async fn test_text_layer_above_threshold_skips_ocr() {
        let long_page = "Load 12345, Rate $2000, 500 miles. ".repeat(4);
        let stub = StubPdf::with_text(&[&long_page, "  second page  "]);
        let ocr = Arc::new(MockProvider::returning("should not be used"));
        let acquirer = acquirer(Some(stub.clone()), ocr.clone());

        let text = acquirer.acquire_text(&pdf(b"%PDF")).await;

        assert_eq!(text, format!("{}\n  second page", long_page));
        assert_eq!(ocr.call_count(), 0);
        assert_eq!(stub.render_count(), 0);
    }

    #[tokio::test]
    async fn test_threshold_is_inclusive() {
        let exactly = "x".repeat(100);
        let ocr = Arc::new(MockProvider::returning("ocr"));
        let acquirer = acquirer(Some(StubPdf::with_text(&[&exactly])), ocr.clone());

        assert_eq!(acquirer.acquire_text(&pdf(b"%PDF")).await, exactly);
        assert_eq!(ocr.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scanned_single_page_falls_back_to_ocr() {
        let stub = StubPdf::with_text(&[""]);
        let ocr = Arc::new(MockProvider::returning("Load 99, REF A1"));
        let acquirer = acquirer(Some(stub.clone()), ocr.clone());

        let text = acquirer.acquire_text(&pdf(b"%PDF")).await;

        assert_eq!(text, "--- Page 1 ---\nLoad 99, REF A1");
        assert_eq!(ocr.call_count(), 1);
        assert_eq!(stub.render_count(), 1);
    }

    #[tokio::test]
    async fn test_ocr_runs_once_per_page_in_order() {
        let stub = StubPdf::with_text(&["", "", ""]);
        let ocr = Arc::new(MockProvider::returning("text"));
        let acquirer = acquirer(Some(stub.clone()), ocr.clone());

        let text = acquirer.acquire_text(&pdf(b"%PDF")).await;

        assert_eq!(ocr.call_count(), 3);
        assert_eq!(
            text,
            "--- Page 1 ---\ntext\n\n--- Page 2 ---\ntext\n\n--- Page 3 ---\ntext"
        );
    }

    #[tokio::test]
    async fn test_broken_pages_contribute_nothing() {
        let stub = Arc::new(StubPdf {
            pages: vec![None, Some("short".into()), Some(String::new())],
            renders: AtomicUsize::new(0),
            fail_render: vec![1],
        });
        let ocr = Arc::new(MockProvider::returning("scanned"));
        let acquirer = acquirer(Some(stub.clone()), ocr.clone());

        let text = acquirer.acquire_text(&pdf(b"%PDF")).await;

        assert_eq!(stub.render_count(), 3);
        assert_eq!(ocr.call_count(), 2);
        assert_eq!(text, "--- Page 1 ---\nscanned\n\n--- Page 3 ---\nscanned");
    }

    #[tokio::test]
    async fn test_unreadable_pdf_yields_empty_text() {
        let ocr = Arc::new(MockProvider::returning("unused"));
        let acquirer = acquirer(None, ocr.clone());

        assert_eq!(acquirer.acquire_text(&pdf(b"garbage")).await, "");
        assert_eq!(ocr.call_count(), 0);
    }

    #[tokio::test]
    async fn test_image_goes_straight_to_ocr() {
        let ocr = Arc::new(MockProvider::returning("  REF# 778  \n"));
        let acquirer = acquirer(None, ocr.clone());
        let photo = Attachment::new(AttachmentKind::Image, "photo.jpg", b"jpeg".to_vec());

        assert_eq!(acquirer.acquire_text(&photo).await, "REF# 778");
        assert_eq!(ocr.call_count(), 1);
    }

    #[tokio::test]
    async fn test_image_ocr_failure_degrades_to_empty() {
        let ocr = Arc::new(MockProvider::failing());
        let acquirer = acquirer(None, ocr);
        let photo = Attachment::new(AttachmentKind::Image, "photo.jpg", b"jpeg".to_vec());

        assert_eq!(acquirer.acquire_text(&photo).await, "");
    }
}
