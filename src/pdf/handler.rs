//! MuPDF-backed page source
//!
//! MuPDF calls are CPU-bound, so every operation runs on the blocking pool
//! against a freshly opened document.

use std::sync::Arc;

use async_trait::async_trait;
use mupdf::{Colorspace, Matrix};

use crate::document::{DocumentError, DocumentResult};
use crate::mupdf::SafeDocument;

use super::raster::encode_pixmap_png;
use super::traits::{PageSource, PdfLoader};

/// PDF page source over a `SafeDocument`
pub struct PdfDocumentHandler {
    doc: Arc<SafeDocument>,
}

impl PdfDocumentHandler {
    pub fn from_bytes(data: Vec<u8>, id: &str) -> DocumentResult<Self> {
        let doc = SafeDocument::from_bytes(data, id)?;
        Ok(Self { doc: Arc::new(doc) })
    }

    fn validate_page_index(&self, page_index: usize) -> DocumentResult<()> {
        if page_index >= self.doc.page_count() {
            return Err(DocumentError::PageNotFound(page_index));
        }
        Ok(())
    }
}

#[async_trait]
impl PageSource for PdfDocumentHandler {
    fn page_count(&self) -> usize {
        self.doc.page_count()
    }

    async fn page_text(&self, page_index: usize) -> DocumentResult<String> {
        self.validate_page_index(page_index)?;
        let doc = self.doc.clone();

        tokio::task::spawn_blocking(move || {
            doc.with_doc(|mupdf_doc| {
                let page = mupdf_doc.load_page(page_index as i32)?;
                page.to_text().map_err(|e| {
                    DocumentError::TextExtractionError(format!("page {}: {}", page_index + 1, e))
                })
            })
        })
        .await
        .map_err(|e| DocumentError::TextExtractionError(format!("Task join error: {}", e)))?
    }

    async fn render_page(&self, page_index: usize, scale: f32) -> DocumentResult<Vec<u8>> {
        self.validate_page_index(page_index)?;
        let doc = self.doc.clone();
        let scale = scale.clamp(0.1, 4.0);

        tokio::task::spawn_blocking(move || {
            doc.with_doc(|mupdf_doc| {
                let page = mupdf_doc.load_page(page_index as i32)?;
                let matrix = Matrix::new_scale(scale, scale);
                let colorspace = Colorspace::device_rgb();
                let pixmap = page.to_pixmap(&matrix, &colorspace, false, false)?;
                encode_pixmap_png(&pixmap)
            })
        })
        .await
        .map_err(|e| DocumentError::RenderError(format!("Task join error: {}", e)))?
    }
}

/// Production loader: opens bytes with MuPDF on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfLoader;

#[async_trait]
impl PdfLoader for MuPdfLoader {
    async fn load(&self, data: Vec<u8>, id: &str) -> DocumentResult<Arc<dyn PageSource>> {
        let id = id.to_string();
        let handler =
            tokio::task::spawn_blocking(move || PdfDocumentHandler::from_bytes(data, &id))
                .await
                .map_err(|e| DocumentError::ContextError(format!("Task join error: {}", e)))??;
        Ok(Arc::new(handler))
    }
}
