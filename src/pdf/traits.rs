//! Page-level PDF interfaces

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::DocumentResult;

/// An opened PDF, addressed page by page (0-indexed)
#[async_trait]
pub trait PageSource: Send + Sync {
    fn page_count(&self) -> usize;

    /// Text layer of one page; empty when the page has none
    async fn page_text(&self, page_index: usize) -> DocumentResult<String>;

    /// Rasterize one page to PNG bytes at `scale` (1.0 = 72 dpi)
    async fn render_page(&self, page_index: usize, scale: f32) -> DocumentResult<Vec<u8>>;
}

/// Opens PDF bytes into a `PageSource`
///
/// Opening parses the whole cross-reference table, so implementations must
/// not block the caller's runtime.
#[async_trait]
pub trait PdfLoader: Send + Sync {
    async fn load(&self, data: Vec<u8>, id: &str) -> DocumentResult<Arc<dyn PageSource>>;
}
