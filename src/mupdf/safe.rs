//! Thread-safe document wrapper for MuPDF

use std::sync::Arc;

use mupdf::Document;
use parking_lot::Mutex;

use crate::document::{DocumentError, DocumentResult};

const PDF_MIME: &str = "application/pdf";

/// Thread-safe PDF wrapper
///
/// Holds the raw bytes and a cached page count. The document is opened fresh
/// for each operation to avoid stale state.
pub struct SafeDocument {
    data: Arc<Vec<u8>>,
    page_count: usize,
    _lock: Mutex<()>,
}

// SAFETY: the only fields are an Arc over immutable bytes, a usize and a
// parking_lot mutex. No MuPDF handle is stored; every handle is
// created inside `with_doc` under `_lock` and dropped before it returns.
unsafe impl Send for SafeDocument {}
unsafe impl Sync for SafeDocument {}

impl SafeDocument {
    /// Validate that `data` is a PDF MuPDF can open and cache its page count
    pub fn from_bytes(data: Vec<u8>, id: &str) -> DocumentResult<Self> {
        if !is_pdf(&data) {
            return Err(DocumentError::UnsupportedFormat(format!(
                "{} does not start with a PDF header",
                id
            )));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)?;
        let page_count = doc.page_count()? as usize;

        Ok(Self {
            data: Arc::new(data),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Execute a closure with access to a freshly opened document
    ///
    /// ```ignore
    /// let text = safe_doc.with_doc(|doc| {
    ///     let page = doc.load_page(0)?;
    ///     Ok(page.to_text()?)
    /// })?;
    /// ```
    pub fn with_doc<F, R>(&self, f: F) -> DocumentResult<R>
    where
        F: FnOnce(&Document) -> DocumentResult<R>,
    {
        let _guard = self._lock.lock();
        let doc = Document::from_bytes(&self.data, PDF_MIME)?;
        f(&doc)
    }
}

/// PDF magic: `%PDF`
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}
