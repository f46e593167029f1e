//! OCR Module
//!
//! Optical character recognition for photos and for PDF pages that carry no
//! usable text layer.
//!
//! Supports multiple backends, tried in configured order:
//! - Tesseract (local, requires the `tesseract` binary)
//! - Ollama vision models (local LLM)

mod provider;
mod service;
mod types;

pub use provider::{OcrProviderTrait, OllamaProvider, TesseractProvider};
pub use service::OcrService;
pub use types::{OcrError, OcrProvider, OcrResult};

#[cfg(test)]
pub(crate) use provider::MockProvider;
