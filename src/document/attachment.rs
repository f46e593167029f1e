//! Incoming attachments and their scoped local copies

use std::path::{Path, PathBuf};

/// Byte budget for the sanitized name inside a temp file name, well under
/// the 255-byte component limit once the chat and nonce prefix is added
const MAX_NAME_BYTES: usize = 100;

/// Longest extension kept intact when a name is shortened
const MAX_EXTENSION_BYTES: usize = 16;

/// Kind of attachment, resolved once when the event arrives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// PDF document (text layer first, OCR fallback)
    Pdf,
    /// Photo or other raster image (OCR only)
    Image,
}

impl AttachmentKind {
    /// Human-readable label used in logs and notices
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Image => "image",
        }
    }
}

/// Raw attachment content handed to text acquisition
#[derive(Debug, Clone)]
pub struct Attachment {
    pub kind: AttachmentKind,
    /// Declared filename or transport file identifier
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(kind: AttachmentKind, name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            name: name.into(),
            bytes,
        }
    }
}

/// Local copy of an attachment that lives exactly as long as its handler
///
/// The file is removed when the guard drops, on every exit path. A file that
/// was never written (download failed) or is already gone is not an error.
#[derive(Debug)]
pub struct TempAttachment {
    path: PathBuf,
}

impl TempAttachment {
    /// Reserve a collision-free path for one event's attachment
    ///
    /// The name is `temp_<chat>_<nonce>_<name>`; the nonce keeps two uploads of
    /// the same filename into one chat apart. Long names are shortened so the
    /// path stays creatable.
    pub fn reserve(dir: &Path, conversation: i64, name: &str) -> Self {
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let file_name = format!(
            "temp_{}_{}_{}",
            conversation,
            &nonce[..8],
            truncate_file_name(&sanitize_file_name(name), MAX_NAME_BYTES)
        );
        Self {
            path: dir.join(file_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the downloaded copy back into memory
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }
}

impl Drop for TempAttachment {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("Removed temporary file {}", self.path.display()),
            Err(e) => tracing::warn!(
                "Failed to remove temporary file {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Reduce a transport-supplied name to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Shorten an ASCII file name to `max` bytes, keeping a short extension
fn truncate_file_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }

    let extension = name
        .rfind('.')
        .map(|dot| &name[dot..])
        .filter(|ext| ext.len() <= MAX_EXTENSION_BYTES)
        .unwrap_or("");
    let stem = &name[..name.len() - extension.len()];
    let keep = max.saturating_sub(extension.len()).min(stem.len());
    format!("{}{}", &stem[..keep], extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_.._etc_passwd");
        assert_eq!(sanitize_file_name("Rate Conf #42.pdf"), "Rate_Conf__42.pdf");
        assert_eq!(sanitize_file_name("..."), "attachment");
        assert_eq!(sanitize_file_name(""), "attachment");
    }

    #[test]
    fn test_reserve_names_are_unique_and_scoped() {
        let dir = tempfile::tempdir().unwrap();
        let a = TempAttachment::reserve(dir.path(), 7, "load.pdf");
        let b = TempAttachment::reserve(dir.path(), 7, "load.pdf");

        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().parent(), Some(dir.path()));

        let name = a.path().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("temp_7_"));
        assert!(name.ends_with("_load.pdf"));
    }

    #[test]
    fn test_truncate_keeps_extension() {
        let long = format!("{}.pdf", "R".repeat(300));
        let short = truncate_file_name(&long, 100);
        assert_eq!(short.len(), 100);
        assert!(short.ends_with("RRR.pdf"));

        assert_eq!(truncate_file_name("load.pdf", 100), "load.pdf");

        let odd_extension = format!("a.{}", "x".repeat(200));
        assert_eq!(truncate_file_name(&odd_extension, 100).len(), 100);
    }

    #[test]
    fn test_long_declared_name_is_still_writable() {
        let dir = tempfile::tempdir().unwrap();
        let name = format!("{}.pdf", "R".repeat(300));
        let temp = TempAttachment::reserve(dir.path(), -1001234567890, &name);

        let file_name = temp.path().file_name().unwrap().to_str().unwrap();
        assert!(file_name.len() < 255);
        assert!(file_name.starts_with("temp_-1001234567890_"));
        assert!(file_name.ends_with(".pdf"));

        std::fs::write(temp.path(), b"%PDF-1.4").unwrap();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = {
            let temp = TempAttachment::reserve(dir.path(), 1, "a.jpg");
            std::fs::write(temp.path(), b"bytes").unwrap();
            assert!(temp.path().exists());
            temp.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_drop_without_file_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let temp = TempAttachment::reserve(dir.path(), 1, "never-written.pdf");
        let path = temp.path().to_path_buf();
        drop(temp);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_read_returns_written_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let temp = TempAttachment::reserve(dir.path(), 3, "x.pdf");
        tokio::fs::write(temp.path(), b"%PDF-1.4").await.unwrap();
        assert_eq!(temp.read().await.unwrap(), b"%PDF-1.4");
    }
}
