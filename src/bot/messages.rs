//! User-facing message texts

use crate::document::AttachmentKind;

/// Onboarding reply to `/start`
pub fn greeting(first_name: Option<&str>) -> String {
    format!(
        "👋 Hey {}!\n\n\
         I'm your Dispatch Assistant Bot 🚛\n\n\
         Send me a Rate Confirmation PDF or an image of one, \
         and I'll extract key info for you — Load#, REF#, PU/DEL, Rate, Miles, and Notes.\n\n\
         📎 Just upload your file and I'll handle the rest!\n\n\
         Need help? Type /help",
        first_name.unwrap_or("there")
    )
}

pub const HELP: &str = "📎 Send a rate confirmation as a PDF document or as a photo.\n\n\
    I'll read it (using OCR for scans and photos) and reply with Load#, REF#, \
    pickup and delivery details, rate, miles and notes.\n\n\
    Tip: a clear, well-lit photo or the original PDF gives the best results.";

/// Progress acknowledgment sent right after the download
pub fn received(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Pdf => "📄 PDF received. Extracting info... Please wait ⏳",
        AttachmentKind::Image => "📷 Image received. Reading text... Please wait ⏳",
    }
}

/// Notice for attachments that yielded too little text
pub fn could_not_extract(kind: AttachmentKind) -> &'static str {
    match kind {
        AttachmentKind::Pdf => {
            "❌ Could not extract text from this PDF. Please send a clearer copy."
        }
        AttachmentKind::Image => {
            "❌ Could not extract text from image. Please send a clearer photo or the PDF."
        }
    }
}

/// Generic failure notice carrying the underlying description
pub fn error_notice(kind: AttachmentKind, description: &str) -> String {
    match kind {
        AttachmentKind::Pdf => format!("⚠️ Error: {}", description),
        AttachmentKind::Image => format!("⚠️ Error processing image: {}", description),
    }
}
