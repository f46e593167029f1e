//! Incoming chat events, resolved once at dispatch entry

/// What a chat message asks the bot to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomingEvent {
    Start { first_name: Option<String> },
    Help,
    Document {
        file_id: String,
        file_name: Option<String>,
    },
    Photo { file_id: String },
}

/// Supported commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

/// Recognize `/start` and `/help`, with or without a `@botname` suffix
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.split_whitespace().next()?;
    let name = word.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);

    match name.to_ascii_lowercase().as_str() {
        "start" => Some(Command::Start),
        "help" => Some(Command::Help),
        _ => None,
    }
}

/// A document is routed to the PDF pipeline when its declared MIME type is
/// `application/pdf`; without a MIME type the filename extension decides
pub fn is_pdf_document(mime_type: Option<&str>, file_name: Option<&str>) -> bool {
    match mime_type {
        Some(mime) => mime.eq_ignore_ascii_case("application/pdf"),
        None => file_name
            .map(|name| name.to_ascii_lowercase().ends_with(".pdf"))
            .unwrap_or(false),
    }
}
