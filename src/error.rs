//! Error types for the dispatch bot

use thiserror::Error;

use crate::extraction::ModelError;

/// Per-event pipeline failure
///
/// Every variant is caught at the intake boundary and turned into a chat
/// notice; none of them stops the process.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Too little text to be worth sending to the model
    #[error("only {chars} characters of text extracted (need {required})")]
    AcquisitionInsufficient { chars: usize, required: usize },

    /// Completion service failed or returned nothing
    #[error("{0}")]
    ModelUnavailable(#[from] ModelError),

    /// Attachment download or reply failed
    #[error("{0}")]
    TransportIo(#[from] TransportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Chat transport errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Failed to download attachment: {0}")]
    Download(String),

    #[error("Failed to send message: {0}")]
    Send(String),
}

/// Startup configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}
