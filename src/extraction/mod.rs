//! Extraction prompting
//!
//! Builds the fixed rate confirmation prompt around acquired text and submits
//! it to the completion service. No memory is kept between calls.

mod client;
mod prompt;
mod retry;

use std::sync::Arc;

pub use client::{CompletionClient, CompletionRequest, ModelError, OpenAiClient};
pub use prompt::{build_prompt, ExtractionPrompt, SYSTEM_ROLE};
pub use retry::RetryPolicy;

use crate::config::ModelConfig;

pub struct FieldExtractor {
    client: Arc<dyn CompletionClient>,
    model: String,
    temperature: f32,
    retry: RetryPolicy,
}

impl FieldExtractor {
    pub fn new(client: Arc<dyn CompletionClient>, config: &ModelConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            retry: config.retry.clone(),
        }
    }

    /// Ask the model for the templated summary of `text`
    ///
    /// Transient failures are retried per the configured policy; the last
    /// error is returned once it is exhausted.
    pub async fn extract_fields(&self, text: &str) -> Result<String, ModelError> {
        let prompt = build_prompt(text);
        let request = CompletionRequest {
            model: self.model.clone(),
            system: prompt.system,
            user: prompt.user,
            temperature: self.temperature,
        };

        let mut retries = 0;
        loop {
            match self.client.complete(&request).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_transient() && self.retry.should_retry(retries) => {
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    tracing::warn!(
                        retry = retries,
                        max = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Completion failed: {}, retrying",
                        e
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
