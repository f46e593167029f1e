//! Dispatch assistant bot
//!
//! Long-polls Telegram for rate confirmations and serves a liveness endpoint
//! on a separate thread.

use std::sync::Arc;

use anyhow::Context;
use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ratecon_bot::acquisition::TextAcquirer;
use ratecon_bot::bot::{self, IntakePipeline};
use ratecon_bot::config::Config;
use ratecon_bot::extraction::{FieldExtractor, OpenAiClient};
use ratecon_bot::health;
use ratecon_bot::ocr::OcrService;
use ratecon_bot::pdf::MuPdfLoader;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratecon_bot=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Starting dispatch bot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Model: {} ({})", config.model.model, config.model.base_url);
    tracing::info!(
        "OCR: {:?} [{}], text layer threshold {} chars, raster scale {}",
        config.ocr.providers,
        config.ocr.language,
        config.acquisition.min_text_chars,
        config.acquisition.raster_scale
    );

    let listener = health::bind(config.server.port)
        .with_context(|| format!("Failed to bind liveness port {}", config.server.port))?;
    health::spawn(listener).context("Failed to start liveness thread")?;

    let ocr = Arc::new(OcrService::new(&config.ocr));
    let available = ocr.available_providers().await;
    if available.is_empty() {
        tracing::warn!("No OCR provider is reachable; scanned PDFs and photos will be rejected");
    } else {
        tracing::info!("OCR providers available: {:?}", available);
    }

    let acquirer = TextAcquirer::new(Arc::new(MuPdfLoader), ocr, config.acquisition.clone());
    let client = OpenAiClient::new(&config.model).context("Failed to build completion client")?;
    let extractor = FieldExtractor::new(Arc::new(client), &config.model);
    let pipeline = Arc::new(IntakePipeline::new(
        acquirer,
        extractor,
        config.acquisition.min_viable_chars,
        config.temp_dir.clone(),
    ));

    bot::run(Bot::new(&config.telegram.bot_token), pipeline).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
