//! Dispatch assistant
//!
//! Receives freight rate confirmations (PDF or photo) over Telegram, turns
//! them into plain text (text layer, or OCR for scans and photos), asks a
//! language model to fill a fixed dispatch template and relays the answer.
//!
//! # Modules
//!
//! - `acquisition`: attachment to plain text, with OCR fallback
//! - `extraction`: prompt template and completion client
//! - `bot`: event routing, intake pipeline and the Telegram transport
//! - `health`: liveness endpoint

pub mod acquisition;
pub mod bot;
pub mod config;
pub mod document;
pub mod error;
pub mod extraction;
pub mod health;
pub mod ocr;
pub mod pdf;

mod mupdf;
