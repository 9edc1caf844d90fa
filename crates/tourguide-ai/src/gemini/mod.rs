//! Google Gemini API client.
//!
//! Implements [`GenerationClient`](crate::GenerationClient) against the
//! Generative Language REST API.

mod api;
mod client;
mod config;

pub use client::GeminiClient;
pub use config::GeminiConfig;
