// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Service configuration.
//!
//! Parsed once at start-up from command-line flags, each of which falls back to an
//! environment variable. The resulting value is shared read-only by every component.

use clap::{Parser, ValueEnum};
use std::time::Duration;

/// How raw HTML is reduced to plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextMode {
    /// Ordered regex passes over the raw markup.
    Regex,
    /// Parse into a DOM and collect text outside the removed elements.
    Dom,
}

impl std::fmt::Display for TextMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Err(std::fmt::Error),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "scrape-agent")]
#[command(about = "HTTP microservice that fetches pages and returns their text and links")]
#[command(version)]
pub struct ServiceConfig {
    /// Interface to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Per-attempt timeout for single-page scrapes
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 30)]
    pub fetch_timeout_secs: u64,

    /// Per-attempt timeout for pages fetched by the batch endpoint
    #[arg(long, env = "BATCH_FETCH_TIMEOUT_SECS", default_value_t = 45)]
    pub batch_fetch_timeout_secs: u64,

    /// Total fetch attempts per page, including the first
    #[arg(long, env = "MAX_ATTEMPTS", default_value_t = 2)]
    pub max_attempts: u32,

    /// Base delay of the linear retry backoff; attempt k waits k times this
    #[arg(long, env = "RETRY_DELAY_MS", default_value_t = 2000)]
    pub retry_delay_ms: u64,

    /// Pause between consecutive URLs of a batch
    #[arg(long, env = "BATCH_DELAY_MS", default_value_t = 3000)]
    pub batch_delay_ms: u64,

    /// Maximum URLs processed per batch request; extra URLs are ignored
    #[arg(long, env = "MAX_BATCH_URLS", default_value_t = 3)]
    pub max_batch_urls: usize,

    /// Text reduction strategy
    #[arg(long, env = "TEXT_MODE", value_enum, default_value_t = TextMode::Regex)]
    pub text_mode: TextMode,

    /// Log filter directive (tracing EnvFilter syntax)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            fetch_timeout_secs: 30,
            batch_fetch_timeout_secs: 45,
            max_attempts: 2,
            retry_delay_ms: 2000,
            batch_delay_ms: 3000,
            max_batch_urls: 3,
            text_mode: TextMode::Regex,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn batch_fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_fetch_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    /// Socket address string the server binds to, e.g. `0.0.0.0:3001`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
