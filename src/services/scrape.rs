// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Single-page scrape: fetch, reduce to text, extract links.

use crate::models::config::{ServiceConfig, TextMode};
use crate::models::scrape::{ErrorType, PageContent, ScrapeResult};
use crate::services::fetcher::{FetchError, Fetcher};
use crate::services::logging::redact_url;
use crate::services::{links, text};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A response in `201..400`, which carries no page to extract
    #[error("HTTP {code}: {reason}")]
    UnexpectedStatus { code: u16, reason: String },
    #[error("HTTP 200: empty response body")]
    EmptyBody,
}

impl ScrapeError {
    /// Classify the error for callers of the scrape endpoint.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ScrapeError::Fetch(FetchError::Timeout(_)) => ErrorType::Timeout,
            ScrapeError::Fetch(e) => e.status().map_or(ErrorType::Unknown, ErrorType::from_status),
            ScrapeError::UnexpectedStatus { code, .. } => ErrorType::from_status(*code),
            ScrapeError::EmptyBody => ErrorType::Unknown,
        }
    }
}

/// Scrapes one page per call. Stateless apart from the shared HTTP client.
pub struct ScrapeService {
    fetcher: Fetcher,
    text_mode: TextMode,
}

impl ScrapeService {
    pub fn new(config: &ServiceConfig) -> Result<Self, FetchError> {
        Ok(Self {
            fetcher: Fetcher::new(config)?,
            text_mode: config.text_mode,
        })
    }

    /// Scrape `url`, turning every failure into a `success: false` result.
    pub async fn scrape(&self, url: &str, instructions: &str, timeout: Duration) -> ScrapeResult {
        info!(url = %redact_url(url), "Scraping page");

        match self.scrape_page(url, timeout).await {
            Ok(page) => {
                info!(
                    url = %redact_url(url),
                    content_chars = page.main_content.chars().count(),
                    links = page.links.len(),
                    attempts = page.attempts_used,
                    "Scrape succeeded"
                );
                ScrapeResult::succeeded(url, instructions, page)
            }
            Err(e) => {
                let error_type = e.error_type();
                warn!(url = %redact_url(url), ?error_type, error = %e, "Scrape failed");
                ScrapeResult::failed(url, instructions, error_type, format!("Scrape failed: {e}"))
            }
        }
    }

    /// Fetch and extract, propagating the first error.
    pub async fn scrape_page(&self, url: &str, timeout: Duration) -> Result<PageContent, ScrapeError> {
        let fetched = self.fetcher.fetch(url, timeout).await?;

        if fetched.status_code != 200 {
            let reason = reqwest::StatusCode::from_u16(fetched.status_code)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default()
                .to_string();
            return Err(ScrapeError::UnexpectedStatus {
                code: fetched.status_code,
                reason,
            });
        }
        if fetched.body.is_empty() {
            return Err(ScrapeError::EmptyBody);
        }

        let main_content = text::reduce(&fetched.body, self.text_mode);
        let links = links::extract_links(&fetched.body, url);

        Ok(PageContent {
            main_content,
            links,
            attempts_used: fetched.attempts_used,
        })
    }
}
