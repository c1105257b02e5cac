// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::batch::{BatchEntry, BatchResult};
use crate::models::config::ServiceConfig;
use crate::services::logging::redact_url;
use crate::services::scrape::ScrapeService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

/// Scrapes a short list of URLs strictly one after another, pausing between them
/// so the target site never sees a burst.
pub struct BatchDriver {
    scrape_service: Arc<ScrapeService>,
    max_urls: usize,
    delay: Duration,
    timeout: Duration,
}

impl BatchDriver {
    pub fn new(scrape_service: Arc<ScrapeService>, config: &ServiceConfig) -> Self {
        Self {
            scrape_service,
            max_urls: config.max_batch_urls,
            delay: config.batch_delay(),
            timeout: config.batch_fetch_timeout(),
        }
    }

    /// Scrape the first `max_urls` entries of `urls`. A failing URL is recorded and
    /// the batch moves on.
    pub async fn run(
        &self,
        urls: &[String],
        instructions: &str,
        main_url: Option<String>,
    ) -> BatchResult {
        let to_process = &urls[..urls.len().min(self.max_urls)];
        info!(
            requested = urls.len(),
            processing = to_process.len(),
            "Processing batch"
        );

        let mut entries = Vec::with_capacity(to_process.len());
        for (i, url) in to_process.iter().enumerate() {
            info!(
                "[{}/{}] Processing: {}",
                i + 1,
                to_process.len(),
                redact_url(url)
            );

            let result = self
                .scrape_service
                .scrape(url, instructions, self.timeout)
                .await;
            entries.push(BatchEntry::from(result));

            if i + 1 < to_process.len() {
                sleep(self.delay).await;
            }
        }

        let result = BatchResult::from_entries(entries, instructions, main_url);
        info!(
            successful = result.successful,
            failed = result.failed,
            "Batch finished"
        );
        result
    }
}
