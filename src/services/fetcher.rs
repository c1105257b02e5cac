// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Outbound page fetching with browser-like headers and bounded retries.

use crate::models::config::ServiceConfig;
use crate::services::logging::redact_url;
use rand::seq::SliceRandom;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// User-Agent strings, one picked at random for every request.
pub const USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8";

/// Redirect hops followed before the request fails.
pub const MAX_REDIRECTS: usize = 5;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("timeout of {0:?} exceeded")]
    Timeout(Duration),
    #[error("HTTP {code} {reason}")]
    Status { code: u16, reason: String },
    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(timeout)
        } else {
            FetchError::Transport(error)
        }
    }
}

/// Response of the attempt that succeeded
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status_code: u16,
    pub body: String,
    /// Number of attempts made, including the successful one
    pub attempts_used: u32,
}

/// Pick one of [`USER_AGENTS`] uniformly at random.
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// HTTP fetcher shared by all requests. Holds no per-request state.
pub struct Fetcher {
    client: reqwest::Client,
    max_attempts: u32,
    retry_delay: Duration,
}

impl Fetcher {
    pub fn new(config: &ServiceConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
        })
    }

    /// Fetch `url`, retrying failed attempts with a linearly growing delay.
    ///
    /// Any status in `200..400` is a usable response. On the last failed attempt the
    /// error of that attempt is returned.
    pub async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchResult, FetchError> {
        url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(
                url = %redact_url(url),
                attempt,
                max_attempts = self.max_attempts,
                "Fetch attempt"
            );

            match self.fetch_once(url, timeout).await {
                Ok((status_code, body)) => {
                    info!(
                        url = %redact_url(url),
                        status_code,
                        bytes = body.len(),
                        attempt,
                        "Fetched page"
                    );
                    return Ok(FetchResult {
                        status_code,
                        body,
                        attempts_used: attempt,
                    });
                }
                Err(e) => {
                    warn!(url = %redact_url(url), attempt, error = %e, "Fetch attempt failed");
                    if attempt >= self.max_attempts {
                        return Err(e);
                    }
                    sleep(self.retry_delay * attempt).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, timeout: Duration) -> Result<(u16, String), FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .header(USER_AGENT, random_user_agent())
            .header(ACCEPT, ACCEPT_VALUE)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(ACCEPT_ENCODING, "gzip, deflate, br")
            .header(CACHE_CONTROL, "no-cache")
            .header(CONNECTION, "keep-alive")
            .header(UPGRADE_INSECURE_REQUESTS, "1")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !(200..400).contains(&status.as_u16()) {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        Ok((status.as_u16(), body))
    }
}
