// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fetch strategy reported in every scrape result.
pub const SCRAPE_METHOD: &str = "http";

/// Request to scrape a single page
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScrapeRequest {
    /// Absolute URL of the page to fetch
    pub url: Option<String>,
    /// Opaque caller instructions, echoed back unchanged
    pub instructions: Option<String>,
}

/// Classification of a failed scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The request did not complete within its timeout
    Timeout,
    /// The site answered 403
    Blocked,
    /// The site answered 429
    RateLimit,
    /// The site answered 503
    ServiceUnavailable,
    /// Anything else
    Unknown,
}

impl ErrorType {
    /// Map an HTTP status to its error class.
    pub fn from_status(code: u16) -> Self {
        match code {
            403 => ErrorType::Blocked,
            429 => ErrorType::RateLimit,
            503 => ErrorType::ServiceUnavailable,
            _ => ErrorType::Unknown,
        }
    }
}

/// Text and links extracted from a successfully fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub main_content: String,
    pub links: Vec<String>,
    pub attempts_used: u32,
}

/// Result of a single-page scrape. Failures are reported here rather than as
/// HTTP errors, so `success` must be checked by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: String,
    pub instructions: String,
    pub success: bool,
    pub method: String,
    /// Plain-text rendering of the page, at most 50,000 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    /// Up to 10 distinct absolute links, in first-seen order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links_found: Option<usize>,
    /// Absent on failure: attempts ran out before any response was usable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScrapeResult {
    pub fn succeeded(url: &str, instructions: &str, page: PageContent) -> Self {
        let content_length = page.main_content.chars().count();
        let links_found = page.links.len();
        Self {
            url: url.to_string(),
            instructions: instructions.to_string(),
            success: true,
            method: SCRAPE_METHOD.to_string(),
            main_content: Some(page.main_content),
            links: Some(page.links),
            content_length: Some(content_length),
            links_found: Some(links_found),
            attempts_used: Some(page.attempts_used),
            error_type: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(url: &str, instructions: &str, error_type: ErrorType, message: String) -> Self {
        Self {
            url: url.to_string(),
            instructions: instructions.to_string(),
            success: false,
            method: SCRAPE_METHOD.to_string(),
            main_content: None,
            links: None,
            content_length: None,
            links_found: None,
            attempts_used: None,
            error_type: Some(error_type),
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
