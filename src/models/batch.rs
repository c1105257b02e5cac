// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::{ErrorType, ScrapeResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request to scrape several pages one after another
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BatchRequest {
    /// Pages to scrape; only the first few are processed
    pub urls: Option<Vec<String>>,
    pub instructions: Option<String>,
    /// Page the batch was derived from, echoed back
    pub main_url: Option<String>,
}

/// Outcome for one URL of a batch
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntry {
    pub success: bool,
    pub url: String,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
}

impl From<ScrapeResult> for BatchEntry {
    fn from(result: ScrapeResult) -> Self {
        Self {
            success: result.success,
            url: result.url,
            instructions: result.instructions,
            main_content: result.main_content,
            content_length: result.content_length,
            links: result.links,
            error: result.error,
            error_type: result.error_type,
        }
    }
}

/// Aggregated result of a batch scrape
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// True when at least one URL succeeded
    pub success: bool,
    pub instructions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_url: Option<String>,
    pub urls_processed: usize,
    pub successful: usize,
    pub failed: usize,
    /// Text of every successful page, each under a `--- URL: <url> ---` header
    pub combined_content: String,
    pub total_content_length: usize,
    pub all_results: Vec<BatchEntry>,
}

impl BatchResult {
    pub fn from_entries(
        entries: Vec<BatchEntry>,
        instructions: &str,
        main_url: Option<String>,
    ) -> Self {
        let successful = entries.iter().filter(|e| e.success).count();

        let combined_content = entries
            .iter()
            .filter(|e| e.success)
            .map(|e| {
                format!(
                    "--- URL: {} ---\n{}",
                    e.url,
                    e.main_content.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            success: successful > 0,
            instructions: instructions.to_string(),
            main_url,
            urls_processed: entries.len(),
            successful,
            failed: entries.len() - successful,
            total_content_length: combined_content.chars().count(),
            combined_content,
            all_results: entries,
        }
    }
}
