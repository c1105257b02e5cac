// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Link candidate extraction and normalization.
//!
//! Candidates are collected from `href`, `src` and `action` attributes of the raw
//! markup, cleaned, resolved against the page URL and filtered down to a short,
//! deduplicated list in first-seen order.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Maximum number of links returned for a page.
pub const MAX_LINKS: usize = 10;

/// Attribute patterns, scanned one after another (not interleaved by position).
static ATTRIBUTE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [r"href", r"src", r"action"].map(|attr| {
        Regex::new(&format!(r#"(?i){attr}=["']([^"']+)["']"#))
            .expect("hardcoded regex pattern is valid")
    })
});

const IGNORED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// File extensions that never point at a page worth scraping.
const RESOURCE_EXTENSIONS: &[&str] = &[
    // images
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".webp", ".svg", ".ico", ".tiff", ".avif",
    // video
    ".mp4", ".webm", ".avi", ".mov", ".mkv", ".flv", ".wmv",
    // audio
    ".mp3", ".wav", ".ogg", ".flac", ".aac", ".m4a",
    // archives
    ".zip", ".rar", ".7z", ".tar", ".gz",
    // executables
    ".exe", ".msi", ".dmg", ".apk",
    // office documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx",
    // fonts
    ".woff", ".woff2", ".ttf", ".otf", ".eot",
    // stylesheets
    ".css",
];

const RESOURCE_MARKERS: [&str; 5] = [
    "favicon",
    "/css/",
    ".css?",
    "fonts.googleapis.com",
    "fonts.gstatic.com",
];

/// Asset hosts whose links are always dropped.
const BLOCKED_HOSTS: [&str; 6] = [
    "fonts.googleapis.com",
    "fonts.gstatic.com",
    "cdnjs.cloudflare.com",
    "stackpath.bootstrapcdn.com",
    "maxcdn.bootstrapcdn.com",
    "ajax.googleapis.com",
];

/// Substrings that make a host count as a "common" domain.
const COMMON_DOMAIN_MARKERS: [&str; 3] = [".com", ".org", ".net"];

/// Extract up to [`MAX_LINKS`] distinct absolute links from raw HTML.
///
/// Any candidate that cannot be resolved or parsed is dropped silently. An
/// unparseable `base_url` therefore yields no links.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for candidate in raw_candidates(html) {
        let Some(link) = resolve_candidate(candidate, &base) else {
            continue;
        };
        if !is_allowed_host(&link, &base) {
            continue;
        }
        if seen.insert(link.clone()) {
            links.push(link);
            if links.len() == MAX_LINKS {
                break;
            }
        }
    }

    links
}

/// Captured attribute values: every `href`, then every `src`, then every `action`.
pub fn raw_candidates(html: &str) -> impl Iterator<Item = &str> {
    ATTRIBUTE_PATTERNS.iter().flat_map(move |pattern| {
        pattern
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    })
}

/// Clean one raw value and turn it into an absolute URL string.
fn resolve_candidate(raw: &str, base: &Url) -> Option<String> {
    let without_fragment = raw.split('#').next().unwrap_or_default();
    let clean = without_fragment.split('?').next().unwrap_or_default();

    if clean.trim().is_empty() || clean == "/" || clean == "#" {
        return None;
    }
    if IGNORED_SCHEMES.iter().any(|scheme| clean.starts_with(scheme)) {
        return None;
    }
    if is_filtered_resource(clean) {
        return None;
    }

    let origin = base.origin().ascii_serialization();

    if clean.starts_with('/') {
        return Some(format!("{origin}{clean}"));
    }
    if clean.starts_with("http") {
        return Some(clean.to_string());
    }
    if clean.contains('.') || clean.chars().count() > 3 {
        let path = base.path();
        let separator = if path.ends_with('/') { "" } else { "/" };
        return Some(format!("{origin}{path}{separator}{clean}"));
    }

    None
}

/// True for links to static assets (media, archives, documents, fonts, styles).
pub fn is_filtered_resource(link: &str) -> bool {
    let lower = link.to_lowercase();
    RESOURCE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
        || RESOURCE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Keep same-host links and loosely matched common domains, minus asset CDNs.
///
/// The common-domain test is a plain substring match on the host, so
/// `shop.community.io` passes because it contains `.com`.
fn is_allowed_host(link: &str, base: &Url) -> bool {
    let Ok(parsed) = Url::parse(link) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    if BLOCKED_HOSTS.contains(&host) {
        return false;
    }

    let same_host = base.host_str() == Some(host);
    let common_domain = COMMON_DOMAIN_MARKERS
        .iter()
        .any(|marker| host.contains(marker));

    same_host || common_domain
}
