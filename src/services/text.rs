// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Reduction of raw HTML to plain text.
//!
//! Markup is not validated. Unbalanced or malformed HTML is stripped on a best-effort
//! basis and may leave stray angle-bracket artifacts in the output.

use crate::models::config::TextMode;
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;

/// Maximum number of characters kept from the reduced text.
pub const MAX_CONTENT_CHARS: usize = 50_000;

/// Elements removed before the remaining tags are stripped, in removal order.
/// `true` means the element is removed together with everything up to its closing tag.
pub const REMOVED_ELEMENTS: [(&str, bool); 17] = [
    ("script", true),
    ("style", true),
    ("link", false),
    ("meta", false),
    ("img", false),
    ("video", true),
    ("audio", true),
    ("source", false),
    ("track", false),
    ("iframe", true),
    ("object", true),
    ("embed", false),
    ("canvas", true),
    ("svg", true),
    ("picture", true),
    ("noscript", true),
    ("template", true),
];

static REMOVAL_PASSES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    REMOVED_ELEMENTS
        .iter()
        .map(|(tag, with_contents)| {
            let pattern = if *with_contents {
                format!(r"(?is)<{tag}\b.*?</{tag}\s*>")
            } else {
                format!(r"(?i)<{tag}\b[^>]*>")
            };
            Regex::new(&pattern).expect("hardcoded regex pattern is valid")
        })
        .collect()
});

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("hardcoded regex pattern is valid"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex pattern is valid"));

/// Reduce HTML to plain text using the given strategy.
pub fn reduce(html: &str, mode: TextMode) -> String {
    match mode {
        TextMode::Regex => reduce_to_text(html),
        TextMode::Dom => reduce_to_text_dom(html),
    }
}

/// Strip markup with ordered regex passes, collapse whitespace and cap the length.
pub fn reduce_to_text(html: &str) -> String {
    let mut text = html.to_string();
    for pass in REMOVAL_PASSES.iter() {
        text = pass.replace_all(&text, " ").into_owned();
    }

    let text = ANY_TAG.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");

    truncate_chars(text.trim(), MAX_CONTENT_CHARS)
}

/// Parse the document and keep only text nodes outside the removed elements.
pub fn reduce_to_text_dom(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(content) = node.value().as_text() else {
            continue;
        };

        let removed = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| is_removed_element(element.name()))
        });
        if removed {
            continue;
        }

        text.push(' ');
        text.push_str(content);
    }

    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_chars(&collapsed, MAX_CONTENT_CHARS)
}

fn is_removed_element(name: &str) -> bool {
    REMOVED_ELEMENTS
        .iter()
        .any(|(tag, _)| tag.eq_ignore_ascii_case(name))
}

/// Keep at most `max` characters, never splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
