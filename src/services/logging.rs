// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction helpers.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

/// Install the global tracing subscriber. `filter` uses `EnvFilter` syntax,
/// e.g. `info` or `scrape_agent=debug,tower_http=info`.
pub fn init_logging(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

/// Hide query string and fragment of a URL for logging: "https://a.com/p?***".
/// Query parameters regularly carry session ids and signed tokens.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return redact_unparsed(url);
    };

    let had_query = parsed.query().is_some();
    parsed.set_query(None);
    parsed.set_fragment(None);

    if had_query {
        format!("{parsed}?***")
    } else {
        parsed.into()
    }
}

fn redact_unparsed(url: &str) -> String {
    match url.find(['?', '#']) {
        Some(index) if url[index..].starts_with('?') => format!("{}?***", &url[..index]),
        Some(index) => url[..index].to_string(),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_url_hides_query() {
        assert_eq!(
            redact_url("https://example.com/page?token=secret"),
            "https://example.com/page?***"
        );
    }

    #[test]
    fn test_redact_url_drops_fragment() {
        assert_eq!(redact_url("https://example.com/page#top"), "https://example.com/page");
    }

    #[test]
    fn test_redact_url_without_query() {
        assert_eq!(redact_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn test_redact_url_query_inside_fragment_is_not_a_query() {
        assert_eq!(
            redact_url("https://example.com/app#/view?id=7"),
            "https://example.com/app"
        );
    }

    #[test]
    fn test_redact_url_keeps_port_and_path() {
        assert_eq!(
            redact_url("https://example.com:8443/a/b?x=1#frag"),
            "https://example.com:8443/a/b?***"
        );
    }

    #[test]
    fn test_redact_url_not_a_url() {
        assert_eq!(redact_url("not a url?x=1"), "not a url?***");
    }

    #[test]
    fn test_init_logging_rejects_bad_filter() {
        assert!(init_logging("scrape_agent=notalevel").is_err());
    }
}
