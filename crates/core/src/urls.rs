//! Turning what people type into fetchable URLs.
//!
//! Thread archives are usually linked with the leading `h` (or `ht`) of the
//! scheme stripped, e.g. `ttp://example.com/...`, so that the board software
//! does not auto-link them. Those forms are restored here.

use url::Url;

use crate::{AaviewError, Result};

/// Truncated scheme prefixes and their full forms, longest first.
const TRUNCATED_SCHEMES: [(&str, &str); 4] =
    [("ttps://", "https://"), ("tps://", "https://"), ("ttp://", "http://"), ("tp://", "http://")];

/// Path suffixes that mark input as a document address even without a dot-separated host.
const DOCUMENT_EXTENSIONS: [&str; 4] = [".html", ".htm", ".dat", ".cgi"];

/// Normalizes raw user input into an absolute URL string.
///
/// Input that matches none of the rewrite rules is returned trimmed but
/// otherwise unchanged; [`parse_fetch_url`] reports the error later.
///
/// # Example
///
/// ```rust
/// use aaview_core::urls::normalize_url;
///
/// assert_eq!(normalize_url("ttp://example.com/1.html"), "http://example.com/1.html");
/// assert_eq!(normalize_url("example.com/kako/1.html"), "http://example.com/kako/1.html");
/// ```
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_ascii_lowercase();

    if lower.starts_with("http://") || lower.starts_with("https://") {
        return trimmed.to_string();
    }

    for (truncated, full) in TRUNCATED_SCHEMES {
        if lower.starts_with(truncated) {
            return format!("{}{}", full, &trimmed[truncated.len()..]);
        }
    }

    let has_scheme = trimmed.contains("://");
    let looks_like_host = trimmed.contains('.') || DOCUMENT_EXTENSIONS.iter().any(|ext| lower.ends_with(ext));
    if !has_scheme && !trimmed.is_empty() && looks_like_host {
        return format!("http://{}", trimmed);
    }

    trimmed.to_string()
}

/// Whether `text` is an absolute http(s) URL.
pub fn looks_like_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
}

/// Normalizes `input` and parses it, rejecting anything that is not http(s).
pub fn parse_fetch_url(input: &str) -> Result<Url> {
    let normalized = normalize_url(input);
    if normalized.is_empty() {
        return Err(AaviewError::InvalidUrl("empty input".to_string()));
    }

    let url = Url::parse(&normalized).map_err(|e| AaviewError::InvalidUrl(format!("{}: {}", normalized, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AaviewError::InvalidUrl(format!(
            "{}: URL must use http:// or https://",
            normalized
        )));
    }

    Ok(url)
}
