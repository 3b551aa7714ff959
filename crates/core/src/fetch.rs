//! Content fetching from URLs, files, and stdin.
//!
//! Every source yields raw bytes: decoding is left to
//! [`encoding::resolve`](crate::encoding::resolve) because archive pages
//! routinely lie about their charset.

use std::fs;
use std::path::PathBuf;

#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::{Client, header};
#[cfg(feature = "fetch")]
use tracing::{debug, info};

use crate::{AaviewError, Result};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// HTTP client configuration for fetching thread pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Raw response plus the metadata decoding needs.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Response body, undecoded.
    pub bytes: Vec<u8>,
    /// `Content-Type` header, if the server sent one.
    pub content_type: Option<String>,
    /// URL after redirects.
    pub final_url: String,
}

/// Fetches a page from an absolute http(s) URL.
///
/// Non-success statuses are errors, so a 404 page is never mistaken for an
/// empty thread.
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<FetchedPage> {
    let parsed_url = url::Url::parse(url).map_err(|e| AaviewError::InvalidUrl(format!("{}: {}", url, e)))?;

    if !matches!(parsed_url.scheme(), "http" | "https") {
        return Err(AaviewError::InvalidUrl(
            "URL must include a scheme (http:// or https://)".to_string(),
        ));
    }

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(AaviewError::HttpError)?;

    debug!(url = %parsed_url, timeout = config.timeout, "fetching");

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() { AaviewError::Timeout { timeout: config.timeout } } else { AaviewError::HttpError(e) }
    };

    let response = client
        .get(parsed_url)
        .header(header::USER_AGENT, &config.user_agent)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header(header::ACCEPT_LANGUAGE, "ja,en-US;q=0.8,en;q=0.5")
        .send()
        .await
        .map_err(map_err)?;

    let status = response.status();
    let final_url = response.url().to_string();
    if !status.is_success() {
        return Err(AaviewError::HttpStatus { status: status.as_u16(), url: final_url });
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let bytes = response.bytes().await.map_err(map_err)?.to_vec();
    info!(url = %final_url, bytes = bytes.len(), content_type = ?content_type, "fetched page");

    Ok(FetchedPage { bytes, content_type, final_url })
}

/// Reads raw page bytes from a local file.
pub fn read_file(path: &str) -> Result<Vec<u8>> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(AaviewError::FileNotFound(path_buf))
    } else {
        fs::read(&path_buf).map_err(AaviewError::from)
    }
}

/// Reads raw page bytes from standard input until EOF.
pub fn read_stdin() -> Result<Vec<u8>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer).map_err(AaviewError::from)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 15);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_invalid() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_url("not-a-url", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(AaviewError::InvalidUrl(_))));
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_fetch_url_rejects_other_schemes() {
        let config = FetchConfig::default();
        let result = std::thread::spawn(move || {
            tokio::runtime::Runtime::new()
                .unwrap()
                .block_on(fetch_url("ftp://example.com/file", &config))
        })
        .join()
        .unwrap();

        assert!(matches!(result, Err(AaviewError::InvalidUrl(_))));
    }

    #[test]
    fn test_read_file_not_found() {
        let result = read_file("/nonexistent/path/file.html");
        assert!(matches!(result, Err(AaviewError::FileNotFound(_))));
    }

    #[test]
    fn test_read_file_keeps_raw_bytes() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let bytes = [0x82, 0xE2, 0x82, 0xE9, 0x0A];
        std::fs::write(tmp.path(), bytes).unwrap();

        let read = read_file(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(read, bytes);
    }
}
