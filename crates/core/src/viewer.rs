//! The full page-to-posts pipeline.
//!
//! One call runs decode → parse → extract → filter → range in order and
//! either returns a complete [`ThreadView`] or stops at the first failing
//! stage. Nothing is cached between calls.
//!
//! # Example
//!
//! ```rust
//! use aaview_core::{RangeMode, Viewer, ViewerConfig};
//!
//! let html = "<dl><dt>1 ◆abc</dt><dd>hi<br>there</dd><dt>2</dt><dd>reply</dd><dt>3</dt><dd>noise</dd></dl>";
//! let config = ViewerConfig::builder().anchor_only(true).range(RangeMode::All).build();
//! let view = Viewer::with_config(config).view_html(html, None).unwrap();
//!
//! assert_eq!(view.posts.len(), 2);
//! assert_eq!(view.posts[0].body_text, "hi\nthere");
//! ```

use tracing::info;

use crate::encoding::resolve;
use crate::extract::{ExtractConfig, extract_posts};
use crate::fetch::FetchConfig;
use crate::filter::filter_posts;
use crate::parse::Document;
use crate::range::{RangeMode, select_range};
use crate::thread::ThreadView;
use crate::{AaviewError, Result};

#[cfg(feature = "fetch")]
use crate::fetch::fetch_url;
#[cfg(feature = "fetch")]
use crate::urls::parse_fetch_url;

/// Configuration for one pass through the pipeline.
///
/// # Example
///
/// ```rust
/// use aaview_core::{RangeMode, ViewerConfig};
///
/// let config = ViewerConfig::builder()
///     .anchor_only(true)
///     .range(RangeMode::bounded(401, 400))
///     .timeout(10)
///     .build();
/// assert_eq!(config.fetch.timeout, 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    /// How posts are located in the document.
    pub extract: ExtractConfig,

    /// Keep only anchor posts and their direct follow-ups (default: false).
    pub anchor_only: bool,

    /// Which window of posts to return (default: posts 1-400).
    pub range: RangeMode,

    /// HTTP settings used by [`Viewer::fetch_and_view`].
    pub fetch: FetchConfig,
}

impl ViewerConfig {
    /// Creates a new builder for ViewerConfig.
    pub fn builder() -> ViewerConfigBuilder {
        ViewerConfigBuilder::new()
    }
}

/// Builder for ViewerConfig.
pub struct ViewerConfigBuilder {
    config: ViewerConfig,
}

impl ViewerConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ViewerConfig::default() }
    }

    /// Sets the CSS selector for post headers.
    pub fn header_selector(mut self, value: impl Into<String>) -> Self {
        self.config.extract.header_selector = value.into();
        self
    }

    /// Sets the CSS selector for post bodies.
    pub fn body_selector(mut self, value: impl Into<String>) -> Self {
        self.config.extract.body_selector = value.into();
        self
    }

    /// Sets the character that marks anchor posts.
    pub fn anchor_marker(mut self, value: char) -> Self {
        self.config.extract.anchor_marker = value;
        self
    }

    /// Sets whether only anchor posts and their follow-ups are kept.
    pub fn anchor_only(mut self, value: bool) -> Self {
        self.config.anchor_only = value;
        self
    }

    /// Sets the range of posts to return.
    pub fn range(mut self, value: RangeMode) -> Self {
        self.config.range = value;
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.fetch.timeout = value;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Builds the config.
    pub fn build(self) -> ViewerConfig {
        self.config
    }
}

impl Default for ViewerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for turning thread pages into posts.
pub struct Viewer {
    config: ViewerConfig,
}

impl Viewer {
    /// Creates a Viewer with default settings.
    pub fn new() -> Self {
        Self { config: ViewerConfig::default() }
    }

    /// Creates a Viewer with a custom configuration.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self { config }
    }

    /// Runs the pipeline over already-decoded HTML.
    ///
    /// # Errors
    ///
    /// [`AaviewError::NoPosts`] when the page has no posts and
    /// [`AaviewError::EmptySelection`] when filtering or the range left
    /// nothing to show.
    pub fn view_html(&self, html: &str, source: Option<&str>) -> Result<ThreadView> {
        self.view_decoded(html, "UTF-8", source)
    }

    /// Decodes raw page bytes, then runs the pipeline.
    ///
    /// `content_type` is the HTTP `Content-Type` header when there is one.
    pub fn view_bytes(&self, bytes: &[u8], content_type: Option<&str>, source: Option<&str>) -> Result<ThreadView> {
        let decoded = resolve(bytes, content_type);
        self.view_decoded(&decoded.text, decoded.encoding, source)
    }

    /// Normalizes `input` into a URL, fetches it, and runs the pipeline.
    ///
    /// The returned view's `source` is the URL the page was served from,
    /// after redirects.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_view(&self, input: &str) -> Result<ThreadView> {
        let url = parse_fetch_url(input)?;
        let page = fetch_url(url.as_str(), &self.config.fetch).await?;
        self.view_bytes(&page.bytes, page.content_type.as_deref(), Some(&page.final_url))
    }

    fn view_decoded(&self, html: &str, encoding: &str, source: Option<&str>) -> Result<ThreadView> {
        let doc = Document::parse(html);
        let posts = extract_posts(&doc, &self.config.extract)?;
        if posts.is_empty() {
            return Err(AaviewError::NoPosts);
        }

        let total_posts = posts.len();
        let filtered = filter_posts(posts, self.config.anchor_only);
        let selection = select_range(filtered, self.config.range);
        if selection.posts.is_empty() {
            return Err(AaviewError::EmptySelection { label: selection.label });
        }

        info!(
            total = total_posts,
            shown = selection.posts.len(),
            range = %selection.label,
            anchor_only = self.config.anchor_only,
            "thread view ready"
        );

        Ok(ThreadView {
            source: source.map(str::to_string),
            title: doc.title(),
            encoding: encoding.to_string(),
            total_posts,
            label: selection.label,
            truncation: selection.truncation,
            posts: selection.posts,
        })
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function for one-liner viewing with defaults.
pub fn view_html(html: &str) -> Result<ThreadView> {
    Viewer::new().view_html(html, None)
}

/// Convenience function to fetch and view a thread with defaults.
#[cfg(feature = "fetch")]
pub async fn fetch_and_view(input: &str) -> Result<ThreadView> {
    Viewer::new().fetch_and_view(input).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PostRole;
    use crate::range::HARD_MAX;

    fn thread(count: usize, anchor_every: usize) -> String {
        let mut html = String::from("<html><head><title>テスト</title></head><body><dl>");
        for n in 1..=count {
            let marker = if anchor_every > 0 && n % anchor_every == 1 { " ◆trip" } else { "" };
            html.push_str(&format!("<dt>{} ：名無し{}</dt><dd>body {}<br>　line</dd>", n, marker, n));
        }
        html.push_str("</dl></body></html>");
        html
    }

    #[test]
    fn test_default_view() {
        let view = view_html(&thread(5, 0)).unwrap();

        assert_eq!(view.total_posts, 5);
        assert_eq!(view.posts.len(), 5);
        assert_eq!(view.label, "1-400");
        assert_eq!(view.title, Some("テスト".to_string()));
        assert_eq!(view.posts[4].body_text, "body 5\n　line");
    }

    #[test]
    fn test_anchor_only_keeps_original_numbers() {
        let config = ViewerConfig::builder().anchor_only(true).build();
        let view = Viewer::with_config(config).view_html(&thread(10, 4), None).unwrap();
        let numbers: Vec<usize> = view.posts.iter().map(|p| p.sequence_number).collect();

        assert_eq!(numbers, vec![1, 2, 5, 6, 9, 10]);
        assert_eq!(view.posts[1].role, PostRole::Follow);
        assert_eq!(view.total_posts, 10);
    }

    #[test]
    fn test_range_after_filter() {
        let config = ViewerConfig::builder().anchor_only(true).range(RangeMode::bounded(3, 5)).build();
        let view = Viewer::with_config(config).view_html(&thread(20, 4), None).unwrap();
        let numbers: Vec<usize> = view.posts.iter().map(|p| p.sequence_number).collect();

        assert_eq!(numbers, vec![5, 6]);
        assert_eq!(view.label, "3-7");
    }

    #[test]
    fn test_show_all_truncates() {
        let config = ViewerConfig::builder().range(RangeMode::All).build();
        let view = Viewer::with_config(config).view_html(&thread(HARD_MAX + 5, 0), None).unwrap();

        assert_eq!(view.posts.len(), HARD_MAX);
        assert_eq!(view.truncation.unwrap().total, HARD_MAX + 5);
        assert_eq!(view.label, "all");
    }

    #[test]
    fn test_no_posts() {
        let result = view_html("<html><body><p>404 Not Found</p></body></html>");
        assert!(matches!(result, Err(AaviewError::NoPosts)));
    }

    #[test]
    fn test_empty_selection() {
        let config = ViewerConfig::builder().range(RangeMode::bounded(100, 10)).build();
        let result = Viewer::with_config(config).view_html(&thread(5, 0), None);

        assert!(matches!(result, Err(AaviewError::EmptySelection { ref label }) if label == "100-109"));
    }

    #[test]
    fn test_anchor_only_without_anchors_is_empty_selection() {
        let config = ViewerConfig::builder().anchor_only(true).build();
        let result = Viewer::with_config(config).view_html(&thread(5, 0), None);

        assert!(matches!(result, Err(AaviewError::EmptySelection { .. })));
    }

    #[test]
    fn test_view_bytes_decodes_shift_jis() {
        let html = thread(3, 0);
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&html);
        let view = Viewer::new()
            .view_bytes(&bytes, Some("text/html; charset=Shift_JIS"), Some("file.html"))
            .unwrap();

        assert_eq!(view.encoding, "Shift_JIS");
        assert_eq!(view.source, Some("file.html".to_string()));
        assert_eq!(view.posts[0].header_text, "1 ：名無し");
    }

    #[test]
    fn test_view_bytes_keeps_declared_shift_jis_with_stray_byte() {
        let html = thread(3, 2).replace("<html>", "<html><meta charset=Shift_JIS>");
        let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&html);
        let mut bytes = bytes.into_owned();
        bytes.push(0xFF);

        let view = Viewer::new()
            .view_bytes(&bytes, Some("text/html; charset=Shift_JIS"), None)
            .unwrap();

        assert_eq!(view.encoding, "Shift_JIS");
        assert_eq!(view.posts[0].header_text, "1 ：名無し ◆trip");
        assert_eq!(view.posts[0].role, PostRole::Anchor);
        assert_eq!(view.posts[1].role, PostRole::Follow);
        assert_eq!(view.posts[2].body_text, "body 3\n　line");
    }

    #[test]
    fn test_builder_selectors() {
        let config = ViewerConfig::builder()
            .header_selector("div.name")
            .body_selector("div.msg")
            .anchor_marker('★')
            .user_agent("test-agent")
            .build();

        assert_eq!(config.extract.header_selector, "div.name");
        assert_eq!(config.extract.body_selector, "div.msg");
        assert_eq!(config.extract.anchor_marker, '★');
        assert_eq!(config.fetch.user_agent, "test-agent");
    }
}
