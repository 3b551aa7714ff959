use serde::Serialize;
use tracing::{debug, warn};

use crate::Result;
use crate::parse::{Document, Element};
use crate::sanitize::{normalize_newlines, sanitize};

/// Configuration for post extraction
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// CSS selector matching one header element per post
    pub header_selector: String,
    /// CSS selector matching one body element per post
    pub body_selector: String,
    /// Character whose presence in a header marks an anchor post
    pub anchor_marker: char,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { header_selector: "dt".to_string(), body_selector: "dd".to_string(), anchor_marker: '◆' }
    }
}

/// Where a post stands relative to anchor posts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PostRole {
    /// Header carries the anchor marker
    Anchor,
    /// Non-anchor post directly after an anchor post
    Follow,
    /// Everything else
    Other,
}

impl PostRole {
    /// Role of a post given whether it is an anchor and whether the post
    /// before it (in document order) was one.
    pub fn classify(is_anchor: bool, previous_was_anchor: bool) -> Self {
        if is_anchor {
            PostRole::Anchor
        } else if previous_was_anchor {
            PostRole::Follow
        } else {
            PostRole::Other
        }
    }
}

/// One reply in a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// 1-based position in the source document
    pub sequence_number: usize,
    /// Sanitized header line, trimmed
    pub header_text: String,
    /// Sanitized body with exact whitespace and one `\n` per line break
    pub body_text: String,
    /// Anchor classification, fixed at extraction time
    pub role: PostRole,
}

impl Post {
    /// Whether this post survives anchor-only filtering
    pub fn is_anchor_thread(&self) -> bool {
        matches!(self.role, PostRole::Anchor | PostRole::Follow)
    }
}

/// Extract header and body text for one positional pair
fn extract_pair(header: &Element<'_>, body: &Element<'_>) -> (String, String) {
    let header_raw = header.text();
    let header_text = sanitize(&normalize_newlines(header_raw.trim())).into_owned();

    let body_raw = body.text_with_line_breaks();
    let body_text = sanitize(&normalize_newlines(&body_raw)).into_owned();

    (header_text, body_text)
}

/// Extract all posts from a parsed thread page
///
/// Headers and bodies are paired by position. Surplus elements on either
/// side are dropped, so a page with no matches yields an empty list rather
/// than an error. Roles are assigned here, in document order, before any
/// filtering happens.
pub fn extract_posts(doc: &Document, config: &ExtractConfig) -> Result<Vec<Post>> {
    let headers = doc.select(&config.header_selector)?;
    let bodies = doc.select(&config.body_selector)?;

    if headers.len() != bodies.len() {
        warn!(headers = headers.len(), bodies = bodies.len(), "header/body count mismatch; extra elements ignored");
    }

    let mut previous_was_anchor = false;
    let posts: Vec<Post> = headers
        .iter()
        .zip(bodies.iter())
        .enumerate()
        .map(|(index, (header, body))| {
            let (header_text, body_text) = extract_pair(header, body);
            let is_anchor = header_text.contains(config.anchor_marker);
            let role = PostRole::classify(is_anchor, previous_was_anchor);
            previous_was_anchor = is_anchor;

            Post { sequence_number: index + 1, header_text, body_text, role }
        })
        .collect();

    debug!(
        posts = posts.len(),
        anchors = posts.iter().filter(|p| p.role == PostRole::Anchor).count(),
        "extracted posts"
    );

    Ok(posts)
}

/// Parse `html` and extract its posts in one step
pub fn extract_posts_from_html(html: &str, config: &ExtractConfig) -> Result<Vec<Post>> {
    let doc = Document::parse(html);
    extract_posts(&doc, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AaviewError;

    fn thread(pairs: &[(&str, &str)]) -> String {
        let mut html = String::from("<html><body><dl class=\"thread\">");
        for (header, body) in pairs {
            html.push_str(&format!("<dt>{}</dt><dd>{}</dd>\n", header, body));
        }
        html.push_str("</dl></body></html>");
        html
    }

    #[test]
    fn test_line_breaks_become_newlines() {
        let html = thread(&[("1 ：名無し", "line1<br>line2<br/>line3")]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].body_text, "line1\nline2\nline3");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let art = "　　 ∧＿∧<br>　　（　´∀｀）  <br>　　（　　　　）";
        let html = thread(&[("1", art)]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts[0].body_text, "　　 ∧＿∧\n　　（　´∀｀）  \n　　（　　　　）");
    }

    #[test]
    fn test_header_trimmed_but_internal_spacing_kept() {
        let html = thread(&[("  12 ：<b>やる夫</b>  ◆ABCDEF  ", "x")]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts[0].header_text, "12 ：やる夫  ◆ABCDEF");
    }

    #[test]
    fn test_entities_are_decoded() {
        let html = thread(&[("1", "&gt;&gt;1 &amp; &lt;tag&gt;")]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts[0].body_text, ">>1 & <tag>");
    }

    #[test]
    fn test_control_characters_are_replaced() {
        let html = thread(&[("1\u{1}", "a&#1;b\u{8}c\td")]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts[0].header_text, "1\u{FFFD}");
        assert!(!posts[0].body_text.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
        assert!(posts[0].body_text.ends_with("c\td"));
    }

    #[test]
    fn test_pairs_are_positional_and_truncated() {
        let html = "<dl><dt>1</dt><dd>a</dd><dt>2</dt><dd>b</dd><dt>3</dt></dl>";
        let posts = extract_posts_from_html(html, &ExtractConfig::default()).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].sequence_number, 2);
        assert_eq!(posts[1].header_text, "2");
        assert_eq!(posts[1].body_text, "b");
    }

    #[test]
    fn test_no_posts_is_empty_not_error() {
        let posts = extract_posts_from_html("<html><body><p>nothing</p></body></html>", &ExtractConfig::default()).unwrap();
        assert!(posts.is_empty());
    }

    #[test]
    fn test_roles_follow_only_one_step() {
        let html = thread(&[("1 ◆trip", "a"), ("2", "b"), ("3", "c"), ("4 ◆trip", "d"), ("5 ◆trip", "e"), ("6", "f")]);
        let posts = extract_posts_from_html(&html, &ExtractConfig::default()).unwrap();
        let roles: Vec<PostRole> = posts.iter().map(|p| p.role).collect();

        assert_eq!(
            roles,
            vec![
                PostRole::Anchor,
                PostRole::Follow,
                PostRole::Other,
                PostRole::Anchor,
                PostRole::Anchor,
                PostRole::Follow
            ]
        );
    }

    #[test]
    fn test_custom_selectors_and_marker() {
        let html = r#"<div class="h">1 ★</div><div class="m">x</div><div class="h">2</div><div class="m">y</div>"#;
        let config = ExtractConfig {
            header_selector: "div.h".to_string(),
            body_selector: "div.m".to_string(),
            anchor_marker: '★',
        };
        let posts = extract_posts_from_html(html, &config).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].role, PostRole::Anchor);
        assert_eq!(posts[1].role, PostRole::Follow);
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let config = ExtractConfig { header_selector: "[[".to_string(), ..Default::default() };
        let result = extract_posts_from_html("<dl></dl>", &config);

        assert!(matches!(result, Err(AaviewError::HtmlParseError(_))));
    }
}
