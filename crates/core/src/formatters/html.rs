use std::borrow::Cow;

use crate::extract::PostRole;
use crate::thread::ThreadView;

/// Estimated pixel height of one post in the scroll container
pub const POST_HEIGHT_PX: u32 = 320;

/// Upper bound on the scroll container height
pub const MAX_DISPLAY_HEIGHT_PX: u32 = 12_000;

const PAGE_STYLE: &str = "\
body { margin: 0; padding: 1em; background: #fff; color: #000; }
.notice { font-family: sans-serif; color: #555; }
.notice.truncated { color: #a60; }
.thread { overflow: auto; }
.post { margin-bottom: 1em; }
.post-header { font-family: sans-serif; font-size: 0.9em; color: #060; }
.post.anchor .post-header { font-weight: bold; }
.post-body {
    font-family: 'MS PGothic', 'IPAMonaPGothic', 'Mona', 'Courier New', Courier, monospace;
    white-space: pre;
    overflow-x: auto;
    background-color: #f5f5f5;
    padding: 1em;
    margin: 0;
    border: 1px solid #ddd;
    border-radius: 5px;
}
";

/// Configuration for HTML output
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    /// Wrap the posts in a complete `<html>` document
    pub standalone: bool,
    /// Show the window label and truncation notice above the posts
    pub include_header: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self { standalone: true, include_header: true }
    }
}

/// HTML formatter for thread views
pub struct HtmlFormatter {
    config: HtmlConfig,
}

impl HtmlFormatter {
    pub fn new(config: HtmlConfig) -> Self {
        Self { config }
    }

    /// Render the view as HTML
    pub fn convert(&self, view: &ThreadView) -> String {
        convert_to_html(view, &self.config)
    }
}

/// Escape `&`, `<` and `>` for HTML text content
///
/// `&` is replaced first so the entities produced for `<` and `>` are not
/// escaped a second time.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    Cow::Owned(text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;"))
}

/// Inverse of [`escape_html`]
///
/// Only the three entities produced by [`escape_html`] are recognised; any
/// other `&` sequence is left alone.
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let (replacement, consumed) = if rest.starts_with("&amp;") {
            ('&', 5)
        } else if rest.starts_with("&lt;") {
            ('<', 4)
        } else if rest.starts_with("&gt;") {
            ('>', 4)
        } else {
            ('&', 1)
        };
        out.push(replacement);
        rest = &rest[consumed..];
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Height in pixels for a container showing `post_count` posts
///
/// Grows linearly with the number of posts and stops at
/// [`MAX_DISPLAY_HEIGHT_PX`].
pub fn estimate_display_height(post_count: usize) -> u32 {
    let count = u32::try_from(post_count).unwrap_or(u32::MAX);
    count.saturating_mul(POST_HEIGHT_PX).clamp(POST_HEIGHT_PX, MAX_DISPLAY_HEIGHT_PX)
}

/// Render the view as HTML
///
/// Header and body text are escaped here, after sanitization, and bodies go
/// into `white-space: pre` blocks so every space and line break survives.
pub fn convert_to_html(view: &ThreadView, config: &HtmlConfig) -> String {
    let mut output = String::new();

    if config.standalone {
        let title = view.title.as_deref().unwrap_or("Thread");
        output.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        output.push_str(&format!("<style>\n{}</style>\n", PAGE_STYLE));
        output.push_str("</head>\n<body>\n");
    }

    if config.include_header {
        output.push_str(&format!(
            "<p class=\"notice\">Posts {} ({} shown of {} extracted)</p>\n",
            escape_html(&view.label),
            view.posts.len(),
            view.total_posts
        ));
        if let Some(truncation) = &view.truncation {
            output.push_str(&format!("<p class=\"notice truncated\">{}</p>\n", truncation));
        }
    }

    output.push_str(&format!(
        "<div class=\"thread\" style=\"height: {}px\">\n",
        estimate_display_height(view.posts.len())
    ));

    for post in &view.posts {
        output.push_str(&format!(
            "<div class=\"post {}\" id=\"post-{}\">\n",
            role_class(post.role),
            post.sequence_number
        ));
        output.push_str(&format!(
            "<div class=\"post-header\">{}</div>\n",
            escape_html(&post.header_text)
        ));
        // Parsers drop one newline directly after <pre>; emit it so a body
        // starting with a blank line keeps it.
        output.push_str(&format!("<pre class=\"post-body\">\n{}</pre>\n", escape_html(&post.body_text)));
        output.push_str("</div>\n");
    }

    output.push_str("</div>\n");

    if config.standalone {
        output.push_str("</body>\n</html>\n");
    }

    output
}

fn role_class(role: PostRole) -> &'static str {
    match role {
        PostRole::Anchor => "anchor",
        PostRole::Follow => "follow",
        PostRole::Other => "other",
    }
}
