use crate::thread::ThreadView;

/// Configuration for plain text output
#[derive(Debug, Clone)]
pub struct TextConfig {
    /// Include title, window label and truncation notice before the posts
    pub include_header: bool,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self { include_header: true }
    }
}

/// Plain text formatter for thread views
pub struct TextFormatter {
    config: TextConfig,
}

impl TextFormatter {
    pub fn new(config: TextConfig) -> Self {
        Self { config }
    }

    /// Render the view as plain text
    pub fn convert(&self, view: &ThreadView) -> String {
        convert_to_text_with_config(view, &self.config)
    }
}

/// Render the view as plain text with the default configuration
pub fn convert_to_text(view: &ThreadView) -> String {
    convert_to_text_with_config(view, &TextConfig::default())
}

/// Render the view as plain text
///
/// Bodies are written exactly as extracted. Nothing is trimmed or wrapped,
/// since a single shifted character breaks ASCII art.
pub fn convert_to_text_with_config(view: &ThreadView, config: &TextConfig) -> String {
    let mut output = String::new();

    if config.include_header {
        output.push_str(&generate_header(view));
        output.push('\n');
    }

    for post in &view.posts {
        output.push_str(&format!("[{}] {}\n", post.sequence_number, post.header_text));
        output.push_str(&post.body_text);
        output.push_str("\n\n");
    }

    output
}

/// Generate the header block
fn generate_header(view: &ThreadView) -> String {
    let mut header = String::new();

    if let Some(title) = &view.title {
        header.push_str(title);
        header.push('\n');
    }

    header.push_str(&format!(
        "Posts {} ({} shown of {} extracted)\n",
        view.label,
        view.posts.len(),
        view.total_posts
    ));

    if let Some(truncation) = &view.truncation {
        header.push_str(&format!("Note: {}\n", truncation));
    }

    header
}
