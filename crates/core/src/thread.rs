//! Thread view output type with posts, provenance, and format conversion.
//!
//! This module defines the [`ThreadView`] struct, the complete result of
//! running one page through the pipeline: the selected posts plus everything
//! a renderer needs to label them.

use std::str::FromStr;

use serde::Serialize;

use crate::extract::Post;
use crate::formatters::{HtmlConfig, convert_to_html, convert_to_json, convert_to_text};
use crate::range::Truncation;
use crate::Result;

/// Output format options for a thread view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, whitespace exactly as extracted.
    Text,
    /// Standalone HTML page with monospaced, non-wrapping blocks.
    Html,
    /// JSON format (structured data).
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" | "htm" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, html, json", s)),
        }
    }
}

/// The posts selected from one fetched page.
#[derive(Debug, Clone, Serialize)]
pub struct ThreadView {
    /// Source URL or file path, if known.
    pub source: Option<String>,

    /// Document `<title>`, if any.
    pub title: Option<String>,

    /// Encoding the page was decoded with.
    pub encoding: String,

    /// Posts extracted before filtering and range selection.
    pub total_posts: usize,

    /// Description of the selected window ("1-400", "all").
    pub label: String,

    /// Present when "show all" hit the hard limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub truncation: Option<Truncation>,

    /// Selected posts in document order.
    pub posts: Vec<Post>,
}

impl ThreadView {
    /// Converts the view to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Html => Ok(self.to_html()),
            OutputFormat::Json => self.to_json(true),
        }
    }

    /// Gets the posts as plain text.
    pub fn to_text(&self) -> String {
        convert_to_text(self)
    }

    /// Gets the posts as a standalone HTML page with default settings.
    pub fn to_html(&self) -> String {
        convert_to_html(self, &HtmlConfig::default())
    }

    /// Gets the view as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        convert_to_json(self, pretty)
    }

    /// Gets the view as a `serde_json::Value`.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Number of selected posts.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
