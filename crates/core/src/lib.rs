pub mod encoding;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod formatters;
pub mod history;
pub mod parse;
pub mod range;
pub mod sanitize;
pub mod thread;
pub mod urls;
pub mod viewer;

pub use encoding::{DecodedText, EncodingSource, resolve};
pub use error::{AaviewError, ErrorCategory, Result};
pub use extract::{ExtractConfig, Post, PostRole, extract_posts, extract_posts_from_html};
pub use fetch::{FetchConfig, FetchedPage, read_file, read_stdin};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use filter::filter_posts;
pub use formatters::{HtmlConfig, HtmlFormatter, TextConfig, TextFormatter};
pub use formatters::{convert_to_html, convert_to_json, convert_to_text, escape_html, unescape_html};
pub use history::{HISTORY_CAPACITY, UrlHistory, default_history_path};
pub use parse::Document;
pub use range::{HARD_MAX, RangeMode, Selection, Truncation, select_range};
pub use sanitize::{sanitize, sanitize_utf16};
pub use thread::{OutputFormat, ThreadView};
pub use urls::{looks_like_url, normalize_url, parse_fetch_url};
#[cfg(feature = "fetch")]
pub use viewer::fetch_and_view;
pub use viewer::{Viewer, ViewerConfig, ViewerConfigBuilder, view_html};
