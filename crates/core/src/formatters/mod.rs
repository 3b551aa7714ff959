pub mod html;
pub mod json;
pub mod text;

pub use html::{HtmlConfig, HtmlFormatter, convert_to_html, escape_html, estimate_display_height, unescape_html};
pub use json::convert_to_json;
pub use text::{TextConfig, TextFormatter, convert_to_text, convert_to_text_with_config};
