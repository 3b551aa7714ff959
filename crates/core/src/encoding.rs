//! Best-effort decoding of thread pages with unknown or legacy encodings.
//!
//! Archive pages for this document family are overwhelmingly Shift_JIS,
//! frequently mislabelled, and sometimes contain stray bytes that are valid
//! in no encoding at all. [`resolve`] walks a fixed chain of candidates and
//! always returns a string: the last step is a lossy UTF-8 decode.

use std::borrow::Cow;
use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, SHIFT_JIS, UTF_8};
use regex::bytes::Regex;
use serde::Serialize;
use tracing::debug;

/// How many leading bytes are scanned for a `<meta>` charset declaration.
const META_PRESCAN_BYTES: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).expect("valid meta charset pattern")
});

/// Which step of the chain produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingSource {
    /// A byte-order mark at the start of the input.
    Bom,
    /// The charset parameter of the `Content-Type` header.
    ContentType,
    /// A `<meta>` declaration inside the document.
    Meta,
    /// Statistical detection that reported confidence, for undeclared pages.
    Sniffed,
    /// The legacy default, decoded without errors.
    LegacyDefault,
    /// UTF-8 with replacement, the fallback that never fails.
    Lossy,
}

/// Decoded document text plus how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// The decoded document.
    pub text: String,
    /// Canonical name of the encoding used.
    pub encoding: &'static str,
    /// Chain step that produced `text`.
    pub source: EncodingSource,
}

impl DecodedText {
    fn new(text: Cow<'_, str>, encoding: &'static Encoding, source: EncodingSource) -> Self {
        debug!(encoding = encoding.name(), ?source, bytes = text.len(), "decoded document");
        Self { text: text.into_owned(), encoding: encoding.name(), source }
    }
}

/// Decodes raw page bytes without ever failing.
///
/// `content_type` is the raw `Content-Type` header value when the bytes came
/// from HTTP. A declared charset (header first, then `<meta>`) that decodes
/// cleanly wins. When every declaration fails, a clean Shift_JIS decode
/// means the label was wrong; otherwise the first declared charset is used
/// anyway and stray bytes become U+FFFD. Content sniffing is only consulted
/// for pages that declare nothing.
///
/// # Example
///
/// ```rust
/// use aaview_core::encoding::{EncodingSource, resolve};
///
/// let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("やる夫");
/// let decoded = resolve(&bytes, Some("text/html; charset=Shift_JIS"));
/// assert_eq!(decoded.text, "やる夫");
/// assert_eq!(decoded.source, EncodingSource::ContentType);
/// ```
pub fn resolve(bytes: &[u8], content_type: Option<&str>) -> DecodedText {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_lossy(encoding, &bytes[bom_len..], EncodingSource::Bom);
    }

    let declared = [
        (content_type.and_then(charset_from_content_type), EncodingSource::ContentType),
        (charset_from_meta(bytes), EncodingSource::Meta),
    ];
    let mut fallback = None;
    for (encoding, source) in declared {
        let Some(encoding) = encoding else { continue };
        if let Some(text) = decode_strict(encoding, bytes) {
            return DecodedText::new(text, encoding, source);
        }
        fallback.get_or_insert((encoding, source));
    }

    if let Some((encoding, source)) = fallback {
        if let Some(text) = decode_strict(SHIFT_JIS, bytes) {
            return DecodedText::new(text, SHIFT_JIS, EncodingSource::LegacyDefault);
        }
        return decode_lossy(encoding, bytes, source);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let (sniffed, confident) = detector.guess_assess(None, true);
    if confident {
        return decode_lossy(sniffed, bytes, EncodingSource::Sniffed);
    }

    if let Some(text) = decode_strict(SHIFT_JIS, bytes) {
        return DecodedText::new(text, SHIFT_JIS, EncodingSource::LegacyDefault);
    }

    decode_lossy(UTF_8, bytes, EncodingSource::Lossy)
}

fn decode_strict<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(bytes)
}

fn decode_lossy(encoding: &'static Encoding, bytes: &[u8], source: EncodingSource) -> DecodedText {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        debug!(encoding = encoding.name(), "replaced undecodable bytes");
    }
    DecodedText::new(text, encoding, source)
}

/// Extracts the charset parameter from a `Content-Type` header value.
fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches(['"', '\'']);
        Encoding::for_label_no_replacement(value.as_bytes())
    })
}

/// Looks for `<meta charset>` or `<meta http-equiv content="...charset=">` near the top.
fn charset_from_meta(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(META_PRESCAN_BYTES)];
    let caps = META_CHARSET.captures(head)?;
    let encoding = Encoding::for_label_no_replacement(caps.get(1)?.as_bytes())?;

    // A page that could be read far enough to find the declaration is ASCII
    // compatible, so a UTF-16 label here is wrong by construction.
    if encoding == encoding_rs::UTF_16LE || encoding == encoding_rs::UTF_16BE { Some(UTF_8) } else { Some(encoding) }
}
