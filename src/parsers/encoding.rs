use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Bytes of the body searched for a charset declaration
const SNIFF_LEN: usize = 1024;

#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid regex")
});

/// Encoding declared by a `<meta>` tag near the top of the page, UTF-8 otherwise.
///
/// Covers both `<meta charset=...>` and the `http-equiv` content-type form.
pub fn detect_encoding(body: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|c| c.get(1))
        .and_then(|m| Encoding::for_label(m.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decodes a response body to text.
///
/// Never fails: bytes invalid in the detected encoding become U+FFFD.
pub fn decode_body(body: &[u8]) -> String {
    let encoding = detect_encoding(body);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        ::log::debug!(
            "Body has bytes that are not valid {}; replaced them",
            used.name()
        );
    }
    text.into_owned()
}
