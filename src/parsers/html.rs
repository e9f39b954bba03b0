use crate::parsers::encoding::decode_body;
use scraper::{ElementRef, Html};

/// A parsed HTML page.
///
/// Read-only and short-lived: one is built per fetch and dropped once its
/// links or paragraphs have been read.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a response body in its declared charset.
    ///
    /// Malformed bytes never reject the page; they decode to U+FFFD.
    pub fn parse(body: &[u8]) -> Self {
        Self::parse_str(&decode_body(body))
    }

    /// Parses markup that is already text
    pub fn parse_str(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    pub fn html(&self) -> &Html {
        &self.html
    }
}

/// Collects the href of every anchor in document order.
///
/// The walk is a depth-first pre-order traversal; anchors without an href are
/// skipped and duplicates are kept.
pub fn extract_links(doc: &Document) -> Vec<String> {
    let links: Vec<String> = doc
        .html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "a")
        .filter_map(|el| el.value().attr("href"))
        .map(|s| s.to_string())
        .collect();

    ::log::debug!("HTML parser found {} links", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few links: {:?}",
            links.iter().take(5).collect::<Vec<_>>()
        );
    }

    links
}
