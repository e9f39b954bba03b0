pub mod encoding;
pub mod html;


use crate::error::{Error, Result};
use scraper::Selector;

pub use html::{Document, extract_links};

/// Compiles a CSS selector, reporting failures as parse errors
pub(crate) fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Parse(format!("invalid selector {css:?}: {e}")))
}
