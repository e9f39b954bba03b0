use crate::canonical::{PageUrl, href_path};
use crate::error::{Error, Result};
use crate::fetch::{Fetcher, fetch_page};
use crate::parsers::{Document, selector};
use crate::results::{HopReport, LinkEvidence, Trail};
use std::time::Duration;
use url::Url;

/// Text of the first paragraph on `page` holding a link to `target`.
///
/// Hrefs resolve against `origin`, the same base the search uses, and match
/// on decoded path alone, so query strings, fragments and percent-encoding
/// differences do not matter. The returned text is every text node inside
/// the paragraph, concatenated as is. Paragraphs with no visible text are
/// passed over.
pub fn connecting_paragraph(
    doc: &Document,
    page: &PageUrl,
    target: &PageUrl,
    origin: &Url,
) -> Result<String> {
    let paragraphs = selector("p")?;
    let anchors = selector("a[href]")?;
    let target_path = target.path();

    for paragraph in doc.html().select(&paragraphs) {
        let links_to_target = paragraph
            .select(&anchors)
            .filter_map(|a| a.value().attr("href"))
            .any(|href| href_path(href, origin).as_deref() == Some(target_path));
        if !links_to_target {
            continue;
        }

        let text: String = paragraph.text().collect();
        if text.trim().is_empty() {
            ::log::debug!("Skipping empty paragraph linking {} to {}", page, target);
            continue;
        }
        return Ok(text);
    }

    Err(Error::ParagraphNotFound {
        page: page.to_string(),
        target: target.to_string(),
    })
}

/// Re-fetches `page` and finds the paragraph linking it to `target`
pub async fn extract_connecting_paragraph<F: Fetcher>(
    fetcher: &F,
    page: &PageUrl,
    target: &PageUrl,
    origin: &Url,
    deadline: Option<Duration>,
) -> Result<LinkEvidence> {
    let body = fetch_page(fetcher, page, deadline).await?;
    let doc = Document::parse(&body);
    let paragraph = connecting_paragraph(&doc, page, target, origin)?;

    Ok(LinkEvidence {
        paragraph,
        target: target.clone(),
    })
}

/// Looks up evidence for every hop of `trail`, in order.
///
/// A hop whose evidence cannot be found keeps its error in the report; the
/// remaining hops are still processed.
pub async fn collect_evidence<F: Fetcher>(
    fetcher: &F,
    trail: &Trail,
    origin: &Url,
    deadline: Option<Duration>,
) -> Vec<HopReport> {
    let mut reports = Vec::with_capacity(trail.hop_count());

    for (i, (source, target)) in trail.hops().enumerate() {
        let evidence =
            extract_connecting_paragraph(fetcher, source, target, origin, deadline).await;
        if let Err(e) = &evidence {
            ::log::warn!(
                "Error fetching paragraph with link from {} to {}: {}",
                source,
                target,
                e
            );
        }

        reports.push(HopReport {
            index: i + 1,
            source: source.clone(),
            target: target.clone(),
            evidence,
        });
    }

    reports
}
