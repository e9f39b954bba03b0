use crate::canonical::PageUrl;
use crate::error::Error;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Ordered chain of pages from the start page, each linking to the next.
///
/// Never empty: every trail begins with the start page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trail(Vec<PageUrl>);

impl Trail {
    /// Single-page trail holding only the start page
    pub fn start(page: PageUrl) -> Self {
        Self(vec![page])
    }

    /// Copy of this trail with `next` appended
    pub fn extended(&self, next: PageUrl) -> Self {
        let mut pages = Vec::with_capacity(self.0.len() + 1);
        pages.extend(self.0.iter().cloned());
        pages.push(next);
        Self(pages)
    }

    /// Page the trail currently ends on
    pub fn last(&self) -> &PageUrl {
        &self.0[self.0.len() - 1]
    }

    pub fn pages(&self) -> &[PageUrl] {
        &self.0
    }

    /// Number of links followed
    pub fn hop_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Consecutive (source, target) pairs
    pub fn hops(&self) -> impl Iterator<Item = (&PageUrl, &PageUrl)> {
        self.0.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// Terminal state of one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "trail", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// A shortest trail from start to target
    Found(Trail),
    /// The frontier emptied or every branch hit the depth bound
    Exhausted,
    /// Stopped by the caller before finishing
    Cancelled,
}

/// Counters collected during one search
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Pages whose links were fetched
    pub expanded: usize,
    /// Pages marked visited, start page included
    pub discovered: usize,
    /// Expansions abandoned because fetching or parsing failed
    pub failed: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

/// Paragraph justifying one hop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEvidence {
    pub paragraph: String,
    pub target: PageUrl,
}

/// Evidence lookup result for one hop of a trail
#[derive(Debug)]
pub struct HopReport {
    /// 1-based position of the hop in the trail
    pub index: usize,
    pub source: PageUrl,
    pub target: PageUrl,
    pub evidence: Result<LinkEvidence, Error>,
}

impl HopReport {
    /// Operator-facing block for this hop, or `None` if no evidence was found
    pub fn render(&self) -> Option<String> {
        self.evidence
            .as_ref()
            .ok()
            .map(|evidence| render_hop(self.index, evidence))
    }
}

impl Serialize for HopReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("HopReport", 4)?;
        state.serialize_field("index", &self.index)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("target", &self.target)?;
        match &self.evidence {
            Ok(evidence) => state.serialize_field("paragraph", &evidence.paragraph)?,
            Err(e) => state.serialize_field("error", &e.to_string())?,
        }
        state.end()
    }
}

/// Everything one race produced
#[derive(Debug, Serialize)]
pub struct RaceReport {
    pub start: PageUrl,
    pub target: PageUrl,
    pub search: SearchReport,
    pub hops: Vec<HopReport>,
}

impl RaceReport {
    /// Operator-facing summary: the trail, then one block per hop with evidence
    pub fn render(&self) -> String {
        match &self.search.outcome {
            SearchOutcome::Found(trail) => {
                let pages: Vec<&str> = trail.pages().iter().map(|p| p.as_str()).collect();
                let mut out = format!("Target found: {}\n", pages.join(" -> "));
                for hop in &self.hops {
                    if let Some(block) = hop.render() {
                        out.push_str(&block);
                    }
                }
                out
            }
            SearchOutcome::Exhausted => "Target not found.\n".to_string(),
            SearchOutcome::Cancelled => "Search cancelled.\n".to_string(),
        }
    }
}

/// Formats one hop as `<index>` and a dashed rule, the paragraph, then the target URL
pub fn render_hop(index: usize, evidence: &LinkEvidence) -> String {
    format!(
        "{}------------------------\n{}\n{}\n",
        index, evidence.paragraph, evidence.target
    )
}
