use crate::canonical::PageUrl;
use crate::graph::LinkGraph;
use crate::results::{SearchOutcome, SearchReport, SearchStats, Trail};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Cooperative cancellation flag, checked between frontier pops.
///
/// Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Breadth-first search over trails from `start` to `target`.
///
/// Pages are marked visited when they are enqueued, so each page is reached
/// by exactly one trail and expanded at most once. The first trail to reach
/// the target is returned; with a FIFO frontier it is a shortest one, and
/// among equally short trails the one whose links appeared first wins.
///
/// A trail with `max_hops` links is still checked against the target but is
/// never expanded. A branch whose page cannot be fetched is logged and
/// dropped; the search goes on.
pub async fn find_path<G: LinkGraph>(
    graph: &G,
    start: &PageUrl,
    target: &PageUrl,
    max_hops: usize,
    cancel: &CancelToken,
) -> SearchReport {
    let started = Instant::now();
    let mut stats = SearchStats::default();
    let mut frontier: VecDeque<Trail> = VecDeque::new();
    let mut visited: HashSet<PageUrl> = HashSet::new();

    ::log::info!("Searching for {} from {} (max {} hops)", target, start, max_hops);
    visited.insert(start.clone());
    stats.discovered += 1;
    ::log::info!("Visited: {}", start);
    frontier.push_back(Trail::start(start.clone()));

    let outcome = loop {
        if cancel.is_cancelled() {
            ::log::warn!("Search cancelled with {} trails pending", frontier.len());
            break SearchOutcome::Cancelled;
        }

        let Some(trail) = frontier.pop_front() else {
            break SearchOutcome::Exhausted;
        };

        if trail.hop_count() > max_hops {
            continue;
        }

        let current = trail.last();
        if current == target {
            break SearchOutcome::Found(trail);
        }

        if trail.hop_count() == max_hops {
            ::log::trace!("Depth bound reached at {}", current);
            continue;
        }

        stats.expanded += 1;
        let links = match graph.neighbors(current).await {
            Ok(links) => links,
            Err(e) => {
                ::log::warn!("Failed to fetch links from {}: {}", current, e);
                stats.failed += 1;
                continue;
            }
        };

        for link in links {
            if visited.insert(link.clone()) {
                ::log::info!("Visited: {}", link);
                stats.discovered += 1;
                frontier.push_back(trail.extended(link));
            }
        }
    };

    stats.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    match &outcome {
        SearchOutcome::Found(trail) => ::log::info!(
            "Found a {}-hop trail after expanding {} pages ({} discovered, {} failed) in {} ms",
            trail.hop_count(),
            stats.expanded,
            stats.discovered,
            stats.failed,
            stats.elapsed_ms
        ),
        _ => ::log::info!(
            "No trail found after expanding {} pages ({} discovered, {} failed) in {} ms",
            stats.expanded,
            stats.discovered,
            stats.failed,
            stats.elapsed_ms
        ),
    }

    SearchReport { outcome, stats }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;

    fn page(name: &str) -> PageUrl {
        PageUrl::parse(&format!("https://example.org/wiki/{name}")).unwrap()
    }

    fn graph(edges: &[(&str, &[&str])]) -> MemoryGraph {
        edges.iter().fold(MemoryGraph::new(), |graph, (from, to)| {
            graph.with_links(page(from), to.iter().map(|name| page(name)).collect())
        })
    }

    fn names(trail: &Trail) -> Vec<String> {
        trail
            .pages()
            .iter()
            .map(|p| p.path().trim_start_matches("/wiki/").to_string())
            .collect()
    }

    async fn search(graph: &MemoryGraph, start: &str, target: &str, max_hops: usize) -> SearchReport {
        find_path(graph, &page(start), &page(target), max_hops, &CancelToken::new()).await
    }

    fn found(report: &SearchReport) -> Vec<String> {
        match &report.outcome {
            SearchOutcome::Found(trail) => names(trail),
            other => panic!("expected a trail, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_direct_link() {
        let g = graph(&[("Start", &["Other", "Target"])]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(found(&report), vec!["Start", "Target"]);
    }

    #[tokio::test]
    async fn test_intermediate_page_within_bound() {
        let g = graph(&[("Start", &["Mid"]), ("Mid", &["Target"])]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(found(&report), vec!["Start", "Mid", "Target"]);
    }

    #[tokio::test]
    async fn test_intermediate_page_beyond_bound() {
        let g = graph(&[("Start", &["Mid"]), ("Mid", &["Target"])]);
        let report = search(&g, "Start", "Target", 1).await;
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        // Mid sits at the bound, so it is never fetched
        assert_eq!(g.expanded(), vec![page("Start")]);
    }

    #[tokio::test]
    async fn test_exact_bound_is_allowed() {
        let g = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["Target"])]);
        let report = search(&g, "A", "Target", 3).await;
        assert_eq!(found(&report), vec!["A", "B", "C", "Target"]);

        let report = search(&g, "A", "Target", 2).await;
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_start_equals_target() {
        let g = graph(&[]);
        let report = search(&g, "Same", "Same", 3).await;
        assert_eq!(found(&report), vec!["Same"]);
        assert!(g.expanded().is_empty());
        assert_eq!(report.stats.expanded, 0);
    }

    #[tokio::test]
    async fn test_zero_hops_never_expands() {
        let g = graph(&[("Start", &["Target"])]);
        let report = search(&g, "Start", "Target", 0).await;
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
        assert!(g.expanded().is_empty());
    }

    #[tokio::test]
    async fn test_shortest_trail_wins_over_earlier_long_one() {
        // The long branch is listed first but the short one is shallower
        let g = graph(&[
            ("Start", &["Long1", "Short"]),
            ("Long1", &["Long2"]),
            ("Long2", &["Target"]),
            ("Short", &["Target"]),
        ]);
        let report = search(&g, "Start", "Target", 5).await;
        assert_eq!(found(&report), vec!["Start", "Short", "Target"]);
    }

    #[tokio::test]
    async fn test_tie_break_follows_link_order() {
        let g = graph(&[
            ("Start", &["Left", "Right"]),
            ("Left", &["Target"]),
            ("Right", &["Target"]),
        ]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(found(&report), vec!["Start", "Left", "Target"]);

        let g = graph(&[
            ("Start", &["Right", "Left"]),
            ("Left", &["Target"]),
            ("Right", &["Target"]),
        ]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(found(&report), vec!["Start", "Right", "Target"]);
    }

    #[tokio::test]
    async fn test_each_page_expanded_once() {
        // Diamond with back edges and duplicate links
        let g = graph(&[
            ("A", &["B", "C", "B", "A"]),
            ("B", &["D", "A", "C"]),
            ("C", &["D", "B"]),
            ("D", &["A", "E"]),
            ("E", &[]),
        ]);
        let report = search(&g, "A", "Missing", 10).await;
        assert_eq!(report.outcome, SearchOutcome::Exhausted);

        let expanded = g.expanded();
        let unique: HashSet<&PageUrl> = expanded.iter().collect();
        assert_eq!(unique.len(), expanded.len());
        assert_eq!(
            expanded,
            vec![page("A"), page("B"), page("C"), page("D"), page("E")]
        );
        assert_eq!(report.stats.discovered, 5);
    }

    #[tokio::test]
    async fn test_failed_branch_is_abandoned() {
        let g = graph(&[("Start", &["Broken", "Fine"]), ("Fine", &["Target"])]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(found(&report), vec!["Start", "Fine", "Target"]);
        assert_eq!(report.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_unreachable_target() {
        let g = graph(&[("Start", &["A"]), ("A", &["Start"])]);
        let report = search(&g, "Start", "Target", 3).await;
        assert_eq!(report.outcome, SearchOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let g = graph(&[("Start", &["Target"])]);
        let cancel = CancelToken::new();
        cancel.clone().cancel();
        let report = find_path(&g, &page("Start"), &page("Target"), 3, &cancel).await;
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert!(g.expanded().is_empty());
    }

    #[tokio::test]
    async fn test_trails_respect_bound_on_wide_graph() {
        let g = graph(&[
            ("Root", &["L1a", "L1b"]),
            ("L1a", &["L2a", "L2b"]),
            ("L1b", &["L2c"]),
            ("L2a", &["L3a"]),
            ("L2b", &[]),
            ("L2c", &["Target"]),
            ("L3a", &["Target"]),
        ]);
        for max_hops in 0..5 {
            let report = search(&g, "Root", "Target", max_hops).await;
            if let SearchOutcome::Found(trail) = &report.outcome {
                assert!(trail.hop_count() <= max_hops);
                assert_eq!(trail.hop_count(), 3);
            } else {
                assert!(max_hops < 3);
            }
        }
    }
}
