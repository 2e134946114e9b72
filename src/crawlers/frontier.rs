use crate::config::CrawlStrategy;
use crate::filter::UrlNormalizer;
use std::collections::{HashSet, VecDeque};

/// A URL waiting to be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

/// Pending work of one crawl, handed out in BFS or DFS order.
///
/// A URL is marked visited when it is dequeued, and a URL that is visited
/// or already waiting is never queued again, so every page is handed out
/// at most once per crawl.
#[derive(Debug)]
pub struct Frontier {
    strategy: CrawlStrategy,
    max_depth: usize,
    normalizer: UrlNormalizer,
    queue: VecDeque<FrontierEntry>,
    queued: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new(strategy: CrawlStrategy, max_depth: usize, normalizer: UrlNormalizer) -> Self {
        Self {
            strategy,
            max_depth,
            normalizer,
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: HashSet::new(),
        }
    }

    /// Queue a URL. Returns false if it is too deep, already visited or
    /// already waiting.
    pub fn enqueue(&mut self, url: &str, depth: usize) -> bool {
        if depth > self.max_depth {
            ::log::trace!("Not queuing {} at depth {}: too deep", url, depth);
            return false;
        }

        let key = self.normalizer.key(url);
        if self.visited.contains(&key) || self.queued.contains(&key) {
            ::log::trace!("Skipping already visited or queued link: {}", url);
            return false;
        }

        self.queued.insert(key);
        self.queue.push_back(FrontierEntry {
            url: url.to_string(),
            depth,
        });
        true
    }

    /// Queue the links of one page so they are visited in discovery order.
    ///
    /// DFS pops from the back, so its links are pushed last-to-first.
    /// Returns the number of links actually queued.
    pub fn enqueue_links(&mut self, links: &[String], depth: usize) -> usize {
        let strategy = self.strategy;
        match strategy {
            CrawlStrategy::Bfs => links
                .iter()
                .filter(|link| self.enqueue(link, depth))
                .count(),
            CrawlStrategy::Dfs => {
                // Dedup against earlier links of the same page first so
                // the first occurrence keeps its place.
                let mut seen = HashSet::new();
                let fresh = links
                    .iter()
                    .filter(|link| seen.insert(self.normalizer.key(link)))
                    .collect::<Vec<_>>();
                fresh
                    .into_iter()
                    .rev()
                    .filter(|link| self.enqueue(link, depth))
                    .count()
            }
        }
    }

    /// Take the next entry and mark it visited
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        let strategy = self.strategy;
        let entry = match strategy {
            CrawlStrategy::Bfs => self.queue.pop_front(),
            CrawlStrategy::Dfs => self.queue.pop_back(),
        }?;

        let key = self.normalizer.key(&entry.url);
        self.queued.remove(&key);
        self.visited.insert(key);
        Some(entry)
    }

    /// Record a URL as visited without dequeuing it, e.g. a redirect
    /// target. A pending entry for the same page is dropped.
    pub fn mark_visited(&mut self, url: &str) {
        let key = self.normalizer.key(url);
        if self.queued.remove(&key) {
            let normalizer = self.normalizer;
            self.queue.retain(|entry| normalizer.key(&entry.url) != key);
            ::log::trace!("Dropped queued entry for {}", url);
        }
        self.visited.insert(key);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
