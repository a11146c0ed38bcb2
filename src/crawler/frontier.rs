//! Crawl frontier and visited-set bookkeeping
//!
//! This module handles:
//! - FIFO queue of candidate URLs (breadth-first traversal)
//! - Deduplication at dequeue time against the visited set
//! - The page budget, counted in visit attempts
//! - Releasing URLs that turned out not to be HTML

use std::collections::{HashSet, VecDeque};

/// Frontier and visited set owned by a single crawl run
///
/// The budget counts attempts, not audited pages: a URL released via
/// [`release`](Self::release) still consumed one unit of budget.
#[derive(Debug)]
pub struct Frontier {
    /// URLs waiting for a visit attempt; may contain duplicates
    queue: VecDeque<String>,

    /// URLs dequeued and committed to a visit
    visited: HashSet<String>,

    /// URLs released after a non-HTML response, when revisits are disabled
    released: HashSet<String>,

    /// Whether released URLs may be attempted again
    revisit_released: bool,

    /// Visit attempts so far
    attempts: u32,

    /// Maximum number of visit attempts
    budget: u32,
}

impl Frontier {
    /// Creates a frontier seeded with `seeds` in order
    pub fn new(seeds: Vec<String>, budget: u32) -> Self {
        Self {
            queue: VecDeque::from(seeds),
            visited: HashSet::new(),
            released: HashSet::new(),
            revisit_released: true,
            attempts: 0,
            budget,
        }
    }

    /// Controls whether a released URL may be attempted again when rediscovered
    pub fn with_revisit_released(mut self, revisit: bool) -> Self {
        self.revisit_released = revisit;
        self
    }

    /// Takes the next URL to visit and commits to it
    ///
    /// Already-visited entries are discarded without consuming budget.
    /// Returns None when the queue is drained or the budget is exhausted.
    pub fn next_url(&mut self) -> Option<String> {
        while self.has_budget() {
            let url = self.queue.pop_front()?;

            if self.visited.contains(&url) || self.released.contains(&url) {
                tracing::trace!("Discarding already attempted URL: {}", url);
                continue;
            }

            self.visited.insert(url.clone());
            self.attempts += 1;
            return Some(url);
        }

        None
    }

    /// Appends a discovered URL unless it was already attempted
    ///
    /// Returns true if the URL was queued.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) || self.released.contains(&url) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Un-counts a URL that turned out not to be an HTML page
    ///
    /// The URL leaves the visited set, so it does not count as scanned.
    pub fn release(&mut self, url: &str) {
        self.visited.remove(url);
        if !self.revisit_released {
            self.released.insert(url.to_string());
        }
    }

    /// Returns true while more attempts are allowed
    pub fn has_budget(&self) -> bool {
        self.attempts < self.budget
    }

    /// Number of URLs in the visited set
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Number of visit attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Number of queued entries (duplicates included)
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }
}
