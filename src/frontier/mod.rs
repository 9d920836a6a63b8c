//! Frontier: the set of visited URLs and the traversal worklist
//!
//! The frontier owns two things for the lifetime of a run: the visited set,
//! which guarantees that no URL is processed twice even when concurrent
//! workers race to discover the same page, and the queue of pending
//! [`CrawlTask`]s, whose pop order determines the traversal strategy.
//!
//! The reference traversal is depth-first: each discovered link is descended
//! into before its siblings. That falls out of treating the worklist as a
//! stack; breadth-first falls out of treating it as a queue.

use crate::config::TraversalOrder;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::Notify;
use url::Url;

/// A single unit of crawl work
///
/// Immutable once created. `depth` counts link hops from a seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: Url,
    pub depth: u32,
}

impl CrawlTask {
    pub fn new(url: Url, depth: u32) -> Self {
        Self { url, depth }
    }
}

struct Inner {
    queue: VecDeque<CrawlTask>,
    visited: HashSet<String>,
    /// Tasks handed out but not yet reported done; the run is exhausted only
    /// when the queue is empty AND nothing is in flight.
    in_flight: usize,
    closed: bool,
}

/// Shared frontier for one crawl run
///
/// The visited set grows monotonically and is never evicted; a single run is
/// transient, so unbounded growth is acceptable.
pub struct Frontier {
    inner: Mutex<Inner>,
    notify: Notify,
    order: TraversalOrder,
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier seeded with the given URLs at depth 0
    ///
    /// # Arguments
    ///
    /// * `order` - Whether the worklist behaves as a stack or a queue
    /// * `max_depth` - Inclusive bound on link hops from a seed
    /// * `seeds` - Normalized starting URLs, enqueued in order
    pub fn new(order: TraversalOrder, max_depth: u32, seeds: &[Url]) -> Self {
        let frontier = Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                in_flight: 0,
                closed: false,
            }),
            notify: Notify::new(),
            order,
            max_depth,
        };

        frontier.extend(
            seeds
                .iter()
                .map(|url| CrawlTask::new(url.clone(), 0))
                .collect(),
        );

        frontier
    }

    /// Records a URL as visited; returns true exactly once per URL
    ///
    /// This is an atomic check-and-set: under concurrent discovery of the
    /// same URL from multiple parent pages, exactly one caller wins. It must
    /// be called strictly before the fetch for the URL is issued.
    pub fn mark_visited(&self, url: &Url) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.visited.insert(url.as_str().to_owned())
    }

    /// Returns true iff a task at `depth` is within the depth bound
    pub fn should_explore(&self, depth: u32) -> bool {
        depth <= self.max_depth
    }

    /// Enqueues a batch of tasks, preserving sibling order
    ///
    /// No visited check happens here; that check is centralized at dequeue
    /// time so the mark operation runs exactly once per URL.
    pub fn extend(&self, tasks: Vec<CrawlTask>) {
        if tasks.is_empty() {
            return;
        }

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return;
            }
            match self.order {
                // Stack pops from the back, so push the batch reversed to
                // keep the first sibling on top.
                TraversalOrder::DepthFirst => {
                    for task in tasks.into_iter().rev() {
                        inner.queue.push_back(task);
                    }
                }
                TraversalOrder::BreadthFirst => {
                    for task in tasks {
                        inner.queue.push_back(task);
                    }
                }
            }
        }

        self.notify.notify_waiters();
    }

    /// Hands out the next task, waiting if the queue is momentarily empty
    ///
    /// Returns `None` when the run is exhausted (queue empty and no task in
    /// flight) or the frontier has been closed. Every `Some` must be paired
    /// with a later [`Frontier::task_done`] call.
    pub async fn next_task(&self) -> Option<CrawlTask> {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking state so a notify between the check
            // and the await is not lost.
            notified.as_mut().enable();

            {
                let mut inner = self.inner.lock().unwrap();
                if inner.closed {
                    return None;
                }

                let task = match self.order {
                    TraversalOrder::DepthFirst => inner.queue.pop_back(),
                    TraversalOrder::BreadthFirst => inner.queue.pop_front(),
                };

                if let Some(task) = task {
                    inner.in_flight += 1;
                    return Some(task);
                }

                if inner.in_flight == 0 {
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Reports that a handed-out task has finished processing
    pub fn task_done(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        drop(inner);
        self.notify.notify_waiters();
    }

    /// Closes the frontier; all current and future `next_task` calls return
    /// `None`
    ///
    /// Used for cancellation and for the page cap. Idempotent.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.closed = true;
        }
        self.notify.notify_waiters();
    }

    /// Number of tasks currently queued
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().queue.len()
    }

    /// Returns whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of distinct URLs marked visited so far
    pub fn visited_count(&self) -> usize {
        self.inner.lock().unwrap().visited.len()
    }
}
