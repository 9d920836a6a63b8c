//! Crawl engine - main orchestration logic
//!
//! The engine runs a pool of workers (one by default, which reproduces the
//! reference single-threaded depth-first behavior) against a shared
//! [`Frontier`]. Each worker repeatedly pulls a task and runs it through the
//! per-task pipeline:
//!
//! 1. depth check and visited check (both centralized here, before any fetch)
//! 2. page-cap check
//! 3. per-host politeness wait, then fetch
//! 4. parse into text and links
//! 5. keyword match, optional sentiment scoring, report
//! 6. enqueue discovered links at depth+1
//!
//! Fetch, parse, and scorer failures are local to the URL: the branch is
//! abandoned, siblings and queued tasks proceed. The only fatal errors are
//! configuration-time.

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::limiter::HostLimiter;
use crate::crawler::parser::PageParser;
use crate::frontier::{CrawlTask, Frontier};
use crate::report::{MatchRecord, ReportSink};
use crate::sentiment::{normalize_whitespace, Sentiment, SentimentScorer};
use crate::url::{host_key, normalize_url};
use crate::{FetchError, SeineError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Summary counters for a finished run
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Pages for which a fetch was issued
    pub pages_fetched: usize,
    /// Pages abandoned due to a fetch or parse failure
    pub pages_failed: usize,
    /// Pages on which the keyword was found
    pub matches: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

struct EngineShared {
    config: Config,
    keyword_lower: String,
    frontier: Frontier,
    limiter: HostLimiter,
    fetcher: Arc<dyn PageFetcher>,
    parser: Arc<dyn PageParser>,
    scorer: Option<Arc<dyn SentimentScorer>>,
    sink: Arc<dyn ReportSink>,
    pages_fetched: AtomicUsize,
    pages_failed: AtomicUsize,
    matches_found: AtomicUsize,
}

/// Orchestrates one crawl run
pub struct CrawlEngine {
    shared: Arc<EngineShared>,
}

impl CrawlEngine {
    /// Creates an engine for the given configuration and collaborators
    ///
    /// Validates the configuration and normalizes the seeds; both are fatal
    /// if they fail, before any crawling starts.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated-on-entry run configuration
    /// * `fetcher` - HTTP transport
    /// * `parser` - Content parser producing text and outbound links
    /// * `scorer` - Optional sentiment scorer for matching pages
    /// * `sink` - Destination for match records
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        parser: Arc<dyn PageParser>,
        scorer: Option<Arc<dyn SentimentScorer>>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, SeineError> {
        crate::config::validate(&config)?;
        let seeds = config.seed_urls()?;

        let frontier = Frontier::new(config.order, config.max_depth, &seeds);
        let limiter = HostLimiter::new(config.delay());
        let keyword_lower = config.keyword.to_lowercase();

        Ok(Self {
            shared: Arc::new(EngineShared {
                config,
                keyword_lower,
                frontier,
                limiter,
                fetcher,
                parser,
                scorer,
                sink,
                pages_fetched: AtomicUsize::new(0),
                pages_failed: AtomicUsize::new(0),
                matches_found: AtomicUsize::new(0),
            }),
        })
    }

    /// Runs the crawl to completion (frontier exhausted or page cap hit)
    pub async fn run(&self) -> CrawlStats {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        self.run_with_shutdown(shutdown_rx).await
    }

    /// Runs the crawl, stopping early when the shutdown channel turns true
    ///
    /// Cancellation abandons in-flight fetches; the visited set stays intact
    /// and no partial match records are emitted.
    pub async fn run_with_shutdown(&self, shutdown: watch::Receiver<bool>) -> CrawlStats {
        let started = Instant::now();

        tracing::info!(
            seeds = self.shared.config.seeds.len(),
            keyword = %self.shared.config.keyword,
            max_depth = self.shared.config.max_depth,
            workers = self.shared.config.concurrency,
            "starting crawl"
        );

        let mut workers = JoinSet::new();
        for worker in 0..self.shared.config.concurrency {
            let shared = Arc::clone(&self.shared);
            let shutdown = shutdown.clone();
            workers.spawn(worker_loop(worker, shared, shutdown));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("crawl worker panicked: {}", e);
            }
        }

        let stats = CrawlStats {
            pages_fetched: self.shared.pages_fetched.load(Ordering::SeqCst),
            pages_failed: self.shared.pages_failed.load(Ordering::SeqCst),
            matches: self.shared.matches_found.load(Ordering::SeqCst),
            elapsed: started.elapsed(),
        };

        tracing::info!(
            pages = stats.pages_fetched,
            failed = stats.pages_failed,
            matches = stats.matches,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "crawl finished"
        );

        stats
    }
}

/// Resolves once the shutdown channel carries `true`
///
/// A dropped sender means shutdown can never be requested, so the future
/// just never resolves in that case.
async fn shutdown_signalled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn worker_loop(worker: usize, shared: Arc<EngineShared>, mut shutdown: watch::Receiver<bool>) {
    loop {
        let task = tokio::select! {
            task = shared.frontier.next_task() => task,
            _ = shutdown_signalled(&mut shutdown) => {
                tracing::debug!(worker, "shutdown requested, closing frontier");
                shared.frontier.close();
                break;
            }
        };

        let Some(task) = task else { break };
        process_task(&shared, &mut shutdown, task).await;
        shared.frontier.task_done();
    }

    tracing::trace!(worker, "worker finished");
}

async fn process_task(
    shared: &EngineShared,
    shutdown: &mut watch::Receiver<bool>,
    task: CrawlTask,
) {
    if *shutdown.borrow() {
        return;
    }

    // Depth and visited checks run exactly once per discovered URL, strictly
    // before any fetch; this is what terminates cyclic link graphs.
    if !shared.frontier.should_explore(task.depth) {
        tracing::trace!(url = %task.url, depth = task.depth, "beyond depth bound, discarding");
        return;
    }
    if !shared.frontier.mark_visited(&task.url) {
        tracing::trace!(url = %task.url, "already visited, discarding");
        return;
    }

    let fetched_so_far = shared.pages_fetched.fetch_add(1, Ordering::SeqCst) + 1;
    if fetched_so_far > shared.config.max_pages {
        shared.pages_fetched.fetch_sub(1, Ordering::SeqCst);
        tracing::info!(
            cap = shared.config.max_pages,
            "page cap reached, stopping crawl"
        );
        shared.frontier.close();
        return;
    }

    let host = host_key(&task.url);
    let fetched = tokio::select! {
        _ = shutdown_signalled(shutdown) => {
            // An abandoned fetch does not count toward the page total
            shared.pages_fetched.fetch_sub(1, Ordering::SeqCst);
            tracing::debug!(url = %task.url, "fetch abandoned on shutdown");
            return;
        }
        fetched = throttled_fetch(shared, &host, &task) => fetched,
    };

    let raw = match fetched {
        Ok(raw) => raw,
        Err(e) => {
            // Local recovery: one broken link never aborts the crawl.
            tracing::warn!(url = %task.url, error = %e, "fetch failed, abandoning branch");
            shared.pages_failed.fetch_add(1, Ordering::SeqCst);
            return;
        }
    };

    let parsed = match shared.parser.parse(&raw, &task.url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(url = %task.url, error = %e, "parse failed, abandoning branch");
            shared.pages_failed.fetch_add(1, Ordering::SeqCst);
            return;
        }
    };

    if parsed.text.to_lowercase().contains(&shared.keyword_lower) {
        let sentiment = shared.scorer.as_deref().and_then(|scorer| {
            match scorer.score(&normalize_whitespace(&parsed.text)) {
                Ok(polarity) => Some(Sentiment::from_polarity(polarity)),
                Err(e) => {
                    tracing::warn!(
                        url = %task.url,
                        error = %e,
                        "sentiment scoring failed, reporting match without it"
                    );
                    None
                }
            }
        });

        tracing::info!(url = %task.url, depth = task.depth, "keyword match");
        shared.matches_found.fetch_add(1, Ordering::SeqCst);
        shared.sink.record(MatchRecord {
            url: task.url.clone(),
            depth: task.depth,
            keyword: shared.config.keyword.clone(),
            sentiment,
        });
    }

    let child_depth = task.depth + 1;
    if shared.frontier.should_explore(child_depth) {
        let mut children = Vec::with_capacity(parsed.links.len());
        for link in &parsed.links {
            match normalize_url(link.as_str()) {
                Ok(url) => children.push(CrawlTask::new(url, child_depth)),
                Err(e) => {
                    tracing::trace!(link = %link, error = %e, "skipping uncrawlable link");
                }
            }
        }
        shared.frontier.extend(children);
    }

    if fetched_so_far % 10 == 0 {
        tracing::info!(
            pages = fetched_so_far,
            queued = shared.frontier.len(),
            matches = shared.matches_found.load(Ordering::SeqCst),
            "progress"
        );
    }
}

async fn throttled_fetch(
    shared: &EngineShared,
    host: &str,
    task: &CrawlTask,
) -> Result<Vec<u8>, FetchError> {
    shared.limiter.acquire(host).await;
    tracing::debug!(url = %task.url, depth = task.depth, "fetching");
    shared.fetcher.fetch(&task.url, shared.config.timeout()).await
}
