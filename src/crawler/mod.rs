//! Crawler module
//!
//! This module contains the core crawling logic:
//! - HTTP fetching and error classification
//! - HTML parsing and link extraction
//! - Per-host rate limiting
//! - Overall crawl orchestration

mod engine;
mod fetcher;
mod limiter;
mod parser;

pub use engine::{CrawlEngine, CrawlStats};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use limiter::HostLimiter;
pub use parser::{HtmlParser, PageParser, ParsedPage};

use crate::config::Config;
use crate::report::{MatchRecord, MemorySink, ReportSink};
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::Result;
use std::sync::Arc;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("seine/", env!("CARGO_PKG_VERSION"));

/// Result of a completed crawl run
#[derive(Debug)]
pub struct CrawlOutcome {
    pub stats: CrawlStats,
    /// Match records in discovery order
    pub matches: Vec<MatchRecord>,
}

/// Runs a complete crawl with the default collaborators
///
/// Builds the reqwest-backed fetcher, the scraper-backed parser, the
/// built-in lexicon scorer (when `config.sentiment` is set), and an
/// in-memory sink, then runs the crawl to completion.
///
/// # Example
///
/// ```no_run
/// use seine::{crawl, Config};
///
/// # async fn example() -> seine::Result<()> {
/// let config = Config::new(vec!["https://example.com/".to_string()], "rust");
/// let outcome = crawl(config).await?;
/// for record in &outcome.matches {
///     println!("{} (depth {})", record.url, record.depth);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config) -> Result<CrawlOutcome> {
    let fetcher = Arc::new(HttpFetcher::new(USER_AGENT)?);
    let parser = Arc::new(HtmlParser::new());
    let scorer: Option<Arc<dyn SentimentScorer>> = config
        .sentiment
        .then(|| Arc::new(LexiconScorer::new()) as Arc<dyn SentimentScorer>);
    let sink = Arc::new(MemorySink::new());

    let engine = CrawlEngine::new(config, fetcher, parser, scorer, sink.clone())?;
    let stats = engine.run().await;

    Ok(CrawlOutcome {
        stats,
        matches: sink.finalize(),
    })
}
