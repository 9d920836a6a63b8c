use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Main configuration structure for a crawl run
///
/// Constructed once before a run (from CLI flags or a TOML file) and
/// read-only thereafter.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Seed URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Keyword tested (case-insensitively) against each page's text
    pub keyword: String,

    /// Maximum number of link hops from a seed
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Minimum time between requests to the same host (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Hard cap on the total number of pages fetched in one run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Number of concurrent fetch workers
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Traversal order for the frontier
    #[serde(default)]
    pub order: TraversalOrder,

    /// Whether to score the sentiment of matching pages
    #[serde(default)]
    pub sentiment: bool,
}

/// Order in which the frontier hands out queued tasks
///
/// Depth-first reproduces the reference behavior of descending into each
/// discovered link before moving on to its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TraversalOrder {
    #[default]
    DepthFirst,
    BreadthFirst,
}

fn default_max_depth() -> u32 {
    2
}

fn default_delay_ms() -> u64 {
    500
}

fn default_max_pages() -> usize {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Creates a config with defaults for everything but seeds and keyword
    pub fn new(seeds: Vec<String>, keyword: impl Into<String>) -> Self {
        Self {
            seeds,
            keyword: keyword.into(),
            max_depth: default_max_depth(),
            delay_ms: default_delay_ms(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            concurrency: default_concurrency(),
            order: TraversalOrder::default(),
            sentiment: false,
        }
    }

    /// Politeness delay between requests to the same host
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Parses and normalizes the seed URLs
    ///
    /// Seed order is preserved; a malformed seed is a configuration error,
    /// not a recoverable per-page event.
    pub fn seed_urls(&self) -> ConfigResult<Vec<Url>> {
        self.seeds
            .iter()
            .map(|seed| {
                crate::url::normalize_url(seed)
                    .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", seed, e)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new(vec!["https://example.com/".to_string()], "rust");
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.delay(), Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_pages, 1000);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.order, TraversalOrder::DepthFirst);
        assert!(!config.sentiment);
    }

    #[test]
    fn test_seed_urls_normalized() {
        let config = Config::new(
            vec!["https://EXAMPLE.com/page/#top".to_string()],
            "rust",
        );
        let seeds = config.seed_urls().unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].as_str(), "https://example.com/page");
    }

    #[test]
    fn test_seed_urls_rejects_malformed() {
        let config = Config::new(vec!["not a url".to_string()], "rust");
        assert!(matches!(
            config.seed_urls().unwrap_err(),
            ConfigError::InvalidUrl(_)
        ));
    }
}
