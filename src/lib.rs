//! Seine: a depth-bounded keyword crawler
//!
//! This crate implements a web crawler that sweeps the link graph reachable
//! from a set of seed URLs, tests each page's text against a keyword, and
//! optionally scores the sentiment of matching pages.

pub mod config;
pub mod crawler;
pub mod frontier;
pub mod report;
pub mod sentiment;
pub mod url;

use thiserror::Error;

/// Main error type for seine operations
#[derive(Debug, Error)]
pub enum SeineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Sentiment error: {0}")]
    Scorer(#[from] ScorerError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These are the only fatal errors: they are reported before any crawling
/// starts and make the process exit non-zero.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors produced while fetching a single page
///
/// Recoverable: the branch rooted at the failing URL is abandoned and the
/// crawl continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("{0}")]
    Other(String),
}

/// Errors produced while parsing fetched content
///
/// Treated exactly like a fetch failure: local to the URL, never fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("content is not text (binary data)")]
    BinaryContent,

    #[error("document is empty")]
    EmptyDocument,
}

/// Errors produced while scoring sentiment
///
/// Recoverable: the match is still reported, just without a sentiment field.
#[derive(Debug, Error)]
pub enum ScorerError {
    #[error("cannot score empty text")]
    EmptyInput,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for seine operations
pub type Result<T> = std::result::Result<T, SeineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::url::{host_key, normalize_url};
pub use config::{Config, TraversalOrder};
pub use crawler::{crawl, CrawlEngine, CrawlOutcome, CrawlStats};
pub use frontier::{CrawlTask, Frontier};
pub use report::{ConsoleSink, MatchRecord, MemorySink, OutputFormat, ReportSink};
pub use sentiment::{LexiconScorer, Sentiment, SentimentLabel, SentimentScorer};
