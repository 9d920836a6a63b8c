//! Match reporting
//!
//! A [`ReportSink`] receives one [`MatchRecord`] per page on which the
//! keyword was found. Recording must never stall a crawl worker for more
//! than a negligible bound, so sinks do no I/O heavier than a line write.
//! `finalize` returns the records in the order the matches were discovered.

use crate::sentiment::Sentiment;
use serde::Serialize;
use std::sync::Mutex;
use url::Url;

/// A page on which the keyword was found
///
/// Created once per matching page; immutable afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub url: Url,
    pub depth: u32,
    pub keyword: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// Receives match records from crawl workers
pub trait ReportSink: Send + Sync {
    /// Records a match; must not block past a negligible bound
    fn record(&self, record: MatchRecord);

    /// Returns all records in discovery order
    fn finalize(&self) -> Vec<MatchRecord>;
}

/// Sink that collects records in memory
///
/// The default for library callers and tests.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<MatchRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for MemorySink {
    fn record(&self, record: MatchRecord) {
        self.records.lock().unwrap().push(record);
    }

    fn finalize(&self) -> Vec<MatchRecord> {
        self.records.lock().unwrap().clone()
    }
}

/// Output format for the console sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable one-liners
    Text,
    /// One JSON object per line
    Json,
}

/// Sink that streams each match to stdout as it is discovered
///
/// Also collects the records so `finalize` can hand them back in order.
pub struct ConsoleSink {
    format: OutputFormat,
    records: Mutex<Vec<MatchRecord>>,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            records: Mutex::new(Vec::new()),
        }
    }

    fn render(&self, record: &MatchRecord) -> String {
        match self.format {
            OutputFormat::Text => match &record.sentiment {
                Some(sentiment) => format!(
                    "keyword \"{}\" found at {} (depth {}, sentiment {} {:+.2})",
                    record.keyword, record.url, record.depth, sentiment.label, sentiment.polarity
                ),
                None => format!(
                    "keyword \"{}\" found at {} (depth {})",
                    record.keyword, record.url, record.depth
                ),
            },
            OutputFormat::Json => {
                serde_json::to_string(record).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
            }
        }
    }
}

impl ReportSink for ConsoleSink {
    fn record(&self, record: MatchRecord) {
        println!("{}", self.render(&record));
        self.records.lock().unwrap().push(record);
    }

    fn finalize(&self) -> Vec<MatchRecord> {
        self.records.lock().unwrap().clone()
    }
}
