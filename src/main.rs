//! Seine main entry point
//!
//! Command-line interface for the seine keyword crawler.

use anyhow::Context;
use clap::Parser;
use seine::config::{load_config_with_hash, validate, Config, TraversalOrder};
use seine::crawler::{CrawlEngine, HtmlParser, HttpFetcher, USER_AGENT};
use seine::report::{ConsoleSink, OutputFormat, ReportSink};
use seine::sentiment::{LexiconScorer, SentimentScorer};
use seine::ConfigError;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Seine: a depth-bounded keyword crawler
///
/// Seine sweeps the link graph reachable from the given seed URLs, reports
/// every page whose text contains the keyword, and can score the sentiment
/// of matching pages. Crawl parameters come either from the command line or
/// from a TOML configuration file.
#[derive(Parser, Debug)]
#[command(name = "seine")]
#[command(version)]
#[command(about = "A depth-bounded keyword crawler", long_about = None)]
struct Cli {
    /// Keyword to search for (case-insensitive)
    #[arg(value_name = "KEYWORD", required_unless_present = "config")]
    keyword: Option<String>,

    /// Seed URLs to start crawling from
    #[arg(value_name = "SEED", required_unless_present = "config")]
    seeds: Vec<String>,

    /// Read seeds, keyword, and limits from a TOML configuration file
    #[arg(long, value_name = "FILE", conflicts_with_all = ["keyword", "seeds"])]
    config: Option<PathBuf>,

    /// Maximum number of link hops from a seed
    #[arg(long, default_value_t = 2)]
    max_depth: i64,

    /// Politeness delay between requests to the same host, in seconds
    #[arg(long, default_value_t = 0.5)]
    delay: f64,

    /// Hard cap on the total number of pages fetched
    #[arg(long, default_value_t = 1000)]
    max_pages: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Number of concurrent fetch workers
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Traversal order for discovered links
    #[arg(long, value_enum, default_value_t = OrderArg::Dfs)]
    order: OrderArg,

    /// Score the sentiment of matching pages
    #[arg(long)]
    sentiment: bool,

    /// Emit matches as JSON lines instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OrderArg {
    /// Depth-first: descend into each link before its siblings
    Dfs,
    /// Breadth-first: finish each depth level before the next
    Bfs,
}

impl From<OrderArg> for TraversalOrder {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Dfs => TraversalOrder::DepthFirst,
            OrderArg::Bfs => TraversalOrder::BreadthFirst,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    run_crawl(config, format).await
}

/// Assembles the run configuration from the CLI, or loads it from a file
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    if let Some(path) = &cli.config {
        let (mut config, hash) = load_config_with_hash(path)?;
        tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
        if cli.sentiment {
            config.sentiment = true;
        }
        return Ok(config);
    }

    if cli.max_depth < 0 {
        return Err(ConfigError::Validation(format!(
            "max-depth must be non-negative, got {}",
            cli.max_depth
        )));
    }
    if cli.delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "delay must be non-negative, got {}",
            cli.delay
        )));
    }

    let keyword = cli
        .keyword
        .clone()
        .ok_or_else(|| ConfigError::Validation("a keyword is required".to_string()))?;

    let config = Config {
        seeds: cli.seeds.clone(),
        keyword,
        max_depth: cli.max_depth as u32,
        delay_ms: (cli.delay * 1000.0).round() as u64,
        max_pages: cli.max_pages,
        timeout_secs: cli.timeout,
        concurrency: cli.concurrency,
        order: cli.order.into(),
        sentiment: cli.sentiment,
    };

    validate(&config)?;
    Ok(config)
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seine=info,warn"),
            1 => EnvFilter::new("seine=debug,info"),
            2 => EnvFilter::new("seine=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs the crawl, wiring Ctrl-C to the shutdown channel
async fn run_crawl(config: Config, format: OutputFormat) -> anyhow::Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(USER_AGENT).context("failed to build HTTP client")?);
    let parser = Arc::new(HtmlParser::new());
    let scorer: Option<Arc<dyn SentimentScorer>> = config
        .sentiment
        .then(|| Arc::new(LexiconScorer::new()) as Arc<dyn SentimentScorer>);
    let sink = Arc::new(ConsoleSink::new(format));

    let engine = CrawlEngine::new(config, fetcher, parser, scorer, sink.clone())?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping crawl");
            let _ = shutdown_tx.send(true);
        }
    });

    let stats = engine.run_with_shutdown(shutdown_rx).await;

    if sink.finalize().is_empty() {
        tracing::info!("No matches found");
    }
    tracing::info!(
        "Done: {} pages fetched, {} matches, {} failures in {:.1}s",
        stats.pages_fetched,
        stats.matches,
        stats.pages_failed,
        stats.elapsed.as_secs_f64()
    );

    Ok(())
}
