//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full crawl cycle end-to-end: real HTTP fetcher, real HTML parser, real
//! frontier, real engine.

use seine::config::Config;
use seine::crawler::{CrawlEngine, CrawlStats, HtmlParser, HttpFetcher};
use seine::report::{MatchRecord, MemorySink, ReportSink};
use seine::sentiment::{LexiconScorer, SentimentScorer};
use seine::SentimentLabel;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration for a single seed
fn test_config(seed: String, keyword: &str, max_depth: u32) -> Config {
    let mut config = Config::new(vec![seed], keyword);
    config.max_depth = max_depth;
    config.delay_ms = 0;
    config.timeout_secs = 5;
    config
}

/// Runs a crawl with the real fetcher and parser, collecting matches
async fn run_crawl(
    config: Config,
    scorer: Option<Arc<dyn SentimentScorer>>,
) -> (CrawlStats, Vec<MatchRecord>) {
    let sink = Arc::new(MemorySink::new());
    let engine = CrawlEngine::new(
        config,
        Arc::new(HttpFetcher::new("seine-test/0.1").expect("failed to build fetcher")),
        Arc::new(HtmlParser::new()),
        scorer,
        sink.clone(),
    )
    .expect("failed to build engine");

    let stats = engine.run().await;
    (stats, sink.finalize())
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_cyclic_graph_terminates() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // seed -> /a -> /b -> seed: a cycle that must be broken by dedup
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!("<a href=\"{}/a\">a</a>", base)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html_page(&format!("<a href=\"{}/b\">b</a>", base)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page(&format!("<a href=\"{}/\">home</a>", base)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "nothing", 2);
    let (stats, _matches) = run_crawl(config, None).await;

    // Exactly {seed, a, b}, each fetched once, and the crawl terminated
    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!("<a href=\"{}/level1\">1</a>", base)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level1"))
        .respond_with(html_page(&format!("<a href=\"{}/level2\">2</a>", base)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page(&format!("<a href=\"{}/level3\">3</a>", base)))
        .mount(&mock_server)
        .await;

    // Depth 3 is beyond the bound and must never be requested
    Mock::given(method("GET"))
        .and(path("/level3"))
        .respond_with(html_page("too deep"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "nothing", 2);
    let (stats, _matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_keyword_scenario_two_pages() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // The seed mentions the keyword (capitalized) and links to a child page
    // that has neither keyword nor links.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            "<p>Bitcoins are volatile</p><a href=\"{}/other\">other</a>",
            base
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/other"))
        .respond_with(html_page("<p>nothing to see</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "bitcoins", 1);
    let (stats, matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].depth, 0);
    assert_eq!(matches[0].keyword, "bitcoins");
    assert!(matches[0].url.as_str().ends_with('/'));
}

#[tokio::test]
async fn test_failed_child_does_not_stop_siblings() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            "<a href=\"{}/broken\">broken</a><a href=\"{}/ok\">ok</a>",
            base, base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page("<p>bitcoins live here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "bitcoins", 1);
    let (stats, matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_failed, 1);
    assert_eq!(matches.len(), 1);
    assert!(matches[0].url.as_str().ends_with("/ok"));
}

#[tokio::test]
async fn test_link_spellings_fetch_once() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Four spellings of the same resource; dedup must collapse them into a
    // single fetch.
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            concat!(
                "<a href=\"{0}/page\">1</a>",
                "<a href=\"{0}/page/\">2</a>",
                "<a href=\"{0}/page#frag\">3</a>",
                "<a href=\"{0}/page?utm_source=x\">4</a>"
            ),
            base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html_page("<p>child</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "nothing", 1);
    let (stats, _matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_fetched, 2);
}

#[tokio::test]
async fn test_sentiment_attached_end_to_end() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            "<p>Bitcoins crash and panic spreads, a terrible loss</p>",
        ))
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "bitcoins", 0);
    let (_stats, matches) = run_crawl(config, Some(Arc::new(LexiconScorer::new()))).await;

    assert_eq!(matches.len(), 1);
    let sentiment = matches[0].sentiment.as_ref().expect("sentiment missing");
    assert_eq!(sentiment.label, SentimentLabel::Negative);
    assert!(sentiment.polarity < 0.0);
    assert!(sentiment.polarity >= -1.0);
}

#[tokio::test]
async fn test_match_records_stream_in_discovery_order() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            "<p>rust at the root</p><a href=\"{0}/first\">f</a><a href=\"{0}/second\">s</a>",
            base
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/first"))
        .respond_with(html_page("<p>rust again</p>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/second"))
        .respond_with(html_page("<p>rust once more</p>"))
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "rust", 1);
    let (stats, matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(matches.len(), 3);
    // Depth-first, single worker: root first, then /first before /second
    assert_eq!(matches[0].depth, 0);
    assert!(matches[1].url.as_str().ends_with("/first"));
    assert!(matches[2].url.as_str().ends_with("/second"));
}

#[tokio::test]
async fn test_non_html_child_is_local_failure() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            "<a href=\"{0}/binary\">bin</a><a href=\"{0}/text\">txt</a>",
            base
        )))
        .mount(&mock_server)
        .await;

    // A PDF-ish payload with NUL bytes fails parsing, not the crawl
    Mock::given(method("GET"))
        .and(path("/binary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46, 0x00, 0x01])
                .insert_header("content-type", "application/pdf"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/text"))
        .respond_with(html_page("<p>bitcoins here</p>"))
        .mount(&mock_server)
        .await;

    let config = test_config(format!("{}/", base), "bitcoins", 1);
    let (stats, matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_failed, 1);
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn test_concurrent_crawl_never_fetches_twice() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    // Diamond graph: both /a and /b link to /shared
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            "<a href=\"{0}/a\">a</a><a href=\"{0}/b\">b</a>",
            base
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    for node in ["a", "b"] {
        Mock::given(method("GET"))
            .and(path(format!("/{}", node)))
            .respond_with(html_page(&format!("<a href=\"{}/shared\">s</a>", base)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(html_page("<p>leaf</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = test_config(format!("{}/", base), "nothing", 2);
    config.concurrency = 4;
    let (stats, _matches) = run_crawl(config, None).await;

    assert_eq!(stats.pages_fetched, 4);
}
