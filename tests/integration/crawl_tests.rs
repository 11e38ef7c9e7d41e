//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use strata_crawler::config::{
    load_config, Config, CrawlerConfig, OutputConfig, OutputFormat, SeedsConfig, UserAgentConfig,
};
use strata_crawler::crawler::crawl;
use strata_crawler::storage::{DocumentStore, SqliteDocumentStore, SQLITE_FILE_NAME};
use strata_crawler::CrawlStats;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing documents into `docs_dir`
fn create_test_config(docs_dir: &Path, max_depth: u32, max_urls: u64) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            max_urls,
            delay_seconds: 0.0,
            same_domain_only: false,
            respect_robots: true,
            respect_crawl_delay: true,
            request_timeout_secs: 5,
            robots_timeout_secs: 2,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
        },
        output: OutputConfig {
            documents_dir: docs_dir.to_string_lossy().to_string(),
            format: OutputFormat::Files,
            stats_path: None,
        },
        seeds: SeedsConfig::default(),
    }
}

/// An HTML response whose body is a list of anchors
fn html_page(title: &str, hrefs: &[String]) -> ResponseTemplate {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        ),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, route: &str, hrefs: &[&str], times: u64) {
    let hrefs: Vec<String> = hrefs.iter().map(|h| h.to_string()).collect();
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(route, &hrefs))
        .expect(times)
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/plain"))
        .expect(1)
        .mount(server)
        .await;
}

async fn run(config: &Config, seeds: Vec<String>) -> CrawlStats {
    crawl(config, seeds, CancellationToken::new())
        .await
        .expect("crawl setup failed")
}

fn read_meta(docs_dir: &Path, doc_id: u64) -> serde_json::Value {
    let content = fs::read_to_string(docs_dir.join(format!("{}.json", doc_id)))
        .unwrap_or_else(|e| panic!("missing metadata for doc {}: {}", doc_id, e));
    serde_json::from_str(&content).unwrap()
}

fn count_bodies(docs_dir: &Path) -> usize {
    fs::read_dir(docs_dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "html"))
                .count()
        })
        .unwrap_or(0)
}

async fn page_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() != "/robots.txt")
        .count()
}

#[tokio::test]
async fn test_depth_zero_fetches_only_the_seed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &[], 0).await;
    mount_page(&server, "/b", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 0, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.total_visited, 1);
    assert_eq!(count_bodies(temp.path()), 1);

    let meta = read_meta(temp.path(), 0);
    assert_eq!(meta["depth"], 0);
    assert_eq!(meta["title"], "/");
    assert_eq!(meta["status_code"], 200);
}

#[tokio::test]
async fn test_fragment_variants_fetched_once() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/p#one", "/p#two", "/p", "/p/", "#top"], 1).await;
    mount_page(&server, "/p", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 2);
    assert_eq!(stats.total_visited, 2);
    assert_eq!(page_requests(&server).await, 2);
}

#[tokio::test]
async fn test_same_domain_only_discards_foreign_links() {
    let home = MockServer::start().await;
    let foreign = MockServer::start().await;

    let foreign_link = format!("{}/elsewhere", foreign.uri());
    mount_page(&home, "/", &["/inside", foreign_link.as_str()], 1).await;
    mount_page(&home, "/inside", &[], 1).await;
    Mock::given(method("GET"))
        .respond_with(html_page("foreign", &[]))
        .expect(0)
        .mount(&foreign)
        .await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 2, 100);
    config.crawler.same_domain_only = true;

    let stats = run(&config, vec![home.uri()]).await;

    assert_eq!(stats.crawled, 2);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.total_visited, 2);
}

#[tokio::test]
async fn test_foreign_links_followed_without_restriction() {
    let home = MockServer::start().await;
    let foreign = MockServer::start().await;

    let foreign_link = format!("{}/elsewhere", foreign.uri());
    mount_page(&home, "/", &[foreign_link.as_str()], 1).await;
    mount_page(&foreign, "/elsewhere", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![home.uri()]).await;

    assert_eq!(stats.crawled, 2);
}

#[tokio::test]
async fn test_robots_blocked_seed_persists_nothing() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nDisallow: /private\n").await;
    mount_page(&server, "/private", &["/public"], 0).await;
    mount_page(&server, "/public", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 2, 100);

    let stats = run(&config, vec![format!("{}/private", server.uri())]).await;

    assert_eq!(stats.crawled, 0);
    assert_eq!(stats.blocked, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.total_visited, 1);
    assert_eq!(count_bodies(temp.path()), 0);
}

#[tokio::test]
async fn test_robots_rules_for_our_agent() {
    let server = MockServer::start().await;
    mount_robots(
        &server,
        "User-agent: TestBot\nDisallow: /secret\n\nUser-agent: *\nDisallow: /\n",
    )
    .await;
    mount_page(&server, "/", &["/open", "/secret"], 1).await;
    mount_page(&server, "/open", &[], 1).await;
    mount_page(&server, "/secret", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 2);
    assert_eq!(stats.blocked, 1);
}

#[tokio::test]
async fn test_robots_missing_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &[], 1).await;
    mount_page(&server, "/b", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 3);
    assert_eq!(stats.blocked, 0);
}

#[tokio::test]
async fn test_robots_server_error_fails_open() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 0, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 1);
}

#[tokio::test]
async fn test_ignore_robots_makes_no_robots_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("User-agent: *\nDisallow: /\n", "text/plain"),
        )
        .expect(0)
        .mount(&server)
        .await;
    mount_page(&server, "/", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 0, 100);
    config.crawler.respect_robots = false;

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.blocked, 0);
}

#[tokio::test]
async fn test_max_urls_stops_at_exact_budget() {
    let server = MockServer::start().await;
    let links: Vec<String> = (0..49).map(|i| format!("/p{}", i)).collect();
    let link_refs: Vec<&str> = links.iter().map(String::as_str).collect();
    mount_page(&server, "/", &link_refs, 1).await;
    for link in &links {
        Mock::given(method("GET"))
            .and(path(link.as_str()))
            .respond_with(html_page(link, &[]))
            .mount(&server)
            .await;
    }

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 5);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 5);
    assert_eq!(count_bodies(temp.path()), 5);
    assert_eq!(page_requests(&server).await, 5);

    // BFS order: the seed, then its links in document order
    assert!(read_meta(temp.path(), 4)["url"]
        .as_str()
        .unwrap()
        .ends_with("/p3"));
}

#[tokio::test]
async fn test_depth_limit_is_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/l1"], 1).await;
    mount_page(&server, "/l1", &["/l2"], 1).await;
    mount_page(&server, "/l2", &["/l3"], 1).await;
    mount_page(&server, "/l3", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 2, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 3);
    for doc_id in 0..3 {
        assert_eq!(read_meta(temp.path(), doc_id)["depth"], doc_id);
    }
}

#[tokio::test]
async fn test_cycles_do_not_cause_refetch() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &["/", "/b", "/a"], 1).await;
    mount_page(&server, "/b", &["/", "/a"], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 5, 100);

    let stats = run(&config, vec![server.uri(), format!("{}/", server.uri())]).await;

    assert_eq!(stats.crawled, 3);
    assert_eq!(stats.total_visited, 3);
    assert_eq!(page_requests(&server).await, 3);
}

#[tokio::test]
async fn test_non_html_counts_as_failure() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/report.pdf"], 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.total_visited, 2);
    assert_eq!(count_bodies(temp.path()), 1);
}

#[tokio::test]
async fn test_doc_ids_are_dense_over_successes() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/missing", "/a", "/broken", "/b"], 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/a", &[], 1).await;
    mount_page(&server, "/b", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 3);
    assert_eq!(stats.failed, 2);

    let urls: Vec<String> = (0..3)
        .map(|id| read_meta(temp.path(), id)["url"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/", server.uri()),
            format!("{}/a", server.uri()),
            format!("{}/b", server.uri()),
        ]
    );
    assert!(!temp.path().join("3.json").exists());
}

#[tokio::test]
async fn test_malformed_seeds_are_skipped() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 0, 100);

    let seeds = vec![
        "not a url".to_string(),
        "mailto:someone@example.com".to_string(),
        server.uri(),
    ];
    let stats = run(&config, seeds).await;

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.total_visited, 1);
}

#[tokio::test]
async fn test_delay_spaces_requests_to_one_origin() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &[], 1).await;
    mount_page(&server, "/b", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 1, 100);
    config.crawler.delay_seconds = 0.2;
    config.crawler.respect_robots = false;

    let start = Instant::now();
    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 3);
    assert!(start.elapsed() >= Duration::from_millis(390));
}

#[tokio::test]
async fn test_crawl_delay_from_robots_is_honored() {
    let server = MockServer::start().await;
    mount_robots(&server, "User-agent: *\nCrawl-delay: 0.3\n").await;
    mount_page(&server, "/", &["/a"], 1).await;
    mount_page(&server, "/a", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 1, 100);

    let start = Instant::now();
    let stats = run(&config, vec![server.uri()]).await;

    assert_eq!(stats.crawled, 2);
    assert!(start.elapsed() >= Duration::from_millis(290));
}

#[tokio::test]
async fn test_sqlite_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a"], 1).await;
    mount_page(&server, "/a", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 1, 100);
    config.output.format = OutputFormat::Sqlite;

    let stats = run(&config, vec![server.uri()]).await;
    assert_eq!(stats.crawled, 2);

    let store = SqliteDocumentStore::new(&temp.path().join(SQLITE_FILE_NAME)).unwrap();
    assert_eq!(store.count().unwrap(), 2);
    let meta = store.get_meta(1).unwrap().unwrap();
    assert_eq!(meta.depth, 1);
    assert!(meta.url.ends_with("/a"));
    assert_eq!(meta.sha256.len(), 64);
    assert!(store.get_body(1).unwrap().unwrap().contains("<title>/a</title>"));
}

#[tokio::test]
async fn test_cancel_lets_in_flight_request_finish() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("/", &["/a".to_string()]).set_delay(Duration::from_millis(400)))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/a", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 1, 100);
    config.crawler.respect_robots = false;

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let stats = crawl(&config, vec![server.uri()], cancel).await.unwrap();

    assert_eq!(stats.crawled, 1);
    assert_eq!(stats.total_visited, 1);
    assert_eq!(count_bodies(temp.path()), 1);
}

#[tokio::test]
async fn test_links_resolve_against_redirect_target() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/docs/", server.uri()).as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/docs/", &["intro"], 1).await;
    mount_page(&server, "/docs/intro", &[], 1).await;
    mount_page(&server, "/intro", &[], 0).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 1, 100);
    config.crawler.respect_robots = false;

    let stats = run(&config, vec![format!("{}/docs/", server.uri())]).await;

    assert_eq!(stats.crawled, 2);
    let seed = read_meta(temp.path(), 0);
    assert!(seed["url"].as_str().unwrap().ends_with("/docs"));
    assert!(seed["final_url"].as_str().unwrap().ends_with("/docs/"));
    assert!(read_meta(temp.path(), 1)["url"]
        .as_str()
        .unwrap()
        .ends_with("/docs/intro"));
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/next"], 1).await;
    mount_page(&server, "/next", &[], 1).await;

    let temp = TempDir::new().unwrap();
    let docs = temp.path().join("docs");
    let seed_file = temp.path().join("seeds.txt");
    fs::write(&seed_file, format!("# seeds\n\n{}\n", server.uri())).unwrap();

    let config_path = temp.path().join("crawler.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[crawler]
max-depth = 1
max-urls = 10
delay-seconds = 0.0
respect-robots = false

[user-agent]
crawler-name = "TestBot"
crawler-version = "1.0"
contact-url = "https://example.com/bot"

[output]
documents-dir = "{}"

[seeds]
file = "{}"
"#,
            docs.display(),
            seed_file.display()
        ),
    )
    .unwrap();

    let config = load_config(&config_path).unwrap();
    let seeds = config.seed_urls().unwrap();
    assert_eq!(seeds, vec![server.uri()]);

    let stats = run(&config, seeds).await;

    assert_eq!(stats.crawled, 2);
    assert!(docs.join("0.html").exists());
    assert!(docs.join("1.json").exists());
}
