//! Crawl tests against in-memory sites
//!
//! These tests run the coordinator on real OS threads with a stub page reader
//! and check what the content handler sees.

use crate::common::{RecordingHandler, SiteReader, Visit};
use sitewalk::crawler::{Coordinator, CrawlSettings};
use sitewalk::output::StatsCollector;
use sitewalk::pool::{Launcher, OsThreads, WorkerPool};
use sitewalk::CrawlError;
use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, Scope};
use std::time::Duration;

/// Upper bound for any crawl in this file to finish
const CRAWL_DEADLINE: Duration = Duration::from_secs(30);

/// Fails to start the worker at `fail_at`; the rest start normally
struct FailingLauncher {
    fail_at: usize,
    inner: OsThreads,
}

impl Launcher for FailingLauncher {
    fn launch<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        index: usize,
        work: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope,
    {
        if index == self.fail_at {
            return Err(io::Error::new(
                io::ErrorKind::WouldBlock,
                "Resource temporarily unavailable",
            ));
        }
        self.inner.launch(scope, index, work)
    }
}

/// Seed of every generated site
const SITE_ROOT: &str = "https://example.org/site";

/// Runs `f` on its own thread and fails the test if it misses the deadline
fn within_deadline<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    match rx.recv_timeout(CRAWL_DEADLINE) {
        Ok(value) => value,
        Err(RecvTimeoutError::Timeout) => panic!("crawl did not terminate in time"),
        Err(RecvTimeoutError::Disconnected) => panic!("crawl thread panicked"),
    }
}

/// A site rooted at `/site` with `pages` pages `/site/p0..pN` below it
///
/// The root links to `p0`; every page links to its successor, two tree
/// children, a scattered page and back to `p0`, so all `pages + 1` URLs are
/// reachable and most are linked from several places.
fn generated_site(pages: usize) -> HashMap<String, String> {
    let mut site: HashMap<String, String> = (0..pages)
        .map(|i| {
            let links: String = [i + 1, i * 2 + 1, i * 2 + 2, (i * 7) % pages, 0]
                .iter()
                .filter(|&&target| target < pages)
                .map(|target| format!(r#"<a href="/site/p{}">p{}</a>"#, target, target))
                .collect();
            (
                format!("{}/p{}", SITE_ROOT, i),
                format!("<html><body>{}</body></html>", links),
            )
        })
        .collect();
    site.insert(
        SITE_ROOT.to_string(),
        r#"<html><body><a href="/site/p0">Start</a></body></html>"#.to_string(),
    );
    site
}

/// Crawls a generated site and returns the visited URLs and `finish` count
fn crawl_generated(pages: usize, workers: usize, delay: Duration) -> (Vec<String>, usize, usize) {
    within_deadline(move || {
        let reader = SiteReader::from_map(generated_site(pages)).with_delay(delay);
        let handler = RecordingHandler::new();
        Coordinator::new(reader, CrawlSettings::new(workers))
            .crawl(SITE_ROOT, &handler)
            .expect("crawl failed");
        (handler.urls(), handler.finish_calls(), handler.calls_after_finish())
    })
}

/// Asserts every page of a generated site was visited exactly once
fn assert_each_page_once(urls: &[String], pages: usize) {
    let distinct: HashSet<&String> = urls.iter().collect();
    assert_eq!(distinct.len(), urls.len(), "a page was visited twice");
    assert_eq!(urls.len(), pages + 1);
    assert!(distinct.contains(&SITE_ROOT.to_string()));
    assert!(distinct.contains(&format!("{}/p{}", SITE_ROOT, pages - 1)));
}

#[test]
fn test_small_site_two_workers() {
    let reader = SiteReader::new(&[
        (
            "https://example.org/a",
            r#"<a href="/a/b">B</a> <a href="/a/c">C</a>"#,
        ),
        ("https://example.org/a/b", "<p>no links</p>"),
        ("https://example.org/a/c", "<p>no links</p>"),
    ]);
    let handler = RecordingHandler::new();

    let result = Coordinator::new(reader, CrawlSettings::new(2)).crawl("https://example.org/a", &handler);

    assert!(result.is_ok());
    assert_eq!(
        handler.visits(),
        vec![
            Visit {
                url: "https://example.org/a".to_string(),
                status: 200,
                depth: 1,
                children: vec!["/a/b".to_string(), "/a/c".to_string()],
            },
            Visit {
                url: "https://example.org/a/b".to_string(),
                status: 200,
                depth: 2,
                children: vec![],
            },
            Visit {
                url: "https://example.org/a/c".to_string(),
                status: 200,
                depth: 2,
                children: vec![],
            },
        ]
    );
    assert_eq!(handler.finish_calls(), 1);
    assert_eq!(handler.calls_after_finish(), 0);
}

#[test]
fn test_invalid_seed_url() {
    let reader = SiteReader::new(&[]);
    let handler = RecordingHandler::new();
    let coordinator = Coordinator::new(reader, CrawlSettings::new(4));

    let err = coordinator.crawl("not-a-url", &handler).unwrap_err();

    assert!(matches!(err, CrawlError::InvalidUrl { .. }));
    assert_eq!(err.to_string(), "invalid url: not-a-url");
    assert!(handler.visits().is_empty());
    assert_eq!(handler.finish_calls(), 0);
    assert_eq!(coordinator.reader().fetch_count(), 0);
}

#[test]
fn test_thread_creation_failure() {
    let (result, visits, finish_calls) = within_deadline(|| {
        let site = generated_site(50);
        let reader = SiteReader::from_map(site).with_delay(Duration::from_millis(2));
        let pool = WorkerPool::with_launcher(FailingLauncher {
            fail_at: 2,
            inner: OsThreads::new("crawl"),
        });
        let handler = RecordingHandler::new();

        let result = Coordinator::with_pool(reader, CrawlSettings::new(5), pool)
            .crawl(SITE_ROOT, &handler);
        (result, handler.visits().len(), handler.finish_calls())
    });

    match result {
        Err(CrawlError::ThreadCreation { source }) => {
            assert!(source.to_string().contains("worker 2"));
        }
        other => panic!("expected thread creation failure, got {:?}", other),
    }
    // The two started workers may have fetched a few pages, never the whole site
    assert!(visits < 51);
    assert_eq!(finish_calls, 0);
}

#[test]
fn test_thread_creation_failure_message() {
    let pool = WorkerPool::with_launcher(FailingLauncher {
        fail_at: 0,
        inner: OsThreads::default(),
    });
    let handler = RecordingHandler::new();

    let err = Coordinator::with_pool(SiteReader::new(&[]), CrawlSettings::new(3), pool)
        .crawl("https://example.org/", &handler)
        .unwrap_err();

    assert!(err.to_string().starts_with("thread creation system error"));
    assert!(handler.visits().is_empty());
}

#[test]
fn test_large_site_terminates_and_visits_each_page_once() {
    let (urls, finish_calls, calls_after_finish) = crawl_generated(300, 8, Duration::ZERO);

    assert_each_page_once(&urls, 300);
    assert_eq!(finish_calls, 1);
    assert_eq!(calls_after_finish, 0);
}

#[test]
fn test_termination_for_every_pool_size() {
    for workers in 1..=9 {
        for _ in 0..5 {
            let (urls, finish_calls, calls_after_finish) =
                crawl_generated(120, workers, Duration::ZERO);

            assert_each_page_once(&urls, 120);
            assert_eq!(finish_calls, 1, "{} workers", workers);
            assert_eq!(calls_after_finish, 0, "{} workers", workers);
        }
    }
}

#[test]
fn test_slow_reader_with_many_workers() {
    let (urls, finish_calls, _) = crawl_generated(60, 16, Duration::from_millis(3));

    assert_each_page_once(&urls, 60);
    assert_eq!(finish_calls, 1);
}

#[test]
fn test_single_worker() {
    let reader = SiteReader::new(&[
        ("https://example.org/docs", r#"<a href="/docs/one">1</a>"#),
        ("https://example.org/docs/one", r#"<a href="/docs/two.html">2</a>"#),
        ("https://example.org/docs/two.html", r#"<a href="/docs">back</a>"#),
    ]);
    let handler = RecordingHandler::new();

    Coordinator::new(reader, CrawlSettings::new(1))
        .crawl("https://example.org/docs", &handler)
        .unwrap();

    assert_eq!(
        handler.urls(),
        vec![
            "https://example.org/docs",
            "https://example.org/docs/one",
            "https://example.org/docs/two.html"
        ]
    );
    assert_eq!(handler.finish_calls(), 1);
}

#[test]
fn test_more_workers_than_pages() {
    let reader = SiteReader::new(&[("https://example.org/only", "<p>alone</p>")]);
    let handler = RecordingHandler::new();

    within_deadline(move || {
        Coordinator::new(reader, CrawlSettings::new(32))
            .crawl("https://example.org/only", &handler)
            .unwrap();
        assert_eq!(handler.urls(), vec!["https://example.org/only"]);
        assert_eq!(handler.finish_calls(), 1);
    });
}

#[test]
fn test_depth_limit() {
    let reader = SiteReader::new(&[
        ("https://example.org/d", r#"<a href="/d/1">1</a>"#),
        ("https://example.org/d/1", r#"<a href="/d/1/2">2</a>"#),
        ("https://example.org/d/1/2", r#"<a href="/d/1/2/3">3</a>"#),
        ("https://example.org/d/1/2/3", "<p>too deep</p>"),
    ]);
    let handler = RecordingHandler::new();

    Coordinator::new(reader, CrawlSettings::new(3).with_max_depth(2))
        .crawl("https://example.org/d", &handler)
        .unwrap();

    let depths: Vec<(String, u32)> = handler
        .visits()
        .into_iter()
        .map(|visit| (visit.url, visit.depth))
        .collect();
    assert_eq!(
        depths,
        vec![
            ("https://example.org/d".to_string(), 1),
            ("https://example.org/d/1".to_string(), 2),
            ("https://example.org/d/1/2".to_string(), 3),
        ]
    );
}

#[test]
fn test_dead_links_are_reported_without_children() {
    let reader = SiteReader::new(&[(
        "https://example.org/blog",
        r#"<a href="/blog/gone">Gone</a><a href="/blog/also-gone">Also gone</a>"#,
    )]);
    let handler = RecordingHandler::new();

    Coordinator::new(reader, CrawlSettings::new(2))
        .crawl("https://example.org/blog", &handler)
        .unwrap();

    let failed: Vec<Visit> = handler
        .visits()
        .into_iter()
        .filter(|visit| visit.status == 404)
        .collect();
    assert_eq!(failed.len(), 2);
    assert!(failed.iter().all(|visit| visit.children.is_empty()));
}

#[test]
fn test_links_outside_root_are_not_followed() {
    let reader = SiteReader::new(&[
        (
            "https://example.org/install",
            r#"
            <a href="/installer">Installer</a>
            <a href="https://other.org/install/x">Elsewhere</a>
            <a href="/install/step1.html">Step 1</a>
            "#,
        ),
        ("https://example.org/install/step1.html", "<p>step</p>"),
        ("https://example.org/installer", "<p>not part of the crawl</p>"),
    ]);
    let handler = RecordingHandler::new();

    Coordinator::new(reader, CrawlSettings::new(2))
        .crawl("https://example.org/install", &handler)
        .unwrap();

    assert_eq!(
        handler.urls(),
        vec![
            "https://example.org/install",
            "https://example.org/install/step1.html"
        ]
    );
}

#[test]
fn test_stats_collector_as_handler() {
    let collector = StatsCollector::new();

    within_deadline(move || {
        Coordinator::new(SiteReader::from_map(generated_site(40)), CrawlSettings::new(4))
            .crawl(SITE_ROOT, &collector)
            .unwrap();

        let stats = collector.snapshot();
        assert!(collector.is_finished());
        assert_eq!(stats.site, "https://example.org");
        assert_eq!(stats.pages_fetched, 41);
        assert_eq!(stats.pages_succeeded, 41);
        assert_eq!(stats.pages_failed, 0);
        assert_eq!(stats.pages_by_depth.get(&1), Some(&1));
        assert_eq!(stats.pages_by_depth.get(&2), Some(&1));
    });
}
