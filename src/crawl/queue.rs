// src/crawl/queue.rs
// =============================================================================
// The crawl driver: a breadth-first walk over one website.
//
// How it works:
// 1. Start with the seed URL in the frontier (a FIFO queue)
// 2. Pop the next URL, wait (if pacing is on), fetch it
// 3. If it came back 2xx as HTML or CSS, let the classifier sort its links
// 4. New pages go to the back of the queue, new documents go to the sink
// 5. Repeat until the queue is empty (or after one page in single-page mode)
//
// Guarantees:
// - A URL enters the frontier at most once (the seen-pages set is checked
//   before every push, inside the classifier)
// - A document is handed to the sink at most once
// - A failed fetch never stops the crawl
//
// Rust concepts:
// - VecDeque: push_back() + pop_front() make a real FIFO
// - Arc<dyn Fetcher>: the fetcher is shared with the downloader
// =============================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, error, info};
use serde::Serialize;
use url::Url;

use super::classify::{Classifier, LinkPatterns, TraversalState, DEFAULT_DOCUMENT_PATTERN};
use super::pacing::Pacing;
use super::report::DocumentSink;
use super::scope::{ScopeMode, SiteScope};
use crate::fetch::Fetcher;

/// Behaviour switches for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Regex matched (case-insensitively) against absolute URLs
    pub document_pattern: String,
    pub pacing: Pacing,
    /// Stop after the seed page
    pub single_page: bool,
    pub scope: ScopeMode,
    /// Only count documents that are inside the site scope
    pub documents_in_scope: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            document_pattern: DEFAULT_DOCUMENT_PATTERN.to_string(),
            pacing: Pacing::default(),
            single_page: false,
            scope: ScopeMode::default(),
            documents_in_scope: false,
        }
    }
}

/// Summary of a finished crawl (also the --json output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub seed_url: String,
    /// Distinct URLs that entered the frontier
    pub pages_seen: usize,
    /// Fetch attempts, failed ones included
    pub pages_visited: usize,
    /// Caught documents in discovery order
    pub documents: Vec<String>,
}

pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    sink: Box<dyn DocumentSink>,
    patterns: LinkPatterns,
    options: CrawlOptions,
}

impl Crawler {
    /// Compiles the document pattern up front so a bad `--accept` value is
    /// rejected before any request goes out.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        sink: Box<dyn DocumentSink>,
        options: CrawlOptions,
    ) -> Result<Self, regex::Error> {
        let patterns = LinkPatterns::new(&options.document_pattern)?;

        Ok(Self {
            fetcher,
            sink,
            patterns,
            options,
        })
    }

    /// Crawls from `seed_url` until the frontier is exhausted.
    pub async fn run(&self, seed_url: &str) -> CrawlReport {
        // "https://example.com" and "https://example.com/" are the same page
        let seed_url = normalize_seed(seed_url);

        let classifier = Classifier::new(
            SiteScope::new(&seed_url, self.options.scope),
            self.patterns.clone(),
            self.options.documents_in_scope,
        );

        info!(
            "starting crawl of {} (site host: {})",
            seed_url,
            classifier.scope().host().unwrap_or("none")
        );

        let mut frontier = VecDeque::from([seed_url.clone()]);
        let mut state = TraversalState::with_seed(&seed_url);
        let mut documents = Vec::new();
        let mut pages_visited = 0;

        while let Some(page_url) = frontier.pop_front() {
            // Be polite: wait before every request, the first one included
            self.options.pacing.pause().await;

            info!("tries page {}", page_url);
            pages_visited += 1;

            match self.fetcher.fetch(&page_url).await {
                Err(e) => {
                    // Unreachable page: note it and move on to the next one
                    error!("failed to fetch {}: {}", page_url, e);
                    eprintln!("  Warning: Failed to fetch {}: {}", page_url, e);
                }
                Ok(page) if page.is_success() && is_textual(page.content_type.as_deref()) => {
                    // Resolve against where we actually landed, which differs
                    // from page_url after a redirect
                    let links = classifier.classify_links(&page.url, &page.text(), &mut state);
                    if links.is_empty() {
                        debug!("nothing new on {}", page_url);
                    }

                    for url in links.noise {
                        debug!("ignoring link {}", url);
                    }

                    // New pages wait their turn at the back of the queue
                    for url in links.pages {
                        info!("will explore {}", url);
                        frontier.push_back(url);
                    }

                    // A sink error (e.g. a failed download) is reported, the
                    // document still counts as caught
                    for url in links.documents {
                        if let Err(e) = self.sink.document(&url).await {
                            error!("failed to handle document {}: {:#}", url, e);
                            eprintln!("  Warning: {}: {:#}", url, e);
                        }
                        documents.push(url);
                    }
                }
                Ok(page) => {
                    // Error status or a binary body: nothing to scan
                    debug!("status code of {} : {}", page_url, page.status);
                    debug!(
                        "content-type of {} : {}",
                        page_url,
                        page.content_type.as_deref().unwrap_or("none")
                    );
                }
            }

            if self.options.single_page {
                break;
            }
        }

        info!(
            "found {} pages, {} doc(s)",
            state.seen_pages.len(),
            state.caught_documents.len()
        );

        CrawlReport {
            pages_seen: state.seen_pages.len(),
            seed_url,
            pages_visited,
            documents,
        }
    }
}

// Parsing adds the implicit "/" path and lowercases the host, so the seed
// matches the links that point back at it. Unparsable seeds are kept as is.
fn normalize_seed(seed_url: &str) -> String {
    match Url::parse(seed_url) {
        Ok(url) => url.to_string(),
        Err(_) => seed_url.to_string(),
    }
}

// Only HTML and CSS are scanned for links
fn is_textual(content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("text/html") || ct.contains("text/css")
        }
        None => false,
    }
}
