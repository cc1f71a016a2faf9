// src/crawl/report.rs
// =============================================================================
// What happens to a document once the classifier catches it.
//
// The crawl loop doesn't decide between "print it" and "download it"; it
// hands every new document to a DocumentSink chosen by main.rs:
// - StdoutSink: prints the URL (the default listing mode)
// - SilentSink: does nothing, used with --json where the final report
//   carries the list instead
// - download::Downloader: fetches the document to disk (--download)
// =============================================================================

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DocumentSink: Send + Sync {
    /// Called exactly once per caught document, in discovery order.
    async fn document(&self, url: &str) -> Result<()>;
}

/// Prints each document URL on its own stdout line, ready to be fed back
/// to `download-files`.
#[derive(Debug, Default)]
pub struct StdoutSink;

#[async_trait]
impl DocumentSink for StdoutSink {
    async fn document(&self, url: &str) -> Result<()> {
        println!("{}", url);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SilentSink;

#[async_trait]
impl DocumentSink for SilentSink {
    async fn document(&self, _url: &str) -> Result<()> {
        Ok(())
    }
}
