// src/download/mod.rs
// =============================================================================
// Saves documents to disk.
//
// Used three ways:
// - `crawl --download`: every caught document is handed here (DocumentSink)
// - `download-file URL`: a single URL
// - `download-files LIST`: a text file with one URL per line
//
// Files are named after the last path segment of the URL and written into
// the output directory. An existing file with the same name is overwritten
// without warning.
// =============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use log::{error, info};
use thiserror::Error;
use url::Url;

use crate::crawl::{DocumentSink, Pacing};
use crate::fetch::{FetchError, Fetcher};

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("no file name in URL '{0}'")]
    NoFileName(String),
    #[error("could not write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a `download-files` run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadTally {
    pub downloaded: usize,
    pub attempted: usize,
}

impl DownloadTally {
    pub fn is_complete(&self) -> bool {
        self.downloaded == self.attempted
    }
}

impl fmt::Display for DownloadTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "downloaded {} / {}", self.downloaded, self.attempted)
    }
}

pub struct Downloader {
    fetcher: Arc<dyn Fetcher>,
    pacing: Pacing,
    output_dir: PathBuf,
}

impl Downloader {
    pub fn new(fetcher: Arc<dyn Fetcher>, pacing: Pacing, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            pacing,
            output_dir: output_dir.into(),
        }
    }

    /// Waits (per pacing), fetches `url` and writes it into the output
    /// directory. Returns the path written.
    pub async fn download_file(&self, url: &str) -> Result<PathBuf, DownloadError> {
        let name = file_name_for(url).ok_or_else(|| DownloadError::NoFileName(url.to_string()))?;

        self.pacing.pause().await;

        let response = self.fetcher.fetch(url).await?;
        if !response.is_success() {
            return Err(DownloadError::Status(response.status));
        }

        let path = self.output_dir.join(name);
        tokio::fs::write(&path, &response.body)
            .await
            .map_err(|source| DownloadError::Io {
                path: path.clone(),
                source,
            })?;

        info!("saved {} ({} bytes) to {}", url, response.body.len(), path.display());
        Ok(path)
    }

    /// Downloads every URL listed in `list`, one per line.
    ///
    /// Blank lines are skipped and don't count. A failing line is reported
    /// and counted as a miss; the batch always runs to the end. Only an
    /// unreadable list file is an error.
    pub async fn download_files(&self, list: &Path) -> anyhow::Result<DownloadTally> {
        let content = tokio::fs::read_to_string(list)
            .await
            .with_context(|| format!("could not read URL list {}", list.display()))?;

        let mut tally = DownloadTally::default();

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            tally.attempted += 1;
            println!("download {} - {}", tally.attempted, line);

            match self.download_file(line).await {
                Ok(_) => tally.downloaded += 1,
                Err(e) => {
                    error!("failed to download {}: {}", line, e);
                    eprintln!("  Warning: Failed to download {}: {}", line, e);
                }
            }
        }

        println!("{}", tally);
        info!("{} from {}", tally, list.display());
        Ok(tally)
    }
}

#[async_trait]
impl DocumentSink for Downloader {
    async fn document(&self, url: &str) -> anyhow::Result<()> {
        let path = self.download_file(url).await?;
        eprintln!("  Saved {} -> {}", url, path.display());
        Ok(())
    }
}

/// Local file name for `url`: its last path segment, query and fragment
/// excluded. `None` when the URL ends with '/' or has no path.
pub fn file_name_for(url: &str) -> Option<String> {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(|s| s.to_string()),
        Err(_) => url.rsplit('/').next().map(|s| s.to_string()),
    }?;

    if segment.is_empty() || segment == "." || segment == ".." {
        None
    } else {
        Some(segment)
    }
}
