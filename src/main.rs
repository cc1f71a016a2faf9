// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build the collaborators (HTTP fetcher, document sink, journal)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = some downloads failed, 2 = error)
//
// Output conventions:
// - stdout carries results only (document URLs, download progress, JSON)
// - stderr carries status lines and warnings
// =============================================================================

mod cli;
mod crawl;
mod download;
mod fetch;
mod logging;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use crawl::{CrawlOptions, CrawlReport, Crawler, DocumentSink, Pacing, SilentSink, StdoutSink};
use download::Downloader;
use fetch::{FetchSettings, Fetcher, HttpFetcher};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crawl {
            url,
            accept,
            download,
            single_page,
            verbose,
            scope,
            documents_in_scope,
            json,
            wait,
            output,
        } => {
            if verbose {
                let journal = logging::init_journal(Path::new("."))?;
                eprintln!("📝 Journal: {}", journal.display());
            }

            let options = CrawlOptions {
                document_pattern: accept,
                pacing: wait.pacing(),
                single_page,
                scope,
                documents_in_scope,
            };

            handle_crawl(&url, options, download, json, &output.output_dir).await
        }
        Commands::DownloadFile { url, wait, output } => {
            handle_download_file(&url, wait.pacing(), &output.output_dir).await
        }
        Commands::DownloadFiles { list, wait, output } => {
            handle_download_files(&list, wait.pacing(), &output.output_dir).await
        }
    }
}

fn http_fetcher() -> Result<Arc<dyn Fetcher>> {
    let fetcher = HttpFetcher::new(FetchSettings::default())
        .context("could not build the HTTP client")?;
    Ok(Arc::new(fetcher))
}

// Handles the 'crawl' subcommand
async fn handle_crawl(
    url: &str,
    options: CrawlOptions,
    download: bool,
    json: bool,
    output_dir: &Path,
) -> Result<i32> {
    let fetcher = http_fetcher()?;

    // Where caught documents go: disk, stdout, or nowhere (the JSON report
    // lists them at the end)
    let sink: Box<dyn DocumentSink> = if download {
        Box::new(Downloader::new(fetcher.clone(), options.pacing, output_dir))
    } else if json {
        Box::new(SilentSink)
    } else {
        Box::new(StdoutSink)
    };

    let crawler = Crawler::new(fetcher, sink, options)
        .context("invalid --accept pattern")?;

    eprintln!("🔍 Crawling: {}", url);
    let report = crawler.run(url).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    Ok(0)
}

// Handles the 'download-file' subcommand
async fn handle_download_file(url: &str, pacing: Pacing, output_dir: &Path) -> Result<i32> {
    let downloader = Downloader::new(http_fetcher()?, pacing, output_dir);

    match downloader.download_file(url).await {
        Ok(path) => {
            eprintln!("✅ Saved {}", path.display());
            Ok(0)
        }
        Err(e) => {
            eprintln!("❌ Failed to download {}: {}", url, e);
            Ok(1)
        }
    }
}

// Handles the 'download-files' subcommand
async fn handle_download_files(list: &Path, pacing: Pacing, output_dir: &Path) -> Result<i32> {
    let downloader = Downloader::new(http_fetcher()?, pacing, output_dir);
    let tally = downloader.download_files(list).await?;

    if tally.is_complete() {
        Ok(0)
    } else {
        Ok(1)
    }
}

fn print_summary(report: &CrawlReport) {
    eprintln!();
    eprintln!("📊 Summary:");
    eprintln!("   📄 Pages found: {}", report.pages_seen);
    eprintln!("   🌐 Pages fetched: {}", report.pages_visited);
    eprintln!("   📎 Documents: {}", report.documents.len());
}
