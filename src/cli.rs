// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - crawl:          explore a site and list (or download) its documents
// - download-file:  fetch one URL straight to disk
// - download-files: fetch every URL listed in a file
//
// clap turns a malformed invocation (missing URL, unknown flag, non-numeric
// --wait) into a usage message and a non-zero exit before anything else runs.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::crawl::{Pacing, ScopeMode, DEFAULT_DOCUMENT_PATTERN};

#[derive(Parser, Debug)]
#[command(
    name = "doc-crawler",
    version,
    about = "Explore a website recursively and list or download the documents it links to",
    long_about = "doc-crawler walks a website breadth-first from a seed URL and reports every \
                  link that looks like a document (PDF, office files, archives...). \
                  The URL list it prints can later be fed to `download-files`."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Explore a website and list the documents it links to
    ///
    /// Example: doc-crawler crawl https://example.com/reports/ --download
    Crawl {
        /// Seed URL; only pages under it are explored
        url: String,

        /// Regex matched (case-insensitively) against links to pick documents
        #[arg(long, value_name = "REGEX", default_value = DEFAULT_DOCUMENT_PATTERN)]
        accept: String,

        /// Download the documents instead of printing their URLs
        #[arg(long)]
        download: bool,

        /// Only scan the seed page, don't follow links
        #[arg(long)]
        single_page: bool,

        /// Write a debug journal (<timestamp>_journal.log) in the current directory
        #[arg(long)]
        verbose: bool,

        /// How links are judged to be part of the site
        #[arg(long, value_enum, default_value_t = ScopeMode::Seed)]
        scope: ScopeMode,

        /// Ignore documents hosted outside the site scope
        #[arg(long)]
        documents_in_scope: bool,

        /// Print a JSON report at the end instead of one URL per line
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        wait: WaitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Download a single URL into the output directory
    DownloadFile {
        url: String,

        #[command(flatten)]
        wait: WaitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Download every URL listed (one per line) in a file
    DownloadFiles {
        /// Text file with one URL per line; blank lines are skipped
        list: PathBuf,

        #[command(flatten)]
        wait: WaitArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Politeness options shared by every subcommand.
#[derive(Args, Debug, Clone, Copy)]
pub struct WaitArgs {
    /// Seconds to wait before each request (0 disables waiting)
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    pub wait: u64,

    /// Always wait exactly --wait seconds instead of a random 1..=wait
    #[arg(long)]
    pub no_random_wait: bool,
}

impl WaitArgs {
    pub fn pacing(&self) -> Pacing {
        if self.wait == 0 {
            Pacing::disabled()
        } else {
            Pacing::new(self.wait, !self.no_random_wait)
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Directory downloaded files are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}
