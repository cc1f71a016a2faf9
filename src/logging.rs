// src/logging.rs
// =============================================================================
// The --verbose journal.
//
// The rest of the code logs through the `log` macros (info!, debug!, ...).
// Nothing is recorded unless a logger is installed, which only happens here:
// - init_journal: one file per run, named after the start time, e.g.
//   2024-03-01T14-05-09_journal.log, in the current directory
// - init_for_tests: terminal output for unit tests
// =============================================================================

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

/// Name of the journal file for a run started now.
pub fn journal_file_name() -> String {
    // ':' is not allowed in Windows file names
    format!(
        "{}_journal.log",
        chrono::Local::now().format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Installs a debug-level file logger in `dir` and returns the file path.
pub fn init_journal(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(journal_file_name());
    let file = File::create(&path)
        .with_context(|| format!("could not create journal {}", path.display()))?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    WriteLogger::init(LevelFilter::Debug, config, file)
        .context("a logger is already installed")?;

    Ok(path)
}

/// Terminal logger for unit tests. No-op if a logger is already set.
#[cfg(test)]
pub fn init_for_tests() {
    use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

    let _ = TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
}
