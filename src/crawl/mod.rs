// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first exploration starting from a seed URL
// - Every link sorted into Document / Page / Noise
// - Same-site restriction derived from the seed (no hard-coded domain)
// - Polite crawling with a (possibly randomized) delay before each request
//
// Submodules:
// - queue: the crawl loop (frontier + fetch + fold)
// - classify: link extraction and classification
// - scope: "is this link part of the site?"
// - pacing: the politeness delay
// - report: where caught documents go
// =============================================================================

mod classify;
mod pacing;
mod queue;
mod report;
mod scope;

pub use classify::DEFAULT_DOCUMENT_PATTERN;
pub use pacing::Pacing;
pub use queue::{CrawlOptions, CrawlReport, Crawler};
pub use report::{DocumentSink, SilentSink, StdoutSink};
pub use scope::ScopeMode;
