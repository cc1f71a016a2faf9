// src/crawl/classify.rs
// =============================================================================
// The link classifier.
//
// For one fetched page it:
// 1. Pulls every href="...", src="..." and CSS url(...) out of the raw text
// 2. Turns each one into an absolute URL
// 3. Sorts it into exactly one bucket:
//      Document > Page > Noise   (first match wins)
// 4. Records it in the traversal sets so it is never reported twice
//
// Extraction is regex-based on purpose. It is best-effort: it may miss links
// in unusual markup (single-quoted attributes, spaces around '=') and may
// pick up things that aren't links (a url(...) inside a script). There is no
// HTML or CSS parser involved, which also means CSS files are scanned with
// the same code as HTML pages.
// =============================================================================

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use url::Url;

use super::scope::SiteScope;

/// Extensions worth reporting when the user doesn't pass `--accept`.
pub const DEFAULT_DOCUMENT_PATTERN: &str =
    r"\.(pdf|docx?|xlsx?|pptx?|o(d|t)[cgmpst]|csv|rtf|zip|rar|t?gz|xz)$";

// Images, media, executables, scripts and archives: never explored as pages
const BINARY_PATTERN: &str =
    r"\.?(jpe?g|png|gif|ico|swf|flv|exe|mpe?.|h26.|avi|m.v|zip|rar|t?gz|xz|js)$";

// Group 2 holds the href/src value, group 3 the url(...) value
const LINK_PATTERN: &str = r#"(href|src)="(.*?)"|url\("?'?(.*?)'?"?\)"#;

// Schemes that can never be fetched as a page
const NON_NAVIGABLE: &[&str] = &["mailto:", "tel:", "javascript:", "data:"];

/// Which bucket a link falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Document,
    Page,
    Noise,
}

/// Compiled regexes shared by every classification step.
///
/// Cloning is cheap: `Regex` is reference-counted internally.
#[derive(Debug, Clone)]
pub struct LinkPatterns {
    documents: Regex,
    binaries: Regex,
    links: Regex,
}

impl LinkPatterns {
    /// Compiles `document_pattern` (case-insensitive) with the built-in
    /// binary and link patterns. Fails on an invalid user pattern.
    pub fn new(document_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            documents: RegexBuilder::new(document_pattern)
                .case_insensitive(true)
                .build()?,
            binaries: RegexBuilder::new(BINARY_PATTERN)
                .case_insensitive(true)
                .build()?,
            links: RegexBuilder::new(LINK_PATTERN)
                .case_insensitive(true)
                .build()?,
        })
    }

    pub fn is_document(&self, url: &str) -> bool {
        self.documents.is_match(url)
    }

    pub fn is_binary(&self, url: &str) -> bool {
        self.binaries.is_match(url)
    }

    /// Raw link values in order of appearance, duplicates included.
    pub fn extract_links<'a>(&self, body: &'a str) -> Vec<&'a str> {
        self.links
            .captures_iter(body)
            .filter_map(|caps| caps.get(2).or_else(|| caps.get(3)))
            .map(|m| m.as_str())
            .collect()
    }
}

/// The three membership sets of one crawl.
///
/// Sets only ever grow. The crawl driver owns this value and lends it to
/// the classifier for each page.
#[derive(Debug, Clone, Default)]
pub struct TraversalState {
    /// Every URL ever put in the frontier, seed included
    pub seen_pages: HashSet<String>,
    /// Documents already reported or downloaded
    pub caught_documents: HashSet<String>,
    /// Noise already logged once
    pub noise_seen: HashSet<String>,
}

impl TraversalState {
    pub fn with_seed(seed_url: &str) -> Self {
        let mut state = Self::default();
        state.seen_pages.insert(seed_url.to_string());
        state
    }
}

/// What one page contributed that the crawl hadn't seen before.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// New frontier entries, in discovery order
    pub pages: Vec<String>,
    /// Newly caught documents, in discovery order
    pub documents: Vec<String>,
    /// Newly seen noise
    pub noise: Vec<String>,
}

impl PageLinks {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.documents.is_empty() && self.noise.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Classifier {
    scope: SiteScope,
    patterns: LinkPatterns,
    documents_in_scope: bool,
}

impl Classifier {
    /// `documents_in_scope` restricts Document classification to links that
    /// are inside the site scope. Off by default: a matching link anywhere
    /// is a document.
    pub fn new(scope: SiteScope, patterns: LinkPatterns, documents_in_scope: bool) -> Self {
        Self {
            scope,
            patterns,
            documents_in_scope,
        }
    }

    pub fn scope(&self) -> &SiteScope {
        &self.scope
    }

    /// Scans `body` (the content of `page_url`) and folds every link into
    /// `state`. Only links that are new to their bucket are returned.
    pub fn classify_links(
        &self,
        page_url: &str,
        body: &str,
        state: &mut TraversalState,
    ) -> PageLinks {
        let base = Url::parse(page_url).ok();
        let mut found = PageLinks::default();

        // Every href/src attribute and CSS url(...), in document order
        for raw in self.patterns.extract_links(body) {
            let url = self.absolutize(page_url, base.as_ref(), raw);

            // Each set's insert() tells us whether this is the first sighting;
            // only first sightings are reported back to the driver
            match self.classify(&url) {
                LinkKind::Document => {
                    // Caught already: dropped, never retried as a page
                    if state.caught_documents.insert(url.clone()) {
                        found.documents.push(url);
                    }
                }
                LinkKind::Page => {
                    if state.seen_pages.insert(url.clone()) {
                        found.pages.push(url);
                    }
                }
                LinkKind::Noise => {
                    if state.noise_seen.insert(url.clone()) {
                        found.noise.push(url);
                    }
                }
            }
        }

        found
    }

    /// Buckets an absolute URL, ignoring what has been seen so far.
    ///
    /// A URL matching the document pattern is a Document even when it also
    /// looks like a same-site page, so a PDF is never fetched as HTML.
    pub fn classify(&self, url: &str) -> LinkKind {
        if !is_navigable(url) {
            return LinkKind::Noise;
        }

        let in_scope = self.scope.contains(url);

        if self.patterns.is_document(url) && (in_scope || !self.documents_in_scope) {
            LinkKind::Document
        } else if in_scope && !self.patterns.is_binary(url) {
            LinkKind::Page
        } else {
            LinkKind::Noise
        }
    }

    // Links already rooted at our host are kept exactly as written; anything
    // else is resolved against the page. If the page URL itself doesn't
    // parse, the raw link is kept so absolute links still classify.
    fn absolutize(&self, page_url: &str, base: Option<&Url>, link: &str) -> String {
        if self.scope.is_rooted(link) {
            return link.to_string();
        }

        // "#section" points back at the page we're on
        if link.starts_with('#') {
            return page_url.to_string();
        }

        match base.and_then(|b| b.join(link).ok()) {
            Some(url) => url.to_string(),
            None => link.to_string(),
        }
    }
}

fn is_navigable(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    !NON_NAVIGABLE
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::scope::ScopeMode;

    const SEED: &str = "https://example.com/";

    fn classifier(seed: &str) -> Classifier {
        Classifier::new(
            SiteScope::new(seed, ScopeMode::Seed),
            LinkPatterns::new(DEFAULT_DOCUMENT_PATTERN).unwrap(),
            false,
        )
    }

    #[test]
    fn test_extracts_href_src_and_css_urls() {
        let patterns = LinkPatterns::new(DEFAULT_DOCUMENT_PATTERN).unwrap();
        let body = r#"
            <a HREF="/a">A</a> <img src="/logo.png">
            <style>body { background: url("/bg.gif") } .x { background: url('/y.gif') }</style>
            <div style="background: url(/z.gif)"></div>
        "#;

        assert_eq!(
            patterns.extract_links(body),
            vec!["/a", "/logo.png", "/bg.gif", "/y.gif", "/z.gif"]
        );
    }

    #[test]
    fn test_empty_inputs_yield_nothing() {
        let classifier = classifier("");
        let mut state = TraversalState::default();

        let found = classifier.classify_links("", "", &mut state);

        assert!(found.is_empty());
        assert!(state.seen_pages.is_empty());
        assert!(state.caught_documents.is_empty());
        assert!(state.noise_seen.is_empty());
    }

    #[test]
    fn test_relative_link_resolution() {
        let classifier = classifier("https://example.com/");
        let mut state = TraversalState::default();

        let found = classifier.classify_links(
            "https://example.com/x/y",
            r#"<a href="/a/b">x</a> <a href="c">y</a> <a href="../d">z</a>"#,
            &mut state,
        );

        assert_eq!(
            found.pages,
            vec![
                "https://example.com/a/b",
                "https://example.com/x/c",
                "https://example.com/d",
            ]
        );
    }

    #[test]
    fn test_rooted_links_are_kept_verbatim() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::default();

        let found = classifier.classify_links(
            "https://example.com/x/",
            r#"<a href="https://example.com/a/./b">x</a>"#,
            &mut state,
        );

        assert_eq!(found.pages, vec!["https://example.com/a/./b"]);
    }

    #[test]
    fn test_document_takes_precedence_over_page() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);

        let found = classifier.classify_links(
            SEED,
            r#"<a href="/reports/2023.pdf">a</a> <a href="/reports/2023.PDF">b</a>"#,
            &mut state,
        );

        assert_eq!(
            found.documents,
            vec![
                "https://example.com/reports/2023.pdf",
                "https://example.com/reports/2023.PDF",
            ]
        );
        assert!(found.pages.is_empty());
        assert_eq!(state.seen_pages.len(), 1);
    }

    #[test]
    fn test_repeated_document_is_never_enqueued() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);
        let body = r#"<a href="/a.pdf">x</a> <a href="/a.pdf">again</a>"#;

        let found = classifier.classify_links(SEED, body, &mut state);

        assert_eq!(found.documents, vec!["https://example.com/a.pdf"]);
        assert!(found.pages.is_empty());
        assert!(!state.seen_pages.contains("https://example.com/a.pdf"));
    }

    #[test]
    fn test_binary_links_are_noise() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);

        let found = classifier.classify_links(
            SEED,
            r#"<img src="/photo.JPG"> <script src="/app.js"></script> <a href="/page">p</a>"#,
            &mut state,
        );

        assert_eq!(found.pages, vec!["https://example.com/page"]);
        assert_eq!(
            found.noise,
            vec!["https://example.com/photo.JPG", "https://example.com/app.js"]
        );
        assert!(!state.seen_pages.contains("https://example.com/app.js"));
    }

    #[test]
    fn test_external_links_are_noise() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);

        let found = classifier.classify_links(
            SEED,
            r#"<a href="https://other.org/page">x</a>"#,
            &mut state,
        );

        assert!(found.pages.is_empty());
        assert_eq!(found.noise, vec!["https://other.org/page"]);
    }

    #[test]
    fn test_non_navigable_links_are_noise() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);

        let found = classifier.classify_links(
            SEED,
            r#"<a href="mailto:me@example.com">m</a> <a href="javascript:void(0)">j</a>"#,
            &mut state,
        );

        assert!(found.pages.is_empty());
        assert_eq!(found.noise.len(), 2);
    }

    #[test]
    fn test_fragment_link_points_at_current_page() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);

        let found = classifier.classify_links(SEED, r##"<a href="#top">top</a>"##, &mut state);

        assert!(found.is_empty());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let classifier = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);
        let body = r#"
            <a href="/a">a</a> <a href="/b.pdf">b</a>
            <a href="https://other.org/">c</a> <img src="/d.png">
        "#;

        let first = classifier.classify_links(SEED, body, &mut state);
        assert_eq!(first.pages.len(), 1);
        assert_eq!(first.documents.len(), 1);
        assert_eq!(first.noise.len(), 2);

        let second = classifier.classify_links(SEED, body, &mut state);
        assert!(second.is_empty());
    }

    #[test]
    fn test_pattern_matching_nothing_still_explores() {
        let classifier = Classifier::new(
            SiteScope::new(SEED, ScopeMode::Seed),
            LinkPatterns::new(r"\.nothing-matches-this$").unwrap(),
            false,
        );
        let mut state = TraversalState::with_seed(SEED);

        let found =
            classifier.classify_links(SEED, r#"<a href="/a.pdf">x</a> <a href="/b">y</a>"#, &mut state);

        assert!(found.documents.is_empty());
        assert_eq!(
            found.pages,
            vec!["https://example.com/a.pdf", "https://example.com/b"]
        );
    }

    #[test]
    fn test_documents_outside_scope() {
        let body = r#"<a href="https://cdn.other.org/file.pdf">x</a>"#;

        let anywhere = classifier(SEED);
        let mut state = TraversalState::with_seed(SEED);
        let found = anywhere.classify_links(SEED, body, &mut state);
        assert_eq!(found.documents, vec!["https://cdn.other.org/file.pdf"]);

        let scoped = Classifier::new(
            SiteScope::new(SEED, ScopeMode::Seed),
            LinkPatterns::new(DEFAULT_DOCUMENT_PATTERN).unwrap(),
            true,
        );
        let mut state = TraversalState::with_seed(SEED);
        let found = scoped.classify_links(SEED, body, &mut state);
        assert!(found.documents.is_empty());
        assert_eq!(found.noise, vec!["https://cdn.other.org/file.pdf"]);
    }

    #[test]
    fn test_host_scope_explores_sibling_paths() {
        let seed = "https://example.com/docs/";
        let body = r#"<a href="/blog/post">x</a>"#;

        let by_seed = classifier(seed);
        let mut state = TraversalState::with_seed(seed);
        assert!(by_seed.classify_links(seed, body, &mut state).pages.is_empty());

        let by_host = Classifier::new(
            SiteScope::new(seed, ScopeMode::Host),
            LinkPatterns::new(DEFAULT_DOCUMENT_PATTERN).unwrap(),
            false,
        );
        let mut state = TraversalState::with_seed(seed);
        assert_eq!(
            by_host.classify_links(seed, body, &mut state).pages,
            vec!["https://example.com/blog/post"]
        );
    }

    #[test]
    fn test_malformed_page_url_keeps_absolute_links() {
        let classifier = classifier("");
        let mut state = TraversalState::default();

        let found = classifier.classify_links(
            "",
            r#"<a href="https://example.com/a.pdf">x</a> <a href="/rel">y</a>"#,
            &mut state,
        );

        assert_eq!(found.documents, vec!["https://example.com/a.pdf"]);
        assert_eq!(found.pages, vec!["/rel"]);
    }

    #[test]
    fn test_invalid_document_pattern_is_rejected() {
        assert!(LinkPatterns::new("(unclosed").is_err());
    }
}
