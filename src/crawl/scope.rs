// src/crawl/scope.rs
// =============================================================================
// Decides which links belong to the site being crawled.
//
// Two questions are answered here:
// 1. "Is this link already an absolute URL on our host?" (is_rooted)
//    If not, the classifier resolves it against the current page.
// 2. "Is this URL part of the crawl?" (contains)
//    Only URLs in scope may be explored as pages.
//
// Both are derived from the seed URL, never hard-coded.
// =============================================================================

use clap::ValueEnum;
use url::Url;

/// How `SiteScope::contains` decides membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScopeMode {
    /// The URL must contain the seed URL as a substring
    #[default]
    Seed,
    /// The URL's host must equal the seed's host
    Host,
}

#[derive(Debug, Clone)]
pub struct SiteScope {
    seed: String,
    host: Option<String>,
    mode: ScopeMode,
}

impl SiteScope {
    /// Builds the scope from the seed. A seed that doesn't parse yields a
    /// scope with no host: nothing counts as rooted, and `Seed` mode falls
    /// back to plain substring matching.
    pub fn new(seed: &str, mode: ScopeMode) -> Self {
        let host = Url::parse(seed)
            .ok()
            .and_then(|url| url.host_str().map(|h| h.to_ascii_lowercase()));

        Self {
            seed: seed.to_string(),
            host,
            mode,
        }
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// True when `link` starts with `http://<host>` or `https://<host>`
    /// (ASCII case-insensitive) and the host is not just a prefix of a
    /// longer one.
    pub fn is_rooted(&self, link: &str) -> bool {
        let Some(host) = self.host.as_deref() else {
            return false;
        };

        let rest = match strip_prefix_ignore_case(link, "https://")
            .or_else(|| strip_prefix_ignore_case(link, "http://"))
        {
            Some(rest) => rest,
            None => return false,
        };

        match strip_prefix_ignore_case(rest, host) {
            Some(after) => matches!(after.chars().next(), None | Some('/' | ':' | '?' | '#')),
            None => false,
        }
    }

    /// True when `url` belongs to the crawl.
    pub fn contains(&self, url: &str) -> bool {
        match self.mode {
            ScopeMode::Seed => url.contains(self.seed.as_str()),
            ScopeMode::Host => match (&self.host, Url::parse(url)) {
                (Some(host), Ok(parsed)) => parsed
                    .host_str()
                    .is_some_and(|h| h.eq_ignore_ascii_case(host)),
                _ => false,
            },
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}
