//! Enumerates recipe detail-page URLs from paginated listing pages.

use log::{debug, info, warn};
use reqwest::Url;
use scraper::Html;
use serde::Deserialize;
use std::collections::{HashSet, VecDeque};

use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::fetchers::{fetch_with_retry, Fetcher, RetryPolicy};
use crate::layout::{clean_text, CompiledLayout};

/// What kind of listing the selector designates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingMode {
    /// Free-text search term
    Query,
    /// Category identifier
    Category,
}

/// Address of listing page `page` (1-based) for the given mode and selector
pub fn listing_page_url(
    base: &Url,
    layout: &CompiledLayout,
    mode: ListingMode,
    selector: &str,
    page: u32,
) -> Result<Url> {
    let invalid = |reason: String| ScrapeError::InvalidUrl {
        url: base.to_string(),
        reason,
    };

    match mode {
        ListingMode::Query => {
            let mut url = base
                .join(&layout.search_path)
                .map_err(|e| invalid(e.to_string()))?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair(&layout.query_param, selector);
                if page > 1 {
                    pairs.append_pair(&layout.page_param, &page.to_string());
                }
            }
            Ok(url)
        }
        ListingMode::Category => {
            let mut path = format!("{}{}", layout.category_path, selector);
            if page > 1 {
                path.push_str(&format!("/{page}"));
            }
            base.join(&path).map_err(|e| invalid(e.to_string()))
        }
    }
}

/// Detail-page links of one listing page, resolved and in page order
pub fn extract_detail_links(document: &Html, base: &Url, layout: &CompiledLayout) -> Vec<Url> {
    document
        .select(&layout.link)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| url.host_str() == base.host_str())
        .filter(|url| url.path().contains(&layout.detail_path_marker))
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .collect()
}

/// Highest page number advertised by the pagination widget, if any
pub fn last_advertised_page(document: &Html, layout: &CompiledLayout) -> Option<u32> {
    document
        .select(&layout.pagination)
        .filter_map(|link| {
            clean_text(link)
                .parse::<u32>()
                .ok()
                .or_else(|| link.value().attr("href").and_then(trailing_number))
        })
        .max()
}

fn trailing_number(href: &str) -> Option<u32> {
    let digits: String = href
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Lazy, finite sequence of unique detail-page URLs.
///
/// Listing pages are fetched on demand, one at a time. The sequence ends when
/// a page yields no new link, the advertised last page has been read, the
/// page cap or `limit` is reached, or pages keep failing.
pub struct LinkDiscovery<'a, F: Fetcher + ?Sized> {
    fetcher: &'a F,
    layout: &'a CompiledLayout,
    base: Url,
    mode: ListingMode,
    selector: String,
    limit: Option<usize>,
    retry: RetryPolicy,
    max_pages: Option<u32>,
    max_skipped_pages: u32,

    page: u32,
    last_page: Option<u32>,
    pages_ok: u32,
    consecutive_failures: u32,
    seen: HashSet<Url>,
    pending: VecDeque<Url>,
    yielded: usize,
    done: bool,
}

impl<'a, F: Fetcher + ?Sized> LinkDiscovery<'a, F> {
    pub fn new(
        fetcher: &'a F,
        config: &ScraperConfig,
        layout: &'a CompiledLayout,
        mode: ListingMode,
        selector: &str,
        limit: Option<usize>,
    ) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| ScrapeError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            fetcher,
            layout,
            base,
            mode,
            selector: selector.to_string(),
            limit,
            retry: config.http.retry_policy(),
            max_pages: config.discovery.max_pages,
            max_skipped_pages: config.discovery.max_skipped_pages,
            page: 0,
            last_page: None,
            pages_ok: 0,
            consecutive_failures: 0,
            seen: HashSet::new(),
            pending: VecDeque::new(),
            yielded: 0,
            done: false,
        })
    }

    fn finish(&mut self, reason: &str) {
        info!(
            "Discovery for '{}' stopped after page {}: {} ({} links)",
            self.selector,
            self.page,
            reason,
            self.yielded + self.pending.len()
        );
        self.done = true;
    }

    fn load_next_page(&mut self) {
        if self.max_pages.is_some_and(|max| self.page >= max) {
            self.finish("page cap reached");
            return;
        }
        if self.last_page.is_some_and(|last| self.page >= last) {
            self.finish("last advertised page read");
            return;
        }

        self.page += 1;
        let url = match listing_page_url(&self.base, self.layout, self.mode, &self.selector, self.page)
        {
            Ok(url) => url,
            Err(e) => {
                warn!("{}", e);
                self.finish("listing URL could not be built");
                return;
            }
        };

        debug!("Fetching listing page {}: {}", self.page, url);
        match fetch_with_retry(self.fetcher, &url, &self.retry) {
            Ok(body) => {
                self.pages_ok += 1;
                self.consecutive_failures = 0;

                let document = Html::parse_document(&body);
                if let Some(last) = last_advertised_page(&document, self.layout) {
                    self.last_page = Some(self.last_page.map_or(last, |known| known.max(last)));
                }

                let mut fresh = 0;
                for link in extract_detail_links(&document, &self.base, self.layout) {
                    if self.seen.insert(link.clone()) {
                        self.pending.push_back(link);
                        fresh += 1;
                    }
                }
                debug!("Page {} yielded {} new links", self.page, fresh);

                if fresh == 0 {
                    self.finish("no new links");
                }
            }
            Err(e) => {
                warn!("Listing page {} failed: {}", self.page, e);
                if self.pages_ok == 0 {
                    self.finish("first page failed");
                } else {
                    self.consecutive_failures += 1;
                    if self.consecutive_failures > self.max_skipped_pages {
                        self.finish("too many failed pages");
                    }
                }
            }
        }
    }
}

impl<F: Fetcher + ?Sized> Iterator for LinkDiscovery<'_, F> {
    type Item = Url;

    fn next(&mut self) -> Option<Url> {
        loop {
            if self.limit.is_some_and(|limit| self.yielded >= limit) {
                return None;
            }
            if let Some(url) = self.pending.pop_front() {
                self.yielded += 1;
                return Some(url);
            }
            if self.done {
                return None;
            }
            self.load_next_page();
        }
    }
}

/// Start discovering detail-page URLs for `selector`.
///
/// Nothing is fetched until the returned iterator is advanced.
pub fn discover_links<'a, F: Fetcher + ?Sized>(
    fetcher: &'a F,
    config: &ScraperConfig,
    layout: &'a CompiledLayout,
    mode: ListingMode,
    selector: &str,
    limit: Option<usize>,
) -> Result<LinkDiscovery<'a, F>> {
    LinkDiscovery::new(fetcher, config, layout, mode, selector, limit)
}
