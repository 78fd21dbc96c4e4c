use reqwest::Url;

use crate::error::Result;

mod polite;
mod request;
mod retry;

pub use polite::PoliteFetcher;
pub use request::RequestFetcher;
pub use retry::{fetch_with_retry, RetryPolicy};

/// Retrieves the HTML body of a page.
///
/// This is the only place the scraper touches the network, so tests can
/// substitute canned pages.
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> Result<String>;
}
