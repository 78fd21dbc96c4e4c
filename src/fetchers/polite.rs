use log::debug;
use reqwest::Url;
use std::cell::Cell;
use std::thread::sleep;
use std::time::{Duration, Instant};

use super::Fetcher;
use crate::error::Result;

/// Keeps consecutive requests at least `delay` apart.
///
/// Not `Sync`: one request is in flight at a time.
pub struct PoliteFetcher<F> {
    inner: F,
    delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl<F: Fetcher> PoliteFetcher<F> {
    pub fn new(inner: F, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            last_request: Cell::new(None),
        }
    }

    fn wait_turn(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                let remaining = self.delay - elapsed;
                debug!("Waiting {:?} before next request", remaining);
                sleep(remaining);
            }
        }
    }
}

impl<F: Fetcher> Fetcher for PoliteFetcher<F> {
    fn fetch(&self, url: &Url) -> Result<String> {
        self.wait_turn();
        let result = self.inner.fetch(url);
        self.last_request.set(Some(Instant::now()));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Fetcher for Echo {
        fn fetch(&self, url: &Url) -> Result<String> {
            Ok(url.to_string())
        }
    }

    #[test]
    fn test_consecutive_requests_are_spaced() {
        let fetcher = PoliteFetcher::new(Echo, Duration::from_millis(30));
        let url = Url::parse("https://example.com/").unwrap();

        let start = Instant::now();
        fetcher.fetch(&url).unwrap();
        fetcher.fetch(&url).unwrap();
        fetcher.fetch(&url).unwrap();

        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[test]
    fn test_first_request_is_not_delayed() {
        let fetcher = PoliteFetcher::new(Echo, Duration::from_secs(5));
        let url = Url::parse("https://example.com/").unwrap();

        let start = Instant::now();
        assert_eq!(fetcher.fetch(&url).unwrap(), "https://example.com/");
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
