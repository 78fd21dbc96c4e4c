use log::{debug, warn};
use reqwest::Url;
use std::thread::sleep;
use std::time::Duration;

use super::Fetcher;
use crate::error::Result;

/// Bounded retry with doubling backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    fn delay_after(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(1u32 << (attempt - 1).min(16))
    }
}

/// Fetch `url`, retrying network errors and non-2xx answers according to
/// `policy`.
///
/// Errors that do not come from the fetch itself are returned immediately.
pub fn fetch_with_retry<F: Fetcher + ?Sized>(
    fetcher: &F,
    url: &Url,
    policy: &RetryPolicy,
) -> Result<String> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match fetcher.fetch(url) {
            Ok(body) => return Ok(body),
            Err(e) if attempt < attempts && e.is_fetch_failure() => {
                warn!(
                    "Fetching {} failed (attempt {}/{}): {}",
                    url, attempt, attempts, e
                );
                let delay = policy.delay_after(attempt);
                debug!("Waiting {:?} before retry", delay);
                sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
