// src/core/net.rs
//
// Fetcher: blocking HTTP GET with a browser User-Agent and exponential
// backoff between attempts.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::options::FetchOptions;
use crate::error::FetchError;

/// How many attempts to make and how long to wait between them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts. Zero still makes one.
    pub retries: u32,
    /// Wait after failed attempt `n` is `backoff^n` seconds. No jitter, no cap.
    pub backoff: f64,
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        let secs = self.backoff.powi(attempt.min(i32::MAX as u32) as i32);
        if secs.is_nan() || secs < 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

impl From<&FetchOptions> for RetryPolicy {
    fn from(o: &FetchOptions) -> Self {
        Self { retries: o.retries, backoff: o.backoff }
    }
}

/// Run `op` until it succeeds or the policy is exhausted, calling `sleep`
/// between attempts. `op` receives the 1-based attempt number. The last
/// error is returned unchanged.
pub fn retry_with<T, E, F, S>(policy: &RetryPolicy, mut op: F, mut sleep: S) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut(u32) -> Result<T, E>,
    S: FnMut(Duration),
{
    let attempts = policy.attempts();
    let mut attempt = 1;
    loop {
        match op(attempt) {
            Ok(v) => return Ok(v),
            Err(e) if attempt < attempts => {
                let wait = policy.delay_after(attempt);
                logf!("attempt {}/{} failed: {}; retrying in {:.2?}", attempt, attempts, e, wait);
                sleep(wait);
                attempt += 1;
            }
            Err(e) => {
                logf!("attempt {}/{} failed: {}; giving up", attempt, attempts, e);
                return Err(e);
            }
        }
    }
}

/// Anything that can hand back page markup for a URL.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Blocking HTTP fetcher with retry.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(opts: &FetchOptions) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .timeout(opts.timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, policy: RetryPolicy::from(opts) })
    }

    /// One GET; non-2xx statuses are errors.
    fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }
}

impl PageSource for Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        logf!("GET {}", url);
        retry_with(&self.policy, |_| self.get_once(url), thread::sleep)
    }
}
