use std::ops::RangeInclusive;
use std::time::Duration;

use log::{error, info, warn};
use rand::Rng;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;

use crate::config::ScraperConfig;
use crate::delay_manager::{DelayManager, Sleeper};
use crate::error::FetchError;
use crate::headers;

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// Either the page, or the sentinel telling the caller to skip this URL.
#[derive(Debug)]
pub enum FetchOutcome {
    Fetched(FetchedPage),
    Exhausted { url: String, attempts: u32 },
}

impl FetchOutcome {
    pub fn into_page(self) -> Option<FetchedPage> {
        match self {
            FetchOutcome::Fetched(page) => Some(page),
            FetchOutcome::Exhausted { .. } => None,
        }
    }
}

/// One GET. Any response that arrives is `Ok`, whatever its status;
/// only connection-level failures are errors.
pub trait Transport {
    fn get(&self, url: &str, headers: HeaderMap) -> Result<FetchedPage, FetchError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, headers: HeaderMap) -> Result<FetchedPage, FetchError> {
        let resp = self.client.get(url).headers(headers).send()?;
        let status = resp.status().as_u16();
        let body = resp.text()?;
        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
        })
    }
}

pub struct Fetcher<T, S, R> {
    transport: T,
    delays: DelayManager<S, R>,
    max_attempts: u32,
    retry_delay: RangeInclusive<Duration>,
    captcha_regex: Regex,
}

impl<T: Transport, S: Sleeper, R: Rng> Fetcher<T, S, R> {
    pub fn new(transport: T, delays: DelayManager<S, R>, config: &ScraperConfig) -> Self {
        Fetcher {
            transport,
            delays,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay.clone(),
            captcha_regex: Regex::new(r"(?i)captcha").expect("static regex"),
        }
    }

    /// GET with up to `max_attempts` tries. Captcha pages, transport errors and
    /// non-2xx statuses are retried after a random backoff; the attempt count
    /// starts fresh on every call. No backoff follows the final attempt, so
    /// `max_attempts` failures sleep `max_attempts - 1` times.
    pub fn fetch(&mut self, url: &str) -> FetchOutcome {
        for attempt in 1..=self.max_attempts {
            info!("Attempt {} of {} to fetch: {}", attempt, self.max_attempts, url);

            match self.attempt(url) {
                Ok(page) => {
                    info!("Successfully fetched: {}", url);
                    return FetchOutcome::Fetched(page);
                }
                Err(FetchError::Captcha { .. }) => {
                    warn!("Captcha detected at {}. Retrying after a delay...", url);
                }
                Err(e) => {
                    warn!("Error occurred: {}. Retrying...", e);
                }
            }

            if attempt < self.max_attempts {
                let range = self.retry_delay.clone();
                self.delays.pause(&range, "retry backoff");
            }
        }

        error!("Failed to fetch {} after {} attempts.", url, self.max_attempts);
        FetchOutcome::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
        }
    }

    fn attempt(&mut self, url: &str) -> Result<FetchedPage, FetchError> {
        let headers = headers::random_headers(self.delays.rng_mut());
        let page = self.transport.get(url, headers)?;

        if self.captcha_regex.is_match(&page.body) {
            return Err(FetchError::Captcha { url: url.to_string() });
        }
        if !(200..300).contains(&page.status) {
            return Err(FetchError::Status {
                status: page.status,
                url: url.to_string(),
            });
        }
        Ok(page)
    }

    pub fn delays_mut(&mut self) -> &mut DelayManager<S, R> {
        &mut self.delays
    }

    pub fn delays(&self) -> &DelayManager<S, R> {
        &self.delays
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}
