use log::{info, warn};
use rand::Rng;

use crate::config::ScraperConfig;
use crate::delay_manager::Sleeper;
use crate::extractor::ListingExtractor;
use crate::fetcher::{FetchOutcome, Fetcher, Transport};
use crate::links::LinkExtractor;
use crate::parser;
use crate::record::ListingRecord;

/// Why the page loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every configured page was visited.
    Completed { pages: u32 },
    /// A search page was fetched but carried no listing cards.
    NoListings { page: u32 },
    /// A search page could not be fetched within the retry budget.
    PageFetchFailed { page: u32 },
}

#[derive(Debug)]
pub struct RunReport {
    pub records: Vec<ListingRecord>,
    pub outcome: RunOutcome,
    /// Listings whose detail page could not be fetched.
    pub skipped: Vec<String>,
}

pub struct Driver<T, S, R> {
    config: ScraperConfig,
    fetcher: Fetcher<T, S, R>,
    links: LinkExtractor,
    extractor: ListingExtractor,
}

impl<T: Transport, S: Sleeper, R: Rng> Driver<T, S, R> {
    pub fn new(config: ScraperConfig, fetcher: Fetcher<T, S, R>) -> Self {
        let links = LinkExtractor::new(config.base_url.clone());
        let extractor = ListingExtractor::new(config.base_url.clone());
        Driver {
            config,
            fetcher,
            links,
            extractor,
        }
    }

    pub fn run(&mut self) -> RunReport {
        info!("Starting scraping process...");
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut pages = 0;

        for page in self.config.first_page..=self.config.last_page {
            let url = self.config.search_url(page);
            info!("Fetching search page {}: {}", page, url);

            let Some(search_page) = self.fetcher.fetch(&url).into_page() else {
                warn!("Search page {} could not be fetched. Stopping.", page);
                return RunReport {
                    records,
                    outcome: RunOutcome::PageFetchFailed { page },
                    skipped,
                };
            };

            let links = self.links.extract_links(&parser::parse(&search_page.body));
            if links.is_empty() {
                info!("No links found on page {}. Stopping.", page);
                return RunReport {
                    records,
                    outcome: RunOutcome::NoListings { page },
                    skipped,
                };
            }
            pages += 1;

            for link in links {
                match self.scrape_listing(&link) {
                    Some(record) => records.push(record),
                    None => skipped.push(link),
                }
                let range = self.config.listing_delay.clone();
                self.fetcher.delays_mut().pause(&range, "next listing");
            }
            info!("Page {} done, {} records so far.", page, records.len());
        }

        RunReport {
            records,
            outcome: RunOutcome::Completed { pages },
            skipped,
        }
    }

    /// `None` when the listing page could not be fetched.
    pub fn scrape_listing(&mut self, url: &str) -> Option<ListingRecord> {
        info!("Scraping data from: {}", url);
        match self.fetcher.fetch(url) {
            FetchOutcome::Fetched(page) => {
                Some(self.extractor.extract_fields(&parser::parse(&page.body)))
            }
            FetchOutcome::Exhausted { attempts, .. } => {
                warn!("Skipping {} after {} failed attempts.", url, attempts);
                None
            }
        }
    }
}
