use directory_scraper_lib::{export, logger};
use directory_scraper_lib::{DelayManager, Driver, Fetcher, HttpTransport, RunOutcome, ScraperConfig, ThreadSleeper};

use std::error::Error;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting directory scraper...");

    let config = ScraperConfig::default();
    info!(
        "Searching '{}' in '{}', pages {}..={}",
        config.category, config.location, config.first_page, config.last_page
    );

    let transport = HttpTransport::new(config.request_timeout)?;
    let delays = DelayManager::new(ThreadSleeper, StdRng::from_entropy());
    let fetcher = Fetcher::new(transport, delays, &config);
    let mut driver = Driver::new(config.clone(), fetcher);

    let report = driver.run();
    match report.outcome {
        RunOutcome::Completed { pages } => info!("Visited all {} search pages.", pages),
        RunOutcome::NoListings { page } => info!("Listings exhausted at page {}.", page),
        RunOutcome::PageFetchFailed { page } => {
            warn!("Search page {} could not be fetched; results may be incomplete.", page)
        }
    }
    if !report.skipped.is_empty() {
        warn!("{} listings were skipped after repeated fetch failures.", report.skipped.len());
    }

    export::export_all(&config, &report.records)?;
    Ok(())
}
