use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.yellowpages.ca";
pub const DEFAULT_CATEGORY: &str = "Restaurants";
pub const DEFAULT_LOCATION: &str = "Toronto+ON";

/// Sentinel written when a whole section could not be extracted.
pub const NOT_AVAILABLE: &str = "Not Available";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub category: String,
    pub location: String,
    /// First and last search-results page, both inclusive.
    pub first_page: u32,
    pub last_page: u32,
    pub max_attempts: u32,
    pub request_timeout: Duration,
    pub retry_delay: RangeInclusive<Duration>,
    pub listing_delay: RangeInclusive<Duration>,
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            first_page: 1,
            last_page: 59,
            max_attempts: 5,
            request_timeout: Duration::from_secs(10),
            retry_delay: Duration::from_secs(5)..=Duration::from_secs(15),
            listing_delay: Duration::from_secs(1)..=Duration::from_secs(5),
            csv_path: PathBuf::from("job_data.csv"),
            json_path: PathBuf::from("job_data.json"),
        }
    }
}

impl ScraperConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_search(mut self, category: impl Into<String>, location: impl Into<String>) -> Self {
        self.category = category.into();
        self.location = location.into();
        self
    }

    pub fn with_pages(mut self, first_page: u32, last_page: u32) -> Self {
        self.first_page = first_page;
        self.last_page = last_page;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: RangeInclusive<Duration>) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_listing_delay(mut self, listing_delay: RangeInclusive<Duration>) -> Self {
        self.listing_delay = listing_delay;
        self
    }

    pub fn with_output(mut self, csv_path: impl Into<PathBuf>, json_path: impl Into<PathBuf>) -> Self {
        self.csv_path = csv_path.into();
        self.json_path = json_path.into();
        self
    }

    /// URL of one search-results page.
    pub fn search_url(&self, page: u32) -> String {
        format!(
            "{}/search/si/{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            page,
            self.category,
            self.location
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_embeds_page_category_and_location() {
        let config = ScraperConfig::default();
        assert_eq!(
            config.search_url(3),
            "https://www.yellowpages.ca/search/si/3/Restaurants/Toronto+ON"
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = ScraperConfig::default()
            .with_base_url("http://localhost:8080/")
            .with_search("Bakeries", "Ottawa+ON")
            .with_pages(2, 4);
        assert_eq!(config.search_url(2), "http://localhost:8080/search/si/2/Bakeries/Ottawa+ON");
        assert_eq!(config.last_page, 4);
        assert_eq!(config.max_attempts, 5);
    }
}
