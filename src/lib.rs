pub mod config;
pub mod error;
pub mod logger;
pub mod headers;
pub mod delay_manager;
pub mod fetcher;
pub mod parser;
pub mod links;
pub mod extractor;
pub mod record;
pub mod driver;
pub mod export;

// Exporting types for convenience
pub use config::{ScraperConfig, NOT_AVAILABLE};
pub use delay_manager::{DelayManager, Sleeper, ThreadSleeper};
pub use driver::{Driver, RunOutcome, RunReport};
pub use error::{ExportError, FetchError, FieldError};
pub use extractor::ListingExtractor;
pub use fetcher::{FetchOutcome, FetchedPage, Fetcher, HttpTransport, Transport};
pub use links::LinkExtractor;
pub use record::ListingRecord;
