use thiserror::Error;

/// Failure of a single fetch attempt. The retry loop in `fetcher` consumes these.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("captcha detected at {url}")]
    Captcha { url: String },
}

/// Failure of one extraction pass over a listing page.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FieldError {
    #[error("{field}: no node matches `{selector}`")]
    MissingNode {
        field: &'static str,
        selector: &'static str,
    },

    #[error("{field}: node has no `{attribute}` attribute")]
    MissingAttribute {
        field: &'static str,
        attribute: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
