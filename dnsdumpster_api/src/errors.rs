//! Error types for the API client.

/// Errors that can occur when talking to DNSDumpster.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with something other than 200 OK.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16 },
    /// The landing page loaded but no `{"Authorization": ...}` snippet was found.
    #[error("authorization token not found in landing page")]
    TokenNotFound,
    /// A configured base URL could not be parsed or joined.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}
