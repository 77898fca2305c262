//! Error types for the library layer.

use std::fmt;

use crate::parse::ParseError;

/// Errors produced by a search, separating the three places it can stop:
/// no token, a failed HTTP exchange, or a report the parser does not recognise.
#[derive(Debug)]
pub enum DnsDumpsterError {
    /// The client has no authorization token, so no query was sent.
    MissingToken,
    /// An error from the underlying API client.
    Api(dnsdumpster_api::Error),
    /// The report was fetched but could not be parsed.
    Parse(ParseError),
}

impl DnsDumpsterError {
    /// True when the upstream page layout no longer matches the parser.
    ///
    /// Transport failures and a missing token return false.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Parse(ParseError::MissingTables { .. }))
    }
}

impl fmt::Display for DnsDumpsterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "Authorization token is missing"),
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for DnsDumpsterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::MissingToken => None,
        }
    }
}

impl From<dnsdumpster_api::Error> for DnsDumpsterError {
    fn from(e: dnsdumpster_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<ParseError> for DnsDumpsterError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}
