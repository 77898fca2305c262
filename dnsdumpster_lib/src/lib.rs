//! Library layer for the DNSDumpster client: report parsing and the search workflow.
//!
//! Wraps the `dnsdumpster_api` transport with the HTML record parser, the
//! per-row field extractor and the token → query → parse orchestration.

pub mod client;
pub mod error;
pub mod extract;
pub mod parse;

pub use dnsdumpster_api;
pub use dnsdumpster_api::types;
pub use dnsdumpster_api::ClientConfig;

pub use client::DnsDumpster;
pub use error::DnsDumpsterError;
pub use extract::RowError;
pub use parse::{parse_records, AssetKind, ParseError};
