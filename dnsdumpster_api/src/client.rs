//! HTTP client for the DNSDumpster site and its HTML API.

use regex::Regex;
use reqwest::StatusCode;
use url::Url;

use crate::{config::ClientConfig, types::AuthToken, user_agent::get_user_agent, Error};

/// Matches the `{"Authorization": "<token>"}` snippet inlined in the landing page.
const TOKEN_PATTERN: &str = r#"\{"Authorization":\s?"([^"]+)""#;

/// HTTP client for DNSDumpster.
///
/// Holds one `reqwest::Client` for its lifetime, so the landing page,
/// the query and the asset downloads share a connection pool. Every call is
/// a single request with no retries.
pub struct Client {
    base_url: Url,
    api_url: Url,
    http: reqwest::Client,
}

impl Client {
    /// Creates a client pointing at the production site.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(&ClientConfig::default())
    }

    /// Creates a client with both hosts at `base_url`. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_config(&ClientConfig::with_base_url(base_url))
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self, Error> {
        let mut builder = reqwest::Client::builder().user_agent(get_user_agent());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            base_url: parse_base(&config.base_url)?,
            api_url: parse_base(&config.api_url)?,
            http,
        })
    }

    /// API host without a trailing slash, as it appears in asset links.
    pub fn api_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    /// Loads the landing page and scrapes the authorization token out of it.
    pub async fn fetch_token(&self) -> Result<AuthToken, Error> {
        let resp = self
            .http
            .get(self.base_url.clone())
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::error!("Landing page request failed with status {}", status);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let token = extract_token(&body)?.ok_or(Error::TokenNotFound)?;
        tracing::debug!("Authorization token found ({} chars)", token.as_str().len());
        Ok(token)
    }

    /// Posts `target` to the `/htmld/` endpoint and returns the report HTML verbatim.
    pub async fn submit(&self, token: &AuthToken, target: &str) -> Result<String, Error> {
        let url = self.api_url.join("htmld/")?;
        let resp = self
            .http
            .post(url)
            .header("authorization", token.as_str())
            .header("origin", self.base_url.as_str().trim_end_matches('/'))
            .header("referer", self.base_url.as_str())
            .form(&[("target", target)])
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if status != StatusCode::OK {
            tracing::error!(
                "Query for {} failed with status {}: {}",
                target,
                status,
                truncate_body(&body)
            );
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(body)
    }

    /// Downloads a binary asset (map image or spreadsheet) linked from a report.
    pub async fn fetch_asset(&self, url: &str) -> Result<Vec<u8>, Error> {
        let url = Url::parse(url)?;
        let resp = self.http.get(url).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

/// Returns the token embedded in `html`, or `None` when the snippet is absent.
pub(crate) fn extract_token(html: &str) -> Result<Option<AuthToken>, Error> {
    let re = Regex::new(TOKEN_PATTERN)?;
    Ok(re
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| AuthToken::new(m.as_str())))
}

fn parse_base(raw: &str) -> Result<Url, Error> {
    // A trailing slash makes `join` append instead of replacing the last segment.
    Ok(Url::parse(&format!("{}/", raw.trim_end_matches('/')))?)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 500;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
