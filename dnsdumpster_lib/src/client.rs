//! Search workflow: token → query → parse.

use base64::Engine;

use dnsdumpster_api::types::{AuthToken, QueryResult};
use dnsdumpster_api::{Client, ClientConfig};

use crate::error::DnsDumpsterError;
use crate::parse::{find_asset_url, parse_records, AssetKind};

/// DNSDumpster client holding the session token for its whole lifetime.
///
/// The token is fetched once at construction. A missing token is not an
/// error at that point; every later query fails fast with
/// [`DnsDumpsterError::MissingToken`] instead. Tokens are never refreshed,
/// so a caller seeing repeated rejections should build a new client.
pub struct DnsDumpster {
    inner: Client,
    token: Option<AuthToken>,
}

impl DnsDumpster {
    /// Creates a client for the production site and fetches a token.
    pub async fn new() -> Result<Self, DnsDumpsterError> {
        Self::with_config(&ClientConfig::default()).await
    }

    /// Creates a client from explicit settings and fetches a token.
    pub async fn with_config(config: &ClientConfig) -> Result<Self, DnsDumpsterError> {
        let inner = Client::with_config(config)?;
        Ok(Self::from_client(inner).await)
    }

    /// Wraps an existing API client and fetches a token with it.
    pub async fn from_client(inner: Client) -> Self {
        let token = match inner.fetch_token().await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("No authorization token available: {}", e);
                None
            }
        };
        Self { inner, token }
    }

    /// Wraps an existing API client with a known token, without any network call.
    pub fn with_token(inner: Client, token: Option<AuthToken>) -> Self {
        Self { inner, token }
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Submits `domain` and returns the raw report HTML.
    pub async fn query(&self, domain: &str) -> Result<String, DnsDumpsterError> {
        let token = self.token.as_ref().ok_or(DnsDumpsterError::MissingToken)?;
        Ok(self.inner.submit(token, domain).await?)
    }

    /// Parses a report and downloads the assets it links to.
    ///
    /// A missing or failing asset leaves its field `None`; only a report
    /// without the expected tables fails.
    pub async fn parse(&self, html: &str, domain: &str) -> Result<QueryResult, DnsDumpsterError> {
        let dns_records = parse_records(html)?;
        let image_data = self.fetch_encoded(html, domain, AssetKind::NetworkMap).await;
        let xls_data = self
            .fetch_encoded(html, domain, AssetKind::HostsSpreadsheet)
            .await;

        Ok(QueryResult {
            domain: domain.to_string(),
            dns_records,
            image_data,
            xls_data,
        })
    }

    /// Runs a full lookup for `domain`.
    pub async fn search(&self, domain: &str) -> Result<QueryResult, DnsDumpsterError> {
        tracing::info!("Searching for domain: {}", domain);
        let html = self.query(domain).await?;
        self.parse(&html, domain).await
    }

    async fn fetch_encoded(&self, html: &str, domain: &str, kind: AssetKind) -> Option<String> {
        let url = match find_asset_url(html, self.inner.api_url(), domain, kind) {
            Ok(Some(url)) => url,
            Ok(None) => {
                tracing::debug!("No {} link in report", kind.label());
                return None;
            }
            Err(e) => {
                tracing::warn!("Could not search report for {} link: {}", kind.label(), e);
                return None;
            }
        };
        tracing::debug!("{} URL: {}", kind.label(), url);

        match self.inner.fetch_asset(&url).await {
            Ok(bytes) => Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            Err(e) => {
                tracing::warn!("Error obtaining {}: {}", kind.label(), e);
                None
            }
        }
    }
}
