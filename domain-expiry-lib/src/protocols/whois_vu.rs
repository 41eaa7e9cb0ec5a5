//! Client for the whois.vu JSON API.
//!
//! The API wraps WHOIS lookups behind a single endpoint,
//! `GET https://api.whois.vu/?q=<domain>`, and answers with JSON carrying
//! the expiry as Unix seconds (`expires`) and the raw registry text (`whois`).

use crate::error::DomainExpiryError;
use crate::protocols::WhoisSource;
use crate::types::{WhoisRecord, DEFAULT_API_BASE_URL};
use async_trait::async_trait;
use tracing::debug;

/// HTTP client for the whois.vu API.
#[derive(Clone)]
pub struct WhoisVuClient {
    /// HTTP client for making API requests
    http_client: reqwest::Client,
    /// Endpoint the domain is appended to as the `q` query parameter
    base_url: String,
}

impl WhoisVuClient {
    /// Create a new client pointing at the public whois.vu endpoint.
    pub fn new() -> Result<Self, DomainExpiryError> {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a new client pointing at a custom endpoint.
    ///
    /// No HTTP timeout is configured here; bounding lookups is the
    /// checker's job.
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Result<Self, DomainExpiryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("domain-expiry/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DomainExpiryError::network_with_source(
                    "Failed to create WHOIS API HTTP client",
                    e.to_string(),
                )
            })?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
        })
    }

    /// The endpoint this client queries.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the API for one domain.
    ///
    /// # Errors
    ///
    /// Returns `DomainExpiryError` if:
    /// - The request cannot be sent (connection, DNS, TLS)
    /// - The API returns a non-success HTTP status
    /// - The body is not valid JSON of the expected shape
    pub async fn query(&self, domain: &str) -> Result<WhoisRecord, DomainExpiryError> {
        debug!(domain, url = %self.base_url, "querying WHOIS API");

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[("q", domain)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainExpiryError::api_with_status(
                domain,
                format!("WHOIS API returned error: {}", status),
                status.as_u16(),
            ));
        }

        let body = response.text().await?;
        serde_json::from_str::<WhoisRecord>(&body).map_err(|e| {
            DomainExpiryError::parse(format!(
                "Failed to parse WHOIS API response for {}: {}",
                domain, e
            ))
        })
    }
}

#[async_trait]
impl WhoisSource for WhoisVuClient {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, DomainExpiryError> {
        self.query(domain).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WhoisVuClient::new().unwrap();
        assert_eq!(client.base_url(), "https://api.whois.vu/");

        let custom = WhoisVuClient::with_base_url("http://127.0.0.1:9/").unwrap();
        assert_eq!(custom.base_url(), "http://127.0.0.1:9/");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections
        let client = WhoisVuClient::with_base_url("http://127.0.0.1:9/").unwrap();
        let err = client.query("example.com").await.unwrap_err();
        assert!(matches!(err, DomainExpiryError::NetworkError { .. }));
    }
}
