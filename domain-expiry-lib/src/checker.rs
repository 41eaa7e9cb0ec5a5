//! Expiry checker: fans lookups out over every configured domain.
//!
//! Each domain is looked up independently and concurrently. Failures are
//! contained per domain, so the batch always yields one status per input
//! domain, in input order.

use crate::error::DomainExpiryError;
use crate::protocols::{extract_registrar, WhoisSource, WhoisVuClient};
use crate::types::{DomainStatus, WhoisRecord};
use crate::utils::{expiry_from_unix_seconds, format_expiry_date, remaining_days};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

/// Looks up expiry status for domains through a [`WhoisSource`].
///
/// # Example
///
/// ```rust,no_run
/// use domain_expiry_lib::ExpiryChecker;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let checker = ExpiryChecker::whois_vu()?;
///     let domains = vec!["example.com".to_string(), "example.org".to_string()];
///     for status in checker.check_domains(&domains).await {
///         println!("{}: {}", status.domain, status.remaining_days_display());
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ExpiryChecker {
    source: Arc<dyn WhoisSource>,
    /// Upper bound for one lookup; `None` waits indefinitely
    lookup_timeout: Option<Duration>,
}

impl ExpiryChecker {
    /// Create a checker over any WHOIS source.
    pub fn new(source: Arc<dyn WhoisSource>) -> Self {
        Self {
            source,
            lookup_timeout: None,
        }
    }

    /// Create a checker that queries the public whois.vu API.
    pub fn whois_vu() -> Result<Self, DomainExpiryError> {
        Ok(Self::new(Arc::new(WhoisVuClient::new()?)))
    }

    /// Bound every lookup by `timeout`. A lookup that runs over is treated
    /// like any other per-domain failure.
    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Check one domain. Never fails: errors become a placeholder status.
    pub async fn check_domain(&self, domain: &str) -> DomainStatus {
        let domain = domain.trim();

        let result = match self.lookup_timeout {
            Some(timeout) => {
                match tokio::time::timeout(timeout, self.source.lookup(domain)).await {
                    Ok(result) => result,
                    Err(_) => Err(DomainExpiryError::timeout("WHOIS lookup", timeout)),
                }
            }
            None => self.source.lookup(domain).await,
        };

        match result.and_then(|record| build_status(domain, &record, Utc::now())) {
            Ok(status) => {
                debug!(
                    domain,
                    registrar = status.registrar_display(),
                    registrar_url = status.registrar_url_display(),
                    "parsed WHOIS record"
                );
                status
            }
            Err(e) => {
                error!(domain, error = %e, "Error fetching or parsing WHOIS data");
                DomainStatus::unavailable(domain, e)
            }
        }
    }

    /// Check all domains concurrently and return their statuses in input order.
    ///
    /// Every lookup is started at once and the call returns when the last one
    /// has finished.
    pub async fn check_domains(&self, domains: &[String]) -> Vec<DomainStatus> {
        join_all(domains.iter().map(|domain| self.check_domain(domain))).await
    }
}

/// Turn one API record into a domain status, as of `now`.
///
/// # Errors
///
/// Returns `MissingExpiry` when `expires` is absent or null, and
/// `InvalidExpiry` when it is present but is not a usable timestamp.
pub fn build_status(
    domain: &str,
    record: &WhoisRecord,
    now: DateTime<Utc>,
) -> Result<DomainStatus, DomainExpiryError> {
    let expires = match &record.expires {
        None | Some(serde_json::Value::Null) => {
            return Err(DomainExpiryError::missing_expiry(domain))
        }
        Some(value) => value,
    };

    let expiry = expiry_from_unix_seconds(expires)
        .ok_or_else(|| DomainExpiryError::invalid_expiry(domain, expires.to_string()))?;

    let registrar = record
        .whois
        .as_deref()
        .map(extract_registrar)
        .unwrap_or_default();

    Ok(DomainStatus {
        domain: domain.to_string(),
        expiry_date: Some(format_expiry_date(expiry)),
        remaining_days: Some(remaining_days(expiry, now)),
        registrar: registrar.name,
        registrar_url: registrar.url,
        error_message: None,
    })
}
