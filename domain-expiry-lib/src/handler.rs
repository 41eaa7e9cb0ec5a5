//! The request handler behind the status page.
//!
//! One call to [`RequestHandler::handle`] produces one complete HTML page.
//! The handler is transport-agnostic; the server crate adapts it to HTTP.

use crate::checker::ExpiryChecker;
use crate::error::DomainExpiryError;
use crate::protocols::{WhoisSource, WhoisVuClient};
use crate::render::{render_error_page, render_status_page};
use crate::types::{DomainStatus, HandlerConfig, PageRequest, PageResponse};
use crate::utils::parse_domain_list;
use std::sync::Arc;
use tracing::{error, info};

/// Renders the domain expiry page for every request.
///
/// # Example
///
/// ```rust,no_run
/// use domain_expiry_lib::{HandlerConfig, PageRequest, RequestHandler};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = HandlerConfig::default().with_domain_names("example.com,example.org");
///     let handler = RequestHandler::new(config)?;
///     let response = handler.handle(&PageRequest::new("GET", "/")).await;
///     println!("{}", response.body);
///     Ok(())
/// }
/// ```
pub struct RequestHandler {
    config: HandlerConfig,
    checker: ExpiryChecker,
}

impl RequestHandler {
    /// Create a handler that queries the WHOIS API named in `config`.
    pub fn new(config: HandlerConfig) -> Result<Self, DomainExpiryError> {
        let client = WhoisVuClient::with_base_url(config.api_base_url.clone())?;
        Ok(Self::with_source(config, Arc::new(client)))
    }

    /// Create a handler over a custom WHOIS source.
    pub fn with_source(config: HandlerConfig, source: Arc<dyn WhoisSource>) -> Self {
        let checker = ExpiryChecker::new(source).with_lookup_timeout(config.lookup_timeout);
        Self { config, checker }
    }

    /// The configuration this handler renders with.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handle one request.
    ///
    /// Always answers 200 with an HTML body. Per-domain failures show up as
    /// placeholder rows; anything else is rendered as an error page.
    pub async fn handle(&self, request: &PageRequest) -> PageResponse {
        info!(method = %request.method, path = %request.path, "rendering status page");

        let page = match self.collect_statuses().await {
            Ok(statuses) => render_status_page(&statuses, &self.config.page),
            Err(e) => {
                error!(error = %e, "Error fetching or parsing WHOIS data");
                render_error_page(&e.to_string(), &self.config.page)
            }
        };

        match page {
            Ok(body) => PageResponse::html(body),
            Err(e) => {
                error!(error = %e, "Failed to render page");
                let body = render_error_page(&e.to_string(), &self.config.page)
                    .unwrap_or_else(|_| format!("Error: {}", e));
                PageResponse::html(body)
            }
        }
    }

    /// Look up every configured domain, in configuration order.
    pub async fn collect_statuses(&self) -> Result<Vec<DomainStatus>, DomainExpiryError> {
        let domains = parse_domain_list(self.config.domain_names.as_deref())?;
        let statuses = self.checker.check_domains(&domains).await;

        let failed = statuses.iter().filter(|s| s.is_unavailable()).count();
        info!(domains = statuses.len(), failed, "WHOIS lookups finished");

        Ok(statuses)
    }
}
