//! Core data types for domain expiry reporting.
//!
//! This module defines the per-domain status record, the typed form of the
//! WHOIS API response, handler configuration, and the request/response pair
//! the handler works with.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Placeholder shown for any field that could not be determined.
pub const SENTINEL: &str = "--";

/// Content type of every page the handler returns.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// Default WHOIS API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.whois.vu/";

/// Default page title.
pub const DEFAULT_PAGE_TITLE: &str = "Domain Expiry Monitor";

/// Expiry status of a single configured domain.
///
/// One record is produced for every configured domain on every request,
/// whether or not the upstream lookup succeeded. Missing values are `None`
/// and are displayed as [`SENTINEL`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainStatus {
    /// The domain name, trimmed of surrounding whitespace
    pub domain: String,

    /// Expiry date formatted as `YYYY.M.D`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,

    /// Days until expiry, rounded up; negative once expired
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_days: Option<i64>,

    /// Registrar name, truncated for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    /// Registrar homepage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar_url: Option<String>,

    /// Why the lookup failed, if it did. Logged, never rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DomainStatus {
    /// Build the placeholder record for a domain whose lookup failed.
    pub fn unavailable<D: Into<String>, E: ToString>(domain: D, error: E) -> Self {
        Self {
            domain: domain.into(),
            expiry_date: None,
            remaining_days: None,
            registrar: None,
            registrar_url: None,
            error_message: Some(error.to_string()),
        }
    }

    /// Whether the lookup for this domain failed.
    pub fn is_unavailable(&self) -> bool {
        self.error_message.is_some()
    }

    pub fn expiry_date_display(&self) -> &str {
        self.expiry_date.as_deref().unwrap_or(SENTINEL)
    }

    pub fn remaining_days_display(&self) -> String {
        match self.remaining_days {
            Some(days) => days.to_string(),
            None => SENTINEL.to_string(),
        }
    }

    pub fn registrar_display(&self) -> &str {
        self.registrar.as_deref().unwrap_or(SENTINEL)
    }

    pub fn registrar_url_display(&self) -> &str {
        self.registrar_url.as_deref().unwrap_or(SENTINEL)
    }
}

/// The subset of the WHOIS API response this crate reads.
///
/// `expires` is kept as a raw JSON value so that a present-but-wrong value
/// can be told apart from an absent one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WhoisRecord {
    /// Expiry as Unix seconds
    #[serde(default)]
    pub expires: Option<serde_json::Value>,

    /// Raw WHOIS text returned by the registry
    #[serde(default)]
    pub whois: Option<String>,
}

/// Presentation options for the rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    /// Title shown in the browser tab and the page heading
    pub title: String,

    /// Project link shown as a GitHub icon under the table
    pub project_url: Option<String>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_PAGE_TITLE.to_string(),
            project_url: None,
        }
    }
}

/// Configuration handed to the request handler at construction.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Comma-separated domain list. `None` is reported as an error page.
    pub domain_names: Option<String>,

    /// Base URL of the WHOIS API; the domain is sent as the `q` parameter
    pub api_base_url: String,

    /// Per-lookup timeout. `None` waits for the upstream indefinitely.
    pub lookup_timeout: Option<Duration>,

    /// Page presentation
    pub page: PageOptions,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            domain_names: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            lookup_timeout: None,
            page: PageOptions::default(),
        }
    }
}

impl HandlerConfig {
    /// Set the comma-separated domain list.
    pub fn with_domain_names<S: Into<String>>(mut self, names: S) -> Self {
        self.domain_names = Some(names.into());
        self
    }

    /// Set the WHOIS API base URL.
    pub fn with_api_base_url<S: Into<String>>(mut self, url: S) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Set a per-lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = Some(timeout);
        self
    }

    /// Set the page title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.page.title = title.into();
        self
    }

    /// Set the project link shown under the table.
    pub fn with_project_url<S: Into<String>>(mut self, url: S) -> Self {
        self.page.project_url = Some(url.into());
        self
    }
}

/// An inbound request. Only used for logging; every request renders the
/// same page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub method: String,
    pub path: String,
}

impl PageRequest {
    pub fn new<M: Into<String>, P: Into<String>>(method: M, path: P) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// The handler's answer: always HTTP 200 with an HTML body.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl PageResponse {
    /// Wrap an HTML document in a 200 response.
    pub fn html(body: String) -> Self {
        Self {
            status: 200,
            content_type: HTML_CONTENT_TYPE,
            body,
        }
    }
}
