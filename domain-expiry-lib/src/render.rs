//! HTML rendering for the status page and the error page.
//!
//! The status page is a single self-contained document: inline CSS, one
//! table with a row per domain in the order given, and an inline script that
//! sorts the table in place when a column header is clicked. Both pages are
//! askama templates under `templates/`, so every interpolated value is
//! HTML-escaped.

use crate::error::DomainExpiryError;
use crate::types::{DomainStatus, PageOptions, SENTINEL};
use askama::Template;

/// One table row, already in display form.
struct StatusRow<'a> {
    domain: &'a str,
    expiry_date: &'a str,
    remaining_days: String,
    registrar: &'a str,
    registrar_href: Option<String>,
}

impl<'a> StatusRow<'a> {
    fn new(status: &'a DomainStatus) -> Self {
        Self {
            domain: &status.domain,
            expiry_date: status.expiry_date_display(),
            remaining_days: status.remaining_days_display(),
            registrar: status.registrar_display(),
            registrar_href: status.registrar_url.as_deref().and_then(link_target),
        }
    }

    fn href(&self) -> Option<&str> {
        self.registrar_href.as_deref()
    }
}

#[derive(Template)]
#[template(path = "status.html")]
struct StatusPage<'a> {
    title: &'a str,
    project_url: Option<&'a str>,
    rows: Vec<StatusRow<'a>>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    title: &'a str,
    message: &'a str,
}

/// Render the status page for `statuses`, in the order given.
pub fn render_status_page(
    statuses: &[DomainStatus],
    options: &PageOptions,
) -> Result<String, DomainExpiryError> {
    let page = StatusPage {
        title: &options.title,
        project_url: options.project_url.as_deref(),
        rows: statuses.iter().map(StatusRow::new).collect(),
    };
    Ok(page.render()?)
}

/// Render the minimal page shown when the request could not be processed.
pub fn render_error_page(message: &str, options: &PageOptions) -> Result<String, DomainExpiryError> {
    let page = ErrorPage {
        title: &options.title,
        message,
    };
    Ok(page.render()?)
}

/// Resolve a registrar URL to something safe to put in `href`.
///
/// Bare hosts such as `www.example.com` get an `http://` prefix. Any scheme
/// other than http(s) is refused.
fn link_target(url: &str) -> Option<String> {
    if url == SENTINEL {
        return None;
    }

    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Some(url.to_string())
    } else if url.contains(':') {
        None
    } else {
        Some(format!("http://{}", url))
    }
}
