//! # Domain Expiry Library
//!
//! Looks up expiry dates for a list of domains through the whois.vu JSON API
//! and renders them as a sortable HTML page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_expiry_lib::{HandlerConfig, PageRequest, RequestHandler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HandlerConfig::default().with_domain_names("example.com, example.org");
//!     let handler = RequestHandler::new(config)?;
//!
//!     let page = handler.handle(&PageRequest::new("GET", "/")).await;
//!     println!("{}", page.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Concurrent lookups**: every domain is queried at once
//! - **Failure containment**: a failed lookup yields a `--` row, never a missing one
//! - **Registrar details**: parsed from the raw WHOIS text
//! - **Self-contained page**: inline CSS and a client-side column sort

// Re-export main public API types and functions
pub use checker::{build_status, ExpiryChecker};
pub use config::{
    load_env_config, parse_timeout_string, resolve_config, CliOverrides, ConfigManager,
    EnvConfig, FileConfig, ResolvedConfig, DEFAULT_BIND,
};
pub use error::DomainExpiryError;
pub use handler::RequestHandler;
pub use protocols::{
    extract_registrar, truncate_registrar, RegistrarInfo, WhoisSource, WhoisVuClient,
};
pub use render::{render_error_page, render_status_page};
pub use types::{
    DomainStatus, HandlerConfig, PageOptions, PageRequest, PageResponse, WhoisRecord,
    DEFAULT_API_BASE_URL, DEFAULT_PAGE_TITLE, HTML_CONTENT_TYPE, SENTINEL,
};
pub use utils::{expiry_from_unix_seconds, format_expiry_date, parse_domain_list, remaining_days};

// Internal modules - these are not part of the public API
mod checker;
mod config;
mod error;
mod handler;
mod protocols;
mod render;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainExpiryError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
