//! Upstream lookup implementations.
//!
//! This module contains the WHOIS API client and the registrar parser for
//! the free-text WHOIS block the API returns.

use crate::error::DomainExpiryError;
use crate::types::WhoisRecord;
use async_trait::async_trait;

/// whois.vu JSON API client
pub mod whois_vu;

/// Registrar extraction from raw WHOIS text
pub mod registrar;

pub use registrar::{extract_registrar, truncate_registrar, RegistrarInfo};
pub use whois_vu::WhoisVuClient;

/// A source of WHOIS records, one domain at a time.
///
/// The checker is generic over this so that lookups can be served from
/// something other than the live API.
#[async_trait]
pub trait WhoisSource: Send + Sync {
    async fn lookup(&self, domain: &str) -> Result<WhoisRecord, DomainExpiryError>;
}
