//! Registrar extraction from free-text WHOIS output.
//!
//! The WHOIS API returns the registry's raw text next to the structured
//! fields. Registrar details are only available in that text, as
//! `Registrar:` and `Registrar URL:` lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Names longer than this are truncated for display.
const MAX_REGISTRAR_LEN: usize = 20;

/// Characters kept from a truncated name, before the ellipsis.
const TRUNCATED_REGISTRAR_LEN: usize = 17;

lazy_static! {
    static ref REGISTRAR_RE: Regex =
        Regex::new(r"(?im)^[ \t]*Registrar:[ \t]*(\S.*?)[ \t\r]*$").unwrap();
    static ref REGISTRAR_URL_RE: Regex =
        Regex::new(r"(?im)^[ \t]*Registrar URL:[ \t]*(\S+)").unwrap();
}

/// Registrar details found in a WHOIS text block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrarInfo {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Extract the registrar name and URL from raw WHOIS text.
///
/// Matching is case-insensitive and anchored at the start of a line. The
/// name is truncated with [`truncate_registrar`]; `\/` in the URL becomes `/`.
pub fn extract_registrar(whois_text: &str) -> RegistrarInfo {
    let name = REGISTRAR_RE
        .captures(whois_text)
        .and_then(|caps| caps.get(1))
        .map(|m| truncate_registrar(m.as_str()));

    let url = REGISTRAR_URL_RE
        .captures(whois_text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("\\/", "/"));

    RegistrarInfo { name, url }
}

/// Shorten a registrar name longer than 20 characters to its first 17
/// characters followed by `...`.
pub fn truncate_registrar(name: &str) -> String {
    if name.chars().count() > MAX_REGISTRAR_LEN {
        let head: String = name.chars().take(TRUNCATED_REGISTRAR_LEN).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}
