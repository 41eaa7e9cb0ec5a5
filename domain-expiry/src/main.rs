//! Domain Expiry Server
//!
//! Serves a sortable HTML page listing expiry dates of the configured
//! domains, looked up through the whois.vu API on every request.

mod server;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_expiry_lib::{
    load_env_config, parse_timeout_string, resolve_config, CliOverrides, ConfigManager,
    DomainExpiryError, FileConfig, PageRequest, RequestHandler, ResolvedConfig,
};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-expiry
#[derive(Parser, Debug)]
#[command(name = "domain-expiry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Sai Dutt G.V <gvs46@protonmail.com>")]
#[command(about = "Serve a sortable page of domain expiry dates")]
#[command(
    long_about = "Look up expiry dates for a list of domains through the whois.vu API and serve them as a sortable HTML table.\n\nThe domain list comes from --domains, the DOMAIN_NAMES environment variable, or a domain-expiry.toml config file."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Comma-separated domains to monitor (overrides DOMAIN_NAMES)
    #[arg(short = 'd', long = "domains", value_name = "LIST", help_heading = "Domains")]
    pub domains: Option<String>,

    /// Use a specific config file instead of discovering one
    #[arg(short = 'c', long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// WHOIS API endpoint
    #[arg(long = "api-url", value_name = "URL", help_heading = "Configuration")]
    pub api_url: Option<String>,

    /// Per-lookup timeout, e.g. 5s or 2m (default: wait indefinitely)
    #[arg(long = "timeout", value_name = "DURATION", help_heading = "Configuration")]
    pub timeout: Option<String>,

    /// Page title
    #[arg(long = "title", value_name = "TITLE", help_heading = "Configuration")]
    pub title: Option<String>,

    /// Address to listen on (default: 127.0.0.1:8787)
    #[arg(short = 'b', long = "bind", value_name = "ADDR", help_heading = "Server")]
    pub bind: Option<String>,

    /// Render the page once to stdout and exit
    #[arg(long = "once", help_heading = "Server")]
    pub once: bool,

    /// Log debug output (per-domain registrar details, config discovery)
    #[arg(short = 'v', long = "verbose", help_heading = "Debugging")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Validate arguments
    let timeout = match validate_args(&args) {
        Ok(timeout) => timeout,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(args, timeout).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Validate command line arguments, returning the parsed timeout.
fn validate_args(args: &Args) -> Result<Option<Duration>, String> {
    if let Some(domains) = &args.domains {
        if domains.trim().is_empty() {
            return Err("--domains cannot be empty".to_string());
        }
    }

    match &args.timeout {
        Some(timeout_str) => parse_timeout_string(timeout_str)
            .map(|secs| Some(Duration::from_secs(secs)))
            .ok_or_else(|| {
                format!(
                    "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                    timeout_str
                )
            }),
        None => Ok(None),
    }
}

async fn run(args: Args, timeout: Option<Duration>) -> Result<(), DomainExpiryError> {
    let resolved = load_config(&args, timeout)?;
    let handler = Arc::new(RequestHandler::new(resolved.handler)?);

    if args.once {
        let page = handler.handle(&PageRequest::new("GET", "/")).await;
        print!("{}", page.body);
        return Ok(());
    }

    server::serve(handler, &resolved.bind).await
}

/// Layer config file, environment and CLI flags.
fn load_config(args: &Args, timeout: Option<Duration>) -> Result<ResolvedConfig, DomainExpiryError> {
    let manager = ConfigManager::new(args.verbose);
    let file_config: FileConfig = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let cli = CliOverrides {
        domain_names: args.domains.clone(),
        api_base_url: args.api_url.clone(),
        timeout,
        bind: args.bind.clone(),
        title: args.title.clone(),
    };

    resolve_config(file_config, load_env_config(args.verbose), cli)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_timeout() {
        let args = Args::parse_from(["domain-expiry", "--timeout", "3s"]);
        assert_eq!(validate_args(&args), Ok(Some(Duration::from_secs(3))));

        let args = Args::parse_from(["domain-expiry", "--timeout", "later"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["domain-expiry"]);
        assert_eq!(validate_args(&args), Ok(None));
    }

    #[test]
    fn test_validate_args_rejects_blank_domains() {
        let args = Args::parse_from(["domain-expiry", "--domains", "  "]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_args_parse_flags() {
        let args = Args::parse_from([
            "domain-expiry",
            "-d",
            "a.com,b.com",
            "--bind",
            "0.0.0.0:9000",
            "--once",
            "-v",
        ]);
        assert_eq!(args.domains.as_deref(), Some("a.com,b.com"));
        assert_eq!(args.bind.as_deref(), Some("0.0.0.0:9000"));
        assert!(args.once);
        assert!(args.verbose);
    }
}
