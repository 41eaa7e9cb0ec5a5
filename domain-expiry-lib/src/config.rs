//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, merging them with proper precedence rules, and
//! resolving the result into a [`HandlerConfig`].

use crate::error::DomainExpiryError;
use crate::types::{HandlerConfig, DEFAULT_API_BASE_URL, DEFAULT_PAGE_TITLE};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Default listen address for the HTTP server.
pub const DEFAULT_BIND: &str = "127.0.0.1:8787";

/// Configuration loaded from TOML files.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Domains to monitor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<DomainsConfig>,

    /// Upstream WHOIS API settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<ApiConfig>,

    /// HTTP server settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerConfig>,

    /// Page presentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageConfig>,
}

/// Domain list, either as one comma-separated string or as a TOML array.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DomainsConfig {
    /// Comma-separated list, same format as `DOMAIN_NAMES`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub names: Option<String>,

    /// One entry per domain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<String>>,
}

impl DomainsConfig {
    /// The domain list as a comma-separated string.
    pub fn joined(&self) -> Option<String> {
        match (&self.names, &self.list) {
            (Some(names), _) => Some(names.clone()),
            (None, Some(list)) => Some(list.join(",")),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    /// WHOIS API endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Per-lookup timeout (as string, e.g., "5s", "2m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerConfig {
    /// Listen address, e.g. "0.0.0.0:8787"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Link shown as a GitHub icon under the table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to log which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainExpiryError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainExpiryError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainExpiryError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content).map_err(|e| {
            DomainExpiryError::config(format!("Failed to parse TOML configuration: {}", e))
        })?;

        self.validate_config(&config)?;

        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config is lowest, then the home directory, then the current
    /// directory. Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainExpiryError> {
        let mut merged_config = FileConfig::default();

        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    if self.verbose {
                        debug!(path = %path.display(), "loaded configuration file");
                    }
                    merged_config = self.merge_configs(merged_config, config);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "ignoring configuration file"),
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let candidates = ["./domain-expiry.toml", "./.domain-expiry.toml"];

        candidates
            .iter()
            .map(Path::new)
            .find(|path| path.exists())
            .map(Path::to_path_buf)
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let candidates = [".domain-expiry.toml", "domain-expiry.toml"];

        candidates
            .iter()
            .map(|candidate| Path::new(&home).join(candidate))
            .find(|path| path.exists())
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-expiry").join("config.toml");
        if path.exists() {
            Some(path)
        } else {
            None
        }
    }

    /// Merge two configurations; values from `higher` win.
    fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            // The two domain forms are alternatives, so the list is taken whole
            domains: higher.domains.or(lower.domains),
            api: match (lower.api, higher.api) {
                (Some(mut lower_api), Some(higher_api)) => {
                    if higher_api.base_url.is_some() {
                        lower_api.base_url = higher_api.base_url;
                    }
                    if higher_api.timeout.is_some() {
                        lower_api.timeout = higher_api.timeout;
                    }
                    Some(lower_api)
                }
                (lower_api, higher_api) => higher_api.or(lower_api),
            },
            server: match (lower.server, higher.server) {
                (Some(mut lower_server), Some(higher_server)) => {
                    if higher_server.bind.is_some() {
                        lower_server.bind = higher_server.bind;
                    }
                    Some(lower_server)
                }
                (lower_server, higher_server) => higher_server.or(lower_server),
            },
            page: match (lower.page, higher.page) {
                (Some(mut lower_page), Some(higher_page)) => {
                    if higher_page.title.is_some() {
                        lower_page.title = higher_page.title;
                    }
                    if higher_page.project_url.is_some() {
                        lower_page.project_url = higher_page.project_url;
                    }
                    Some(lower_page)
                }
                (lower_page, higher_page) => higher_page.or(lower_page),
            },
        }
    }

    fn validate_config(&self, config: &FileConfig) -> Result<(), DomainExpiryError> {
        if let Some(domains) = &config.domains {
            if domains.names.is_some() && domains.list.is_some() {
                return Err(DomainExpiryError::config(
                    "Cannot specify both 'names' and 'list' in [domains]",
                ));
            }
        }

        if let Some(api) = &config.api {
            if let Some(base_url) = &api.base_url {
                if base_url.trim().is_empty() {
                    return Err(DomainExpiryError::config("api.base_url cannot be empty"));
                }
            }

            if let Some(timeout_str) = &api.timeout {
                if parse_timeout_string(timeout_str).is_none() {
                    return Err(DomainExpiryError::config(format!(
                        "Invalid timeout format '{}'. Use format like '5s', '30s', '2m'",
                        timeout_str
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Environment variable configuration.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub domain_names: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub bind: Option<String>,
    pub title: Option<String>,
}

/// Load configuration from environment variables.
///
/// Reads `DOMAIN_NAMES`, `DE_API_URL`, `DE_TIMEOUT`, `DE_BIND` and
/// `DE_TITLE`. Invalid values are ignored, with a warning when `verbose`.
pub fn load_env_config(verbose: bool) -> EnvConfig {
    load_env_config_from(verbose, |key| env::var(key).ok())
}

fn load_env_config_from<F>(verbose: bool, lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut env_config = EnvConfig {
        domain_names: non_empty("DOMAIN_NAMES"),
        api_base_url: non_empty("DE_API_URL"),
        bind: non_empty("DE_BIND"),
        title: non_empty("DE_TITLE"),
        ..Default::default()
    };

    if let Some(timeout_str) = lookup("DE_TIMEOUT") {
        match parse_timeout_string(&timeout_str) {
            Some(secs) => env_config.timeout = Some(Duration::from_secs(secs)),
            None => {
                if verbose {
                    warn!("Invalid DE_TIMEOUT='{}', use format like '5s' or '2m'", timeout_str);
                }
            }
        }
    }

    env_config
}

/// Overrides taken from the command line; `None` leaves a value alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub domain_names: Option<String>,
    pub api_base_url: Option<String>,
    pub timeout: Option<Duration>,
    pub bind: Option<String>,
    pub title: Option<String>,
}

/// Fully resolved settings for one process.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub handler: HandlerConfig,
    pub bind: String,
}

/// Resolve file, environment and CLI settings; CLI wins, then environment,
/// then files.
///
/// # Errors
///
/// Returns a configuration error if the file timeout cannot be parsed.
pub fn resolve_config(
    file: FileConfig,
    env_config: EnvConfig,
    cli: CliOverrides,
) -> Result<ResolvedConfig, DomainExpiryError> {
    let api = file.api.unwrap_or_default();
    let page = file.page.unwrap_or_default();

    let file_timeout = match api.timeout {
        Some(timeout_str) => Some(
            parse_timeout_string(&timeout_str)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    DomainExpiryError::config(format!("Invalid timeout format '{}'", timeout_str))
                })?,
        ),
        None => None,
    };

    let mut handler = HandlerConfig::default();
    handler.domain_names = cli
        .domain_names
        .or(env_config.domain_names)
        .or_else(|| file.domains.and_then(|d| d.joined()));
    handler.api_base_url = cli
        .api_base_url
        .or(env_config.api_base_url)
        .or(api.base_url)
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
    handler.lookup_timeout = cli.timeout.or(env_config.timeout).or(file_timeout);
    handler.page.title = cli
        .title
        .or(env_config.title)
        .or(page.title)
        .unwrap_or_else(|| DEFAULT_PAGE_TITLE.to_string());
    handler.page.project_url = page.project_url;

    let bind = cli
        .bind
        .or(env_config.bind)
        .or(file.server.and_then(|s| s.bind))
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    Ok(ResolvedConfig { handler, bind })
}

/// Parse a timeout string like "5s", "30s", "2m" into seconds.
pub fn parse_timeout_string(timeout_str: &str) -> Option<u64> {
    let timeout_str = timeout_str.trim().to_lowercase();

    if let Some(secs) = timeout_str.strip_suffix('s') {
        secs.parse::<u64>().ok()
    } else if let Some(mins) = timeout_str.strip_suffix('m') {
        mins.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        // Assume seconds if no unit
        timeout_str.parse::<u64>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(5));
        assert_eq!(parse_timeout_string("30S"), Some(30));
        assert_eq!(parse_timeout_string("2m"), Some(120));
        assert_eq!(parse_timeout_string("5"), Some(5));
        assert_eq!(parse_timeout_string("invalid"), None);
        assert_eq!(parse_timeout_string("-3s"), None);
        assert_eq!(parse_timeout_string("307445734561825861m"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[domains]
names = "example.com, example.org"

[api]
base_url = "http://localhost:9000/"
timeout = "10s"

[server]
bind = "0.0.0.0:8080"

[page]
title = "My Domains"
project_url = "https://github.com/example/domains"
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let domains = config.domains.unwrap();
        assert_eq!(domains.joined().as_deref(), Some("example.com, example.org"));
        let api = config.api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://localhost:9000/"));
        assert_eq!(api.timeout.as_deref(), Some("10s"));
        assert_eq!(config.server.unwrap().bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(config.page.unwrap().title.as_deref(), Some("My Domains"));
    }

    #[test]
    fn test_domains_list_form() {
        let temp_file = write_config(
            r#"
[domains]
list = ["a.com", "b.org"]
"#,
        );

        let config = ConfigManager::new(false).load_file(temp_file.path()).unwrap();
        assert_eq!(config.domains.unwrap().joined().as_deref(), Some("a.com,b.org"));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let manager = ConfigManager::new(false);

        let both = write_config("[domains]\nnames = \"a.com\"\nlist = [\"b.com\"]\n");
        assert!(manager.load_file(both.path()).is_err());

        let bad_timeout = write_config("[api]\ntimeout = \"soon\"\n");
        assert!(manager.load_file(bad_timeout.path()).is_err());

        let empty_url = write_config("[api]\nbase_url = \" \"\n");
        assert!(manager.load_file(empty_url.path()).is_err());

        let not_toml = write_config("this is = = not toml");
        let err = manager.load_file(not_toml.path()).unwrap_err();
        assert!(matches!(err, DomainExpiryError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = ConfigManager::new(false)
            .load_file("/nonexistent/domain-expiry.toml")
            .unwrap_err();
        assert!(matches!(err, DomainExpiryError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            domains: Some(DomainsConfig {
                list: Some(vec!["low.com".to_string()]),
                ..Default::default()
            }),
            api: Some(ApiConfig {
                base_url: Some("http://low/".to_string()),
                timeout: Some("5s".to_string()),
            }),
            ..Default::default()
        };

        let higher = FileConfig {
            domains: Some(DomainsConfig {
                names: Some("high.com".to_string()),
                ..Default::default()
            }),
            api: Some(ApiConfig {
                base_url: Some("http://high/".to_string()),
                timeout: None,
            }),
            ..Default::default()
        };

        let merged = manager.merge_configs(lower, higher);
        let domains = merged.domains.unwrap();
        assert_eq!(domains.joined().as_deref(), Some("high.com"));
        assert!(domains.list.is_none());

        let api = merged.api.unwrap();
        assert_eq!(api.base_url.as_deref(), Some("http://high/")); // Higher wins
        assert_eq!(api.timeout.as_deref(), Some("5s")); // Lower preserved
    }

    #[test]
    fn test_env_config_parsing() {
        let vars: HashMap<&str, &str> = [
            ("DOMAIN_NAMES", "a.com,b.com"),
            ("DE_TIMEOUT", "2m"),
            ("DE_BIND", "  "),
            ("DE_TITLE", "Env Title"),
        ]
        .into_iter()
        .collect();

        let env_config = load_env_config_from(false, |key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(env_config.domain_names.as_deref(), Some("a.com,b.com"));
        assert_eq!(env_config.timeout, Some(Duration::from_secs(120)));
        assert!(env_config.bind.is_none());
        assert!(env_config.api_base_url.is_none());
        assert_eq!(env_config.title.as_deref(), Some("Env Title"));
    }

    #[test]
    fn test_blank_env_domain_names_falls_back_to_file() {
        let env_config = load_env_config_from(false, |key| {
            (key == "DOMAIN_NAMES").then(String::new)
        });
        assert!(env_config.domain_names.is_none());

        let file = FileConfig {
            domains: Some(DomainsConfig {
                list: Some(vec!["file.com".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };
        let resolved = resolve_config(file, env_config, CliOverrides::default()).unwrap();
        assert_eq!(resolved.handler.domain_names.as_deref(), Some("file.com"));
    }

    #[test]
    fn test_env_config_ignores_invalid_timeout() {
        let env_config = load_env_config_from(true, |key| {
            (key == "DE_TIMEOUT").then(|| "whenever".to_string())
        });
        assert!(env_config.timeout.is_none());
    }

    #[test]
    fn test_resolve_config_precedence() {
        let file = FileConfig {
            domains: Some(DomainsConfig {
                names: Some("file.com".to_string()),
                ..Default::default()
            }),
            api: Some(ApiConfig {
                base_url: Some("http://file/".to_string()),
                timeout: Some("7s".to_string()),
            }),
            server: Some(ServerConfig {
                bind: Some("0.0.0.0:1".to_string()),
            }),
            page: Some(PageConfig {
                title: Some("File Title".to_string()),
                project_url: Some("https://github.com/x/y".to_string()),
            }),
        };
        let env_config = EnvConfig {
            domain_names: Some("env.com".to_string()),
            api_base_url: Some("http://env/".to_string()),
            ..Default::default()
        };
        let cli = CliOverrides {
            domain_names: Some("cli.com".to_string()),
            ..Default::default()
        };

        let resolved = resolve_config(file, env_config, cli).unwrap();
        assert_eq!(resolved.handler.domain_names.as_deref(), Some("cli.com"));
        assert_eq!(resolved.handler.api_base_url, "http://env/");
        assert_eq!(resolved.handler.lookup_timeout, Some(Duration::from_secs(7)));
        assert_eq!(resolved.handler.page.title, "File Title");
        assert_eq!(
            resolved.handler.page.project_url.as_deref(),
            Some("https://github.com/x/y")
        );
        assert_eq!(resolved.bind, "0.0.0.0:1");
    }

    #[test]
    fn test_resolve_config_defaults() {
        let resolved =
            resolve_config(FileConfig::default(), EnvConfig::default(), CliOverrides::default())
                .unwrap();
        assert!(resolved.handler.domain_names.is_none());
        assert_eq!(resolved.handler.api_base_url, DEFAULT_API_BASE_URL);
        assert!(resolved.handler.lookup_timeout.is_none());
        assert_eq!(resolved.handler.page.title, DEFAULT_PAGE_TITLE);
        assert_eq!(resolved.bind, DEFAULT_BIND);
    }
}
