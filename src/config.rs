//! Runtime configuration loaded from the process environment (and `.env`).

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown environment '{0}' (expected mainnet, testnet or sandbox)")]
    UnknownEnvironment(String),
    #[error("Invalid URL in {var}: {reason}")]
    InvalidUrl { var: String, reason: String },
    #[error("Invalid value for {var}: {value}")]
    InvalidNumber { var: String, value: String },
}

/// A named deployment the client can talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub id: String,
    pub name: String,
    pub api_endpoint: String,
    pub viewer_url: String,
}

lazy_static! {
    static ref ENVIRONMENTS: HashMap<&'static str, Environment> = {
        let mut envs = HashMap::new();
        envs.insert("mainnet", Environment {
            id: "mainnet".to_string(),
            name: "Mainnet".to_string(),
            api_endpoint: "https://api.lens.dev".to_string(),
            viewer_url: "https://hey.xyz".to_string(),
        });
        envs.insert("testnet", Environment {
            id: "testnet".to_string(),
            name: "Testnet".to_string(),
            api_endpoint: "https://api-mumbai.lens.dev".to_string(),
            viewer_url: "https://testnet.hey.xyz".to_string(),
        });
        envs.insert("sandbox", Environment {
            id: "sandbox".to_string(),
            name: "Sandbox".to_string(),
            api_endpoint: "https://api-sandbox-mumbai.lens.dev".to_string(),
            viewer_url: "https://testnet.hey.xyz".to_string(),
        });
        envs
    };
}

const DEFAULT_ENVIRONMENT: &str = "mainnet";
const DEFAULT_EXPLORER_URL: &str = "https://momoka.lens.xyz";
const DEFAULT_FEED_LIMIT: usize = 10;
const DEFAULT_API_RATE_LIMIT: usize = 5;
const DEFAULT_API_TIMEOUT_SECS: usize = 10;

/// Look up an environment preset by id (case-insensitive)
pub fn get_environment(id: &str) -> Result<Environment, ConfigError> {
    ENVIRONMENTS
        .get(id.trim().to_lowercase().as_str())
        .cloned()
        .ok_or_else(|| ConfigError::UnknownEnvironment(id.to_string()))
}

/// Derive the subscription socket URL from an HTTP API endpoint.
/// Only the leading `http` is swapped, so `https` becomes `wss`.
pub fn socket_endpoint(api_endpoint: &str) -> String {
    match api_endpoint.strip_prefix("http") {
        Some(rest) => format!("ws{}", rest),
        None => api_endpoint.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub explorer_url: String,
    pub feed_limit: usize,
    pub api_rate_limit: usize,
    /// Upper bound on one explorer API request, connect to last byte
    pub api_timeout: Duration,
    pub clear_screen: bool,
}

impl Config {
    /// Build the configuration from `DA_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_id = lookup("DA_ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let mut environment = get_environment(&env_id)?;

        if let Some(endpoint) = lookup("DA_API_ENDPOINT") {
            environment.api_endpoint = validate_url("DA_API_ENDPOINT", &endpoint)?;
        }

        let explorer_url = match lookup("DA_EXPLORER_URL") {
            Some(url) => validate_url("DA_EXPLORER_URL", &url)?,
            None => DEFAULT_EXPLORER_URL.to_string(),
        };

        let feed_limit = parse_positive(&lookup, "DA_FEED_LIMIT", DEFAULT_FEED_LIMIT)?;
        let api_rate_limit = parse_positive(&lookup, "DA_API_RATE_LIMIT", DEFAULT_API_RATE_LIMIT)?;
        let api_timeout_secs = parse_positive(&lookup, "DA_API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS)?;

        let clear_screen = lookup("DA_CLEAR_SCREEN")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Config {
            environment,
            explorer_url,
            feed_limit,
            api_rate_limit,
            api_timeout: Duration::from_secs(api_timeout_secs as u64),
            clear_screen,
        })
    }

    pub fn socket_endpoint(&self) -> String {
        socket_endpoint(&self.environment.api_endpoint)
    }
}

fn validate_url(var: &str, value: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        var: var.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(value.trim().trim_end_matches('/').to_string()),
        other => Err(ConfigError::InvalidUrl {
            var: var.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

fn parse_positive<F>(lookup: &F, var: &str, default: usize) -> Result<usize, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(ConfigError::InvalidNumber {
                var: var.to_string(),
                value: raw,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_socket_endpoint_swaps_scheme() {
        assert_eq!(socket_endpoint("https://api.lens.dev"), "wss://api.lens.dev");
        assert_eq!(socket_endpoint("http://localhost:4000/graphql"), "ws://localhost:4000/graphql");
        assert_eq!(socket_endpoint("wss://already.socket"), "wss://already.socket");
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).expect("default config");
        assert_eq!(config.environment.id, "mainnet");
        assert_eq!(config.feed_limit, 10);
        assert_eq!(config.api_rate_limit, 5);
        assert_eq!(config.api_timeout, Duration::from_secs(10));
        assert!(!config.clear_screen);
        assert_eq!(config.socket_endpoint(), "wss://api.lens.dev");
    }

    #[test]
    fn test_environment_and_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("DA_ENVIRONMENT", "Testnet"),
            ("DA_API_ENDPOINT", "http://localhost:4000/graphql/"),
            ("DA_FEED_LIMIT", "25"),
            ("DA_API_TIMEOUT_SECS", "3"),
            ("DA_CLEAR_SCREEN", "yes"),
        ]))
        .expect("config");

        assert_eq!(config.environment.id, "testnet");
        assert_eq!(config.environment.api_endpoint, "http://localhost:4000/graphql");
        assert_eq!(config.environment.viewer_url, "https://testnet.hey.xyz");
        assert_eq!(config.feed_limit, 25);
        assert_eq!(config.api_timeout, Duration::from_secs(3));
        assert!(config.clear_screen);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("DA_ENVIRONMENT", "devnet")])),
            Err(ConfigError::UnknownEnvironment(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("DA_FEED_LIMIT", "0")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("DA_API_ENDPOINT", "ftp://example.com")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
