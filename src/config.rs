use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com/search.json";
pub const DEFAULT_JOBS_API_URL: &str = "http://localhost:8000/api/search-jobs";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub serpapi_key: Option<String>,
    pub serpapi_base_url: String,
    pub upstream_timeout_secs: u64,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:8000".to_string(),
            serpapi_key: None,
            serpapi_base_url: DEFAULT_SERPAPI_BASE_URL.to_string(),
            upstream_timeout_secs: 15,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let server_address = match env::var("SERVER_ADDRESS") {
            Ok(addr) => addr,
            Err(_) => match get_env_opt("PORT") {
                Some(port) => {
                    let port: u16 = port
                        .parse()
                        .map_err(|e| Error::Config(format!("Invalid value for PORT: {}", e)))?;
                    format!("0.0.0.0:{}", port)
                }
                None => defaults.server_address,
            },
        };

        Ok(Self {
            server_address,
            serpapi_key: get_env_opt("SERPAPI_KEY"),
            serpapi_base_url: get_env_opt("SERPAPI_BASE_URL")
                .unwrap_or(defaults.serpapi_base_url),
            upstream_timeout_secs: get_env_parse_or(
                "UPSTREAM_TIMEOUT_SECS",
                defaults.upstream_timeout_secs,
            )?,
            log_format: match get_env_opt("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        })
    }
}

/// Settings for the client-side query layer (`JobsClient` and the CLI).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub fallback_enabled: bool,
    pub fallback_path: Option<String>,
    /// Fallback search also matches the query against descriptions.
    pub fallback_match_description: bool,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Ok(Self {
            api_url: get_env_opt("JOBS_API_URL").unwrap_or_else(|| DEFAULT_JOBS_API_URL.to_string()),
            fallback_enabled: get_env_parse_or("JOBS_FALLBACK_ENABLED", false)?,
            fallback_path: get_env_opt("JOBS_FALLBACK_PATH"),
            fallback_match_description: get_env_parse_or("JOBS_FALLBACK_MATCH_DESCRIPTION", false)?,
        })
    }
}

/// Unset and blank variables are treated the same.
fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
