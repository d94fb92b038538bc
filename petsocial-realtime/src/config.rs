use crate::errors::config_error::ConfigError;
use realtime_server::SocketConfig;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_SOCKET_ADDR: &str = "0.0.0.0:5001";
const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_HEARTBEAT_INTERVAL_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub socket_addr: SocketAddr,
    pub http_addr: SocketAddr,
    /// Shared HS256 secret the bearer tokens are signed with.
    pub jwt_secret: String,
    pub internal_api_key: Option<String>,
    pub frontend_url: Option<String>,
    pub socket: SocketConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Empty values count as
    /// unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let socket_addr = parse_or("SOCKET_ADDR", get("SOCKET_ADDR"), DEFAULT_SOCKET_ADDR)?;
        let http_addr = parse_or("HTTP_ADDR", get("HTTP_ADDR"), DEFAULT_HTTP_ADDR)?;

        let heartbeat_secs: u64 = match get("HEARTBEAT_INTERVAL_SECS") {
            Some(value) => parse("HEARTBEAT_INTERVAL_SECS", value)?,
            None => DEFAULT_HEARTBEAT_INTERVAL_SECS,
        };
        if heartbeat_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HEARTBEAT_INTERVAL_SECS",
                value: "0".to_string(),
            });
        }

        let handshake_timeout_secs: u64 = match get("HANDSHAKE_TIMEOUT_SECS") {
            Some(value) => parse("HANDSHAKE_TIMEOUT_SECS", value)?,
            None => 0,
        };

        Ok(Config {
            database_url,
            socket_addr,
            http_addr,
            jwt_secret,
            internal_api_key: get("INTERNAL_API_KEY"),
            frontend_url: get("FRONTEND_URL"),
            socket: SocketConfig {
                heartbeat_interval: Duration::from_secs(heartbeat_secs),
                handshake_timeout: (handshake_timeout_secs > 0)
                    .then(|| Duration::from_secs(handshake_timeout_secs)),
            },
        })
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .or(Err(ConfigError::Invalid { key, value }))
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    parse(key, value.unwrap_or_else(|| default.to_string()))
}
