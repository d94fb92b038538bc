use super::config_error::ConfigError;
use diesel::r2d2::PoolError;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not build connection pool: {0}")]
    Pool(#[from] PoolError),
    #[error("Could not bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
}
