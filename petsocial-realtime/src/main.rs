use config::Config;
use credentials::{database_account_resolver::DatabaseAccountResolver, jwt_verifier::JwtVerifier};
use diesel::{
    MysqlConnection,
    r2d2::{ConnectionManager, Pool},
};
use dotenvy::dotenv;
use env_logger::Env;
use errors::startup_error::StartupError;
use log::{error, info};
use realtime_server::SocketServer;
use std::net::SocketAddr;
use tokio::{net::TcpListener, signal};
use tokio_util::sync::CancellationToken;

mod config;
mod credentials;
mod errors;
mod http;
pub mod models;
pub mod schema;

#[tokio::main]
async fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    if let Err(error) = run().await {
        error!("{error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    let manager = ConnectionManager::<MysqlConnection>::new(&config.database_url);
    let pool = Pool::builder().test_on_check_out(true).build(manager)?;

    let verifier = JwtVerifier::new(&config.jwt_secret);
    let resolver = DatabaseAccountResolver::new(pool);
    let server = SocketServer::new(verifier, resolver, config.socket);

    let app = http::router(
        http::AppState {
            dispatcher: server.dispatcher(),
            registry: server.registry(),
        },
        config.frontend_url.as_deref(),
        config.internal_api_key.as_deref(),
    )?;

    let socket_listener = bind(config.socket_addr).await?;
    info!("Realtime socket listening on {}", config.socket_addr);
    let http_listener = bind(config.http_addr).await?;

    let shutdown = CancellationToken::new();
    tokio::spawn(server.heartbeat().run(shutdown.clone()));
    tokio::spawn(http::listen(http_listener, app, shutdown.clone()));

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if let Err(error) = signal::ctrl_c().await {
            error!("Could not listen for shutdown signal: {error}");
            return;
        }

        info!("Shutting down");
        signal_shutdown.cancel();
    });

    server.listen(socket_listener, shutdown).await;
    Ok(())
}

async fn bind(address: SocketAddr) -> Result<TcpListener, StartupError> {
    TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })
}
