use crate::errors::config_error::ConfigError;
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use hyper::{Request, body::Incoming};
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server,
};
use log::{error, info};
use realtime_server::{ConnectionRegistry, Dispatcher};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_service::Service;

mod deliver;
mod middleware;
mod stats;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub registry: Arc<ConnectionRegistry>,
}

/// Internal routes under `/_realtime`. `deliver` is only mounted when an API
/// key is configured.
pub fn router(
    state: AppState,
    frontend_url: Option<&str>,
    internal_api_key: Option<&str>,
) -> Result<Router, ConfigError> {
    let mut routes = Router::new().route("/stats", get(stats::stats));

    if let Some(frontend_url) = frontend_url {
        let origin = frontend_url
            .parse::<HeaderValue>()
            .or(Err(ConfigError::Invalid {
                key: "FRONTEND_URL",
                value: frontend_url.to_string(),
            }))?;
        routes = routes.layer(CorsLayer::new().allow_origin(origin));
    }

    if let Some(api_key) = internal_api_key {
        let authentication = axum::middleware::from_fn_with_state(
            Arc::new(api_key.to_string()),
            middleware::internal_authentication::internal_authentication,
        );
        routes = routes.route("/deliver", post(deliver::deliver).layer(authentication));
    }

    Ok(Router::new().nest("/_realtime", routes).with_state(state))
}

/// Serves `app` with hyper until `shutdown` is cancelled
pub async fn listen(listener: TcpListener, app: Router, shutdown: CancellationToken) {
    if let Ok(address) = listener.local_addr() {
        info!("HTTP server listening on {address}");
    }

    loop {
        let (socket, _remote_addr) = tokio::select! {
            client = listener.accept() => match client {
                Ok(client) => client,
                Err(error) => {
                    error!("Could not get socket from accepted HTTP connection: {error}");
                    continue;
                }
            },
            _ = shutdown.cancelled() => break,
        };

        let tower_service = app.clone();
        tokio::spawn(async move {
            let socket = TokioIo::new(socket);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                tower_service.clone().call(request)
            });

            let builder = server::conn::auto::Builder::new(TokioExecutor::new());
            if let Err(err) = builder
                .serve_connection_with_upgrades(socket, hyper_service)
                .await
            {
                error!("Failed to serve connection: {err:#}");
            }
        });
    }

    info!("HTTP server stopped");
}
