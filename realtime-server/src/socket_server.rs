mod connection;

use crate::{
    authentication::{
        authenticator::Authenticator,
        traits::{account_resolver::AccountResolver, credential_verifier::CredentialVerifier},
    },
    config::SocketConfig,
    dispatcher::Dispatcher,
    errors::server_error::ServerError,
    heartbeat::Heartbeat,
    registry::ConnectionRegistry,
};
use connection::Connection;
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    net::TcpListener,
    time,
};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

/// Upper bound for open sessions to finish their teardown once the accept
/// loop stops.
const SHUTDOWN_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Realtime notification transport: accepts connections, authenticates
/// them and keeps the registry that [`Dispatcher`] and [`Heartbeat`] read.
pub struct SocketServer<V, R> {
    registry: Arc<ConnectionRegistry>,
    authenticator: Arc<Authenticator<V, R>>,
    config: SocketConfig,
}

impl<V, R> Clone for SocketServer<V, R> {
    fn clone(&self) -> Self {
        SocketServer {
            registry: Arc::clone(&self.registry),
            authenticator: Arc::clone(&self.authenticator),
            config: self.config,
        }
    }
}

impl<V: CredentialVerifier, R: AccountResolver> SocketServer<V, R> {
    pub fn new(verifier: V, resolver: R, config: SocketConfig) -> Self {
        SocketServer {
            registry: Arc::new(ConnectionRegistry::new()),
            authenticator: Arc::new(Authenticator::new(verifier, resolver)),
            config,
        }
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.registry())
    }

    pub fn heartbeat(&self) -> Heartbeat {
        Heartbeat::new(self.registry(), self.config.heartbeat_interval)
    }

    /// Accepts connections until `shutdown` is cancelled. Every connection
    /// runs on its own task; once cancelled, returns after those tasks have
    /// torn their sessions down or the drain timeout elapsed.
    pub async fn listen(&self, listener: TcpListener, shutdown: CancellationToken) {
        let sessions = TaskTracker::new();

        loop {
            tokio::select! {
                client = listener.accept() => {
                    let (socket, address) = match client {
                        Ok(client) => client,
                        Err(error) => {
                            error!("Could not get socket from accepted connection: {error}");
                            continue;
                        }
                    };

                    if let Err(error) = socket.set_nodelay(true) {
                        warn!("Could not set TCP_NODELAY for {address}: {error}");
                    }

                    let server = self.clone();
                    let shutdown = shutdown.clone();
                    sessions.spawn(async move {
                        if let Err(error) = server.serve(socket, shutdown).await {
                            warn!("Connection from {address} dropped: {error}");
                        }
                    });
                }

                () = shutdown.cancelled() => {
                    info!("Socket server stopped accepting connections");
                    break;
                }
            }
        }

        sessions.close();
        info!("Waiting for {} sessions to close", sessions.len());
        if time::timeout(SHUTDOWN_DRAIN_TIMEOUT, sessions.wait()).await.is_err() {
            warn!(
                "{} sessions still open after {SHUTDOWN_DRAIN_TIMEOUT:?}",
                sessions.len()
            );
        }
    }

    /// Runs the WebSocket handshake on `stream` and serves it as one session.
    pub async fn serve<S>(&self, stream: S, shutdown: CancellationToken) -> Result<(), ServerError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let websocket = tokio::select! {
            websocket = tokio_tungstenite::accept_async(stream) => {
                websocket.map_err(ServerError::Handshake)?
            }
            () = shutdown.cancelled() => return Err(ServerError::Shutdown),
        };

        Connection::serve(
            websocket,
            self.registry(),
            Arc::clone(&self.authenticator),
            self.config.handshake_timeout,
            shutdown,
        )
        .await;

        Ok(())
    }
}
