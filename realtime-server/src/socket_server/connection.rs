use crate::{
    authentication::{
        authenticator::Authenticator,
        traits::{account_resolver::AccountResolver, credential_verifier::CredentialVerifier},
    },
    errors::{frame_error::FrameError, server_error::ServerError},
    message::{CONNECT_SOCKET, Frame},
    models::session_id::SessionId,
    registry::{ConnectionRegistry, Registration},
    session::{session_handle::SessionHandle, session_state::SessionState},
};
use futures::{SinkExt, StreamExt};
use log::{debug, info, trace, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::mpsc,
    time::{self, Instant},
};
use tokio_tungstenite::{WebSocketStream, tungstenite::Message};
use tokio_util::sync::CancellationToken;

const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// One physical connection and the session state machine riding on it.
pub(crate) struct Connection<V, R> {
    handle: SessionHandle,
    state: SessionState,
    registration: Option<Registration>,
    registry: Arc<ConnectionRegistry>,
    authenticator: Arc<Authenticator<V, R>>,
    deadline: Option<Instant>,
    shutdown: CancellationToken,
}

impl<V: CredentialVerifier, R: AccountResolver> Connection<V, R> {
    /// Drives `websocket` until the client leaves, the writer dies, the
    /// handshake times out or the server shuts down, then tears the session
    /// down.
    pub(crate) async fn serve<S>(
        websocket: WebSocketStream<S>,
        registry: Arc<ConnectionRegistry>,
        authenticator: Arc<Authenticator<V, R>>,
        handshake_timeout: Option<Duration>,
        shutdown: CancellationToken,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut sink, mut stream) = websocket.split();
        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Arc<String>>();
        let session_id = SessionId::generate();

        let writer_id = session_id.clone();
        let writer = tokio::spawn(async move {
            while let Some(json) = outbound_rx.recv().await {
                if let Err(error) = sink.send(Message::text(json.as_str().to_owned())).await {
                    debug!("Could not write to session {writer_id}: {error}");
                    return;
                }

                trace!("S {writer_id}: {json}");
            }

            let _ = sink.close().await;
        });

        let mut connection = Connection {
            handle: SessionHandle::new(session_id.clone(), outbound_tx),
            state: SessionState::Unauthenticated,
            registration: None,
            registry,
            authenticator,
            deadline: handshake_timeout.map(|timeout| Instant::now() + timeout),
            shutdown: shutdown.clone(),
        };

        debug!("Session {session_id} opened");
        let deadline = connection.deadline;
        let watcher = connection.handle.clone();

        let reason = loop {
            tokio::select! {
                received = stream.next() => {
                    let result = match received {
                        Some(Ok(message)) => connection.handle_message(message).await,
                        Some(Err(error)) => Err(ServerError::Read(error)),
                        None => Err(ServerError::Disconnected),
                    };

                    if let Err(reason) = result {
                        break reason;
                    }
                }

                () = watcher.closed() => break ServerError::WriterStopped,

                () = handshake_deadline(deadline), if !connection.state.is_authenticated() => {
                    break ServerError::HandshakeTimeout;
                }

                () = shutdown.cancelled() => break ServerError::Shutdown,
            }
        };

        debug!("Session {session_id} ending: {reason}");
        connection.close();
        drop(watcher);
        drop(connection);

        let abort = writer.abort_handle();
        if time::timeout(WRITER_DRAIN_TIMEOUT, writer).await.is_err() {
            abort.abort();
        }
    }

    async fn handle_message(&mut self, message: Message) -> Result<(), ServerError> {
        match message {
            Message::Text(text) => self.handle_frame(text.as_str()).await,
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => self.handle_frame(text).await,
                Err(_) => {
                    warn!("Session {}: {}", self.handle.id, FrameError::InvalidUtf8);
                    Ok(())
                }
            },
            Message::Close(_) => Err(ServerError::Disconnected),
            _ => Ok(()),
        }
    }

    async fn handle_frame(&mut self, text: &str) -> Result<(), ServerError> {
        let frame = match Frame::parse(text) {
            Ok(frame) => frame,
            Err(error) => {
                warn!("Session {} sent a bad frame: {error}", self.handle.id);
                return Ok(());
            }
        };

        if frame.action == CONNECT_SOCKET {
            trace!("C {}: {CONNECT_SOCKET} Bearer xxxxx", self.handle.id);
            return self.handle_connect(frame.data.as_ref()).await;
        }

        trace!("C {}: {text}", self.handle.id);
        if !self.state.is_authenticated() {
            debug!(
                "Ignoring {} from unauthenticated session {}",
                frame.action, self.handle.id
            );
        }

        Ok(())
    }

    /// Authenticates the session. The collaborators may be slow, so the
    /// lookup is abandoned when the server shuts down, the writer dies or
    /// the handshake deadline passes.
    async fn handle_connect(&mut self, data: Option<&Value>) -> Result<(), ServerError> {
        match self.state {
            SessionState::Unauthenticated => (),
            SessionState::Authenticated(user_id) => {
                debug!(
                    "Session {} already authenticated as user {user_id}",
                    self.handle.id
                );
                return Ok(());
            }
            SessionState::Closed => return Ok(()),
        }

        let outcome = tokio::select! {
            outcome = self.authenticator.authenticate(data) => outcome,
            () = self.shutdown.cancelled() => return Err(ServerError::Shutdown),
            () = self.handle.closed() => return Err(ServerError::WriterStopped),
            () = handshake_deadline(self.deadline) => return Err(ServerError::HandshakeTimeout),
        };

        let user_id = match outcome {
            Ok(user_id) => user_id,
            Err(error) => {
                warn!("Session {} failed to authenticate: {error}", self.handle.id);
                return Ok(());
            }
        };

        self.registration = Some(self.registry.register(user_id, self.handle.clone()));
        self.state = SessionState::Authenticated(user_id);
        info!("Session {} authenticated as user {user_id}", self.handle.id);

        match Frame::status_success().to_json() {
            Ok(ack) => {
                if let Err(error) = self.handle.send(Arc::new(ack)) {
                    debug!("Could not acknowledge handshake: {error}");
                }
            }
            Err(error) => warn!("Could not build acknowledgement: {error}"),
        }

        Ok(())
    }

    fn close(&mut self) {
        if self.state.is_closed() {
            return;
        }

        if let Some(registration) = self.registration.take() {
            registration.release();
        }

        match self.state.user_id() {
            Some(user_id) => info!("Session {} of user {user_id} closed", self.handle.id),
            None => debug!("Unauthenticated session {} closed", self.handle.id),
        }
        self.state = SessionState::Closed;
    }
}

async fn handshake_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
