use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("WebSocket handshake failed: {0}")]
    Handshake(tungstenite::Error),
    #[error("Could not read from client: {0}")]
    Read(tungstenite::Error),
    #[error("Client disconnected")]
    Disconnected,
    #[error("Client did not authenticate in time")]
    HandshakeTimeout,
    #[error("Writer stopped, connection is dead")]
    WriterStopped,
    #[error("Server shutting down")]
    Shutdown,
}
