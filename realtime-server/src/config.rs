use crate::heartbeat::DEFAULT_HEARTBEAT_INTERVAL;
use std::time::Duration;

/// Tunables of the socket layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketConfig {
    pub heartbeat_interval: Duration,
    /// Closes sessions still unauthenticated after this long. `None` leaves
    /// them to the transport's own timeouts.
    pub handshake_timeout: Option<Duration>,
}

impl Default for SocketConfig {
    fn default() -> Self {
        SocketConfig {
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            handshake_timeout: None,
        }
    }
}
