use crate::{errors::send_error::SendError, models::session_id::SessionId};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Delivery target for one session: its identity plus the sender feeding
/// the session's writer task. Cheap to clone, this is what the registry
/// hands out in snapshots.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: SessionId,
    outbound_tx: mpsc::UnboundedSender<Arc<String>>,
}

impl SessionHandle {
    pub fn new(id: SessionId, outbound_tx: mpsc::UnboundedSender<Arc<String>>) -> Self {
        SessionHandle { id, outbound_tx }
    }

    /// Queues an already serialized frame. Fails only once the writer task
    /// is gone.
    pub fn send(&self, json: Arc<String>) -> Result<(), SendError> {
        self.outbound_tx
            .send(json)
            .or(Err(SendError::SessionClosed(self.id.clone())))
    }

    pub fn is_closed(&self) -> bool {
        self.outbound_tx.is_closed()
    }

    /// Resolves when the writer task has dropped its receiver.
    pub async fn closed(&self) {
        self.outbound_tx.closed().await
    }
}
