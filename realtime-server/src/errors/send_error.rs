use crate::models::session_id::SessionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SendError {
    #[error("Session {0} is closed")]
    SessionClosed(SessionId),
}
