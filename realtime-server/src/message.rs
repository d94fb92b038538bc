use crate::errors::frame_error::FrameError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const CONNECT_SOCKET: &str = "CONNECT_SOCKET";
pub const STATUS_SOCKET: &str = "STATUS_SOCKET";
pub const PIN: &str = "PIN";

pub const CONVERSATION_CREATE: &str = "CONVERSATION_CREATE";
pub const CONVERSATION_SEND_MESS: &str = "CONVERSATION_SEND_MESS";
pub const CONVERSATION_UPDATE_MESS: &str = "CONVERSATION_UPDATE_MESS";
pub const CONVERSATION_DELETE_MESS: &str = "CONVERSATION_DELETE_MESS";

/// Envelope used for every frame in both directions.
///
/// `data` is owned by whoever builds the frame; the server only looks at it
/// for `CONNECT_SOCKET`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Frame {
    pub fn new(action: impl Into<String>, data: Value) -> Self {
        Frame {
            action: action.into(),
            data: Some(data),
        }
    }

    pub fn without_data(action: impl Into<String>) -> Self {
        Frame {
            action: action.into(),
            data: None,
        }
    }

    /// Handshake acknowledgement
    pub fn status_success() -> Self {
        Frame::new(STATUS_SOCKET, json!({ "messages": "success" }))
    }

    pub fn pin() -> Self {
        Frame::without_data(PIN)
    }

    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let frame: Frame = serde_json::from_str(text).map_err(FrameError::Malformed)?;
        if frame.action.is_empty() {
            return Err(FrameError::EmptyAction);
        }

        Ok(frame)
    }

    pub fn to_json(&self) -> Result<String, FrameError> {
        serde_json::to_string(self).map_err(FrameError::Serialization)
    }
}
