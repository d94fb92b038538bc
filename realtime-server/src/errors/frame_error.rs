use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Frame is not a valid envelope: {0}")]
    Malformed(serde_json::Error),
    #[error("Frame has an empty action")]
    EmptyAction,
    #[error("Binary frame is not UTF-8")]
    InvalidUtf8,
    #[error("Could not serialize frame: {0}")]
    Serialization(serde_json::Error),
}
