use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
    #[error("Token store unavailable: {0}")]
    Unavailable(String),
}
