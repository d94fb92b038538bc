use super::{credential_error::CredentialError, resolve_error::ResolveError};
use crate::models::user_id::UserId;
use thiserror::Error;

/// Why a connect request did not authenticate. Never sent to the client.
#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("Connect request has no authorization string")]
    MissingAuthorization,
    #[error("Authorization is not a bearer token")]
    NotBearer,
    #[error("Token rejected: {0}")]
    InvalidCredentials(#[from] CredentialError),
    #[error("Could not resolve account: {0}")]
    CouldNotResolveAccount(#[from] ResolveError),
    #[error("Account {0} does not exist")]
    UnknownAccount(UserId),
    #[error("Account {0} is blocked")]
    BlockedAccount(UserId),
}
