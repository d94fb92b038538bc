use super::traits::{
    account_resolver::{AccountResolver, AccountStatus},
    credential_verifier::CredentialVerifier,
};
use crate::{errors::authentication_error::AuthenticationError, models::user_id::UserId};
use serde_json::Value;

const BEARER_PREFIX: &str = "Bearer ";

/// Turns the `data` of a connect request into a user id.
pub struct Authenticator<V, R> {
    verifier: V,
    resolver: R,
}

impl<V: CredentialVerifier, R: AccountResolver> Authenticator<V, R> {
    pub fn new(verifier: V, resolver: R) -> Self {
        Authenticator { verifier, resolver }
    }

    pub async fn authenticate(&self, data: Option<&Value>) -> Result<UserId, AuthenticationError> {
        let authorization = data
            .and_then(Value::as_str)
            .ok_or(AuthenticationError::MissingAuthorization)?;

        let token = authorization
            .strip_prefix(BEARER_PREFIX)
            .ok_or(AuthenticationError::NotBearer)?;

        let user_id = self.verifier.verify_token(token).await?;

        match self.resolver.resolve_account(user_id).await? {
            AccountStatus::Active => Ok(user_id),
            AccountStatus::Blocked => Err(AuthenticationError::BlockedAccount(user_id)),
            AccountStatus::NotFound => Err(AuthenticationError::UnknownAccount(user_id)),
        }
    }
}
