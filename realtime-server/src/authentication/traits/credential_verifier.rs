use crate::{errors::credential_error::CredentialError, models::user_id::UserId};

/// Validates an opaque bearer token and yields the user it is bound to.
pub trait CredentialVerifier: Send + Sync + 'static {
    fn verify_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<UserId, CredentialError>> + Send;
}
