use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use log::trace;
use realtime_server::{CredentialVerifier, UserId, errors::credential_error::CredentialError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub exp: i64,
}

/// Accepts HS256 tokens signed with the shared application secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        JwtVerifier {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<UserId, CredentialError> {
        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => Ok(UserId(data.claims.id)),
            Err(error) => {
                trace!("Rejected JWT: {error}");
                match error.kind() {
                    ErrorKind::ExpiredSignature => Err(CredentialError::Expired),
                    _ => Err(CredentialError::Invalid),
                }
            }
        }
    }
}

impl CredentialVerifier for JwtVerifier {
    async fn verify_token(&self, token: &str) -> Result<UserId, CredentialError> {
        self.verify(token)
    }
}
