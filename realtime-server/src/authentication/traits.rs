pub mod account_resolver;
pub mod credential_verifier;
