pub mod authenticator;
pub mod traits;
