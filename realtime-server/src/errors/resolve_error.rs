use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Account store unavailable: {0}")]
    Unavailable(String),
}
