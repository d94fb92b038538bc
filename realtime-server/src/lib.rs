pub mod authentication;
pub mod config;
pub mod dispatcher;
pub mod errors;
pub mod heartbeat;
pub mod message;
pub mod models;
pub mod registry;
pub mod session;
pub mod socket_server;

pub use authentication::traits::{
    account_resolver::{AccountResolver, AccountStatus},
    credential_verifier::CredentialVerifier,
};
pub use config::SocketConfig;
pub use dispatcher::Dispatcher;
pub use heartbeat::Heartbeat;
pub use message::Frame;
pub use models::{session_id::SessionId, user_id::UserId};
pub use registry::ConnectionRegistry;
pub use socket_server::SocketServer;
