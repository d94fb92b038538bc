pub mod authentication_error;
pub mod credential_error;
pub mod frame_error;
pub mod resolve_error;
pub mod send_error;
pub mod server_error;
