pub mod session_handle;
pub mod session_state;
