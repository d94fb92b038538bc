pub mod session_id;
pub mod user_id;
