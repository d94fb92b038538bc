pub mod config_error;
pub mod startup_error;
