// Services module
pub mod config_service;
pub mod host_file;
pub mod validation_service;
