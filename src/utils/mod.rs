pub mod error;
pub mod logger;
pub mod ssh_config_parser;
