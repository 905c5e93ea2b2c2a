pub mod connection;

// Re-export main types
pub use connection::Connection;
