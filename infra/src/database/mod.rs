//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Embedded schema migrations
//! - `UserRepository` implementation

pub mod connection;
pub mod mysql;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::MySqlUserRepository;
