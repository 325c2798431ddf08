//! In-process implementations of the user repository and code store.
//!
//! Used by the API tests and when the service runs with
//! `AUTH_STORAGE=memory` for local development. Nothing survives a restart.

pub mod code_store;
pub mod user_repository;

#[cfg(test)]
mod tests;

pub use code_store::InMemoryCodeStore;
pub use user_repository::InMemoryUserRepository;
