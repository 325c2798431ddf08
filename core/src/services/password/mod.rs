//! Password hashing and verification with bcrypt

mod service;

pub use service::PasswordService;
