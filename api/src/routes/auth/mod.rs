//! Public authentication endpoints
//!
//! - Registration for customers and couriers, confirmed by an emailed code
//! - Login and the credential check used by the gateway
//! - Token refresh
//! - Password reset by emailed code

pub mod login;
pub mod password;
pub mod refresh;
pub mod register;
